//! Shared data model for weft.
//!
//! This crate provides:
//! - Durable consumer cursors ([`Offset`], [`OffsetType`])
//! - Sequenced event types for the append-only log ([`Event`], [`Sequenced`])
//! - Subscription options ([`FirstEvent`])
//! - Definition objects ([`Datatype`], [`ContractInterface`], [`ContractApi`])
//!
//! Everything here is plain data: validation lives with the types, behavior
//! lives in `weft-events` and `weft-definitions`.

mod error;
mod naming;

pub mod definition;
pub mod event;
pub mod offset;
pub mod subscription;

pub use definition::{
    ContractApi, ContractError, ContractEvent, ContractInterface, ContractMethod, Datatype,
    ValidatorType,
};
pub use error::{Error, Result};
pub use event::{Event, EventType, Sequenced};
pub use naming::validate_safe_name;
pub use offset::{Offset, OffsetType, SEQUENCE_NONE};
pub use subscription::FirstEvent;
