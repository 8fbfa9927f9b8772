//! Definition broadcast/send orchestration for weft.
//!
//! A [`DefinitionSender`] takes definition objects (datatypes, contract
//! interfaces, contract APIs), assigns their identifiers, checks for
//! conflicts, and then either broadcasts them to the multiparty network or
//! applies them locally through the definition handler, depending on whether
//! the node participates in the shared network.
//!
//! All storage, identity, and transport concerns live behind the collaborator
//! traits in [`traits`].

mod contracts;
mod datatype;
mod error;
mod sender;

pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
pub use sender::DefinitionSender;
pub use traits::{
    BatchState, BroadcastSender, Broadcaster, ContractManager, DataManager, DefinitionHandler,
    HandlerOutcome, IdentityResolver, SigningIdentity, SystemTag,
};
