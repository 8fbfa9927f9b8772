//! Collaborator contracts consumed by the definition sender.
//!
//! The sender orchestrates over these seams and owns none of their
//! implementations: identity resolution, datatype/contract management, the
//! broadcast transport, and the local definition handler are all injected.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use weft_models::{ContractApi, ContractInterface, Datatype};

/// The identity a broadcast is signed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningIdentity {
    /// Decentralized identifier of the signing org.
    pub did: String,
    /// Resolved signing key, filled in by the identity resolver.
    pub key: Option<String>,
}

/// System tags marking what kind of definition a broadcast carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTag {
    /// Datatype definition broadcast.
    DefineDatatype,
    /// Contract interface definition broadcast.
    DefineContractInterface,
    /// Contract API definition broadcast.
    DefineContractApi,
}

/// Resolves the node's signing identity for definition broadcasts.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// The root org identity of this node in the multiparty network.
    async fn root_org(&self) -> Result<SigningIdentity>;

    /// Fill in the signing key for an identity.
    async fn resolve_signing_identity(&self, identity: &mut SigningIdentity) -> Result<()>;
}

/// The slice of the data manager the sender needs.
#[async_trait]
pub trait DataManager: Send + Sync {
    /// Verify a datatype's value document against its validator.
    async fn check_datatype(&self, datatype: &Datatype) -> Result<()>;
}

/// The slice of the contract manager the sender needs.
#[async_trait]
pub trait ContractManager: Send + Sync {
    /// Look up an interface by name/version; `network_name` narrows the
    /// lookup to published interfaces when set.
    async fn get_contract_interface(
        &self,
        name: &str,
        network_name: Option<&str>,
        version: &str,
    ) -> Result<Option<ContractInterface>>;

    /// Validate and normalize an interface before broadcast.
    async fn resolve_contract_interface(&self, interface: &mut ContractInterface) -> Result<()>;

    /// Validate and normalize a contract API before broadcast.
    async fn resolve_contract_api(&self, http_base_url: &str, api: &mut ContractApi) -> Result<()>;

    /// Persist an updated interface, used when publishing without waiting
    /// for confirmation.
    async fn persist_contract_interface(&self, interface: &ContractInterface) -> Result<()>;
}

/// One definition message being broadcast to the network.
///
/// The message id is allocated at creation so the definition payload can
/// reference the message that carries it.
#[async_trait]
pub trait BroadcastSender: Send + Sync {
    /// The id of the message this sender will transmit.
    fn message_id(&self) -> Uuid;

    /// Resolve and stage the message without sending it.
    async fn prepare(&mut self, payload: &Value) -> Result<()>;

    /// Transmit the message. With `wait_confirm` the call returns once the
    /// network confirms the message; otherwise once it is submitted.
    async fn send(&mut self, payload: &Value, wait_confirm: bool) -> Result<()>;
}

/// Creates broadcast senders for definition messages.
pub trait Broadcaster: Send + Sync {
    /// Allocate a new broadcast message with a signing identity and tag.
    fn new_broadcast(&self, identity: SigningIdentity, tag: SystemTag) -> Box<dyn BroadcastSender>;
}

/// Side effects accumulated while applying definitions in a batch.
///
/// The local (non-broadcast) path runs each definition through a synthetic
/// single-definition batch using this state.
#[derive(Debug, Default)]
pub struct BatchState {
    /// Object ids confirmed by the handler during this batch.
    pub confirmed: Vec<Uuid>,
}

/// What the definition handler decided about a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The definition was applied.
    Confirm,
    /// The definition was rejected.
    Reject,
}

/// Applies definitions to local state.
///
/// In the multiparty path this runs when the broadcast comes back through
/// the ordered event stream; in the local path the sender invokes it
/// directly and synchronously.
#[async_trait]
pub trait DefinitionHandler: Send + Sync {
    /// Apply a datatype definition.
    async fn handle_datatype_definition(
        &self,
        state: &mut BatchState,
        datatype: &Datatype,
    ) -> Result<HandlerOutcome>;

    /// Apply a contract interface definition.
    async fn handle_contract_interface_definition(
        &self,
        state: &mut BatchState,
        interface: &ContractInterface,
    ) -> Result<HandlerOutcome>;

    /// Apply a contract API definition.
    async fn handle_contract_api_definition(
        &self,
        state: &mut BatchState,
        http_base_url: &str,
        api: &ContractApi,
    ) -> Result<HandlerOutcome>;
}
