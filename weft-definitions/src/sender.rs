//! The definition sender: shared orchestration for all definition kinds.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{
    BatchState, BroadcastSender, Broadcaster, ContractManager, DataManager, DefinitionHandler,
    HandlerOutcome, IdentityResolver, SystemTag,
};

/// Sends definitions, either broadcasting them to the multiparty network or
/// applying them locally through the definition handler.
pub struct DefinitionSender {
    pub(crate) namespace: String,
    pub(crate) multiparty: bool,
    pub(crate) identity: Arc<dyn IdentityResolver>,
    pub(crate) data: Arc<dyn DataManager>,
    pub(crate) contracts: Arc<dyn ContractManager>,
    pub(crate) broadcaster: Arc<dyn Broadcaster>,
    pub(crate) handler: Arc<dyn DefinitionHandler>,
}

impl DefinitionSender {
    /// Create a sender for a namespace.
    ///
    /// `multiparty` states whether this node participates in the shared
    /// network; without it, publish/broadcast actions are rejected and
    /// definitions apply locally only.
    pub fn new(
        namespace: impl Into<String>,
        multiparty: bool,
        identity: Arc<dyn IdentityResolver>,
        data: Arc<dyn DataManager>,
        contracts: Arc<dyn ContractManager>,
        broadcaster: Arc<dyn Broadcaster>,
        handler: Arc<dyn DefinitionHandler>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            multiparty,
            identity,
            data,
            contracts,
            broadcaster,
            handler,
        }
    }

    /// Whether this node participates in the multiparty network.
    pub fn is_multiparty(&self) -> bool {
        self.multiparty
    }

    /// The namespace this sender serves.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Resolve the signing identity and allocate a broadcast message.
    ///
    /// Fails with [`Error::ActionNotSupported`] on non-multiparty nodes,
    /// before any side effects.
    pub(crate) async fn new_definition_broadcast(
        &self,
        tag: SystemTag,
    ) -> Result<Box<dyn BroadcastSender>> {
        if !self.multiparty {
            return Err(Error::ActionNotSupported);
        }
        let mut identity = self.identity.root_org().await?;
        self.identity.resolve_signing_identity(&mut identity).await?;
        Ok(self.broadcaster.new_broadcast(identity, tag))
    }

    /// Run a definition through a synthetic single-definition batch.
    pub(crate) fn finish_local(&self, state: BatchState, outcome: HandlerOutcome) -> Result<()> {
        match outcome {
            HandlerOutcome::Confirm => {
                debug!(
                    namespace = %self.namespace,
                    confirmed = state.confirmed.len(),
                    "Definition applied locally"
                );
                Ok(())
            }
            HandlerOutcome::Reject => Err(Error::Rejected),
        }
    }
}
