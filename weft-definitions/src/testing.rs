//! Hand-rolled mock collaborators shared by the sender tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::sender::DefinitionSender;
use crate::traits::{
    BatchState, BroadcastSender, Broadcaster, ContractManager, DataManager, DefinitionHandler,
    HandlerOutcome, IdentityResolver, SigningIdentity, SystemTag,
};
use weft_models::{ContractApi, ContractInterface, Datatype};

/// One message captured by the mock broadcaster.
#[derive(Debug, Clone)]
pub(crate) struct SentMessage {
    pub tag: SystemTag,
    pub payload: Value,
    pub waited: bool,
    pub prepared: bool,
}

/// Shared state for all mock collaborators behind one sender.
#[derive(Default)]
pub(crate) struct Mocks {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    interfaces: Arc<Mutex<Vec<ContractInterface>>>,
    persisted: Arc<Mutex<Vec<ContractInterface>>>,
    applied: Arc<Mutex<Vec<&'static str>>>,
    datatype_check_error: Option<String>,
    reject_locally: bool,
}

impl Mocks {
    /// Make `check_datatype` fail with the given message.
    pub fn failing_datatype_check(mut self, message: &str) -> Self {
        self.datatype_check_error = Some(message.to_string());
        self
    }

    /// Make the local definition handler reject everything.
    pub fn rejecting_handler(mut self) -> Self {
        self.reject_locally = true;
        self
    }

    /// Pre-populate the contract store with an interface.
    pub async fn seed_interface(&self, interface: ContractInterface) {
        self.interfaces.lock().await.push(interface);
    }

    /// Handler invocations recorded by the local apply path.
    pub async fn applied_handlers(&self) -> Vec<&'static str> {
        self.applied.lock().await.clone()
    }

    /// Interfaces persisted through the contract manager.
    pub async fn persisted_interfaces(&self) -> Vec<ContractInterface> {
        self.persisted.lock().await.clone()
    }

    /// Build a sender wired to these mocks.
    pub fn sender(&self, namespace: &str, multiparty: bool) -> DefinitionSender {
        DefinitionSender::new(
            namespace,
            multiparty,
            Arc::new(MockIdentity),
            Arc::new(MockData {
                error: self.datatype_check_error.clone(),
            }),
            Arc::new(MockContracts {
                interfaces: self.interfaces.clone(),
                persisted: self.persisted.clone(),
            }),
            Arc::new(MockBroadcaster {
                sent: self.sent.clone(),
            }),
            Arc::new(MockHandler {
                applied: self.applied.clone(),
                reject: self.reject_locally,
            }),
        )
    }
}

/// Messages captured by the mock broadcaster, in send order.
pub(crate) async fn sent_messages(mocks: &Mocks) -> Vec<SentMessage> {
    mocks.sent.lock().await.clone()
}

struct MockIdentity;

#[async_trait]
impl IdentityResolver for MockIdentity {
    async fn root_org(&self) -> Result<SigningIdentity> {
        Ok(SigningIdentity {
            did: "did:weft:org1".to_string(),
            key: None,
        })
    }

    async fn resolve_signing_identity(&self, identity: &mut SigningIdentity) -> Result<()> {
        identity.key = Some("0x12345".to_string());
        Ok(())
    }
}

struct MockData {
    error: Option<String>,
}

#[async_trait]
impl DataManager for MockData {
    async fn check_datatype(&self, _datatype: &Datatype) -> Result<()> {
        match &self.error {
            Some(message) => Err(Error::Collaborator(message.clone())),
            None => Ok(()),
        }
    }
}

struct MockContracts {
    interfaces: Arc<Mutex<Vec<ContractInterface>>>,
    persisted: Arc<Mutex<Vec<ContractInterface>>>,
}

#[async_trait]
impl ContractManager for MockContracts {
    async fn get_contract_interface(
        &self,
        name: &str,
        _network_name: Option<&str>,
        version: &str,
    ) -> Result<Option<ContractInterface>> {
        Ok(self
            .interfaces
            .lock()
            .await
            .iter()
            .find(|i| i.name.as_deref() == Some(name) && i.version == version)
            .cloned())
    }

    async fn resolve_contract_interface(&self, _interface: &mut ContractInterface) -> Result<()> {
        Ok(())
    }

    async fn resolve_contract_api(&self, _http_base_url: &str, _api: &mut ContractApi) -> Result<()> {
        Ok(())
    }

    async fn persist_contract_interface(&self, interface: &ContractInterface) -> Result<()> {
        self.persisted.lock().await.push(interface.clone());
        Ok(())
    }
}

struct MockBroadcaster {
    sent: Arc<Mutex<Vec<SentMessage>>>,
}

impl Broadcaster for MockBroadcaster {
    fn new_broadcast(&self, _identity: SigningIdentity, tag: SystemTag) -> Box<dyn BroadcastSender> {
        Box::new(MockBroadcastSender {
            message_id: Uuid::new_v4(),
            tag,
            prepared: false,
            sent: self.sent.clone(),
        })
    }
}

struct MockBroadcastSender {
    message_id: Uuid,
    tag: SystemTag,
    prepared: bool,
    sent: Arc<Mutex<Vec<SentMessage>>>,
}

#[async_trait]
impl BroadcastSender for MockBroadcastSender {
    fn message_id(&self) -> Uuid {
        self.message_id
    }

    async fn prepare(&mut self, _payload: &Value) -> Result<()> {
        self.prepared = true;
        Ok(())
    }

    async fn send(&mut self, payload: &Value, wait_confirm: bool) -> Result<()> {
        self.sent.lock().await.push(SentMessage {
            tag: self.tag,
            payload: payload.clone(),
            waited: wait_confirm,
            prepared: self.prepared,
        });
        Ok(())
    }
}

struct MockHandler {
    applied: Arc<Mutex<Vec<&'static str>>>,
    reject: bool,
}

impl MockHandler {
    fn outcome(&self) -> HandlerOutcome {
        if self.reject {
            HandlerOutcome::Reject
        } else {
            HandlerOutcome::Confirm
        }
    }
}

#[async_trait]
impl DefinitionHandler for MockHandler {
    async fn handle_datatype_definition(
        &self,
        state: &mut BatchState,
        datatype: &Datatype,
    ) -> Result<HandlerOutcome> {
        self.applied.lock().await.push("datatype");
        if let Some(id) = datatype.id {
            state.confirmed.push(id);
        }
        Ok(self.outcome())
    }

    async fn handle_contract_interface_definition(
        &self,
        state: &mut BatchState,
        interface: &ContractInterface,
    ) -> Result<HandlerOutcome> {
        self.applied.lock().await.push("contract_interface");
        if let Some(id) = interface.id {
            state.confirmed.push(id);
        }
        Ok(self.outcome())
    }

    async fn handle_contract_api_definition(
        &self,
        state: &mut BatchState,
        _http_base_url: &str,
        api: &ContractApi,
    ) -> Result<HandlerOutcome> {
        self.applied.lock().await.push("contract_api");
        if let Some(id) = api.id {
            state.confirmed.push(id);
        }
        Ok(self.outcome())
    }
}
