//! Contract interface and contract API definition sending.

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::sender::DefinitionSender;
use crate::traits::{BatchState, BroadcastSender, SystemTag};
use weft_models::{ContractApi, ContractInterface};

impl DefinitionSender {
    /// Define a contract interface.
    ///
    /// Fresh ids are assigned to the interface and all of its children. A
    /// pre-existing interface with the same name/version identity is a
    /// conflict. Published interfaces are broadcast to the network (multiparty
    /// only); unpublished ones apply locally through the definition handler.
    pub async fn define_contract_interface(
        &self,
        mut interface: ContractInterface,
        wait_confirm: bool,
    ) -> Result<ContractInterface> {
        interface.assign_ids();

        let name = interface.name.clone().unwrap_or_default();
        if let Ok(Some(_existing)) = self
            .contracts
            .get_contract_interface(&name, interface.network_name.as_deref(), &interface.version)
            .await
        {
            return Err(Error::Conflict {
                namespace: self.namespace.clone(),
                name,
                version: interface.version.clone(),
            });
        }

        if interface.published {
            if !self.multiparty {
                return Err(Error::ActionNotSupported);
            }
            let (mut sender, payload) = self.prepare_interface_broadcast(&mut interface).await?;
            sender.send(&payload, wait_confirm).await?;
            info!(
                namespace = %self.namespace,
                name = %name,
                version = %interface.version,
                "Contract interface definition broadcast"
            );
            return Ok(interface);
        }

        // Local-only definitions have no network identity.
        interface.network_name = None;
        let mut state = BatchState::default();
        let outcome = self
            .handler
            .handle_contract_interface_definition(&mut state, &interface)
            .await?;
        self.finish_local(state, outcome)?;
        Ok(interface)
    }

    /// Publish an existing local contract interface to the network.
    ///
    /// When not waiting for confirmation, the broadcast is prepared and the
    /// updated interface persisted before the send, so a crash between the
    /// two cannot lose the network-name binding.
    pub async fn publish_contract_interface(
        &self,
        name: &str,
        version: &str,
        network_name: Option<String>,
        wait_confirm: bool,
    ) -> Result<ContractInterface> {
        if !self.multiparty {
            return Err(Error::ActionNotSupported);
        }

        let mut interface = self
            .contracts
            .get_contract_interface(name, None, version)
            .await?
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
                version: version.to_string(),
            })?;
        if network_name.is_some() {
            interface.network_name = network_name;
        }

        let (mut sender, payload) = self.prepare_interface_broadcast(&mut interface).await?;
        if !wait_confirm {
            sender.prepare(&payload).await?;
            self.contracts.persist_contract_interface(&interface).await?;
        }
        sender.send(&payload, wait_confirm).await?;
        info!(
            namespace = %self.namespace,
            name = %name,
            version = %version,
            "Contract interface published"
        );
        Ok(interface)
    }

    /// Define a contract API binding an interface at a location.
    ///
    /// Multiparty nodes resolve and broadcast the API; others apply it
    /// locally through the definition handler.
    pub async fn define_contract_api(
        &self,
        http_base_url: &str,
        mut api: ContractApi,
        wait_confirm: bool,
    ) -> Result<ContractApi> {
        if api.id.is_none() {
            api.id = Some(Uuid::new_v4());
        }

        if self.multiparty {
            self.contracts.resolve_contract_api(http_base_url, &mut api).await?;

            // Namespace is local; the broadcast payload must not carry it.
            api.namespace = None;
            let mut sender = self
                .new_definition_broadcast(SystemTag::DefineContractApi)
                .await?;
            api.message = Some(sender.message_id());
            let payload = serde_json::to_value(&api)?;
            api.namespace = Some(self.namespace.clone());
            sender.send(&payload, wait_confirm).await?;
            info!(
                namespace = %self.namespace,
                name = %api.name,
                "Contract API definition broadcast"
            );
            return Ok(api);
        }

        let mut state = BatchState::default();
        let outcome = self
            .handler
            .handle_contract_api_definition(&mut state, http_base_url, &api)
            .await?;
        self.finish_local(state, outcome)?;
        Ok(api)
    }

    /// Resolve an interface and stage it for broadcast.
    ///
    /// The serialized payload carries the network identity only: local name
    /// and namespace are blanked for the send and restored afterwards, and
    /// the network name defaults to the local name on first publish.
    async fn prepare_interface_broadcast(
        &self,
        interface: &mut ContractInterface,
    ) -> Result<(Box<dyn BroadcastSender>, Value)> {
        self.contracts.resolve_contract_interface(interface).await?;

        let local_name = interface.name.take();
        interface.namespace = None;
        interface.published = true;
        if interface.network_name.is_none() {
            interface.network_name = local_name.clone();
        }

        let sender = self
            .new_definition_broadcast(SystemTag::DefineContractInterface)
            .await?;
        interface.message = Some(sender.message_id());
        let payload = serde_json::to_value(&*interface)?;

        interface.name = local_name;
        interface.namespace = Some(self.namespace.clone());
        Ok((sender, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Mocks, sent_messages};
    use serde_json::json;

    fn test_interface(published: bool) -> ContractInterface {
        ContractInterface {
            id: None,
            namespace: Some("ns1".to_string()),
            name: Some("iface1".to_string()),
            network_name: None,
            version: "1.0.0".to_string(),
            published,
            message: None,
            methods: vec![weft_models::ContractMethod {
                id: None,
                name: "transfer".to_string(),
                params: json!([]),
                returns: json!([]),
            }],
            events: vec![],
            errors: vec![],
        }
    }

    fn test_api() -> ContractApi {
        ContractApi {
            id: None,
            namespace: Some("ns1".to_string()),
            name: "api1".to_string(),
            network_name: None,
            interface: Some(Uuid::new_v4()),
            location: json!({"address": "0x1234"}),
            published: false,
            message: None,
        }
    }

    #[tokio::test]
    async fn unpublished_interface_applies_locally() {
        let mocks = Mocks::default();
        let ds = mocks.sender("ns1", false);

        let defined = ds
            .define_contract_interface(test_interface(false), false)
            .await
            .unwrap();
        assert!(defined.id.is_some());
        assert!(defined.methods[0].id.is_some());
        assert_eq!(defined.network_name, None);
        assert_eq!(mocks.applied_handlers().await, vec!["contract_interface"]);
        assert!(sent_messages(&mocks).await.is_empty());
    }

    #[tokio::test]
    async fn existing_interface_is_a_conflict() {
        let mocks = Mocks::default();
        mocks.seed_interface(test_interface(false)).await;
        let ds = mocks.sender("ns1", true);

        let err = ds
            .define_contract_interface(test_interface(false), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
        assert!(mocks.applied_handlers().await.is_empty());
    }

    #[tokio::test]
    async fn published_interface_requires_multiparty() {
        let mocks = Mocks::default();
        let ds = mocks.sender("ns1", false);

        let err = ds
            .define_contract_interface(test_interface(true), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ActionNotSupported));
        assert!(sent_messages(&mocks).await.is_empty());
        assert!(mocks.applied_handlers().await.is_empty());
    }

    #[tokio::test]
    async fn published_interface_broadcasts_network_identity_only() {
        let mocks = Mocks::default();
        let ds = mocks.sender("ns1", true);

        let defined = ds
            .define_contract_interface(test_interface(true), true)
            .await
            .unwrap();

        // Local identity restored after the send.
        assert_eq!(defined.name.as_deref(), Some("iface1"));
        assert_eq!(defined.namespace.as_deref(), Some("ns1"));
        assert_eq!(defined.network_name.as_deref(), Some("iface1"));
        assert!(defined.message.is_some());

        let sent = sent_messages(&mocks).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].tag, SystemTag::DefineContractInterface);
        assert!(sent[0].waited);
        // The payload must not leak local name or namespace.
        assert!(sent[0].payload.get("name").is_none());
        assert!(sent[0].payload.get("namespace").is_none());
        assert_eq!(sent[0].payload["network_name"], "iface1");
        assert_eq!(
            sent[0].payload["message"],
            defined.message.unwrap().to_string()
        );
    }

    #[tokio::test]
    async fn publish_requires_multiparty() {
        let mocks = Mocks::default();
        let ds = mocks.sender("ns1", false);

        let err = ds
            .publish_contract_interface("iface1", "1.0.0", None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ActionNotSupported));
    }

    #[tokio::test]
    async fn publish_unknown_interface_is_not_found() {
        let mocks = Mocks::default();
        let ds = mocks.sender("ns1", true);

        let err = ds
            .publish_contract_interface("missing", "1.0.0", None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn publish_without_wait_prepares_and_persists_first() {
        let mocks = Mocks::default();
        let mut seeded = test_interface(false);
        seeded.id = Some(Uuid::new_v4());
        mocks.seed_interface(seeded).await;
        let ds = mocks.sender("ns1", true);

        let published = ds
            .publish_contract_interface("iface1", "1.0.0", Some("net-iface".to_string()), false)
            .await
            .unwrap();
        assert_eq!(published.network_name.as_deref(), Some("net-iface"));

        let sent = sent_messages(&mocks).await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].prepared);
        assert!(!sent[0].waited);

        let persisted = mocks.persisted_interfaces().await;
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].network_name.as_deref(), Some("net-iface"));
    }

    #[tokio::test]
    async fn api_broadcasts_on_multiparty_nodes() {
        let mocks = Mocks::default();
        let ds = mocks.sender("ns1", true);

        let defined = ds
            .define_contract_api("http://localhost:5000", test_api(), false)
            .await
            .unwrap();
        assert!(defined.id.is_some());
        assert!(defined.message.is_some());
        assert_eq!(defined.namespace.as_deref(), Some("ns1"));

        let sent = sent_messages(&mocks).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].tag, SystemTag::DefineContractApi);
        assert!(sent[0].payload.get("namespace").is_none());
        assert_eq!(sent[0].payload["name"], "api1");
    }

    #[tokio::test]
    async fn api_applies_locally_on_non_multiparty_nodes() {
        let mocks = Mocks::default();
        let ds = mocks.sender("ns1", false);

        let defined = ds
            .define_contract_api("http://localhost:5000", test_api(), false)
            .await
            .unwrap();
        assert!(defined.id.is_some());
        assert_eq!(mocks.applied_handlers().await, vec!["contract_api"]);
        assert!(sent_messages(&mocks).await.is_empty());
    }

    #[tokio::test]
    async fn rejected_local_definition_surfaces_as_error() {
        let mocks = Mocks::default().rejecting_handler();
        let ds = mocks.sender("ns1", false);

        let err = ds
            .define_contract_interface(test_interface(false), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Rejected));
    }
}
