//! Definition objects a node can declare locally or broadcast to the network.
//!
//! Definitions are the schema-level objects of the data-exchange platform:
//! datatypes for message validation, contract interfaces describing on-chain
//! logic, and contract APIs binding an interface to a location.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::naming::validate_safe_name;

/// Validation scheme for a datatype's value document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorType {
    /// JSON Schema validation.
    #[default]
    Json,
}

impl ValidatorType {
    /// Parse a validator kind from its wire name.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            other => Err(Error::UnknownValidator(other.to_string())),
        }
    }
}

/// A versioned schema definition used to validate message data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datatype {
    /// Unique id, assigned by the sender at definition time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Validation scheme for `value`.
    pub validator: ValidatorType,
    /// Local namespace.
    pub namespace: String,
    /// Datatype name.
    pub name: String,
    /// Datatype version; `(name, version)` is unique within the namespace.
    pub version: String,
    /// The schema document itself, as raw JSON text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// The broadcast message that carried this definition, once sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Uuid>,
}

impl Datatype {
    /// Validate the datatype before it is defined.
    ///
    /// Checks name syntax and that the value document is present and
    /// parseable JSON.
    pub fn validate(&self) -> Result<()> {
        validate_safe_name("namespace", &self.namespace)?;
        validate_safe_name("name", &self.name)?;
        validate_safe_name("version", &self.version)?;
        let value = self.value.as_deref().ok_or(Error::MissingValue)?;
        serde_json::from_str::<Value>(value)?;
        Ok(())
    }
}

/// A callable method on a contract interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractMethod {
    /// Unique id, assigned by the sender at definition time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Method name.
    pub name: String,
    /// Parameter schema, interface-format specific.
    #[serde(default)]
    pub params: Value,
    /// Return schema, interface-format specific.
    #[serde(default)]
    pub returns: Value,
}

/// An event emitted by a contract interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractEvent {
    /// Unique id, assigned by the sender at definition time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Event name.
    pub name: String,
    /// Field schema, interface-format specific.
    #[serde(default)]
    pub params: Value,
}

/// An error a contract interface can raise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractError {
    /// Unique id, assigned by the sender at definition time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Error name.
    pub name: String,
    /// Field schema, interface-format specific.
    #[serde(default)]
    pub params: Value,
}

/// A versioned description of on-chain contract logic.
///
/// `name`/`namespace` are local; `network_name` is the identity the interface
/// is published under across the multiparty network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractInterface {
    /// Unique id, assigned by the sender at definition time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Local namespace; blanked while serialized for broadcast.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Local name; blanked while serialized for broadcast.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Network-wide name the interface is published under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
    /// Interface version.
    pub version: String,
    /// Whether this interface is (being) published to the network.
    #[serde(default)]
    pub published: bool,
    /// The broadcast message that carried this definition, once sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Uuid>,
    /// Callable methods.
    #[serde(default)]
    pub methods: Vec<ContractMethod>,
    /// Emitted events.
    #[serde(default)]
    pub events: Vec<ContractEvent>,
    /// Raisable errors.
    #[serde(default)]
    pub errors: Vec<ContractError>,
}

impl ContractInterface {
    /// Assign fresh ids to the interface and all of its children.
    pub fn assign_ids(&mut self) {
        self.id = Some(Uuid::new_v4());
        for method in &mut self.methods {
            method.id = Some(Uuid::new_v4());
        }
        for event in &mut self.events {
            event.id = Some(Uuid::new_v4());
        }
        for error in &mut self.errors {
            error.id = Some(Uuid::new_v4());
        }
    }
}

/// A REST binding of a contract interface at a specific location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractApi {
    /// Unique id, assigned lazily if the caller did not supply one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Local namespace; blanked while serialized for broadcast.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// API name.
    pub name: String,
    /// Network-wide name the API is published under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
    /// The interface this API exposes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<Uuid>,
    /// Chain-specific location of the contract instance.
    #[serde(default)]
    pub location: Value,
    /// Whether this API is (being) published to the network.
    #[serde(default)]
    pub published: bool,
    /// The broadcast message that carried this definition, once sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Uuid>,
}
