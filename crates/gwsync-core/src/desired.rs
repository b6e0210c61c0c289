// ── Desired gateway state ──

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::connector::ConnectorDescriptor;

/// Attribute key holding the list of enabled connector names.
pub const ACTIVE_CONNECTORS_KEY: &str = "active_connectors";

/// What a gateway's shared attributes should contain.
///
/// `active_connectors` is always exactly the key set of `connectors`, in
/// name order. The only way to build one is [`from_connectors`](Self::from_connectors),
/// so the invariant cannot drift. No connector may be named `active_connectors`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayDesiredState {
    active_connectors: Vec<String>,
    connectors: BTreeMap<String, ConnectorDescriptor>,
}

impl GatewayDesiredState {
    pub fn from_connectors(mut connectors: BTreeMap<String, ConnectorDescriptor>) -> Self {
        if connectors.remove(ACTIVE_CONNECTORS_KEY).is_some() {
            warn!("dropping connector named {ACTIVE_CONNECTORS_KEY}; the key is reserved");
        }
        Self {
            active_connectors: connectors.keys().cloned().collect(),
            connectors,
        }
    }

    pub fn active_connectors(&self) -> &[String] {
        &self.active_connectors
    }

    pub fn connectors(&self) -> &BTreeMap<String, ConnectorDescriptor> {
        &self.connectors
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// The full attribute object to write: `active_connectors` plus one key per connector.
    pub fn attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::with_capacity(self.connectors.len() + 1);
        attributes.insert(
            ACTIVE_CONNECTORS_KEY.to_owned(),
            Value::Array(
                self.active_connectors
                    .iter()
                    .cloned()
                    .map(Value::String)
                    .collect(),
            ),
        );
        for (name, descriptor) in &self.connectors {
            attributes.insert(name.clone(), descriptor.to_value());
        }
        attributes
    }
}
