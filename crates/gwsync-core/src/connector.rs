// ── Connector descriptors ──
//
// The value stored under each connector key in a gateway's shared
// attributes, plus the name-based protocol classifier.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

/// Field whose presence marks a remote value as a connector descriptor.
pub const CONFIGURATION_FIELD: &str = "configurationJson";

/// Protocol category of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectorType {
    Modbus,
    Bacnet,
    Custom,
}

/// Configuration mode understood by the gateway UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorMode {
    #[default]
    Advanced,
}

/// Gateway-side log level of a connector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

/// Classify a connector by its name.
///
/// Case-insensitive substring test, first match wins: `modbus`, then
/// `bacnet`, otherwise `custom`. `"modbus-legacy-bacnet"` is `Modbus`.
pub fn classify(name: &str) -> ConnectorType {
    let lowered = name.to_lowercase();
    if lowered.contains("modbus") {
        ConnectorType::Modbus
    } else if lowered.contains("bacnet") {
        ConnectorType::Bacnet
    } else {
        ConnectorType::Custom
    }
}

/// One connector as the gateway expects it in its shared attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorDescriptor {
    pub mode: ConnectorMode,
    pub name: String,
    #[serde(rename = "type")]
    pub connector_type: ConnectorType,
    pub log_level: LogLevel,
    pub send_data_only_on_change: bool,
    /// The parsed connector file, passed through untouched.
    pub configuration_json: Value,
}

impl ConnectorDescriptor {
    /// Build the descriptor for a connector file named `name`.
    pub fn new(name: impl Into<String>, configuration: Value) -> Self {
        let name = name.into();
        Self {
            mode: ConnectorMode::Advanced,
            connector_type: classify(&name),
            name,
            log_level: LogLevel::Info,
            send_data_only_on_change: false,
            configuration_json: configuration,
        }
    }

    /// The attribute value written to the platform.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "mode": self.mode,
            "name": self.name,
            "type": self.connector_type,
            "logLevel": self.log_level,
            "sendDataOnlyOnChange": self.send_data_only_on_change,
            "configurationJson": self.configuration_json,
        })
    }
}

/// Whether a remote attribute value looks like a connector descriptor.
///
/// Objects qualify when they carry `configurationJson`. String values are
/// tried as embedded JSON, since attributes saved as text come back that way.
pub fn is_descriptor_shaped(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key(CONFIGURATION_FIELD),
        Value::String(text) => serde_json::from_str::<Value>(text)
            .ok()
            .as_ref()
            .and_then(Value::as_object)
            .is_some_and(|map| map.contains_key(CONFIGURATION_FIELD)),
        _ => false,
    }
}
