// ThingsBoard REST response types
//
// Only the fields the sync engine reads are modeled explicitly. Device
// objects carry many more; everything else lands in `extra`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Auth ─────────────────────────────────────────────────────────────

/// Body of `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// ── Errors ───────────────────────────────────────────────────────────

/// Error body returned by ThingsBoard on non-2xx responses.
///
/// ```json
/// { "status": 404, "message": "Requested item wasn't found!", "errorCode": 32 }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

// ── Entities ─────────────────────────────────────────────────────────

/// Entity reference as ThingsBoard serializes it: `{ "entityType": "DEVICE", "id": "<uuid>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityId {
    pub id: Uuid,
    pub entity_type: String,
}

/// Tenant device as returned by `GET /api/tenant/devices?deviceName=`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: EntityId,
    pub name: String,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

// ── Attributes ───────────────────────────────────────────────────────

/// Attribute scopes of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeScope {
    Server,
    Shared,
    Client,
}

impl AttributeScope {
    /// Path segment used by the telemetry plugin endpoints.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Server => "SERVER_SCOPE",
            Self::Shared => "SHARED_SCOPE",
            Self::Client => "CLIENT_SCOPE",
        }
    }
}

impl fmt::Display for AttributeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry from `GET .../values/attributes/{scope}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeKv {
    pub key: String,
    pub value: serde_json::Value,
    #[serde(default)]
    pub last_update_ts: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_keeps_unknown_fields() {
        let device: Device = serde_json::from_value(json!({
            "id": { "entityType": "DEVICE", "id": "784f394c-42b6-435a-983c-b7beff2784f9" },
            "name": "gw-plant-1",
            "type": "gateway",
            "additionalInfo": { "gateway": true }
        }))
        .expect("device should parse");

        assert_eq!(device.name, "gw-plant-1");
        assert_eq!(device.id.entity_type, "DEVICE");
        assert_eq!(device.device_type.as_deref(), Some("gateway"));
        assert!(device.extra.contains_key("additionalInfo"));
    }

    #[test]
    fn attribute_ts_is_optional() {
        let kv: AttributeKv =
            serde_json::from_value(json!({ "key": "active_connectors", "value": ["m1"] }))
                .expect("attribute should parse");
        assert_eq!(kv.last_update_ts, None);
        assert_eq!(kv.value, json!(["m1"]));
    }
}
