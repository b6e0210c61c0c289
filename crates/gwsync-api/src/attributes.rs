// Device attribute endpoints (telemetry plugin)
//
// Read, delete, and save attributes of a device in one scope.

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::client::ThingsBoardClient;
use crate::error::Error;
use crate::models::{AttributeKv, AttributeScope};

impl ThingsBoardClient {
    /// List every attribute of a device in `scope`.
    ///
    /// `GET /api/plugins/telemetry/DEVICE/{id}/values/attributes/{scope}`
    pub async fn get_device_attributes(
        &self,
        device_id: &Uuid,
        scope: AttributeScope,
    ) -> Result<Vec<AttributeKv>, Error> {
        let url = self.api_url(&format!(
            "api/plugins/telemetry/DEVICE/{device_id}/values/attributes/{scope}"
        ))?;
        debug!(%device_id, %scope, "fetching device attributes");
        self.get(url).await
    }

    /// Delete the given attribute keys of a device in `scope`.
    ///
    /// `DELETE /api/plugins/telemetry/DEVICE/{id}/{scope}?keys=k1,k2`
    ///
    /// The platform splits `keys` on `,`, so a key containing one would
    /// address other attributes. Such keys are refused before any request.
    pub async fn delete_device_attributes(
        &self,
        device_id: &Uuid,
        scope: AttributeScope,
        keys: &[String],
    ) -> Result<(), Error> {
        if let Some(key) = keys.iter().find(|key| key.contains(',')) {
            return Err(Error::InvalidAttributeKey { key: key.clone() });
        }
        let mut url = self.api_url(&format!("api/plugins/telemetry/DEVICE/{device_id}/{scope}"))?;
        url.query_pairs_mut().append_pair("keys", &keys.join(","));
        debug!(%device_id, %scope, count = keys.len(), "deleting device attributes");
        self.delete_empty(url).await
    }

    /// Create or overwrite attributes of a device in `scope`.
    ///
    /// `POST /api/plugins/telemetry/DEVICE/{id}/attributes/{scope}` with a
    /// flat JSON object body. Keys not present in the body are left alone.
    pub async fn save_device_attributes(
        &self,
        device_id: &Uuid,
        scope: AttributeScope,
        attributes: &Map<String, Value>,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!(
            "api/plugins/telemetry/DEVICE/{device_id}/attributes/{scope}"
        ))?;
        debug!(%device_id, %scope, count = attributes.len(), "saving device attributes");
        self.post_empty(url, attributes).await
    }
}
