// ── Remote platform collaborator ──
//
// The orchestrator talks to the device platform only through
// `GatewayPlatform`. `ThingsBoardPlatform` is the production
// implementation on top of `gwsync_api::ThingsBoardClient`.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;

use gwsync_api::{AttributeScope, ThingsBoardClient};
use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::error::{CoreError, WritePhase};
use crate::snapshot::RemoteAttributeSnapshot;

/// A gateway resolved to its platform device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayDevice {
    pub name: String,
    pub id: Uuid,
}

impl fmt::Display for GatewayDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Remote operations one gateway pass needs.
pub trait GatewayPlatform {
    /// Map a gateway name to its device. Unknown names fail with
    /// [`CoreError::GatewayNotFound`].
    fn resolve_device_id(
        &self,
        gateway: &str,
    ) -> impl Future<Output = Result<GatewayDevice, CoreError>> + Send;

    /// Current shared-scope attributes of the device.
    fn fetch_attributes(
        &self,
        device: &GatewayDevice,
    ) -> impl Future<Output = Result<RemoteAttributeSnapshot, CoreError>> + Send;

    /// Remove shared-scope attributes by key.
    fn delete_attributes(
        &self,
        device: &GatewayDevice,
        keys: &BTreeSet<String>,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Create or overwrite shared-scope attributes.
    fn upsert_attributes(
        &self,
        device: &GatewayDevice,
        attributes: &Map<String, Value>,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// [`GatewayPlatform`] backed by the ThingsBoard REST API.
pub struct ThingsBoardPlatform {
    client: ThingsBoardClient,
}

impl ThingsBoardPlatform {
    /// Build the HTTP client from `config` and log in.
    ///
    /// Authentication failures are returned as-is so the caller can abort
    /// the run before any gateway is touched.
    pub async fn connect(config: &SyncConfig) -> Result<Self, CoreError> {
        let client = ThingsBoardClient::new(config.url.clone(), &config.transport())?;
        client
            .login(&config.credentials.username, &config.credentials.password)
            .await?;
        info!(url = %config.url, user = %config.credentials.username, "authenticated");
        Ok(Self { client })
    }

    /// Wrap an already-authenticated client.
    pub fn from_client(client: ThingsBoardClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ThingsBoardClient {
        &self.client
    }
}

impl GatewayPlatform for ThingsBoardPlatform {
    async fn resolve_device_id(&self, gateway: &str) -> Result<GatewayDevice, CoreError> {
        match self.client.get_tenant_device(gateway).await {
            Ok(device) => {
                debug!(gateway, id = %device.id.id, "resolved gateway device");
                Ok(GatewayDevice {
                    name: gateway.to_owned(),
                    id: device.id.id,
                })
            }
            Err(e) if e.is_not_found() => Err(CoreError::GatewayNotFound {
                gateway: gateway.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch_attributes(
        &self,
        device: &GatewayDevice,
    ) -> Result<RemoteAttributeSnapshot, CoreError> {
        let attributes = self
            .client
            .get_device_attributes(&device.id, AttributeScope::Shared)
            .await
            .map_err(|e| CoreError::RemoteRead {
                gateway: device.name.clone(),
                message: e.to_string(),
            })?;

        Ok(attributes
            .into_iter()
            .map(|kv| (kv.key, kv.value))
            .collect())
    }

    async fn delete_attributes(
        &self,
        device: &GatewayDevice,
        keys: &BTreeSet<String>,
    ) -> Result<(), CoreError> {
        let keys: Vec<String> = keys.iter().cloned().collect();
        self.client
            .delete_device_attributes(&device.id, AttributeScope::Shared, &keys)
            .await
            .map_err(|e| CoreError::RemoteWrite {
                gateway: device.name.clone(),
                phase: WritePhase::Delete,
                message: e.to_string(),
            })
    }

    async fn upsert_attributes(
        &self,
        device: &GatewayDevice,
        attributes: &Map<String, Value>,
    ) -> Result<(), CoreError> {
        self.client
            .save_device_attributes(&device.id, AttributeScope::Shared, attributes)
            .await
            .map_err(|e| CoreError::RemoteWrite {
                gateway: device.name.clone(),
                phase: WritePhase::Upsert,
                message: e.to_string(),
            })
    }
}
