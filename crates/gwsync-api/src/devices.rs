// Tenant device endpoints

use tracing::debug;

use crate::client::ThingsBoardClient;
use crate::error::Error;
use crate::models::Device;

impl ThingsBoardClient {
    /// Look up a tenant device by its exact name.
    ///
    /// `GET /api/tenant/devices?deviceName={name}`. ThingsBoard answers 404
    /// when no device carries that name; that surfaces as
    /// [`Error::NotFound`].
    pub async fn get_tenant_device(&self, name: &str) -> Result<Device, Error> {
        let mut url = self.api_url("api/tenant/devices")?;
        url.query_pairs_mut().append_pair("deviceName", name);
        debug!(name, "fetching tenant device");

        self.get(url).await.map_err(|e| match e {
            Error::NotFound { .. } => Error::NotFound {
                resource: format!("device '{name}'"),
            },
            other => other,
        })
    }
}
