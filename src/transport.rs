use crate::platform_api::{GoveeApiArguments, GoveeApiClient, HttpDeviceInfo, OpenApiControl};
use crate::rest_api::{LegacyCommand, RestApiClient, RestDeviceInfo};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// The requests the rest of the crate needs to make against
/// the two Govee cloud APIs.
#[async_trait]
pub trait GoveeTransport: Send + Sync {
    async fn control_legacy(
        &self,
        device: &str,
        model: &str,
        cmd: &LegacyCommand,
    ) -> anyhow::Result<JsonValue>;

    async fn control_open_api(&self, control: &OpenApiControl) -> anyhow::Result<JsonValue>;

    async fn list_legacy_devices(&self) -> anyhow::Result<Vec<RestDeviceInfo>>;

    async fn list_open_api_devices(&self) -> anyhow::Result<Vec<HttpDeviceInfo>>;
}

/// Talks to both APIs using the same API key
#[derive(Clone)]
pub struct GoveeClient {
    rest: RestApiClient,
    platform: GoveeApiClient,
}

impl GoveeClient {
    pub fn new<K: Into<String>>(key: K) -> Self {
        let key = key.into();
        Self {
            rest: RestApiClient::new(key.clone()),
            platform: GoveeApiClient::new(key),
        }
    }
}

impl GoveeApiArguments {
    pub fn client(&self) -> anyhow::Result<GoveeClient> {
        let key = self.api_key()?;
        Ok(GoveeClient::new(key))
    }
}

#[async_trait]
impl GoveeTransport for GoveeClient {
    async fn control_legacy(
        &self,
        device: &str,
        model: &str,
        cmd: &LegacyCommand,
    ) -> anyhow::Result<JsonValue> {
        self.rest.control(device, model, cmd).await
    }

    async fn control_open_api(&self, control: &OpenApiControl) -> anyhow::Result<JsonValue> {
        self.platform.control_device(control).await
    }

    async fn list_legacy_devices(&self) -> anyhow::Result<Vec<RestDeviceInfo>> {
        self.rest.list_devices().await
    }

    async fn list_open_api_devices(&self) -> anyhow::Result<Vec<HttpDeviceInfo>> {
        self.platform.get_devices().await
    }
}
