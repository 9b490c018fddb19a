use crate::platform_api::http_response_body;
use reqwest::Method;
use crate::platform_api::null_as_default;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value as JsonValue;
use tokio::time::Duration;

// This file implements the older Govee REST API as described in:
// <https://govee-public.s3.amazonaws.com/developer-docs/GoveeDeveloperAPIReference.pdf>

const SERVER: &str = "https://developer-api.govee.com";

fn endpoint(url: &str) -> String {
    format!("{SERVER}{url}")
}

#[derive(Clone)]
pub struct RestApiClient {
    key: String,
}

impl RestApiClient {
    pub fn new<K: Into<String>>(key: K) -> Self {
        Self { key: key.into() }
    }

    pub async fn list_devices(&self) -> anyhow::Result<Vec<RestDeviceInfo>> {
        let url = endpoint("/v1/devices");
        let resp: GetDevicesResponse = self.get_request_with_json_response(url).await?;
        Ok(resp.devices())
    }

    pub async fn control(
        &self,
        device: &str,
        model: &str,
        cmd: &LegacyCommand,
    ) -> anyhow::Result<JsonValue> {
        let request = ControlRequest { device, model, cmd };
        log::trace!("legacy control: {request:?}");

        let resp: JsonValue = self
            .request_with_json_response(Method::PUT, endpoint("/v1/devices/control"), &request)
            .await?;

        log::trace!("{} response: {resp:?}", cmd.name);

        Ok(resp)
    }

    async fn get_request_with_json_response<T: reqwest::IntoUrl, R: serde::de::DeserializeOwned>(
        &self,
        url: T,
    ) -> anyhow::Result<R> {
        let response = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?
            .request(Method::GET, url)
            .header("Govee-API-Key", &self.key)
            .header("Accept", "application/json")
            .send()
            .await?;

        http_response_body(response).await
    }

    async fn request_with_json_response<
        T: reqwest::IntoUrl,
        B: serde::Serialize,
        R: serde::de::DeserializeOwned,
    >(
        &self,
        method: Method,
        url: T,
        body: &B,
    ) -> anyhow::Result<R> {
        let response = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?
            .request(method, url)
            .header("Govee-API-Key", &self.key)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        http_response_body(response).await
    }
}

#[derive(Serialize, Debug)]
struct ControlRequest<'a> {
    device: &'a str,
    model: &'a str,
    cmd: &'a LegacyCommand,
}

/// A named command for the legacy control endpoint, eg:
/// `{"name": "turn", "value": "on"}`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LegacyCommand {
    pub name: SupportedCommand,
    pub value: JsonValue,
}

impl LegacyCommand {
    pub fn new<V: Into<JsonValue>>(name: SupportedCommand, value: V) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[allow(dead_code)]
struct GetDevicesResponse {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<GetDevicesDeviceList>,
}

impl GetDevicesResponse {
    /// An absent or null device list is treated as empty
    fn devices(self) -> Vec<RestDeviceInfo> {
        self.data
            .and_then(|data| data.devices)
            .unwrap_or_default()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
struct GetDevicesDeviceList {
    #[serde(default)]
    devices: Option<Vec<RestDeviceInfo>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RestDeviceInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub device: String,
    #[serde(rename = "deviceName", default)]
    pub device_name: Option<String>,
    #[serde(rename = "supportCmds", default, deserialize_with = "null_as_default")]
    pub supported_commands: Vec<String>,
    #[serde(default)]
    pub properties: Option<RestDeviceProperties>,
}

impl RestDeviceInfo {
    pub fn supports_command(&self, cmd: SupportedCommand) -> bool {
        self.supported_commands.iter().any(|c| c == cmd.as_ref())
    }

    /// The `properties.colorTem.range` reported by the device, if any
    pub fn declared_color_temperature_range(&self) -> Option<RestRange> {
        self.properties
            .as_ref()?
            .color_temperature
            .as_ref()
            .map(|ct| ct.range)
    }
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RestDeviceProperties {
    #[serde(rename = "colorTem", default)]
    pub color_temperature: Option<ColorTemperatureProperties>,
}

#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ColorTemperatureProperties {
    #[serde(default)]
    pub range: RestRange,
}

/// Either bound may be absent in the listing; callers substitute
/// their own fallback per bound.
#[derive(Default, Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct RestRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::AsRefStr,
    strum_macros::Display,
    strum_macros::EnumString,
)]
pub enum SupportedCommand {
    #[strum(serialize = "turn")]
    Turn,
    #[strum(serialize = "brightness")]
    Brightness,
    #[strum(serialize = "color")]
    Color,
    #[strum(serialize = "colorTem")]
    ColorTemperature,
}

impl Serialize for SupportedCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}
