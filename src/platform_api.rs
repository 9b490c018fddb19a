use crate::opt_env_var;
use anyhow::Context;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use uuid::Uuid;

// This file implements the Govee Platform API V1 as described at:
// <https://developer.govee.com/reference/get-you-devices>
//
// It is NOT the same thing as the older, but confusingly versioned
// with a higher number, Govee HTTP API v2 that is described at
// <https://govee.readme.io/reference/getlightdeviceinfo>

const SERVER: &str = "https://openapi.api.govee.com";

fn endpoint(url: &str) -> String {
    format!("{SERVER}{url}")
}

#[derive(clap::Parser, Debug)]
pub struct GoveeApiArguments {
    /// The Govee API Key. If not passed here, it will be read from
    /// the GOVEE_API_KEY environment variable, which may also be
    /// set via a .env file in the current directory.
    #[arg(long, global = true)]
    pub api_key: Option<String>,
}

impl GoveeApiArguments {
    pub fn opt_api_key(&self) -> anyhow::Result<Option<String>> {
        match &self.api_key {
            Some(key) => Ok(Some(key.to_string())),
            None => opt_env_var("GOVEE_API_KEY"),
        }
    }

    pub fn api_key(&self) -> anyhow::Result<String> {
        self.opt_api_key()?
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Please specify the api key either via the \
                    --api-key parameter or by setting $GOVEE_API_KEY"
                )
            })
    }
}

#[derive(Clone)]
pub struct GoveeApiClient {
    key: String,
}

impl GoveeApiClient {
    pub fn new<K: Into<String>>(key: K) -> Self {
        Self { key: key.into() }
    }

    pub async fn get_devices(&self) -> anyhow::Result<Vec<HttpDeviceInfo>> {
        let url = endpoint("/router/api/v1/user/devices");
        let resp: JsonValue = self.get_request_with_json_response(url).await?;
        device_list_from_response(&resp)
    }

    pub async fn control_device(&self, control: &OpenApiControl) -> anyhow::Result<JsonValue> {
        let url = endpoint("/router/api/v1/device/control");
        let request = ControlDeviceRequest {
            request_id: Uuid::new_v4().to_string(),
            payload: control,
        };
        log::trace!("platform control: {request:?}");

        let resp: JsonValue = self
            .request_with_json_response(Method::POST, url, &request)
            .await?;

        log::trace!("{} response: {resp:?}", control.capability.instance);

        Ok(resp)
    }
}

/// The listing endpoint has been observed to return the device list
/// under `data`, `payload.devices`, `payload`, or as the top level
/// value. The first of those that is present and non-null is used;
/// if it isn't an array then there are no devices.
fn device_list_from_response(resp: &JsonValue) -> anyhow::Result<Vec<HttpDeviceInfo>> {
    let list = ["/data", "/payload/devices", "/payload"]
        .iter()
        .find_map(|path| resp.pointer(path).filter(|v| !v.is_null()))
        .or_else(|| resp.is_array().then_some(resp));

    match list {
        Some(list) if list.is_array() => {
            Vec::<HttpDeviceInfo>::deserialize(list).context("parsing platform device list")
        }
        _ => Ok(vec![]),
    }
}

#[derive(Serialize, Debug)]
struct ControlDeviceRequest<'a> {
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub payload: &'a OpenApiControl,
}

/// Addresses a single capability instance of a device
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OpenApiControl {
    pub sku: String,
    pub device: String,
    pub capability: ControlDeviceCapability,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ControlDeviceCapability {
    #[serde(rename = "type")]
    pub kind: DeviceCapabilityKind,
    pub instance: String,
    pub value: JsonValue,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct HttpDeviceInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sku: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub device: String,
    #[serde(default, rename = "deviceName")]
    pub device_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capabilities: Vec<DeviceCapability>,
}

impl HttpDeviceInfo {
    pub fn capability_by_instance(&self, instance: &str) -> Option<&DeviceCapability> {
        self.capabilities.iter().find(|c| c.instance == instance)
    }

    /// Returns the declared range of the first capability matching
    /// `instance` that declares one. Each bound falls back independently.
    pub fn capability_range(
        &self,
        instance: &str,
        fallback_min: i64,
        fallback_max: i64,
    ) -> (i64, i64) {
        let range = self
            .capabilities
            .iter()
            .filter(|c| c.instance == instance)
            .find_map(|c| c.parameters.as_ref()?.range.as_ref());

        match range {
            Some(range) => (
                range.min.unwrap_or(fallback_min),
                range.max.unwrap_or(fallback_max),
            ),
            None => (fallback_min, fallback_max),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCapabilityKind {
    #[serde(rename = "devices.capabilities.on_off")]
    OnOff,
    #[serde(rename = "devices.capabilities.toggle")]
    Toggle,
    #[serde(rename = "devices.capabilities.range")]
    Range,
    #[serde(rename = "devices.capabilities.mode")]
    Mode,
    #[serde(rename = "devices.capabilities.color_setting")]
    ColorSetting,
    #[serde(rename = "devices.capabilities.segment_color_setting")]
    SegmentColorSetting,
    #[serde(rename = "devices.capabilities.music_setting")]
    MusicSetting,
    #[serde(rename = "devices.capabilities.dynamic_scene")]
    DynamicScene,
    #[serde(rename = "devices.capabilities.online")]
    Online,
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DeviceCapability {
    #[serde(rename = "type")]
    pub kind: DeviceCapabilityKind,
    pub instance: String,
    #[serde(default)]
    pub parameters: Option<CapabilityParameters>,
}

/// Only the numeric range is interpreted; enum options, struct
/// fields and the like are accepted and ignored.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct CapabilityParameters {
    #[serde(default)]
    pub range: Option<IntegerRange>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegerRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// A non-success response from either Govee API
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request {url} status {status}: {message}")]
    Status {
        url: reqwest::Url,
        status: u16,
        message: String,
    },
}

/// Prefers the `message` or `msg` field that Govee puts in its
/// error bodies, then the canonical reason for the status.
fn error_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    let from_body = serde_json::from_slice::<JsonValue>(body)
        .ok()
        .and_then(|v| {
            ["message", "msg"]
                .iter()
                .find_map(|field| v.get(field)?.as_str().map(|s| s.to_string()))
        })
        .filter(|msg| !msg.is_empty());

    from_body.unwrap_or_else(|| match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("HTTP {}", status.as_u16()),
    })
}

/// Treats an explicit `null` the same as an absent field
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn from_json<T: serde::de::DeserializeOwned, S: AsRef<[u8]>>(text: S) -> anyhow::Result<T> {
    let text = text.as_ref();
    serde_json_path_to_error::from_slice(text)
        .map_err(|err| anyhow::anyhow!("{err}. Input: {}", String::from_utf8_lossy(text)))
}

pub async fn json_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> anyhow::Result<T> {
    let url = response.url().clone();
    let data = response
        .bytes()
        .await
        .with_context(|| format!("read {url} response body"))?;
    from_json(&data).with_context(|| format!("parsing {url} response"))
}

pub async fn http_response_body<R: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> anyhow::Result<R> {
    let url = response.url().clone();

    let status = response.status();
    if !status.is_success() {
        let body_bytes = response.bytes().await.with_context(|| {
            format!(
                "request {url} status {}: {}, and failed to read response body",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
        })?;
        log::trace!(
            "request {url} failed with body: {}",
            String::from_utf8_lossy(&body_bytes)
        );

        return Err(ApiError::Status {
            url,
            status: status.as_u16(),
            message: error_message(status, &body_bytes),
        }
        .into());
    }
    json_body(response).await.with_context(|| {
        format!(
            "request {url} status {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
    })
}

impl GoveeApiClient {
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

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    const LIST_DEVICES_EXAMPLE: &str = r#"{
  "code": 200,
  "message": "success",
  "data": [
    {
      "sku": "H6072",
      "device": "AA:BB:CC:DD:AA:BB:CC:DD",
      "deviceName": "Floor Lamp",
      "type": "devices.types.light",
      "capabilities": [
        {
          "type": "devices.capabilities.on_off",
          "instance": "powerSwitch",
          "parameters": {
            "dataType": "ENUM",
            "options": [
              { "name": "on", "value": 1 },
              { "name": "off", "value": 0 }
            ]
          }
        },
        {
          "type": "devices.capabilities.range",
          "instance": "brightness",
          "parameters": {
            "unit": "unit.percent",
            "dataType": "INTEGER",
            "range": { "min": 1, "max": 100, "precision": 1 }
          }
        },
        {
          "type": "devices.capabilities.color_setting",
          "instance": "colorRgb",
          "parameters": {
            "dataType": "INTEGER",
            "range": { "min": 0, "max": 16777215, "precision": 1 }
          }
        },
        {
          "type": "devices.capabilities.color_setting",
          "instance": "colorTemperatureK",
          "parameters": {
            "dataType": "INTEGER",
            "range": { "min": 2700, "max": 6500, "precision": 1 }
          }
        },
        {
          "type": "devices.capabilities.segment_color_setting",
          "instance": "segmentedBrightness",
          "parameters": {
            "dataType": "STRUCT",
            "fields": [
              {
                "fieldName": "segment",
                "dataType": "Array",
                "elementRange": { "min": 0, "max": 14 },
                "required": true
              }
            ]
          }
        },
        {
          "type": "devices.capabilities.dynamic_scene",
          "instance": "snapshot",
          "parameters": { "dataType": "ENUM", "options": [] }
        },
        {
          "type": "devices.capabilities.event",
          "instance": "lackWaterEvent",
          "alarmType": 51,
          "eventState": { "options": [] }
        }
      ]
    },
    {
      "sku": "H5086",
      "device": "11:22:33:44:55:66:77:88",
      "type": "devices.types.socket",
      "capabilities": []
    }
  ]
}"#;

    #[test]
    fn list_devices() {
        let resp: JsonValue = from_json(LIST_DEVICES_EXAMPLE).unwrap();
        let devices = device_list_from_response(&resp).unwrap();
        k9::assert_equal!(devices.len(), 2);

        let lamp = &devices[0];
        k9::assert_equal!(lamp.sku.as_str(), "H6072");
        k9::assert_equal!(lamp.device_name.as_deref(), Some("Floor Lamp"));
        k9::assert_equal!(lamp.capabilities.len(), 7);
        k9::assert_equal!(lamp.capabilities[6].kind, DeviceCapabilityKind::Other);
        k9::assert_equal!(
            lamp.capability_by_instance("powerSwitch").map(|c| c.kind),
            Some(DeviceCapabilityKind::OnOff)
        );

        let plug = &devices[1];
        assert_eq!(plug.device_name, None);
        assert!(plug.capabilities.is_empty());
    }

    #[test]
    fn alternate_listing_shapes() {
        let device = json!({"sku": "H6008", "device": "01:02", "capabilities": []});

        for resp in [
            json!({"payload": {"devices": [device.clone()]}}),
            json!({"payload": [device.clone()]}),
            json!([device.clone()]),
            json!({"data": null, "payload": {"devices": [device.clone()]}}),
        ] {
            let devices = device_list_from_response(&resp).unwrap();
            k9::assert_equal!(devices.len(), 1);
            k9::assert_equal!(devices[0].sku.as_str(), "H6008");
        }

        for resp in [
            json!({}),
            json!({"data": {"unexpected": true}}),
            json!({"payload": {"devices": null}}),
            json!("nope"),
        ] {
            assert!(device_list_from_response(&resp).unwrap().is_empty());
        }
    }

    #[test]
    fn null_fields_are_tolerated() {
        let resp = json!({"data": [
            {"sku": null, "device": "01:02", "deviceName": null, "capabilities": null},
            {"sku": "H6008", "device": null},
        ]});
        let devices = device_list_from_response(&resp).unwrap();
        k9::assert_equal!(devices.len(), 2);
        k9::assert_equal!(devices[0].sku.as_str(), "");
        k9::assert_equal!(devices[0].device.as_str(), "01:02");
        assert_eq!(devices[0].device_name, None);
        assert!(devices[0].capabilities.is_empty());
        k9::assert_equal!(devices[1].sku.as_str(), "H6008");
        k9::assert_equal!(devices[1].device.as_str(), "");
    }

    #[test]
    fn capability_ranges() {
        let resp: JsonValue = from_json(LIST_DEVICES_EXAMPLE).unwrap();
        let devices = device_list_from_response(&resp).unwrap();
        let lamp = &devices[0];

        k9::assert_equal!(lamp.capability_range("colorTemperatureK", 2000, 9000), (2700, 6500));
        k9::assert_equal!(lamp.capability_range("brightness", 0, 0), (1, 100));
        k9::assert_equal!(lamp.capability_range("powerSwitch", 0, 1), (0, 1));
        k9::assert_equal!(lamp.capability_range("nope", 2000, 9000), (2000, 9000));
        k9::assert_equal!(devices[1].capability_range("colorTemperatureK", 2000, 9000), (2000, 9000));
    }

    #[test]
    fn partial_range_falls_back_per_bound() {
        let device: HttpDeviceInfo = from_json(
            r#"{
            "sku": "H6008",
            "device": "01:02",
            "capabilities": [
                {"type": "devices.capabilities.color_setting", "instance": "colorTemperatureK"},
                {
                    "type": "devices.capabilities.color_setting",
                    "instance": "colorTemperatureK",
                    "parameters": {"range": {"max": 6000}}
                }
            ]
        }"#,
        )
        .unwrap();
        k9::assert_equal!(device.capability_range("colorTemperatureK", 2000, 9000), (2000, 6000));
    }

    #[test]
    fn control_request_encoding() {
        let control = OpenApiControl {
            sku: "H6072".to_string(),
            device: "AA:BB:CC:DD:AA:BB:CC:DD".to_string(),
            capability: ControlDeviceCapability {
                kind: DeviceCapabilityKind::ColorSetting,
                instance: "colorRgb".to_string(),
                value: json!(16711680),
            },
        };
        let request = ControlDeviceRequest {
            request_id: "uuid".to_string(),
            payload: &control,
        };
        k9::assert_equal!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "requestId": "uuid",
                "payload": {
                    "sku": "H6072",
                    "device": "AA:BB:CC:DD:AA:BB:CC:DD",
                    "capability": {
                        "type": "devices.capabilities.color_setting",
                        "instance": "colorRgb",
                        "value": 16711680,
                    }
                }
            })
        );
    }

    #[test]
    fn error_messages() {
        use reqwest::StatusCode;
        k9::assert_equal!(
            error_message(StatusCode::UNAUTHORIZED, br#"{"message": "Invalid API Key"}"#),
            "Invalid API Key"
        );
        k9::assert_equal!(
            error_message(StatusCode::BAD_REQUEST, br#"{"code": 400, "msg": "Parameter error"}"#),
            "Parameter error"
        );
        k9::assert_equal!(
            error_message(StatusCode::TOO_MANY_REQUESTS, b"<html>nope</html>"),
            "Too Many Requests"
        );
    }
}
