use crate::platform_api::HttpDeviceInfo;
use crate::rest_api::RestDeviceInfo;

/// A device as reported by one of the two Govee APIs.
/// The same physical device may be reported by both; each report
/// is a distinct entry with its own identity key.
#[derive(Clone, Debug, PartialEq)]
pub enum Device {
    Legacy(RestDeviceInfo),
    OpenApi(HttpDeviceInfo),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Protocol {
    Legacy,
    OpenApi,
}

impl Device {
    pub fn protocol(&self) -> Protocol {
        match self {
            Self::Legacy(_) => Protocol::Legacy,
            Self::OpenApi(_) => Protocol::OpenApi,
        }
    }

    pub fn device_id(&self) -> &str {
        match self {
            Self::Legacy(info) => &info.device,
            Self::OpenApi(info) => &info.device,
        }
    }

    /// The model number for legacy devices, or the sku for the
    /// platform API; they are the same kind of identifier.
    pub fn sku(&self) -> &str {
        match self {
            Self::Legacy(info) => &info.model,
            Self::OpenApi(info) => &info.sku,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Legacy(info) => info.device_name.as_deref(),
            Self::OpenApi(info) => info.device_name.as_deref(),
        }
    }

    /// `protocol:device:sku`; unique within a directory listing
    pub fn identity_key(&self) -> String {
        format!("{}:{}:{}", self.protocol(), self.device_id(), self.sku())
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            fmt,
            "{} | {} | device={} | model/sku={}",
            self.name().unwrap_or("(no name)"),
            self.protocol(),
            self.device_id(),
            self.sku()
        )
    }
}

impl From<RestDeviceInfo> for Device {
    fn from(info: RestDeviceInfo) -> Self {
        Self::Legacy(info)
    }
}

impl From<HttpDeviceInfo> for Device {
    fn from(info: HttpDeviceInfo) -> Self {
        Self::OpenApi(info)
    }
}
