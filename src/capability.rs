use crate::device::Device;
use crate::platform_api::HttpDeviceInfo;
use crate::rest_api::{RestDeviceInfo, SupportedCommand};

pub const INSTANCE_POWER: &str = "powerSwitch";
pub const INSTANCE_BRIGHTNESS: &str = "brightness";
pub const INSTANCE_COLOR_RGB: &str = "colorRgb";
pub const INSTANCE_COLOR_TEMPERATURE: &str = "colorTemperatureK";

/// Used when a device doesn't declare its own color temperature range
pub const DEFAULT_KELVIN_RANGE: (i64, i64) = (2000, 9000);

/// What a device can do, answered from whatever its API reported
pub trait DeviceCapabilities {
    fn supports_rgb(&self) -> bool;
    fn supports_color_temperature(&self) -> bool;
    /// The `(min, max)` kelvin accepted by the device,
    /// defaulting each bound from [DEFAULT_KELVIN_RANGE].
    fn color_temperature_range(&self) -> (i64, i64);
}

impl DeviceCapabilities for RestDeviceInfo {
    fn supports_rgb(&self) -> bool {
        self.supports_command(SupportedCommand::Color)
    }

    fn supports_color_temperature(&self) -> bool {
        self.supports_command(SupportedCommand::ColorTemperature)
    }

    fn color_temperature_range(&self) -> (i64, i64) {
        let (min, max) = DEFAULT_KELVIN_RANGE;
        match self.declared_color_temperature_range() {
            Some(range) => (range.min.unwrap_or(min), range.max.unwrap_or(max)),
            None => (min, max),
        }
    }
}

impl DeviceCapabilities for HttpDeviceInfo {
    fn supports_rgb(&self) -> bool {
        self.capability_by_instance(INSTANCE_COLOR_RGB).is_some()
    }

    fn supports_color_temperature(&self) -> bool {
        self.capability_by_instance(INSTANCE_COLOR_TEMPERATURE)
            .is_some()
    }

    fn color_temperature_range(&self) -> (i64, i64) {
        let (min, max) = DEFAULT_KELVIN_RANGE;
        self.capability_range(INSTANCE_COLOR_TEMPERATURE, min, max)
    }
}

impl DeviceCapabilities for Device {
    fn supports_rgb(&self) -> bool {
        match self {
            Self::Legacy(info) => info.supports_rgb(),
            Self::OpenApi(info) => info.supports_rgb(),
        }
    }

    fn supports_color_temperature(&self) -> bool {
        match self {
            Self::Legacy(info) => info.supports_color_temperature(),
            Self::OpenApi(info) => info.supports_color_temperature(),
        }
    }

    fn color_temperature_range(&self) -> (i64, i64) {
        match self {
            Self::Legacy(info) => info.color_temperature_range(),
            Self::OpenApi(info) => info.color_temperature_range(),
        }
    }
}

/// Returns false when there is no device
#[allow(unused)]
pub fn supports_rgb(device: Option<&Device>) -> bool {
    device.is_some_and(|d| d.supports_rgb())
}

/// Returns false when there is no device
#[allow(unused)]
pub fn supports_color_temperature(device: Option<&Device>) -> bool {
    device.is_some_and(|d| d.supports_color_temperature())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::platform_api::from_json;

    fn legacy(cmds: &[&str]) -> Device {
        Device::Legacy(RestDeviceInfo {
            device: "AA:BB:CC:DD:EE:FF:00:11".to_string(),
            model: "H6159".to_string(),
            supported_commands: cmds.iter().map(|c| c.to_string()).collect(),
            ..RestDeviceInfo::default()
        })
    }

    fn openapi(json: &str) -> Device {
        Device::OpenApi(from_json(json).unwrap())
    }

    #[test]
    fn no_device() {
        assert!(!supports_rgb(None));
        assert!(!supports_color_temperature(None));
    }

    #[test]
    fn legacy_color_only() {
        let device = legacy(&["turn", "brightness", "color"]);
        assert!(supports_rgb(Some(&device)));
        assert!(!supports_color_temperature(Some(&device)));
        k9::assert_equal!(device.color_temperature_range(), (2000, 9000));
    }

    #[test]
    fn legacy_exact_names() {
        let device = legacy(&["Color", "colorTemp", "colortem"]);
        assert!(!device.supports_rgb());
        assert!(!device.supports_color_temperature());

        let device = legacy(&["colorTem"]);
        assert!(!device.supports_rgb());
        assert!(device.supports_color_temperature());
    }

    #[test]
    fn legacy_range_from_properties() {
        let device: RestDeviceInfo = from_json(
            r#"{
            "device": "AA", "model": "H6159",
            "supportCmds": ["colorTem"],
            "properties": {"colorTem": {"range": {"min": 2700, "max": 6500}}}
        }"#,
        )
        .unwrap();
        k9::assert_equal!(Device::from(device).color_temperature_range(), (2700, 6500));

        let device: RestDeviceInfo = from_json(
            r#"{
            "device": "AA", "model": "H6159",
            "properties": {"colorTem": {"range": {"min": 3000}}}
        }"#,
        )
        .unwrap();
        k9::assert_equal!(Device::from(device).color_temperature_range(), (3000, 9000));
    }

    #[test]
    fn openapi_instances() {
        let device = openapi(
            r#"{
            "sku": "H6072", "device": "AA",
            "capabilities": [
                {"type": "devices.capabilities.color_setting", "instance": "colorRgb"},
                {
                    "type": "devices.capabilities.color_setting",
                    "instance": "colorTemperatureK",
                    "parameters": {"dataType": "INTEGER", "range": {"min": 2200, "max": 6500, "precision": 1}}
                }
            ]
        }"#,
        );
        assert!(supports_rgb(Some(&device)));
        assert!(supports_color_temperature(Some(&device)));
        k9::assert_equal!(device.color_temperature_range(), (2200, 6500));

        let device = openapi(
            r#"{
            "sku": "H6072", "device": "AA",
            "capabilities": [
                {"type": "devices.capabilities.color_setting", "instance": "colorTemperature"},
                {"type": "devices.capabilities.color_setting", "instance": "colorrgb"}
            ]
        }"#,
        );
        assert!(!supports_rgb(Some(&device)));
        assert!(!supports_color_temperature(Some(&device)));
        k9::assert_equal!(device.color_temperature_range(), (2000, 9000));
    }
}
