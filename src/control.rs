use crate::capability::{
    DeviceCapabilities, INSTANCE_BRIGHTNESS, INSTANCE_COLOR_RGB, INSTANCE_COLOR_TEMPERATURE,
    INSTANCE_POWER,
};
use crate::color::{clamp_int, DeviceColor};
use crate::device::Device;
use crate::platform_api::{ControlDeviceCapability, DeviceCapabilityKind, OpenApiControl};
use crate::rest_api::{LegacyCommand, SupportedCommand};
use crate::transport::GoveeTransport;
use serde_json::{json, Value as JsonValue};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeviceCommand {
    TurnOn,
    TurnOff,
    /// Percent; rounded and clamped to `1..=100` when sent
    SetBrightness(f64),
    SetColor(DeviceColor),
    /// Kelvin; rounded and clamped to the device range when sent
    SetColorTemperature(f64),
}

impl std::fmt::Display for DeviceCommand {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::TurnOn => write!(fmt, "on"),
            Self::TurnOff => write!(fmt, "off"),
            Self::SetBrightness(percent) => write!(fmt, "brightness {percent}"),
            Self::SetColor(color) => write!(fmt, "color {color}"),
            Self::SetColorTemperature(kelvin) => write!(fmt, "temperature {kelvin}K"),
        }
    }
}

/// A command encoded for the API that reported the device
#[derive(Clone, Debug, PartialEq)]
pub enum ControlRequest {
    Legacy {
        device: String,
        model: String,
        cmd: LegacyCommand,
    },
    OpenApi(OpenApiControl),
}

impl ControlRequest {
    fn legacy(device: &Device, name: SupportedCommand, value: JsonValue) -> Self {
        Self::Legacy {
            device: device.device_id().to_string(),
            model: device.sku().to_string(),
            cmd: LegacyCommand::new(name, value),
        }
    }

    fn open_api(
        device: &Device,
        kind: DeviceCapabilityKind,
        instance: &str,
        value: JsonValue,
    ) -> Self {
        Self::OpenApi(OpenApiControl {
            sku: device.sku().to_string(),
            device: device.device_id().to_string(),
            capability: ControlDeviceCapability {
                kind,
                instance: instance.to_string(),
                value,
            },
        })
    }
}

impl DeviceCommand {
    pub fn to_request(&self, device: &Device) -> ControlRequest {
        let legacy = matches!(device, Device::Legacy(_));

        match self {
            Self::TurnOn | Self::TurnOff => {
                let on = matches!(self, Self::TurnOn);
                if legacy {
                    ControlRequest::legacy(
                        device,
                        SupportedCommand::Turn,
                        json!(if on { "on" } else { "off" }),
                    )
                } else {
                    ControlRequest::open_api(
                        device,
                        DeviceCapabilityKind::OnOff,
                        INSTANCE_POWER,
                        json!(if on { 1 } else { 0 }),
                    )
                }
            }
            Self::SetBrightness(percent) => {
                let value = json!(clamp_int(*percent, 1, 100));
                if legacy {
                    ControlRequest::legacy(device, SupportedCommand::Brightness, value)
                } else {
                    ControlRequest::open_api(
                        device,
                        DeviceCapabilityKind::Range,
                        INSTANCE_BRIGHTNESS,
                        value,
                    )
                }
            }
            Self::SetColor(color) => {
                if legacy {
                    ControlRequest::legacy(device, SupportedCommand::Color, json!(color))
                } else {
                    ControlRequest::open_api(
                        device,
                        DeviceCapabilityKind::ColorSetting,
                        INSTANCE_COLOR_RGB,
                        json!(color.packed()),
                    )
                }
            }
            Self::SetColorTemperature(kelvin) => {
                let (min, max) = device.color_temperature_range();
                let value = json!(clamp_int(*kelvin, min, max));
                if legacy {
                    ControlRequest::legacy(device, SupportedCommand::ColorTemperature, value)
                } else {
                    ControlRequest::open_api(
                        device,
                        DeviceCapabilityKind::ColorSetting,
                        INSTANCE_COLOR_TEMPERATURE,
                        value,
                    )
                }
            }
        }
    }
}

/// Sends a single command to the device and returns the response.
/// Errors from the transport are passed through as-is.
pub async fn dispatch<T: GoveeTransport + ?Sized>(
    transport: &T,
    device: &Device,
    command: DeviceCommand,
) -> anyhow::Result<JsonValue> {
    log::debug!("{command} -> {}", device.identity_key());
    match command.to_request(device) {
        ControlRequest::Legacy { device, model, cmd } => {
            transport.control_legacy(&device, &model, &cmd).await
        }
        ControlRequest::OpenApi(control) => transport.control_open_api(&control).await,
    }
}

pub async fn turn_on<T: GoveeTransport + ?Sized>(
    transport: &T,
    device: &Device,
) -> anyhow::Result<JsonValue> {
    dispatch(transport, device, DeviceCommand::TurnOn).await
}

pub async fn turn_off<T: GoveeTransport + ?Sized>(
    transport: &T,
    device: &Device,
) -> anyhow::Result<JsonValue> {
    dispatch(transport, device, DeviceCommand::TurnOff).await
}

pub async fn set_brightness<T: GoveeTransport + ?Sized>(
    transport: &T,
    device: &Device,
    percent: f64,
) -> anyhow::Result<JsonValue> {
    dispatch(transport, device, DeviceCommand::SetBrightness(percent)).await
}

pub async fn set_color<T: GoveeTransport + ?Sized>(
    transport: &T,
    device: &Device,
    color: DeviceColor,
) -> anyhow::Result<JsonValue> {
    dispatch(transport, device, DeviceCommand::SetColor(color)).await
}

pub async fn set_color_temperature<T: GoveeTransport + ?Sized>(
    transport: &T,
    device: &Device,
    kelvin: f64,
) -> anyhow::Result<JsonValue> {
    dispatch(transport, device, DeviceCommand::SetColorTemperature(kelvin)).await
}
