use crate::color::DeviceColor;
use crate::commands::{finite_number, DeviceIndex};
use crate::control::{
    set_brightness, set_color, set_color_temperature, turn_off, turn_on, DeviceCommand,
};

#[derive(clap::Subcommand, Debug, PartialEq)]
pub enum ControlCommand {
    /// Turn a device on
    On {
        #[command(flatten)]
        device: DeviceIndex,
    },
    /// Turn a device off
    Off {
        #[command(flatten)]
        device: DeviceIndex,
    },
    /// Set the brightness percentage. Values outside 1-100
    /// are clamped.
    Brightness {
        #[arg(value_parser = finite_number, allow_negative_numbers = true)]
        percent: f64,
        #[command(flatten)]
        device: DeviceIndex,
    },
    /// Set an RGB color; each channel is clamped to 0-255
    Color {
        #[arg(value_parser = finite_number, allow_negative_numbers = true)]
        r: f64,
        #[arg(value_parser = finite_number, allow_negative_numbers = true)]
        g: f64,
        #[arg(value_parser = finite_number, allow_negative_numbers = true)]
        b: f64,
        #[command(flatten)]
        device: DeviceIndex,
    },
    /// Set the color temperature in kelvin, clamped to the
    /// range supported by the device
    Temperature {
        #[arg(value_parser = finite_number)]
        kelvin: f64,
        #[command(flatten)]
        device: DeviceIndex,
    },
}

impl ControlCommand {
    fn device_index(&self) -> DeviceIndex {
        match self {
            Self::On { device }
            | Self::Off { device }
            | Self::Brightness { device, .. }
            | Self::Color { device, .. }
            | Self::Temperature { device, .. } => *device,
        }
    }

    fn device_command(&self) -> DeviceCommand {
        match self {
            Self::On { .. } => DeviceCommand::TurnOn,
            Self::Off { .. } => DeviceCommand::TurnOff,
            Self::Brightness { percent, .. } => DeviceCommand::SetBrightness(*percent),
            Self::Color { r, g, b, .. } => {
                DeviceCommand::SetColor(DeviceColor::clamped(*r, *g, *b))
            }
            Self::Temperature { kelvin, .. } => DeviceCommand::SetColorTemperature(*kelvin),
        }
    }

    pub async fn run(&self, args: &crate::Args) -> anyhow::Result<()> {
        let client = args.api_args.client()?;
        let Some(device) = self.device_index().resolve(&client).await else {
            return Ok(());
        };

        let result = match self.device_command() {
            DeviceCommand::TurnOn => turn_on(&client, &device).await?,
            DeviceCommand::TurnOff => turn_off(&client, &device).await?,
            DeviceCommand::SetBrightness(percent) => {
                set_brightness(&client, &device, percent).await?
            }
            DeviceCommand::SetColor(color) => set_color(&client, &device, color).await?,
            DeviceCommand::SetColorTemperature(kelvin) => {
                set_color_temperature(&client, &device, kelvin).await?
            }
        };
        log::debug!("{result:#?}");

        println!("OK: {}", self.device_command());
        Ok(())
    }
}
