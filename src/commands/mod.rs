use crate::device::Device;
use crate::directory::list_all_devices;
use crate::transport::GoveeTransport;

pub mod control;
pub mod list;
pub mod sunrise;

#[derive(clap::Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceIndex {
    /// Position of the device as shown by the `list` subcommand
    #[arg(default_value_t = 0)]
    pub index: usize,
}

impl DeviceIndex {
    /// Resolves the index against a fresh listing. When there is no
    /// such device, explains why on stdout and returns None.
    pub async fn resolve<T: GoveeTransport + ?Sized>(&self, transport: &T) -> Option<Device> {
        let mut devices = list_all_devices(transport).await;
        self.select(&mut devices)
    }

    fn select(&self, devices: &mut Vec<Device>) -> Option<Device> {
        if devices.is_empty() {
            println!("No devices returned. Run: govee-sunrise list");
            return None;
        }
        if self.index >= devices.len() {
            println!(
                "Device index {} not found. Run: govee-sunrise list",
                self.index
            );
            return None;
        }
        Some(devices.swap_remove(self.index))
    }
}

/// Accepts any finite number
pub fn finite_number(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|err| format!("{s} is not a number: {err}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{s} is not a finite number"))
    }
}
