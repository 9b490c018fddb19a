use crate::device::Device;
use crate::directory::list_all_devices;

#[derive(clap::Parser, Debug, PartialEq)]
pub struct ListCommand {}

impl ListCommand {
    pub async fn run(&self, args: &crate::Args) -> anyhow::Result<()> {
        let client = args.api_args.client()?;
        let devices = list_all_devices(&client).await;
        print!("{}", format_listing(&devices));
        Ok(())
    }
}

fn format_listing(devices: &[Device]) -> String {
    if devices.is_empty() {
        return "No devices returned.\n".to_string();
    }

    let mut text = "Found devices:\n".to_string();
    for (idx, device) in devices.iter().enumerate() {
        text.push_str(&format!("[{idx}] {device}\n"));
    }
    text
}
