use crate::device::Device;
use crate::transport::GoveeTransport;
use std::collections::HashSet;

pub async fn list_legacy_devices<T: GoveeTransport + ?Sized>(
    transport: &T,
) -> anyhow::Result<Vec<Device>> {
    let devices = transport.list_legacy_devices().await?;
    Ok(devices.into_iter().map(Device::Legacy).collect())
}

pub async fn list_open_api_devices<T: GoveeTransport + ?Sized>(
    transport: &T,
) -> anyhow::Result<Vec<Device>> {
    let devices = transport.list_open_api_devices().await?;
    Ok(devices.into_iter().map(Device::OpenApi).collect())
}

/// Queries both APIs concurrently and merges the results, legacy
/// devices first. A failing API contributes no devices rather than
/// failing the listing.
pub async fn list_all_devices<T: GoveeTransport + ?Sized>(transport: &T) -> Vec<Device> {
    let (legacy, open_api) = tokio::join!(
        list_legacy_devices(transport),
        list_open_api_devices(transport)
    );

    let legacy = legacy.unwrap_or_else(|err| {
        log::warn!("listing devices via the legacy API: {err:#}");
        vec![]
    });
    let open_api = open_api.unwrap_or_else(|err| {
        log::warn!("listing devices via the platform API: {err:#}");
        vec![]
    });

    dedup_devices(legacy.into_iter().chain(open_api))
}

/// Keeps the first device seen for each identity key
fn dedup_devices<I: IntoIterator<Item = Device>>(devices: I) -> Vec<Device> {
    let mut seen = HashSet::new();
    devices
        .into_iter()
        .filter(|d| seen.insert(d.identity_key()))
        .collect()
}
