use thiserror::Error;

/// Usable interfaces, busiest first. <br>
/// Necessary: Presence of addresses.
pub fn usable_sorted() -> Result<Vec<pcap::Device>, InterfaceError> {
    let devices = pcap::Device::list().map_err(InterfaceError::PcapError)?;

    Ok(sort_usable(devices))
}

fn sort_usable(devices: Vec<pcap::Device>) -> Vec<pcap::Device> {
    let mut interfaces: Vec<pcap::Device> = devices
        .into_iter()
        .filter(|device| !device.addresses.is_empty())
        .collect();

    interfaces.sort_by_key(|device| std::cmp::Reverse(device.addresses.len()));

    interfaces
}

pub fn get_network_interface_name(network_interface: &pcap::Device) -> String {
    #[cfg(target_os = "windows")]
    let name = if let Some(desc) = &network_interface.desc {
        desc.clone()
    } else {
        network_interface.name.clone()
    };

    #[cfg(not(target_os = "windows"))]
    let name = network_interface.name.clone();

    name
}

/// Get `Device` by its name or description.
pub fn get_network_interface(device_name: &str) -> Result<pcap::Device, InterfaceError> {
    let needed_interface = |device: &pcap::Device| {
        device.name == device_name || device.desc.as_deref() == Some(device_name)
    };

    usable_sorted()?
        .into_iter()
        .find(needed_interface)
        .ok_or_else(|| InterfaceError::UnknownInterface(device_name.to_string()))
}

/// Device with the most addresses.
pub fn default_interface() -> Result<pcap::Device, InterfaceError> {
    usable_sorted()?
        .into_iter()
        .next()
        .ok_or(InterfaceError::NoUsableInterfaces)
}

#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("Pcap Library error.")]
    PcapError(pcap::Error),

    #[error("There are no interfaces with config interface name.")]
    UnknownInterface(String),

    #[error("There are no usable interfaces.")]
    NoUsableInterfaces,

    #[error("Capture can't be classified.")]
    SourceError(bonjour::SourceError),
}

impl InterfaceError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            InterfaceError::PcapError(err) => Some(err.to_string()),
            InterfaceError::UnknownInterface(name) => Some(format!("Interface: {name}")),
            InterfaceError::SourceError(err) => Some(err.to_string()),
            InterfaceError::NoUsableInterfaces => None,
        }
    }
}
