use crate::config::Config;
use crate::net::interface::{self, InterfaceError};
use bonjour::{FrameSource, PcapSource};

pub type BoxedSource = Box<dyn FrameSource + Send>;

/// Opens the savefile from the config, otherwise the configured or default device.
pub fn open(config: &Config) -> Result<BoxedSource, InterfaceError> {
    if let Some(path) = &config.capture_file {
        let mut capture = pcap::Capture::from_file(path).map_err(InterfaceError::PcapError)?;
        apply_filter(&mut capture, &config.filter)?;
        log::info!("Reading frames from {}.", path.display());

        let source = PcapSource::new(capture).map_err(InterfaceError::SourceError)?;
        return Ok(Box::new(source));
    }

    let device = match &config.interface {
        Some(name) => interface::get_network_interface(name)?,
        None => interface::default_interface()?,
    };
    log::info!(
        "Capturing on {}.",
        interface::get_network_interface_name(&device)
    );

    let mut capture = pcap::Capture::from_device(device)
        .map_err(InterfaceError::PcapError)?
        .promisc(config.promiscuous)
        .snaplen(config.snapshot_length)
        .timeout(config.timeout_ms)
        .immediate_mode(true)
        .open()
        .map_err(InterfaceError::PcapError)?;
    apply_filter(&mut capture, &config.filter)?;

    let source = PcapSource::new(capture).map_err(InterfaceError::SourceError)?;
    Ok(Box::new(source))
}

fn apply_filter<T: pcap::Activated + ?Sized>(
    capture: &mut pcap::Capture<T>, filter: &str,
) -> Result<(), InterfaceError> {
    if filter.trim().is_empty() {
        return Ok(());
    }

    log::debug!("Capture filter: {filter}");
    capture.filter(filter, true).map_err(InterfaceError::PcapError)
}
