use crate::frame::RawFrame;
use std::collections::VecDeque;
use thiserror::Error;

/// Producer of raw link-layer frames.
pub trait FrameSource {
    /// `Ok(None)` marks the end of the stream.
    fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError> {
        (**self).next_frame()
    }
}

/// Live device or savefile opened through libpcap.
pub struct PcapSource<T: pcap::Activated + ?Sized> {
    capture: pcap::Capture<T>,
}

impl<T: pcap::Activated + ?Sized> PcapSource<T> {
    pub fn new(capture: pcap::Capture<T>) -> Result<Self, SourceError> {
        let link_type = capture.get_datalink();
        if link_type != pcap::Linktype::ETHERNET {
            return Err(SourceError::UnsupportedLinkType(link_type.0));
        }

        Ok(Self { capture })
    }
}

impl<T: pcap::Activated + ?Sized> FrameSource for PcapSource<T> {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError> {
        match self.capture.next_packet() {
            Ok(packet) => Ok(Some(RawFrame::from(packet))),
            Err(pcap::Error::NoMorePackets) => Ok(None),
            Err(pcap::Error::TimeoutExpired) => Err(SourceError::Timeout),
            Err(err) => Err(SourceError::Pcap(err)),
        }
    }
}

/// Fixed list of frames, optionally followed by an error.
#[derive(Debug, Default)]
pub struct ReplaySource {
    frames: VecDeque<RawFrame>,
    error: Option<SourceError>,
}

impl ReplaySource {
    pub fn new(frames: impl IntoIterator<Item = RawFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            error: None,
        }
    }

    /// Reported once, after the last frame.
    pub fn with_error(mut self, error: SourceError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError> {
        if let Some(frame) = self.frames.pop_front() {
            return Ok(Some(frame));
        }

        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Pcap library error: {0}")]
    Pcap(#[from] pcap::Error),

    #[error("Read timeout expired.")]
    Timeout,

    #[error("Unsupported link type: {0}. Only Ethernet captures are classified.")]
    UnsupportedLinkType(i32),
}

impl SourceError {
    /// Fatal errors end the stream.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SourceError::Timeout)
    }
}
