// Library lints
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unsafe_code)]

//! Bonjour (mDNS) frame classification.
//!
//! Raw frames are wrapped in a [`frame::DecodedFrame`] whose layers are parsed on first
//! access, classified by [`classifier::classify`] and streamed lazily by
//! [`stream::produce`].

pub use crate::classifier::{BonjourClassification, classify};
pub use crate::frame::{DecodedFrame, FrameHeader, RawFrame};
pub use crate::source::{FrameSource, PcapSource, ReplaySource, SourceError};
pub use crate::stream::{CancelToken, ClassifiedStream, StreamOptions, produce};

pub mod classifier;
pub mod extract;
pub mod frame;
pub mod parser;
pub mod protocols;
pub mod source;
pub mod stream;

#[cfg(test)]
pub(crate) mod test_utils;
