//! Stateless extractors pulling the fields the classifier needs out of a decoded frame.
//!
//! Every extractor resolves only the layers on its own path, so untouched layers stay
//! unparsed.

use crate::frame::DecodedFrame;
use crate::protocols::LayerId;
use crate::protocols::dns::{self, DNS};
use crate::protocols::ethernet::mac::MacAddress;
use crate::protocols::ip::protocol::IpNextLevelProtocol;
use crate::protocols::ip::version::IpVersion;
use crate::protocols::udp::UDP;
use crate::protocols::vlan::Vlan;
use thiserror::Error;

/// Source and destination MAC addresses.
pub fn ethernet(frame: &DecodedFrame) -> Result<(&MacAddress, &MacAddress), ExtractError> {
    let ethernet = frame
        .ethernet()
        .ok_or(ExtractError::MissingLayer(LayerId::Ethernet))?;

    Ok((&ethernet.source_mac, &ethernet.destination_mac))
}

pub fn vlan_tag(frame: &DecodedFrame) -> Option<&Vlan> {
    frame.vlan()
}

pub fn ip_version(frame: &DecodedFrame) -> Result<IpVersion, ExtractError> {
    if frame.ipv4().is_some() {
        return Ok(IpVersion::IPv4);
    }
    if frame.ipv6().is_some() {
        return Ok(IpVersion::IPv6);
    }

    Err(ExtractError::MissingLayer(LayerId::IPv4))
}

/// Protocol carried by whichever IP layer the frame has.
pub fn transport_protocol(frame: &DecodedFrame) -> Result<&IpNextLevelProtocol, ExtractError> {
    if let Some(ipv4) = frame.ipv4() {
        return Ok(&ipv4.protocol_inner);
    }
    if let Some(ipv6) = frame.ipv6() {
        return Ok(&ipv6.next_header);
    }

    Err(ExtractError::MissingLayer(LayerId::IPv4))
}

pub fn udp(frame: &DecodedFrame) -> Result<&UDP, ExtractError> {
    frame.udp().ok_or(ExtractError::MissingLayer(LayerId::UDP))
}

pub fn udp_payload(frame: &DecodedFrame) -> Result<&[u8], ExtractError> {
    frame
        .payload::<UDP>()
        .ok_or(ExtractError::MissingLayer(LayerId::UDP))
}

/// DNS layer decoded from the UDP payload and memoized in the frame.
pub fn dns_message(frame: &DecodedFrame) -> Result<&DNS, ExtractError> {
    udp_payload(frame)?;

    frame.dns().ok_or(ExtractError::NotDns)
}

/// `true` for a query, `false` for an answer.
pub fn query_flag(message: &DNS) -> Result<bool, ExtractError> {
    message.query_flag().ok_or(ExtractError::UndecidedDns)
}

/// Query flag of a payload that is not attached to a frame.
pub fn dns_query_flag(payload: &[u8]) -> Result<bool, ExtractError> {
    let (_, message) = dns::parse(payload).map_err(|_| ExtractError::NotDns)?;

    query_flag(&message)
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("Layer is missing: {0}.")]
    MissingLayer(LayerId),

    #[error("Payload is not a DNS message.")]
    NotDns,

    #[error("DNS message is neither a query nor an answer.")]
    UndecidedDns,
}
