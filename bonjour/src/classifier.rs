use crate::extract::{self, ExtractError};
use crate::frame::DecodedFrame;
use crate::protocols::dns;
use crate::protocols::ethernet::mac::MacAddress;
use crate::protocols::ip::protocol::IpNextLevelProtocol;
use std::sync::Arc;
use thiserror::Error;

/// Frame recognized as Bonjour (mDNS) traffic.
#[derive(Clone, Debug)]
pub struct BonjourClassification {
    pub frame: Arc<DecodedFrame>,
    pub vlan_identifier: Option<u16>,
    pub source_mac: MacAddress,
    pub is_query: bool,
}

impl PartialEq for BonjourClassification {
    fn eq(&self, other: &Self) -> bool {
        self.vlan_identifier == other.vlan_identifier
            && self.source_mac == other.source_mac
            && self.is_query == other.is_query
            && self.frame.layers_eq(&other.frame)
    }
}

pub fn classify(frame: &Arc<DecodedFrame>) -> Option<BonjourClassification> {
    check(frame).ok()
}

/// Classifies the frame, naming the first step that rejected it.
pub fn check(frame: &Arc<DecodedFrame>) -> Result<BonjourClassification, Rejection> {
    let result = evaluate(frame);
    if let Err(rejection) = &result {
        log::trace!("Frame skipped: {rejection}");
    }

    result
}

fn evaluate(frame: &Arc<DecodedFrame>) -> Result<BonjourClassification, Rejection> {
    let (source_mac, _) = extract::ethernet(frame).map_err(|_| Rejection::NoEthernet)?;
    let source_mac = *source_mac;

    let vlan_identifier = extract::vlan_tag(frame).map(|vlan| vlan.identifier);

    extract::ip_version(frame).map_err(|_| Rejection::NotIp)?;
    let protocol = extract::transport_protocol(frame).map_err(|_| Rejection::NotIp)?;
    if *protocol != IpNextLevelProtocol::UDP {
        return Err(Rejection::NotUdp);
    }

    let udp = extract::udp(frame).map_err(|_| Rejection::NotUdp)?;
    if !udp.is_between(dns::PORT_MDNS) {
        return Err(Rejection::WrongPorts {
            port_source: udp.port_source,
            port_destination: udp.port_destination,
        });
    }

    let is_query = extract::dns_message(frame)
        .and_then(extract::query_flag)
        .map_err(Rejection::Dns)?;

    Ok(BonjourClassification {
        frame: Arc::clone(frame),
        vlan_identifier,
        source_mac,
        is_query,
    })
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Rejection {
    #[error("No Ethernet header.")]
    NoEthernet,

    #[error("Not an IP packet.")]
    NotIp,

    #[error("Not a UDP datagram.")]
    NotUdp,

    #[error("Ports {port_source} -> {port_destination} are not mDNS.")]
    WrongPorts {
        port_source: u16,
        port_destination: u16,
    },

    #[error("DNS payload rejected: {0}")]
    Dns(ExtractError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::ip::version::IpVersion;
    use crate::test_utils::{self, FrameBuilder};

    #[test]
    fn test_ipv4_query() {
        let frame = FrameBuilder::mdns(IpVersion::IPv4, true).decoded();

        let classification = classify(&frame).unwrap();
        assert_eq!(classification.vlan_identifier, Some(test_utils::VLAN_IDENTIFIER));
        assert_eq!(classification.source_mac, MacAddress(test_utils::SOURCE_MAC));
        assert!(classification.is_query);
        assert!(Arc::ptr_eq(&classification.frame, &frame));
    }

    #[test]
    fn test_ipv6_answer() {
        let frame = FrameBuilder::mdns(IpVersion::IPv6, false).decoded();

        let classification = classify(&frame).unwrap();
        assert!(!classification.is_query);
        assert!(classification.frame.ipv6().is_some());
    }

    #[test]
    fn test_untagged_and_zero_tag_differ() {
        let untagged = classify(&FrameBuilder::mdns(IpVersion::IPv4, true).vlan(None).decoded());
        let zero = classify(&FrameBuilder::mdns(IpVersion::IPv4, true).vlan(Some(0)).decoded());

        assert_eq!(untagged.as_ref().unwrap().vlan_identifier, None);
        assert_eq!(zero.as_ref().unwrap().vlan_identifier, Some(0));
        assert_ne!(untagged, zero);
    }

    #[test]
    fn test_wrong_ports() {
        let frame = FrameBuilder::mdns(IpVersion::IPv4, true).ports(5353, 53).decoded();
        assert_eq!(
            check(&frame),
            Err(Rejection::WrongPorts {
                port_source: 5353,
                port_destination: 53
            })
        );

        let frame = FrameBuilder::mdns(IpVersion::IPv6, true).ports(49152, 5353).decoded();
        assert!(classify(&frame).is_none());
    }

    #[test]
    fn test_wrong_ports_leave_dns_unparsed() {
        let frame = FrameBuilder::mdns(IpVersion::IPv4, true).ports(5353, 5354).decoded();

        assert!(classify(&frame).is_none());
        assert!(!frame.is_materialized(crate::protocols::LayerId::DNS));
    }

    #[test]
    fn test_not_udp() {
        let frame = FrameBuilder::mdns(IpVersion::IPv4, true).transport(6).decoded();
        assert_eq!(check(&frame), Err(Rejection::NotUdp));
    }

    #[test]
    fn test_not_ip() {
        let mut data = FrameBuilder::mdns(IpVersion::IPv4, true).vlan(None).build();
        // ARP EtherType
        data[12] = 0x08;
        data[13] = 0x06;
        let mut raw = FrameBuilder::mdns(IpVersion::IPv4, true).raw();
        raw.data = data;

        let frame = Arc::new(DecodedFrame::new(raw));
        assert_eq!(check(&frame), Err(Rejection::NotIp));
    }

    #[test]
    fn test_no_ethernet() {
        let mut raw = FrameBuilder::mdns(IpVersion::IPv4, true).raw();
        raw.data.truncate(6);

        let frame = Arc::new(DecodedFrame::new(raw));
        assert_eq!(check(&frame), Err(Rejection::NoEthernet));
    }

    #[test]
    fn test_dns_rejections() {
        let garbage = FrameBuilder::mdns(IpVersion::IPv4, true)
            .payload(vec![0xDE, 0xAD, 0xBE, 0xEF])
            .decoded();
        assert_eq!(check(&garbage), Err(Rejection::Dns(ExtractError::NotDns)));

        let empty_query = FrameBuilder::mdns(IpVersion::IPv4, true)
            .payload(vec![0x00; 12])
            .decoded();
        assert_eq!(
            check(&empty_query),
            Err(Rejection::Dns(ExtractError::UndecidedDns))
        );
    }

    #[test]
    fn test_trailing_bytes_after_dns_message() {
        let mut payload = test_utils::dns_query("example.com");
        payload.extend_from_slice(&[0x00, 0x00]);
        let frame = FrameBuilder::mdns(IpVersion::IPv4, true).payload(payload).decoded();

        let classification = classify(&frame).unwrap();
        assert!(classification.is_query);
    }

    #[test]
    fn test_reserved_vlan_identifier_is_kept() {
        let frame = FrameBuilder::mdns(IpVersion::IPv4, true).vlan(Some(0x0FFF)).decoded();

        assert_eq!(frame.vlan().map(|vlan| vlan.identifier), Some(0x0FFF));
        assert!(frame.udp().is_some());

        let classification = check(&frame).unwrap();
        assert_eq!(classification.vlan_identifier, Some(0x0FFF));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let frame = FrameBuilder::mdns(IpVersion::IPv6, true).decoded();

        let first = classify(&frame);
        let second = classify(&frame);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_equality_across_captures() {
        let builder = FrameBuilder::mdns(IpVersion::IPv4, true);
        let first = classify(&builder.decoded()).unwrap();

        let mut raw = builder.raw();
        raw.header.tv_usec = 999;
        let second = classify(&Arc::new(DecodedFrame::new(raw))).unwrap();

        assert_eq!(first, second);
    }
}
