//! Builders for synthetic frames used across the unit tests.

use crate::frame::{DecodedFrame, FrameHeader, RawFrame};
use crate::protocols::ip::version::IpVersion;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

pub const SOURCE_MAC: [u8; 6] = [0xFF, 0xAA, 0xFA, 0xAA, 0xFF, 0xAA];
pub const DESTINATION_MAC: [u8; 6] = [0xBD; 6];
pub const VLAN_IDENTIFIER: u16 = 30;

pub const SOURCE_IPV4: Ipv4Addr = Ipv4Addr::LOCALHOST;
pub const DESTINATION_IPV4: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);
pub const SOURCE_IPV6: Ipv6Addr = Ipv6Addr::LOCALHOST;
pub const DESTINATION_IPV6: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 0xfb);

const PROTOCOL_UDP: u8 = 17;

#[derive(Clone, Debug)]
pub struct FrameBuilder {
    source_mac: [u8; 6],
    destination_mac: [u8; 6],
    vlan: Option<u16>,
    ip_version: IpVersion,
    transport: u8,
    port_source: u16,
    port_destination: u16,
    payload: Vec<u8>,
    padding: usize,
}

impl FrameBuilder {
    /// Ethernet + 802.1Q (30) + IP + UDP (5353 -> 5353) + DNS for `example.com`.
    pub fn mdns(ip_version: IpVersion, is_query: bool) -> Self {
        let payload = match is_query {
            true => dns_query("example.com"),
            false => dns_answer("example.com", Ipv4Addr::new(1, 2, 3, 4)),
        };

        Self {
            source_mac: SOURCE_MAC,
            destination_mac: DESTINATION_MAC,
            vlan: Some(VLAN_IDENTIFIER),
            ip_version,
            transport: PROTOCOL_UDP,
            port_source: 5353,
            port_destination: 5353,
            payload,
            padding: 0,
        }
    }

    pub fn vlan(mut self, vlan: Option<u16>) -> Self {
        self.vlan = vlan;
        self
    }

    pub fn ports(mut self, port_source: u16, port_destination: u16) -> Self {
        self.port_source = port_source;
        self.port_destination = port_destination;
        self
    }

    pub fn transport(mut self, protocol: u8) -> Self {
        self.transport = protocol;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut udp = Vec::with_capacity(8 + self.payload.len());
        udp.extend_from_slice(&self.port_source.to_be_bytes());
        udp.extend_from_slice(&self.port_destination.to_be_bytes());
        udp.extend_from_slice(&(8 + self.payload.len() as u16).to_be_bytes());
        udp.extend_from_slice(&[0x00, 0x00]);
        udp.extend_from_slice(&self.payload);

        let (ether_type, mut network): (u16, Vec<u8>) = match self.ip_version {
            IpVersion::IPv4 => {
                let mut header = vec![0x45, 0x00];
                header.extend_from_slice(&(20 + udp.len() as u16).to_be_bytes());
                header.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0xFF, self.transport]);
                header.extend_from_slice(&[0x00, 0x00]);
                header.extend_from_slice(&SOURCE_IPV4.octets());
                header.extend_from_slice(&DESTINATION_IPV4.octets());
                (0x0800, header)
            },
            IpVersion::IPv6 => {
                let mut header = vec![0x60, 0x00, 0x00, 0x00];
                header.extend_from_slice(&(udp.len() as u16).to_be_bytes());
                header.extend_from_slice(&[self.transport, 0xFF]);
                header.extend_from_slice(&SOURCE_IPV6.octets());
                header.extend_from_slice(&DESTINATION_IPV6.octets());
                (0x86DD, header)
            },
        };
        network.extend_from_slice(&udp);

        let mut frame = Vec::with_capacity(18 + network.len() + self.padding);
        frame.extend_from_slice(&self.destination_mac);
        frame.extend_from_slice(&self.source_mac);
        if let Some(identifier) = self.vlan {
            frame.extend_from_slice(&0x8100u16.to_be_bytes());
            frame.extend_from_slice(&identifier.to_be_bytes());
        }
        frame.extend_from_slice(&ether_type.to_be_bytes());
        frame.extend_from_slice(&network);
        frame.extend(std::iter::repeat_n(0u8, self.padding));
        frame
    }

    pub fn raw(&self) -> RawFrame {
        let data = self.build();
        let header = FrameHeader {
            tv_sec: 1_700_000_000,
            tv_usec: 0,
            caplen: data.len() as u32,
            len: data.len() as u32,
            interface_index: 0,
        };
        RawFrame::new(header, data)
    }

    pub fn decoded(&self) -> Arc<DecodedFrame> {
        Arc::new(DecodedFrame::new(self.raw()))
    }
}

pub fn encode_name(name: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    for label in name.split('.').filter(|label| !label.is_empty()) {
        bytes.push(label.len() as u8);
        bytes.extend_from_slice(label.as_bytes());
    }
    bytes.push(0);
    bytes
}

/// Standard query with a single `A IN` question.
pub fn dns_query(name: &str) -> Vec<u8> {
    let mut bytes = vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    bytes.extend_from_slice(&encode_name(name));
    bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    bytes
}

/// Response with a single `A IN` answer, TTL 1024.
pub fn dns_answer(name: &str, address: Ipv4Addr) -> Vec<u8> {
    let mut bytes = vec![0x00, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00];
    bytes.extend_from_slice(&encode_name(name));
    bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    bytes.extend_from_slice(&1024u32.to_be_bytes());
    bytes.extend_from_slice(&4u16.to_be_bytes());
    bytes.extend_from_slice(&address.octets());
    bytes
}
