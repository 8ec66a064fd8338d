use crate::parser;
use crate::protocols::LayerId;
use crate::protocols::dns::{self, DNS};
use crate::protocols::ethernet::ether_type::EtherType;
use crate::protocols::ethernet::{self, Ethernet};
use crate::protocols::ip::protocol::IpNextLevelProtocol;
use crate::protocols::ipv4::{self, IPv4};
use crate::protocols::ipv6::{self, IPv6};
use crate::protocols::udp::{self, UDP};
use crate::protocols::vlan::{self, Vlan};
use nom::IResult;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::OnceLock;
use strum::IntoEnumIterator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeader {
    pub tv_sec: i64,
    pub tv_usec: i64,
    pub caplen: u32,
    pub len: u32,
    pub interface_index: u32,
}

impl From<&pcap::PacketHeader> for FrameHeader {
    fn from(header: &pcap::PacketHeader) -> Self {
        Self {
            tv_sec: i64::from(header.ts.tv_sec),
            tv_usec: i64::from(header.ts.tv_usec),
            caplen: header.caplen,
            len: header.len,
            interface_index: 0,
        }
    }
}

impl From<&FrameHeader> for pcap::PacketHeader {
    fn from(header: &FrameHeader) -> Self {
        Self {
            ts: libc::timeval {
                tv_sec: header.tv_sec as _,
                tv_usec: header.tv_usec as _,
            },
            caplen: header.caplen,
            len: header.len,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFrame {
    pub header: FrameHeader,
    pub data: Vec<u8>,
}

impl RawFrame {
    pub fn new(header: FrameHeader, data: Vec<u8>) -> Self {
        Self { header, data }
    }
}

impl<'a> From<pcap::Packet<'a>> for RawFrame {
    fn from(packet: pcap::Packet<'a>) -> Self {
        Self {
            header: FrameHeader::from(packet.header),
            data: packet.data.to_vec(),
        }
    }
}

/// A layer that `DecodedFrame` can resolve on demand.
pub trait Layer: Sized + sealed::Sealed {
    const ID: LayerId;

    #[doc(hidden)]
    fn slot(frame: &DecodedFrame) -> &OnceLock<Option<Decoded<Self>>>;

    #[doc(hidden)]
    fn decode(frame: &DecodedFrame) -> Option<Decoded<Self>>;
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Ethernet {}
    impl Sealed for super::Vlan {}
    impl Sealed for super::IPv4 {}
    impl Sealed for super::IPv6 {}
    impl Sealed for super::UDP {}
    impl Sealed for super::DNS {}
}

/// A decoded layer and the byte range of its payload inside the frame.
#[derive(Debug)]
pub struct Decoded<L> {
    layer: L,
    payload: Range<usize>,
}

/// Frame whose layers are decoded on first access and memoized.
///
/// Every slot holds `None` once resolved when the layer is absent or malformed, so a missing
/// layer is never mistaken for a zeroed one.
#[derive(Debug)]
pub struct DecodedFrame {
    raw: RawFrame,

    ethernet: OnceLock<Option<Decoded<Ethernet>>>,
    vlan: OnceLock<Option<Decoded<Vlan>>>,
    ipv4: OnceLock<Option<Decoded<IPv4>>>,
    ipv6: OnceLock<Option<Decoded<IPv6>>>,
    udp: OnceLock<Option<Decoded<UDP>>>,
    dns: OnceLock<Option<Decoded<DNS>>>,
}

impl DecodedFrame {
    pub fn new(raw: RawFrame) -> Self {
        Self {
            raw,
            ethernet: OnceLock::new(),
            vlan: OnceLock::new(),
            ipv4: OnceLock::new(),
            ipv6: OnceLock::new(),
            udp: OnceLock::new(),
            dns: OnceLock::new(),
        }
    }

    pub fn raw(&self) -> &RawFrame {
        &self.raw
    }

    pub fn header(&self) -> &FrameHeader {
        &self.raw.header
    }

    pub fn data(&self) -> &[u8] {
        &self.raw.data
    }

    pub fn layer<L: Layer>(&self) -> Option<&L> {
        self.decoded::<L>().map(|decoded| &decoded.layer)
    }

    /// Bytes carried by the layer `L`, with trailing padding already cut.
    pub fn payload<L: Layer>(&self) -> Option<&[u8]> {
        let decoded = self.decoded::<L>()?;
        self.raw.data.get(decoded.payload.clone())
    }

    pub fn ethernet(&self) -> Option<&Ethernet> {
        self.layer::<Ethernet>()
    }

    pub fn vlan(&self) -> Option<&Vlan> {
        self.layer::<Vlan>()
    }

    pub fn ipv4(&self) -> Option<&IPv4> {
        self.layer::<IPv4>()
    }

    pub fn ipv6(&self) -> Option<&IPv6> {
        self.layer::<IPv6>()
    }

    pub fn udp(&self) -> Option<&UDP> {
        self.layer::<UDP>()
    }

    pub fn dns(&self) -> Option<&DNS> {
        self.layer::<DNS>()
    }

    pub fn is_materialized(&self, id: LayerId) -> bool {
        match id {
            LayerId::Ethernet => self.ethernet.get().is_some(),
            LayerId::Vlan => self.vlan.get().is_some(),
            LayerId::IPv4 => self.ipv4.get().is_some(),
            LayerId::IPv6 => self.ipv6.get().is_some(),
            LayerId::UDP => self.udp.get().is_some(),
            LayerId::DNS => self.dns.get().is_some(),
        }
    }

    /// Layers resolved so far, present or not.
    pub fn materialized(&self) -> Vec<LayerId> {
        LayerId::iter()
            .filter(|id| self.is_materialized(*id))
            .collect()
    }

    /// Compares decoded layer contents, ignoring capture metadata.
    pub fn layers_eq(&self, other: &Self) -> bool {
        self.ethernet() == other.ethernet()
            && self.vlan() == other.vlan()
            && self.ipv4() == other.ipv4()
            && self.ipv6() == other.ipv6()
            && self.udp() == other.udp()
            && self.dns() == other.dns()
    }

    fn decoded<L: Layer>(&self) -> Option<&Decoded<L>> {
        L::slot(self).get_or_init(|| L::decode(self)).as_ref()
    }

    fn decode_in<L>(
        &self, range: Range<usize>, parse: fn(&[u8]) -> IResult<&[u8], L>,
    ) -> Option<Decoded<L>> {
        let input = self.raw.data.get(range.clone())?;
        let (payload, layer) = parse(input).ok()?;
        let start = range.start + parser::offset(input, payload);

        Some(Decoded {
            layer,
            payload: start..start + payload.len(),
        })
    }

    /// EtherType and bytes of the network layer, behind an optional VLAN tag.
    fn network(&self) -> Option<(EtherType, Range<usize>)> {
        let ethernet = self.decoded::<Ethernet>()?;
        if !ethernet.layer.ether_type.is_vlan_tag() {
            return Some((ethernet.layer.ether_type, ethernet.payload.clone()));
        }

        let outer = self.decoded::<Vlan>()?;
        if !outer.layer.ether_type.is_vlan_tag() {
            return Some((outer.layer.ether_type, outer.payload.clone()));
        }

        // Stacked tags: only the outer one is the frame's VLAN
        let inner = self.decode_in(outer.payload.clone(), vlan::parse)?;
        Some((inner.layer.ether_type, inner.payload))
    }

    fn transport(&self) -> Option<(IpNextLevelProtocol, Range<usize>)> {
        if let Some(ipv4) = self.decoded::<IPv4>() {
            // Later fragments carry no transport header
            if !ipv4.layer.is_first_fragment() {
                return None;
            }
            return Some((ipv4.layer.protocol_inner, ipv4.payload.clone()));
        }

        let ipv6 = self.decoded::<IPv6>()?;
        Some((ipv6.layer.next_header, ipv6.payload.clone()))
    }
}

impl PartialEq for DecodedFrame {
    fn eq(&self, other: &Self) -> bool {
        self.layers_eq(other)
    }
}

impl Layer for Ethernet {
    const ID: LayerId = LayerId::Ethernet;

    fn slot(frame: &DecodedFrame) -> &OnceLock<Option<Decoded<Self>>> {
        &frame.ethernet
    }

    fn decode(frame: &DecodedFrame) -> Option<Decoded<Self>> {
        frame.decode_in(0..frame.raw.data.len(), ethernet::parse)
    }
}

impl Layer for Vlan {
    const ID: LayerId = LayerId::Vlan;

    fn slot(frame: &DecodedFrame) -> &OnceLock<Option<Decoded<Self>>> {
        &frame.vlan
    }

    fn decode(frame: &DecodedFrame) -> Option<Decoded<Self>> {
        let ethernet = frame.decoded::<Ethernet>()?;
        if !ethernet.layer.ether_type.is_vlan_tag() {
            return None;
        }

        frame.decode_in(ethernet.payload.clone(), vlan::parse)
    }
}

impl Layer for IPv4 {
    const ID: LayerId = LayerId::IPv4;

    fn slot(frame: &DecodedFrame) -> &OnceLock<Option<Decoded<Self>>> {
        &frame.ipv4
    }

    fn decode(frame: &DecodedFrame) -> Option<Decoded<Self>> {
        match frame.network()? {
            (EtherType::Ipv4, range) => frame.decode_in(range, ipv4::parse),
            _ => None,
        }
    }
}

impl Layer for IPv6 {
    const ID: LayerId = LayerId::IPv6;

    fn slot(frame: &DecodedFrame) -> &OnceLock<Option<Decoded<Self>>> {
        &frame.ipv6
    }

    fn decode(frame: &DecodedFrame) -> Option<Decoded<Self>> {
        match frame.network()? {
            (EtherType::Ipv6, range) => frame.decode_in(range, ipv6::parse),
            _ => None,
        }
    }
}

impl Layer for UDP {
    const ID: LayerId = LayerId::UDP;

    fn slot(frame: &DecodedFrame) -> &OnceLock<Option<Decoded<Self>>> {
        &frame.udp
    }

    fn decode(frame: &DecodedFrame) -> Option<Decoded<Self>> {
        match frame.transport()? {
            (IpNextLevelProtocol::UDP, range) => frame.decode_in(range, udp::parse),
            _ => None,
        }
    }
}

impl Layer for DNS {
    const ID: LayerId = LayerId::DNS;

    fn slot(frame: &DecodedFrame) -> &OnceLock<Option<Decoded<Self>>> {
        &frame.dns
    }

    fn decode(frame: &DecodedFrame) -> Option<Decoded<Self>> {
        let udp = frame.decoded::<UDP>()?;
        frame.decode_in(udp.payload.clone(), dns::parse)
    }
}
