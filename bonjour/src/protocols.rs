use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Layers the classifier knows how to decode, from the link layer up.
///
/// Guide: How to Add a Layer
/// 1. Add it to the `LayerId` enum.
/// 2. Write a parser with the signature `fn(&[u8]) -> IResult<&[u8], YourLayer>` in its own
///    module, e.g., `protocols::custom_layer`. The returned rest is the layer payload.
/// 3. Add a memoized slot for it to `DecodedFrame` and implement `frame::Layer` for the layer
///    type, decoding from the payload of the layer below it.
///
/// That's it! After that, write tests and verify that decoding works correctly.
#[derive(
    Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq, Serialize, Deserialize,
)]
pub enum LayerId {
    Ethernet,
    Vlan,

    IPv4,
    IPv6,

    UDP,

    DNS,
}

pub mod dns;
pub mod ethernet;
pub mod ip {
    pub mod address;
    pub mod protocol;
    pub mod version;
}
pub mod ipv4;
pub mod ipv6;
pub mod udp;
pub mod vlan;
