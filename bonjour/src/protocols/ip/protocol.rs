use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

// Assigned Internet Protocol Numbers
// https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml
#[derive(
    Clone, Copy, Debug, Display, Eq, PartialEq, Serialize, Deserialize, FromPrimitive, IntoPrimitive,
)]
#[repr(u8)]
pub enum IpNextLevelProtocol {
    HopByHop = 0,
    ICMP = 1,
    IGMP = 2,
    IPv4 = 4,
    TCP = 6,
    UDP = 17,
    IPv6 = 41,
    Ipv6Route = 43,
    Ipv6Frag = 44,
    ESP = 50,
    AH = 51,
    Ipv6Icmp = 58,
    Ipv6NoNxt = 59,
    Ipv6Opts = 60,
    SCTP = 132,

    #[num_enum(catch_all)]
    Unknown(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_protocols() {
        assert_eq!(IpNextLevelProtocol::from(17), IpNextLevelProtocol::UDP);
        assert_eq!(IpNextLevelProtocol::from(6), IpNextLevelProtocol::TCP);
        assert_eq!(IpNextLevelProtocol::from(58), IpNextLevelProtocol::Ipv6Icmp);
    }

    #[test]
    fn test_unknown_protocol() {
        assert_eq!(IpNextLevelProtocol::from(253), IpNextLevelProtocol::Unknown(253));
        assert_eq!(u8::from(IpNextLevelProtocol::Unknown(253)), 253);
        assert_eq!(u8::from(IpNextLevelProtocol::UDP), 17);
    }
}
