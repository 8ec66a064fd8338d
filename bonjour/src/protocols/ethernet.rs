use crate::protocols::ethernet::ether_type::EtherType;
use crate::protocols::ethernet::mac::MacAddress;
use nom::IResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Ethernet II
// IEEE 802.3: https://standards.ieee.org/ieee/802.3/7071/
pub const HEADER_LENGTH: usize = 14;

pub fn parse(bytes: &[u8]) -> IResult<&[u8], Ethernet> {
    // Destination MAC. 6 bytes
    let (rest, destination_mac) = mac::parse(bytes)?;
    // Source MAC. 6 bytes
    let (rest, source_mac) = mac::parse(rest)?;
    // EtherType. 2 bytes
    let (payload, ether_type) = ether_type::parse(rest)?;

    let protocol = Ethernet {
        destination_mac,
        source_mac,
        ether_type,
    };

    Ok((payload, protocol))
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Ethernet {
    pub destination_mac: MacAddress,
    pub source_mac: MacAddress,
    pub ether_type: EtherType,
}

#[derive(Debug, Error)]
pub enum EthernetError {
    #[error("Failed to decode MAC address from hex.")]
    MacFailedHexDecode,

    #[error("Invalid MAC address byte length.")]
    MacInvalidBytesLength,

    #[error("Invalid MAC address string length.")]
    MacInvalidStringLength,
}

pub mod ether_type;
pub mod mac;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ethernet_ipv4() {
        let hex_actual = "01 00 5E 00 00 FB 40 61 86 9A F1 F5 08 00 45".replace(" ", "");
        let frame = hex::decode(hex_actual).unwrap();

        let (rest, actual) = parse(&frame).unwrap();
        let expected = Ethernet {
            destination_mac: MacAddress::try_from("01:00:5E:00:00:FB").unwrap(),
            source_mac: MacAddress::try_from("40:61:86:9A:F1:F5").unwrap(),
            ether_type: EtherType::Ipv4,
        };

        assert_eq!(actual, expected);
        assert_eq!(rest, &[0x45]);
        assert!(actual.destination_mac.is_mdns_multicast());
    }

    #[test]
    fn test_ethernet_vlan_tagged() {
        let hex_actual = "BD BD BD BD BD BD FF AA FA AA FF AA 81 00 00 1E 08 00".replace(" ", "");
        let frame = hex::decode(hex_actual).unwrap();

        let (rest, actual) = parse(&frame).unwrap();
        assert_eq!(actual.ether_type, EtherType::Vlan);
        assert_eq!(actual.source_mac.to_string(), "FF:AA:FA:AA:FF:AA");
        assert_eq!(rest.len(), 4);
    }

    #[test]
    fn test_ethernet_unknown_ether_type_is_kept() {
        let hex_actual = "FF FF FF FF FF FF 00 1A 2B 3C 4D 5E 88 8E".replace(" ", "");
        let frame = hex::decode(hex_actual).unwrap();

        let (_, actual) = parse(&frame).unwrap();
        assert_eq!(actual.ether_type, EtherType::Unknown(0x888E));
        assert_eq!(actual.destination_mac, MacAddress([0xFF; 6]));
    }

    #[test]
    fn test_ethernet_truncated() {
        let hex_actual = "FF FF FF FF FF FF 00 1A 2B 3C 4D 5E 08".replace(" ", "");
        let frame = hex::decode(hex_actual).unwrap();

        assert!(parse(&frame).is_err());
    }
}
