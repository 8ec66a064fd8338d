use crate::parser::ParserError;
use crate::protocols::ip;
use crate::protocols::ip::protocol::IpNextLevelProtocol;
use crate::protocols::ip::version::IpVersion;
use nom::Parser;
use nom::number::{be_u8, be_u16};
use nom::{IResult, bits};
use serde::{Deserialize, Serialize};
use std::net::Ipv6Addr;

// IPv6 Protocol
// RFC 8200: https://datatracker.ietf.org/doc/html/rfc8200

pub const VERSION_LENGTH_BITS: usize = 4;
pub const TRAFFIC_CLASS_LENGTH_BITS: usize = 8;
pub const FLOW_LABEL_LENGTH_BITS: usize = 20;

pub const HEADER_LENGTH: usize = 40;

pub fn parse(bytes: &[u8]) -> IResult<&[u8], IPv6> {
    // Version (4 bits), Traffic Class (8 bits), Flow Label (20 bits)
    let (rest, (version, traffic_class, flow_label)): (&[u8], (u8, u8, u32)) =
        bits::bits::<_, _, nom::error::Error<_>, _, _>((
            bits::complete::take(VERSION_LENGTH_BITS),
            bits::complete::take(TRAFFIC_CLASS_LENGTH_BITS),
            bits::complete::take(FLOW_LABEL_LENGTH_BITS),
        ))(bytes)?;
    if IpVersion::try_from(version) != Ok(IpVersion::IPv6) {
        return Err(ParserError::ErrorVerify.to_nom(bytes));
    }

    // Payload Length (2 bytes)
    let (rest, payload_length) = be_u16().parse(rest)?;

    // Next Header (1 byte)
    let (rest, next_header) = be_u8().parse(rest)?;
    let next_header = IpNextLevelProtocol::from(next_header);

    // Hop Limit (1 byte)
    let (rest, hop_limit) = be_u8().parse(rest)?;

    // Source Address
    let (rest, address_source) = ip::address::v6_parse(rest)?;
    // Destination Address
    let (rest, address_destination) = ip::address::v6_parse(rest)?;

    // Cutting ethernet padding
    let payload = rest
        .get(..usize::from(payload_length))
        .ok_or(ParserError::ErrorVerify.to_nom(bytes))?;

    let protocol = IPv6 {
        version,
        traffic_class,
        flow_label,
        payload_length,
        next_header,
        hop_limit,
        address_source,
        address_destination,
    };

    Ok((payload, protocol))
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct IPv6 {
    pub version: u8,
    pub traffic_class: u8,
    pub flow_label: u32,
    pub payload_length: u16,
    pub next_header: IpNextLevelProtocol,
    pub hop_limit: u8,
    pub address_source: Ipv6Addr,
    pub address_destination: Ipv6Addr,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ipv6_udp_mdns() {
        // fe80::1 -> ff02::fb, UDP, payload of 8 bytes and 4 bytes of padding
        let hex_actual = "60 00 00 00 00 08 11 FF FE 80 00 00 00 00 00 00 00 00 00 00 00 00 00 01 FF 02 00 00 00 00 00 00 00 00 00 00 00 00 00 FB 14 E9 14 E9 00 08 00 00 00 00 00 00".replace(" ", "");
        let bytes = hex::decode(hex_actual).unwrap();

        let (payload, actual) = parse(&bytes).unwrap();
        let expected = IPv6 {
            version: 6,
            traffic_class: 0,
            flow_label: 0,
            payload_length: 8,
            next_header: IpNextLevelProtocol::UDP,
            hop_limit: 255,
            address_source: Ipv6Addr::from_str("fe80::1").unwrap(),
            address_destination: ip::address::MDNS_V6_GROUP,
        };

        assert_eq!(actual, expected);
        assert_eq!(payload, &[0x14, 0xE9, 0x14, 0xE9, 0x00, 0x08, 0x00, 0x00]);
    }

    #[test]
    fn test_ipv6_traffic_class_and_flow_label() {
        let hex_actual = "60 0D 68 4A 00 00 06 40 FC 00 00 02 00 00 00 02 00 00 00 00 00 00 00 01 FC 00 00 02 00 00 00 01 00 00 00 00 00 00 00 01".replace(" ", "");
        let bytes = hex::decode(hex_actual).unwrap();

        let (payload, actual) = parse(&bytes).unwrap();
        assert!(payload.is_empty());
        assert_eq!(actual.traffic_class, 0x00);
        assert_eq!(actual.flow_label, 0xd684a);
        assert_eq!(actual.next_header, IpNextLevelProtocol::TCP);
        assert_eq!(actual.hop_limit, 64);
    }

    #[test]
    fn test_ipv6_wrong_version() {
        let hex_actual = "40 00 00 00 00 00 11 FF FE 80 00 00 00 00 00 00 00 00 00 00 00 00 00 01 FF 02 00 00 00 00 00 00 00 00 00 00 00 00 00 FB".replace(" ", "");
        let bytes = hex::decode(hex_actual).unwrap();

        assert!(parse(&bytes).is_err());
    }
}
