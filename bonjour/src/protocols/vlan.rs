use crate::parser;
use crate::protocols::ethernet::ether_type;
use crate::protocols::ethernet::ether_type::EtherType;
use nom::{IResult, bits};
use serde::{Deserialize, Serialize};

// 802.1Q VLAN Tag
// IEEE 802.1Q: https://standards.ieee.org/ieee/802.1Q/10323/
// The TPID (0x8100 / 0x88A8) is the EtherType of the enclosing header.
pub const LENGTH_BYTES: usize = 4;

pub const PRIORITY_LENGTH_BITS: usize = 3;
pub const DROP_ELIGIBLE_LENGTH_BITS: usize = 1;
pub const IDENTIFIER_LENGTH_BITS: usize = 12;

pub fn parse(bytes: &[u8]) -> IResult<&[u8], Vlan> {
    // Priority Code Point (3 bits), Drop Eligible Indicator (1 bit), VLAN Identifier (12 bits)
    let (rest, (priority, dei, identifier)): (&[u8], (u8, u8, u16)) =
        bits::bits::<_, _, nom::error::Error<_>, _, _>((
            bits::complete::take(PRIORITY_LENGTH_BITS),
            bits::complete::take(DROP_ELIGIBLE_LENGTH_BITS),
            bits::complete::take(IDENTIFIER_LENGTH_BITS),
        ))(bytes)?;
    let drop_eligible = parser::cast_to_bool(dei).map_err(|err| err.to_nom(bytes))?;

    // Encapsulated EtherType (2 bytes)
    let (payload, ether_type) = ether_type::parse(rest)?;

    let protocol = Vlan {
        priority,
        drop_eligible,
        identifier,
        ether_type,
    };

    Ok((payload, protocol))
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Vlan {
    pub priority: u8,
    pub drop_eligible: bool,
    pub identifier: u16,
    pub ether_type: EtherType,
}

impl Vlan {
    /// Identifier 0 carries priority only, the frame belongs to the native VLAN.
    pub fn is_priority_tag(&self) -> bool {
        self.identifier == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vlan_identifier_30_ipv4() {
        let hex_actual = "00 1E 08 00 45".replace(" ", "");
        let bytes = hex::decode(hex_actual).unwrap();

        let (rest, actual) = parse(&bytes).unwrap();
        let expected = Vlan {
            priority: 0,
            drop_eligible: false,
            identifier: 30,
            ether_type: EtherType::Ipv4,
        };

        assert_eq!(actual, expected);
        assert_eq!(rest, &[0x45]);
    }

    #[test]
    fn test_vlan_priority_and_dei() {
        // PCP 5, DEI 1, VID 0x123
        let hex_actual = "B1 23 86 DD".replace(" ", "");
        let bytes = hex::decode(hex_actual).unwrap();

        let (_, actual) = parse(&bytes).unwrap();
        assert_eq!(actual.priority, 5);
        assert!(actual.drop_eligible);
        assert_eq!(actual.identifier, 0x123);
        assert_eq!(actual.ether_type, EtherType::Ipv6);
    }

    #[test]
    fn test_vlan_priority_tag() {
        let hex_actual = "60 00 08 00".replace(" ", "");
        let bytes = hex::decode(hex_actual).unwrap();

        let (_, actual) = parse(&bytes).unwrap();
        assert_eq!(actual.identifier, 0);
        assert!(actual.is_priority_tag());
    }

    #[test]
    fn test_vlan_reserved_identifier() {
        let hex_actual = "0F FF 08 00".replace(" ", "");
        let bytes = hex::decode(hex_actual).unwrap();

        let (_, actual) = parse(&bytes).unwrap();
        assert_eq!(actual.identifier, 0x0FFF);
        assert_eq!(actual.ether_type, EtherType::Ipv4);
        assert!(!actual.is_priority_tag());
    }

    #[test]
    fn test_vlan_truncated() {
        assert!(parse(&[0x00, 0x1E, 0x08]).is_err());
    }
}
