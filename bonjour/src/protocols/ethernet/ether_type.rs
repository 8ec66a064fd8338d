use nom::IResult;
use nom::Parser;
use nom::number::be_u16;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, Serialize, Deserialize, PartialEq)]
pub enum EtherType {
    Arp,
    Ipv4,
    Ipv6,
    Lldp,
    Vlan,
    QinQ,
    Unknown(u16),
}

impl EtherType {
    pub fn value(&self) -> u16 {
        match self {
            Self::Arp => 0x0806,
            Self::Ipv4 => 0x0800,
            Self::Ipv6 => 0x86DD,
            Self::Lldp => 0x88CC,
            Self::Vlan => 0x8100,
            Self::QinQ => 0x88A8,
            Self::Unknown(value) => *value,
        }
    }

    /// 802.1Q customer tag or 802.1ad service tag.
    pub fn is_vlan_tag(&self) -> bool {
        matches!(self, Self::Vlan | Self::QinQ)
    }
}

impl From<u16> for EtherType {
    fn from(value: u16) -> Self {
        match value {
            0x0806 => Self::Arp,
            0x0800 => Self::Ipv4,
            0x86DD => Self::Ipv6,
            0x88CC => Self::Lldp,
            0x8100 => Self::Vlan,
            0x88A8 => Self::QinQ,
            _ => Self::Unknown(value),
        }
    }
}

impl std::fmt::Display for EtherType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(value) => write!(f, "Unknown (0x{:04X})", value),
            _ => write!(f, "{:?} (0x{:04X})", self, self.value()),
        }
    }
}

pub fn parse(input: &[u8]) -> IResult<&[u8], EtherType> {
    let (input, ether_type) = be_u16().parse(input)?;

    Ok((input, EtherType::from(ether_type)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_known_values() {
        for ether_type in [
            EtherType::Arp,
            EtherType::Ipv4,
            EtherType::Ipv6,
            EtherType::Lldp,
            EtherType::Vlan,
            EtherType::QinQ,
        ] {
            assert_eq!(EtherType::from(ether_type.value()), ether_type);
        }
    }

    #[test]
    fn test_vlan_tags() {
        assert!(EtherType::Vlan.is_vlan_tag());
        assert!(EtherType::QinQ.is_vlan_tag());
        assert!(!EtherType::Ipv4.is_vlan_tag());
    }

    #[test]
    fn test_display() {
        assert_eq!(EtherType::Ipv6.to_string(), "Ipv6 (0x86DD)");
        assert_eq!(EtherType::Unknown(0x1234).to_string(), "Unknown (0x1234)");
    }
}
