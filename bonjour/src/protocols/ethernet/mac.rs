use crate::parser::ParserError;
use crate::protocols::ethernet::EthernetError;
use nom::IResult;
use nom::Parser;
use nom::bytes::take;
use serde::{Deserialize, Serialize};
use std::fmt::Formatter;

pub const LENGTH_BYTES: usize = 6;

// RFC 6762, Section 3: 224.0.0.251 and FF02::FB mapped to link-layer groups.
pub const MDNS_V4_MAC: [u8; LENGTH_BYTES] = [0x01, 0x00, 0x5E, 0x00, 0x00, 0xFB];
pub const MDNS_V6_MAC: [u8; LENGTH_BYTES] = [0x33, 0x33, 0x00, 0x00, 0x00, 0xFB];

#[derive(Clone, Copy, Debug, Eq, Hash, Serialize, Deserialize, PartialEq)]
pub struct MacAddress(pub [u8; LENGTH_BYTES]);

impl MacAddress {
    pub fn is_mdns_multicast(&self) -> bool {
        self.0.eq(&MDNS_V4_MAC) || self.0.eq(&MDNS_V6_MAC)
    }

    pub fn octets(&self) -> [u8; LENGTH_BYTES] {
        self.0
    }
}

impl From<[u8; LENGTH_BYTES]> for MacAddress {
    fn from(value: [u8; LENGTH_BYTES]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for MacAddress {
    type Error = EthernetError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes = <[u8; LENGTH_BYTES]>::try_from(value)
            .map_err(|_| EthernetError::MacInvalidBytesLength)?;

        Ok(Self(bytes))
    }
}

impl TryFrom<&str> for MacAddress {
    type Error = EthernetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let digits: String = value
            .chars()
            .filter(|char| !matches!(char, ':' | '-' | '.'))
            .collect();
        let bytes = hex::decode(digits).map_err(|_| EthernetError::MacFailedHexDecode)?;
        let bytes = <[u8; LENGTH_BYTES]>::try_from(bytes)
            .map_err(|_| EthernetError::MacInvalidStringLength)?;

        Ok(Self(bytes))
    }
}

impl std::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

pub fn parse(input: &[u8]) -> IResult<&[u8], MacAddress> {
    let (rest, mac_bytes) = take(LENGTH_BYTES).parse(input)?;
    let mac =
        MacAddress::try_from(mac_bytes).map_err(|_| ParserError::ErrorVerify.to_nom(input))?;

    Ok((rest, mac))
}
