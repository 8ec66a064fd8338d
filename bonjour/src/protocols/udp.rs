use crate::parser::ParserError;
use nom::IResult;
use nom::Parser;
use nom::number::be_u16;
use serde::{Deserialize, Serialize};

// UDP Protocol
// RFC 768: https://datatracker.ietf.org/doc/html/rfc768

pub const HEADER_LENGTH: usize = 8;

pub fn parse(bytes: &[u8]) -> IResult<&[u8], UDP> {
    // Source port. 2 bytes
    let (rest, port_source) = be_u16().parse(bytes)?;
    // Destination port. 2 bytes
    let (rest, port_destination) = be_u16().parse(rest)?;
    // Length. 2 bytes
    let (rest, length) = be_u16().parse(rest)?;
    // Checksum. 2 bytes
    let (rest, checksum) = be_u16().parse(rest)?;

    // Length covers the header too
    let payload_length = usize::from(length)
        .checked_sub(HEADER_LENGTH)
        .ok_or(ParserError::ErrorVerify.to_nom(bytes))?;
    let payload = rest
        .get(..payload_length)
        .ok_or(ParserError::ErrorVerify.to_nom(bytes))?;

    let protocol = UDP {
        port_source,
        port_destination,
        length,
        checksum,
    };

    Ok((payload, protocol))
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UDP {
    pub port_source: u16,
    pub port_destination: u16,
    pub length: u16,
    pub checksum: u16,
}

impl UDP {
    pub fn is_between(&self, port: u16) -> bool {
        self.port_source == port && self.port_destination == port
    }
}
