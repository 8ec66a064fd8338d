use crate::parser::ParserError;
use crate::protocols::ip;
use crate::protocols::ip::protocol::IpNextLevelProtocol;
use crate::protocols::ip::version::IpVersion;
use nom::Parser;
use nom::number::{be_u8, be_u16};
use nom::{IResult, bits};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

// IPv4 Protocol
// RFC 791: https://datatracker.ietf.org/doc/html/rfc791

pub const VERSION_LENGTH_BITS: usize = 4;
pub const IHL_LENGTH_BITS: usize = 4;
pub const DSCP_LENGTH_BITS: usize = 6;
pub const ECN_LENGTH_BITS: usize = 2;
pub const FLAGS_LENGTH_BITS: usize = 3;
pub const FRAGMENT_OFFSET_LENGTH_BITS: usize = 13;

pub const MIN_HEADER_LENGTH: usize = 20;

pub fn parse(bytes: &[u8]) -> IResult<&[u8], IPv4> {
    // Version (4 bits), IHL (4 bits), DSCP (6 bits), ECN (2 bits)
    let (rest, (version, ihl, dscp, ecn)): (&[u8], (u8, u8, u8, u8)) =
        bits::bits::<_, _, nom::error::Error<_>, _, _>((
            bits::complete::take(VERSION_LENGTH_BITS),
            bits::complete::take(IHL_LENGTH_BITS),
            bits::complete::take(DSCP_LENGTH_BITS),
            bits::complete::take(ECN_LENGTH_BITS),
        ))(bytes)?;
    if IpVersion::try_from(version) != Ok(IpVersion::IPv4) {
        return Err(ParserError::ErrorVerify.to_nom(bytes));
    }
    // IHL is counted in 32-bit words
    let internet_header_length = usize::from(ihl) * 4;
    if internet_header_length < MIN_HEADER_LENGTH {
        return Err(ParserError::FailureVerify.to_nom(bytes));
    }

    // Total Length (2 bytes)
    let (rest, total_length) = be_u16().parse(rest)?;
    if usize::from(total_length) < internet_header_length {
        return Err(ParserError::FailureVerify.to_nom(bytes));
    }

    // Identification (2 bytes)
    let (rest, identification) = be_u16().parse(rest)?;

    // Flags (3 bits), Fragment Offset (13 bits)
    let (rest, (flags, fragment_offset)): (&[u8], (u8, u16)) =
        bits::bits::<_, _, nom::error::Error<_>, _, _>((
            bits::complete::take(FLAGS_LENGTH_BITS),
            bits::complete::take(FRAGMENT_OFFSET_LENGTH_BITS),
        ))(rest)?;

    // Time To Live (1 byte)
    let (rest, time_to_live) = be_u8().parse(rest)?;

    // Protocol (1 byte)
    let (rest, protocol_inner) = be_u8().parse(rest)?;
    let protocol_inner = IpNextLevelProtocol::from(protocol_inner);

    // Header Checksum (2 bytes)
    let (rest, checksum) = be_u16().parse(rest)?;

    // Source Address
    let (rest, address_source) = ip::address::v4_parse(rest)?;
    // Destination Address
    let (rest, address_destination) = ip::address::v4_parse(rest)?;

    // Options are skipped
    let options_length = internet_header_length - MIN_HEADER_LENGTH;
    let rest = rest
        .get(options_length..)
        .ok_or(ParserError::ErrorVerify.to_nom(bytes))?;

    // Cutting ethernet padding
    let payload_length = usize::from(total_length) - internet_header_length;
    let payload = rest
        .get(..payload_length)
        .ok_or(ParserError::ErrorVerify.to_nom(bytes))?;

    let protocol = IPv4 {
        version,
        internet_header_length: ihl * 4,
        differentiated_services_code_point: dscp,
        explicit_congestion_notification: ecn,
        total_length,
        identification,
        flags,
        fragment_offset,
        time_to_live,
        protocol_inner,
        checksum,
        address_source,
        address_destination,
    };

    Ok((payload, protocol))
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct IPv4 {
    pub version: u8,
    pub internet_header_length: u8,
    pub differentiated_services_code_point: u8,
    pub explicit_congestion_notification: u8,
    pub total_length: u16,
    pub identification: u16,
    pub flags: u8,
    pub fragment_offset: u16,
    pub time_to_live: u8,
    pub protocol_inner: IpNextLevelProtocol,
    pub checksum: u16,
    pub address_source: Ipv4Addr,
    pub address_destination: Ipv4Addr,
}

impl IPv4 {
    /// Only the first fragment carries the transport header.
    pub fn is_first_fragment(&self) -> bool {
        self.fragment_offset == 0
    }
}
