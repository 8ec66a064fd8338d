use crate::parser::ParserError;
use nom::IResult;
use nom::Parser;
use nom::bytes::take;
use std::net::{Ipv4Addr, Ipv6Addr};

pub const V4_LENGTH_BYTES: usize = 4;
pub const V6_LENGTH_BYTES: usize = 16;

pub const MDNS_V4_GROUP: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);
pub const MDNS_V6_GROUP: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 0xfb);

pub fn v4_parse(input: &[u8]) -> IResult<&[u8], Ipv4Addr> {
    let (rest, address) = take(V4_LENGTH_BYTES).parse(input)?;

    let address = Ipv4Addr::from(
        <[u8; V4_LENGTH_BYTES]>::try_from(address)
            .map_err(|_| ParserError::ErrorVerify.to_nom(input))?,
    );

    Ok((rest, address))
}

pub fn v6_parse(input: &[u8]) -> IResult<&[u8], Ipv6Addr> {
    let (rest, address) = take(V6_LENGTH_BYTES).parse(input)?;

    let address = Ipv6Addr::from(
        <[u8; V6_LENGTH_BYTES]>::try_from(address)
            .map_err(|_| ParserError::ErrorVerify.to_nom(input))?,
    );

    Ok((rest, address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v4_parse() {
        let bytes = [224, 0, 0, 251, 0xAA];
        let (rest, address) = v4_parse(&bytes).unwrap();
        assert_eq!(address, MDNS_V4_GROUP);
        assert_eq!(rest, &[0xAA]);
    }

    #[test]
    fn test_v6_parse() {
        let bytes = MDNS_V6_GROUP.octets();
        let (rest, address) = v6_parse(&bytes).unwrap();
        assert_eq!(address, MDNS_V6_GROUP);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_truncated_address() {
        assert!(v4_parse(&[127, 0, 0]).is_err());
        assert!(v6_parse(&[0; 15]).is_err());
    }
}
