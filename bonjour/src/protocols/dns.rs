use crate::parser;
use crate::parser::ParserError;
use nom::bytes::take;
use nom::number::{be_u8, be_u16, be_u32};
use nom::{IResult, Parser, bits};
use num_enum::{FromPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};
use strum_macros::Display;

// DNS Protocol
// RFC 1035: https://datatracker.ietf.org/doc/html/rfc1035
// Multicast DNS
// RFC 6762: https://datatracker.ietf.org/doc/html/rfc6762

pub const PORT_MDNS: u16 = 5353;
pub const HEADER_LENGTH: usize = 12;

pub const MESSAGE_TYPE_LENGTH_BITS: usize = 1;
pub const OPERATION_CODE_LENGTH_BITS: usize = 4;
pub const AUTHORITATIVE_ANSWER_LENGTH_BITS: usize = 1;
pub const TRUNCATION_FLAG_LENGTH_BITS: usize = 1;
pub const RECURSION_DESIRED_LENGTH_BITS: usize = 1;
pub const RECURSION_AVAILABLE_LENGTH_BITS: usize = 1;
pub const RESERVED_LENGTH_BITS: usize = 3;
pub const RESPONSE_CODE_LENGTH_BITS: usize = 4;

// RFC 6762, Sections 5.4 and 10.2: top bit of the class field.
const CLASS_TOP_BIT: u16 = 0x8000;

const MAX_DEPTH_LEVEL_RECURSION_NAME_PARSING: u8 = 7;

pub fn parse(bytes: &[u8]) -> IResult<&[u8], DNS> {
    // HEADER
    // Identifier - 16 bits.
    let (rest, id) = be_u16().parse(bytes)?;

    // Message Type (QR), Operation Code (OPCODE)
    // Authoritative Answer (AA), Truncation (TC), Recursion Desired (RD)
    // Recursion Available (RA), Reserved (Z, AD, CD), Response Code (RCODE)
    type DnsHeaderBits = (u8, u8, u8, u8, u8, u8, u8, u8);
    let (rest, (qr, opcode, aa, tc, rd, ra, _reserved, rcode)): (&[u8], DnsHeaderBits) =
        bits::bits::<_, _, nom::error::Error<_>, _, _>((
            bits::complete::take(MESSAGE_TYPE_LENGTH_BITS),
            bits::complete::take(OPERATION_CODE_LENGTH_BITS),
            bits::complete::take(AUTHORITATIVE_ANSWER_LENGTH_BITS),
            bits::complete::take(TRUNCATION_FLAG_LENGTH_BITS),
            bits::complete::take(RECURSION_DESIRED_LENGTH_BITS),
            bits::complete::take(RECURSION_AVAILABLE_LENGTH_BITS),
            bits::complete::take(RESERVED_LENGTH_BITS),
            bits::complete::take(RESPONSE_CODE_LENGTH_BITS),
        ))(rest)?;
    let message_type =
        MessageType::try_from(qr).map_err(|_| ParserError::ErrorVerify.to_nom(bytes))?;
    let operation_code = OperationCode::try_from(opcode)
        .map_err(|_| ParserError::ErrorVerify.to_nom(bytes))?;
    let authoritative_answer =
        parser::cast_to_bool(aa).map_err(|err| err.to_nom(bytes))?;
    let truncation = parser::cast_to_bool(tc).map_err(|err| err.to_nom(bytes))?;
    let recursion_desired = parser::cast_to_bool(rd).map_err(|err| err.to_nom(bytes))?;
    let recursion_available =
        parser::cast_to_bool(ra).map_err(|err| err.to_nom(bytes))?;
    let response_code = ResponseCode::try_from(rcode)
        .map_err(|_| ParserError::ErrorVerify.to_nom(bytes))?;

    // QDCOUNT - 16 bits
    let (rest, question_entries) = be_u16().parse(rest)?;

    // ANCOUNT - 16 bits,
    let (rest, answer_records) = be_u16().parse(rest)?;

    // NSCOUNT - 16 bits,
    let (rest, authority_records) = be_u16().parse(rest)?;

    // ARCOUNT - 16 bits
    let (mut rest, additional_records) = be_u16().parse(rest)?;

    let header = Header {
        id,
        message_type,
        operation_code,
        authoritative_answer,
        truncation,
        recursion_desired,
        recursion_available,
        response_code,

        question_entries,
        answer_records,
        authority_records,
        additional_records,
    };

    // QUESTION SECTION
    let mut question_section: Vec<QuestionEntry> = vec![];
    for _ in 0..question_entries {
        let (section_rest, question) = parse_question_section(rest, bytes)?;
        question_section.push(question);
        rest = section_rest;
    }

    // ANSWER SECTION
    let (rest, answer_section) = parse_record_section(rest, answer_records, bytes)?;

    // AUTHORITY SECTION
    let (rest, authority_section) = parse_record_section(rest, authority_records, bytes)?;

    // ADDITIONAL SECTION
    let (rest, additional_section) =
        parse_record_section(rest, additional_records, bytes)?;

    // Bytes after the last section are left to the caller
    let protocol = DNS {
        header,
        question_section,
        answer_section,
        authority_section,
        additional_section,
    };

    Ok((rest, protocol))
}

fn parse_question_section<'a>(
    bytes: &'a [u8], whole: &'a [u8],
) -> IResult<&'a [u8], QuestionEntry> {
    // QNAME
    let (rest, qname) = parse_name(bytes, whole, 1)?;

    // QTYPE
    let (rest, qtype) = be_u16().parse(rest)?;

    // QCLASS, the top bit asks for a unicast response
    let (rest, qclass) = be_u16().parse(rest)?;

    let section = QuestionEntry {
        name: qname,
        entry_type: DnsType::from(qtype),
        class: Class::from(qclass & !CLASS_TOP_BIT),
        unicast_response: qclass & CLASS_TOP_BIT != 0,
    };

    Ok((rest, section))
}

fn parse_name<'a>(
    bytes: &'a [u8], whole: &'a [u8], depth: u8,
) -> IResult<&'a [u8], String> {
    if depth > MAX_DEPTH_LEVEL_RECURSION_NAME_PARSING {
        return Err(ParserError::ErrorVerify.to_nom(bytes));
    }

    let mut labels: Vec<String> = Vec::new();

    let mut main_rest = bytes;
    loop {
        let (rest, length_octet) = be_u8().parse(main_rest)?;
        if length_octet == 0 {
            main_rest = rest;
            break;
        }

        let is_simple_parsing = (length_octet & 0b1100_0000) != 0b1100_0000;

        match is_simple_parsing {
            true => {
                let (rest, word) = take(length_octet).parse(rest)?;
                labels.push(String::from_utf8_lossy(word).into_owned());
                main_rest = rest;
            },

            false => {
                let (rest, next_byte) = be_u8().parse(rest)?;

                let low6 = u16::from(length_octet & 0b0011_1111);
                let offset = (low6 << 8) | u16::from(next_byte);
                let pointed_slice = whole
                    .get(usize::from(offset)..)
                    .ok_or(ParserError::ErrorVerify.to_nom(bytes))?;
                let (_, suffix) = parse_name(
                    pointed_slice,
                    whole,
                    depth
                        .checked_add(1)
                        .ok_or(ParserError::ErrorVerify.to_nom(bytes))?,
                )?;
                if !suffix.is_empty() {
                    labels.push(suffix);
                }
                main_rest = rest;
                break;
            },
        }
    }

    Ok((main_rest, labels.join(".")))
}

fn parse_record_section<'a>(
    bytes: &'a [u8], records: u16, whole: &'a [u8],
) -> IResult<&'a [u8], Vec<ResourceRecord>> {
    let mut rest = bytes;
    let mut section: Vec<ResourceRecord> = vec![];
    for _ in 0..records {
        let (section_rest, record) = parse_resource_record(rest, whole)?;
        section.push(record);
        rest = section_rest;
    }

    Ok((rest, section))
}

fn parse_resource_record<'a>(
    bytes: &'a [u8], whole: &'a [u8],
) -> IResult<&'a [u8], ResourceRecord> {
    // NAME
    let (rest, name) = parse_name(bytes, whole, 1)?;

    // TYPE
    let (rest, record_type) = be_u16().parse(rest)?;
    let record_type = DnsType::from(record_type);

    // CLASS, the top bit flushes cached records of the same name and type
    let (rest, class) = be_u16().parse(rest)?;

    // TTL
    let (rest, time_to_live) = be_u32().parse(rest)?;

    // RDLength
    let (rest, data_length) = be_u16().parse(rest)?;

    // RDATA
    let (rest, data) = take(data_length).parse(rest)?;
    let (_, data) = DnsTypeData::try_from_bytes(data, whole, &record_type)?;

    // OPT reuses the class field for the UDP payload size
    let (class, cache_flush) = match record_type {
        DnsType::OPT => (Class::from(class), false),
        _ => (
            Class::from(class & !CLASS_TOP_BIT),
            class & CLASS_TOP_BIT != 0,
        ),
    };

    let record = ResourceRecord {
        name,
        record_type,
        class,
        cache_flush,
        time_to_live,
        data_length,
        data,
    };

    Ok((rest, record))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DNS {
    pub header: Header,
    pub question_section: Vec<QuestionEntry>,
    pub answer_section: Vec<ResourceRecord>,
    pub authority_section: Vec<ResourceRecord>,
    pub additional_section: Vec<ResourceRecord>,
}

impl DNS {
    /// `Some(true)` for a query asking questions, `Some(false)` for a response carrying
    /// answers, `None` when the message is neither.
    pub fn query_flag(&self) -> Option<bool> {
        match self.header.message_type {
            MessageType::Query if !self.question_section.is_empty() => Some(true),
            MessageType::Response if !self.answer_section.is_empty() => Some(false),
            _ => None,
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answer_section
            .iter()
            .chain(self.authority_section.iter())
            .chain(self.additional_section.iter())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub id: u16,
    pub message_type: MessageType,
    pub operation_code: OperationCode,
    pub authoritative_answer: bool,
    pub truncation: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub response_code: ResponseCode,

    pub question_entries: u16,
    pub answer_records: u16,
    pub authority_records: u16,
    pub additional_records: u16,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QuestionEntry {
    pub name: String,
    pub entry_type: DnsType,
    pub class: Class,
    pub unicast_response: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResourceRecord {
    pub name: String,
    pub record_type: DnsType,
    pub class: Class,
    pub cache_flush: bool,
    pub time_to_live: u32,
    pub data_length: u16,
    pub data: DnsTypeData,
}

#[derive(Clone, Debug, Display, Serialize, Deserialize, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum MessageType {
    Query = 0,
    Response = 1,
}

#[derive(Clone, Debug, Display, Serialize, Deserialize, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum OperationCode {
    StandardQuery = 0,
    InverseQuery = 1,
    ServerStatusRequest = 2,
    Notify = 4,
    Update = 5,

    #[num_enum(alternatives = [3, 6..15])]
    Reserved = 15,
}

#[derive(Clone, Debug, Display, Serialize, Deserialize, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum ResponseCode {
    NoErrorCondition = 0,
    FormatError = 1,
    ServerFailure = 2,
    NameError = 3,
    NotImplemented = 4,
    Refused = 5,

    #[num_enum(alternatives = [6..15])]
    Reserved = 15,
}

#[derive(Clone, Copy, Debug, Display, Serialize, Deserialize, PartialEq, FromPrimitive)]
#[repr(u16)]
pub enum DnsType {
    A = 1,      // A host address
    NS = 2,     // An authoritative name server
    CNAME = 5,  // The canonical name for an alias
    SOA = 6,    // Marks the start of a zone of authority
    NULL = 10,  // A null RR
    PTR = 12,   // A domain name pointer
    HINFO = 13, // Host information
    MX = 15,    // Mail exchange
    TXT = 16,   // Text strings
    AAAA = 28,  // IPv6 address record
    SRV = 33,   // Service locator
    OPT = 41,   // EDNS(0) option pseudo-record
    NSEC = 47,  // Next Secure record
    SVCB = 64,  // Service Binding
    HTTPS = 65, // HTTPS Binding
    ANY = 255,  // A request for all records

    #[num_enum(catch_all)]
    Unknown(u16),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum DnsTypeData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(String),
    NS(String),
    PTR(String),
    SOA {
        primary_name_server: String,
        mailbox: String,
        serial: u32,
        refresh_interval: u32,
        retry_interval: u32,
        expire_limit: u32,
        minimum_ttl: u32,
    },
    SRV {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    TXT(Vec<String>),
    Unknown(Vec<u8>),
}

impl std::fmt::Display for DnsTypeData {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DnsTypeData::A(address) => write!(f, "{}", address),
            DnsTypeData::AAAA(address) => write!(f, "{}", address),
            DnsTypeData::CNAME(value) | DnsTypeData::NS(value) | DnsTypeData::PTR(value) => {
                write!(f, "{}", value)
            },
            DnsTypeData::SOA {
                primary_name_server,
                mailbox,
                ..
            } => write!(f, "{} <{}>", primary_name_server, mailbox),
            DnsTypeData::SRV { port, target, .. } => write!(f, "{}:{}", target, port),
            DnsTypeData::TXT(strings) => write!(f, "{}", strings.join(" ")),
            DnsTypeData::Unknown(bytes) => write!(f, "{} bytes", bytes.len()),
        }
    }
}

impl DnsTypeData {
    pub fn try_from_bytes<'a>(
        input: &'a [u8], whole: &'a [u8], dns_type: &DnsType,
    ) -> IResult<&'a [u8], Self> {
        match dns_type {
            DnsType::A => {
                let address = <[u8; 4]>::try_from(input)
                    .map_err(|_| ParserError::ErrorVerify.to_nom(input))?;
                Ok((&[], Self::A(Ipv4Addr::from(address))))
            },
            DnsType::AAAA => {
                let address = <[u8; 16]>::try_from(input)
                    .map_err(|_| ParserError::ErrorVerify.to_nom(input))?;
                Ok((&[], Self::AAAA(Ipv6Addr::from(address))))
            },
            DnsType::CNAME => {
                let (rest, name) = parse_name(input, whole, 1)?;
                Ok((rest, Self::CNAME(name)))
            },
            DnsType::NS => {
                let (rest, name) = parse_name(input, whole, 1)?;
                Ok((rest, Self::NS(name)))
            },
            DnsType::PTR => {
                let (rest, name) = parse_name(input, whole, 1)?;
                Ok((rest, Self::PTR(name)))
            },
            DnsType::SOA => {
                let (rest, primary_name_server) = parse_name(input, whole, 1)?;
                let (rest, mailbox) = parse_name(rest, whole, 1)?;
                let (rest, serial) = be_u32().parse(rest)?;
                let (rest, refresh_interval) = be_u32().parse(rest)?;
                let (rest, retry_interval) = be_u32().parse(rest)?;
                let (rest, expire_limit) = be_u32().parse(rest)?;
                let (rest, minimum_ttl) = be_u32().parse(rest)?;

                Ok((
                    rest,
                    Self::SOA {
                        primary_name_server,
                        mailbox,
                        serial,
                        refresh_interval,
                        retry_interval,
                        expire_limit,
                        minimum_ttl,
                    },
                ))
            },
            DnsType::SRV => {
                let (rest, priority) = be_u16().parse(input)?;
                let (rest, weight) = be_u16().parse(rest)?;
                let (rest, port) = be_u16().parse(rest)?;
                let (rest, target) = parse_name(rest, whole, 1)?;

                Ok((
                    rest,
                    Self::SRV {
                        priority,
                        weight,
                        port,
                        target,
                    },
                ))
            },
            DnsType::TXT => {
                let mut strings = Vec::new();
                let mut rest = input;
                while !rest.is_empty() {
                    let (string_rest, length) = be_u8().parse(rest)?;
                    let (string_rest, string) = take(length).parse(string_rest)?;
                    strings.push(String::from_utf8_lossy(string).into_owned());
                    rest = string_rest;
                }
                Ok((rest, Self::TXT(strings)))
            },
            _ => Ok((&[], Self::Unknown(input.to_vec()))),
        }
    }
}

#[derive(Clone, Copy, Debug, Display, Serialize, Deserialize, PartialEq, FromPrimitive)]
#[repr(u16)]
pub enum Class {
    IN = 1, // The Internet
    CS = 2, // The CSNET class (Obsolete - used only for examples in some obsolete RFCs)
    CH = 3, // The CHAOS class
    HS = 4, // Hesiod [Dyer 87]

    ANY = 255,

    #[num_enum(catch_all)]
    Unknown(u16),
}
