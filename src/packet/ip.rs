use super::view::PacketView;
use crate::error::{DissectError, Result, Stage};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

pub const IPV4_HEADER_LEN: usize = 20;
pub const IPV6_HEADER_LEN: usize = 40;

/// IP protocol numbers (IANA "Assigned Internet Protocol Numbers")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpProtocol {
    Icmp,
    Igmp,
    Tcp,
    Udp,
    Icmpv6,
    Unknown(u8),
}

impl IpProtocol {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Icmp,
            2 => Self::Igmp,
            6 => Self::Tcp,
            17 => Self::Udp,
            58 => Self::Icmpv6,
            n => Self::Unknown(n),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Icmp => 1,
            Self::Igmp => 2,
            Self::Tcp => 6,
            Self::Udp => 17,
            Self::Icmpv6 => 58,
            Self::Unknown(n) => n,
        }
    }
}

impl fmt::Display for IpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Icmp => f.write_str("ICMP"),
            Self::Igmp => f.write_str("IGMP"),
            Self::Tcp => f.write_str("TCP"),
            Self::Udp => f.write_str("UDP"),
            Self::Icmpv6 => f.write_str("ICMPv6"),
            Self::Unknown(n) => write!(f, "protocol {n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Header {
    pub version: u8,
    pub ihl: u8,
    pub total_length: u16,
    pub ttl: u8,
    pub protocol: IpProtocol,
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Header {
    pub payload_length: u16,
    pub next_header: IpProtocol,
    pub hop_limit: u8,
    pub src_addr: Ipv6Addr,
    pub dst_addr: Ipv6Addr,
}

/// Parse IPv4 header (RFC 791)
///
/// IPv4 Header Format (minimum 20 bytes):
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |Version|  IHL  |Type of Service|          Total Length         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |         Identification        |Flags|      Fragment Offset    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Time to Live |    Protocol   |         Header Checksum       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       Source Address                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                    Destination Address                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Options are not interpreted. When IHL announces them they are skipped so
/// the cursor lands on the transport header.
pub fn decode_ipv4(view: &mut PacketView<'_>) -> Result<Ipv4Header> {
    view.enter(Stage::Ipv4);
    let start = view.position();
    let fixed = view.read_fixed(IPV4_HEADER_LEN)?;

    let version = fixed[0] >> 4;
    let ihl = fixed[0] & 0x0F;
    if ihl < 5 {
        return Err(DissectError::bad("ipv4 header length below 20 bytes"));
    }

    let header = Ipv4Header {
        version,
        ihl,
        total_length: view.peek_u16_be(start + 2)?,
        ttl: fixed[8],
        protocol: IpProtocol::from_u8(fixed[9]),
        src_addr: Ipv4Addr::new(fixed[12], fixed[13], fixed[14], fixed[15]),
        dst_addr: Ipv4Addr::new(fixed[16], fixed[17], fixed[18], fixed[19]),
    };

    let options_len = usize::from(ihl) * 4 - IPV4_HEADER_LEN;
    view.skip(options_len)?;

    Ok(header)
}

/// Parse IPv6 header (RFC 8200)
///
/// IPv6 Header Format (fixed 40 bytes):
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |Version| Traffic Class |           Flow Label                  |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |         Payload Length        |  Next Header  |   Hop Limit   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                    Source Address (16 bytes)                  |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                 Destination Address (16 bytes)                |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Extension headers are not walked: `next_header` is taken as the
/// transport protocol.
pub fn decode_ipv6(view: &mut PacketView<'_>) -> Result<Ipv6Header> {
    view.enter(Stage::Ipv6);
    view.require(IPV6_HEADER_LEN)?;

    view.skip(4)?; // version, traffic class, flow label
    let payload_length = view.read_u16_be()?;
    let next_header = IpProtocol::from_u8(view.read_u8()?);
    let hop_limit = view.read_u8()?;
    let src_addr = Ipv6Addr::from(view.read_array::<16>()?);
    let dst_addr = Ipv6Addr::from(view.read_array::<16>()?);

    Ok(Ipv6Header {
        payload_length,
        next_header,
        hop_limit,
        src_addr,
        dst_addr,
    })
}

/// Network layer of a frame that carried IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpHeader {
    V4(Ipv4Header),
    V6(Ipv6Header),
}

impl IpHeader {
    pub fn src(&self) -> IpAddr {
        match self {
            Self::V4(h) => IpAddr::V4(h.src_addr),
            Self::V6(h) => IpAddr::V6(h.src_addr),
        }
    }

    pub fn dst(&self) -> IpAddr {
        match self {
            Self::V4(h) => IpAddr::V4(h.dst_addr),
            Self::V6(h) => IpAddr::V6(h.dst_addr),
        }
    }

    pub fn protocol(&self) -> IpProtocol {
        match self {
            Self::V4(h) => h.protocol,
            Self::V6(h) => h.next_header,
        }
    }
}
