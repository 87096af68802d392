use super::view::PacketView;
use crate::error::{Result, Stage};
use std::fmt;

pub const ETHERNET_HEADER_LEN: usize = 14;
pub const ARP_FIXED_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EtherType {
    Ipv4,
    Ipv6,
    Arp,
    Unknown(u16),
}

impl EtherType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0800 => Self::Ipv4,
            0x86DD => Self::Ipv6,
            0x0806 => Self::Arp,
            n => Self::Unknown(n),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Self::Ipv4 => 0x0800,
            Self::Ipv6 => 0x86DD,
            Self::Arp => 0x0806,
            Self::Unknown(n) => n,
        }
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ipv4 => "IPv4",
            Self::Ipv6 => "IPv6",
            Self::Arp => "ARP",
            Self::Unknown(_) => "unknown",
        };
        write!(f, "{name} (0x{:04x})", self.to_u16())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dst_mac: MacAddr,
    pub src_mac: MacAddr,
    pub ether_type: EtherType,
}

/// Parse an Ethernet II header (RFC 894)
///
/// ```text
/// [0-5]:   Destination MAC
/// [6-11]:  Source MAC
/// [12-13]: EtherType (0x0800 = IPv4, 0x86DD = IPv6, 0x0806 = ARP)
/// ```
///
/// The EtherType is returned as read; choosing what to do with an unknown
/// value is left to the caller.
pub fn decode_ethernet(view: &mut PacketView<'_>) -> Result<EthernetHeader> {
    view.enter(Stage::Ethernet);
    view.require(ETHERNET_HEADER_LEN)?;

    let dst_mac = MacAddr(view.read_array()?);
    let src_mac = MacAddr(view.read_array()?);
    let ether_type = EtherType::from_u16(view.read_u16_be()?);

    Ok(EthernetHeader {
        dst_mac,
        src_mac,
        ether_type,
    })
}

/// ARP operation codes (RFC 826, RFC 903, RFC 2390, RFC 2225)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArpOpcode {
    Request,
    Reply,
    RarpRequest,
    RarpReply,
    InArpRequest,
    InArpReply,
    Nak,
    Unknown(u16),
}

impl ArpOpcode {
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => Self::Request,
            2 => Self::Reply,
            3 => Self::RarpRequest,
            4 => Self::RarpReply,
            8 => Self::InArpRequest,
            9 => Self::InArpReply,
            10 => Self::Nak,
            n => Self::Unknown(n),
        }
    }
}

impl fmt::Display for ArpOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => f.write_str("arp request"),
            Self::Reply => f.write_str("arp reply"),
            Self::RarpRequest => f.write_str("rarp request"),
            Self::RarpReply => f.write_str("rarp reply"),
            Self::InArpRequest => f.write_str("inarp request"),
            Self::InArpReply => f.write_str("inarp reply"),
            Self::Nak => f.write_str("(atm) arp nak"),
            Self::Unknown(n) => write!(f, "opcode {n}"),
        }
    }
}

/// Reads the fixed part of an ARP packet and returns only the opcode.
///
/// ```text
/// [0-1]: Hardware type   [2-3]: Protocol type
/// [4]:   Hardware length [5]:   Protocol length
/// [6-7]: Operation
/// ```
pub fn decode_arp_opcode(view: &mut PacketView<'_>) -> Result<ArpOpcode> {
    view.enter(Stage::Arp);
    view.require(ARP_FIXED_LEN)?;
    view.skip(6)?;
    Ok(ArpOpcode::from_u16(view.read_u16_be()?))
}
