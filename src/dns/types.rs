use std::fmt;

/// DNS Record Types (RFC 1035 Section 3.2.2, RFC 3596, RFC 2782)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RRType {
    /// A record: IPv4 address (32 bits)
    A,
    /// NS record: Authoritative name server
    Ns,
    /// CNAME record: Canonical name for an alias
    Cname,
    /// SOA record: Start of authority
    Soa,
    /// MX record: Mail exchange
    Mx,
    /// AAAA record: IPv6 address (128 bits) - RFC 3596
    Aaaa,
    /// SRV record: Service location - RFC 2782
    Srv,
    /// Any type we do not decode
    Unknown(u16),
}

impl RRType {
    /// Convert wire format u16 to `RRType`
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => Self::A,
            2 => Self::Ns,
            5 => Self::Cname,
            6 => Self::Soa,
            15 => Self::Mx,
            28 => Self::Aaaa,
            33 => Self::Srv,
            n => Self::Unknown(n),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Self::A => 1,
            Self::Ns => 2,
            Self::Cname => 5,
            Self::Soa => 6,
            Self::Mx => 15,
            Self::Aaaa => 28,
            Self::Srv => 33,
            Self::Unknown(n) => n,
        }
    }
}

impl fmt::Display for RRType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::Ns => f.write_str("NS"),
            Self::Cname => f.write_str("CNAME"),
            Self::Soa => f.write_str("SOA"),
            Self::Mx => f.write_str("MX"),
            Self::Aaaa => f.write_str("AAAA"),
            Self::Srv => f.write_str("SRV"),
            Self::Unknown(n) => write!(f, "TYPE{n}"),
        }
    }
}

/// DNS Classes (RFC 1035 Section 3.2.4). Only IN is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RRClass {
    In,
    Unknown(u16),
}

impl RRClass {
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => Self::In,
            n => Self::Unknown(n),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Self::In => 1,
            Self::Unknown(n) => n,
        }
    }
}

impl fmt::Display for RRClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => f.write_str("IN"),
            Self::Unknown(n) => write!(f, "CLASS{n}"),
        }
    }
}
