use std::fmt;
use thiserror::Error;

/// Decoding stage a frame was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Ethernet,
    Arp,
    Ipv4,
    Ipv6,
    Udp,
    Transport,
    DnsHeader,
    DnsName,
    DnsQuestion,
    DnsRecord,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ethernet => "ethernet",
            Self::Arp => "arp",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Udp => "udp",
            Self::Transport => "transport",
            Self::DnsHeader => "dns header",
            Self::DnsName => "dns name",
            Self::DnsQuestion => "dns question",
            Self::DnsRecord => "dns record",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DissectError {
    #[error("truncated packet at {stage} stage")]
    TruncatedPacket { stage: Stage },

    #[error("bad packet: {reason}")]
    BadPacket { reason: &'static str },

    #[error("unsupported EtherType 0x{0:04x}")]
    UnsupportedEtherType(u16),

    #[error("unsupported transport protocol {0}")]
    UnsupportedProtocol(u8),

    #[error("unsupported record TYPE{rtype} CLASS{rclass}")]
    UnknownRRTypeOrClass { rtype: u16, rclass: u16 },
}

impl DissectError {
    pub(crate) fn bad(reason: &'static str) -> Self {
        Self::BadPacket { reason }
    }

    /// Informational kinds describe traffic we do not decode, not broken input.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedEtherType(_)
                | Self::UnsupportedProtocol(_)
                | Self::UnknownRRTypeOrClass { .. }
        )
    }
}

pub type Result<T, E = DissectError> = std::result::Result<T, E>;
