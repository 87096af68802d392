use super::name::{DomainName, decode_name};
use super::types::{RRClass, RRType};
use crate::error::{DissectError, Result, Stage};
use crate::packet::PacketView;
use bytes::Bytes;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// TYPE(2) + CLASS(2) + TTL(4) + RDLENGTH(2)
const RR_FIXED_LEN: usize = 10;
/// TYPE(2) + CLASS(2)
const QUESTION_FIXED_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: DomainName,
    pub qtype: RRType,
    pub qclass: RRClass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Ns(DomainName),
    Cname(DomainName),
    Mx {
        preference: u16,
        exchange: DomainName,
    },
    Soa {
        primary_ns: DomainName,
        mailbox: DomainName,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: DomainName,
    },
    /// Raw RDATA of a record whose TYPE/CLASS we do not decode.
    Unknown(Bytes),
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A(addr) => write!(f, "{addr}"),
            Self::Aaaa(addr) => write!(f, "{addr}"),
            Self::Ns(name) | Self::Cname(name) => f.write_str(&name.fqdn()),
            Self::Mx {
                preference,
                exchange,
            } => write!(f, "{preference} {}", exchange.fqdn()),
            Self::Soa {
                primary_ns,
                mailbox,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => write!(
                f,
                "{} {} {serial} {refresh} {retry} {expire} {minimum}",
                primary_ns.fqdn(),
                mailbox.fqdn()
            ),
            Self::Srv {
                priority,
                weight,
                port,
                target,
            } => write!(f, "{priority} {weight} {port} {}", target.fqdn()),
            Self::Unknown(raw) => write!(f, "({} bytes not decoded)", raw.len()),
        }
    }
}

impl RData {
    /// Domain names carried inside the RDATA.
    pub fn names(&self) -> Vec<&DomainName> {
        match self {
            Self::Ns(name) | Self::Cname(name) => vec![name],
            Self::Mx { exchange, .. } => vec![exchange],
            Self::Soa {
                primary_ns,
                mailbox,
                ..
            } => vec![primary_ns, mailbox],
            Self::Srv { target, .. } => vec![target],
            Self::A(_) | Self::Aaaa(_) | Self::Unknown(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: DomainName,
    pub rtype: RRType,
    pub rclass: RRClass,
    pub ttl: u32,
    pub rdata: RData,
}

impl ResourceRecord {
    pub fn is_supported(&self) -> bool {
        !matches!(self.rdata, RData::Unknown(_))
    }

    /// `Some` when the record was skipped rather than decoded.
    pub fn unsupported(&self) -> Option<DissectError> {
        (!self.is_supported()).then_some(DissectError::UnknownRRTypeOrClass {
            rtype: self.rtype.to_u16(),
            rclass: self.rclass.to_u16(),
        })
    }
}

/// Parse one question entry (RFC 1035 Section 4.1.2): QNAME, QTYPE, QCLASS.
///
/// Returns the bytes consumed from `offset`.
pub fn decode_question(
    message: &[u8],
    offset: usize,
) -> Result<(DomainName, RRType, RRClass, usize)> {
    let (name, name_len) = decode_name(message, offset)?;

    let mut view = PacketView::new(message, message.len());
    view.enter(Stage::DnsQuestion);
    view.seek(offset + name_len)?;
    view.require(QUESTION_FIXED_LEN)?;

    let qtype = RRType::from_u16(view.read_u16_be()?);
    let qclass = RRClass::from_u16(view.read_u16_be()?);

    Ok((name, qtype, qclass, name_len + QUESTION_FIXED_LEN))
}

/// Parse one resource record (RFC 1035 Section 4.1.3)
///
/// ```text
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     /                      NAME                     /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TYPE                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     CLASS                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TTL                      |
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                   RDLENGTH                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--|
///     /                     RDATA                     /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// RDLENGTH is checked against the message before RDATA is looked at.
/// Records of an unsupported TYPE or CLASS keep their raw RDATA and are
/// skipped by RDLENGTH so the following record stays aligned. Returns the
/// bytes consumed from `offset`.
pub fn decode_rr(message: &[u8], offset: usize) -> Result<(ResourceRecord, usize)> {
    let (name, name_len) = decode_name(message, offset)?;

    let mut view = PacketView::new(message, message.len());
    view.enter(Stage::DnsRecord);
    view.seek(offset + name_len)?;
    view.require(RR_FIXED_LEN)?;

    let rtype = RRType::from_u16(view.read_u16_be()?);
    let rclass = RRClass::from_u16(view.read_u16_be()?);
    let ttl = view.read_u32_be()?;
    let rdlength = usize::from(view.read_u16_be()?);

    let rdata_start = view.position();
    let rdata_end = rdata_start + rdlength;
    let Some(bounded) = message.get(..rdata_end) else {
        return Err(DissectError::bad("rdata length overruns message"));
    };

    let rdata = decode_rdata(bounded, rdata_start, rtype, rclass)?;

    let record = ResourceRecord {
        name,
        rtype,
        rclass,
        ttl,
        rdata,
    };
    Ok((record, rdata_end - offset))
}

/// `message` ends exactly where this record's RDATA ends, so no field
/// (names included) can be read past RDLENGTH.
fn decode_rdata(message: &[u8], start: usize, rtype: RRType, rclass: RRClass) -> Result<RData> {
    let rdlength = message.len() - start;
    let mut view = PacketView::new(message, message.len());
    view.enter(Stage::DnsRecord);
    view.seek(start)?;

    if rclass != RRClass::In {
        return Ok(RData::Unknown(Bytes::copy_from_slice(view.rest())));
    }

    let rdata = match rtype {
        RRType::A => {
            if rdlength != 4 {
                return Err(DissectError::bad("A record rdata is not 4 bytes"));
            }
            RData::A(Ipv4Addr::from(view.read_array::<4>()?))
        }
        RRType::Aaaa => {
            if rdlength != 16 {
                return Err(DissectError::bad("AAAA record rdata is not 16 bytes"));
            }
            RData::Aaaa(Ipv6Addr::from(view.read_array::<16>()?))
        }
        RRType::Ns => RData::Ns(decode_name(message, start)?.0),
        RRType::Cname => RData::Cname(decode_name(message, start)?.0),
        RRType::Mx => {
            let preference = rdata_u16(&mut view)?;
            let (exchange, _) = decode_name(message, view.position())?;
            RData::Mx {
                preference,
                exchange,
            }
        }
        RRType::Soa => {
            let (primary_ns, primary_len) = decode_name(message, start)?;
            let (mailbox, mailbox_len) = decode_name(message, start + primary_len)?;
            view.seek(start + primary_len + mailbox_len)?;
            let mut fields = [0u32; 5];
            for field in &mut fields {
                *field = view
                    .read_u32_be()
                    .map_err(|_| DissectError::bad("SOA rdata shorter than its fields"))?;
            }
            let [serial, refresh, retry, expire, minimum] = fields;
            RData::Soa {
                primary_ns,
                mailbox,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            }
        }
        RRType::Srv => {
            let priority = rdata_u16(&mut view)?;
            let weight = rdata_u16(&mut view)?;
            let port = rdata_u16(&mut view)?;
            let (target, _) = decode_name(message, view.position())?;
            RData::Srv {
                priority,
                weight,
                port,
                target,
            }
        }
        RRType::Unknown(_) => RData::Unknown(Bytes::copy_from_slice(view.rest())),
    };

    Ok(rdata)
}

fn rdata_u16(view: &mut PacketView<'_>) -> Result<u16> {
    view.read_u16_be()
        .map_err(|_| DissectError::bad("rdata shorter than its fields"))
}
