use crate::error::{Result, Stage};
use crate::packet::PacketView;

pub const DNS_HEADER_LEN: usize = 12;

const QR: u16 = 0x8000;
const OPCODE: u16 = 0x7800;
const AA: u16 = 0x0400;
const TC: u16 = 0x0200;
const RD: u16 = 0x0100;
const RA: u16 = 0x0080;
const Z: u16 = 0x0070;
const AD: u16 = 0x0020;
const CD: u16 = 0x0010;
const RCODE: u16 = 0x000F;

/// DNS Header Format (RFC 1035 Section 4.1.1, 12 bytes):
/// ```text
///  0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      ID                       |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    QDCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ANCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    NSCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ARCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// Flag values are reported verbatim, never validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DnsHeader {
    pub transaction_id: u16,
    pub flags: u16,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl DnsHeader {
    /// QR bit: false = query, true = response
    pub fn is_response(&self) -> bool {
        self.flags & QR != 0
    }

    pub fn opcode(&self) -> u8 {
        ((self.flags & OPCODE) >> 11) as u8
    }

    pub fn authoritative(&self) -> bool {
        self.flags & AA != 0
    }

    pub fn truncated(&self) -> bool {
        self.flags & TC != 0
    }

    pub fn recursion_desired(&self) -> bool {
        self.flags & RD != 0
    }

    pub fn recursion_available(&self) -> bool {
        self.flags & RA != 0
    }

    /// The three reserved bits, which RFC 4035 reuses for AD and CD.
    pub fn z(&self) -> u8 {
        ((self.flags & Z) >> 4) as u8
    }

    pub fn authentic_data(&self) -> bool {
        self.flags & AD != 0
    }

    pub fn checking_disabled(&self) -> bool {
        self.flags & CD != 0
    }

    pub fn rcode(&self) -> u8 {
        (self.flags & RCODE) as u8
    }
}

pub fn decode_dns_header(view: &mut PacketView<'_>) -> Result<DnsHeader> {
    view.enter(Stage::DnsHeader);
    view.require(DNS_HEADER_LEN)?;

    Ok(DnsHeader {
        transaction_id: view.read_u16_be()?,
        flags: view.read_u16_be()?,
        question_count: view.read_u16_be()?,
        answer_count: view.read_u16_be()?,
        authority_count: view.read_u16_be()?,
        additional_count: view.read_u16_be()?,
    })
}
