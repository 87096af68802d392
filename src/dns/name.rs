use crate::error::{DissectError, Result, Stage};
use crate::packet::PacketView;
use std::fmt;

/// RFC 1035 Section 2.3.4: a name is at most 255 octets on the wire.
pub const MAX_NAME_LEN: usize = 255;
/// RFC 1035 Section 2.3.4: labels are 63 octets or less.
pub const MAX_LABEL_LEN: usize = 63;
/// Upper bound on compression pointers followed for one name.
pub const MAX_POINTER_HOPS: usize = 128;

const POINTER_MASK: u8 = 0xC0;

/// A domain name reconstructed from its wire encoding, without the trailing
/// dot. The root name is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DomainName(String);

impl DomainName {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Fully qualified form, always ending with a dot.
    pub fn fqdn(&self) -> String {
        format!("{}.", self.0)
    }

    fn from_labels(labels: &[String]) -> Self {
        Self(labels.join("."))
    }
}

impl From<&str> for DomainName {
    fn from(name: &str) -> Self {
        Self(name.strip_suffix('.').unwrap_or(name).to_string())
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(".")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Parse a DNS domain name with compression support (RFC 1035 Section 4.1.4)
///
/// Domain names are a sequence of labels, each a length octet followed by
/// that many octets, ending with a zero octet:
///
/// ```text
///  +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///  | 3 | w | w | w | 7 | e | x | a | m | p | l | e | 3 | c | o | m | 0 |
///  +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
/// ```
///
/// A length octet with the top two bits set starts a 2-byte pointer whose low
/// 14 bits are an offset from the start of the message:
///
/// ```text
///  +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///  | 1  1|                OFFSET                   |
///  +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// `message` must be the whole DNS message so pointers can be resolved.
/// Returns the name and the number of bytes the NAME field occupies at
/// `start_offset`; a pointer always accounts for exactly 2 bytes there, no
/// matter how long the name it leads to is.
///
/// Input is untrusted:
/// - a pointer must target an offset before the label run it appears in,
///   which rules out self, forward and cyclic pointers;
/// - at most [`MAX_POINTER_HOPS`] pointers are followed;
/// - the expanded name may not exceed [`MAX_NAME_LEN`] octets;
/// - label types `01` and `10` are reserved and rejected.
pub fn decode_name(message: &[u8], start_offset: usize) -> Result<(DomainName, usize)> {
    let mut walk = NameWalk {
        message,
        labels: Vec::new(),
        wire_len: 0,
        hops: 0,
    };
    let consumed = walk.run(start_offset)?;
    Ok((DomainName::from_labels(&walk.labels), consumed))
}

struct NameWalk<'a> {
    message: &'a [u8],
    labels: Vec<String>,
    wire_len: usize,
    hops: usize,
}

impl NameWalk<'_> {
    /// Walks one run of labels starting at `start`, recursing into a pointer
    /// if the run ends with one. Returns the bytes the run occupies.
    fn run(&mut self, start: usize) -> Result<usize> {
        let mut view = PacketView::new(self.message, self.message.len());
        view.enter(Stage::DnsName);
        view.seek(start).map_err(|_| overrun())?;

        loop {
            let len = view.read_u8().map_err(|_| overrun())?;

            match len & POINTER_MASK {
                POINTER_MASK => {
                    let low = view.read_u8().map_err(|_| overrun())?;
                    let target = usize::from(u16::from_be_bytes([len & !POINTER_MASK, low]));
                    if target >= start {
                        return Err(DissectError::bad(
                            "compression pointer does not point backwards",
                        ));
                    }
                    self.hops += 1;
                    if self.hops > MAX_POINTER_HOPS {
                        return Err(DissectError::bad("too many compression pointers"));
                    }
                    self.run(target)?;
                    return Ok(view.position() - start);
                }
                0x00 if len == 0 => {
                    self.grow(1)?;
                    return Ok(view.position() - start);
                }
                0x00 => {
                    let label_len = usize::from(len);
                    self.grow(label_len + 1)?;
                    let label = view.read_fixed(label_len).map_err(|_| overrun())?;
                    self.labels.push(String::from_utf8_lossy(label).into_owned());
                }
                _ => return Err(DissectError::bad("reserved label type")),
            }
        }
    }

    fn grow(&mut self, octets: usize) -> Result<()> {
        self.wire_len += octets;
        if self.wire_len > MAX_NAME_LEN {
            return Err(DissectError::bad("domain name longer than 255 octets"));
        }
        Ok(())
    }
}

fn overrun() -> DissectError {
    DissectError::bad("domain name runs past end of message")
}
