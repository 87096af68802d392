use super::header::{DNS_HEADER_LEN, DnsHeader, decode_dns_header};
use super::name::DomainName;
use super::record::{Question, RData, ResourceRecord, decode_question, decode_rr};
use crate::error::{DissectError, Result};
use crate::packet::PacketView;
use std::net::IpAddr;

/// A DNS message decoded from one frame.
///
/// Records that decoded before a malformed one are kept; the failure that
/// stopped section iteration is recorded in `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DissectedMessage {
    pub header: DnsHeader,
    pub question: Option<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
    pub error: Option<DissectError>,
}

impl DissectedMessage {
    /// Every record of every section, in wire order.
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
    }

    /// Names this message mentions, in order of first appearance: the
    /// question, record owners and names carried in RDATA. Records that were
    /// skipped as unsupported contribute nothing.
    pub fn domain_names(&self) -> Vec<&DomainName> {
        let mut names = Vec::new();
        if let Some(question) = &self.question {
            push_unique(&mut names, &question.name);
        }
        for rr in self.records().filter(|rr| rr.is_supported()) {
            push_unique(&mut names, &rr.name);
            for name in rr.rdata.names() {
                push_unique(&mut names, name);
            }
        }
        names
    }

    /// Name to address pairs from A and AAAA records, without repeats.
    pub fn translations(&self) -> Vec<(&DomainName, IpAddr)> {
        let mut pairs: Vec<(&DomainName, IpAddr)> = Vec::new();
        for rr in self.records() {
            let addr = match rr.rdata {
                RData::A(addr) => IpAddr::V4(addr),
                RData::Aaaa(addr) => IpAddr::V6(addr),
                _ => continue,
            };
            if !pairs.contains(&(&rr.name, addr)) {
                pairs.push((&rr.name, addr));
            }
        }
        pairs
    }
}

fn push_unique<'a>(names: &mut Vec<&'a DomainName>, name: &'a DomainName) {
    if !name.is_root() && !names.contains(&name) {
        names.push(name);
    }
}

/// Parse DNS message (RFC 1035 Section 4.1)
///
/// ```text
///     +---------------------+
///     |        Header       |  12 bytes
///     +---------------------+
///     |       Question      |  only the first entry is kept
///     +---------------------+
///     |        Answer       |  ANCOUNT records
///     +---------------------+
///     |      Authority      |  NSCOUNT records
///     +---------------------+
///     |      Additional     |  ARCOUNT records
///     +---------------------+
/// ```
///
/// A header or question failure is returned as `Err`. A record failure stops
/// iteration and is stored in [`DissectedMessage::error`].
pub fn decode_message(message: &[u8]) -> Result<DissectedMessage> {
    let mut view = PacketView::new(message, message.len());
    let header = decode_dns_header(&mut view)?;
    let mut offset = DNS_HEADER_LEN;

    let mut question = None;
    for index in 0..header.question_count {
        let (name, qtype, qclass, consumed) = decode_question(message, offset)?;
        offset += consumed;
        if index == 0 {
            question = Some(Question {
                name,
                qtype,
                qclass,
            });
        }
    }

    let mut decoded = DissectedMessage {
        header,
        question,
        answers: Vec::new(),
        authorities: Vec::new(),
        additionals: Vec::new(),
        error: None,
    };

    let sections = [
        (header.answer_count, &mut decoded.answers),
        (header.authority_count, &mut decoded.authorities),
        (header.additional_count, &mut decoded.additionals),
    ];
    for (count, records) in sections {
        if let Err(e) = decode_section(message, &mut offset, count, records) {
            decoded.error = Some(e);
            break;
        }
    }

    Ok(decoded)
}

fn decode_section(
    message: &[u8],
    offset: &mut usize,
    count: u16,
    records: &mut Vec<ResourceRecord>,
) -> Result<()> {
    for _ in 0..count {
        let (record, consumed) = decode_rr(message, *offset)?;
        *offset += consumed;
        records.push(record);
    }
    Ok(())
}
