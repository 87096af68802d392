//! Frame builders for the integration tests. They encode exactly what they
//! are told, so tests can produce malformed messages as easily as valid ones.

#![allow(dead_code)]

use std::net::{Ipv4Addr, Ipv6Addr};

pub const CLIENT_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
pub const RESOLVER_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x02];

pub const TYPE_A: u16 = 1;
pub const TYPE_NS: u16 = 2;
pub const TYPE_CNAME: u16 = 5;
pub const TYPE_SOA: u16 = 6;
pub const TYPE_MX: u16 = 15;
pub const TYPE_TXT: u16 = 16;
pub const TYPE_AAAA: u16 = 28;
pub const TYPE_SRV: u16 = 33;
pub const CLASS_IN: u16 = 1;

/// Uncompressed wire form of a dotted name, root label included.
pub fn name(dotted: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in dotted.split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

/// A compression pointer to `offset` within the DNS message.
pub fn pointer(offset: u16) -> Vec<u8> {
    (0xC000 | offset).to_be_bytes().to_vec()
}

/// Assembles a DNS message from pre-encoded sections.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    id: u16,
    flags: u16,
    counts: [u16; 4],
    body: Vec<u8>,
}

impl MessageBuilder {
    pub fn query(id: u16) -> Self {
        Self {
            id,
            flags: 0x0100,
            ..Default::default()
        }
    }

    pub fn response(id: u16) -> Self {
        Self {
            id,
            flags: 0x8180,
            ..Default::default()
        }
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    /// Overrides the header counts regardless of what the body holds.
    pub fn counts(mut self, qd: u16, an: u16, ns: u16, ar: u16) -> Self {
        self.counts = [qd, an, ns, ar];
        self
    }

    /// Current length of the message, for computing pointer targets.
    pub fn len(&self) -> usize {
        12 + self.body.len()
    }

    pub fn question(mut self, qname: &[u8], qtype: u16, qclass: u16) -> Self {
        self.body.extend_from_slice(qname);
        self.body.extend_from_slice(&qtype.to_be_bytes());
        self.body.extend_from_slice(&qclass.to_be_bytes());
        self.counts[0] += 1;
        self
    }

    pub fn answer(mut self, record: Vec<u8>) -> Self {
        self.body.extend(record);
        self.counts[1] += 1;
        self
    }

    pub fn authority(mut self, record: Vec<u8>) -> Self {
        self.body.extend(record);
        self.counts[2] += 1;
        self
    }

    pub fn additional(mut self, record: Vec<u8>) -> Self {
        self.body.extend(record);
        self.counts[3] += 1;
        self
    }

    /// Appends bytes without touching any count.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.flags.to_be_bytes());
        for count in self.counts {
            out.extend_from_slice(&count.to_be_bytes());
        }
        out.extend(self.body);
        out
    }
}

/// One resource record with RDLENGTH taken from `rdata`.
pub fn record(owner: &[u8], rtype: u16, rclass: u16, ttl: u32, rdata: &[u8]) -> Vec<u8> {
    record_with_rdlength(owner, rtype, rclass, ttl, rdata.len() as u16, rdata)
}

/// One resource record whose RDLENGTH is given independently of `rdata`.
pub fn record_with_rdlength(
    owner: &[u8],
    rtype: u16,
    rclass: u16,
    ttl: u32,
    rdlength: u16,
    rdata: &[u8],
) -> Vec<u8> {
    let mut out = owner.to_vec();
    out.extend_from_slice(&rtype.to_be_bytes());
    out.extend_from_slice(&rclass.to_be_bytes());
    out.extend_from_slice(&ttl.to_be_bytes());
    out.extend_from_slice(&rdlength.to_be_bytes());
    out.extend_from_slice(rdata);
    out
}

pub fn ethernet(ether_type: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(14 + payload.len());
    out.extend_from_slice(&RESOLVER_MAC);
    out.extend_from_slice(&CLIENT_MAC);
    out.extend_from_slice(&ether_type.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn ipv4(src: Ipv4Addr, dst: Ipv4Addr, protocol: u8, payload: &[u8]) -> Vec<u8> {
    let total = (20 + payload.len()) as u16;
    let mut out = vec![0x45, 0x00];
    out.extend_from_slice(&total.to_be_bytes());
    out.extend_from_slice(&[0x12, 0x34, 0x00, 0x00, 64, protocol, 0x00, 0x00]);
    out.extend_from_slice(&src.octets());
    out.extend_from_slice(&dst.octets());
    out.extend_from_slice(payload);
    out
}

pub fn ipv6(src: Ipv6Addr, dst: Ipv6Addr, next_header: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0x60, 0x00, 0x00, 0x00];
    out.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    out.push(next_header);
    out.push(64);
    out.extend_from_slice(&src.octets());
    out.extend_from_slice(&dst.octets());
    out.extend_from_slice(payload);
    out
}

pub fn udp(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(&src_port.to_be_bytes());
    out.extend_from_slice(&dst_port.to_be_bytes());
    out.extend_from_slice(&((8 + payload.len()) as u16).to_be_bytes());
    out.extend_from_slice(&[0x00, 0x00]);
    out.extend_from_slice(payload);
    out
}

/// Ethernet + IPv4 + UDP around a DNS message.
pub fn udp4_frame(
    src: Ipv4Addr,
    dst: Ipv4Addr,
    src_port: u16,
    dst_port: u16,
    message: &[u8],
) -> Vec<u8> {
    ethernet(0x0800, &ipv4(src, dst, 17, &udp(src_port, dst_port, message)))
}

/// Ethernet + IPv6 + UDP around a DNS message.
pub fn udp6_frame(
    src: Ipv6Addr,
    dst: Ipv6Addr,
    src_port: u16,
    dst_port: u16,
    message: &[u8],
) -> Vec<u8> {
    ethernet(0x86DD, &ipv6(src, dst, 17, &udp(src_port, dst_port, message)))
}

pub const CLIENT: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 10);
pub const RESOLVER: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 53);

/// A query from CLIENT to RESOLVER.
pub fn query_frame(message: &[u8]) -> Vec<u8> {
    udp4_frame(CLIENT, RESOLVER, 40000, 53, message)
}

/// A response from RESOLVER to CLIENT.
pub fn response_frame(message: &[u8]) -> Vec<u8> {
    udp4_frame(RESOLVER, CLIENT, 53, 40000, message)
}
