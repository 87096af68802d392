//! Text rendering of dissected frames. Nothing here parses bytes.

use crate::dissect::{DisplayOptions, FrameSummary, NetworkLayer};
use crate::dns::{DissectedMessage, ResourceRecord};
use crate::error::DissectError;
use crate::packet::TransportSummary;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR: &str = "====================";

/// Renders a successfully dissected frame. `error` is the non-fatal problem
/// the orchestrator attached to it, if any.
///
/// Compact mode prints one line per DNS message and nothing for other
/// traffic.
pub fn format_frame(
    frame: &FrameSummary,
    error: Option<&DissectError>,
    options: &DisplayOptions,
) -> String {
    let mut lines = match (&frame.dns, options.verbose) {
        (Some(message), true) => verbose_dns(frame, message, options),
        (Some(message), false) => vec![compact_dns(frame, message, options)],
        (None, true) => verbose_other(frame, options),
        (None, false) => Vec::new(),
    };

    if let Some(err) = error
        && !err.is_informational()
        && !options.verbose
    {
        lines.push(diagnostic(err, options));
    }

    join_lines(lines)
}

/// One diagnostic line for a frame that could not be dissected.
/// Informational errors are only shown in verbose mode.
pub fn format_error(err: &DissectError, options: &DisplayOptions) -> String {
    if err.is_informational() && !options.verbose {
        return String::new();
    }
    join_lines(vec![diagnostic(err, options)])
}

fn diagnostic(err: &DissectError, options: &DisplayOptions) -> String {
    let kind = if err.is_informational() { "note" } else { "error" };
    format!("{}{kind}: {err}", timestamp_prefix(options))
}

fn timestamp_prefix(options: &DisplayOptions) -> String {
    options
        .timestamp
        .map(|ts| format!("{} ", ts.format(TIMESTAMP_FORMAT)))
        .unwrap_or_default()
}

fn join_lines(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

/// `2024-09-17 14:08:03 (R 1/2/0/0)  192.168.1.1 -> 192.168.1.2`
fn compact_dns(
    frame: &FrameSummary,
    message: &DissectedMessage,
    options: &DisplayOptions,
) -> String {
    let h = &message.header;
    let (src, dst) = match frame.ip() {
        Some(ip) => (ip.src().to_string(), ip.dst().to_string()),
        None => ("?".to_string(), "?".to_string()),
    };
    format!(
        "{}({} {}/{}/{}/{})  {src} -> {dst}",
        timestamp_prefix(options),
        if h.is_response() { 'R' } else { 'Q' },
        h.question_count,
        h.answer_count,
        h.authority_count,
        h.additional_count
    )
}

fn verbose_dns(
    frame: &FrameSummary,
    message: &DissectedMessage,
    options: &DisplayOptions,
) -> Vec<String> {
    let h = &message.header;
    let mut lines = Vec::new();

    if let Some(ts) = options.timestamp {
        lines.push(format!("Timestamp: {}", ts.format(TIMESTAMP_FORMAT)));
    }
    if let Some(ip) = frame.ip() {
        lines.push(format!("SrcIP: {}", ip.src()));
        lines.push(format!("DstIP: {}", ip.dst()));
    }
    if let Some(udp) = frame.udp() {
        lines.push(format!("SrcPort: UDP/{}", udp.src_port));
        lines.push(format!("DstPort: UDP/{}", udp.dst_port));
    }
    lines.push(format!("Identifier: 0x{:04X}", h.transaction_id));
    lines.push(format!(
        "Flags: QR={}, OPCODE={}, AA={}, TC={}, RD={}, RA={}, AD={}, CD={}, RCODE={}",
        u8::from(h.is_response()),
        h.opcode(),
        u8::from(h.authoritative()),
        u8::from(h.truncated()),
        u8::from(h.recursion_desired()),
        u8::from(h.recursion_available()),
        u8::from(h.authentic_data()),
        u8::from(h.checking_disabled()),
        h.rcode()
    ));
    lines.push(String::new());

    if let Some(q) = &message.question {
        lines.push("[Question Section]".to_string());
        lines.push(format!("{} {} {}", q.name.fqdn(), q.qclass, q.qtype));
        lines.push(String::new());
    }

    let sections = [
        ("Answer", &message.answers),
        ("Authority", &message.authorities),
        ("Additional", &message.additionals),
    ];
    for (title, records) in sections {
        if records.is_empty() {
            continue;
        }
        lines.push(format!("[{title} Section]"));
        lines.extend(records.iter().map(record_line));
        lines.push(String::new());
    }

    if let Some(err) = &message.error {
        lines.push(format!("[Error] {err}"));
        lines.push(String::new());
    }

    lines.push(SEPARATOR.to_string());
    lines
}

/// `example.com. A 300 IN 93.184.216.34`
pub fn record_line(rr: &ResourceRecord) -> String {
    let prefix = format!("{} {} {} {}", rr.name.fqdn(), rr.rtype, rr.ttl, rr.rclass);
    if rr.is_supported() {
        format!("{prefix} {}", rr.rdata)
    } else {
        format!("{prefix} (not supported)")
    }
}

fn verbose_other(frame: &FrameSummary, options: &DisplayOptions) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(ts) = options.timestamp {
        lines.push(format!("Timestamp: {}", ts.format(TIMESTAMP_FORMAT)));
    }
    lines.push(format!("SrcMAC: {}", frame.ethernet.src_mac));
    lines.push(format!("DstMAC: {}", frame.ethernet.dst_mac));
    lines.push(format!("FrameLength: {} bytes", frame.captured_len));
    lines.push(format!("EtherType: {}", frame.ethernet.ether_type));

    match &frame.network {
        NetworkLayer::Arp(opcode) => lines.push(format!("Opcode: {opcode}")),
        NetworkLayer::Ip(ip) => {
            lines.push(format!("SrcIP: {}", ip.src()));
            lines.push(format!("DstIP: {}", ip.dst()));
            lines.push(format!("Protocol: {}", ip.protocol()));
        }
    }

    match frame.transport {
        Some(TransportSummary::Udp(udp)) => {
            lines.push(format!("SrcPort: UDP/{}", udp.src_port));
            lines.push(format!("DstPort: UDP/{}", udp.dst_port));
        }
        Some(TransportSummary::Tcp { src_port, dst_port }) => {
            lines.push(format!("SrcPort: TCP/{src_port}"));
            lines.push(format!("DstPort: TCP/{dst_port}"));
        }
        Some(
            TransportSummary::Icmp { icmp_type, code }
            | TransportSummary::Icmpv6 { icmp_type, code },
        ) => {
            lines.push(format!("Type: {icmp_type} (0x{icmp_type:02x})"));
            lines.push(format!("Code: {code} (0x{code:02x})"));
        }
        Some(TransportSummary::Igmp {
            igmp_type,
            code,
            group,
        }) => {
            lines.push(format!("Type: {igmp_type} (0x{igmp_type:02x})"));
            lines.push(format!("Code: {code} (0x{code:02x})"));
            if let Some(group) = group {
                lines.push(format!("GroupAddress: {group}"));
            }
        }
        Some(TransportSummary::Other(protocol)) => {
            let note = DissectError::UnsupportedProtocol(protocol.to_u8());
            lines.push(format!("note: {note}"));
        }
        None => {}
    }

    lines.push(SEPARATOR.to_string());
    lines
}
