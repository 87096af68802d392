use crate::dns::{DissectedMessage, DomainEvent, TranslationEvent, decode_message};
use crate::error::{DissectError, Result};
use crate::packet::{
    ArpOpcode, EtherType, EthernetHeader, IpHeader, PacketView, TransportSummary, UDP_HEADER_LEN,
    UdpHeader, decode_arp_opcode, decode_ethernet, decode_ipv4, decode_ipv6, decode_transport,
};
use crate::report;
use chrono::{DateTime, Local};
use log::debug;

pub const DNS_PORT: u16 = 53;

/// How a frame is rendered and which events it produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub verbose: bool,
    pub collect_domains: bool,
    pub collect_translations: bool,
    /// Capture time of the frame, printed when present.
    pub timestamp: Option<DateTime<Local>>,
}

impl DisplayOptions {
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkLayer {
    Ip(IpHeader),
    Arp(ArpOpcode),
}

/// Everything decoded from one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSummary {
    pub captured_len: usize,
    pub ethernet: EthernetHeader,
    pub network: NetworkLayer,
    pub transport: Option<TransportSummary>,
    pub dns: Option<DissectedMessage>,
}

impl FrameSummary {
    pub fn ip(&self) -> Option<&IpHeader> {
        match &self.network {
            NetworkLayer::Ip(ip) => Some(ip),
            NetworkLayer::Arp(_) => None,
        }
    }

    pub fn udp(&self) -> Option<&UdpHeader> {
        match &self.transport {
            Some(TransportSummary::Udp(udp)) => Some(udp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DissectResult {
    pub formatted_text: String,
    pub domain_events: Vec<DomainEvent>,
    pub translation_events: Vec<TranslationEvent>,
    pub error: Option<DissectError>,
    pub frame: Option<FrameSummary>,
}

/// Dissects one captured frame.
///
/// Never fails as a whole: problems with this frame are reported through
/// `error` and a diagnostic line in `formatted_text`, and the caller moves on
/// to the next frame.
pub fn dissect(raw: &[u8], captured_len: usize, options: DisplayOptions) -> DissectResult {
    let frame = match dissect_frame(raw, captured_len) {
        Ok(frame) => frame,
        Err(err) => {
            debug!("Frame abandoned: {err}");
            return DissectResult {
                formatted_text: report::format_error(&err, &options),
                error: Some(err),
                ..Default::default()
            };
        }
    };

    let error = match (&frame.dns, &frame.transport) {
        (Some(message), _) => message.error,
        (None, Some(TransportSummary::Other(protocol))) => {
            Some(DissectError::UnsupportedProtocol(protocol.to_u8()))
        }
        _ => None,
    };

    let mut domain_events = Vec::new();
    let mut translation_events = Vec::new();
    if let Some(message) = &frame.dns {
        for skipped in message.records().filter_map(|rr| rr.unsupported()) {
            debug!("Record skipped: {skipped}");
        }
        if options.collect_domains {
            domain_events = message
                .domain_names()
                .into_iter()
                .map(|name| DomainEvent {
                    name: name.as_str().to_string(),
                })
                .collect();
        }
        if options.collect_translations {
            translation_events = message
                .translations()
                .into_iter()
                .map(|(name, addr)| TranslationEvent {
                    name: name.as_str().to_string(),
                    addr,
                })
                .collect();
        }
    }

    DissectResult {
        formatted_text: report::format_frame(&frame, error.as_ref(), &options),
        domain_events,
        translation_events,
        error,
        frame: Some(frame),
    }
}

/// Ethernet -> {IPv4 | IPv6 | ARP} -> transport -> DNS when UDP port 53 is
/// involved on either side.
fn dissect_frame(raw: &[u8], captured_len: usize) -> Result<FrameSummary> {
    let mut view = PacketView::new(raw, captured_len);
    let captured_len = view.total_length();
    let ethernet = decode_ethernet(&mut view)?;

    let ip = match ethernet.ether_type {
        EtherType::Ipv4 => IpHeader::V4(decode_ipv4(&mut view)?),
        EtherType::Ipv6 => IpHeader::V6(decode_ipv6(&mut view)?),
        EtherType::Arp => {
            let opcode = decode_arp_opcode(&mut view)?;
            return Ok(FrameSummary {
                captured_len,
                ethernet,
                network: NetworkLayer::Arp(opcode),
                transport: None,
                dns: None,
            });
        }
        EtherType::Unknown(value) => return Err(DissectError::UnsupportedEtherType(value)),
    };

    let transport = decode_transport(&mut view, ip.protocol())?;

    let dns = match transport {
        TransportSummary::Udp(udp) if udp.src_port == DNS_PORT || udp.dst_port == DNS_PORT => {
            Some(decode_message(udp_payload(&view, &udp))?)
        }
        _ => None,
    };

    Ok(FrameSummary {
        captured_len,
        ethernet,
        network: NetworkLayer::Ip(ip),
        transport: Some(transport),
        dns,
    })
}

/// The datagram payload, cut to the UDP length field when the capture holds
/// more (Ethernet padding). A length field that is invalid or claims more than
/// was captured is ignored.
fn udp_payload<'a>(view: &PacketView<'a>, udp: &UdpHeader) -> &'a [u8] {
    let rest = view.rest();
    let declared = usize::from(udp.length);
    if declared < UDP_HEADER_LEN {
        return rest;
    }
    rest.get(..declared - UDP_HEADER_LEN).unwrap_or(rest)
}
