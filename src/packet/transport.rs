use super::ip::IpProtocol;
use super::view::PacketView;
use crate::error::{Result, Stage};
use std::net::Ipv4Addr;

pub const UDP_HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHeader {
    pub src_port: u16,
    pub dst_port: u16,
    pub length: u16,
    pub checksum: u16,
}

/// Parse UDP header (RFC 768)
///
/// ```text
/// [0-1]: Source Port
/// [2-3]: Destination Port
/// [4-5]: Length (header + payload)
/// [6-7]: Checksum
/// ```
pub fn decode_udp(view: &mut PacketView<'_>) -> Result<UdpHeader> {
    view.enter(Stage::Udp);
    view.require(UDP_HEADER_LEN)?;

    Ok(UdpHeader {
        src_port: view.read_u16_be()?,
        dst_port: view.read_u16_be()?,
        length: view.read_u16_be()?,
        checksum: view.read_u16_be()?,
    })
}

/// What we learn about the transport layer. Only UDP is decoded further;
/// the rest is identified and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportSummary {
    Udp(UdpHeader),
    Tcp {
        src_port: u16,
        dst_port: u16,
    },
    Icmp {
        icmp_type: u8,
        code: u8,
    },
    Icmpv6 {
        icmp_type: u8,
        code: u8,
    },
    Igmp {
        igmp_type: u8,
        code: u8,
        group: Option<Ipv4Addr>,
    },
    Other(IpProtocol),
}

/// Dispatches on the IP protocol byte. The view must sit on the first byte
/// after the IP header.
pub fn decode_transport(
    view: &mut PacketView<'_>,
    protocol: IpProtocol,
) -> Result<TransportSummary> {
    match protocol {
        IpProtocol::Udp => decode_udp(view).map(TransportSummary::Udp),
        IpProtocol::Tcp => {
            view.enter(Stage::Transport);
            view.require(4)?;
            Ok(TransportSummary::Tcp {
                src_port: view.read_u16_be()?,
                dst_port: view.read_u16_be()?,
            })
        }
        IpProtocol::Icmp | IpProtocol::Icmpv6 => {
            view.enter(Stage::Transport);
            let [icmp_type, code] = view.read_array()?;
            Ok(if protocol == IpProtocol::Icmp {
                TransportSummary::Icmp { icmp_type, code }
            } else {
                TransportSummary::Icmpv6 { icmp_type, code }
            })
        }
        IpProtocol::Igmp => {
            // type, code/max resp time, checksum, group address
            view.enter(Stage::Transport);
            let [igmp_type, code] = view.read_array()?;
            let group = if view.remaining() >= 6 {
                view.skip(2)?;
                Some(Ipv4Addr::from(view.read_array::<4>()?))
            } else {
                None
            };
            Ok(TransportSummary::Igmp {
                igmp_type,
                code,
                group,
            })
        }
        IpProtocol::Unknown(_) => Ok(TransportSummary::Other(protocol)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DissectError;

    #[test]
    fn udp_fields() {
        let bytes = [0xd4, 0x31, 0x00, 0x35, 0x00, 0x1d, 0xbe, 0xef, 0x99];
        let mut view = PacketView::new(&bytes, bytes.len());
        let udp = decode_udp(&mut view).unwrap();

        assert_eq!(udp.src_port, 54321);
        assert_eq!(udp.dst_port, 53);
        assert_eq!(udp.length, 29);
        assert_eq!(udp.checksum, 0xbeef);
        assert_eq!(view.rest(), &[0x99]);
    }

    #[test]
    fn udp_truncated() {
        let bytes = [0u8; 7];
        let mut view = PacketView::new(&bytes, bytes.len());
        assert_eq!(
            decode_udp(&mut view).unwrap_err(),
            DissectError::TruncatedPacket { stage: Stage::Udp }
        );
    }

    #[test]
    fn identifies_other_protocols() {
        let tcp = [0x01, 0xbb, 0xc0, 0x00];
        let mut view = PacketView::new(&tcp, tcp.len());
        assert_eq!(
            decode_transport(&mut view, IpProtocol::Tcp).unwrap(),
            TransportSummary::Tcp {
                src_port: 443,
                dst_port: 49152
            }
        );

        let icmp = [8, 0];
        let mut view = PacketView::new(&icmp, icmp.len());
        assert_eq!(
            decode_transport(&mut view, IpProtocol::Icmp).unwrap(),
            TransportSummary::Icmp {
                icmp_type: 8,
                code: 0
            }
        );

        let igmp = [0x16, 0x00, 0x00, 0x00, 239, 1, 2, 3];
        let mut view = PacketView::new(&igmp, igmp.len());
        assert_eq!(
            decode_transport(&mut view, IpProtocol::Igmp).unwrap(),
            TransportSummary::Igmp {
                igmp_type: 0x16,
                code: 0,
                group: Some(Ipv4Addr::new(239, 1, 2, 3))
            }
        );

        let mut view = PacketView::new(&[], 0);
        assert_eq!(
            decode_transport(&mut view, IpProtocol::Unknown(47)).unwrap(),
            TransportSummary::Other(IpProtocol::Unknown(47))
        );
    }
}
