//! Fixed-size link, network and transport headers.

mod ethernet;
mod ip;
mod transport;
mod view;

pub use ethernet::{
    ARP_FIXED_LEN, ArpOpcode, ETHERNET_HEADER_LEN, EtherType, EthernetHeader, MacAddr,
    decode_arp_opcode, decode_ethernet,
};
pub use ip::{
    IPV4_HEADER_LEN, IPV6_HEADER_LEN, IpHeader, IpProtocol, Ipv4Header, Ipv6Header, decode_ipv4,
    decode_ipv6,
};
pub use transport::{TransportSummary, UDP_HEADER_LEN, UdpHeader, decode_transport, decode_udp};
pub use view::PacketView;
