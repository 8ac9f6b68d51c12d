use std::net::Ipv4Addr;

use pnet::packet::Packet;
use pnet::packet::ethernet::{EtherTypes, EthernetPacket, MutableEthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::{self, Ipv4Packet, MutableIpv4Packet};
use pnet::packet::vlan::VlanPacket;
use pnet::util::MacAddr;
use thiserror::Error;

pub const ETH_HDR_LEN: usize = 14;
pub const IPV4_HDR_LEN: usize = 20;
pub const VLAN_TAG_LEN: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("truncated Ethernet frame ({0} bytes)")]
    TruncatedEthernet(usize),
    #[error("truncated 802.1Q tag ({0} bytes)")]
    TruncatedVlan(usize),
    #[error("truncated or invalid IPv4 header ({0} bytes)")]
    MalformedIpv4(usize),
    #[error("buffer too small for an Ethernet/IPv4 frame")]
    Buffer,
}

/// Who sent a frame, as far as the link and network layers tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameIdentity {
    pub source_mac: MacAddr,
    /// Present only when the frame carries an IPv4 header.
    pub source_ipv4: Option<Ipv4Addr>,
}

/// Reads the sender identity out of a raw Ethernet frame.
///
/// 802.1Q tags are looked through, stacked ones included. Frames of any other
/// EtherType (ARP, IPv6) still yield the source MAC, but no IPv4 address.
pub fn decode_identity(bytes: &[u8]) -> Result<FrameIdentity, FrameError> {
    let eth_frame = EthernetPacket::new(bytes).ok_or(FrameError::TruncatedEthernet(bytes.len()))?;
    let source_mac: MacAddr = eth_frame.get_source();

    let mut ethertype = eth_frame.get_ethertype();
    let mut payload: &[u8] = &bytes[ETH_HDR_LEN..];
    while ethertype == EtherTypes::Vlan {
        let tag = VlanPacket::new(payload).ok_or(FrameError::TruncatedVlan(payload.len()))?;
        ethertype = tag.get_ethertype();
        payload = &payload[VLAN_TAG_LEN..];
    }

    if ethertype != EtherTypes::Ipv4 {
        return Ok(FrameIdentity {
            source_mac,
            source_ipv4: None,
        });
    }

    let ipv4_packet = Ipv4Packet::new(payload)
        .filter(|packet| packet.get_version() == 4)
        .ok_or(FrameError::MalformedIpv4(payload.len()))?;

    Ok(FrameIdentity {
        source_mac,
        source_ipv4: Some(ipv4_packet.get_source()),
    })
}

/// Builds a minimal Ethernet + IPv4 frame with an empty payload.
pub fn create_ipv4_frame(
    src_mac: MacAddr,
    dst_mac: MacAddr,
    src_addr: Ipv4Addr,
    dst_addr: Ipv4Addr,
) -> Result<Vec<u8>, FrameError> {
    let mut buffer: Vec<u8> = vec![0u8; ETH_HDR_LEN + IPV4_HDR_LEN];
    {
        let mut eth = MutableEthernetPacket::new(&mut buffer).ok_or(FrameError::Buffer)?;
        eth.set_source(src_mac);
        eth.set_destination(dst_mac);
        eth.set_ethertype(EtherTypes::Ipv4);
    }
    {
        let mut ip = MutableIpv4Packet::new(&mut buffer[ETH_HDR_LEN..]).ok_or(FrameError::Buffer)?;
        ip.set_version(4);
        ip.set_header_length(5);
        ip.set_total_length(IPV4_HDR_LEN as u16);
        ip.set_ttl(64);
        ip.set_next_level_protocol(IpNextHeaderProtocols::Udp);
        ip.set_source(src_addr);
        ip.set_destination(dst_addr);
        let checksum: u16 = ipv4::checksum(&ip.to_immutable());
        ip.set_checksum(checksum);
    }
    Ok(buffer)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
