//! # ARP over Ethernet
//!
//! Encoding and decoding of Ethernet/IPv4 ARP frames, plus the two message
//! shapes the responder emits: a directed reply and a gratuitous announcement.

use std::net::Ipv4Addr;

use anyhow::{Context, bail, ensure};
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperation, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::util::MacAddr;

use crate::{ARP_LEN, ETH_HDR_LEN, MIN_ETH_FRAME_NO_FCS, ethernet};

/// The ARP payload of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpMessage {
    pub operation: ArpOperation,
    pub sender_hw: MacAddr,
    pub sender_ip: Ipv4Addr,
    pub target_hw: MacAddr,
    pub target_ip: Ipv4Addr,
}

impl ArpMessage {
    /// Answers `request`, stating that `hw` owns `claimed`.
    pub fn reply_to(request: &ArpMessage, hw: MacAddr, claimed: Ipv4Addr) -> Self {
        Self {
            operation: ArpOperations::Reply,
            sender_hw: hw,
            sender_ip: claimed,
            target_hw: request.sender_hw,
            target_ip: request.sender_ip,
        }
    }

    /// Unsolicited reply announcing that `hw` owns `addr`.
    pub fn gratuitous(hw: MacAddr, addr: Ipv4Addr) -> Self {
        Self {
            operation: ArpOperations::Reply,
            sender_hw: hw,
            sender_ip: addr,
            target_hw: MacAddr::broadcast(),
            target_ip: addr,
        }
    }

    pub fn is_request(&self) -> bool {
        self.operation == ArpOperations::Request
    }
}

/// A received ARP message with the link-layer addresses around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpFrame {
    pub destination: MacAddr,
    pub source: MacAddr,
    pub message: ArpMessage,
}

/// Builds a minimum-size Ethernet frame carrying `message` to `destination`.
///
/// The Ethernet source is the message's sender hardware address.
pub fn encode(message: &ArpMessage, destination: MacAddr) -> anyhow::Result<Vec<u8>> {
    let mut buffer = [0u8; MIN_ETH_FRAME_NO_FCS];
    ethernet::make_header(&mut buffer, message.sender_hw, destination, EtherTypes::Arp)?;
    let mut arp_packet = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN])
        .context("failed to create mutable ARP packet")?;
    arp_packet.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp_packet.set_protocol_type(EtherTypes::Ipv4);
    arp_packet.set_hw_addr_len(6);
    arp_packet.set_proto_addr_len(4);
    arp_packet.set_operation(message.operation);
    arp_packet.set_sender_hw_addr(message.sender_hw);
    arp_packet.set_sender_proto_addr(message.sender_ip);
    arp_packet.set_target_hw_addr(message.target_hw);
    arp_packet.set_target_proto_addr(message.target_ip);
    Ok(Vec::from(buffer))
}

/// Parses an Ethernet frame holding an Ethernet/IPv4 ARP payload.
pub fn decode(bytes: &[u8]) -> anyhow::Result<ArpFrame> {
    let eth = EthernetPacket::new(bytes)
        .context(format!("truncated Ethernet frame (len {})", bytes.len()))?;

    if eth.get_ethertype() != EtherTypes::Arp {
        bail!("not an ARP frame (ethertype {})", eth.get_ethertype());
    }

    let arp = ArpPacket::new(eth.payload()).context(format!(
        "truncated or invalid ARP packet (payload len {})",
        eth.payload().len()
    ))?;

    ensure!(
        arp.get_hardware_type() == ArpHardwareTypes::Ethernet
            && arp.get_protocol_type() == EtherTypes::Ipv4
            && arp.get_hw_addr_len() == 6
            && arp.get_proto_addr_len() == 4,
        "unsupported ARP variant (htype {:?}, ptype {})",
        arp.get_hardware_type(),
        arp.get_protocol_type()
    );

    Ok(ArpFrame {
        destination: eth.get_destination(),
        source: eth.get_source(),
        message: ArpMessage {
            operation: arp.get_operation(),
            sender_hw: arp.get_sender_hw_addr(),
            sender_ip: arp.get_sender_proto_addr(),
            target_hw: arp.get_target_hw_addr(),
            target_ip: arp.get_target_proto_addr(),
        },
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
