//! The link-layer ARP client the responder and announcer talk to.
//!
//! [`ArpClient`] is the seam: the engines only see frames and messages, so
//! tests can drive them with an in-memory client while the binary uses
//! [`LinkClient`] on a real interface.

use std::net::Ipv4Addr;
use std::sync::Mutex;

use arper_protocols::arp::{self, ArpFrame, ArpMessage};
use async_trait::async_trait;
use pnet::datalink::{DataLinkSender, NetworkInterface};
use pnet::util::MacAddr;

use crate::error::LinkError;
use crate::network::channel::{self, EthernetHandle, FrameQueue};

#[async_trait]
pub trait ArpClient: Send + Sync {
    /// Waits for the next inbound ARP frame.
    async fn read(&self) -> Result<ArpFrame, LinkError>;

    /// Answers `request`, stating that `hw` owns `claimed`.
    ///
    /// The reply goes straight to the requester's hardware address.
    async fn reply(&self, request: &ArpMessage, hw: MacAddr, claimed: Ipv4Addr) -> Result<(), LinkError> {
        let reply = ArpMessage::reply_to(request, hw, claimed);
        self.write_to(&reply, request.sender_hw).await
    }

    /// Sends `message` to the link-layer `destination`.
    async fn write_to(&self, message: &ArpMessage, destination: MacAddr) -> Result<(), LinkError>;
}

/// [`ArpClient`] backed by a pnet datalink channel.
pub struct LinkClient {
    tx: Mutex<Box<dyn DataLinkSender>>,
    rx: tokio::sync::Mutex<FrameQueue>,
}

impl LinkClient {
    pub fn open(intf: &NetworkInterface) -> anyhow::Result<Self> {
        Ok(Self::from(channel::start_capture(intf)?))
    }

    fn send(&self, bytes: &[u8]) -> Result<(), LinkError> {
        let mut sender = self.tx.lock().map_err(|_| LinkError::Poisoned)?;
        match sender.send_to(bytes, None) {
            Some(result) => Ok(result?),
            None => Err(LinkError::SendUnavailable),
        }
    }
}

impl From<EthernetHandle> for LinkClient {
    fn from(handle: EthernetHandle) -> Self {
        Self {
            tx: Mutex::new(handle.tx),
            rx: tokio::sync::Mutex::new(handle.rx),
        }
    }
}

#[async_trait]
impl ArpClient for LinkClient {
    async fn read(&self) -> Result<ArpFrame, LinkError> {
        let mut rx = self.rx.lock().await;
        match rx.recv().await {
            Some(Ok(bytes)) => arp::decode(&bytes).map_err(|e| LinkError::Malformed(format!("{e:#}"))),
            Some(Err(e)) => Err(LinkError::Io(e)),
            None => Err(LinkError::Closed),
        }
    }

    async fn write_to(&self, message: &ArpMessage, destination: MacAddr) -> Result<(), LinkError> {
        let bytes: Vec<u8> = arp::encode(message, destination)
            .map_err(|e| LinkError::Malformed(format!("{e:#}")))?;
        self.send(&bytes)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
