use std::collections::{HashSet, VecDeque};
use std::io;
use std::net::Ipv4Addr;
use std::sync::Mutex;

use arper_core::network::ArpClient;
use arper_core::LinkError;
use arper_protocols::arp::{ArpFrame, ArpMessage};
use async_trait::async_trait;
use pnet::packet::arp::ArpOperations;
use pnet::util::MacAddr;

pub const OUR_MAC: MacAddr = MacAddr(0x02, 0x00, 0x00, 0x00, 0x00, 0x42);
pub const PEER_MAC: MacAddr = MacAddr(0x02, 0x00, 0x00, 0x00, 0x00, 0x07);
pub const PEER_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 42, 1);

/// A frame the client was asked to put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sent {
    pub message: ArpMessage,
    pub destination: MacAddr,
}

/// Scripted [`ArpClient`].
///
/// `read` hands out the queued items in order, then reports
/// [`LinkError::Closed`]. Writes are recorded unless the claimed address
/// was marked as failing.
#[derive(Default)]
pub struct MockClient {
    inbound: tokio::sync::Mutex<VecDeque<Result<ArpFrame, LinkError>>>,
    sent: Mutex<Vec<Sent>>,
    failing: Mutex<HashSet<Ipv4Addr>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Result<ArpFrame, LinkError>>,
    {
        Self {
            inbound: tokio::sync::Mutex::new(items.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Makes every write whose sender address is `addr` fail.
    pub fn fail_writes_for(self, addr: Ipv4Addr) -> Self {
        self.failing.lock().unwrap().insert(addr);
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_for(&self, addr: Ipv4Addr) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| s.message.sender_ip == addr)
            .collect()
    }
}

#[async_trait]
impl ArpClient for MockClient {
    async fn read(&self) -> Result<ArpFrame, LinkError> {
        self.inbound
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(LinkError::Closed))
    }

    async fn write_to(&self, message: &ArpMessage, destination: MacAddr) -> Result<(), LinkError> {
        if self.failing.lock().unwrap().contains(&message.sender_ip) {
            return Err(LinkError::Io(io::Error::other("injected write failure")));
        }
        self.sent.lock().unwrap().push(Sent {
            message: *message,
            destination,
        });
        Ok(())
    }
}

/// Broadcast who-has for `target` from the usual peer.
pub fn who_has(target: Ipv4Addr) -> ArpFrame {
    ArpFrame {
        destination: MacAddr::broadcast(),
        source: PEER_MAC,
        message: ArpMessage {
            operation: ArpOperations::Request,
            sender_hw: PEER_MAC,
            sender_ip: PEER_IP,
            target_hw: MacAddr::zero(),
            target_ip: target,
        },
    }
}

pub fn ip(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}
