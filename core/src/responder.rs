//! The **request responder**: the main receive loop.
//!
//! Every inbound ARP frame goes through the same filter chain:
//! 1. Link-layer destination must be broadcast or our hardware address.
//! 2. The operation must be a request.
//! 3. The target must not be excluded.
//! 4. The target must fall in an included block.
//!
//! Frames surviving the chain get a reply claiming the target for our
//! hardware address. Read and reply failures are logged and the loop moves
//! on, so one bad frame never costs ownership of the whole range.

use std::net::Ipv4Addr;
use std::sync::Arc;

use arper_common::network::address_set::AddressSet;
use arper_protocols::arp::ArpFrame;
use pnet::util::MacAddr;
use tracing::{debug, error, trace};

use crate::error::LinkError;
use crate::network::ArpClient;

/// Outcome of the filter chain for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Addressed to some other station.
    NotForUs,
    /// A reply or another non-request operation.
    NotRequest,
    /// Target is covered by an exclusion.
    Excluded,
    /// Target is outside every included block.
    NotClaimed,
    /// We answer for this address.
    Claim(Ipv4Addr),
}

pub struct Responder<C: ArpClient + ?Sized> {
    client: Arc<C>,
    set: Arc<AddressSet>,
    hw: MacAddr,
}

impl<C: ArpClient + ?Sized> Responder<C> {
    pub fn new(client: Arc<C>, set: Arc<AddressSet>, hw: MacAddr) -> Self {
        Self { client, set, hw }
    }

    pub fn evaluate(&self, frame: &ArpFrame) -> Verdict {
        if frame.destination != MacAddr::broadcast() && frame.destination != self.hw {
            return Verdict::NotForUs;
        }

        if !frame.message.is_request() {
            return Verdict::NotRequest;
        }

        let target: Ipv4Addr = frame.message.target_ip;

        if self.set.is_excluded(target) {
            return Verdict::Excluded;
        }

        if !self.set.is_included(target) {
            return Verdict::NotClaimed;
        }

        Verdict::Claim(target)
    }

    /// Runs the filter chain on `frame` and replies when the target is ours.
    pub async fn handle(&self, frame: &ArpFrame) -> Result<Verdict, LinkError> {
        let verdict: Verdict = self.evaluate(frame);
        trace!(target_ip = %frame.message.target_ip, ?verdict, "ARP frame from {}", frame.source);

        if let Verdict::Claim(target) = verdict {
            self.client.reply(&frame.message, self.hw, target).await?;
            debug!(
                "Claimed {target} as {} for {} ({})",
                self.hw, frame.message.sender_ip, frame.message.sender_hw
            );
        }

        Ok(verdict)
    }

    /// Serves requests until the client reports [`LinkError::Closed`].
    ///
    /// Every other error is logged and skipped. In normal operation this
    /// never returns.
    pub async fn run(&self) -> Result<(), LinkError> {
        loop {
            let frame: ArpFrame = match self.client.read().await {
                Ok(frame) => frame,
                Err(LinkError::Closed) => return Err(LinkError::Closed),
                Err(e) => {
                    error!("Failed to read ARP frame: {e}");
                    continue;
                }
            };

            if let Err(e) = self.handle(&frame).await {
                error!("Failed to reply to {}: {e}", frame.message.sender_ip);
            }
        }
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
