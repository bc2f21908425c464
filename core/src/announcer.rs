//! # Gratuitous ARP Announcer
//!
//! Periodically broadcasts an unsolicited reply for every claimed address so
//! that peers holding a stale cache entry switch over without waiting for a
//! request.
//!
//! Work is split in two steps:
//! * [`AnnouncePlan::new`] is pure. It enforces the address ceiling and lists
//!   the addresses to announce, so an oversized configuration is rejected
//!   before any task exists.
//! * [`Announcer::start`] spawns one task per planned address. Each task owns
//!   its timer and stops on its own if a transmission fails.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use arper_common::error::ConfigError;
use arper_common::network::address_set::AddressSet;
use arper_common::network::range::Ipv4Cidr;
use arper_protocols::arp::ArpMessage;
use pnet::util::MacAddr;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::network::ArpClient;

/// Addresses admitted for gratuitous announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncePlan {
    addresses: Vec<Ipv4Addr>,
}

impl AnnouncePlan {
    /// Fails with [`ConfigError::TooManyAddresses`] when the included blocks
    /// of `set` span more than `max_addresses`, counted before exclusions.
    ///
    /// Addresses covered by several included blocks are planned once.
    pub fn new(set: &AddressSet, max_addresses: u64) -> Result<Self, ConfigError> {
        let count: u64 = set.total_included();
        if count > max_addresses {
            return Err(ConfigError::TooManyAddresses {
                count,
                max: max_addresses,
            });
        }

        let mut seen: HashSet<Ipv4Addr> = HashSet::new();
        let addresses: Vec<Ipv4Addr> = set
            .included()
            .iter()
            .flat_map(Ipv4Cidr::addresses)
            .filter(|addr| !set.is_excluded(*addr))
            .filter(|addr| seen.insert(*addr))
            .collect();

        Ok(Self { addresses })
    }

    pub fn addresses(&self) -> &[Ipv4Addr] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Handle over the running announcement tasks.
///
/// Dropping it makes every task exit promptly, but nothing joins them. Use
/// [`Announcer::shutdown`] to wait for them.
pub struct Announcer {
    shutdown: watch::Sender<bool>,
    jobs: Vec<JoinHandle<()>>,
}

impl Announcer {
    /// Spawns one announcement task per planned address.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<C>(plan: AnnouncePlan, client: Arc<C>, hw: MacAddr, interval: Duration) -> Self
    where
        C: ArpClient + ?Sized + 'static,
    {
        let (shutdown, shutdown_rx) = watch::channel(false);

        let jobs: Vec<JoinHandle<()>> = plan
            .addresses
            .into_iter()
            .map(|addr| {
                debug!(addr = %addr, "Starting gratuitous ARP for {addr}");
                tokio::spawn(announce(client.clone(), addr, hw, interval, shutdown_rx.clone()))
            })
            .collect();

        info!("Announcing {} address(es) every {}s", jobs.len(), interval.as_secs());

        Self { shutdown, jobs }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Tasks that have not stopped yet.
    pub fn active(&self) -> usize {
        self.jobs.iter().filter(|job| !job.is_finished()).count()
    }

    /// Signals every task to stop and waits for all of them.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for job in self.jobs {
            let _ = job.await;
        }
    }
}

async fn announce<C>(
    client: Arc<C>,
    addr: Ipv4Addr,
    hw: MacAddr,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    C: ArpClient + ?Sized,
{
    let message = ArpMessage::gratuitous(hw, addr);

    loop {
        if let Err(e) = client.write_to(&message, MacAddr::broadcast()).await {
            error!(addr = %addr, "Gratuitous ARP for {addr} failed, stopping: {e}");
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.changed() => return,
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
