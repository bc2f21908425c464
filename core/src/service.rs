//! Startup and lifetime of the responder process.
//!
//! Every configuration problem is raised before the link is opened, so a bad
//! invocation never sends or reads a single frame.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use arper_common::config::Config;
use arper_common::network::address_set::AddressSet;
use arper_common::network::compiler::{self, CompiledRanges};
use arper_common::network::interface;
use pnet::datalink::NetworkInterface;
use pnet::util::MacAddr;
use tracing::{info, warn};

use crate::announcer::{AnnouncePlan, Announcer};
use crate::network::LinkClient;
use crate::responder::Responder;

/// Compiles the configuration, binds the interface and serves ARP until
/// interrupted or until the capture side of the link goes away.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let CompiledRanges {
        set,
        total_addresses,
    } = compiler::compile(&config.ranges, config.policy)?;
    info!("{total_addresses} address(es) in {} included range(s)", set.included().len());

    let gratuitous: Option<(AnnouncePlan, Duration)> = config
        .gratuitous
        .map(|g| AnnouncePlan::new(&set, g.max_addresses).map(|plan| (plan, g.interval)))
        .transpose()?;

    let intf: NetworkInterface = interface::find_by_name(&config.interface)?;
    if let Err(reason) = interface::check_viability(&intf, config.hardware_address.is_some()) {
        warn!("{}: {reason}, ARP may not work as expected", intf.name);
    }
    let hw: MacAddr = interface::resolve_hardware_address(&intf, config.hardware_address)?;
    info!("Answering on {} as {hw}", intf.name);

    if !is_root::is_root() {
        warn!("Not running as root, opening a raw socket will likely fail");
    }

    let client = Arc::new(
        LinkClient::open(&intf).with_context(|| format!("opening ARP client on {}", intf.name))?,
    );
    let set: Arc<AddressSet> = Arc::new(set);

    let announcer: Option<Announcer> =
        gratuitous.map(|(plan, interval)| Announcer::start(plan, client.clone(), hw, interval));

    let responder = Responder::new(client, set, hw);

    let outcome: anyhow::Result<()> = tokio::select! {
        res = responder.run() => res.context("responder stopped"),
        sig = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            sig.context("listening for Ctrl-C")
        }
    };

    if let Some(announcer) = announcer {
        announcer.shutdown().await;
    }

    outcome
}
