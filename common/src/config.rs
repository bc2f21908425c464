use std::time::Duration;

use pnet::util::MacAddr;

use crate::network::address_set::ExclusionPolicy;

pub const DEFAULT_GRATUITOUS_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_GRATUITOUS_MAX: u64 = 1024;

/// Validated runtime configuration of the responder.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the interface to bind, e.g. `eth0`.
    pub interface: String,
    /// Hardware address to claim with instead of the interface's own.
    pub hardware_address: Option<MacAddr>,
    /// `None` disables gratuitous ARP entirely.
    pub gratuitous: Option<GratuitousConfig>,
    pub policy: ExclusionPolicy,
    /// Raw range tokens, compiled at startup.
    pub ranges: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GratuitousConfig {
    /// Pause between two announcements of the same address.
    pub interval: Duration,
    /// Upper bound on the number of included addresses we agree to announce.
    ///
    /// Each announced address gets its own task, so a `/8` would otherwise
    /// spawn millions of them.
    pub max_addresses: u64,
}

impl Default for GratuitousConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_GRATUITOUS_INTERVAL,
            max_addresses: DEFAULT_GRATUITOUS_MAX,
        }
    }
}
