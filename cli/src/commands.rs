use std::time::Duration;

use arper_common::config::{Config, DEFAULT_GRATUITOUS_MAX, GratuitousConfig};
use arper_common::error::ConfigError;
use arper_common::network::address_set::ExclusionPolicy;
use arper_common::network::mac;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "arper")]
#[command(about = "Answer ARP requests for a set of IPv4 addresses and networks.")]
#[command(after_help = "RANGES are addresses (10.0.42.42) or networks (10.0.42.128/25).\n\
                        Prefix one with '~' to exclude it, e.g. ~10.0.42.142.")]
pub struct CommandLine {
    /// Network interface to answer on
    #[arg(short = 'i', long = "interface", value_name = "IFNAME")]
    pub interface: Option<String>,

    /// Hardware address to answer with instead of the interface's own
    #[arg(short = 'e', long = "ether", value_name = "MAC")]
    pub ether: Option<String>,

    /// Send gratuitous ARP for every claimed address
    #[arg(short = 'g', long = "gratuitous")]
    pub gratuitous: bool,

    /// Interval between gratuitous ARP announcements, in seconds
    #[arg(short = 'G', long = "gratuitous-interval", value_name = "SECONDS", default_value_t = 60)]
    pub gratuitous_interval: u64,

    /// Maximum number of IP addresses for gratuitous ARP (one task per address!)
    #[arg(short = 'M', long = "gratuitous-max", value_name = "COUNT", default_value_t = DEFAULT_GRATUITOUS_MAX)]
    pub gratuitous_max: u64,

    /// Also claim the network address of each range
    #[arg(short = 'N', long = "include-network")]
    pub include_network: bool,

    /// Also claim the broadcast address of each range
    #[arg(short = 'B', long = "include-broadcast")]
    pub include_broadcast: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Addresses and networks to claim, '~' prefix to exclude
    #[arg(value_name = "RANGES")]
    pub ranges: Vec<String>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validates the arguments into a runtime [`Config`].
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let interface: String = match self.interface.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(ConfigError::MissingInterface),
        };

        if self.ranges.is_empty() {
            return Err(ConfigError::NoRanges);
        }

        let hardware_address = self
            .ether
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(mac::parse_hardware_address)
            .transpose()?;

        let gratuitous: Option<GratuitousConfig> = match self.gratuitous {
            false => None,
            true if self.gratuitous_interval == 0 => return Err(ConfigError::InvalidInterval),
            true => Some(GratuitousConfig {
                interval: Duration::from_secs(self.gratuitous_interval),
                max_addresses: self.gratuitous_max,
            }),
        };

        Ok(Config {
            interface,
            hardware_address,
            gratuitous,
            policy: ExclusionPolicy {
                include_network: self.include_network,
                include_broadcast: self.include_broadcast,
            },
            ranges: self.ranges.clone(),
        })
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
