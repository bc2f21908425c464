use std::str::FromStr;

use pnet::util::MacAddr;

use crate::error::ConfigError;

/// Parses a hardware address given on the command line.
///
/// Accepts colon (`02:00:5e:10:00:01`) and hyphen (`02-00-5e-10-00-01`) separators.
pub fn parse_hardware_address(value: &str) -> Result<MacAddr, ConfigError> {
    let normalized: String = value.trim().replace('-', ":");
    let invalid = || ConfigError::InvalidHardwareAddress {
        value: value.to_string(),
    };

    if normalized.split(':').count() != 6 {
        return Err(invalid());
    }

    MacAddr::from_str(&normalized).map_err(|_| invalid())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
