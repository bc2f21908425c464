use pnet::datalink::{self, NetworkInterface};
use pnet::util::MacAddr;
use thiserror::Error;

use crate::error::ConfigError;

/// Reasons an interface is a poor fit for answering ARP.
///
/// These are reported, not enforced: the operator may know better.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    #[error("interface is down")]
    IsDown,
    /// Loopback devices never see ARP traffic.
    #[error("interface is a loopback device")]
    IsLoopback,
    /// The interface does not have a MAC address and none was supplied.
    #[error("interface has no hardware address")]
    NoMacAddress,
    /// The interface does not support broadcast (required for ARP).
    #[error("interface does not support broadcast")]
    NotBroadcast,
    /// The interface is a point-to-point link (e.g., a VPN).
    #[error("interface is point-to-point")]
    IsPointToPoint,
}

/// Looks the interface up by exact name among the system's interfaces.
pub fn find_by_name(name: &str) -> Result<NetworkInterface, ConfigError> {
    select_by_name(name, datalink::interfaces())
}

fn select_by_name(
    name: &str,
    interfaces: Vec<NetworkInterface>,
) -> Result<NetworkInterface, ConfigError> {
    interfaces
        .into_iter()
        .find(|interface| interface.name == name)
        .ok_or_else(|| ConfigError::InterfaceNotFound(name.to_string()))
}

/// Picks the hardware address replies are sent with.
///
/// An explicit override always wins over the interface's own address.
pub fn resolve_hardware_address(
    interface: &NetworkInterface,
    override_addr: Option<MacAddr>,
) -> Result<MacAddr, ConfigError> {
    if let Some(mac) = override_addr {
        return Ok(mac);
    }

    interface
        .mac
        .filter(|mac| *mac != MacAddr::zero())
        .ok_or_else(|| ConfigError::NoHardwareAddress(interface.name.clone()))
}

/// Checks whether ARP can sensibly be answered on `interface`.
///
/// `has_override` skips the hardware address check.
pub fn check_viability(
    interface: &NetworkInterface,
    has_override: bool,
) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if !has_override && interface.mac.is_none_or(|mac| mac == MacAddr::zero()) {
        return Err(ViabilityError::NoMacAddress);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }

    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
