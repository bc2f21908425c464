//! # IPv4 Prefix Arithmetic
//!
//! Pure helpers over CIDR blocks: network and broadcast addresses, the
//! address successor and enumeration of every address in a block.

use std::fmt;
use std::net::Ipv4Addr;

use pnet::ipnetwork::{IpNetworkError, Ipv4Network};

/// An IPv4 block described by a base address and a prefix length (0-32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Cidr {
    base: Ipv4Addr,
    prefix: u8,
}

impl Ipv4Cidr {
    /// Builds a canonical block: host bits of `addr` are cleared.
    ///
    /// Fails when `prefix` is larger than 32.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self, IpNetworkError> {
        let network = Ipv4Network::new(addr, prefix)?;
        Ok(Self {
            base: network.network(),
            prefix,
        })
    }

    /// A single address, i.e. a `/32`.
    pub fn host(addr: Ipv4Addr) -> Self {
        Self {
            base: addr,
            prefix: 32,
        }
    }

    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn host_bits(&self) -> u8 {
        32 - self.prefix
    }

    fn mask(&self) -> u32 {
        match self.prefix {
            0 => 0,
            p => u32::MAX << (32 - p),
        }
    }

    pub fn network_address(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.base) & self.mask())
    }

    /// Only meaningful for blocks with at least two host bits.
    pub fn broadcast_address(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.base) | !self.mask())
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let mask = self.mask();
        u32::from(addr) & mask == u32::from(self.base) & mask
    }

    /// Number of addresses covered by the block, `2^(32 - prefix)`.
    pub fn size(&self) -> u64 {
        1u64 << self.host_bits()
    }

    /// Every address of the block in ascending order, starting at the base.
    ///
    /// A `/0` yields nothing. Each call starts a fresh iterator.
    pub fn addresses(&self) -> Addresses {
        let remaining = match self.prefix {
            0 => 0,
            _ => self.size(),
        };
        Addresses {
            current: self.base,
            remaining,
        }
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix)
    }
}

/// Big-endian increment with carry. `255.255.255.255` wraps to `0.0.0.0`.
pub fn successor(addr: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(addr).wrapping_add(1))
}

/// Iterator returned by [`Ipv4Cidr::addresses`].
///
/// Bounded by a count rather than by comparing addresses, so a block that
/// ends at `255.255.255.255` stops cleanly after the wrap.
#[derive(Debug, Clone)]
pub struct Addresses {
    current: Ipv4Addr,
    remaining: u64,
}

impl Iterator for Addresses {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let addr = self.current;
        self.current = successor(addr);
        self.remaining -= 1;
        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
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
