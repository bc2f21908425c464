//! # Claimed Address Set
//!
//! The set of IPv4 addresses this host answers for, built from included and
//! excluded blocks. Exclusions always win over inclusions, whatever order the
//! blocks were added in.
//!
//! The set is assembled through [`AddressSetBuilder`] and frozen by
//! [`AddressSetBuilder::build`]. After that it is read-only, so it can be
//! shared between the responder and every announcement job behind an `Arc`
//! without any locking.

use std::net::Ipv4Addr;

use tracing::info;

use crate::network::range::Ipv4Cidr;

/// Controls which addresses of an included block are dropped automatically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExclusionPolicy {
    /// Keep the network (first) address of each included block.
    pub include_network: bool,
    /// Keep the broadcast (last) address of each included block.
    pub include_broadcast: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSet {
    included: Vec<Ipv4Cidr>,
    excluded: Vec<Ipv4Cidr>,
}

impl AddressSet {
    pub fn builder(policy: ExclusionPolicy) -> AddressSetBuilder {
        AddressSetBuilder {
            policy,
            included: Vec::new(),
            excluded: Vec::new(),
        }
    }

    /// True when `addr` falls in an included block and in no excluded one.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.is_included(addr) && !self.is_excluded(addr)
    }

    pub fn is_included(&self, addr: Ipv4Addr) -> bool {
        self.included.iter().any(|block| block.contains(addr))
    }

    pub fn is_excluded(&self, addr: Ipv4Addr) -> bool {
        self.excluded.iter().any(|block| block.contains(addr))
    }

    pub fn included(&self) -> &[Ipv4Cidr] {
        &self.included
    }

    pub fn excluded(&self) -> &[Ipv4Cidr] {
        &self.excluded
    }

    /// Sum of the sizes of all included blocks, before exclusions.
    ///
    /// Overlapping blocks are counted once per block.
    pub fn total_included(&self) -> u64 {
        self.included.iter().map(Ipv4Cidr::size).sum()
    }
}

/// The only mutable stage of an [`AddressSet`].
#[derive(Debug)]
pub struct AddressSetBuilder {
    policy: ExclusionPolicy,
    included: Vec<Ipv4Cidr>,
    excluded: Vec<Ipv4Cidr>,
}

impl AddressSetBuilder {
    /// Adds `block` to the claimed addresses.
    ///
    /// Blocks with at least two host bits (prefix 30 or shorter) also get
    /// their network and broadcast addresses excluded, unless the policy
    /// keeps them. `/31` and `/32` are never trimmed.
    pub fn include(&mut self, block: Ipv4Cidr) -> &mut Self {
        info!(range = %block, "Listening for {block}");
        self.included.push(block);

        if block.host_bits() >= 2 {
            if !self.policy.include_network {
                self.auto_exclude(block.network_address());
            }
            if !self.policy.include_broadcast {
                self.auto_exclude(block.broadcast_address());
            }
        }
        self
    }

    /// Adds `block` to the exclusions verbatim.
    pub fn exclude(&mut self, block: Ipv4Cidr) -> &mut Self {
        info!(range = %block, "Excluding {block}");
        self.excluded.push(block);
        self
    }

    fn auto_exclude(&mut self, addr: Ipv4Addr) {
        let block = Ipv4Cidr::host(addr);
        info!(range = %block, "Ignoring {block}");
        self.excluded.push(block);
    }

    pub fn build(self) -> AddressSet {
        AddressSet {
            included: self.included,
            excluded: self.excluded,
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
