//! # Range Compiler
//!
//! Turns the positional range arguments into an [`AddressSet`].
//!
//! Each token is one of:
//! * A CIDR block (e.g. `10.0.42.128/25`).
//! * A bare address, treated as a `/32` (e.g. `10.0.42.42`).
//! * Either of the above prefixed with `~`, which excludes it instead.
//!
//! Included blocks go through the auto-exclusion policy of the set; explicit
//! exclusions are stored as given.

use std::net::{AddrParseError, Ipv4Addr};
use std::num::ParseIntError;
use std::str::FromStr;

use pnet::ipnetwork::IpNetworkError;
use thiserror::Error;

use crate::error::ConfigError;
use crate::network::address_set::{AddressSet, ExclusionPolicy};
use crate::network::range::Ipv4Cidr;

pub const EXCLUSION_MARKER: char = '~';

/// Why a single block failed to parse.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("invalid IPv4 address '{value}': {source}")]
    Address {
        value: String,
        #[source]
        source: AddrParseError,
    },

    #[error("invalid prefix '{value}'")]
    PrefixFormat { value: String },

    #[error("invalid prefix '{value}': {source}")]
    PrefixValue {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error(transparent)]
    Network(#[from] IpNetworkError),
}

/// One parsed range argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    Include(Ipv4Cidr),
    Exclude(Ipv4Cidr),
}

impl FromStr for RangeSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |e: BlockError| ConfigError::InvalidRange {
            token: s.to_string(),
            reason: e.to_string(),
        };

        match s.strip_prefix(EXCLUSION_MARKER) {
            Some(rest) => parse_block(rest).map(RangeSpec::Exclude).map_err(invalid),
            None => parse_block(s).map(RangeSpec::Include).map_err(invalid),
        }
    }
}

/// The compiled set plus the number of addresses its included blocks span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRanges {
    pub set: AddressSet,
    pub total_addresses: u64,
}

/// Compiles every token into one [`AddressSet`].
///
/// The first malformed token aborts the whole compilation.
pub fn compile<I, S>(tokens: I, policy: ExclusionPolicy) -> Result<CompiledRanges, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let specs: Vec<RangeSpec> = tokens
        .into_iter()
        .map(|token| token.as_ref().trim().parse::<RangeSpec>())
        .collect::<Result<_, _>>()?;

    if specs.is_empty() {
        return Err(ConfigError::NoRanges);
    }

    let mut builder = AddressSet::builder(policy);
    for spec in specs {
        match spec {
            RangeSpec::Include(block) => builder.include(block),
            RangeSpec::Exclude(block) => builder.exclude(block),
        };
    }

    let set: AddressSet = builder.build();
    let total_addresses: u64 = set.total_included();

    Ok(CompiledRanges {
        set,
        total_addresses,
    })
}

/// Parses `a.b.c.d/p` or a bare `a.b.c.d`.
fn parse_block(s: &str) -> Result<Ipv4Cidr, BlockError> {
    let parse_addr = |value: &str| {
        value.parse::<Ipv4Addr>().map_err(|source| BlockError::Address {
            value: value.to_string(),
            source,
        })
    };

    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Ok(Ipv4Cidr::host(parse_addr(s)?));
    };

    let addr: Ipv4Addr = parse_addr(ip_str)?;

    if prefix_str.is_empty() || !prefix_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BlockError::PrefixFormat {
            value: prefix_str.to_string(),
        });
    }

    let prefix: u8 = prefix_str.parse().map_err(|source| BlockError::PrefixValue {
        value: prefix_str.to_string(),
        source,
    })?;

    Ok(Ipv4Cidr::new(addr, prefix)?)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
