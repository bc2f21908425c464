use thiserror::Error;

/// Problems found while turning operator input into a runnable configuration.
///
/// Every variant is fatal: startup stops before any frame is read or sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid address or range '{token}': {reason}")]
    InvalidRange { token: String, reason: String },

    #[error("a network interface must be given (-i)")]
    MissingInterface,

    #[error("at least one IP address or network must be given")]
    NoRanges,

    #[error("network interface '{0}' not found")]
    InterfaceNotFound(String),

    #[error("network interface '{0}' has no hardware address, pass one with -e")]
    NoHardwareAddress(String),

    #[error("invalid hardware address '{value}'")]
    InvalidHardwareAddress { value: String },

    #[error(
        "too many IP addresses for gratuitous ARP ({count} > {max}), \
         decrease the number of addresses or raise -M"
    )]
    TooManyAddresses { count: u64, max: u64 },

    #[error("gratuitous ARP interval must be at least one second")]
    InvalidInterval,
}
