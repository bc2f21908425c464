//! Shared models for `arper`: the claimed address set, the range compiler
//! feeding it, configuration and interface lookup.

pub mod config;
pub mod error;
pub mod network;

pub use error::ConfigError;
