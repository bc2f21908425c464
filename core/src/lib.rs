//! Runtime engines of `arper`.
//!
//! * [`responder`] answers inbound ARP requests for the claimed addresses.
//! * [`announcer`] periodically broadcasts gratuitous ARP for them.
//! * [`network`] holds the link-layer client both engines talk through.
//! * [`service`] wires everything together for the binary.

pub mod announcer;
pub mod error;
pub mod network;
pub mod responder;
pub mod service;

pub use error::LinkError;
