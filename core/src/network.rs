pub mod channel;
pub mod client;

pub use client::{ArpClient, LinkClient};
