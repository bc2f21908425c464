//! End-to-end checks of the responder and announcer engines, driven through
//! an in-memory [`mock::MockClient`] instead of a raw socket.

pub mod mock;

#[cfg(test)]
mod link;
#[cfg(test)]
mod respond;
#[cfg(test)]
mod startup;
