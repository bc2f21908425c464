use thiserror::Error;

/// Failures of the link-layer ARP client at runtime.
///
/// Everything except [`LinkError::Closed`] is transient: the caller logs it
/// and carries on with the next frame or announcement.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("link I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("datalink sender could not take the frame")]
    SendUnavailable,

    #[error("datalink sender lock poisoned")]
    Poisoned,

    #[error("capture channel closed")]
    Closed,
}
