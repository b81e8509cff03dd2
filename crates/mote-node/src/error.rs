use thiserror::Error;

/// Errors returned by transmission enqueueing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnqueueError {
    /// Every in-flight slot is taken. The queue drains only through
    /// asynchronous completions, so callers must yield back to the host
    /// loop before retrying.
    #[error("transmission buffer full")]
    TransmissionBufferFull,
}
