use thiserror::Error;

/// Errors returned by frame decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Frame shorter than the fixed sender-name prefix.
    #[error("frame too short: {0} bytes")]
    FrameTooShort(usize),
    /// Frame body longer than the maximum application payload.
    #[error("frame payload too long: {0} bytes")]
    PayloadTooLong(usize),
}
