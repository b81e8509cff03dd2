use thiserror::Error;

/// Shared lightweight error type for core primitive validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoteError {
    /// Endpoint 0 is reserved by the network layer.
    #[error("endpoint 0 is reserved by the network layer")]
    ReservedEndpoint,
    /// Endpoint identifier above the fixed endpoint range.
    #[error("endpoint out of range: {0}")]
    EndpointOutOfRange(u8),
    /// Device name does not leave room for the trailing NUL.
    #[error("device name too long: {0} bytes")]
    DeviceNameTooLong(usize),
    /// Device names are NUL-terminated on the wire and cannot embed NULs.
    #[error("device name contains an embedded NUL byte")]
    DeviceNameEmbeddedNul,
    /// Security key longer than the fixed key size.
    #[error("security key too long: {0} bytes")]
    SecurityKeyTooLong(usize),
}
