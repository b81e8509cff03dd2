//! Core mote primitives shared across crates.
//!
//! Includes endpoint/address types, the immutable per-device identity, and
//! the base error type.

pub mod error;
pub mod identity;
pub mod types;

pub use error::MoteError;
pub use identity::{DeviceName, NodeIdentity, SecurityKey, DEVICE_NAME_LEN, SECURITY_KEY_LEN};
pub use types::{Endpoint, NodeAddress, BROADCAST_ADDRESS, ENDPOINT_COUNT};
