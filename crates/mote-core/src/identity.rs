use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MoteError;

/// Fixed device-name field size, including the trailing NUL.
pub const DEVICE_NAME_LEN: usize = 24;

/// Fixed symmetric security-key size.
pub const SECURITY_KEY_LEN: usize = 16;

/// Human-readable device label, fixed 24 bytes, NUL-padded.
///
/// The name is prepended to every outbound payload so receivers can recover
/// a source label without a name-resolution service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceName([u8; DEVICE_NAME_LEN]);

impl DeviceName {
    /// Builds a name from text. The name must leave room for the trailing
    /// NUL and cannot embed NUL bytes itself.
    pub fn new(name: &str) -> Result<Self, MoteError> {
        if name.len() >= DEVICE_NAME_LEN {
            return Err(MoteError::DeviceNameTooLong(name.len()));
        }
        if name.bytes().any(|b| b == 0) {
            return Err(MoteError::DeviceNameEmbeddedNul);
        }
        let mut bytes = [0_u8; DEVICE_NAME_LEN];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self(bytes))
    }

    /// Reinterprets a raw name field received off the wire. The final byte
    /// is forced to NUL so the text view always terminates.
    pub fn from_wire(mut bytes: [u8; DEVICE_NAME_LEN]) -> Self {
        bytes[DEVICE_NAME_LEN - 1] = 0;
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DEVICE_NAME_LEN] {
        &self.0
    }

    /// Text up to the first NUL; empty when the prefix is not valid UTF-8.
    pub fn as_str(&self) -> &str {
        let end = self
            .0
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(DEVICE_NAME_LEN);
        core::str::from_utf8(&self.0[..end]).unwrap_or("")
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symmetric network key, fixed 16 bytes.
///
/// Bytes after the first NUL are forced to zero so that short textual keys
/// produce identical byte patterns across devices.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityKey([u8; SECURITY_KEY_LEN]);

impl SecurityKey {
    /// Builds a key from at most 16 bytes, zero-padding the remainder.
    pub fn new(key: &[u8]) -> Result<Self, MoteError> {
        if key.len() > SECURITY_KEY_LEN {
            return Err(MoteError::SecurityKeyTooLong(key.len()));
        }
        let mut bytes = [0_u8; SECURITY_KEY_LEN];
        bytes[..key.len()].copy_from_slice(key);
        Ok(Self::normalized(bytes))
    }

    /// Zeroes every byte after the first NUL.
    pub fn normalized(mut bytes: [u8; SECURITY_KEY_LEN]) -> Self {
        if let Some(end) = bytes.iter().position(|&b| b == 0) {
            for byte in &mut bytes[end..] {
                *byte = 0;
            }
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SECURITY_KEY_LEN] {
        &self.0
    }
}

// Key material stays out of Debug output.
impl fmt::Debug for SecurityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecurityKey(..)")
    }
}

/// Per-device configuration fixed at initialization and immutable after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIdentity {
    /// This node's own 16-bit network address.
    pub address: u16,
    /// Human-readable device name.
    pub name: DeviceName,
    /// Personal-area-network identifier, equal for every device on the
    /// network.
    pub pan_id: u16,
    /// Radio channel, equal for every device on the network.
    pub channel: u8,
    /// Key the messages will be encrypted with.
    pub security_key: SecurityKey,
}

impl NodeIdentity {
    pub fn new(
        address: u16,
        name: DeviceName,
        pan_id: u16,
        channel: u8,
        security_key: SecurityKey,
    ) -> Self {
        Self {
            address,
            name,
            pan_id,
            channel,
            security_key,
        }
    }
}
