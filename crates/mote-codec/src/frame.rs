use heapless::Vec;
use mote_core::{DeviceName, DEVICE_NAME_LEN};

use crate::error::CodecError;

/// Maximum application payload per transmission.
pub const MAX_PAYLOAD_LEN: usize = 196;

/// Maximum encoded frame length: name prefix plus payload.
pub const MAX_FRAME_LEN: usize = DEVICE_NAME_LEN + MAX_PAYLOAD_LEN;

/// Bounded application payload buffer. Fixed capacity keeps the hot path
/// free of heap allocation.
pub type Payload = Vec<u8, MAX_PAYLOAD_LEN>;

/// Bounded encoded frame buffer.
pub type FrameBytes = Vec<u8, MAX_FRAME_LEN>;

/// Borrowed view of a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameView<'a> {
    /// Sender's device name recovered from the prefix.
    pub sender: DeviceName,
    /// Application payload with the name prefix stripped.
    pub payload: &'a [u8],
}

/// Encodes `sender ++ payload` into an owned frame buffer.
pub fn encode_frame(sender: &DeviceName, payload: &Payload) -> FrameBytes {
    let mut bytes = FrameBytes::new();
    // Capacity is DEVICE_NAME_LEN + MAX_PAYLOAD_LEN, so neither write can
    // overflow.
    let _ = bytes.extend_from_slice(sender.as_bytes());
    let _ = bytes.extend_from_slice(payload);
    bytes
}

/// Decodes a frame, splitting the fixed name prefix from the payload.
pub fn decode_frame(bytes: &[u8]) -> Result<FrameView<'_>, CodecError> {
    if bytes.len() < DEVICE_NAME_LEN {
        return Err(CodecError::FrameTooShort(bytes.len()));
    }
    let payload = &bytes[DEVICE_NAME_LEN..];
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(CodecError::PayloadTooLong(payload.len()));
    }
    let mut name = [0_u8; DEVICE_NAME_LEN];
    name.copy_from_slice(&bytes[..DEVICE_NAME_LEN]);
    Ok(FrameView {
        sender: DeviceName::from_wire(name),
        payload,
    })
}
