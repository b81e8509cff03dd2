//! Payload framing for mote transmissions.
//!
//! Every outbound payload carries a fixed-size sender-name prefix:
//! `senderName(24, NUL-padded) ++ applicationPayload(<=196)`. Inbound
//! frames are parsed with the same layout.

pub mod error;
pub mod frame;

pub use error::CodecError;
pub use frame::{
    decode_frame, encode_frame, FrameBytes, FrameView, Payload, MAX_FRAME_LEN, MAX_PAYLOAD_LEN,
};
