use mote_codec::FrameBytes;
use mote_core::{Endpoint, NodeAddress, SecurityKey};

/// Per-request transmission options, mirroring the radio stack's option
/// bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTxOptions {
    /// Request end-to-end delivery acknowledgement.
    pub ack_requested: bool,
    /// Encrypt with the network security key.
    pub security: bool,
    /// PAN-wide broadcast; broadcast cannot be acknowledged per recipient.
    pub broadcast: bool,
}

/// Outbound transmission handed to the link layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTxRequest {
    pub destination: NodeAddress,
    pub options: LinkTxOptions,
    /// Encoded frame (sender-name prefix plus payload), owned by the
    /// request so caller buffers can be reused immediately.
    pub frame: FrameBytes,
}

/// Completion status reported by the link layer for one transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Success,
    Error,
    OutOfMemory,
    NoAck,
    NoRoute,
    ChannelAccessFailure,
    PhyNoAck,
}

impl DeliveryStatus {
    /// Whether this status represents a delivered, acknowledged message.
    pub fn is_success(self) -> bool {
        matches!(self, DeliveryStatus::Success)
    }
}

/// Inbound frame surfaced by the link layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    /// 16-bit network address of the sending node.
    pub source: u16,
    /// Endpoint the frame was addressed to.
    pub endpoint: Endpoint,
    /// Raw frame bytes, sender-name prefix still attached.
    pub bytes: FrameBytes,
}

/// Narrow capability surface of the external mesh network/radio stack.
///
/// Contract: every submitted request yields exactly one completion status
/// through [`LinkLayer::poll_completion`], in the same order requests were
/// submitted. The transport's FIFO in-flight queue relies on this ordering
/// guarantee and cannot verify it internally.
pub trait LinkLayer {
    fn set_own_address(&mut self, address: u16);
    fn set_pan_id(&mut self, pan_id: u16);
    fn set_channel(&mut self, channel: u8);
    fn set_security_key(&mut self, key: &SecurityKey);
    /// Enables or disables the receive path.
    fn set_receive_enabled(&mut self, enabled: bool);
    /// Enables inbound dispatch for `endpoint`.
    fn open_channel(&mut self, endpoint: Endpoint);
    /// Accepts an outbound transmission. Failures are reported through a
    /// later completion status, never at the call site.
    fn submit(&mut self, request: LinkTxRequest);
    /// Next pending completion, in submission order.
    fn poll_completion(&mut self) -> Option<DeliveryStatus>;
    /// Next pending inbound frame.
    fn poll_inbound(&mut self) -> Option<InboundFrame>;
    /// Whether a network operation is currently pending.
    fn is_busy(&self) -> bool;
    /// Requests the radio low-power state (cooperative, may be declined).
    fn request_sleep(&mut self);
    /// Wakes the radio from its low-power state.
    fn request_wake(&mut self);
    /// Drives the link's internal processing; call once per host-loop
    /// iteration.
    fn tick(&mut self);
}
