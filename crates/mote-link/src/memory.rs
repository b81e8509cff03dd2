use std::collections::VecDeque;

use mote_codec::FrameBytes;
use mote_core::{Endpoint, SecurityKey, ENDPOINT_COUNT};

use crate::link::{DeliveryStatus, InboundFrame, LinkLayer, LinkTxRequest};

/// In-memory link layer for tests and simulations.
///
/// Records configuration calls and submitted requests, and generates
/// completions strictly in submission order, either manually
/// ([`InMemoryLink::complete_next`]) or automatically on every tick
/// ([`InMemoryLink::set_auto_complete`]).
#[derive(Debug, Default, Clone)]
pub struct InMemoryLink {
    own_address: Option<u16>,
    pan_id: Option<u16>,
    channel: Option<u8>,
    security_key: Option<SecurityKey>,
    receive_enabled: bool,
    open_channels: [bool; ENDPOINT_COUNT],
    pending: VecDeque<LinkTxRequest>,
    captured: Vec<LinkTxRequest>,
    completions: VecDeque<DeliveryStatus>,
    inbound: VecDeque<InboundFrame>,
    auto_complete: Option<DeliveryStatus>,
    asleep: bool,
    sleep_requests: u32,
    wake_requests: u32,
}

impl InMemoryLink {
    /// Creates a link that completes every submission with `status` on the
    /// next tick.
    pub fn with_auto_complete(status: DeliveryStatus) -> Self {
        Self {
            auto_complete: Some(status),
            ..Self::default()
        }
    }

    /// Sets or clears automatic per-tick completion.
    pub fn set_auto_complete(&mut self, status: Option<DeliveryStatus>) {
        self.auto_complete = status;
    }

    /// Completes the oldest pending submission with `status`.
    ///
    /// Returns false when nothing is pending.
    pub fn complete_next(&mut self, status: DeliveryStatus) -> bool {
        if self.pending.pop_front().is_none() {
            return false;
        }
        self.completions.push_back(status);
        true
    }

    /// Queues a raw completion without consuming a pending submission.
    /// Lets tests exercise spurious completions.
    pub fn push_completion(&mut self, status: DeliveryStatus) {
        self.completions.push_back(status);
    }

    /// Queues an inbound frame from `source` on `endpoint`.
    pub fn push_inbound(&mut self, source: u16, endpoint: Endpoint, bytes: FrameBytes) {
        self.inbound.push_back(InboundFrame {
            source,
            endpoint,
            bytes,
        });
    }

    /// Drains and returns every submission captured so far.
    pub fn take_submitted(&mut self) -> Vec<LinkTxRequest> {
        std::mem::take(&mut self.captured)
    }

    /// Submissions awaiting a completion.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn own_address(&self) -> Option<u16> {
        self.own_address
    }

    pub fn pan_id(&self) -> Option<u16> {
        self.pan_id
    }

    pub fn channel(&self) -> Option<u8> {
        self.channel
    }

    pub fn security_key(&self) -> Option<&SecurityKey> {
        self.security_key.as_ref()
    }

    pub fn receive_enabled(&self) -> bool {
        self.receive_enabled
    }

    pub fn is_channel_open(&self, endpoint: Endpoint) -> bool {
        self.open_channels[endpoint.index()]
    }

    pub fn is_asleep(&self) -> bool {
        self.asleep
    }

    pub fn sleep_requests(&self) -> u32 {
        self.sleep_requests
    }

    pub fn wake_requests(&self) -> u32 {
        self.wake_requests
    }
}

impl LinkLayer for InMemoryLink {
    fn set_own_address(&mut self, address: u16) {
        self.own_address = Some(address);
    }

    fn set_pan_id(&mut self, pan_id: u16) {
        self.pan_id = Some(pan_id);
    }

    fn set_channel(&mut self, channel: u8) {
        self.channel = Some(channel);
    }

    fn set_security_key(&mut self, key: &SecurityKey) {
        self.security_key = Some(*key);
    }

    fn set_receive_enabled(&mut self, enabled: bool) {
        self.receive_enabled = enabled;
    }

    fn open_channel(&mut self, endpoint: Endpoint) {
        self.open_channels[endpoint.index()] = true;
    }

    fn submit(&mut self, request: LinkTxRequest) {
        self.pending.push_back(request.clone());
        self.captured.push(request);
    }

    fn poll_completion(&mut self) -> Option<DeliveryStatus> {
        self.completions.pop_front()
    }

    fn poll_inbound(&mut self) -> Option<InboundFrame> {
        self.inbound.pop_front()
    }

    fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    fn request_sleep(&mut self) {
        self.asleep = true;
        self.sleep_requests += 1;
    }

    fn request_wake(&mut self) {
        self.asleep = false;
        self.wake_requests += 1;
    }

    fn tick(&mut self) {
        if let Some(status) = self.auto_complete {
            while self.pending.pop_front().is_some() {
                self.completions.push_back(status);
            }
        }
    }
}

/// Routes every captured submission from one in-memory link into another
/// link's inbound queue, tagging frames as sent by `source`.
///
/// Returns the number of frames moved.
pub fn route_submitted(from: &mut InMemoryLink, to: &mut InMemoryLink, source: u16) -> usize {
    let submitted = from.take_submitted();
    let moved = submitted.len();
    for request in submitted {
        to.push_inbound(source, request.destination.endpoint, request.frame);
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::{route_submitted, InMemoryLink};
    use crate::link::{DeliveryStatus, LinkLayer, LinkTxOptions, LinkTxRequest};
    use mote_codec::FrameBytes;
    use mote_core::{Endpoint, NodeAddress, SecurityKey};

    fn sample_request(address: u16, marker: u8) -> LinkTxRequest {
        let endpoint = Endpoint::new(1).expect("endpoint should be valid");
        LinkTxRequest {
            destination: NodeAddress::new(address, endpoint),
            options: LinkTxOptions {
                ack_requested: true,
                security: true,
                broadcast: false,
            },
            frame: FrameBytes::from_slice(&[marker; 30]).expect("frame should fit"),
        }
    }

    #[test]
    fn configuration_calls_are_recorded() {
        let mut link = InMemoryLink::default();
        let key = SecurityKey::new(b"k").expect("key should fit");
        let endpoint = Endpoint::new(5).expect("endpoint should be valid");

        link.set_own_address(0x8001);
        link.set_pan_id(0x4567);
        link.set_channel(0x0F);
        link.set_security_key(&key);
        link.set_receive_enabled(true);
        link.open_channel(endpoint);

        assert_eq!(link.own_address(), Some(0x8001));
        assert_eq!(link.pan_id(), Some(0x4567));
        assert_eq!(link.channel(), Some(0x0F));
        assert_eq!(link.security_key(), Some(&key));
        assert!(link.receive_enabled());
        assert!(link.is_channel_open(endpoint));
        assert!(!link.is_channel_open(Endpoint::new(6).expect("endpoint should be valid")));
    }

    #[test]
    fn auto_complete_flushes_pending_in_submission_order() {
        let mut link = InMemoryLink::with_auto_complete(DeliveryStatus::Success);
        link.submit(sample_request(0x0001, 0xAA));
        link.submit(sample_request(0x0002, 0xBB));
        assert!(link.is_busy());

        link.tick();
        assert!(!link.is_busy());
        assert_eq!(link.poll_completion(), Some(DeliveryStatus::Success));
        assert_eq!(link.poll_completion(), Some(DeliveryStatus::Success));
        assert_eq!(link.poll_completion(), None);

        let submitted = link.take_submitted();
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[0].frame[0], 0xAA);
        assert_eq!(submitted[1].frame[0], 0xBB);
    }

    #[test]
    fn manual_completion_consumes_one_pending_submission() {
        let mut link = InMemoryLink::default();
        link.submit(sample_request(0x0001, 0x01));

        assert!(link.complete_next(DeliveryStatus::NoAck));
        assert!(!link.complete_next(DeliveryStatus::NoAck));
        assert_eq!(link.poll_completion(), Some(DeliveryStatus::NoAck));
        assert!(!link.is_busy());
    }

    #[test]
    fn sleep_and_wake_requests_are_counted() {
        let mut link = InMemoryLink::default();
        link.request_sleep();
        assert!(link.is_asleep());
        link.request_wake();
        assert!(!link.is_asleep());
        assert_eq!(link.sleep_requests(), 1);
        assert_eq!(link.wake_requests(), 1);
    }

    #[test]
    fn route_submitted_moves_frames_to_receiver_inbox() {
        let mut node = InMemoryLink::default();
        let mut station = InMemoryLink::default();
        node.submit(sample_request(0x0001, 0x42));

        let moved = route_submitted(&mut node, &mut station, 0x8001);
        assert_eq!(moved, 1);

        let frame = station.poll_inbound().expect("inbound frame expected");
        assert_eq!(frame.source, 0x8001);
        assert_eq!(frame.endpoint.get(), 1);
        assert_eq!(frame.bytes[0], 0x42);
    }
}
