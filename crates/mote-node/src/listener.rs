use tracing::{debug, warn};

use mote_codec::decode_frame;
use mote_core::{DeviceName, Endpoint, ENDPOINT_COUNT};
use mote_link::{InboundFrame, LinkLayer};

/// Application callback for inbound traffic on one endpoint: source
/// address, sender's device name, payload with the name prefix stripped.
pub type ReceiveCallback = Box<dyn FnMut(u16, &DeviceName, &[u8])>;

/// Fixed per-endpoint callback table for inbound dispatch.
///
/// One slot per endpoint; re-registration silently replaces the previous
/// callback.
#[derive(Default)]
pub struct ListenerTable {
    slots: [Option<ReceiveCallback>; ENDPOINT_COUNT],
}

impl ListenerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for `endpoint` and opens the corresponding
    /// channel on the link layer.
    pub fn register<L: LinkLayer>(
        &mut self,
        link: &mut L,
        endpoint: Endpoint,
        callback: ReceiveCallback,
    ) {
        debug!(endpoint = endpoint.get(), "registering listener");
        self.slots[endpoint.index()] = Some(callback);
        link.open_channel(endpoint);
    }

    /// Dispatches one inbound frame to the endpoint's callback, if any.
    ///
    /// The frame is consumed either way: a frame with no registered
    /// callback is silently dropped, and the return value is always true
    /// so the link layer treats the indication as processed.
    pub fn dispatch(&mut self, frame: &InboundFrame) -> bool {
        let view = match decode_frame(&frame.bytes) {
            Ok(view) => view,
            Err(error) => {
                warn!(source = frame.source, %error, "dropping malformed inbound frame");
                return true;
            }
        };
        if let Some(callback) = self.slots[frame.endpoint.index()].as_mut() {
            callback(frame.source, &view.sender, view.payload);
        }
        true
    }

    /// Drains pending inbound frames from the link layer.
    pub fn tick<L: LinkLayer>(&mut self, link: &mut L) {
        while let Some(frame) = link.poll_inbound() {
            self.dispatch(&frame);
        }
    }

    /// Whether a callback is registered for `endpoint`.
    pub fn is_registered(&self, endpoint: Endpoint) -> bool {
        self.slots[endpoint.index()].is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::ListenerTable;
    use mote_codec::{encode_frame, FrameBytes, Payload};
    use mote_core::{DeviceName, Endpoint};
    use mote_link::{InMemoryLink, InboundFrame};

    fn frame_from(name: &str, payload: &[u8]) -> FrameBytes {
        let sender = DeviceName::new(name).expect("name should fit");
        let payload = Payload::from_slice(payload).expect("payload should fit");
        encode_frame(&sender, &payload)
    }

    #[test]
    fn registration_opens_the_link_channel() {
        let mut link = InMemoryLink::default();
        let mut listeners = ListenerTable::new();
        let endpoint = Endpoint::new(4).expect("endpoint should be valid");

        listeners.register(&mut link, endpoint, Box::new(|_, _, _| {}));

        assert!(listeners.is_registered(endpoint));
        assert!(link.is_channel_open(endpoint));
    }

    #[test]
    fn dispatch_strips_the_name_prefix() {
        let mut link = InMemoryLink::default();
        let mut listeners = ListenerTable::new();
        let endpoint = Endpoint::new(1).expect("endpoint should be valid");

        let seen: Rc<RefCell<Vec<(u16, String, Vec<u8>)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        listeners.register(
            &mut link,
            endpoint,
            Box::new(move |source, sender, payload| {
                sink.borrow_mut()
                    .push((source, sender.as_str().to_string(), payload.to_vec()));
            }),
        );

        link.push_inbound(0x8002, endpoint, frame_from("field-node", &[3, 1, 4]));
        listeners.tick(&mut link);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, 0x8002);
        assert_eq!(seen[0].1, "field-node");
        assert_eq!(seen[0].2, vec![3, 1, 4]);
    }

    #[test]
    fn unregistered_endpoint_drops_the_frame_as_processed() {
        let mut listeners = ListenerTable::new();
        let endpoint = Endpoint::new(7).expect("endpoint should be valid");

        let processed = listeners.dispatch(&InboundFrame {
            source: 0x0001,
            endpoint,
            bytes: frame_from("anyone", &[1]),
        });
        assert!(processed);
    }

    #[test]
    fn malformed_frames_are_dropped_without_blocking_dispatch() {
        let mut link = InMemoryLink::default();
        let mut listeners = ListenerTable::new();
        let endpoint = Endpoint::new(1).expect("endpoint should be valid");

        let count = Rc::new(RefCell::new(0_u32));
        let sink = Rc::clone(&count);
        listeners.register(
            &mut link,
            endpoint,
            Box::new(move |_, _, _| {
                *sink.borrow_mut() += 1;
            }),
        );

        // Shorter than the fixed name prefix.
        link.push_inbound(
            0x0001,
            endpoint,
            FrameBytes::from_slice(&[1, 2, 3]).expect("frame should fit"),
        );
        link.push_inbound(0x0001, endpoint, frame_from("ok", &[9]));
        listeners.tick(&mut link);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn re_registration_replaces_the_previous_callback() {
        let mut link = InMemoryLink::default();
        let mut listeners = ListenerTable::new();
        let endpoint = Endpoint::new(2).expect("endpoint should be valid");

        let first = Rc::new(RefCell::new(0_u32));
        let second = Rc::new(RefCell::new(0_u32));
        let first_sink = Rc::clone(&first);
        let second_sink = Rc::clone(&second);
        listeners.register(
            &mut link,
            endpoint,
            Box::new(move |_, _, _| *first_sink.borrow_mut() += 1),
        );
        listeners.register(
            &mut link,
            endpoint,
            Box::new(move |_, _, _| *second_sink.borrow_mut() += 1),
        );

        link.push_inbound(0x0001, endpoint, frame_from("x", &[]));
        listeners.tick(&mut link);

        assert_eq!(*first.borrow(), 0);
        assert_eq!(*second.borrow(), 1);
    }
}
