use heapless::Deque;
use tracing::{debug, info};

use mote_codec::{encode_frame, Payload};
use mote_core::{DeviceName, Endpoint, NodeAddress, NodeIdentity};
use mote_link::{DeliveryStatus, LinkLayer, LinkTxOptions, LinkTxRequest};

use crate::error::EnqueueError;

/// Maximum number of messages in flight at once.
pub const TX_QUEUE_CAPACITY: usize = 4;

/// Outcome of one completed transmission, round-tripping the identifier
/// the application assigned at enqueue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmissionResult {
    pub message_id: u16,
    pub status: DeliveryStatus,
}

/// Application callback invoked once per completed transmission.
pub type TransmissionCallback = Box<dyn FnMut(TransmissionResult)>;

struct InFlight {
    message_id: u16,
}

/// Outgoing-message transport for one node.
///
/// Owns the bounded in-flight queue and the single registered completion
/// callback. All state is explicit and per-instance; several transports
/// can coexist under test.
pub struct Transport {
    device_name: DeviceName,
    queue: Deque<InFlight, TX_QUEUE_CAPACITY>,
    callback: Option<TransmissionCallback>,
}

impl Transport {
    /// Configures the link layer from `identity` and enables the receive
    /// path. Call exactly once per node before any other transport
    /// operation.
    pub fn initialize<L: LinkLayer>(identity: &NodeIdentity, link: &mut L) -> Self {
        info!(
            address = identity.address,
            name = identity.name.as_str(),
            pan_id = identity.pan_id,
            channel = identity.channel,
            "initializing mesh transport"
        );

        link.set_own_address(identity.address);
        link.set_pan_id(identity.pan_id);
        link.set_channel(identity.channel);
        link.set_security_key(&identity.security_key);
        link.set_receive_enabled(true);

        Self {
            device_name: identity.name,
            queue: Deque::new(),
            callback: None,
        }
    }

    /// Registers the completion callback; the last registration wins.
    pub fn register_transmission_callback(&mut self, callback: TransmissionCallback) {
        self.callback = Some(callback);
    }

    /// Queues a message to a single recipient with acknowledgement and
    /// security requested.
    ///
    /// The payload is copied into the submitted frame, so the caller's
    /// buffer can be reused immediately.
    pub fn enqueue_direct<L: LinkLayer>(
        &mut self,
        link: &mut L,
        message_id: u16,
        destination: NodeAddress,
        payload: &Payload,
    ) -> Result<(), EnqueueError> {
        self.enqueue(
            link,
            message_id,
            destination,
            LinkTxOptions {
                ack_requested: true,
                security: true,
                broadcast: false,
            },
            payload,
        )
    }

    /// Queues a message to every node on the network.
    ///
    /// Broadcast cannot be acknowledged by a single sender/receiver pair,
    /// so no delivery acknowledgement is requested.
    pub fn enqueue_broadcast<L: LinkLayer>(
        &mut self,
        link: &mut L,
        message_id: u16,
        endpoint: Endpoint,
        payload: &Payload,
    ) -> Result<(), EnqueueError> {
        self.enqueue(
            link,
            message_id,
            NodeAddress::broadcast(endpoint),
            LinkTxOptions {
                ack_requested: false,
                security: true,
                broadcast: true,
            },
            payload,
        )
    }

    fn enqueue<L: LinkLayer>(
        &mut self,
        link: &mut L,
        message_id: u16,
        destination: NodeAddress,
        options: LinkTxOptions,
        payload: &Payload,
    ) -> Result<(), EnqueueError> {
        if self.queue.is_full() {
            return Err(EnqueueError::TransmissionBufferFull);
        }

        let frame = encode_frame(&self.device_name, payload);
        // Cannot fail: fullness checked above.
        let _ = self.queue.push_back(InFlight { message_id });

        debug!(
            message_id,
            destination = destination.address,
            endpoint = destination.endpoint.get(),
            len = payload.len(),
            "enqueued transmission"
        );

        link.submit(LinkTxRequest {
            destination,
            options,
            frame,
        });
        Ok(())
    }

    /// Applies one completion from the link layer to the front queue
    /// entry, invoking the registered callback with its identifier.
    ///
    /// The link delivers completions in submission order, so the front
    /// entry is the one this status belongs to. A completion with nothing
    /// in flight is ignored.
    pub fn handle_completion(&mut self, status: DeliveryStatus) -> Option<TransmissionResult> {
        let front = self.queue.pop_front()?;
        let result = TransmissionResult {
            message_id: front.message_id,
            status,
        };
        debug!(message_id = result.message_id, status = ?result.status, "transmission completed");
        if let Some(callback) = self.callback.as_mut() {
            callback(result);
        }
        Some(result)
    }

    /// Drives the link and drains pending completions.
    ///
    /// Returns the most recent completion processed this tick; callers
    /// holding more than one message in flight should observe completions
    /// through the registered callback instead.
    pub fn tick<L: LinkLayer>(&mut self, link: &mut L) -> Option<TransmissionResult> {
        link.tick();
        let mut last = None;
        while let Some(status) = link.poll_completion() {
            if let Some(result) = self.handle_completion(status) {
                last = Some(result);
            }
        }
        last
    }

    /// Number of messages awaiting completion.
    pub fn in_flight(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn device_name(&self) -> &DeviceName {
        &self.device_name
    }
}
