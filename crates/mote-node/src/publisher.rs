use tracing::{debug, warn};

use mote_codec::Payload;
use mote_core::{NodeAddress, NodeIdentity};
use mote_link::LinkLayer;

use crate::error::EnqueueError;
use crate::power::{sleep_with_radio, SleepTimer};
use crate::transport::{Transport, TransmissionResult};

/// Duty-cycle states. Exactly one is active; `update()` advances at most
/// one transition per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublisherState {
    UpdatingPayload,
    Transmitting,
    WaitingForAcknowledgement,
    Sleeping,
}

/// Sleep-boundary notification passed to the registered sleep callback,
/// letting the host suspend/resume auxiliary hardware (e.g. a watchdog)
/// around the sleep window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepPhase {
    Entering,
    Exiting,
}

/// Called each cycle so the application can refresh the outbound payload
/// (take a sensor reading etc.) before it is transmitted.
pub type PayloadUpdateCallback = Box<dyn FnMut(&mut Payload)>;

/// Called on an irrecoverable internal error; the application is expected
/// to reset the device.
pub type ResetCallback = Box<dyn FnMut()>;

/// Called before and after each sleep window.
pub type SleepCallback = Box<dyn FnMut(SleepPhase)>;

/// Where and how often the publisher reports.
#[derive(Debug, Clone, Copy)]
pub struct PublisherConfig {
    /// Recipient of the periodic messages.
    pub recipient: NodeAddress,
    /// How long to sleep between transmissions, in seconds.
    pub sleep_interval_secs: u32,
}

/// Periodic publish-transmit-sleep state machine.
///
/// The publisher owns its [`Transport`] and enqueues at most one message
/// per cycle, waiting for its completion before the next. It never races
/// ahead of the in-flight queue, so a full transmission buffer signals a
/// protocol violation and is escalated through the reset callback.
pub struct Publisher {
    transport: Transport,
    config: PublisherConfig,
    state: PublisherState,
    payload: Payload,
    pending_result: Option<TransmissionResult>,
    last_result: Option<TransmissionResult>,
    next_message_id: u16,
    payload_update: PayloadUpdateCallback,
    reset: ResetCallback,
    sleep_callback: Option<SleepCallback>,
}

impl Publisher {
    /// Initializes the underlying transport from `identity` and readies
    /// the state machine in `UpdatingPayload`.
    pub fn initialize<L: LinkLayer>(
        identity: &NodeIdentity,
        config: PublisherConfig,
        payload_update: PayloadUpdateCallback,
        reset: ResetCallback,
        link: &mut L,
    ) -> Self {
        let transport = Transport::initialize(identity, link);
        Self {
            transport,
            config,
            state: PublisherState::UpdatingPayload,
            payload: Payload::new(),
            pending_result: None,
            last_result: None,
            next_message_id: 0,
            payload_update,
            reset,
            sleep_callback: None,
        }
    }

    /// Registers the optional sleep-boundary callback; at most one is
    /// active.
    pub fn register_sleep_callback(&mut self, callback: SleepCallback) {
        self.sleep_callback = Some(callback);
    }

    /// Advances the state machine by at most one transition and then
    /// drives the transport/link for this host-loop iteration.
    pub fn update<L: LinkLayer, T: SleepTimer>(&mut self, link: &mut L, timer: &mut T) {
        match self.state {
            PublisherState::UpdatingPayload => {
                self.payload.clear();
                (self.payload_update)(&mut self.payload);
                self.state = PublisherState::Transmitting;
            }

            PublisherState::Transmitting => {
                let message_id = self.next_message_id;
                match self.transport.enqueue_direct(
                    link,
                    message_id,
                    self.config.recipient,
                    &self.payload,
                ) {
                    Ok(()) => {
                        self.next_message_id = self.next_message_id.wrapping_add(1);
                        self.state = PublisherState::WaitingForAcknowledgement;
                    }
                    Err(EnqueueError::TransmissionBufferFull) => {
                        // One message per cycle means a full queue is a
                        // protocol violation, not backpressure. Hand over
                        // to the application's reset action.
                        warn!("transmission buffer full with one message per cycle, requesting reset");
                        (self.reset)();
                    }
                }
            }

            PublisherState::WaitingForAcknowledgement => {
                // No timer here: the link layer's own acknowledgement
                // timeout guarantees a completion for every submission.
                if let Some(result) = self.pending_result.take() {
                    if result.status.is_success() {
                        debug!(message_id = result.message_id, "message acknowledged");
                    } else {
                        // The recipient might be offline; sleep and try
                        // again with a fresh payload next cycle.
                        warn!(
                            message_id = result.message_id,
                            status = ?result.status,
                            "message not acknowledged"
                        );
                    }
                    self.last_result = Some(result);
                    self.state = PublisherState::Sleeping;
                }
            }

            PublisherState::Sleeping => {
                if let Some(callback) = self.sleep_callback.as_mut() {
                    callback(SleepPhase::Entering);
                }
                sleep_with_radio(link, timer, self.config.sleep_interval_secs);
                if let Some(callback) = self.sleep_callback.as_mut() {
                    callback(SleepPhase::Exiting);
                }
                self.state = PublisherState::UpdatingPayload;
            }
        }

        if let Some(result) = self.transport.tick(link) {
            self.pending_result = Some(result);
        }
    }

    pub fn state(&self) -> PublisherState {
        self.state
    }

    /// Result of the most recently completed cycle, if any.
    pub fn last_result(&self) -> Option<TransmissionResult> {
        self.last_result
    }

    /// Access to the owned transport, e.g. to register the application
    /// completion callback or to enqueue out-of-cycle broadcasts.
    pub fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }
}
