//! Mesh-node transmission tracking and duty-cycle publishing.
//!
//! This crate wires together the outgoing-message transport (bounded
//! in-flight queue plus completion routing), the per-endpoint listener
//! registry, the publish-transmit-sleep state machine, and the power
//! scheduler, all on top of the pluggable [`mote_link::LinkLayer`] seam.
//!
//! Everything runs inside one cooperative host loop; there is no locking
//! and no internal concurrency.

pub mod error;
pub mod listener;
pub mod power;
pub mod publisher;
pub mod transport;

pub use error::EnqueueError;
pub use listener::{ListenerTable, ReceiveCallback};
pub use power::{sleep_with_radio, ManualSleepTimer, SleepTimer, StdSleepTimer};
pub use publisher::{Publisher, PublisherConfig, PublisherState, SleepPhase};
pub use transport::{Transport, TransmissionResult, TX_QUEUE_CAPACITY};
