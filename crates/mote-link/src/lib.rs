//! External network-layer seam for mote nodes.
//!
//! The transport and publisher only depend on the poll-based [`link::LinkLayer`]
//! trait defined here; [`memory::InMemoryLink`] backs tests and simulations.

pub mod link;
pub mod memory;

pub use link::{DeliveryStatus, InboundFrame, LinkLayer, LinkTxOptions, LinkTxRequest};
pub use memory::{route_submitted, InMemoryLink};
