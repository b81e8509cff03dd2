use serde::{Deserialize, Serialize};

use crate::error::MoteError;

/// Number of usable endpoints per device. Endpoint 0 is reserved by the
/// network layer, leaving identifiers `1..=15`.
pub const ENDPOINT_COUNT: usize = 15;

/// Destination address meaning "all nodes on the network".
pub const BROADCAST_ADDRESS: u16 = 0xFFFF;

/// Logical communication channel identifier in `1..=15`.
///
/// Endpoints distinguish traffic categories on one device, e.g. one for
/// command and control and one for reporting sensor data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint(u8);

impl Endpoint {
    /// Validates and wraps an endpoint identifier.
    pub const fn new(id: u8) -> Result<Self, MoteError> {
        match id {
            0 => Err(MoteError::ReservedEndpoint),
            1..=15 => Ok(Self(id)),
            _ => Err(MoteError::EndpointOutOfRange(id)),
        }
    }

    /// Raw endpoint identifier.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based slot for fixed endpoint tables.
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl TryFrom<u8> for Endpoint {
    type Error = MoteError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

/// Remote communication target: a node's network address plus the endpoint
/// to transmit to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddress {
    /// 16-bit network address. `< 0x8000` is for routers (coordinator/base
    /// and relays), `>= 0x8000` for non-routing end devices.
    pub address: u16,
    /// Endpoint on the target node.
    pub endpoint: Endpoint,
}

impl NodeAddress {
    pub const fn new(address: u16, endpoint: Endpoint) -> Self {
        Self { address, endpoint }
    }

    /// Target addressing every node on the network.
    pub const fn broadcast(endpoint: Endpoint) -> Self {
        Self {
            address: BROADCAST_ADDRESS,
            endpoint,
        }
    }

    pub const fn is_broadcast(&self) -> bool {
        self.address == BROADCAST_ADDRESS
    }
}
