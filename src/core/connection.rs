//! Module implementing the concept of connections between units.

use serde::{Deserialize, Serialize};

use crate::error::SNNError;

/// The kind of synapse a connection targets on the receiving unit.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum SynapseType {
    Excitatory,
    Inhibitory,
}

/// Represents a directed connection between two units.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Connection {
    /// ID of the source (presynaptic) unit
    pub source_id: usize,
    /// ID of the target (postsynaptic) unit
    pub target_id: usize,
    /// Connection weight
    pub weight: f64,
    /// Connection delay in ms (must be non-negative)
    pub delay: f64,
}

impl Connection {
    pub fn new(source_id: usize, target_id: usize, weight: f64, delay: f64) -> Self {
        Connection {
            source_id,
            target_id,
            weight,
            delay,
        }
    }

    /// Create a new connection with the specified parameters.
    /// Returns an error if the delay is negative or not finite.
    pub fn build(
        source_id: usize,
        target_id: usize,
        weight: f64,
        delay: f64,
    ) -> Result<Self, SNNError> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(SNNError::InvalidParameter(format!(
                "Connection delay must be non-negative and finite, got {}",
                delay
            )));
        }

        Ok(Connection::new(source_id, target_id, weight, delay))
    }

    /// Whether the connection links a unit to itself.
    pub fn is_self_connection(&self) -> bool {
        self.source_id == self.target_id
    }
}
