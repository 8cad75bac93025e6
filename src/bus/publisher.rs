//! Message envelope and the publish half of the bus.

use std::sync::Arc;

use crate::error::{DecodeError, PublishError};
use crate::game::GameEvent;

/// A message as it travels on the bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Unique identifier for this message
    pub id: String,
    /// Event kind (e.g., "ArmyMove", "GameLog")
    pub kind: String,
    /// Serialized payload
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            payload,
        }
    }

    /// Wrap a game event, bitcode-encoding its payload.
    pub fn encode<E: GameEvent>(id: impl Into<String>, event: &E) -> Result<Self, PublishError> {
        let bytes = bitcode::serialize(event)?;
        Ok(Self::new(id, E::KIND, bytes))
    }

    /// Decode the payload as `E`. The envelope kind must match `E::KIND`.
    pub fn decode<E: GameEvent>(&self) -> Result<E, DecodeError> {
        if self.kind != E::KIND {
            return Err(self.decode_error(format!("expected kind {}", E::KIND)));
        }
        bitcode::deserialize(&self.payload).map_err(|e| self.decode_error(e.to_string()))
    }

    fn decode_error(&self, reason: String) -> DecodeError {
        DecodeError {
            id: self.id.clone(),
            kind: self.kind.clone(),
            reason,
        }
    }
}

/// Publishes envelopes to a destination.
///
/// Calls are synchronous: `Ok(())` means the transport accepted the message.
/// Timeouts are the transport's business and surface as errors.
pub trait Publisher: Send + Sync {
    fn publish(&self, destination: &str, envelope: Envelope) -> Result<(), PublishError>;
}

impl<P: Publisher + ?Sized> Publisher for Arc<P> {
    fn publish(&self, destination: &str, envelope: Envelope) -> Result<(), PublishError> {
        (**self).publish(destination, envelope)
    }
}

impl<P: Publisher + ?Sized> Publisher for &P {
    fn publish(&self, destination: &str, envelope: Envelope) -> Result<(), PublishError> {
        (**self).publish(destination, envelope)
    }
}

/// Publisher for handlers that never emit consequences. Every publish fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPublisher;

impl Publisher for NoPublisher {
    fn publish(&self, destination: &str, _envelope: Envelope) -> Result<(), PublishError> {
        Err(PublishError::Rejected(format!(
            "no publish channel for {}",
            destination
        )))
    }
}
