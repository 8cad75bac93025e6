//! The consume half of the bus.

use super::publisher::Envelope;
use crate::ack::AckDecision;
use crate::error::PublishError;

/// One delivery of an envelope.
///
/// The tag identifies this delivery, not the message: a redelivered envelope
/// arrives under a fresh tag, and only the latest tag can settle it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub tag: u64,
    pub envelope: Envelope,
}

/// Pull-based subscription to one binding.
///
/// Delivery is at-least-once and not necessarily ordered: a message that is
/// neither acked nor nacked, or that is nacked with `requeue`, comes back.
pub trait Subscriber: Send + Sync {
    /// Poll for the next delivery, blocking until one is available or timeout.
    fn poll(&self, timeout_ms: u64) -> Result<Option<Delivery>, PublishError>;

    /// Remove the message for good.
    fn ack(&self, tag: u64) -> Result<(), PublishError>;

    /// Reject the message; with `requeue` it is redelivered later, otherwise discarded.
    fn nack(&self, tag: u64, requeue: bool) -> Result<(), PublishError>;

    /// Apply an acknowledgment decision to a delivery.
    fn settle(&self, tag: u64, decision: AckDecision) -> Result<(), PublishError> {
        match decision {
            AckDecision::Accept => self.ack(tag),
            AckDecision::RejectDrop => self.nack(tag, false),
            AckDecision::RejectRequeue => self.nack(tag, true),
        }
    }
}
