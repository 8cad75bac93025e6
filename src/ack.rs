use std::fmt;

/// What a consumer tells the bus about an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AckDecision {
    /// Fully processed, every downstream effect recorded. Remove from queue.
    Accept,
    /// Inapplicable or malformed; redelivery cannot help. Remove without reprocessing.
    RejectDrop,
    /// Processing could not complete (transient failure). Redeliver later.
    RejectRequeue,
}

impl AckDecision {
    /// Whether the bus should redeliver the message.
    pub fn requeue(self) -> bool {
        matches!(self, AckDecision::RejectRequeue)
    }

    pub fn is_accept(self) -> bool {
        matches!(self, AckDecision::Accept)
    }
}

impl fmt::Display for AckDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AckDecision::Accept => write!(f, "ack"),
            AckDecision::RejectDrop => write!(f, "nack-discard"),
            AckDecision::RejectRequeue => write!(f, "nack-requeue"),
        }
    }
}
