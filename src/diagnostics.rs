//! Operator-facing diagnostics.
//!
//! The dispatch core never prints. Anything an operator should see goes
//! through an injected [`Diagnostics`] sink; reporting never changes an
//! acknowledgment decision.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The classifier returned an outcome the policy does not know.
    UnrecognizedOutcome { kind: String, tag: String },
    /// A consequence could not be published; the inbound message is requeued.
    PublishFailed {
        kind: String,
        destination: String,
        error: String,
    },
    /// The classifier panicked while applying the event.
    ClassifierPanicked { kind: String, message: String },
    /// The handler panicked; the message is requeued.
    HandlerPanicked { id: String, kind: String, message: String },
    /// An inbound payload could not be decoded into its event type.
    Undecodable { id: String, kind: String, error: String },
    /// The bus refused an ack/nack.
    SettleFailed { id: String, error: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnrecognizedOutcome { kind, tag } => {
                write!(f, "error: unknown {} outcome: {}", kind, tag)
            }
            Diagnostic::PublishFailed {
                kind,
                destination,
                error,
            } => write!(
                f,
                "error: {} consequence to {} not published: {}",
                kind, destination, error
            ),
            Diagnostic::ClassifierPanicked { kind, message } => {
                write!(f, "error: {} classifier panicked: {}", kind, message)
            }
            Diagnostic::HandlerPanicked { id, kind, message } => {
                write!(f, "error: {} handler panicked on {}: {}", kind, id, message)
            }
            Diagnostic::Undecodable { id, kind, error } => {
                write!(f, "error: cannot decode {} {}: {}", kind, id, error)
            }
            Diagnostic::SettleFailed { id, error } => {
                write!(f, "error: cannot settle {}: {}", id, error)
            }
        }
    }
}

pub trait Diagnostics: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

impl<D: Diagnostics + ?Sized> Diagnostics for Arc<D> {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::UnrecognizedOutcome { kind, tag } => {
                tracing::error!(kind = kind.as_str(), tag = tag.as_str(), "unknown outcome");
            }
            Diagnostic::PublishFailed {
                kind,
                destination,
                error,
            } => {
                tracing::warn!(
                    kind = kind.as_str(),
                    destination = destination.as_str(),
                    error = error.as_str(),
                    "consequence publish failed, requeueing"
                );
            }
            Diagnostic::ClassifierPanicked { kind, message } => {
                tracing::error!(kind = kind.as_str(), message = message.as_str(), "classifier panicked");
            }
            Diagnostic::HandlerPanicked { id, kind, message } => {
                tracing::error!(
                    %id,
                    kind = kind.as_str(),
                    message = message.as_str(),
                    "handler panicked, requeueing"
                );
            }
            Diagnostic::Undecodable { id, kind, error } => {
                tracing::error!(%id, kind = kind.as_str(), error = error.as_str(), "undecodable payload");
            }
            Diagnostic::SettleFailed { id, error } => {
                tracing::warn!(%id, error = error.as_str(), "settle failed");
            }
        }
    }
}

/// Buffers diagnostics in memory. Clones share the buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryDiagnostics {
    buffer: Arc<Mutex<Vec<Diagnostic>>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.buffer().clone()
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::debug!(%diagnostic, "diagnostic recorded");
        self.buffer().push(diagnostic);
    }
}
