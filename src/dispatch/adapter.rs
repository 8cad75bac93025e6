//! Handler adapter: classifier → policy → consequence publisher, behind one
//! callback the subscription loop can call.
//!
//! ```text
//! [Received] --classify--> [Outcome Known] --policy--> [Decision Pending]
//! [Decision Pending] --no consequence--> Accept | RejectDrop | RejectRequeue
//! [Decision Pending] --consequence--> [Publishing]
//! [Publishing] --ok--> Accept
//! [Publishing] --err--> RejectRequeue
//! ```
//!
//! Every path ends in an [`AckDecision`]; nothing escapes `handle`. A
//! panicking classifier resolves to `RejectDrop`; a panicking publisher counts
//! as a failed publish and resolves to `RejectRequeue`.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use super::classifier::OutcomeClassifier;
use super::consequence::{fold, ConsequencePublisher};
use super::policy::{AckPolicy, Verdict};
use crate::ack::AckDecision;
use crate::bus::Publisher;
use crate::diagnostics::{Diagnostic, Diagnostics, TracingDiagnostics};

/// A callback registered against one event kind.
pub trait EventHandler<E>: Send + Sync {
    fn handle(&self, event: &E) -> AckDecision;
}

impl<E, F> EventHandler<E> for F
where
    F: Fn(&E) -> AckDecision + Send + Sync,
{
    fn handle(&self, event: &E) -> AckDecision {
        self(event)
    }
}

pub struct HandlerAdapter<C, Pol, P> {
    classifier: C,
    policy: Pol,
    publisher: ConsequencePublisher<P>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<C, Pol, P> HandlerAdapter<C, Pol, P>
where
    Pol: AckPolicy,
    P: Publisher,
{
    /// Diagnostics go to `tracing` unless replaced with [`with_diagnostics`](Self::with_diagnostics).
    pub fn new(classifier: C, policy: Pol, publisher: ConsequencePublisher<P>) -> Self {
        Self {
            classifier,
            policy,
            publisher,
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Arc::new(diagnostics);
        self
    }

    pub fn publisher(&self) -> &ConsequencePublisher<P> {
        &self.publisher
    }

    /// Turn a verdict into the final decision, publishing when required.
    pub fn resolve(&self, verdict: Verdict) -> AckDecision {
        match verdict {
            Verdict::Settled(decision) => decision,
            Verdict::Unrecognized(tag) => {
                self.diagnostics.report(Diagnostic::UnrecognizedOutcome {
                    kind: self.policy.kind().to_string(),
                    tag,
                });
                AckDecision::RejectDrop
            }
            Verdict::RequiresConsequence(consequences) => {
                let result = self.publisher.publish_all(consequences);
                if let Err(failure) = &result {
                    self.diagnostics.report(Diagnostic::PublishFailed {
                        kind: failure.kind.to_string(),
                        destination: failure.destination.clone(),
                        error: failure.source.to_string(),
                    });
                }
                fold(&result)
            }
        }
    }
}

impl<E, C, Pol, P> EventHandler<E> for HandlerAdapter<C, Pol, P>
where
    C: OutcomeClassifier<E>,
    Pol: AckPolicy<Outcome = C::Outcome>,
    P: Publisher,
{
    fn handle(&self, event: &E) -> AckDecision {
        let outcome = match catch_unwind(AssertUnwindSafe(|| self.classifier.apply(event))) {
            Ok(outcome) => outcome,
            Err(panic) => {
                self.diagnostics.report(Diagnostic::ClassifierPanicked {
                    kind: self.policy.kind().to_string(),
                    message: panic_message(panic.as_ref()),
                });
                return AckDecision::RejectDrop;
            }
        };

        let decision = self.resolve(self.policy.decide(&outcome));
        tracing::debug!(kind = self.policy.kind(), %decision, "event handled");
        decision
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
