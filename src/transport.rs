//! Subscription loop: poll, decode, dispatch, settle.
//!
//! This is the generic mechanism a handler is registered with. It owns
//! decoding and settling; the handler only ever sees a decoded event and only
//! ever returns an [`AckDecision`].

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::ack::AckDecision;
use crate::bus::Subscriber;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::dispatch::{panic_message, EventHandler};
use crate::error::PublishError;
use crate::game::GameEvent;

/// What happened to one polled message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processed {
    /// Nothing arrived before the timeout.
    Idle,
    /// The handler ran and its decision was applied.
    Handled(AckDecision),
    /// The payload was not a valid event; it was discarded.
    Undecodable,
    /// The handler panicked; the message was requeued.
    HandlerPanicked,
}

/// Statistics from a subscription thread.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransportStats {
    pub accepted: usize,
    pub dropped: usize,
    pub requeued: usize,
    pub undecodable: usize,
    pub panicked: usize,
    /// Number of poll cycles completed.
    pub polls: usize,
}

impl TransportStats {
    fn record(&mut self, processed: Processed) {
        match processed {
            Processed::Idle => {}
            Processed::Handled(AckDecision::Accept) => self.accepted += 1,
            Processed::Handled(AckDecision::RejectDrop) => self.dropped += 1,
            Processed::Handled(AckDecision::RejectRequeue) => self.requeued += 1,
            Processed::Undecodable => self.undecodable += 1,
            Processed::HandlerPanicked => self.panicked += 1,
        }
    }

    pub fn handled(&self) -> usize {
        self.accepted + self.dropped + self.requeued
    }
}

/// Poll once and process what arrives.
///
/// Errors are the subscriber's own (poll failures). A handler panic is
/// contained here: the message is requeued and reported. A refused ack/nack
/// is reported as a diagnostic; the delivery stays unsettled and the bus
/// redelivers it.
pub fn process_one<E, S, H>(
    subscriber: &S,
    handler: &H,
    diagnostics: &dyn Diagnostics,
    timeout_ms: u64,
) -> Result<Processed, PublishError>
where
    E: GameEvent,
    S: Subscriber + ?Sized,
    H: EventHandler<E> + ?Sized,
{
    let Some(delivery) = subscriber.poll(timeout_ms)? else {
        return Ok(Processed::Idle);
    };
    let envelope = &delivery.envelope;

    let (processed, decision) = match envelope.decode::<E>() {
        Ok(event) => match catch_unwind(AssertUnwindSafe(|| handler.handle(&event))) {
            Ok(decision) => (Processed::Handled(decision), decision),
            Err(panic) => {
                diagnostics.report(Diagnostic::HandlerPanicked {
                    id: envelope.id.clone(),
                    kind: E::KIND.to_string(),
                    message: panic_message(panic.as_ref()),
                });
                (Processed::HandlerPanicked, AckDecision::RejectRequeue)
            }
        },
        Err(err) => {
            diagnostics.report(Diagnostic::Undecodable {
                id: err.id,
                kind: err.kind,
                error: err.reason,
            });
            (Processed::Undecodable, AckDecision::RejectDrop)
        }
    };

    if let Err(err) = subscriber.settle(delivery.tag, decision) {
        diagnostics.report(Diagnostic::SettleFailed {
            id: envelope.id.clone(),
            error: err.to_string(),
        });
    }

    Ok(processed)
}

/// Handle to a background subscription thread. Drop or call `stop()` to shut down.
pub struct TransportHandle {
    stop_tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<TransportStats>>,
}

impl TransportHandle {
    /// Stop the subscription and wait for it to finish. Returns stats.
    pub fn stop(mut self) -> TransportStats {
        let _ = self.stop_tx.send(());
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(stats)) => stats,
            Some(Err(panic)) => {
                tracing::error!(
                    message = panic_message(panic.as_ref()).as_str(),
                    "subscription thread panicked"
                );
                TransportStats::default()
            }
            None => TransportStats::default(),
        }
    }

    /// Signal stop without waiting.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(());
    }
}

impl Drop for TransportHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

/// Run `handler` against every message `subscriber` delivers, on a background thread.
///
/// ## Example
///
/// `diagnostics` receives decode, settle and handler-panic reports. Publish
/// failures are reported by the handler itself, so hand it the same sink to
/// see everything in one place.
///
/// ```ignore
/// let queue = InMemoryQueue::new();
/// let diagnostics: Arc<dyn Diagnostics> = Arc::new(TracingDiagnostics);
/// let moves = queue.subscriber(&config.routing.army_moves_binding());
/// let handle = transport::subscribe::<ArmyMove, _, _>(
///     moves,
///     handlers::handler_move(classifier, queue.clone(), &config)
///         .with_diagnostics(diagnostics.clone()),
///     diagnostics,
///     config.poll_interval(),
/// );
///
/// let stats = handle.stop();
/// ```
pub fn subscribe<E, S, H>(
    subscriber: S,
    handler: H,
    diagnostics: Arc<dyn Diagnostics>,
    poll_interval: Duration,
) -> TransportHandle
where
    E: GameEvent + 'static,
    S: Subscriber + 'static,
    H: EventHandler<E> + 'static,
{
    let (stop_tx, stop_rx) = mpsc::channel();
    let timeout_ms = u64::try_from(poll_interval.as_millis()).unwrap_or(u64::MAX);

    let handle = thread::spawn(move || {
        let mut stats = TransportStats::default();

        loop {
            match stop_rx.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }

            stats.polls += 1;

            match process_one::<E, _, _>(&subscriber, &handler, diagnostics.as_ref(), timeout_ms) {
                Ok(processed) => stats.record(processed),
                Err(err) => {
                    tracing::warn!(kind = E::KIND, error = %err, "poll failed");
                    thread::sleep(poll_interval);
                }
            }
        }

        tracing::debug!(kind = E::KIND, ?stats, "subscription stopped");
        stats
    });

    TransportHandle {
        stop_tx,
        handle: Some(handle),
    }
}
