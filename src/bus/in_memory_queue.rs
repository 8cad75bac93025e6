//! In-memory broker for tests and single-process games.
//!
//! This module provides a thread-safe broker that implements both
//! `Publisher` and `Subscriber`, useful for:
//! - Unit and integration testing without a running broker
//! - Single-process games where every player shares one process

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::{Duration, Instant};

use super::{Delivery, Envelope, Publisher, Subscriber};
use crate::error::PublishError;
use crate::routing;

/// How long a delivery may stay unsettled before the broker hands it out again.
pub const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(30);

/// A message as it sits in the log, with the destination it was published to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Posted {
    pub destination: String,
    pub envelope: Envelope,
}

struct InFlight {
    envelope: Envelope,
    delivered_at: Instant,
}

/// In-memory broker.
///
/// - Every published message is appended to a shared log
/// - Each subscriber has a binding pattern (topic syntax) and its own read position
/// - A delivered message stays in flight until settled through its delivery tag
/// - Nacked-with-requeue messages are redelivered before new ones
/// - A delivery left unsettled past the visibility timeout is redelivered
///   under a new tag; the old tag can no longer settle it
///
/// ## Example
///
/// ```
/// use peril_dispatch::bus::{Envelope, InMemoryQueue, Publisher, Subscriber};
///
/// let queue = InMemoryQueue::new();
/// let moves = queue.subscriber("army_moves.*");
///
/// queue.publish("army_moves.alice", Envelope::new("evt-1", "ArmyMove", vec![])).unwrap();
/// queue.publish("pause", Envelope::new("evt-2", "PlayingState", vec![])).unwrap();
///
/// let delivery = moves.poll(10).unwrap().unwrap();
/// assert_eq!(delivery.envelope.id, "evt-1");
/// moves.ack(delivery.tag).unwrap();
/// assert!(moves.poll(10).unwrap().is_none());
/// ```
#[derive(Clone)]
pub struct InMemoryQueue {
    /// Shared message log
    log: Arc<RwLock<Vec<Posted>>>,
    binding: Arc<str>,
    visibility_timeout: Duration,
    /// Per-subscriber read position
    position: Arc<Mutex<usize>>,
    next_tag: Arc<Mutex<u64>>,
    in_flight: Arc<Mutex<HashMap<u64, InFlight>>>,
    redeliveries: Arc<Mutex<VecDeque<Envelope>>>,
    acked: Arc<Mutex<Vec<String>>>,
    discarded: Arc<Mutex<Vec<String>>>,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryQueue {
    /// Create a broker whose own subscription sees every destination.
    pub fn new() -> Self {
        Self::bound(
            Arc::new(RwLock::new(Vec::new())),
            "#",
            DEFAULT_VISIBILITY_TIMEOUT,
        )
    }

    fn bound(log: Arc<RwLock<Vec<Posted>>>, binding: &str, visibility_timeout: Duration) -> Self {
        Self {
            log,
            binding: Arc::from(binding),
            visibility_timeout,
            position: Arc::new(Mutex::new(0)),
            next_tag: Arc::new(Mutex::new(1)),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            redeliveries: Arc::new(Mutex::new(VecDeque::new())),
            acked: Arc::new(Mutex::new(Vec::new())),
            discarded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create an independent subscriber over the same log, bound to `binding`.
    ///
    /// The subscriber starts at the beginning of the log and inherits this
    /// queue's visibility timeout.
    pub fn subscriber(&self, binding: &str) -> Self {
        Self::bound(Arc::clone(&self.log), binding, self.visibility_timeout)
    }

    /// Set how long a delivery may stay unsettled before it is redelivered.
    pub fn with_visibility_timeout(mut self, timeout: Duration) -> Self {
        self.visibility_timeout = timeout;
        self
    }

    pub fn binding(&self) -> &str {
        &self.binding
    }

    /// Everything published so far, in order.
    pub fn published(&self) -> Vec<Posted> {
        self.read_log().clone()
    }

    /// Envelopes published to exactly `destination`.
    pub fn published_to(&self, destination: &str) -> Vec<Envelope> {
        self.read_log()
            .iter()
            .filter(|posted| posted.destination == destination)
            .map(|posted| posted.envelope.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read_log().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_log().is_empty()
    }

    /// Envelope ids acked through this subscriber.
    pub fn acknowledged(&self) -> Vec<String> {
        lock(&self.acked).clone()
    }

    /// Envelope ids nacked without requeue through this subscriber.
    pub fn discarded(&self) -> Vec<String> {
        lock(&self.discarded).clone()
    }

    /// Number of deliveries not yet settled.
    pub fn in_flight(&self) -> usize {
        lock(&self.in_flight).len()
    }

    /// Number of messages waiting for redelivery.
    pub fn pending_redeliveries(&self) -> usize {
        lock(&self.redeliveries).len()
    }

    fn read_log(&self) -> std::sync::RwLockReadGuard<'_, Vec<Posted>> {
        self.log.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Move deliveries older than the visibility timeout back to the redelivery queue.
    fn reclaim_expired(&self) {
        let now = Instant::now();
        let mut in_flight = lock(&self.in_flight);
        let mut expired: Vec<u64> = in_flight
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.delivered_at) >= self.visibility_timeout)
            .map(|(tag, _)| *tag)
            .collect();
        if expired.is_empty() {
            return;
        }

        expired.sort_unstable();
        let mut redeliveries = lock(&self.redeliveries);
        for tag in expired {
            if let Some(entry) = in_flight.remove(&tag) {
                tracing::debug!(
                    tag,
                    id = entry.envelope.id.as_str(),
                    "visibility timeout expired, redelivering"
                );
                redeliveries.push_back(entry.envelope);
            }
        }
    }

    fn next_envelope(&self) -> Option<Envelope> {
        self.reclaim_expired();

        if let Some(envelope) = lock(&self.redeliveries).pop_front() {
            return Some(envelope);
        }

        let log = self.read_log();
        let mut position = lock(&self.position);
        while *position < log.len() {
            let posted = &log[*position];
            *position += 1;
            if routing::matches(&self.binding, &posted.destination) {
                return Some(posted.envelope.clone());
            }
        }
        None
    }

    fn deliver(&self, envelope: Envelope) -> Delivery {
        let tag = {
            let mut next_tag = lock(&self.next_tag);
            let tag = *next_tag;
            *next_tag += 1;
            tag
        };
        lock(&self.in_flight).insert(
            tag,
            InFlight {
                envelope: envelope.clone(),
                delivered_at: Instant::now(),
            },
        );
        Delivery { tag, envelope }
    }

    fn take_in_flight(&self, tag: u64) -> Result<Envelope, PublishError> {
        lock(&self.in_flight)
            .remove(&tag)
            .map(|entry| entry.envelope)
            .ok_or_else(|| PublishError::SettleFailed(format!("delivery {} is not in flight", tag)))
    }
}

impl Publisher for InMemoryQueue {
    fn publish(&self, destination: &str, envelope: Envelope) -> Result<(), PublishError> {
        let mut log = self.log.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        log.push(Posted {
            destination: destination.to_string(),
            envelope,
        });
        Ok(())
    }
}

impl Subscriber for InMemoryQueue {
    fn poll(&self, timeout_ms: u64) -> Result<Option<Delivery>, PublishError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            if let Some(envelope) = self.next_envelope() {
                return Ok(Some(self.deliver(envelope)));
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn ack(&self, tag: u64) -> Result<(), PublishError> {
        let envelope = self.take_in_flight(tag)?;
        lock(&self.acked).push(envelope.id);
        Ok(())
    }

    fn nack(&self, tag: u64, requeue: bool) -> Result<(), PublishError> {
        let envelope = self.take_in_flight(tag)?;
        if requeue {
            lock(&self.redeliveries).push_back(envelope);
        } else {
            lock(&self.discarded).push(envelope.id);
        }
        Ok(())
    }
}
