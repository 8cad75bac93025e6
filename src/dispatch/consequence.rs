//! Consequence events and the publisher that sends them.
//!
//! A consequence is built from an outcome, handed to the transport, and
//! dropped. The inbound message that caused it only counts as processed once
//! every consequence has been accepted by the transport; any failure folds
//! the whole handler into `RejectRequeue`. A redelivery reprocesses the
//! inbound message from scratch, so consumers of consequences must tolerate
//! duplicates (at-least-once).

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::adapter::panic_message;
use crate::ack::AckDecision;
use crate::bus::{Envelope, Publisher};
use crate::error::PublishError;
use crate::game::{self, GameLog, PlayerSnapshot, RecognitionOfWar};
use crate::routing::RoutingConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consequence {
    /// Sent to `<war prefix>.<attacker>`.
    RecognizeWar(RecognitionOfWar),
    /// Sent to the game log slug. Timestamped when published.
    GameLog { username: String, message: String },
}

impl Consequence {
    pub fn recognize_war(attacker: PlayerSnapshot, defender: PlayerSnapshot) -> Self {
        Consequence::RecognizeWar(RecognitionOfWar { attacker, defender })
    }

    pub fn game_log(username: impl Into<String>, message: impl Into<String>) -> Self {
        Consequence::GameLog {
            username: username.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Consequence::RecognizeWar(_) => game::RECOGNITION_OF_WAR,
            Consequence::GameLog { .. } => game::GAME_LOG,
        }
    }

    pub fn destination(&self, routing: &RoutingConfig) -> String {
        match self {
            Consequence::RecognizeWar(war) => routing.war_recognition(&war.attacker.username),
            Consequence::GameLog { .. } => routing.game_log(),
        }
    }

    /// Build the wire envelope.
    pub fn into_envelope(self, id: impl Into<String>) -> Result<Envelope, PublishError> {
        match self {
            Consequence::RecognizeWar(war) => Envelope::encode(id, &war),
            Consequence::GameLog { username, message } => Envelope::encode(
                id,
                &GameLog {
                    current_time: Utc::now(),
                    message,
                    username,
                },
            ),
        }
    }
}

/// A consequence the transport did not accept.
#[derive(Debug, Error)]
#[error("{kind} to {destination} failed after {published} published: {source}")]
pub struct ConsequenceFailure {
    pub kind: &'static str,
    pub destination: String,
    /// Consequences published before the failing one.
    pub published: usize,
    #[source]
    pub source: PublishError,
}

pub struct ConsequencePublisher<P> {
    publisher: P,
    routing: RoutingConfig,
}

impl<P: Publisher> ConsequencePublisher<P> {
    pub fn new(publisher: P, routing: RoutingConfig) -> Self {
        Self { publisher, routing }
    }

    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Publish one consequence to its destination.
    ///
    /// A publisher that panics is treated as a failed publish.
    pub fn publish(&self, consequence: Consequence) -> Result<(), PublishError> {
        let destination = consequence.destination(&self.routing);
        let envelope = consequence.into_envelope(Uuid::new_v4().to_string())?;
        tracing::debug!(
            destination = destination.as_str(),
            kind = envelope.kind.as_str(),
            id = envelope.id.as_str(),
            "publishing consequence"
        );
        catch_unwind(AssertUnwindSafe(|| self.publisher.publish(&destination, envelope)))
            .unwrap_or_else(|panic| {
                Err(PublishError::Other(
                    format!("publisher panicked: {}", panic_message(panic.as_ref())).into(),
                ))
            })
    }

    /// Publish in order, stopping at the first failure.
    ///
    /// Returns the number published. Nothing after a failed consequence is
    /// attempted; the requeued inbound message will produce all of them again.
    pub fn publish_all(&self, consequences: Vec<Consequence>) -> Result<usize, ConsequenceFailure> {
        let mut published = 0;
        for consequence in consequences {
            let kind = consequence.kind();
            let destination = consequence.destination(&self.routing);
            self.publish(consequence).map_err(|source| ConsequenceFailure {
                kind,
                destination,
                published,
                source,
            })?;
            published += 1;
        }
        Ok(published)
    }
}

/// Fold a publish result into the final decision.
pub fn fold(result: &Result<usize, ConsequenceFailure>) -> AckDecision {
    match result {
        Ok(_) => AckDecision::Accept,
        Err(_) => AckDecision::RejectRequeue,
    }
}
