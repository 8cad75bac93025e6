//! Outcome-to-acknowledgment dispatch for a turn-based game played over a
//! message bus.
//!
//! Each player consumes events (army moves, war declarations, pause/resume),
//! applies them to its game state through an external classifier, and turns
//! the outcome into an acknowledgment for the bus, publishing any follow-up
//! events first.
//!
//! ```text
//! envelope ─▶ transport::process_one ─▶ HandlerAdapter::handle
//!                                           │ classifier.apply(event)
//!                                           │ policy.decide(outcome)
//!                                           │ publisher.publish_all(consequences)
//!                                           ▼
//!                                      AckDecision ─▶ Subscriber::settle
//! ```

mod ack;
mod config;
mod diagnostics;
mod error;

pub mod bus;
pub mod dispatch;
pub mod game;
pub mod handlers;
pub mod routing;

#[cfg(feature = "transport")]
pub mod transport;

pub use ack::AckDecision;
pub use config::DispatchConfig;
pub use diagnostics::{Diagnostic, Diagnostics, MemoryDiagnostics, TracingDiagnostics};
pub use dispatch::{
    AckPolicy, Consequence, ConsequencePublisher, EventHandler, HandlerAdapter, OutcomeClassifier,
    Verdict,
};
pub use error::{ConfigError, DecodeError, PublishError};
pub use routing::RoutingConfig;
