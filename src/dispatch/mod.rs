//! Outcome-to-acknowledgment dispatch.
//!
//! An inbound event is applied by an [`OutcomeClassifier`], the resulting
//! outcome is mapped to a [`Verdict`] by an [`AckPolicy`], and any required
//! [`Consequence`]s are published by a [`ConsequencePublisher`]. The
//! [`HandlerAdapter`] strings the three together behind [`EventHandler`].

mod adapter;
mod classifier;
mod consequence;
mod policy;

pub(crate) use adapter::panic_message;
pub use adapter::{EventHandler, HandlerAdapter};
pub use classifier::OutcomeClassifier;
pub use consequence::{fold, Consequence, ConsequenceFailure, ConsequencePublisher};
pub use policy::{AckPolicy, MovePolicy, PausePolicy, Verdict, WarPolicy};
