//! Handler: PlayingState

use crate::bus::NoPublisher;
use crate::config::DispatchConfig;
use crate::dispatch::{ConsequencePublisher, HandlerAdapter, OutcomeClassifier, PausePolicy};
use crate::game::{self, PauseOutcome, PlayingState};

pub const KIND: &str = game::PLAYING_STATE;

/// Pause and resume never publish anything.
pub fn handler<C>(
    classifier: C,
    config: &DispatchConfig,
) -> HandlerAdapter<C, PausePolicy, NoPublisher>
where
    C: OutcomeClassifier<PlayingState, Outcome = PauseOutcome>,
{
    HandlerAdapter::new(
        classifier,
        PausePolicy,
        ConsequencePublisher::new(NoPublisher, config.routing.clone()),
    )
}
