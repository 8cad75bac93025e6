//! Handler: RecognitionOfWar
//!
//! Wars this player fights are resolved by the classifier and logged to the
//! game log slug under this player's name. Wars between other players are
//! requeued for them.

use crate::bus::Publisher;
use crate::config::DispatchConfig;
use crate::dispatch::{ConsequencePublisher, HandlerAdapter, OutcomeClassifier, WarPolicy};
use crate::game::{self, RecognitionOfWar, WarOutcome};

pub const KIND: &str = game::RECOGNITION_OF_WAR;

pub fn handler<C, P>(
    classifier: C,
    publisher: P,
    config: &DispatchConfig,
) -> HandlerAdapter<C, WarPolicy, P>
where
    C: OutcomeClassifier<RecognitionOfWar, Outcome = WarOutcome>,
    P: Publisher,
{
    HandlerAdapter::new(
        classifier,
        WarPolicy::new(config.username.clone()),
        ConsequencePublisher::new(publisher, config.routing.clone()),
    )
}
