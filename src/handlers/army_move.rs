//! Handler: ArmyMove
//!
//! A move by another player that lands on this player's units provokes war;
//! the war recognition is published to `<war prefix>.<attacker>` before the
//! move is acknowledged.

use crate::bus::Publisher;
use crate::config::DispatchConfig;
use crate::dispatch::{ConsequencePublisher, HandlerAdapter, MovePolicy, OutcomeClassifier};
use crate::game::{self, ArmyMove, MoveOutcome};

pub const KIND: &str = game::ARMY_MOVE;

pub fn handler<C, P>(
    classifier: C,
    publisher: P,
    config: &DispatchConfig,
) -> HandlerAdapter<C, MovePolicy, P>
where
    C: OutcomeClassifier<ArmyMove, Outcome = MoveOutcome>,
    P: Publisher,
{
    HandlerAdapter::new(
        classifier,
        MovePolicy,
        ConsequencePublisher::new(publisher, config.routing.clone()),
    )
}
