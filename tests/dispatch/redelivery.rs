//! At-least-once delivery: handlers must be safe to run again on the same event.

use std::sync::Arc;

use peril_dispatch::bus::InMemoryQueue;
use peril_dispatch::game::{ArmyMove, RecognitionOfWar};
use peril_dispatch::handlers;
use peril_dispatch::{AckDecision, EventHandler};

use crate::support::{army_move, config, unit, war, Board, FlakyPublisher};

#[test]
fn redelivered_own_move_is_dropped_each_time() {
    let board = Arc::new(Board::new("alice"));
    let publisher = Arc::new(FlakyPublisher::new(InMemoryQueue::new()));
    let b = board.clone();
    let handler = handlers::handler_move(
        move |mv: &ArmyMove| b.handle_move(mv),
        publisher.clone(),
        &config("alice"),
    );

    let mv = army_move("alice", "europe");
    assert_eq!(handler.handle(&mv), AckDecision::RejectDrop);
    assert_eq!(handler.handle(&mv), AckDecision::RejectDrop);
    assert_eq!(publisher.attempts(), 0);
    assert_eq!(board.applied(), 2);
}

#[test]
fn redelivered_foreign_war_is_requeued_each_time() {
    let board = Arc::new(Board::new("carol").with_unit(unit(1, "europe")));
    let publisher = Arc::new(FlakyPublisher::new(InMemoryQueue::new()));
    let b = board.clone();
    let handler = handlers::handler_war(
        move |w: &RecognitionOfWar| b.handle_war(w),
        publisher.clone(),
        &config("carol"),
    );

    let declaration = war("alice", "bob");
    assert_eq!(handler.handle(&declaration), AckDecision::RejectRequeue);
    assert_eq!(handler.handle(&declaration), AckDecision::RejectRequeue);
    assert_eq!(publisher.attempts(), 0);
}

#[test]
fn retry_after_publish_failure_publishes_once() {
    let publisher = Arc::new(FlakyPublisher::new(InMemoryQueue::new()));
    publisher.fail_next(1);
    let board = Arc::new(Board::new("bob").with_unit(unit(3, "europe")));
    let b = board.clone();
    let handler = handlers::handler_move(
        move |mv: &ArmyMove| b.handle_move(mv),
        publisher.clone(),
        &config("bob"),
    );

    let mv = army_move("alice", "europe");
    assert_eq!(handler.handle(&mv), AckDecision::RejectRequeue);
    assert_eq!(handler.handle(&mv), AckDecision::Accept);

    assert_eq!(publisher.attempts(), 2);
    assert_eq!(publisher.queue.published_to("warrecognitions.alice").len(), 1);
}
