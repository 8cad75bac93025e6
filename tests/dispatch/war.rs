//! RecognitionOfWar handling: requeue for others, drop without units, log results.

use std::sync::Arc;

use peril_dispatch::bus::InMemoryQueue;
use peril_dispatch::game::{GameLog, RecognitionOfWar, WarOutcome};
use peril_dispatch::handlers;
use peril_dispatch::{AckDecision, Diagnostic, EventHandler, MemoryDiagnostics};

use crate::support::{config, unit, war, Board, FlakyPublisher};

fn handler_for(
    board: Arc<Board>,
    publisher: Arc<FlakyPublisher>,
    username: &str,
) -> impl EventHandler<RecognitionOfWar> {
    handlers::handler_war(
        move |w: &RecognitionOfWar| board.handle_war(w),
        publisher,
        &config(username),
    )
}

fn logs(publisher: &FlakyPublisher) -> Vec<GameLog> {
    publisher
        .queue
        .published_to("game_logs")
        .iter()
        .map(|envelope| envelope.decode().unwrap())
        .collect()
}

#[test]
fn war_between_others_is_requeued() {
    let board = Arc::new(Board::new("carol").with_unit(unit(1, "europe")));
    let publisher = Arc::new(FlakyPublisher::new(InMemoryQueue::new()));
    let handler = handler_for(board, publisher.clone(), "carol");

    assert_eq!(handler.handle(&war("alice", "bob")), AckDecision::RejectRequeue);
    assert_eq!(publisher.attempts(), 0);
}

#[test]
fn war_without_units_is_dropped() {
    let board = Arc::new(Board::new("bob"));
    let publisher = Arc::new(FlakyPublisher::new(InMemoryQueue::new()));
    let handler = handler_for(board, publisher.clone(), "bob");

    assert_eq!(handler.handle(&war("alice", "bob")), AckDecision::RejectDrop);
    assert_eq!(publisher.attempts(), 0);
}

#[test]
fn draw_is_logged_then_accepted() {
    let board = Arc::new(Board::new("bob").with_unit(unit(1, "europe")));
    let publisher = Arc::new(FlakyPublisher::new(InMemoryQueue::new()));
    let handler = handler_for(board, publisher.clone(), "bob");

    assert_eq!(handler.handle(&war("alice", "bob")), AckDecision::Accept);

    let logs = logs(&publisher);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].username, "bob");
    assert_eq!(logs[0].message, "A war between alice and bob resulted in a draw");
}

#[test]
fn draw_log_failure_requeues() {
    let board = Arc::new(Board::new("bob").with_unit(unit(1, "europe")));
    let publisher = Arc::new(FlakyPublisher::new(InMemoryQueue::new()));
    publisher.fail_next(1);
    let handler = handler_for(board, publisher.clone(), "bob");

    assert_eq!(handler.handle(&war("alice", "bob")), AckDecision::RejectRequeue);
    assert!(logs(&publisher).is_empty());
}

#[test]
fn victories_are_logged_for_either_side() {
    for outcome in [
        WarOutcome::YouWon {
            winner: "bob".into(),
            loser: "alice".into(),
        },
        WarOutcome::OpponentWon {
            winner: "bob".into(),
            loser: "alice".into(),
        },
    ] {
        let board = Arc::new(
            Board::new("bob")
                .with_unit(unit(1, "europe"))
                .with_war_result(outcome),
        );
        let publisher = Arc::new(FlakyPublisher::new(InMemoryQueue::new()));
        let handler = handler_for(board, publisher.clone(), "bob");

        assert_eq!(handler.handle(&war("alice", "bob")), AckDecision::Accept);
        let logs = logs(&publisher);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "bob won a war against alice");
    }
}

#[test]
fn victory_log_failure_reports_destination() {
    let board = Arc::new(
        Board::new("bob")
            .with_unit(unit(1, "europe"))
            .with_war_result(WarOutcome::YouWon {
                winner: "bob".into(),
                loser: "alice".into(),
            }),
    );
    let publisher = Arc::new(FlakyPublisher::new(InMemoryQueue::new()));
    publisher.fail_next(1);
    let diagnostics = MemoryDiagnostics::new();
    let b = board.clone();
    let handler = handlers::handler_war(
        move |w: &RecognitionOfWar| b.handle_war(w),
        publisher.clone(),
        &config("bob"),
    )
    .with_diagnostics(diagnostics.clone());

    assert_eq!(handler.handle(&war("alice", "bob")), AckDecision::RejectRequeue);
    assert!(matches!(
        &diagnostics.entries()[0],
        Diagnostic::PublishFailed { destination, .. } if destination == "game_logs"
    ));
}
