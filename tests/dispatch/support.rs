//! Test doubles: a tiny board standing in for the game-state engine, and a
//! publisher that can be told to fail.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use peril_dispatch::bus::{Envelope, InMemoryQueue, Publisher};
use peril_dispatch::game::{
    ArmyMove, Location, MoveOutcome, PlayerSnapshot, PlayingState, PauseOutcome,
    RecognitionOfWar, Unit, UnitRank, WarOutcome,
};
use peril_dispatch::{DispatchConfig, PublishError};

pub fn config(username: &str) -> DispatchConfig {
    DispatchConfig::new(username)
}

pub fn unit(id: u32, location: &str) -> Unit {
    Unit {
        id,
        rank: UnitRank::Infantry,
        location: Location::new(location),
    }
}

pub fn army_move(player: &str, to: &str) -> ArmyMove {
    ArmyMove {
        player: PlayerSnapshot::new(player).with_unit(unit(1, to)),
        units: vec![unit(1, to)],
        to_location: Location::new(to),
    }
}

pub fn war(attacker: &str, defender: &str) -> RecognitionOfWar {
    RecognitionOfWar {
        attacker: PlayerSnapshot::new(attacker),
        defender: PlayerSnapshot::new(defender),
    }
}

/// Minimal stand-in for the game-state engine, guarded by one mutex.
pub struct Board {
    username: String,
    state: Mutex<BoardState>,
}

#[derive(Default)]
struct BoardState {
    units: Vec<Unit>,
    paused: bool,
    applied: usize,
    war_result: Option<WarOutcome>,
}

impl Board {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            state: Mutex::new(BoardState::default()),
        }
    }

    pub fn with_unit(self, unit: Unit) -> Self {
        self.state.lock().unwrap().units.push(unit);
        self
    }

    /// Outcome to report for wars this player is part of.
    pub fn with_war_result(self, outcome: WarOutcome) -> Self {
        self.state.lock().unwrap().war_result = Some(outcome);
        self
    }

    pub fn applied(&self) -> usize {
        self.state.lock().unwrap().applied
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    fn snapshot(&self, state: &BoardState) -> PlayerSnapshot {
        state
            .units
            .iter()
            .cloned()
            .fold(PlayerSnapshot::new(&self.username), PlayerSnapshot::with_unit)
    }

    pub fn handle_move(&self, mv: &ArmyMove) -> MoveOutcome {
        let mut state = self.state.lock().unwrap();
        state.applied += 1;

        if mv.player.username == self.username {
            return MoveOutcome::SamePlayer;
        }
        if state.units.iter().any(|u| u.location == mv.to_location) {
            return MoveOutcome::MakeWar {
                attacker: mv.player.clone(),
                defender: self.snapshot(&state),
            };
        }
        MoveOutcome::Safe
    }

    pub fn handle_war(&self, war: &RecognitionOfWar) -> WarOutcome {
        let mut state = self.state.lock().unwrap();
        state.applied += 1;

        if war.attacker.username != self.username && war.defender.username != self.username {
            return WarOutcome::NotInvolved;
        }
        if state.units.is_empty() {
            return WarOutcome::NoUnits;
        }
        state.war_result.clone().unwrap_or(WarOutcome::Draw {
            winner: war.attacker.username.clone(),
            loser: war.defender.username.clone(),
        })
    }

    pub fn handle_pause(&self, ps: &PlayingState) -> PauseOutcome {
        let mut state = self.state.lock().unwrap();
        state.applied += 1;
        state.paused = ps.is_paused;
        if ps.is_paused {
            PauseOutcome::Paused
        } else {
            PauseOutcome::Resumed
        }
    }
}

/// Forwards to a queue unless told to fail the next `n` publishes.
#[derive(Default)]
pub struct FlakyPublisher {
    pub queue: InMemoryQueue,
    failures: AtomicUsize,
    crashes: AtomicUsize,
    attempts: AtomicUsize,
}

impl FlakyPublisher {
    pub fn new(queue: InMemoryQueue) -> Self {
        Self {
            queue,
            failures: AtomicUsize::new(0),
            crashes: AtomicUsize::new(0),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Panic instead of returning on the next `n` publishes.
    pub fn crash_next(&self, n: usize) {
        self.crashes.store(n, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Publisher for FlakyPublisher {
    fn publish(&self, destination: &str, envelope: Envelope) -> Result<(), PublishError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let crashes = self.crashes.load(Ordering::SeqCst);
        if crashes > 0 {
            self.crashes.store(crashes - 1, Ordering::SeqCst);
            panic!("broker client crashed");
        }
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(PublishError::ConnectionFailed("channel closed".into()));
        }
        self.queue.publish(destination, envelope)
    }
}
