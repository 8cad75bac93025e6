//! Domain events exchanged between players over the bus.
//!
//! Events are plain data. They are built once by the producing player and
//! never mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event-kind names carried on envelopes.
pub const ARMY_MOVE: &str = "ArmyMove";
pub const RECOGNITION_OF_WAR: &str = "RecognitionOfWar";
pub const PLAYING_STATE: &str = "PlayingState";
pub const GAME_LOG: &str = "GameLog";

/// An event type that can travel on the bus.
pub trait GameEvent: Serialize + for<'de> Deserialize<'de> {
    /// Envelope kind for this event type.
    const KIND: &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location(pub String);

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitRank {
    Infantry,
    Cavalry,
    Artillery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: u32,
    pub rank: UnitRank,
    pub location: Location,
}

/// A player's visible state at the moment an event was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub username: String,
    pub units: BTreeMap<u32, Unit>,
}

impl PlayerSnapshot {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            units: BTreeMap::new(),
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.insert(unit.id, unit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmyMove {
    pub player: PlayerSnapshot,
    pub units: Vec<Unit>,
    pub to_location: Location,
}

impl GameEvent for ArmyMove {
    const KIND: &'static str = ARMY_MOVE;
}

/// Declared by the defender when an incoming move lands on occupied ground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionOfWar {
    pub attacker: PlayerSnapshot,
    pub defender: PlayerSnapshot,
}

impl GameEvent for RecognitionOfWar {
    const KIND: &'static str = RECOGNITION_OF_WAR;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayingState {
    pub is_paused: bool,
}

impl GameEvent for PlayingState {
    const KIND: &'static str = PLAYING_STATE;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    pub current_time: DateTime<Utc>,
    pub message: String,
    pub username: String,
}

impl GameEvent for GameLog {
    const KIND: &'static str = GAME_LOG;
}
