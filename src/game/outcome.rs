//! Outcome enumerations returned by the game-state classifier.
//!
//! Each event kind has its own closed set of outcomes. `Unrecognized` stands
//! for a classifier value outside that set; it is a programming error on the
//! classifier side, kept as an explicit arm so the dispatch core can drop the
//! message loudly instead of crashing the consumer.

use super::events::PlayerSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was made by this player; nothing to do.
    SamePlayer,
    /// The move does not collide with any of this player's units.
    Safe,
    /// The move collides with this player's units; war must be declared.
    MakeWar {
        attacker: PlayerSnapshot,
        defender: PlayerSnapshot,
    },
    Unrecognized { tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarOutcome {
    /// This player is neither attacker nor defender.
    NotInvolved,
    /// This player has no units at the contested location.
    NoUnits,
    OpponentWon { winner: String, loser: String },
    YouWon { winner: String, loser: String },
    Draw { winner: String, loser: String },
    Unrecognized { tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PauseOutcome {
    Paused,
    Resumed,
    Unrecognized { tag: String },
}

impl MoveOutcome {
    pub fn unrecognized(tag: impl Into<String>) -> Self {
        MoveOutcome::Unrecognized { tag: tag.into() }
    }
}

impl WarOutcome {
    pub fn unrecognized(tag: impl Into<String>) -> Self {
        WarOutcome::Unrecognized { tag: tag.into() }
    }
}

impl PauseOutcome {
    pub fn unrecognized(tag: impl Into<String>) -> Self {
        PauseOutcome::Unrecognized { tag: tag.into() }
    }
}
