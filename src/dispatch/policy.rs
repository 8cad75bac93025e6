//! Acknowledgment policy: outcome in, first-pass verdict out.
//!
//! Policies are pure. They never touch the bus or the game state and they
//! never re-derive an outcome; they only map the classifier's verdict.

use super::consequence::Consequence;
use crate::ack::AckDecision;
use crate::game::{self, MoveOutcome, PauseOutcome, WarOutcome};

/// First-pass decision for one outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Final; nothing needs publishing.
    Settled(AckDecision),
    /// Accept only once every consequence is published.
    RequiresConsequence(Vec<Consequence>),
    /// Outcome outside the known set. Resolves to `RejectDrop` with a diagnostic.
    Unrecognized(String),
}

pub trait AckPolicy: Send + Sync {
    type Outcome;

    /// Event kind this policy serves, used in diagnostics.
    fn kind(&self) -> &str;

    fn decide(&self, outcome: &Self::Outcome) -> Verdict;
}

/// Policy for army moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovePolicy;

impl AckPolicy for MovePolicy {
    type Outcome = MoveOutcome;

    fn kind(&self) -> &str {
        game::ARMY_MOVE
    }

    fn decide(&self, outcome: &MoveOutcome) -> Verdict {
        match outcome {
            MoveOutcome::SamePlayer => Verdict::Settled(AckDecision::RejectDrop),
            MoveOutcome::Safe => Verdict::Settled(AckDecision::Accept),
            MoveOutcome::MakeWar { attacker, defender } => {
                Verdict::RequiresConsequence(vec![Consequence::recognize_war(
                    attacker.clone(),
                    defender.clone(),
                )])
            }
            MoveOutcome::Unrecognized { tag } => Verdict::Unrecognized(tag.clone()),
        }
    }
}

/// Policy for war declarations. Resolved wars are logged under `username`.
#[derive(Debug, Clone)]
pub struct WarPolicy {
    username: String,
}

impl WarPolicy {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    fn log(&self, message: String) -> Verdict {
        Verdict::RequiresConsequence(vec![Consequence::game_log(&self.username, message)])
    }
}

impl AckPolicy for WarPolicy {
    type Outcome = WarOutcome;

    fn kind(&self) -> &str {
        game::RECOGNITION_OF_WAR
    }

    fn decide(&self, outcome: &WarOutcome) -> Verdict {
        match outcome {
            // Someone else may still need it.
            WarOutcome::NotInvolved => Verdict::Settled(AckDecision::RejectRequeue),
            // Conclusively inapplicable.
            WarOutcome::NoUnits => Verdict::Settled(AckDecision::RejectDrop),
            WarOutcome::OpponentWon { winner, loser } | WarOutcome::YouWon { winner, loser } => {
                self.log(format!("{} won a war against {}", winner, loser))
            }
            WarOutcome::Draw { winner, loser } => self.log(format!(
                "A war between {} and {} resulted in a draw",
                winner, loser
            )),
            WarOutcome::Unrecognized { tag } => Verdict::Unrecognized(tag.clone()),
        }
    }
}

/// Policy for pause/resume broadcasts. Applying the state is all there is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PausePolicy;

impl AckPolicy for PausePolicy {
    type Outcome = PauseOutcome;

    fn kind(&self) -> &str {
        game::PLAYING_STATE
    }

    fn decide(&self, outcome: &PauseOutcome) -> Verdict {
        match outcome {
            PauseOutcome::Paused | PauseOutcome::Resumed => Verdict::Settled(AckDecision::Accept),
            PauseOutcome::Unrecognized { tag } => Verdict::Unrecognized(tag.clone()),
        }
    }
}
