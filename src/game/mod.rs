//! Game vocabulary: the events players exchange and the outcomes the
//! game-state engine reports after applying them.

mod events;
mod outcome;

pub use events::{
    ArmyMove, GameEvent, GameLog, Location, PlayerSnapshot, PlayingState, RecognitionOfWar,
    Unit, UnitRank, ARMY_MOVE, GAME_LOG, PLAYING_STATE, RECOGNITION_OF_WAR,
};
pub use outcome::{MoveOutcome, PauseOutcome, WarOutcome};
