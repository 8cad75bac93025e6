//! Handlers for the three event kinds a player consumes.
//!
//! Each module follows the same convention:
//!
//! ```ignore
//! pub const KIND: &str = "ArmyMove";
//!
//! pub fn handler<C, P>(classifier: C, publisher: P, config: &DispatchConfig)
//!     -> HandlerAdapter<C, MovePolicy, P>;
//! ```
//!
//! The classifier is the game-state engine's entry point for that kind; the
//! publisher is the outbound half of the bus.

pub mod army_move;
pub mod pause;
pub mod war;

pub use army_move::handler as handler_move;
pub use pause::handler as handler_pause;
pub use war::handler as handler_war;
