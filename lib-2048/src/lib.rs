//! Rules of 2048: moving, merging and spawning tiles, and the session that strings moves
//! together.

pub use core_2048::*;

pub mod logic;
pub mod session;

pub use logic::MoveResult;
pub use session::{Game, Session};
