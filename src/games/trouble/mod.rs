//! Race game in the style of "Trouble".
//!
//! Each seat owns a set of pieces that start at home:
//! - a special roll lets one piece out onto the seat's start cell
//! - pieces circle the shared track and bump opponents they land on
//! - a piece enters its private finish lane by exact count
//! - the first player with every piece done wins
//!
//! A special roll that moves a piece earns another turn.

mod game;
pub mod moves;

pub use game::{PendingMoves, TroubleGame, TroubleGameBuilder};
pub use moves::{compute_move_options, Bump, MoveKind, MoveOption, MoveOptions};
