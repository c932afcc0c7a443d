//! Generic path game.
//!
//! Players move a single token over an arbitrary space graph:
//! - `Rolling`: turn-start effects run, then the player rolls
//! - `Moving`: every destination exactly `roll` steps away is offered;
//!   a lone destination is taken automatically
//! - `ChangeTurn`: turn-end effects run and the seat advances
//!
//! Landing on a `finish` space wins.

mod game;

pub use game::{PathGame, PathGameBuilder};
