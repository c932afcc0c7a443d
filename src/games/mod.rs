//! Variant engines built on the rules layer.

pub mod path;
pub mod trouble;

pub use path::{PathGame, PathGameBuilder};
pub use trouble::{TroubleGame, TroubleGameBuilder};
