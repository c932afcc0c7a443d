//! Game settings.
//!
//! Settings travel inside `GameState` so clients see the same turn timer
//! and move delay as the host. A board definition may carry its own
//! settings, which replace the session defaults when the board loads.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

/// Session-wide rule and pacing settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    /// Seconds a player has to act before the host submits a skip.
    /// `None` disables the timer.
    pub turn_timer_secs: Option<u32>,

    /// Delay before a snapshot is released to peers, so client-side
    /// animations can finish.
    pub move_delay_ms: u64,

    /// Faces on the die.
    pub die_sides: u32,

    /// Roll values that let a piece leave home and grant an extra turn.
    pub special_rolls: SmallVec<[u32; 2]>,

    /// Resolve a destination choice automatically when every pending
    /// option ends on the same space.
    pub auto_select_single_destination: bool,

    pub min_players: usize,
    pub max_players: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            turn_timer_secs: None,
            move_delay_ms: 0,
            die_sides: 6,
            special_rolls: smallvec![6],
            auto_select_single_destination: false,
            min_players: 2,
            max_players: 4,
        }
    }
}

impl GameSettings {
    /// Create default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the turn timer (builder pattern).
    #[must_use]
    pub fn with_turn_timer(mut self, secs: u32) -> Self {
        self.turn_timer_secs = Some(secs);
        self
    }

    /// Set the broadcast delay (builder pattern).
    #[must_use]
    pub fn with_move_delay(mut self, ms: u64) -> Self {
        self.move_delay_ms = ms;
        self
    }

    /// Set the number of die faces (builder pattern).
    #[must_use]
    pub fn with_die_sides(mut self, sides: u32) -> Self {
        assert!(sides > 0, "Die must have at least 1 side");
        self.die_sides = sides;
        self
    }

    /// Replace the special roll values (builder pattern).
    #[must_use]
    pub fn with_special_rolls(mut self, rolls: &[u32]) -> Self {
        self.special_rolls = SmallVec::from_slice(rolls);
        self
    }

    /// Enable single-destination auto-select (builder pattern).
    #[must_use]
    pub fn with_auto_select(mut self) -> Self {
        self.auto_select_single_destination = true;
        self
    }

    /// Set the allowed player range (builder pattern).
    #[must_use]
    pub fn with_player_range(mut self, min: usize, max: usize) -> Self {
        assert!(min > 0 && min <= max, "Invalid player range");
        self.min_players = min;
        self.max_players = max;
        self
    }

    /// Is `roll` a special roll?
    #[must_use]
    pub fn is_special(&self, roll: u32) -> bool {
        self.special_rolls.contains(&roll)
    }

    /// Is `roll` a value the die can produce?
    #[must_use]
    pub fn is_valid_roll(&self, roll: u32) -> bool {
        (1..=self.die_sides).contains(&roll)
    }
}
