//! Game and turn phase values.
//!
//! These are the two dimensions the phase state machine moves through.
//! The values live in `GameState` so they replicate with every snapshot;
//! the handlers that react to them live in `rules::phase`.

use serde::{Deserialize, Serialize};

/// Coarse session lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    InLobby,
    InGame,
    Paused,
    GameEnded,
}

impl GamePhase {
    /// Does this phase accept player intents?
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, GamePhase::InGame)
    }
}

/// Fine-grained state within a single turn.
///
/// One enum covers every engine; each engine registers handlers only for
/// the phases it actually uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    // Generic path engine
    Rolling,
    Moving,
    ChangeTurn,

    // Race variant
    #[default]
    BeginTurn,
    WaitingForMove,
    WaitingForMoveChoice,
    PlayerChoosingDestination,
    ProcessingMove,
    EndTurn,
}

impl TurnPhase {
    /// Is the engine waiting on the current player in this phase?
    #[must_use]
    pub const fn awaits_player(self) -> bool {
        matches!(
            self,
            TurnPhase::Rolling
                | TurnPhase::Moving
                | TurnPhase::WaitingForMove
                | TurnPhase::WaitingForMoveChoice
                | TurnPhase::PlayerChoosingDestination
        )
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
