//! Error types.
//!
//! Errors fall into the categories the host boundary cares about:
//! - authorization: someone acted out of turn or while the game is stopped
//! - configuration: a board references a type nobody registered
//! - missing data: a selection arrived with nothing to select from
//!
//! All of them are recoverable. The host converts them into a
//! `{success: false, error}` result; nothing here aborts a turn.

use thiserror::Error;

use super::ids::{PlayerId, SpaceId};
use super::phase::{GamePhase, TurnPhase};

/// A board or plugin referenced something the registries cannot build.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown trigger type '{0}'")]
    UnknownTrigger(String),

    #[error("unknown action type '{0}'")]
    UnknownAction(String),

    #[error("unknown effect type '{0}'")]
    UnknownEffect(String),

    #[error("invalid payload for '{type_name}': {reason}")]
    InvalidPayload { type_name: String, reason: String },
}

impl ConfigError {
    /// Build an `InvalidPayload` error.
    pub fn invalid(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

/// A board action could not run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("space {0} not found")]
    SpaceNotFound(SpaceId),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Why the engine refused an intent or host operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    // === Authorization ===
    #[error("not your turn: {claimed} acted but it is {current}'s turn")]
    NotYourTurn { claimed: PlayerId, current: PlayerId },

    #[error("game is not running (phase {0:?})")]
    GameNotRunning(GamePhase),

    // === Missing data ===
    #[error("no current player")]
    NoCurrentPlayer,

    #[error("no pending move options")]
    NoPendingMoves,

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("roll {0} is outside the die range")]
    InvalidRoll(u32),

    #[error("no action is awaiting acknowledgement")]
    NoPendingAction,

    #[error("ticket {0} does not match the pending action")]
    UnknownTicket(u64),

    // === Phase misuse ===
    #[error("'{intent}' is not accepted during {phase}")]
    WrongPhase { intent: String, phase: TurnPhase },

    #[error("an action is awaiting acknowledgement")]
    ActionInProgress,

    #[error("unsupported intent '{0}'")]
    UnsupportedIntent(String),

    // === Lobby ===
    #[error("operation requires the lobby (phase {0:?})")]
    NotInLobby(GamePhase),

    #[error("game is not paused (phase {0:?})")]
    NotPaused(GamePhase),

    #[error("a game is in progress")]
    GameInProgress,

    #[error("player {0} already joined")]
    DuplicatePlayer(PlayerId),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("need between {min} and {max} players, have {actual}")]
    PlayerCount { min: usize, max: usize, actual: usize },

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Snapshot encoding failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
