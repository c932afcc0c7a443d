//! Outbound engine events.
//!
//! Engines append to an explicit queue instead of calling listeners. The
//! host drains the queue after each accepted intent and ships it alongside
//! the snapshot, so clients know *that* a roll or move happened and can
//! animate it.

use serde::{Deserialize, Serialize};

use crate::core::{GamePhase, PieceStatus, PlayerId, SpaceId, TurnPhase};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EngineEvent {
    GamePhaseChanged {
        from: GamePhase,
        to: GamePhase,
    },
    TurnPhaseChanged {
        from: TurnPhase,
        to: TurnPhase,
    },
    TurnStarted {
        player: PlayerId,
        turn: u32,
    },
    TurnSkipped {
        player: PlayerId,
    },
    DiceRolled {
        player: PlayerId,
        value: u32,
    },
    /// Single-token movement.
    PlayerMoved {
        player: PlayerId,
        from: Option<SpaceId>,
        to: SpaceId,
    },
    /// Multi-piece movement.
    PieceMoved {
        player: PlayerId,
        piece: u8,
        from_status: PieceStatus,
        from: i32,
        to_status: PieceStatus,
        to: i32,
    },
    PieceBumped {
        owner: PlayerId,
        piece: u8,
        by: PlayerId,
    },
    StatChanged {
        player: PlayerId,
        stat: String,
        value: i64,
    },
    PromptShown {
        ticket: u64,
        player: PlayerId,
        message: String,
    },
    PromptAcknowledged {
        ticket: u64,
    },
    EffectAttached {
        player: PlayerId,
        effect: String,
    },
    EffectExpired {
        player: PlayerId,
        effect: String,
    },
    ExtraTurnGranted {
        player: PlayerId,
    },
    GameWon {
        player: PlayerId,
    },
}
