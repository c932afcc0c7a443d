//! # rust-board
//!
//! A host-authoritative turn-based rule engine for multiplayer board games.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven Boards**: Spaces carry trigger→action records by type
//!    name. New behaviour is a registry entry, not an engine change.
//!
//! 2. **Phase-Driven Turns**: Every variant is a set of handlers on one
//!    two-level phase state machine (game phase × turn phase).
//!
//! 3. **Single Writer**: Only the host mutates `GameState`. Clients send
//!    intents and receive full snapshots.
//!
//! ## Architecture
//!
//! - **Suspending Pipeline**: Board actions may wait for a player to
//!   acknowledge a prompt. The pipeline parks in an explicit pending state
//!   and resumes exactly once.
//!
//! - **Persistent History**: Accepted intents are kept in an `im::Vector`,
//!   so snapshot clones stay cheap.
//!
//! - **Seeded Dice**: Host rolls come from a ChaCha8 stream.
//!
//! ## Modules
//!
//! - `core`: Ids, players and pieces, state, settings, intents, errors
//! - `board`: Space graph, trigger records, race track geometry
//! - `triggers`: Movement events and trigger predicates
//! - `actions`: Board actions that mutate state
//! - `effects`: Lingering per-player effects and their lifecycle
//! - `pipeline`: Trigger→action resolution with suspension
//! - `rules`: Phase state machine, turn manager, `RulesEngine` trait
//! - `games`: The generic path engine and the race variant
//! - `host`: Intent messages, host session, client mirror

pub mod actions;
pub mod board;
pub mod core;
pub mod effects;
pub mod games;
pub mod host;
pub mod pipeline;
pub mod rules;
pub mod triggers;

// Re-export commonly used types
pub use crate::core::{
    ActionError, ConfigError, EngineError, SnapshotError,
    GamePhase, TurnPhase,
    GameRng, GameRngState,
    GameSettings, GameState,
    Intent, IntentKind, IntentRecord,
    Piece, PieceStatus, Player,
    PeerId, PlayerId, SpaceId,
};

pub use crate::board::{Board, RuleSpec, Space, TrackLayout, TriggerRecord};

pub use crate::triggers::{SpaceEvent, SpaceEventKind, Trigger, TriggerContext, TriggerRegistry};

pub use crate::actions::{Action, ActionContext, ActionRegistry, ActionStatus, Prompt};

pub use crate::effects::{Effect, EffectContext, EffectManager, EffectRecord, EffectRegistry, EffectTiming};

pub use crate::pipeline::{EventProcessor, PendingAction, ResolutionStatus};

pub use crate::rules::{
    EngineCore, EngineEvent, GameResult,
    PhaseContext, PhaseDriven, PhaseStateMachine,
    Registries, RulesEngine, TurnManager, TurnOutcome,
};

pub use crate::games::{PathGame, PathGameBuilder, TroubleGame, TroubleGameBuilder};

pub use crate::host::{Broadcast, ClientMirror, HostMessage, HostSession, IntentMessage, IntentResult};
