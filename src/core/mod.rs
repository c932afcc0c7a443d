//! Core engine types: ids, players, pieces, state, intents, RNG, settings, errors.
//!
//! This module contains the building blocks every variant shares. Variants
//! configure these through `GameSettings` and the board definition rather
//! than modifying the core.

pub mod config;
pub mod error;
pub mod ids;
pub mod intent;
pub mod payload;
pub mod phase;
pub mod player;
pub mod rng;
pub mod state;

pub use config::GameSettings;
pub use error::{ActionError, ConfigError, EngineError, SnapshotError};
pub use ids::{PeerId, PlayerId, SpaceId};
pub use intent::{Intent, IntentKind, IntentRecord};
pub use phase::{GamePhase, TurnPhase};
pub use player::{Piece, PieceStatus, Player, StatValue, HOME_POSITION};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, TurnDirection};
