//! Rules layer: phase machine, turn bookkeeping, and the engine contract.
//!
//! Variants implement `RulesEngine` (and `PhaseDriven`) to define:
//! - which turn phases exist and what each one does
//! - how intents move the phase machine
//! - the win condition
//!
//! The host calls into `RulesEngine` but never interprets variant-specific
//! concepts directly.

pub mod engine;
pub mod events;
pub mod phase;
pub mod registries;
pub mod shared;
pub mod turn;

pub use engine::{GameResult, RulesEngine};
pub use events::EngineEvent;
pub use phase::{PhaseContext, PhaseDriven, PhaseHandler, PhaseStateMachine};
pub use registries::Registries;
pub use shared::EngineCore;
pub use turn::{TurnManager, TurnOutcome};
