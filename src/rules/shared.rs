//! State and services every variant engine carries.
//!
//! Variants own an `EngineCore` and reach the canonical state, the
//! registries, the pipeline, the dice and the outbound event queue through
//! it. Keeping these together lets the lobby and intent-routing logic in
//! [`RulesEngine`](super::RulesEngine) be written once.

use tracing::debug;

use super::events::EngineEvent;
use super::registries::Registries;
use crate::board::Board;
use crate::core::{EngineError, GameRng, GameSettings, GameState, Intent, TurnDirection};
use crate::effects::{EffectContext, EffectManager, EffectTiming};
use crate::pipeline::{EventProcessor, ResolutionStatus};
use crate::triggers::SpaceEvent;

/// Shared engine state.
#[derive(Clone, Debug)]
pub struct EngineCore {
    pub state: GameState,
    pub registries: Registries,
    pub processor: EventProcessor,
    pub rng: GameRng,
    events: Vec<EngineEvent>,
}

impl EngineCore {
    /// Create a core in the lobby with the built-in registries.
    #[must_use]
    pub fn new(board: Board, settings: GameSettings, seed: u64) -> Self {
        Self {
            state: GameState::new(board, settings),
            registries: Registries::with_builtins(),
            processor: EventProcessor::new(),
            rng: GameRng::new(seed),
            events: Vec::new(),
        }
    }

    /// Replace the registries (builder pattern).
    #[must_use]
    pub fn with_registries(mut self, registries: Registries) -> Self {
        self.registries = registries;
        self
    }

    // === Events ===

    pub fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    /// Events queued since the last drain.
    #[must_use]
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Drain the outbound queue.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // === Effects ===

    /// Enact the current player's effects for `timing`.
    pub fn enact_effects(&mut self, timing: EffectTiming) -> usize {
        let mut ctx = EffectContext::new(&mut self.state, &mut self.events);
        EffectManager::enact_for(&self.registries.effects, &mut ctx, timing)
    }

    /// Purge exhausted effects.
    pub fn sweep_effects(&mut self) -> usize {
        let mut ctx = EffectContext::new(&mut self.state, &mut self.events);
        EffectManager::sweep(&mut ctx)
    }

    // === Pipeline ===

    /// Queue a committed move's events and resolve them.
    pub fn run_move_events(&mut self, events: Vec<SpaceEvent>) -> ResolutionStatus {
        self.processor.enqueue(events);
        self.processor
            .resolve(&mut self.state, &self.registries, &mut self.events)
    }

    /// Acknowledge the pending action and resume the pipeline.
    pub fn acknowledge(&mut self, ticket: u64) -> Result<ResolutionStatus, EngineError> {
        self.processor
            .acknowledge(ticket, &mut self.state, &self.registries, &mut self.events)
    }

    #[must_use]
    pub fn has_pending_action(&self) -> bool {
        self.processor.pending().is_some()
    }

    // === Dice ===

    /// The value a roll intent resolves to: the client's reported value,
    /// or a host roll when none was sent.
    pub fn roll_value(&mut self, intent: &Intent) -> Result<u32, EngineError> {
        let sides = self.state.settings.die_sides;
        match intent.data.get("value") {
            None | Some(serde_json::Value::Null) => Ok(self.rng.roll_die(sides)),
            Some(_) => {
                let value = intent
                    .u32_field("value")
                    .ok_or_else(|| EngineError::MalformedMessage("roll value must be a positive integer".into()))?;
                if self.state.settings.is_valid_roll(value) {
                    Ok(value)
                } else {
                    Err(EngineError::InvalidRoll(value))
                }
            }
        }
    }

    // === Lobby ===

    /// Reset everything a new game starts without.
    pub fn reset_session(&mut self) {
        let state = &mut self.state;
        state.current_player_index = 0;
        state.turn_number = 1;
        state.direction = TurnDirection::Forward;
        state.extra_turn_earned = false;
        state.clear_turn();
        state.history.clear();
        for player in &mut state.players {
            player.effects.clear();
        }
        self.processor.clear();
        debug!("session reset");
    }
}
