//! Two-level phase state machine.
//!
//! Game phase and turn phase evolve together. Each phase has at most one
//! handler; a transition records the new value in `GameState` first and
//! then runs the incoming phase's handler, which may itself transition
//! again. The whole chain finishes before the outer call returns, so a
//! `BeginTurn → WaitingForMove` hop is atomic from the outside.
//!
//! ## Rules
//!
//! - No handler registered: the value is still recorded, nothing runs.
//! - `GameEnded` is terminal. Turn-phase transitions are ignored and the
//!   only game-phase transition out of it is back to `InLobby`.
//!
//! ```
//! use rust_board::board::Board;
//! use rust_board::core::{GameSettings, GamePhase, GameState, TurnPhase};
//! use rust_board::rules::{PhaseContext, PhaseDriven, PhaseStateMachine};
//!
//! struct Counter {
//!     state: GameState,
//!     phases: PhaseStateMachine<Counter>,
//!     begun: u32,
//! }
//!
//! impl PhaseDriven for Counter {
//!     fn phases(&self) -> &PhaseStateMachine<Self> { &self.phases }
//!     fn state(&self) -> &GameState { &self.state }
//!     fn state_mut(&mut self) -> &mut GameState { &mut self.state }
//! }
//!
//! fn begin(c: &mut Counter, _ctx: &PhaseContext) {
//!     c.begun += 1;
//!     c.transition_turn_phase(TurnPhase::WaitingForMove);
//! }
//!
//! let mut phases = PhaseStateMachine::new();
//! phases.on_turn_phase(TurnPhase::BeginTurn, begin);
//!
//! let mut c = Counter {
//!     state: GameState::new(Board::new("b"), GameSettings::default()),
//!     phases,
//!     begun: 0,
//! };
//! c.transition_turn_phase(TurnPhase::BeginTurn);
//! assert_eq!(c.begun, 1);
//! assert_eq!(c.state.turn_phase, TurnPhase::WaitingForMove);
//! ```

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::events::EngineEvent;
use crate::core::{GamePhase, GameState, TurnPhase};

/// Phases in effect before a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseContext {
    pub previous_game_phase: GamePhase,
    pub previous_turn_phase: TurnPhase,
}

impl PhaseContext {
    fn of(state: &GameState) -> Self {
        Self {
            previous_game_phase: state.game_phase,
            previous_turn_phase: state.turn_phase,
        }
    }
}

/// Handler run on entering a phase.
pub type PhaseHandler<E> = fn(&mut E, &PhaseContext);

/// Handler tables for one engine type.
pub struct PhaseStateMachine<E> {
    game: FxHashMap<GamePhase, PhaseHandler<E>>,
    turn: FxHashMap<TurnPhase, PhaseHandler<E>>,
}

impl<E> Default for PhaseStateMachine<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for PhaseStateMachine<E> {
    fn clone(&self) -> Self {
        Self {
            game: self.game.clone(),
            turn: self.turn.clone(),
        }
    }
}

impl<E> std::fmt::Debug for PhaseStateMachine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseStateMachine")
            .field("game_phases", &self.game.keys().collect::<Vec<_>>())
            .field("turn_phases", &self.turn.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<E> PhaseStateMachine<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            game: FxHashMap::default(),
            turn: FxHashMap::default(),
        }
    }

    /// Register the handler for a game phase, replacing any earlier one.
    pub fn on_game_phase(&mut self, phase: GamePhase, handler: PhaseHandler<E>) -> &mut Self {
        if self.game.insert(phase, handler).is_some() {
            warn!(?phase, "game phase handler replaced");
        }
        self
    }

    /// Register the handler for a turn phase, replacing any earlier one.
    pub fn on_turn_phase(&mut self, phase: TurnPhase, handler: PhaseHandler<E>) -> &mut Self {
        if self.turn.insert(phase, handler).is_some() {
            warn!(?phase, "turn phase handler replaced");
        }
        self
    }

    #[must_use]
    pub fn game_handler(&self, phase: GamePhase) -> Option<PhaseHandler<E>> {
        self.game.get(&phase).copied()
    }

    #[must_use]
    pub fn turn_handler(&self, phase: TurnPhase) -> Option<PhaseHandler<E>> {
        self.turn.get(&phase).copied()
    }

    /// Turn phases with a handler.
    #[must_use]
    pub fn handles_turn_phase(&self, phase: TurnPhase) -> bool {
        self.turn.contains_key(&phase)
    }
}

/// Anything driven by a [`PhaseStateMachine`].
pub trait PhaseDriven: Sized {
    fn phases(&self) -> &PhaseStateMachine<Self>;

    fn state(&self) -> &GameState;

    fn state_mut(&mut self) -> &mut GameState;

    /// Called with each recorded transition. Engines forward these to
    /// their outbound queue.
    fn phase_changed(&mut self, _event: EngineEvent) {}

    /// Record `phase` and run its handler.
    fn transition_game_phase(&mut self, phase: GamePhase) {
        let ctx = PhaseContext::of(self.state());
        if ctx.previous_game_phase == GamePhase::GameEnded && phase != GamePhase::InLobby {
            debug!(?phase, "game has ended; transition ignored");
            return;
        }

        self.state_mut().game_phase = phase;
        debug!(from = ?ctx.previous_game_phase, to = ?phase, "game phase");
        self.phase_changed(EngineEvent::GamePhaseChanged {
            from: ctx.previous_game_phase,
            to: phase,
        });

        let handler = self.phases().game_handler(phase);
        match handler {
            Some(handler) => handler(self, &ctx),
            None => debug!(?phase, "no game phase handler"),
        }
    }

    /// Record `phase` and run its handler. Ignored once the game has ended.
    fn transition_turn_phase(&mut self, phase: TurnPhase) {
        let ctx = PhaseContext::of(self.state());
        if ctx.previous_game_phase == GamePhase::GameEnded {
            debug!(?phase, "game has ended; turn transition ignored");
            return;
        }

        self.state_mut().turn_phase = phase;
        debug!(from = ?ctx.previous_turn_phase, to = ?phase, "turn phase");
        self.phase_changed(EngineEvent::TurnPhaseChanged {
            from: ctx.previous_turn_phase,
            to: phase,
        });

        let handler = self.phases().turn_handler(phase);
        match handler {
            Some(handler) => handler(self, &ctx),
            None => debug!(?phase, "no turn phase handler"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::core::GameSettings;

    struct Probe {
        state: GameState,
        phases: PhaseStateMachine<Probe>,
        log: Vec<String>,
        events: Vec<EngineEvent>,
    }

    impl PhaseDriven for Probe {
        fn phases(&self) -> &PhaseStateMachine<Self> {
            &self.phases
        }

        fn state(&self) -> &GameState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut GameState {
            &mut self.state
        }

        fn phase_changed(&mut self, event: EngineEvent) {
            self.events.push(event);
        }
    }

    fn probe() -> Probe {
        let mut phases = PhaseStateMachine::new();
        phases
            .on_game_phase(GamePhase::InGame, |p: &mut Probe, ctx| {
                p.log.push(format!("game from {:?}", ctx.previous_game_phase));
                p.transition_turn_phase(TurnPhase::BeginTurn);
            })
            .on_turn_phase(TurnPhase::BeginTurn, |p: &mut Probe, _| {
                p.log.push("begin".into());
                p.transition_turn_phase(TurnPhase::WaitingForMove);
            })
            .on_turn_phase(TurnPhase::WaitingForMove, |p: &mut Probe, ctx| {
                p.log.push(format!("waiting from {:?}", ctx.previous_turn_phase));
            });

        Probe {
            state: GameState::new(Board::new("b"), GameSettings::default()),
            phases,
            log: Vec::new(),
            events: Vec::new(),
        }
    }

    #[test]
    fn test_initial_phases() {
        let p = probe();
        assert_eq!(p.state.game_phase, GamePhase::InLobby);
        assert_eq!(p.state.turn_phase, TurnPhase::BeginTurn);
    }

    #[test]
    fn test_chained_transitions_complete_before_return() {
        let mut p = probe();
        p.transition_game_phase(GamePhase::InGame);

        assert_eq!(p.state.game_phase, GamePhase::InGame);
        assert_eq!(p.state.turn_phase, TurnPhase::WaitingForMove);
        assert_eq!(p.log, vec!["game from InLobby", "begin", "waiting from BeginTurn"]);
        assert_eq!(p.events.len(), 3);
    }

    #[test]
    fn test_unregistered_phase_records_value() {
        let mut p = probe();
        p.transition_turn_phase(TurnPhase::EndTurn);
        assert_eq!(p.state.turn_phase, TurnPhase::EndTurn);
        assert!(p.log.is_empty());
    }

    #[test]
    fn test_game_ended_is_terminal() {
        let mut p = probe();
        p.transition_game_phase(GamePhase::GameEnded);
        p.log.clear();

        p.transition_turn_phase(TurnPhase::BeginTurn);
        p.transition_game_phase(GamePhase::InGame);
        assert_eq!(p.state.game_phase, GamePhase::GameEnded);
        assert!(p.log.is_empty());

        p.transition_game_phase(GamePhase::InLobby);
        assert_eq!(p.state.game_phase, GamePhase::InLobby);
    }

    #[test]
    fn test_replacing_handler() {
        let mut phases: PhaseStateMachine<Probe> = PhaseStateMachine::new();
        phases.on_turn_phase(TurnPhase::Rolling, |_, _| {});
        phases.on_turn_phase(TurnPhase::Rolling, |p, _| p.log.push("second".into()));
        assert!(phases.handles_turn_phase(TurnPhase::Rolling));

        let mut p = probe();
        p.phases = phases;
        p.transition_turn_phase(TurnPhase::Rolling);
        assert_eq!(p.log, vec!["second"]);
    }
}
