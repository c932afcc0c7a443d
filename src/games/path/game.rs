//! Path engine: roll, walk the graph, land, hand over the turn.

use serde_json::json;
use tracing::{debug, error, info};

use crate::board::{Board, Route};
use crate::core::{EngineError, GamePhase, GameSettings, GameState, Intent, IntentKind, Player, PlayerId, SpaceId, TurnPhase};
use crate::effects::EffectTiming;
use crate::pipeline::ResolutionStatus;
use crate::rules::{
    EngineCore, EngineEvent, PhaseContext, PhaseDriven, PhaseStateMachine, Registries, RulesEngine, TurnManager,
    TurnOutcome,
};
use crate::triggers::SpaceEvent;

/// Single-token game on an arbitrary space graph.
#[derive(Clone, Debug)]
pub struct PathGame {
    core: EngineCore,
    phases: PhaseStateMachine<PathGame>,
    /// Destinations for the roll being resolved.
    routes: Vec<Route>,
}

/// Builder for creating a PathGame.
pub struct PathGameBuilder {
    board: Board,
    settings: GameSettings,
    registries: Option<Registries>,
}

impl PathGameBuilder {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            settings: GameSettings::default(),
            registries: None,
        }
    }

    pub fn settings(mut self, settings: GameSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registries(mut self, registries: Registries) -> Self {
        self.registries = Some(registries);
        self
    }

    /// Build the game in the lobby.
    pub fn build(self, seed: u64) -> PathGame {
        let mut core = EngineCore::new(self.board, self.settings, seed);
        if let Some(registries) = self.registries {
            core = core.with_registries(registries);
        }
        core.state.turn_phase = TurnPhase::Rolling;

        let mut phases = PhaseStateMachine::new();
        phases
            .on_game_phase(GamePhase::InLobby, PathGame::enter_lobby)
            .on_game_phase(GamePhase::InGame, PathGame::enter_game)
            .on_turn_phase(TurnPhase::Rolling, PathGame::rolling)
            .on_turn_phase(TurnPhase::Moving, PathGame::moving)
            .on_turn_phase(TurnPhase::ChangeTurn, PathGame::change_turn);

        PathGame {
            core,
            phases,
            routes: Vec::new(),
        }
    }
}

impl PathGame {
    pub fn new(board: Board, seed: u64) -> Self {
        PathGameBuilder::new(board).build(seed)
    }

    /// Destinations offered for the current roll.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    fn move_along(&mut self, route: Route) {
        let Some(player) = self.core.state.current_player_id().cloned() else {
            error!("moving with no current player");
            return;
        };
        let destination = route.destination().clone();
        let origin = self
            .core
            .state
            .current_player_mut()
            .and_then(|p| p.position.replace(destination.clone()));
        self.routes.clear();

        info!(player = %player, to = %destination, "token moved");
        self.core.emit(EngineEvent::PlayerMoved {
            player: player.clone(),
            from: origin.clone(),
            to: destination.clone(),
        });

        let events = SpaceEvent::for_move(&player, origin.as_ref(), route.passed(), &destination);
        match self.core.run_move_events(events) {
            ResolutionStatus::Complete => self.transition_turn_phase(TurnPhase::ChangeTurn),
            ResolutionStatus::Suspended(pending) => {
                debug!(ticket = pending.ticket, space = %pending.space, "move awaiting acknowledgement");
            }
        }
    }

    // === Phase handlers ===

    fn enter_lobby(&mut self, _ctx: &PhaseContext) {
        self.routes.clear();
        self.prepare_lobby();
        self.core.state.turn_phase = TurnPhase::Rolling;
    }

    fn enter_game(&mut self, ctx: &PhaseContext) {
        if ctx.previous_game_phase == GamePhase::Paused {
            return;
        }
        self.transition_turn_phase(TurnPhase::Rolling);
    }

    fn rolling(&mut self, _ctx: &PhaseContext) {
        self.routes.clear();
        self.core.state.clear_turn();

        let Some(player) = self.core.state.current_player_id().cloned() else {
            error!("turn started with no current player");
            return;
        };
        let turn = self.core.state.turn_number;
        info!(player = %player, turn, "turn started");
        self.core.emit(EngineEvent::TurnStarted {
            player: player.clone(),
            turn,
        });

        self.core.enact_effects(EffectTiming::TurnStart);
        self.core.sweep_effects();

        if self.core.state.skip_current_turn {
            info!(player = %player, "turn skipped");
            self.core.state.extra_turn_earned = false;
            self.core.emit(EngineEvent::TurnSkipped { player });
            self.transition_turn_phase(TurnPhase::ChangeTurn);
        }
    }

    fn moving(&mut self, _ctx: &PhaseContext) {
        match self.routes.len() {
            0 => {
                debug!("no destination for this roll");
                self.transition_turn_phase(TurnPhase::ChangeTurn);
            }
            1 => {
                let route = self.routes.remove(0);
                self.move_along(route);
            }
            n => debug!(destinations = n, "waiting for a destination"),
        }
    }

    fn change_turn(&mut self, _ctx: &PhaseContext) {
        self.routes.clear();
        self.core.enact_effects(EffectTiming::TurnEnd);
        self.core.sweep_effects();

        let won = self
            .core
            .state
            .current_player()
            .is_some_and(|player| self.has_won(&self.core.state, player));
        match TurnManager::complete_turn(&mut self.core.state, |_, _| won) {
            Ok(TurnOutcome::GameOver { winner }) => {
                self.core.emit(EngineEvent::GameWon { player: winner });
                self.transition_game_phase(GamePhase::GameEnded);
            }
            Ok(_) => self.transition_turn_phase(TurnPhase::Rolling),
            Err(err) => error!(%err, "cannot complete turn"),
        }
    }

    // === Intents ===

    fn expect_phase(&self, intent: &Intent, phase: TurnPhase) -> Result<(), EngineError> {
        let current = self.core.state.turn_phase;
        if current == phase {
            Ok(())
        } else {
            Err(EngineError::WrongPhase {
                intent: intent.kind.to_string(),
                phase: current,
            })
        }
    }

    fn roll(&mut self, player: &PlayerId, intent: &Intent) -> Result<(), EngineError> {
        self.expect_phase(intent, TurnPhase::Rolling)?;
        let from = self
            .core
            .state
            .current_player()
            .and_then(|p| p.position.clone())
            .ok_or_else(|| EngineError::InvalidOption(format!("{} has no token on the board", player)))?;
        let value = self.core.roll_value(intent)?;

        self.core.state.last_roll = Some(value);
        self.core.emit(EngineEvent::DiceRolled {
            player: player.clone(),
            value,
        });
        self.routes = self.core.state.board.destinations(&from, value);
        debug!(player = %player, roll = value, destinations = self.routes.len(), "dice rolled");
        self.transition_turn_phase(TurnPhase::Moving);
        Ok(())
    }

    fn select_destination(&mut self, intent: &Intent) -> Result<(), EngineError> {
        self.expect_phase(intent, TurnPhase::Moving)?;
        if self.routes.is_empty() {
            return Err(EngineError::NoPendingMoves);
        }

        let index = if let Some(space) = intent.str_field("space") {
            let space = SpaceId::new(space);
            self.routes
                .iter()
                .position(|r| r.destination() == &space)
                .ok_or_else(|| EngineError::InvalidOption(format!("{} is not reachable", space)))?
        } else if let Some(index) = intent.u32_field("option") {
            let index = index as usize;
            if index >= self.routes.len() {
                return Err(EngineError::InvalidOption(format!("no option {}", index)));
            }
            index
        } else {
            return Err(EngineError::MalformedMessage("expected 'space' or 'option'".into()));
        };

        let route = self.routes.swap_remove(index);
        self.move_along(route);
        Ok(())
    }

    fn acknowledge(&mut self, intent: &Intent) -> Result<(), EngineError> {
        let pending = self.core.processor.pending().ok_or(EngineError::NoPendingAction)?;
        let ticket = intent
            .data
            .get("ticket")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(pending.ticket);

        let status = self.core.acknowledge(ticket)?;
        if status.is_complete() && self.core.state.turn_phase == TurnPhase::Moving {
            self.transition_turn_phase(TurnPhase::ChangeTurn);
        }
        Ok(())
    }

    fn skip(&mut self, player: &PlayerId, intent: &Intent) -> Result<(), EngineError> {
        let phase = self.core.state.turn_phase;
        if !phase.awaits_player() {
            return Err(EngineError::WrongPhase {
                intent: intent.kind.to_string(),
                phase,
            });
        }
        info!(player = %player, ?phase, "turn skipped by request");
        self.routes.clear();
        self.core.state.extra_turn_earned = false;
        self.core.emit(EngineEvent::TurnSkipped { player: player.clone() });
        self.transition_turn_phase(TurnPhase::ChangeTurn);
        Ok(())
    }
}

fn on_finish(state: &GameState, player: &Player) -> bool {
    player
        .position
        .as_ref()
        .and_then(|id| state.board.space(id))
        .is_some_and(|space| space.finish)
}

impl PhaseDriven for PathGame {
    fn phases(&self) -> &PhaseStateMachine<Self> {
        &self.phases
    }

    fn state(&self) -> &GameState {
        &self.core.state
    }

    fn state_mut(&mut self) -> &mut GameState {
        &mut self.core.state
    }

    fn phase_changed(&mut self, event: EngineEvent) {
        self.core.emit(event);
    }
}

impl RulesEngine for PathGame {
    fn core(&self) -> &EngineCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EngineCore {
        &mut self.core
    }

    fn turn_start_phase(&self) -> TurnPhase {
        TurnPhase::Rolling
    }

    fn prepare_player(&self, player: &mut Player) {
        player.pieces.clear();
        player.position = self.core.state.board.start_space.clone();
    }

    fn has_won(&self, state: &GameState, player: &Player) -> bool {
        on_finish(state, player)
    }

    fn apply_intent(&mut self, player: &PlayerId, intent: &Intent) -> Result<(), EngineError> {
        if intent.kind != IntentKind::AcknowledgePrompt && self.core.has_pending_action() {
            return Err(EngineError::ActionInProgress);
        }
        match &intent.kind {
            IntentKind::RollDice => self.roll(player, intent),
            IntentKind::SelectPieceDestination => self.select_destination(intent),
            IntentKind::AcknowledgePrompt => self.acknowledge(intent),
            IntentKind::SkipTurn => self.skip(player, intent),
            other => Err(EngineError::UnsupportedIntent(other.to_string())),
        }
    }

    fn legal_intents(&self) -> Vec<Intent> {
        if !self.core.state.game_phase.is_running() {
            return Vec::new();
        }
        if let Some(pending) = self.core.processor.pending() {
            return vec![Intent::new(IntentKind::AcknowledgePrompt).with_data(json!({ "ticket": pending.ticket }))];
        }
        match self.core.state.turn_phase {
            TurnPhase::Rolling => vec![Intent::new(IntentKind::RollDice)],
            TurnPhase::Moving => self
                .routes
                .iter()
                .map(|r| {
                    Intent::new(IntentKind::SelectPieceDestination).with_data(json!({ "space": r.destination().as_str() }))
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
