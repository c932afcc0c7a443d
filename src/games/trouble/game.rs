//! Race-variant rules engine.

use serde_json::json;
use smallvec::SmallVec;
use tracing::{debug, error, info};

use super::moves::{apply_move, can_exit, compute_move_options, move_space_events, MoveKind, MoveOption, MoveOptions};
use crate::board::{Board, TrackLayout};
use crate::core::{EngineError, GamePhase, GameSettings, GameState, Intent, IntentKind, Player, PlayerId, TurnPhase};
use crate::effects::EffectTiming;
use crate::pipeline::ResolutionStatus;
use crate::rules::{
    EngineCore, EngineEvent, PhaseContext, PhaseDriven, PhaseStateMachine, Registries, RulesEngine, TurnManager,
    TurnOutcome,
};

/// Roll data for the turn in progress. Never serialized.
#[derive(Clone, Debug, Default)]
pub struct PendingMoves {
    pub roll: Option<u32>,
    pub options: MoveOptions,
    pub selected: Option<MoveOption>,
}

impl PendingMoves {
    pub fn clear(&mut self) {
        self.roll = None;
        self.options.clear();
        self.selected = None;
    }
}

/// The race game: pieces leave home on a special roll, circle the track,
/// and finish by entering their lane exactly.
#[derive(Clone, Debug)]
pub struct TroubleGame {
    core: EngineCore,
    phases: PhaseStateMachine<TroubleGame>,
    layout: TrackLayout,
    pending: PendingMoves,
    /// Cleared when a roll produced no move; turn-end effects are not
    /// consumed on such a turn.
    end_effects_due: bool,
}

/// Builder for creating a TroubleGame.
pub struct TroubleGameBuilder {
    board: Option<Board>,
    layout: TrackLayout,
    settings: GameSettings,
    registries: Option<Registries>,
}

impl Default for TroubleGameBuilder {
    fn default() -> Self {
        Self {
            board: None,
            layout: TrackLayout::default(),
            settings: GameSettings::default(),
            registries: None,
        }
    }
}

impl TroubleGameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play on a custom board. Without one, a bare ring is built from the
    /// layout.
    pub fn board(mut self, board: Board) -> Self {
        self.board = Some(board);
        self
    }

    /// Track geometry, used when the board does not carry its own.
    pub fn layout(mut self, layout: TrackLayout) -> Self {
        self.layout = layout;
        self
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
    pub fn build(self, seed: u64) -> TroubleGame {
        let board = match self.board {
            Some(mut board) => {
                if board.track.is_none() {
                    board.track = Some(self.layout);
                }
                board
            }
            None => Board::race("trouble", self.layout),
        };
        let mut core = EngineCore::new(board, self.settings, seed);
        if let Some(registries) = self.registries {
            core = core.with_registries(registries);
        }
        let layout = core.state.board.track.clone().unwrap_or_default();

        TroubleGame {
            core,
            phases: Self::phases(),
            layout,
            pending: PendingMoves::default(),
            end_effects_due: true,
        }
    }

    fn phases() -> PhaseStateMachine<TroubleGame> {
        let mut phases = PhaseStateMachine::new();
        phases
            .on_game_phase(GamePhase::InLobby, TroubleGame::enter_lobby)
            .on_game_phase(GamePhase::InGame, TroubleGame::enter_game)
            .on_turn_phase(TurnPhase::BeginTurn, TroubleGame::begin_turn)
            .on_turn_phase(TurnPhase::PlayerChoosingDestination, TroubleGame::choose_destination)
            .on_turn_phase(TurnPhase::ProcessingMove, TroubleGame::process_move)
            .on_turn_phase(TurnPhase::EndTurn, TroubleGame::end_turn);
        phases
    }
}

impl TroubleGame {
    /// Default game on a fresh ring.
    pub fn new(seed: u64) -> Self {
        TroubleGameBuilder::new().build(seed)
    }

    #[must_use]
    pub fn layout(&self) -> &TrackLayout {
        &self.layout
    }

    #[must_use]
    pub fn pending_moves(&self) -> &PendingMoves {
        &self.pending
    }

    fn current_index(&self) -> usize {
        self.core.state.current_player_index
    }

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

    fn select(&mut self, option: MoveOption) {
        debug!(piece = option.piece, kind = ?option.kind, to = option.to, "move selected");
        self.pending.selected = Some(option);
        self.transition_turn_phase(TurnPhase::ProcessingMove);
    }

    // === Phase handlers ===

    fn enter_lobby(&mut self, _ctx: &PhaseContext) {
        self.layout = self.core.state.board.track.clone().unwrap_or_default();
        self.pending.clear();
        self.prepare_lobby();
        self.core.state.turn_phase = TurnPhase::BeginTurn;
    }

    fn enter_game(&mut self, ctx: &PhaseContext) {
        if ctx.previous_game_phase == GamePhase::Paused {
            return;
        }
        self.transition_turn_phase(TurnPhase::BeginTurn);
    }

    fn begin_turn(&mut self, _ctx: &PhaseContext) {
        self.pending.clear();
        self.end_effects_due = true;
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
            self.transition_turn_phase(TurnPhase::EndTurn);
        } else {
            self.transition_turn_phase(TurnPhase::WaitingForMove);
        }
    }

    fn choose_destination(&mut self, _ctx: &PhaseContext) {
        let Some(first) = self.pending.options.first().cloned() else {
            error!("choosing a destination with no pending options; ending turn");
            self.transition_turn_phase(TurnPhase::EndTurn);
            return;
        };
        if !self.core.state.settings.auto_select_single_destination {
            return;
        }
        let single = self
            .pending
            .options
            .iter()
            .all(|o| o.destination() == first.destination());
        if single {
            self.select(first);
        }
    }

    fn process_move(&mut self, _ctx: &PhaseContext) {
        let Some(option) = self.pending.selected.take() else {
            error!("processing a move with nothing selected; ending turn");
            self.transition_turn_phase(TurnPhase::EndTurn);
            return;
        };
        let index = self.current_index();
        let Some((player, seat)) = self
            .core
            .state
            .players
            .get(index)
            .map(|p| (p.player_id.clone(), p.seat))
        else {
            error!("processing a move with no current player");
            return;
        };

        for event in apply_move(&mut self.core.state, index, &option) {
            self.core.emit(event);
        }
        info!(
            player = %player,
            piece = option.piece,
            status = ?option.to_status,
            position = option.to,
            "piece moved"
        );

        let special = self
            .pending
            .roll
            .is_some_and(|roll| self.core.state.settings.is_special(roll));
        if special {
            self.core.state.extra_turn_earned = true;
            self.core.emit(EngineEvent::ExtraTurnGranted { player: player.clone() });
        }
        self.pending.options.clear();

        let events = move_space_events(&self.layout, seat, &player, &option);
        match self.core.run_move_events(events) {
            ResolutionStatus::Complete => self.transition_turn_phase(TurnPhase::EndTurn),
            ResolutionStatus::Suspended(pending) => {
                debug!(ticket = pending.ticket, space = %pending.space, "move awaiting acknowledgement");
            }
        }
    }

    fn end_turn(&mut self, _ctx: &PhaseContext) {
        self.pending.clear();
        if self.end_effects_due {
            self.core.enact_effects(EffectTiming::TurnEnd);
        }
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
            Ok(_) => self.transition_turn_phase(TurnPhase::BeginTurn),
            Err(err) => error!(%err, "cannot complete turn"),
        }
    }

    // === Intents ===

    fn roll(&mut self, player: &PlayerId, intent: &Intent) -> Result<(), EngineError> {
        self.expect_phase(intent, TurnPhase::WaitingForMove)?;
        let value = self.core.roll_value(intent)?;
        let index = self.current_index();

        self.core.state.last_roll = Some(value);
        self.core.emit(EngineEvent::DiceRolled {
            player: player.clone(),
            value,
        });
        let options = compute_move_options(&self.core.state, &self.layout, index, value);
        debug!(player = %player, roll = value, options = options.len(), "dice rolled");

        self.pending.roll = Some(value);
        self.pending.options = options;
        self.branch_on_options(index, value);
        Ok(())
    }

    fn branch_on_options(&mut self, index: usize, roll: u32) {
        let has_exit = self.pending.options.iter().any(|o| o.kind == MoveKind::Exit);
        let has_advance = self.pending.options.iter().any(|o| o.kind == MoveKind::Advance);

        match (has_exit, has_advance) {
            (false, false) => {
                let special = self.core.state.settings.is_special(roll);
                let exit_expected = self
                    .core
                    .state
                    .players
                    .get(index)
                    .is_some_and(|p| can_exit(&self.layout, p));
                if special && exit_expected {
                    error!(roll, index, "special roll left a free start without an exit; ending turn");
                    self.core.state.extra_turn_earned = true;
                    if let Some(player) = self.core.state.current_player_id().cloned() {
                        self.core.emit(EngineEvent::ExtraTurnGranted { player });
                    }
                } else {
                    self.end_effects_due = false;
                }
                self.pending.clear();
                self.transition_turn_phase(TurnPhase::EndTurn);
            }
            (true, true) => self.transition_turn_phase(TurnPhase::WaitingForMoveChoice),
            (true, false) => {
                let exit = self.pending.options.iter().find(|o| o.kind == MoveKind::Exit).cloned();
                if let Some(exit) = exit {
                    self.select(exit);
                }
            }
            (false, true) => self.transition_turn_phase(TurnPhase::PlayerChoosingDestination),
        }
    }

    fn resolve_choice(&mut self, intent: &Intent) -> Result<(), EngineError> {
        self.expect_phase(intent, TurnPhase::WaitingForMoveChoice)?;
        let choice = intent
            .str_field("choice")
            .ok_or_else(|| EngineError::MalformedMessage("missing 'choice'".into()))?;
        let wanted = match choice {
            "exit" => MoveKind::Exit,
            "advance" => MoveKind::Advance,
            other => return Err(EngineError::InvalidOption(format!("unknown choice '{}'", other))),
        };
        if !self.pending.options.iter().any(|o| o.kind == wanted) {
            return Err(EngineError::NoPendingMoves);
        }

        match wanted {
            MoveKind::Exit => {
                let exit = self.pending.options.iter().find(|o| o.kind == MoveKind::Exit).cloned();
                if let Some(exit) = exit {
                    self.select(exit);
                }
            }
            MoveKind::Advance => {
                self.pending.options.retain(|o| o.kind == MoveKind::Advance);
                self.transition_turn_phase(TurnPhase::PlayerChoosingDestination);
            }
        }
        Ok(())
    }

    fn select_destination(&mut self, intent: &Intent) -> Result<(), EngineError> {
        self.expect_phase(intent, TurnPhase::PlayerChoosingDestination)?;
        if self.pending.options.is_empty() {
            return Err(EngineError::NoPendingMoves);
        }

        let option = if let Some(index) = intent.u32_field("option") {
            self.pending
                .options
                .get(index as usize)
                .cloned()
                .ok_or_else(|| EngineError::InvalidOption(format!("no option {}", index)))?
        } else if let Some(piece) = intent.u32_field("piece") {
            self.pending
                .options
                .iter()
                .find(|o| u32::from(o.piece) == piece)
                .cloned()
                .ok_or_else(|| EngineError::InvalidOption(format!("piece {} cannot move", piece)))?
        } else {
            return Err(EngineError::MalformedMessage("expected 'option' or 'piece'".into()));
        };

        self.select(option);
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
        if status.is_complete() && self.core.state.turn_phase == TurnPhase::ProcessingMove {
            self.transition_turn_phase(TurnPhase::EndTurn);
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
        self.pending.clear();
        self.core.state.extra_turn_earned = false;
        self.core.emit(EngineEvent::TurnSkipped { player: player.clone() });
        self.transition_turn_phase(TurnPhase::EndTurn);
        Ok(())
    }
}

impl PhaseDriven for TroubleGame {
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

impl RulesEngine for TroubleGame {
    fn core(&self) -> &EngineCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EngineCore {
        &mut self.core
    }

    fn turn_start_phase(&self) -> TurnPhase {
        TurnPhase::BeginTurn
    }

    fn prepare_player(&self, player: &mut Player) {
        player.position = None;
        player.reset_pieces(self.layout.pieces_per_player);
    }

    fn has_won(&self, _state: &GameState, player: &Player) -> bool {
        player.all_pieces_done()
    }

    fn apply_intent(&mut self, player: &PlayerId, intent: &Intent) -> Result<(), EngineError> {
        if intent.kind != IntentKind::AcknowledgePrompt && self.core.has_pending_action() {
            return Err(EngineError::ActionInProgress);
        }
        match &intent.kind {
            IntentKind::RollDice => self.roll(player, intent),
            IntentKind::ResolveSpecialRollChoice => self.resolve_choice(intent),
            IntentKind::SelectPieceDestination => self.select_destination(intent),
            IntentKind::AcknowledgePrompt => self.acknowledge(intent),
            IntentKind::SkipTurn => self.skip(player, intent),
            IntentKind::Custom(name) => Err(EngineError::UnsupportedIntent(name.clone())),
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
            TurnPhase::WaitingForMove => vec![Intent::new(IntentKind::RollDice)],
            TurnPhase::WaitingForMoveChoice => {
                let mut kinds: SmallVec<[&str; 2]> = SmallVec::new();
                if self.pending.options.iter().any(|o| o.kind == MoveKind::Exit) {
                    kinds.push("exit");
                }
                if self.pending.options.iter().any(|o| o.kind == MoveKind::Advance) {
                    kinds.push("advance");
                }
                kinds
                    .into_iter()
                    .map(|choice| {
                        Intent::new(IntentKind::ResolveSpecialRollChoice).with_data(json!({ "choice": choice }))
                    })
                    .collect()
            }
            TurnPhase::PlayerChoosingDestination => (0..self.pending.options.len())
                .map(|i| Intent::new(IntentKind::SelectPieceDestination).with_data(json!({ "option": i })))
                .collect(),
            _ => Vec::new(),
        }
    }
}
