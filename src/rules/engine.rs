//! Rules engine trait for variant implementations.
//!
//! Variants implement `RulesEngine` to define:
//! - the first turn phase of every turn
//! - how a player is set up on the board
//! - the win condition
//! - how intents move their phase machine
//!
//! Everything else (authorization, the lobby, pause and resume, loading a
//! new board) is provided here once, on top of [`EngineCore`].

use tracing::info;

use super::events::EngineEvent;
use super::phase::PhaseDriven;
use super::registries::Registries;
use super::shared::EngineCore;
use crate::board::Board;
use crate::core::{EngineError, GamePhase, GameState, Intent, Player, PlayerId, TurnPhase};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner, e.g. everyone else left).
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: &PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => p == player,
            GameResult::Draw => false,
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `apply_intent` runs after authorization and must validate before it
///   mutates, so a rejected intent leaves the state untouched
/// - `legal_intents` returns an empty vec while the engine is not waiting
///   on the current player
pub trait RulesEngine: PhaseDriven {
    fn core(&self) -> &EngineCore;

    fn core_mut(&mut self) -> &mut EngineCore;

    /// Phase every turn starts in.
    fn turn_start_phase(&self) -> TurnPhase;

    /// Put a player's pieces or token in their starting position.
    fn prepare_player(&self, player: &mut Player);

    /// Win condition.
    fn has_won(&self, state: &GameState, player: &Player) -> bool;

    /// Handle an authorized intent from the current player.
    fn apply_intent(&mut self, player: &PlayerId, intent: &Intent) -> Result<(), EngineError>;

    /// Intents the current player could send right now.
    fn legal_intents(&self) -> Vec<Intent>;

    // === Provided ===

    /// Registries, for plugins adding types.
    fn registries_mut(&mut self) -> &mut Registries {
        &mut self.core_mut().registries
    }

    fn has_pending_action(&self) -> bool {
        self.core().has_pending_action()
    }

    /// Drain outbound events.
    fn take_events(&mut self) -> Vec<EngineEvent> {
        self.core_mut().take_events()
    }

    /// Check if the game is over.
    ///
    /// A game ends on the first player to meet the win condition, so there
    /// is at most one winner; a game ended by players leaving is a draw.
    fn is_terminal(&self) -> Option<GameResult> {
        let state = self.state();
        if state.game_phase != GamePhase::GameEnded {
            return None;
        }
        Some(
            state
                .players
                .iter()
                .find(|p| self.has_won(state, p))
                .map_or(GameResult::Draw, |p| GameResult::Winner(p.player_id.clone())),
        )
    }

    /// Is `player` allowed to act right now?
    fn authorize(&self, player: &PlayerId) -> Result<(), EngineError> {
        let state = self.state();
        if !state.game_phase.is_running() {
            return Err(EngineError::GameNotRunning(state.game_phase));
        }
        let current = state.current_player_id().ok_or(EngineError::NoCurrentPlayer)?;
        if current != player {
            return Err(EngineError::NotYourTurn {
                claimed: player.clone(),
                current: current.clone(),
            });
        }
        Ok(())
    }

    /// Authorize and apply an intent.
    fn submit(&mut self, player: &PlayerId, intent: &Intent) -> Result<(), EngineError> {
        self.authorize(player)?;
        self.apply_intent(player, intent)
    }

    // === Lobby ===

    /// Seat a new player.
    fn join(&mut self, mut player: Player) -> Result<(), EngineError> {
        let state = self.state();
        if state.game_phase != GamePhase::InLobby {
            return Err(EngineError::NotInLobby(state.game_phase));
        }
        if state.player(&player.player_id).is_some() {
            return Err(EngineError::DuplicatePlayer(player.player_id));
        }
        let settings = &state.settings;
        if state.player_count() >= settings.max_players {
            return Err(EngineError::PlayerCount {
                min: settings.min_players,
                max: settings.max_players,
                actual: state.player_count() + 1,
            });
        }

        player.seat = state.players.iter().map(|p| p.seat + 1).max().unwrap_or(0);
        self.prepare_player(&mut player);
        info!(player = %player.player_id, nickname = %player.nickname, seat = player.seat, "player joined");
        self.core_mut().state.players.push(player);
        Ok(())
    }

    /// Remove a player. Mid-game, the turn passes on if it was theirs and
    /// the game ends when fewer than two players remain.
    fn leave(&mut self, player: &PlayerId) -> Result<(), EngineError> {
        let state = self.state();
        let index = state
            .player_index(player)
            .ok_or_else(|| EngineError::UnknownPlayer(player.clone()))?;
        let was_current = index == state.current_player_index;
        let phase = state.game_phase;

        {
            let state = &mut self.core_mut().state;
            state.players.remove(index);
            if index < state.current_player_index {
                state.current_player_index -= 1;
            }
            if state.current_player_index >= state.players.len() {
                state.current_player_index = 0;
            }
        }
        info!(player = %player, "player left");

        if matches!(phase, GamePhase::InGame | GamePhase::Paused) {
            if self.state().player_count() < 2 {
                self.transition_game_phase(GamePhase::GameEnded);
            } else if was_current {
                let core = self.core_mut();
                core.processor.clear();
                core.state.extra_turn_earned = false;
                let start = self.turn_start_phase();
                self.transition_turn_phase(start);
            }
        }
        Ok(())
    }

    /// Reset every player and the session, ready for a new game. Seats are
    /// renumbered in join order.
    ///
    /// Variants call this from their `InLobby` handler.
    fn prepare_lobby(&mut self) {
        self.core_mut().reset_session();
        let mut players = std::mem::take(&mut self.core_mut().state.players);
        for (seat, player) in players.iter_mut().enumerate() {
            player.seat = seat;
            self.prepare_player(player);
        }
        self.core_mut().state.players = players;
    }

    /// Start the game from the lobby.
    fn start(&mut self) -> Result<(), EngineError> {
        let state = self.state();
        if state.game_phase != GamePhase::InLobby {
            return Err(EngineError::NotInLobby(state.game_phase));
        }
        let settings = &state.settings;
        let count = state.player_count();
        if count < settings.min_players || count > settings.max_players {
            return Err(EngineError::PlayerCount {
                min: settings.min_players,
                max: settings.max_players,
                actual: count,
            });
        }

        self.prepare_lobby();
        info!(players = count, board = %self.state().board.name, "game started");
        self.transition_game_phase(GamePhase::InGame);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        let phase = self.state().game_phase;
        if phase != GamePhase::InGame {
            return Err(EngineError::GameNotRunning(phase));
        }
        info!("game paused");
        self.transition_game_phase(GamePhase::Paused);
        Ok(())
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        let phase = self.state().game_phase;
        if phase != GamePhase::Paused {
            return Err(EngineError::NotPaused(phase));
        }
        info!("game resumed");
        self.transition_game_phase(GamePhase::InGame);
        Ok(())
    }

    /// Replace the board. Players persist; everything else starts over in
    /// the lobby.
    fn load_board(&mut self, board: Board) {
        info!(board = %board.name, "board loaded");
        let next = self.state().for_new_board(board);
        let core = self.core_mut();
        core.state = next;
        core.processor.clear();
        self.transition_game_phase(GamePhase::InLobby);
    }

    /// Leave a finished game for a fresh lobby on the same board.
    fn return_to_lobby(&mut self) -> Result<(), EngineError> {
        let phase = self.state().game_phase;
        if phase == GamePhase::InGame {
            return Err(EngineError::GameInProgress);
        }
        self.transition_game_phase(GamePhase::InLobby);
        Ok(())
    }
}
