//! Turn bookkeeping.
//!
//! `TurnManager::complete_turn` decides what happens when a turn ends:
//!
//! 1. the current player has won → `GameOver`, nothing advances
//! 2. `extra_turn_earned` is set → cleared, same player again
//! 3. otherwise the seat advances in the current direction
//!
//! The caller runs the phase transition that goes with the outcome.

use tracing::info;

use crate::core::{EngineError, GameState, Player, PlayerId, TurnDirection};

/// What a completed turn leads to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    GameOver { winner: PlayerId },
    Repeat { player: PlayerId },
    Advanced { from: PlayerId, to: PlayerId },
}

/// Seat rotation and win check.
pub struct TurnManager;

impl TurnManager {
    #[must_use]
    pub fn current_player(state: &GameState) -> Option<&Player> {
        state.current_player()
    }

    #[must_use]
    pub fn is_current(state: &GameState, player: &PlayerId) -> bool {
        state.is_current(player)
    }

    /// Seat that plays after the current one, honouring direction.
    #[must_use]
    pub fn next_index(state: &GameState) -> Option<usize> {
        let count = state.player_count();
        if count == 0 {
            return None;
        }
        let current = state.current_player_index % count;
        Some(match state.direction {
            TurnDirection::Forward => (current + 1) % count,
            TurnDirection::Reverse => (current + count - 1) % count,
        })
    }

    /// Finish the current turn.
    ///
    /// `has_won` is the variant's win condition, checked before anything
    /// advances.
    pub fn complete_turn(
        state: &mut GameState,
        has_won: impl Fn(&GameState, &Player) -> bool,
    ) -> Result<TurnOutcome, EngineError> {
        let current = state.current_player().ok_or(EngineError::NoCurrentPlayer)?;
        let current_id = current.player_id.clone();

        if has_won(state, current) {
            info!(player = %current_id, "player won");
            return Ok(TurnOutcome::GameOver { winner: current_id });
        }

        state.turn_number += 1;
        if state.extra_turn_earned {
            state.extra_turn_earned = false;
            info!(player = %current_id, "extra turn");
            return Ok(TurnOutcome::Repeat { player: current_id });
        }

        let next = Self::next_index(state).ok_or(EngineError::NoCurrentPlayer)?;
        state.current_player_index = next;
        let to = state.players[next].player_id.clone();
        info!(from = %current_id, to = %to, turn = state.turn_number, "turn passes");
        Ok(TurnOutcome::Advanced { from: current_id, to })
    }
}
