//! Canonical game state.
//!
//! `GameState` is the single record the host mutates and broadcasts. It is
//! plain data: everything in it serializes, so a snapshot taken after any
//! accepted intent fully describes the game for a client.
//!
//! ## Ownership
//!
//! - The host's engine is the only writer.
//! - Clients deserialize each snapshot and replace their copy wholesale.
//!
//! ## History
//!
//! Accepted intents are appended to `history`, an `im::Vector`, so cloning
//! the state for a snapshot does not copy the whole log.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::config::GameSettings;
use super::error::SnapshotError;
use super::ids::PlayerId;
use super::intent::IntentRecord;
use super::phase::{GamePhase, TurnPhase};
use super::player::Player;
use crate::board::Board;

/// Order in which turns pass around the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnDirection {
    #[default]
    Forward,
    Reverse,
}

impl TurnDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            TurnDirection::Forward => TurnDirection::Reverse,
            TurnDirection::Reverse => TurnDirection::Forward,
        }
    }
}

/// Complete, replicable game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,

    /// Seating order.
    pub players: Vec<Player>,

    pub game_phase: GamePhase,
    pub turn_phase: TurnPhase,
    pub current_player_index: usize,

    /// Value of the roll being resolved this turn.
    pub last_roll: Option<u32>,

    /// Current player goes again once this turn ends.
    pub extra_turn_earned: bool,

    /// Set by a skip effect at turn start; the turn ends without play.
    #[serde(default)]
    pub skip_current_turn: bool,

    #[serde(default)]
    pub direction: TurnDirection,

    /// Turn counter (starts at 1, increments each time a turn completes).
    pub turn_number: u32,

    pub settings: GameSettings,

    #[serde(default)]
    pub history: Vector<IntentRecord>,
}

impl GameState {
    /// Create a lobby state for a board.
    ///
    /// Board settings, when present, replace `settings`.
    #[must_use]
    pub fn new(board: Board, settings: GameSettings) -> Self {
        let settings = board.settings.clone().unwrap_or(settings);
        Self {
            board,
            players: Vec::new(),
            game_phase: GamePhase::InLobby,
            turn_phase: TurnPhase::BeginTurn,
            current_player_index: 0,
            last_roll: None,
            extra_turn_earned: false,
            skip_current_turn: false,
            direction: TurnDirection::Forward,
            turn_number: 1,
            settings,
            history: Vector::new(),
        }
    }

    /// Build the state for a newly loaded board, keeping the players.
    ///
    /// Everything turn-related starts over; players keep identity and
    /// stats but lose effects and positions.
    #[must_use]
    pub fn for_new_board(&self, board: Board) -> Self {
        let mut next = Self::new(board, self.settings.clone());
        next.players = self
            .players
            .iter()
            .cloned()
            .map(|mut p| {
                p.effects.clear();
                p.position = None;
                p.pieces.clear();
                p
            })
            .collect();
        next
    }

    /// Number of seated players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // === Players ===

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Mutable access to the player whose turn it is.
    pub fn current_player_mut(&mut self) -> Option<&mut Player> {
        self.players.get_mut(self.current_player_index)
    }

    /// Id of the player whose turn it is.
    #[must_use]
    pub fn current_player_id(&self) -> Option<&PlayerId> {
        self.current_player().map(|p| &p.player_id)
    }

    /// Is `player` the current player?
    #[must_use]
    pub fn is_current(&self, player: &PlayerId) -> bool {
        self.current_player_id() == Some(player)
    }

    /// Seat index of a player.
    #[must_use]
    pub fn player_index(&self, player: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.player_id == player)
    }

    /// Look up a player.
    #[must_use]
    pub fn player(&self, player: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.player_id == player)
    }

    /// Look up a player mutably.
    pub fn player_mut(&mut self, player: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.player_id == player)
    }

    // === Turn bookkeeping ===

    /// Reset the per-turn fields at the start of a turn.
    pub fn clear_turn(&mut self) {
        self.last_roll = None;
        self.skip_current_turn = false;
    }

    /// Append an accepted intent to the history.
    pub fn record_intent(&mut self, record: IntentRecord) {
        self.history.push_back(record);
    }

    // === Snapshots ===

    /// Serialize for broadcast.
    pub fn to_snapshot(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild from a broadcast snapshot.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(snapshot)?)
    }
}
