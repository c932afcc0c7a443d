//! Players, pieces and per-player stats.
//!
//! ## Player
//!
//! A seat at the table: identity, cosmetics, the effects currently attached
//! to it, and its board presence. Single-token games use `position`;
//! multi-piece games (the race variant) use `pieces`.
//!
//! ## Piece
//!
//! A player-owned token in a multi-piece game. `position` is only
//! meaningful given `status`:
//! - `AtHome`: always `-1`
//! - `OnTrack`: track progress counted from the owner's start space
//! - `InFinishLane`: offset into the owner's finish lane
//! - `Done`: last finish-lane offset

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::ids::{PeerId, PlayerId, SpaceId};
use crate::effects::EffectRecord;

/// Position value of a piece that is not on the board.
pub const HOME_POSITION: i32 = -1;

/// Where a piece is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceStatus {
    AtHome,
    OnTrack,
    InFinishLane,
    Done,
}

impl PieceStatus {
    /// Rank used to enforce one-directional progress.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            PieceStatus::AtHome => 0,
            PieceStatus::OnTrack => 1,
            PieceStatus::InFinishLane => 2,
            PieceStatus::Done => 3,
        }
    }

    /// Whether moving from `self` to `next` is a legal status change.
    ///
    /// Forward moves are always legal; the only backward move is a bump
    /// from the track back home.
    #[must_use]
    pub fn can_become(self, next: PieceStatus) -> bool {
        next.rank() >= self.rank() || (self == PieceStatus::OnTrack && next == PieceStatus::AtHome)
    }
}

/// A token owned by a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub owner: PlayerId,
    pub index: u8,
    pub status: PieceStatus,
    pub position: i32,
}

impl Piece {
    /// Create a piece sitting at home.
    pub fn at_home(owner: PlayerId, index: u8) -> Self {
        Self {
            owner,
            index,
            status: PieceStatus::AtHome,
            position: HOME_POSITION,
        }
    }

    /// Send the piece back home.
    pub fn reset(&mut self) {
        self.status = PieceStatus::AtHome;
        self.position = HOME_POSITION;
    }

    /// Is the piece somewhere it can still advance from?
    #[must_use]
    pub fn is_in_play(&self) -> bool {
        matches!(self.status, PieceStatus::OnTrack | PieceStatus::InFinishLane)
    }
}

/// A stat value as known to the engine and as shown to players.
///
/// The two diverge when a board wants to hide or delay a change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatValue {
    pub true_value: i64,
    pub displayed: i64,
}

impl StatValue {
    /// A stat whose shown value matches its true value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self {
            true_value: value,
            displayed: value,
        }
    }
}

/// A participant in the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: PlayerId,
    pub peer_id: PeerId,
    pub nickname: String,
    #[serde(default)]
    pub colors: Vec<String>,

    /// Track seat, fixed when the game starts. Geometry keys off this, not
    /// the player's position in the turn order, so leaving never moves
    /// anyone else's pieces.
    #[serde(default)]
    pub seat: usize,

    /// Active effects in attachment order.
    #[serde(default)]
    pub effects: Vec<EffectRecord>,

    /// Token location in single-token games.
    #[serde(default)]
    pub position: Option<SpaceId>,

    /// Pieces in multi-piece games.
    #[serde(default)]
    pub pieces: Vec<Piece>,

    #[serde(default)]
    pub stats: FxHashMap<String, StatValue>,
}

impl Player {
    /// Create a player with no pieces, effects or stats.
    pub fn new(player_id: impl Into<PlayerId>, peer_id: impl Into<PeerId>, nickname: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            peer_id: peer_id.into(),
            nickname: nickname.into(),
            colors: Vec::new(),
            seat: 0,
            effects: Vec::new(),
            position: None,
            pieces: Vec::new(),
            stats: FxHashMap::default(),
        }
    }

    /// Add a color (builder pattern).
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.colors.push(color.into());
        self
    }

    /// Replace the piece set with `count` fresh pieces at home.
    pub fn reset_pieces(&mut self, count: u8) {
        self.pieces = (0..count)
            .map(|i| Piece::at_home(self.player_id.clone(), i))
            .collect();
    }

    /// Number of pieces with the given status.
    #[must_use]
    pub fn count_pieces(&self, status: PieceStatus) -> usize {
        self.pieces.iter().filter(|p| p.status == status).count()
    }

    /// True when the player has pieces and every one is done.
    #[must_use]
    pub fn all_pieces_done(&self) -> bool {
        !self.pieces.is_empty() && self.pieces.iter().all(|p| p.status == PieceStatus::Done)
    }

    // === Stats ===

    /// True value of a stat, or `default` when unset.
    #[must_use]
    pub fn stat(&self, key: &str, default: i64) -> i64 {
        self.stats.get(key).map_or(default, |s| s.true_value)
    }

    /// Set both the true and displayed value of a stat.
    pub fn set_stat(&mut self, key: impl Into<String>, value: i64) {
        self.stats.insert(key.into(), StatValue::new(value));
    }

    /// Add `delta` to a stat's true and displayed values.
    pub fn modify_stat(&mut self, key: &str, delta: i64) {
        let entry = self.stats.entry(key.to_string()).or_default();
        entry.true_value += delta;
        entry.displayed += delta;
    }
}
