//! Race-track geometry.
//!
//! Every seat walks the same circular track, starting at its own start
//! cell and turning into its private finish lane after `entry_point`.
//!
//! ## Coordinates
//!
//! Pieces store *relative* progress, so geometry is identical for every
//! seat:
//!
//! - `OnTrack`: progress `0..=entry_point` from the seat's start cell
//! - `InFinishLane`: offset `0..finish_length` into the lane
//!
//! Collisions between seats need *absolute* cells, computed with
//! [`TrackLayout::absolute_index`].

use serde::{Deserialize, Serialize};

use crate::core::SpaceId;

/// Track shape for the race variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackLayout {
    /// Cells on the shared circular track.
    pub track_length: u32,

    pub pieces_per_player: u8,

    /// Cells in each finish lane; the last one is home.
    pub finish_length: u32,

    /// Last track progress before the finish lane.
    pub entry_point: u32,

    /// Track offset between consecutive seats' start cells.
    pub seat_spacing: u32,

    /// A piece may only turn into the lane by landing on its first cell.
    pub exact_lane_entry: bool,

    /// Board space for each absolute track cell. Empty when the track has
    /// no board presence (no triggers fire on it).
    pub track_spaces: Vec<SpaceId>,
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self {
            track_length: 28,
            pieces_per_player: 4,
            finish_length: 4,
            entry_point: 27,
            seat_spacing: 7,
            exact_lane_entry: true,
            track_spaces: Vec::new(),
        }
    }
}

impl TrackLayout {
    /// Create the default four-seat layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set track length and entry point (builder pattern).
    #[must_use]
    pub fn with_track(mut self, track_length: u32, entry_point: u32) -> Self {
        assert!(track_length > 0, "Track must have at least one cell");
        self.track_length = track_length;
        self.entry_point = entry_point;
        self
    }

    /// Set the finish lane length (builder pattern).
    #[must_use]
    pub fn with_finish_length(mut self, finish_length: u32) -> Self {
        assert!(finish_length > 0, "Finish lane must have at least one cell");
        self.finish_length = finish_length;
        self
    }

    /// Set pieces per player (builder pattern).
    #[must_use]
    pub fn with_pieces(mut self, pieces: u8) -> Self {
        self.pieces_per_player = pieces;
        self
    }

    /// Set seat spacing (builder pattern).
    #[must_use]
    pub fn with_seat_spacing(mut self, spacing: u32) -> Self {
        self.seat_spacing = spacing;
        self
    }

    /// Allow overshooting the lane entry (builder pattern).
    #[must_use]
    pub fn with_loose_lane_entry(mut self) -> Self {
        self.exact_lane_entry = false;
        self
    }

    /// Name every track cell `track-{index}` (builder pattern).
    #[must_use]
    pub fn with_named_spaces(mut self) -> Self {
        self.track_spaces = (0..self.track_length)
            .map(|i| SpaceId::new(format!("track-{}", i)))
            .collect();
        self
    }

    /// Absolute cell of a seat's start space.
    #[must_use]
    pub fn start_index(&self, seat: usize) -> u32 {
        self.absolute_index(seat, 0)
    }

    /// Absolute cell for a seat's track progress.
    #[must_use]
    pub fn absolute_index(&self, seat: usize, progress: u32) -> u32 {
        let length = u64::from(self.track_length.max(1));
        let offset = (seat as u64) * u64::from(self.seat_spacing) + u64::from(progress);
        (offset % length) as u32
    }

    /// Board space for an absolute cell, if the track has board presence.
    #[must_use]
    pub fn space_at(&self, absolute: u32) -> Option<&SpaceId> {
        self.track_spaces.get(absolute as usize)
    }

    /// Board space for a seat's track progress.
    #[must_use]
    pub fn space_for(&self, seat: usize, progress: u32) -> Option<&SpaceId> {
        self.space_at(self.absolute_index(seat, progress))
    }

    /// Last lane offset; reaching it finishes the piece.
    #[must_use]
    pub fn last_lane_offset(&self) -> u32 {
        self.finish_length.saturating_sub(1)
    }
}
