//! Board definitions: spaces, connections, and the rule records attached to them.
//!
//! A board arrives as JSON that has already passed schema validation
//! elsewhere. The engine only needs three things from it:
//!
//! - the space graph, for single-token movement
//! - each space's trigger records, for the event pipeline
//! - an optional [`TrackLayout`], for the race variant
//!
//! ```
//! use rust_board::board::Board;
//!
//! let board = Board::from_json(r#"{
//!     "name": "line",
//!     "startSpace": "a",
//!     "spaces": [
//!         {"id": "a", "connections": [{"target": "b"}]},
//!         {"id": "b", "finish": true}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(board.routes(&"a".into(), 1)[0].destination().as_str(), "b");
//! ```

pub mod space;
pub mod track;

pub use space::{Connection, RuleSpec, Space, TriggerRecord};
pub use track::TrackLayout;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{GameSettings, SpaceId};

/// A walk of exactly `n` steps. `spaces` holds every space stepped on,
/// ending with the destination; the origin is not included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub spaces: Vec<SpaceId>,
}

impl Route {
    /// Where the walk ends.
    ///
    /// Routes are only built with at least one step.
    #[must_use]
    pub fn destination(&self) -> &SpaceId {
        &self.spaces[self.spaces.len() - 1]
    }

    /// Spaces passed through on the way (destination excluded).
    #[must_use]
    pub fn passed(&self) -> &[SpaceId] {
        &self.spaces[..self.spaces.len() - 1]
    }
}

/// A loaded board.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub name: String,
    #[serde(default)]
    pub spaces: Vec<Space>,
    #[serde(default)]
    pub start_space: Option<SpaceId>,
    /// Overrides the session settings while this board is loaded.
    #[serde(default)]
    pub settings: Option<GameSettings>,
    #[serde(default)]
    pub track: Option<TrackLayout>,
}

impl Board {
    /// Create an empty board.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a board definition.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build a race board whose track cells exist as board spaces, linked in
    /// a ring, so that board triggers can be attached to them.
    #[must_use]
    pub fn race(name: impl Into<String>, layout: TrackLayout) -> Self {
        let layout = if layout.track_spaces.is_empty() {
            layout.with_named_spaces()
        } else {
            layout
        };
        let count = layout.track_spaces.len();
        let spaces = layout
            .track_spaces
            .iter()
            .enumerate()
            .map(|(i, id)| Space::new(id.clone()).connect(layout.track_spaces[(i + 1) % count].clone()))
            .collect();

        Self {
            name: name.into(),
            spaces,
            start_space: layout.track_spaces.first().cloned(),
            settings: None,
            track: Some(layout),
        }
    }

    /// Add a space (builder pattern).
    #[must_use]
    pub fn with_space(mut self, space: Space) -> Self {
        self.spaces.push(space);
        self
    }

    /// Set the start space (builder pattern).
    #[must_use]
    pub fn with_start(mut self, start: impl Into<SpaceId>) -> Self {
        self.start_space = Some(start.into());
        self
    }

    /// Override the session settings (builder pattern).
    #[must_use]
    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    // === Lookup ===

    /// Look up a space.
    #[must_use]
    pub fn space(&self, id: &SpaceId) -> Option<&Space> {
        self.spaces.iter().find(|s| &s.id == id)
    }

    /// Look up a space mutably.
    pub fn space_mut(&mut self, id: &SpaceId) -> Option<&mut Space> {
        self.spaces.iter_mut().find(|s| &s.id == id)
    }

    // === Graph ===

    /// Spaces reachable in one step from `id`: its own connections, then
    /// any bidirectional connection pointing at it.
    #[must_use]
    pub fn neighbours(&self, id: &SpaceId) -> SmallVec<[SpaceId; 4]> {
        let mut out: SmallVec<[SpaceId; 4]> = SmallVec::new();
        if let Some(space) = self.space(id) {
            for conn in &space.connections {
                if !out.contains(&conn.target) {
                    out.push(conn.target.clone());
                }
            }
        }
        for space in &self.spaces {
            let back = space
                .connections
                .iter()
                .any(|c| c.bidirectional && &c.target == id);
            if back && !out.contains(&space.id) {
                out.push(space.id.clone());
            }
        }
        out
    }

    /// Every walk of exactly `steps` steps from `from` that never revisits
    /// a space. Walks that dead-end early are dropped.
    #[must_use]
    pub fn routes(&self, from: &SpaceId, steps: u32) -> Vec<Route> {
        let mut routes = Vec::new();
        if steps == 0 {
            return routes;
        }
        let mut path = Vec::with_capacity(steps as usize);
        self.walk(from, from, steps, &mut path, &mut routes);
        routes
    }

    fn walk(&self, origin: &SpaceId, at: &SpaceId, remaining: u32, path: &mut Vec<SpaceId>, out: &mut Vec<Route>) {
        if remaining == 0 {
            out.push(Route { spaces: path.clone() });
            return;
        }
        for next in self.neighbours(at) {
            if &next == origin || path.contains(&next) {
                continue;
            }
            path.push(next.clone());
            self.walk(origin, &next, remaining - 1, path, out);
            path.pop();
        }
    }

    /// Distinct destinations exactly `steps` away, each with the first
    /// route found to it.
    #[must_use]
    pub fn destinations(&self, from: &SpaceId, steps: u32) -> Vec<Route> {
        let mut unique: Vec<Route> = Vec::new();
        for route in self.routes(from, steps) {
            if !unique.iter().any(|r| r.destination() == route.destination()) {
                unique.push(route);
            }
        }
        unique
    }
}
