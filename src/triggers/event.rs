//! Movement events.
//!
//! A single move produces a sequence of space events. The engine commits
//! the move to state first, then hands the whole sequence to the pipeline,
//! which evaluates each space's triggers in event order.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, SpaceId};

/// What happened at a space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceEventKind {
    /// The player left the space at the start of a move.
    Exited,
    /// The player moved through the space without stopping.
    Passed,
    /// The player's move ended on the space.
    Entered,
}

/// A player's movement relative to one space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceEvent {
    pub kind: SpaceEventKind,
    pub space: SpaceId,
    pub player: PlayerId,
}

impl SpaceEvent {
    pub fn new(kind: SpaceEventKind, space: SpaceId, player: PlayerId) -> Self {
        Self { kind, space, player }
    }

    /// Events for one move, in evaluation order: exit the origin, pass
    /// each intermediate space in path order, enter the destination.
    ///
    /// `origin` is `None` when the player comes from off the board.
    pub fn for_move(player: &PlayerId, origin: Option<&SpaceId>, passed: &[SpaceId], destination: &SpaceId) -> Vec<SpaceEvent> {
        let mut events = Vec::with_capacity(passed.len() + 2);
        if let Some(origin) = origin {
            events.push(Self::new(SpaceEventKind::Exited, origin.clone(), player.clone()));
        }
        for space in passed {
            events.push(Self::new(SpaceEventKind::Passed, space.clone(), player.clone()));
        }
        events.push(Self::new(SpaceEventKind::Entered, destination.clone(), player.clone()));
        events
    }
}
