//! Board actions: the unit of mutation a trigger fires.
//!
//! An action runs against an [`ActionContext`] and either completes on the
//! spot or asks for the acting player's acknowledgement. The second case is
//! how prompts work: the pipeline parks itself on a pending action and
//! nothing advances until the host receives the matching acknowledgement.
//!
//! ## Built-in types
//!
//! | Type             | Payload               |
//! |------------------|-----------------------|
//! | `DISPLAY_PROMPT` | `{message}`           |
//! | `MODIFY_STAT`    | `{stat, delta}`       |
//! | `SET_STAT`       | `{stat, value}`       |
//! | `APPLY_EFFECT`   | `{type, args}`        |
//! | `EXTRA_TURN`     | none                  |
//! | `MOVE_TO`        | `{space}`             |
//! | `MOVE_STEPS`     | `{steps}`             |

pub mod kinds;
mod registry;

pub use registry::{ActionFactory, ActionRegistry};

use serde::{Deserialize, Serialize};

use crate::core::{ActionError, GameState, Player, PlayerId, SpaceId};
use crate::effects::EffectRegistry;
use crate::rules::EngineEvent;

/// A message the acting player must acknowledge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub message: String,
}

impl Prompt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of running an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionStatus {
    Completed,
    /// Suspend until the acting player acknowledges the prompt.
    AwaitingAcknowledgement(Prompt),
}

/// What an action may touch.
pub struct ActionContext<'a> {
    pub state: &'a mut GameState,
    pub effects: &'a EffectRegistry,
    /// The player whose movement fired the trigger.
    pub player: &'a PlayerId,
    /// The space whose trigger fired.
    pub space: &'a SpaceId,
    pub events: &'a mut Vec<EngineEvent>,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        state: &'a mut GameState,
        effects: &'a EffectRegistry,
        player: &'a PlayerId,
        space: &'a SpaceId,
        events: &'a mut Vec<EngineEvent>,
    ) -> Self {
        Self {
            state,
            effects,
            player,
            space,
            events,
        }
    }

    /// The acting player.
    pub fn acting_player_mut(&mut self) -> Result<&mut Player, ActionError> {
        let id = self.player;
        self.state
            .player_mut(id)
            .ok_or_else(|| ActionError::PlayerNotFound(id.clone()))
    }

    pub fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }
}

/// Mutation capability for board actions.
pub trait Action {
    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<ActionStatus, ActionError>;
}
