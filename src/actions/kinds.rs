//! Built-in action types.

use serde_json::Value;
use tracing::{debug, warn};

use super::{Action, ActionContext, ActionStatus, Prompt};
use crate::core::payload::{require_i64, require_str, require_u32};
use crate::core::{ActionError, ConfigError, SpaceId};
use crate::effects::{EffectContext, EffectManager, EffectRecord};
use crate::rules::EngineEvent;

pub const DISPLAY_PROMPT: &str = "DISPLAY_PROMPT";
pub const MODIFY_STAT: &str = "MODIFY_STAT";
pub const SET_STAT: &str = "SET_STAT";
pub const APPLY_EFFECT: &str = "APPLY_EFFECT";
pub const EXTRA_TURN: &str = "EXTRA_TURN";
pub const MOVE_TO: &str = "MOVE_TO";
pub const MOVE_STEPS: &str = "MOVE_STEPS";

/// Show a message and wait for the acting player to dismiss it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayPrompt {
    pub message: String,
}

impl Action for DisplayPrompt {
    fn execute(&self, _ctx: &mut ActionContext<'_>) -> Result<ActionStatus, ActionError> {
        Ok(ActionStatus::AwaitingAcknowledgement(Prompt::new(self.message.clone())))
    }
}

/// Add `delta` to a stat of the acting player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifyStat {
    pub stat: String,
    pub delta: i64,
}

impl Action for ModifyStat {
    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<ActionStatus, ActionError> {
        let player = ctx.acting_player_mut()?;
        player.modify_stat(&self.stat, self.delta);
        let value = player.stat(&self.stat, 0);
        let id = player.player_id.clone();
        ctx.emit(EngineEvent::StatChanged {
            player: id,
            stat: self.stat.clone(),
            value,
        });
        Ok(ActionStatus::Completed)
    }
}

/// Overwrite a stat of the acting player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetStat {
    pub stat: String,
    pub value: i64,
}

impl Action for SetStat {
    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<ActionStatus, ActionError> {
        let player = ctx.acting_player_mut()?;
        player.set_stat(self.stat.clone(), self.value);
        let id = player.player_id.clone();
        ctx.emit(EngineEvent::StatChanged {
            player: id,
            stat: self.stat.clone(),
            value: self.value,
        });
        Ok(ActionStatus::Completed)
    }
}

/// Attach an effect to the acting player.
#[derive(Clone, Debug, PartialEq)]
pub struct ApplyEffect {
    pub record: EffectRecord,
}

impl Action for ApplyEffect {
    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<ActionStatus, ActionError> {
        let mut effect_ctx = EffectContext::new(ctx.state, ctx.events);
        EffectManager::attach(ctx.effects, &mut effect_ctx, ctx.player, self.record.clone())?;
        Ok(ActionStatus::Completed)
    }
}

/// The current player goes again after this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtraTurn;

impl Action for ExtraTurn {
    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<ActionStatus, ActionError> {
        ctx.state.extra_turn_earned = true;
        let player = ctx.player.clone();
        ctx.emit(EngineEvent::ExtraTurnGranted { player });
        Ok(ActionStatus::Completed)
    }
}

/// Teleport the acting player's token. Does not fire the target's triggers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveTo {
    pub space: SpaceId,
}

impl Action for MoveTo {
    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<ActionStatus, ActionError> {
        if ctx.state.board.space(&self.space).is_none() {
            return Err(ActionError::SpaceNotFound(self.space.clone()));
        }
        let player = ctx.acting_player_mut()?;
        let from = player.position.replace(self.space.clone());
        let id = player.player_id.clone();
        ctx.emit(EngineEvent::PlayerMoved {
            player: id,
            from,
            to: self.space.clone(),
        });
        Ok(ActionStatus::Completed)
    }
}

/// Walk the acting player's token forward along each space's first exit.
/// Stops early at a dead end. Does not fire triggers on the way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveSteps {
    pub steps: u32,
}

impl Action for MoveSteps {
    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<ActionStatus, ActionError> {
        let Some(start) = ctx.acting_player_mut()?.position.clone() else {
            warn!(player = %ctx.player, "MOVE_STEPS on a player with no token");
            return Ok(ActionStatus::Completed);
        };

        let mut at = start.clone();
        for _ in 0..self.steps {
            match ctx.state.board.neighbours(&at).first() {
                Some(next) => at = next.clone(),
                None => break,
            }
        }
        if at == start {
            debug!(player = %ctx.player, "MOVE_STEPS went nowhere");
            return Ok(ActionStatus::Completed);
        }

        ctx.acting_player_mut()?.position = Some(at.clone());
        let player = ctx.player.clone();
        ctx.emit(EngineEvent::PlayerMoved {
            player,
            from: Some(start),
            to: at,
        });
        Ok(ActionStatus::Completed)
    }
}

pub(super) fn display_prompt(payload: &Value) -> Result<Box<dyn Action>, ConfigError> {
    Ok(Box::new(DisplayPrompt {
        message: require_str(DISPLAY_PROMPT, payload, "message")?.to_string(),
    }))
}

pub(super) fn modify_stat(payload: &Value) -> Result<Box<dyn Action>, ConfigError> {
    Ok(Box::new(ModifyStat {
        stat: require_str(MODIFY_STAT, payload, "stat")?.to_string(),
        delta: require_i64(MODIFY_STAT, payload, "delta")?,
    }))
}

pub(super) fn set_stat(payload: &Value) -> Result<Box<dyn Action>, ConfigError> {
    Ok(Box::new(SetStat {
        stat: require_str(SET_STAT, payload, "stat")?.to_string(),
        value: require_i64(SET_STAT, payload, "value")?,
    }))
}

pub(super) fn apply_effect(payload: &Value) -> Result<Box<dyn Action>, ConfigError> {
    let kind = require_str(APPLY_EFFECT, payload, "type")?;
    let args = payload.get("args").unwrap_or(&Value::Null);
    if !(args.is_object() || args.is_null()) {
        return Err(ConfigError::invalid(APPLY_EFFECT, "'args' must be an object"));
    }
    Ok(Box::new(ApplyEffect {
        record: EffectRecord::from_payload(kind, args),
    }))
}

pub(super) fn extra_turn(_: &Value) -> Result<Box<dyn Action>, ConfigError> {
    Ok(Box::new(ExtraTurn))
}

pub(super) fn move_to(payload: &Value) -> Result<Box<dyn Action>, ConfigError> {
    Ok(Box::new(MoveTo {
        space: SpaceId::new(require_str(MOVE_TO, payload, "space")?),
    }))
}

pub(super) fn move_steps(payload: &Value) -> Result<Box<dyn Action>, ConfigError> {
    Ok(Box::new(MoveSteps {
        steps: require_u32(MOVE_STEPS, payload, "steps")?,
    }))
}
