//! Built-in trigger types.

use serde_json::Value;

use super::event::SpaceEventKind;
use super::{Trigger, TriggerContext};
use crate::core::payload::{require_i64, require_str, require_u32};
use crate::core::ConfigError;

pub const ON_ENTER: &str = "ON_ENTER";
pub const ON_PASS: &str = "ON_PASS";
pub const ON_EXIT: &str = "ON_EXIT";
pub const ROLL_EQUALS: &str = "ROLL_EQUALS";
pub const STAT_AT_LEAST: &str = "STAT_AT_LEAST";

/// Fires unconditionally for one event kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OnEvent(pub SpaceEventKind);

impl Trigger for OnEvent {
    fn listens_for(&self) -> SpaceEventKind {
        self.0
    }

    fn is_triggered(&self, _ctx: &TriggerContext<'_>) -> bool {
        true
    }
}

/// Fires on entering when the roll being resolved equals `value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollEquals {
    pub value: u32,
}

impl Trigger for RollEquals {
    fn listens_for(&self) -> SpaceEventKind {
        SpaceEventKind::Entered
    }

    fn is_triggered(&self, ctx: &TriggerContext<'_>) -> bool {
        ctx.state.last_roll == Some(self.value)
    }
}

/// Fires on entering when the player's `stat` is at least `value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatAtLeast {
    pub stat: String,
    pub value: i64,
}

impl Trigger for StatAtLeast {
    fn listens_for(&self) -> SpaceEventKind {
        SpaceEventKind::Entered
    }

    fn is_triggered(&self, ctx: &TriggerContext<'_>) -> bool {
        ctx.state
            .player(ctx.player)
            .is_some_and(|p| p.stat(&self.stat, 0) >= self.value)
    }
}

pub(super) fn on_enter(_: &Value) -> Result<Box<dyn Trigger>, ConfigError> {
    Ok(Box::new(OnEvent(SpaceEventKind::Entered)))
}

pub(super) fn on_pass(_: &Value) -> Result<Box<dyn Trigger>, ConfigError> {
    Ok(Box::new(OnEvent(SpaceEventKind::Passed)))
}

pub(super) fn on_exit(_: &Value) -> Result<Box<dyn Trigger>, ConfigError> {
    Ok(Box::new(OnEvent(SpaceEventKind::Exited)))
}

pub(super) fn roll_equals(payload: &Value) -> Result<Box<dyn Trigger>, ConfigError> {
    let value = require_u32(ROLL_EQUALS, payload, "value")?;
    Ok(Box::new(RollEquals { value }))
}

pub(super) fn stat_at_least(payload: &Value) -> Result<Box<dyn Trigger>, ConfigError> {
    Ok(Box::new(StatAtLeast {
        stat: require_str(STAT_AT_LEAST, payload, "stat")?.to_string(),
        value: require_i64(STAT_AT_LEAST, payload, "value")?,
    }))
}
