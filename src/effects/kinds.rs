//! Built-in effect types.
//!
//! All three count down a number of their owner's turns:
//!
//! | Type                | Timing    | Each enact                         |
//! |---------------------|-----------|------------------------------------|
//! | `SKIP_TURNS`        | TurnStart | marks the turn skipped             |
//! | `REPEAT_TURNS`      | TurnEnd   | forces `extra_turn_earned`         |
//! | `REVERSE_DIRECTION` | TurnEnd   | counts down; flips back at zero    |
//!
//! `REVERSE_DIRECTION` flips the order when applied, so the turn it was applied
//! in does not count down.

use tracing::debug;

use super::{Effect, EffectContext, EffectRecord, EffectTiming};
use crate::core::payload::{require_str, require_u32};
use crate::core::{ConfigError, PlayerId};

pub const SKIP_TURNS: &str = "SKIP_TURNS";
pub const REPEAT_TURNS: &str = "REPEAT_TURNS";
pub const REVERSE_DIRECTION: &str = "REVERSE_DIRECTION";

/// Owner, remaining turns and removal flag, shared by the countdown effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnCounter {
    pub player: PlayerId,
    pub turns: u32,
    pub to_remove: bool,
}

impl TurnCounter {
    fn from_record(type_name: &str, record: &EffectRecord) -> Result<Self, ConfigError> {
        let payload = record.payload();
        Ok(Self {
            player: PlayerId::new(require_str(type_name, &payload, "player")?),
            turns: require_u32(type_name, &payload, "turns")?,
            to_remove: record.to_remove,
        })
    }

    fn to_record(&self, type_name: &str) -> EffectRecord {
        let mut record = EffectRecord::new(type_name)
            .with_arg("player", self.player.as_str())
            .with_arg("turns", self.turns);
        record.to_remove = self.to_remove;
        record
    }

    /// Consume one turn. Returns true if a turn was available.
    fn tick(&mut self) -> bool {
        let had_turn = self.turns > 0;
        self.turns = self.turns.saturating_sub(1);
        if self.turns == 0 {
            self.to_remove = true;
        }
        had_turn
    }
}

/// The owner loses their next `turns` turns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkipTurns(pub TurnCounter);

impl Effect for SkipTurns {
    fn effect_type(&self) -> &str {
        SKIP_TURNS
    }

    fn timing(&self) -> EffectTiming {
        EffectTiming::TurnStart
    }

    fn player(&self) -> &PlayerId {
        &self.0.player
    }

    fn apply(&mut self, _ctx: &mut EffectContext<'_>) {}

    fn enact(&mut self, ctx: &mut EffectContext<'_>) {
        if self.0.tick() {
            ctx.state.skip_current_turn = true;
            debug!(player = %self.0.player, remaining = self.0.turns, "turn skipped by effect");
        }
    }

    fn to_remove(&self) -> bool {
        self.0.to_remove
    }

    fn to_record(&self) -> EffectRecord {
        self.0.to_record(SKIP_TURNS)
    }
}

/// The owner plays `turns` extra turns in a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepeatTurns(pub TurnCounter);

impl Effect for RepeatTurns {
    fn effect_type(&self) -> &str {
        REPEAT_TURNS
    }

    fn timing(&self) -> EffectTiming {
        EffectTiming::TurnEnd
    }

    fn player(&self) -> &PlayerId {
        &self.0.player
    }

    fn apply(&mut self, _ctx: &mut EffectContext<'_>) {}

    fn enact(&mut self, ctx: &mut EffectContext<'_>) {
        if self.0.tick() {
            ctx.state.extra_turn_earned = true;
        }
    }

    fn to_remove(&self) -> bool {
        self.0.to_remove
    }

    fn to_record(&self) -> EffectRecord {
        self.0.to_record(REPEAT_TURNS)
    }
}

/// Turn order runs backwards for `turns` handoffs, counting the one that ends
/// the owner's current turn.
///
/// `fresh` holds the countdown off until the turn the effect was applied in
/// has ended, so `turns: 1` reverses exactly one handoff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReverseDirection {
    pub counter: TurnCounter,
    pub fresh: bool,
}

impl ReverseDirection {
    pub fn new(counter: TurnCounter) -> Self {
        Self { counter, fresh: false }
    }
}

impl Effect for ReverseDirection {
    fn effect_type(&self) -> &str {
        REVERSE_DIRECTION
    }

    fn timing(&self) -> EffectTiming {
        EffectTiming::TurnEnd
    }

    fn player(&self) -> &PlayerId {
        &self.counter.player
    }

    fn apply(&mut self, ctx: &mut EffectContext<'_>) {
        ctx.state.direction = ctx.state.direction.flipped();
        self.fresh = true;
    }

    fn enact(&mut self, ctx: &mut EffectContext<'_>) {
        if self.fresh {
            self.fresh = false;
            return;
        }
        self.counter.tick();
        if self.counter.to_remove {
            ctx.state.direction = ctx.state.direction.flipped();
            debug!(player = %self.counter.player, "turn order restored");
        }
    }

    fn to_remove(&self) -> bool {
        self.counter.to_remove
    }

    fn to_record(&self) -> EffectRecord {
        let record = self.counter.to_record(REVERSE_DIRECTION);
        if self.fresh {
            record.with_arg("fresh", true)
        } else {
            record
        }
    }
}

pub(super) fn skip_turns(record: &EffectRecord) -> Result<Box<dyn Effect>, ConfigError> {
    Ok(Box::new(SkipTurns(TurnCounter::from_record(SKIP_TURNS, record)?)))
}

pub(super) fn repeat_turns(record: &EffectRecord) -> Result<Box<dyn Effect>, ConfigError> {
    Ok(Box::new(RepeatTurns(TurnCounter::from_record(REPEAT_TURNS, record)?)))
}

pub(super) fn reverse_direction(record: &EffectRecord) -> Result<Box<dyn Effect>, ConfigError> {
    let fresh = record.arg("fresh").and_then(serde_json::Value::as_bool).unwrap_or(false);
    Ok(Box::new(ReverseDirection {
        counter: TurnCounter::from_record(REVERSE_DIRECTION, record)?,
        fresh,
    }))
}
