//! Player effects: stateful, time-limited modifiers.
//!
//! Each effect moves through `Created → Applied → Enacting* → Removed`:
//! - `apply` runs exactly once, when the effect is attached to a player
//! - `enact` runs once per qualifying phase tick while its owner is current
//! - setting `to_remove` lets the owner purge it on the next sweep
//!
//! ## Key Components
//!
//! - [`Effect`]: the lifecycle capability
//! - [`EffectRecord`]: the serialized form players actually store
//! - [`EffectRegistry`]: type string → factory
//! - [`EffectManager`]: attach, enact and sweep against `GameState`
//!
//! ## Replication
//!
//! Effects live on players as records, so a snapshot carries their exact
//! counters. The manager rebuilds each effect from its record for every
//! lifecycle call and writes the record back afterwards; a deserialized
//! effect therefore behaves exactly like the original.

pub mod kinds;
mod lifecycle;
mod record;
mod registry;

pub use lifecycle::EffectManager;
pub use record::{EffectArg, EffectRecord};
pub use registry::{EffectFactory, EffectRegistry};

use serde::{Deserialize, Serialize};

use crate::core::{GameState, PlayerId};
use crate::rules::EngineEvent;

/// Phase boundary at which an effect is enacted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTiming {
    /// Before the owner acts (race: BeginTurn, path: Rolling).
    TurnStart,
    /// After the owner's turn resolves (race: EndTurn, path: ChangeTurn).
    TurnEnd,
}

/// Mutable view an effect runs against.
pub struct EffectContext<'a> {
    pub state: &'a mut GameState,
    pub events: &'a mut Vec<EngineEvent>,
}

impl<'a> EffectContext<'a> {
    pub fn new(state: &'a mut GameState, events: &'a mut Vec<EngineEvent>) -> Self {
        Self { state, events }
    }
}

/// Lifecycle capability for player effects.
pub trait Effect {
    /// Registry type tag.
    fn effect_type(&self) -> &str;

    /// When the owning engine enacts this effect.
    fn timing(&self) -> EffectTiming;

    /// Player the effect is bound to.
    fn player(&self) -> &PlayerId;

    /// One-time setup when attached.
    fn apply(&mut self, ctx: &mut EffectContext<'_>);

    /// One qualifying tick. Sets `to_remove` once exhausted.
    fn enact(&mut self, ctx: &mut EffectContext<'_>);

    fn to_remove(&self) -> bool;

    /// Serialized form, including current counters.
    fn to_record(&self) -> EffectRecord;
}
