//! Board triggers: predicates that decide whether a space's action fires.
//!
//! Boards reference triggers by type string. A trigger is a pure
//! predicate over the game state, the space, and the acting player; it
//! never mutates anything.
//!
//! ## Key Components
//!
//! - [`SpaceEvent`]: a movement outcome at one space (exited, passed, entered)
//! - [`Trigger`]: the predicate capability
//! - [`TriggerRegistry`]: type string → factory
//!
//! ## Evaluation point
//!
//! Every trigger kind declares the one [`SpaceEventKind`] it listens for.
//! All events are evaluated after the move has been committed to state, so
//! a trigger always sees where the player actually is.
//!
//! ```
//! use rust_board::board::RuleSpec;
//! use rust_board::triggers::{SpaceEventKind, TriggerRegistry};
//!
//! let registry = TriggerRegistry::with_builtins();
//! let trigger = registry.build(&RuleSpec::new("ON_PASS")).unwrap();
//! assert_eq!(trigger.listens_for(), SpaceEventKind::Passed);
//! ```

mod event;
pub mod kinds;
mod registry;

pub use event::{SpaceEvent, SpaceEventKind};
pub use registry::{TriggerFactory, TriggerRegistry};

use crate::board::Space;
use crate::core::{GameState, PlayerId};

/// What a trigger may look at.
#[derive(Clone, Copy, Debug)]
pub struct TriggerContext<'a> {
    pub state: &'a GameState,
    pub space: &'a Space,
    pub player: &'a PlayerId,
    pub event: &'a SpaceEvent,
}

impl<'a> TriggerContext<'a> {
    pub fn new(state: &'a GameState, space: &'a Space, player: &'a PlayerId, event: &'a SpaceEvent) -> Self {
        Self {
            state,
            space,
            player,
            event,
        }
    }
}

/// Predicate capability for board triggers.
pub trait Trigger {
    /// The event kind this trigger is evaluated for.
    fn listens_for(&self) -> SpaceEventKind;

    /// Should the paired action run?
    fn is_triggered(&self, ctx: &TriggerContext<'_>) -> bool;
}
