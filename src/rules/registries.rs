//! The three extension registries, bundled.

use crate::actions::ActionRegistry;
use crate::effects::EffectRegistry;
use crate::triggers::TriggerRegistry;

/// Trigger, action and effect registries shared by an engine.
///
/// Engines own one and hand out `&mut` access so plugins can register
/// types after a board loads.
#[derive(Clone, Debug, Default)]
pub struct Registries {
    pub triggers: TriggerRegistry,
    pub actions: ActionRegistry,
    pub effects: EffectRegistry,
}

impl Registries {
    /// Empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registries holding every built-in type.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self {
            triggers: TriggerRegistry::with_builtins(),
            actions: ActionRegistry::with_builtins(),
            effects: EffectRegistry::with_builtins(),
        }
    }
}
