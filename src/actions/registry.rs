//! Action registry.

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::warn;

use super::kinds;
use super::Action;
use crate::board::RuleSpec;
use crate::core::ConfigError;

/// Builds an action from its payload.
pub type ActionFactory = fn(&Value) -> Result<Box<dyn Action>, ConfigError>;

/// Type string → action factory.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    factories: FxHashMap<String, ActionFactory>,
}

impl ActionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in action types.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(kinds::DISPLAY_PROMPT, kinds::display_prompt);
        registry.register(kinds::MODIFY_STAT, kinds::modify_stat);
        registry.register(kinds::SET_STAT, kinds::set_stat);
        registry.register(kinds::APPLY_EFFECT, kinds::apply_effect);
        registry.register(kinds::EXTRA_TURN, kinds::extra_turn);
        registry.register(kinds::MOVE_TO, kinds::move_to);
        registry.register(kinds::MOVE_STEPS, kinds::move_steps);
        registry
    }

    /// Register a factory. Re-registering a type replaces the old factory.
    pub fn register(&mut self, kind: impl Into<String>, factory: ActionFactory) {
        let kind = kind.into();
        if self.factories.insert(kind.clone(), factory).is_some() {
            warn!(kind = %kind, "action type re-registered");
        }
    }

    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Build the action a spec names.
    pub fn build(&self, spec: &RuleSpec) -> Result<Box<dyn Action>, ConfigError> {
        let factory = self
            .factories
            .get(&spec.kind)
            .ok_or_else(|| ConfigError::UnknownAction(spec.kind.clone()))?;
        factory(&spec.payload)
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&String> = self.factories.keys().collect();
        kinds.sort();
        f.debug_struct("ActionRegistry").field("kinds", &kinds).finish()
    }
}
