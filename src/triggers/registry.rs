//! Trigger registry.
//!
//! Maps a board's trigger type string to a factory. Registration is open:
//! plugins may add types at any time before a board references them, since
//! lookups happen when a trigger is evaluated rather than when a board loads.

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::warn;

use super::kinds;
use super::Trigger;
use crate::board::RuleSpec;
use crate::core::ConfigError;

/// Builds a trigger from its payload.
pub type TriggerFactory = fn(&Value) -> Result<Box<dyn Trigger>, ConfigError>;

/// Type string → trigger factory.
#[derive(Clone, Default)]
pub struct TriggerRegistry {
    factories: FxHashMap<String, TriggerFactory>,
}

impl TriggerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in trigger types.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(kinds::ON_ENTER, kinds::on_enter);
        registry.register(kinds::ON_PASS, kinds::on_pass);
        registry.register(kinds::ON_EXIT, kinds::on_exit);
        registry.register(kinds::ROLL_EQUALS, kinds::roll_equals);
        registry.register(kinds::STAT_AT_LEAST, kinds::stat_at_least);
        registry
    }

    /// Register a factory. Re-registering a type replaces the old factory.
    pub fn register(&mut self, kind: impl Into<String>, factory: TriggerFactory) {
        let kind = kind.into();
        if self.factories.insert(kind.clone(), factory).is_some() {
            warn!(kind = %kind, "trigger type re-registered");
        }
    }

    /// Is `kind` registered?
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Build the trigger a spec names.
    pub fn build(&self, spec: &RuleSpec) -> Result<Box<dyn Trigger>, ConfigError> {
        let factory = self
            .factories
            .get(&spec.kind)
            .ok_or_else(|| ConfigError::UnknownTrigger(spec.kind.clone()))?;
        factory(&spec.payload)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Is the registry empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for TriggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&String> = self.factories.keys().collect();
        kinds.sort();
        f.debug_struct("TriggerRegistry").field("kinds", &kinds).finish()
    }
}
