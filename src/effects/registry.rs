//! Effect registry.

use rustc_hash::FxHashMap;
use tracing::warn;

use super::kinds;
use super::{Effect, EffectRecord};
use crate::core::ConfigError;

/// Rebuilds a live effect from its record.
pub type EffectFactory = fn(&EffectRecord) -> Result<Box<dyn Effect>, ConfigError>;

/// Type string → effect factory.
#[derive(Clone, Default)]
pub struct EffectRegistry {
    factories: FxHashMap<String, EffectFactory>,
}

impl EffectRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in effect types.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(kinds::SKIP_TURNS, kinds::skip_turns);
        registry.register(kinds::REPEAT_TURNS, kinds::repeat_turns);
        registry.register(kinds::REVERSE_DIRECTION, kinds::reverse_direction);
        registry
    }

    /// Register a factory. Re-registering a type replaces the old factory.
    pub fn register(&mut self, kind: impl Into<String>, factory: EffectFactory) {
        let kind = kind.into();
        if self.factories.insert(kind.clone(), factory).is_some() {
            warn!(kind = %kind, "effect type re-registered");
        }
    }

    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Rebuild the effect a record describes.
    pub fn build(&self, record: &EffectRecord) -> Result<Box<dyn Effect>, ConfigError> {
        let factory = self
            .factories
            .get(&record.kind)
            .ok_or_else(|| ConfigError::UnknownEffect(record.kind.clone()))?;
        factory(record)
    }
}

impl std::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&String> = self.factories.keys().collect();
        kinds.sort();
        f.debug_struct("EffectRegistry").field("kinds", &kinds).finish()
    }
}
