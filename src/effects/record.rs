//! Serialized effect form.
//!
//! Players store effects as records: a type tag plus ordered constructor
//! arguments. The record is the source of truth; the live effect is rebuilt
//! from it through the registry for every lifecycle call and written back
//! afterwards, so a snapshot always carries the current counters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One constructor argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectArg {
    pub key: String,
    pub value: Value,
}

/// `{type, args, toRemove}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub args: Vec<EffectArg>,
    #[serde(default)]
    pub to_remove: bool,
}

impl EffectRecord {
    /// Create a record with no arguments.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            args: Vec::new(),
            to_remove: false,
        }
    }

    /// Set an argument, replacing any earlier value for the key
    /// (builder pattern).
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_arg(key, value);
        self
    }

    /// Build a record from an object payload, as board actions supply it.
    /// Non-object payloads produce no arguments.
    pub fn from_payload(kind: impl Into<String>, payload: &Value) -> Self {
        let args = payload
            .as_object()
            .map(|map| {
                map.iter()
                    .map(|(k, v)| EffectArg {
                        key: k.clone(),
                        value: v.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            kind: kind.into(),
            args,
            to_remove: false,
        }
    }

    /// Set an argument in place, keeping its position if it exists.
    pub fn set_arg(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.args.iter_mut().find(|a| a.key == key) {
            Some(arg) => arg.value = value,
            None => self.args.push(EffectArg { key, value }),
        }
    }

    /// Look up an argument.
    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.iter().find(|a| a.key == key).map(|a| &a.value)
    }

    /// Arguments as a JSON object, for the payload readers.
    #[must_use]
    pub fn payload(&self) -> Value {
        let map: Map<String, Value> = self
            .args
            .iter()
            .map(|a| (a.key.clone(), a.value.clone()))
            .collect();
        Value::Object(map)
    }
}
