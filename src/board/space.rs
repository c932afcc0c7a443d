//! Spaces and the rule records boards attach to them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::SpaceId;

/// A reference to a registered trigger or action type plus its payload.
///
/// `kind` is resolved against the registries at evaluation time, so a board
/// may name types that a plugin registers later.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl RuleSpec {
    /// Create a spec with no payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
        }
    }

    /// Attach a payload (builder pattern).
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

/// `when` fires `action`. Higher priority runs first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerRecord {
    pub when: RuleSpec,
    pub action: RuleSpec,
    #[serde(default)]
    pub priority: i32,
}

impl TriggerRecord {
    pub fn new(when: RuleSpec, action: RuleSpec) -> Self {
        Self {
            when,
            action,
            priority: 0,
        }
    }

    /// Set the priority (builder pattern).
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// An outgoing edge. Bidirectional edges are also walkable from `target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub target: SpaceId,
    #[serde(default)]
    pub bidirectional: bool,
}

/// A board space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub triggers: Vec<TriggerRecord>,
    /// Reaching this space wins single-token games.
    #[serde(default)]
    pub finish: bool,
}

impl Space {
    /// Create an unconnected space.
    pub fn new(id: impl Into<SpaceId>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            connections: Vec::new(),
            triggers: Vec::new(),
            finish: false,
        }
    }

    /// Add a one-way connection (builder pattern).
    #[must_use]
    pub fn connect(mut self, target: impl Into<SpaceId>) -> Self {
        self.connections.push(Connection {
            target: target.into(),
            bidirectional: false,
        });
        self
    }

    /// Add a two-way connection (builder pattern).
    #[must_use]
    pub fn connect_both(mut self, target: impl Into<SpaceId>) -> Self {
        self.connections.push(Connection {
            target: target.into(),
            bidirectional: true,
        });
        self
    }

    /// Attach a trigger record (builder pattern).
    #[must_use]
    pub fn with_trigger(mut self, record: TriggerRecord) -> Self {
        self.triggers.push(record);
        self
    }

    /// Mark as a finish space (builder pattern).
    #[must_use]
    pub fn as_finish(mut self) -> Self {
        self.finish = true;
        self
    }

    /// Trigger records in evaluation order: priority descending, then
    /// declaration order.
    #[must_use]
    pub fn ordered_triggers(&self) -> Vec<&TriggerRecord> {
        let mut records: Vec<&TriggerRecord> = self.triggers.iter().collect();
        // sort_by is stable
        records.sort_by(|a, b| b.priority.cmp(&a.priority));
        records
    }
}
