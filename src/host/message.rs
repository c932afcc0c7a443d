//! Wire messages between clients and the host.
//!
//! Clients send [`IntentMessage`]s and get an [`IntentResult`] back.
//! Accepted intents produce a [`HostMessage::Snapshot`] broadcast to every
//! peer; clients replace their state with it wholesale.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{EngineError, GameState, Intent, IntentKind, PlayerId, SnapshotError};
use crate::rules::EngineEvent;

/// A player's request, as sent by a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentMessage {
    pub player_id: PlayerId,
    pub action_type: String,
    #[serde(default)]
    pub action_data: Value,
}

impl IntentMessage {
    pub fn new(player_id: impl Into<PlayerId>, kind: &IntentKind, action_data: Value) -> Self {
        Self {
            player_id: player_id.into(),
            action_type: kind.as_str().to_string(),
            action_data,
        }
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::MalformedMessage(e.to_string()))
    }

    /// The typed intent this message carries.
    #[must_use]
    pub fn intent(&self) -> Intent {
        Intent::new(IntentKind::parse(&self.action_type)).with_data(self.action_data.clone())
    }
}

/// Reply to an [`IntentMessage`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntentResult {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn rejected(error: &EngineError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

impl From<Result<(), EngineError>> for IntentResult {
    fn from(result: Result<(), EngineError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(err) => Self::rejected(&err),
        }
    }
}

/// Host → all peers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    /// Full canonical state after an accepted mutation, with the events
    /// that produced it.
    Snapshot {
        seq: u64,
        state: GameState,
        events: Vec<EngineEvent>,
    },
}

impl HostMessage {
    #[must_use]
    pub fn seq(&self) -> u64 {
        match self {
            HostMessage::Snapshot { seq, .. } => *seq,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}
