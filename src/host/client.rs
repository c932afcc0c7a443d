//! Client-side read-only copy of the host's state.

use serde_json::{json, Value};
use tracing::debug;

use super::message::{HostMessage, IntentMessage};
use crate::core::{GameState, IntentKind, PlayerId, SnapshotError};
use crate::rules::EngineEvent;

/// What a peer holds: the last snapshot it received, nothing more.
#[derive(Clone, Debug)]
pub struct ClientMirror {
    player_id: PlayerId,
    state: Option<GameState>,
    last_seq: Option<u64>,
    events: Vec<EngineEvent>,
}

impl ClientMirror {
    pub fn new(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
            state: None,
            last_seq: None,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn last_seq(&self) -> Option<u64> {
        self.last_seq
    }

    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.is_current(&self.player_id))
    }

    /// Apply a host message. Snapshots older than the current one are
    /// dropped. Returns whether the state changed.
    pub fn apply(&mut self, message: HostMessage) -> bool {
        match message {
            HostMessage::Snapshot { seq, state, events } => {
                if self.last_seq.is_some_and(|last| seq <= last) {
                    debug!(seq, last = ?self.last_seq, "stale snapshot ignored");
                    return false;
                }
                self.state = Some(state);
                self.last_seq = Some(seq);
                self.events.extend(events);
                true
            }
        }
    }

    pub fn apply_json(&mut self, json: &str) -> Result<bool, SnapshotError> {
        Ok(self.apply(HostMessage::from_json(json)?))
    }

    /// Events received since the last drain.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // === Outbound ===

    #[must_use]
    pub fn intent(&self, kind: IntentKind, data: Value) -> IntentMessage {
        IntentMessage::new(self.player_id.clone(), &kind, data)
    }

    /// Roll request; the host rolls.
    #[must_use]
    pub fn roll(&self) -> IntentMessage {
        self.intent(IntentKind::RollDice, Value::Null)
    }

    /// Roll request carrying a value rolled on the client.
    #[must_use]
    pub fn roll_value(&self, value: u32) -> IntentMessage {
        self.intent(IntentKind::RollDice, json!({ "value": value }))
    }

    #[must_use]
    pub fn choose(&self, choice: &str) -> IntentMessage {
        self.intent(IntentKind::ResolveSpecialRollChoice, json!({ "choice": choice }))
    }

    #[must_use]
    pub fn select_piece(&self, piece: u8) -> IntentMessage {
        self.intent(IntentKind::SelectPieceDestination, json!({ "piece": piece }))
    }

    #[must_use]
    pub fn select_space(&self, space: &str) -> IntentMessage {
        self.intent(IntentKind::SelectPieceDestination, json!({ "space": space }))
    }

    #[must_use]
    pub fn acknowledge(&self, ticket: u64) -> IntentMessage {
        self.intent(IntentKind::AcknowledgePrompt, json!({ "ticket": ticket }))
    }
}
