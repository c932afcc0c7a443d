//! Player intents: the only way a client can ask for a state change.
//!
//! An intent is an action type string plus free-form JSON data. The base
//! types every engine understands are listed in [`IntentKind`]; engines
//! may accept further types through [`IntentKind::Custom`].
//!
//! ```
//! use rust_board::core::{Intent, IntentKind};
//!
//! let roll = Intent::new(IntentKind::RollDice).with_data(serde_json::json!({"value": 4}));
//! assert_eq!(roll.kind.as_str(), "roll-dice");
//! assert_eq!(roll.u32_field("value"), Some(4));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::PlayerId;

/// Intent discriminant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IntentKind {
    RollDice,
    ResolveSpecialRollChoice,
    SelectPieceDestination,
    AcknowledgePrompt,
    SkipTurn,
    /// Engine-specific intent.
    Custom(String),
}

impl IntentKind {
    /// Parse a wire action type. Unrecognized names become `Custom`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "roll-dice" => Self::RollDice,
            "resolve-special-roll-choice" => Self::ResolveSpecialRollChoice,
            "select-piece-destination" => Self::SelectPieceDestination,
            "acknowledge-prompt" => Self::AcknowledgePrompt,
            "skip-turn" => Self::SkipTurn,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::RollDice => "roll-dice",
            Self::ResolveSpecialRollChoice => "resolve-special-roll-choice",
            Self::SelectPieceDestination => "select-piece-destination",
            Self::AcknowledgePrompt => "acknowledge-prompt",
            Self::SkipTurn => "skip-turn",
            Self::Custom(name) => name,
        }
    }
}

impl From<String> for IntentKind {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<IntentKind> for String {
    fn from(kind: IntentKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed intent with its data payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    #[serde(default)]
    pub data: Value,
}

impl Intent {
    /// Create an intent with no data.
    #[must_use]
    pub fn new(kind: IntentKind) -> Self {
        Self {
            kind,
            data: Value::Null,
        }
    }

    /// Attach a data payload (builder pattern).
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Read an unsigned integer field from the payload.
    #[must_use]
    pub fn u32_field(&self, key: &str) -> Option<u32> {
        self.data
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    }

    /// Read a string field from the payload.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// An accepted intent, kept in the session history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRecord {
    pub player: PlayerId,
    pub intent: Intent,
    /// Turn number when the intent was accepted.
    pub turn: u32,
    /// Global sequence number (matches the broadcast it produced).
    pub sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_known_kinds() {
        for kind in [
            IntentKind::RollDice,
            IntentKind::ResolveSpecialRollChoice,
            IntentKind::SelectPieceDestination,
            IntentKind::AcknowledgePrompt,
            IntentKind::SkipTurn,
        ] {
            assert_eq!(IntentKind::parse(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_parse_custom() {
        let kind = IntentKind::parse("buy-property");
        assert_eq!(kind, IntentKind::Custom("buy-property".into()));
        assert_eq!(kind.as_str(), "buy-property");
    }

    #[test]
    fn test_fields() {
        let intent = Intent::new(IntentKind::ResolveSpecialRollChoice)
            .with_data(json!({"choice": "exit", "value": 3, "neg": -1}));

        assert_eq!(intent.str_field("choice"), Some("exit"));
        assert_eq!(intent.u32_field("value"), Some(3));
        assert_eq!(intent.u32_field("neg"), None);
        assert_eq!(intent.u32_field("missing"), None);
    }

    #[test]
    fn test_kind_serializes_as_string() {
        let intent = Intent::new(IntentKind::SkipTurn);
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["kind"], "skip-turn");

        let back: Intent = serde_json::from_value(json).unwrap();
        assert_eq!(back, intent);
    }
}
