//! Payload field readers shared by the trigger, action and effect factories.
//!
//! Every factory receives the raw JSON payload from the board. These helpers
//! turn a missing or mistyped field into a `ConfigError::InvalidPayload`
//! naming the type being built.

use serde_json::Value;

use super::error::ConfigError;

/// Required string field.
pub fn require_str<'a>(type_name: &str, payload: &'a Value, key: &str) -> Result<&'a str, ConfigError> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ConfigError::invalid(type_name, format!("missing string field '{}'", key)))
}

/// Required signed integer field.
pub fn require_i64(type_name: &str, payload: &Value, key: &str) -> Result<i64, ConfigError> {
    payload
        .get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| ConfigError::invalid(type_name, format!("missing integer field '{}'", key)))
}

/// Required non-negative integer field.
pub fn require_u32(type_name: &str, payload: &Value, key: &str) -> Result<u32, ConfigError> {
    payload
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| ConfigError::invalid(type_name, format!("missing non-negative integer field '{}'", key)))
}

/// Optional non-negative integer field with a default. A present but
/// mistyped value is still an error.
pub fn u32_or(type_name: &str, payload: &Value, key: &str, default: u32) -> Result<u32, ConfigError> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(_) => require_u32(type_name, payload, key),
    }
}
