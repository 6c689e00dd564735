//! Settings access by key name, plus TOML import/export.
//!
//! Keys are the camelCase names the settings blob is persisted under
//! (`focusMinutes`, `autoStart`, ...). Values are parsed according to the
//! type of the existing field, and numeric fields are clamped after a set.

use serde_json::Value;

use crate::error::ConfigError;
use crate::timer::Settings;

/// All recognized keys, in display order.
pub const KEYS: [&str; 6] = [
    "focusMinutes",
    "shortBreakMinutes",
    "longBreakMinutes",
    "sessionsBeforeLongBreak",
    "autoStart",
    "soundEnabled",
];

fn to_json(settings: &Settings) -> Result<Value, ConfigError> {
    serde_json::to_value(settings).map_err(|e| ConfigError::SerializeFailed(e.to_string()))
}

/// Parse a whole number, saturating literals too large for `i64` so they
/// clamp like any other out-of-range value.
fn parse_integer(value: &str) -> Option<i64> {
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Get a settings value as a string.
pub fn get(settings: &Settings, key: &str) -> Option<String> {
    let json = to_json(settings).ok()?;
    match json.get(key)? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Return a copy of `settings` with `key` set to `value`.
///
/// # Errors
///
/// Returns an error if the key is unknown or the value does not parse as
/// the field's type.
pub fn set(settings: &Settings, key: &str, value: &str) -> Result<Settings, ConfigError> {
    let mut json = to_json(settings)?;
    let obj = json
        .as_object_mut()
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    let existing = obj
        .get(key)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    let new_value = match existing {
        Value::Bool(_) => Value::Bool(
            value
                .parse::<bool>()
                .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
        ),
        Value::Number(_) => {
            let n = parse_integer(value)
                .ok_or_else(|| invalid(format!("cannot parse '{value}' as a whole number")))?;
            Value::Number(n.into())
        }
        _ => Value::String(value.to_string()),
    };
    obj.insert(key.to_string(), new_value);

    let updated: Settings =
        serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
    Ok(updated.clamped())
}

/// Key/value pairs for every setting, in [`KEYS`] order.
pub fn list(settings: &Settings) -> Vec<(&'static str, String)> {
    KEYS.iter()
        .filter_map(|key| get(settings, key).map(|value| (*key, value)))
        .collect()
}

/// Serialize settings as a TOML document.
pub fn export_toml(settings: &Settings) -> Result<String, ConfigError> {
    toml::to_string_pretty(settings).map_err(|e| ConfigError::SerializeFailed(e.to_string()))
}

/// Parse settings from a TOML document; missing keys take their defaults and
/// numeric values are clamped.
pub fn import_toml(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings =
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
    Ok(settings.clamped())
}
