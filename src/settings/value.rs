// ABOUTME: Canonical setting values and the tagged decode step for legacy encodings
// ABOUTME: Scalars decode directly; known legacy object wrappers normalize in fixed order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

use super::SettingsError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A decoded setting value in canonical form
///
/// Serialized untagged, so the cached representation of a value is plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Boolean flag
    Bool(bool),
    /// Numeric value
    Number(Number),
    /// String value (decrypted plaintext for sensitive keys)
    Text(String),
    /// Structured JSON (arrays and objects that are not a legacy wrapper)
    Json(Value),
}

/// Object encodings of scalars written by older versions of the admin console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyShape {
    /// `{"enabled": <bool>}`
    EnabledFlag,
    /// `{"value": <scalar>}`
    ValueWrapper,
}

impl LegacyShape {
    /// Detection order; the first matching shape wins
    pub const PRIORITY: [Self; 2] = [Self::EnabledFlag, Self::ValueWrapper];

    /// Return the wrapped scalar when `raw` has exactly this shape
    #[must_use]
    pub fn unwrap(self, raw: &Value) -> Option<&Value> {
        let object = raw.as_object()?;
        if object.len() != 1 {
            return None;
        }
        match self {
            Self::EnabledFlag => object.get("enabled").filter(|inner| inner.is_boolean()),
            Self::ValueWrapper => object.get("value").filter(|inner| is_scalar(inner)),
        }
    }

    /// Find the legacy shape of a stored value, if it has one
    #[must_use]
    pub fn detect(raw: &Value) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|shape| shape.unwrap(raw).is_some())
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

impl SettingValue {
    /// Decode a stored JSON value, normalizing legacy wrappers.
    ///
    /// Canonical scalars decode first, then each [`LegacyShape`] in priority order,
    /// and anything else is kept as structured JSON. A stored `null` is treated as
    /// an absent value.
    #[must_use]
    pub fn from_stored(raw: Value) -> Option<Self> {
        match raw {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(b)),
            Value::Number(n) => Some(Self::Number(n)),
            Value::String(s) => Some(Self::Text(s)),
            other => {
                if let Some(inner) = LegacyShape::detect(&other).and_then(|shape| shape.unwrap(&other)) {
                    return Self::from_stored(inner.clone());
                }
                Some(Self::Json(other))
            }
        }
    }

    /// Canonical JSON for persistence
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
            Self::Json(v) => v.clone(),
        }
    }

    /// String form used as encryption input for sensitive keys
    #[must_use]
    pub fn to_plaintext(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Json(v) => v.to_string(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Json(Value::Array(_)) => "array",
            Self::Json(_) => "object",
        }
    }

    fn unrecognized(&self, key: &str, expected: &'static str) -> SettingsError {
        SettingsError::UnrecognizedFormat {
            key: key.to_owned(),
            expected,
            found: self.kind(),
        }
    }

    /// Interpret as a boolean (`"true"`/`"false"` strings are accepted)
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::UnrecognizedFormat` for any other shape
    pub fn as_bool(&self, key: &str) -> Result<bool, SettingsError> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Text(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Self::Text(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(self.unrecognized(key, "boolean")),
        }
    }

    /// Interpret as a string
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::UnrecognizedFormat` unless the value is a string
    pub fn as_text(&self, key: &str) -> Result<&str, SettingsError> {
        match self {
            Self::Text(s) => Ok(s),
            _ => Err(self.unrecognized(key, "string")),
        }
    }

    /// Interpret as a floating point number (numeric strings are accepted)
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::UnrecognizedFormat` for any other shape
    pub fn as_f64(&self, key: &str) -> Result<f64, SettingsError> {
        match self {
            Self::Number(n) => n.as_f64().ok_or_else(|| self.unrecognized(key, "number")),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| self.unrecognized(key, "number")),
            _ => Err(self.unrecognized(key, "number")),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<Map<String, Value>> for SettingValue {
    fn from(value: Map<String, Value>) -> Self {
        Self::Json(Value::Object(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_decode_canonically() {
        assert_eq!(SettingValue::from_stored(json!(true)), Some(SettingValue::Bool(true)));
        assert_eq!(
            SettingValue::from_stored(json!("Acme")),
            Some(SettingValue::Text("Acme".to_owned()))
        );
        assert_eq!(SettingValue::from_stored(json!(null)), None);
    }

    #[test]
    fn test_enabled_wrapper_normalizes_to_bool() {
        assert_eq!(
            SettingValue::from_stored(json!({"enabled": true})),
            Some(SettingValue::Bool(true))
        );
        assert_eq!(LegacyShape::detect(&json!({"enabled": false})), Some(LegacyShape::EnabledFlag));
    }

    #[test]
    fn test_value_wrapper_normalizes_to_scalar() {
        assert_eq!(
            SettingValue::from_stored(json!({"value": "Acme"})),
            Some(SettingValue::Text("Acme".to_owned()))
        );
    }

    #[test]
    fn test_structured_json_is_preserved() {
        let menu = json!({"enabled": true, "items": ["home", "shop"]});
        assert_eq!(LegacyShape::detect(&menu), None);
        assert_eq!(SettingValue::from_stored(menu.clone()), Some(SettingValue::Json(menu)));

        let not_bool = json!({"enabled": "yes"});
        assert_eq!(LegacyShape::detect(&not_bool), None);
    }

    #[test]
    fn test_typed_access() {
        assert!(SettingValue::Text("TRUE".to_owned()).as_bool("k").unwrap());
        assert!(SettingValue::Bool(false).as_bool("k").is_ok());
        assert_eq!(SettingValue::Text("4.5".to_owned()).as_f64("k").unwrap(), 4.5);

        let err = SettingValue::Json(json!([1, 2])).as_bool("menu").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::UnrecognizedFormat { expected: "boolean", found: "array", .. }
        ));
    }

    #[test]
    fn test_cached_representation_round_trips() {
        for value in [
            SettingValue::Bool(true),
            SettingValue::Text("x".to_owned()),
            SettingValue::Json(json!({"a": 1, "b": 2})),
        ] {
            let bytes = serde_json::to_vec(&Some(value.clone())).unwrap();
            let decoded: Option<SettingValue> = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(decoded, Some(value));
        }
    }
}
