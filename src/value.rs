//! Typed values and their INI text forms
//!
//! Keys carry a type tag in their first character (`bEnabled`, `nVolume`,
//! `kShortcut`, `sPath`). The tag governs write-back; reading infers the
//! type from the text alone.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A typed configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Value {
    /// Human-readable type name, used in contract-violation errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// Type tag encoded in a key's first character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyTag {
    /// `b` prefix, written as `TRUE`/`FALSE`
    Bool,
    /// `n` or `k` prefix (`k` marks keycodes, same representation)
    Int,
    /// `s` prefix, written raw (empty allowed)
    Str,
}

impl KeyTag {
    /// Tag of a key name, `None` when the key follows no convention
    pub fn of(key: &str) -> Option<KeyTag> {
        match key.chars().next() {
            Some('b') => Some(KeyTag::Bool),
            Some('n') | Some('k') => Some(KeyTag::Int),
            Some('s') => Some(KeyTag::Str),
            _ => None,
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (KeyTag::Bool, Value::Bool(_))
                | (KeyTag::Int, Value::Int(_))
                | (KeyTag::Str, Value::Str(_))
        )
    }
}

/// Convert a typed value to its INI text form.
///
/// The key's tag must agree with the value's runtime type; a mismatch is
/// a broken caller contract, never recoverable input.
pub fn serialize(key: &str, value: &Value) -> Result<String, ConfigError> {
    let tag = KeyTag::of(key);
    if !tag.is_some_and(|t| t.matches(value)) {
        return Err(ConfigError::ContractViolation {
            key: key.to_string(),
            found: value.type_name(),
        });
    }
    Ok(match value {
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Int(n) => n.to_string(),
        Value::Str(s) => s.clone(),
    })
}

/// Infer a typed value from raw INI text.
///
/// Boolean literals win over integers, integers over strings. No key tag
/// is available here: inference runs while parsing, before any schema is
/// known.
pub fn infer(text: &str) -> Value {
    if text.eq_ignore_ascii_case("TRUE") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("FALSE") {
        return Value::Bool(false);
    }
    match text.parse::<i64>() {
        Ok(n) => Value::Int(n),
        Err(_) => Value::Str(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Inference Tests ===

    #[test]
    fn test_infer_bool_literals() {
        assert_eq!(infer("TRUE"), Value::Bool(true));
        assert_eq!(infer("FALSE"), Value::Bool(false));
        assert_eq!(infer("true"), Value::Bool(true));
        assert_eq!(infer("False"), Value::Bool(false));
    }

    #[test]
    fn test_infer_integer() {
        assert_eq!(infer("80"), Value::Int(80));
        assert_eq!(infer("-12"), Value::Int(-12));
        assert_eq!(infer("0"), Value::Int(0));
    }

    #[test]
    fn test_infer_string() {
        assert_eq!(infer("/tmp/disk.img"), Value::Str("/tmp/disk.img".to_string()));
        assert_eq!(infer(""), Value::Str(String::new()));
        // not a decimal literal
        assert_eq!(infer("0x10"), Value::Str("0x10".to_string()));
        assert_eq!(infer("12.5"), Value::Str("12.5".to_string()));
    }

    #[test]
    fn test_infer_bool_wins_over_string() {
        // precedence: boolean literal before integer before string
        assert!(matches!(infer("tRuE"), Value::Bool(true)));
    }

    // === Tag Tests ===

    #[test]
    fn test_key_tags() {
        assert_eq!(KeyTag::of("bEnabled"), Some(KeyTag::Bool));
        assert_eq!(KeyTag::of("nVolume"), Some(KeyTag::Int));
        assert_eq!(KeyTag::of("kQuit"), Some(KeyTag::Int));
        assert_eq!(KeyTag::of("sPath"), Some(KeyTag::Str));
        assert_eq!(KeyTag::of("Volume"), None);
        assert_eq!(KeyTag::of(""), None);
    }

    // === Serialization Tests ===

    #[test]
    fn test_serialize_bool() {
        assert_eq!(serialize("bEnabled", &Value::Bool(true)).unwrap(), "TRUE");
        assert_eq!(serialize("bEnabled", &Value::Bool(false)).unwrap(), "FALSE");
    }

    #[test]
    fn test_serialize_int_both_prefixes() {
        assert_eq!(serialize("nVolume", &Value::Int(80)).unwrap(), "80");
        assert_eq!(serialize("kShortcut", &Value::Int(-3)).unwrap(), "-3");
    }

    #[test]
    fn test_serialize_string() {
        assert_eq!(serialize("sPath", &Value::from("/tmp")).unwrap(), "/tmp");
        assert_eq!(serialize("sPath", &Value::from("")).unwrap(), "");
    }

    #[test]
    fn test_serialize_wrong_type_fails() {
        let err = serialize("nVolume", &Value::Bool(true)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ContractViolation { found: "boolean", .. }
        ));
    }

    #[test]
    fn test_serialize_untagged_key_fails() {
        let err = serialize("Volume", &Value::Int(1)).unwrap_err();
        assert!(matches!(err, ConfigError::ContractViolation { .. }));
    }

    #[test]
    fn test_round_trip() {
        for (key, value) in [
            ("bMidi", Value::Bool(true)),
            ("bMidi", Value::Bool(false)),
            ("nVolume", Value::Int(42)),
            ("kQuit", Value::Int(-7)),
            ("sName", Value::from("hello world")),
            ("sName", Value::from("")),
        ] {
            let text = serialize(key, &value).unwrap();
            assert_eq!(infer(&text), value);
        }
    }

    // === Value Accessor Tests ===

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(5).as_int(), Some(5));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Int(5).as_bool(), None);
        assert_eq!(Value::Bool(true).as_str(), None);
    }

    #[test]
    fn test_value_serde_round_trip() {
        let value = Value::Int(42);
        let json = serde_json::to_string(&value).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);
    }
}
