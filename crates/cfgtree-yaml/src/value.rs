//! Ordered YAML values.

use indexmap::IndexMap;
use std::fmt;

/// An ordered mapping from string keys to YAML values.
///
/// Insertion order is the document order and is preserved by the emitter.
pub type Mapping = IndexMap<String, YamlValue>;

/// A parsed YAML node.
///
/// Unlike `yaml_rust2::Yaml`, mapping keys are always strings and mappings keep
/// insertion order, which is what a configuration tree needs.
#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Sequence(Vec<YamlValue>),
    Mapping(Mapping),
}

impl YamlValue {
    /// Check if this is a scalar value (not sequence or mapping).
    pub fn is_scalar(&self) -> bool {
        !matches!(self, YamlValue::Sequence(_) | YamlValue::Mapping(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, YamlValue::Null)
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, YamlValue::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, YamlValue::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            YamlValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            YamlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            YamlValue::Real(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            YamlValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[YamlValue]> {
        match self {
            YamlValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            YamlValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Consume self and return the mapping if this is one.
    pub fn into_mapping(self) -> Option<Mapping> {
        match self {
            YamlValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Get a value from a mapping by key.
    ///
    /// Returns None if this is not a mapping or the key is not found.
    pub fn get(&self, key: &str) -> Option<&YamlValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Short name of the node kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            YamlValue::Null => "null",
            YamlValue::Boolean(_) => "boolean",
            YamlValue::Integer(_) => "integer",
            YamlValue::Real(_) => "real",
            YamlValue::String(_) => "string",
            YamlValue::Sequence(_) => "sequence",
            YamlValue::Mapping(_) => "mapping",
        }
    }
}

impl fmt::Display for YamlValue {
    /// Scalars render as their plain text; collections render as a kind marker.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YamlValue::Null => f.write_str("null"),
            YamlValue::Boolean(b) => write!(f, "{}", b),
            YamlValue::Integer(i) => write!(f, "{}", i),
            YamlValue::Real(r) => f.write_str(&format_real(*r)),
            YamlValue::String(s) => f.write_str(s),
            YamlValue::Sequence(_) => f.write_str("[...]"),
            YamlValue::Mapping(_) => f.write_str("{...}"),
        }
    }
}

/// Resolve the type of a plain (unquoted) scalar.
///
/// This handles type inference: null, booleans, special floats, integers,
/// floats and strings, in that order. The emitter quotes any string for which
/// this function would not return a `String`, so the two stay consistent.
pub fn resolve_plain_scalar(value: &str) -> YamlValue {
    match value {
        "" | "~" | "null" | "Null" | "NULL" => return YamlValue::Null,
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => {
            return YamlValue::Boolean(true);
        }
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => {
            return YamlValue::Boolean(false);
        }
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            return YamlValue::Real(f64::INFINITY);
        }
        "-.inf" | "-.Inf" | "-.INF" => return YamlValue::Real(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return YamlValue::Real(f64::NAN),
        _ => {}
    }

    if let Ok(i) = value.parse::<i64>() {
        return YamlValue::Integer(i);
    }

    // f64::from_str also accepts "inf" and "NaN", which YAML treats as strings
    if looks_numeric(value) {
        if let Ok(f) = value.parse::<f64>() {
            return YamlValue::Real(f);
        }
    }

    YamlValue::String(value.to_string())
}

fn looks_numeric(value: &str) -> bool {
    value.bytes().any(|b| b.is_ascii_digit())
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

/// Render a float so that it re-parses as a float.
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        return ".nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { ".inf" } else { "-.inf" }.to_string();
    }
    let text = value.to_string();
    if text.contains(['.', 'e', 'E']) {
        text
    } else {
        format!("{}.0", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_null_and_bool() {
        assert_eq!(resolve_plain_scalar("~"), YamlValue::Null);
        assert_eq!(resolve_plain_scalar(""), YamlValue::Null);
        assert_eq!(resolve_plain_scalar("yes"), YamlValue::Boolean(true));
        assert_eq!(resolve_plain_scalar("OFF"), YamlValue::Boolean(false));
    }

    #[test]
    fn test_resolve_numbers() {
        assert_eq!(resolve_plain_scalar("42"), YamlValue::Integer(42));
        assert_eq!(resolve_plain_scalar("-7"), YamlValue::Integer(-7));
        assert_eq!(resolve_plain_scalar("1.5"), YamlValue::Real(1.5));
        assert_eq!(resolve_plain_scalar("2e3"), YamlValue::Real(2000.0));
        assert_eq!(resolve_plain_scalar(".inf"), YamlValue::Real(f64::INFINITY));
        assert!(matches!(resolve_plain_scalar(".nan"), YamlValue::Real(f) if f.is_nan()));
    }

    #[test]
    fn test_resolve_strings() {
        assert_eq!(resolve_plain_scalar("inf"), YamlValue::String("inf".into()));
        assert_eq!(resolve_plain_scalar("NaN"), YamlValue::String("NaN".into()));
        assert_eq!(resolve_plain_scalar("1.2.3"), YamlValue::String("1.2.3".into()));
        assert_eq!(resolve_plain_scalar("hello"), YamlValue::String("hello".into()));
    }

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(1.0), "1.0");
        assert_eq!(format_real(0.25), "0.25");
        assert_eq!(format_real(-3.0), "-3.0");
        assert_eq!(format_real(f64::NEG_INFINITY), "-.inf");
        assert_eq!(format_real(f64::NAN), ".nan");
    }

    #[test]
    fn test_mapping_accessors() {
        let mut map = Mapping::new();
        map.insert("name".into(), YamlValue::String("value".into()));
        let yaml = YamlValue::Mapping(map);

        assert!(yaml.is_mapping());
        assert!(!yaml.is_scalar());
        assert_eq!(yaml.get("name").and_then(YamlValue::as_str), Some("value"));
        assert_eq!(yaml.get("missing"), None);
        assert_eq!(yaml.kind(), "mapping");
    }
}
