//! Typed getters over [`Section::get_own`] and [`Section::get_default`].
//!
//! Each getter takes the section's own value when it converts to the requested
//! type, then the defaults value when that converts, and otherwise misses.
//! Conversions are lenient where the result is unambiguous: integers widen to
//! floats, integral floats narrow to integers and strings are parsed. A value
//! that cannot be converted is never an error.

use crate::section::{Entry, Section};
use crate::Value;

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::List(_) | Value::Map(_) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
            Some(*f as i64)
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        Value::Int(i) => Some(*i as f64),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

impl<'a> Section<'a> {
    fn resolve<T>(&self, path: &str, convert: impl Fn(&'a Value) -> Option<T>) -> Option<T> {
        self.get_own(path)
            .and_then(Entry::as_value)
            .and_then(&convert)
            .or_else(|| {
                self.get_default(path)
                    .and_then(Entry::as_value)
                    .and_then(&convert)
            })
    }

    /// The raw value at `path`, own first, then defaults.
    pub fn get_value(&self, path: &str) -> Option<&'a Value> {
        self.resolve(path, Some)
    }

    /// Any scalar at `path`, rendered as a string.
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.resolve(path, scalar_to_string)
    }

    pub fn get_string_or(&self, path: &str, default: &str) -> String {
        self.get_string(path).unwrap_or_else(|| default.to_string())
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.resolve(path, value_to_i64)
    }

    pub fn get_i64_or(&self, path: &str, default: i64) -> i64 {
        self.get_i64(path).unwrap_or(default)
    }

    /// Like [`get_i64`](Self::get_i64), missing when the value does not fit.
    pub fn get_i32(&self, path: &str) -> Option<i32> {
        self.resolve(path, |value| {
            value_to_i64(value).and_then(|i| i32::try_from(i).ok())
        })
    }

    pub fn get_i32_or(&self, path: &str, default: i32) -> i32 {
        self.get_i32(path).unwrap_or(default)
    }

    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.resolve(path, value_to_f64)
    }

    pub fn get_f64_or(&self, path: &str, default: f64) -> f64 {
        self.get_f64(path).unwrap_or(default)
    }

    /// Booleans, and the strings `true`/`false` in any case.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.resolve(path, value_to_bool)
    }

    pub fn get_bool_or(&self, path: &str, default: bool) -> bool {
        self.get_bool(path).unwrap_or(default)
    }

    pub fn get_list(&self, path: &str) -> Option<&'a [Value]> {
        self.resolve(path, Value::as_list)
    }

    pub fn get_list_or(&self, path: &str, default: &'a [Value]) -> &'a [Value] {
        self.get_list(path).unwrap_or(default)
    }

    /// The scalar items of the list at `path`; empty when there is no list.
    pub fn get_string_list(&self, path: &str) -> Vec<String> {
        self.get_list(path)
            .map(|items| items.iter().filter_map(scalar_to_string).collect())
            .unwrap_or_default()
    }

    /// The integer-convertible items of the list at `path`.
    pub fn get_i64_list(&self, path: &str) -> Vec<i64> {
        self.get_list(path)
            .map(|items| items.iter().filter_map(value_to_i64).collect())
            .unwrap_or_default()
    }

    pub fn is_section(&self, path: &str) -> bool {
        self.get_section(path).is_some()
    }

    pub fn is_list(&self, path: &str) -> bool {
        self.get_list(path).is_some()
    }
}
