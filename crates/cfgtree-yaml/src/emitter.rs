//! Block-style YAML emitter for ordered `YamlValue` trees.
//!
//! The emitter is a pure function of its input and [`EmitOptions`]: there is
//! no shared emitter state. Mappings are always written in block style; the
//! only flow forms produced are `{}` and `[]` for empty collections.

use crate::value::{Mapping, format_real, resolve_plain_scalar};
use crate::YamlValue;
use std::fmt::Write;

/// Longest key, in characters, that may be written as an implicit `key:`.
const MAX_IMPLICIT_KEY_LEN: usize = 1024;

/// Formatting options for [`emit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Number of spaces per nesting level.
    pub indent: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Emit a mapping as a block-style YAML document.
///
/// An empty mapping produces an empty string rather than `{}`.
///
/// # Example
///
/// ```rust
/// use cfgtree_yaml::{EmitOptions, Mapping, YamlValue, emit};
///
/// let mut map = Mapping::new();
/// map.insert("name".into(), YamlValue::String("demo".into()));
/// assert_eq!(emit(&map, &EmitOptions::default()), "name: demo\n");
/// ```
pub fn emit(mapping: &Mapping, options: &EmitOptions) -> String {
    let mut emitter = Emitter::new(options);
    emitter.write_mapping(mapping, 0, false);
    emitter.out
}

/// Emit any value as a YAML document.
///
/// Non-empty mappings and sequences are written in block style, everything
/// else as a single inline scalar line.
pub fn emit_value(value: &YamlValue, options: &EmitOptions) -> String {
    let mut emitter = Emitter::new(options);
    match value {
        YamlValue::Mapping(map) if !map.is_empty() => emitter.write_mapping(map, 0, false),
        YamlValue::Sequence(items) if !items.is_empty() => {
            emitter.write_sequence(items, 0, false)
        }
        other => {
            emitter.write_inline(other);
            emitter.out.push('\n');
        }
    }
    emitter.out
}

struct Emitter {
    out: String,
    indent: usize,
}

impl Emitter {
    fn new(options: &EmitOptions) -> Self {
        Self {
            out: String::new(),
            indent: options.indent.max(1),
        }
    }

    fn pad(&mut self, col: usize) {
        self.out.extend(std::iter::repeat_n(' ', col));
    }

    /// Write mapping entries with keys at `col`.
    ///
    /// With `inline_first`, the first key continues the current line (after a
    /// `- ` sequence indicator) instead of starting a new one.
    fn write_mapping(&mut self, map: &Mapping, col: usize, inline_first: bool) {
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 || !inline_first {
                self.pad(col);
            }
            self.write_key(key, col);
            self.out.push(':');
            match value {
                YamlValue::Mapping(child) if !child.is_empty() => {
                    self.out.push('\n');
                    self.write_mapping(child, col + self.indent, false);
                }
                YamlValue::Sequence(items) if !items.is_empty() => {
                    self.out.push('\n');
                    self.write_sequence(items, col + self.indent, false);
                }
                other => {
                    self.out.push(' ');
                    self.write_inline(other);
                    self.out.push('\n');
                }
            }
        }
    }

    /// Write a mapping key, leaving the output where its `:` belongs.
    ///
    /// Keys longer than an implicit key allows get the explicit `? ` form, with
    /// the `:` starting its own line at `col`.
    fn write_key(&mut self, key: &str, col: usize) {
        let start = self.out.len();
        self.write_string(key);
        if self.out[start..].chars().count() >= MAX_IMPLICIT_KEY_LEN {
            self.out.insert_str(start, "? ");
            self.out.push('\n');
            self.pad(col);
        }
    }

    /// Write sequence items with their `-` indicators at `col`.
    fn write_sequence(&mut self, items: &[YamlValue], col: usize, inline_first: bool) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 || !inline_first {
                self.pad(col);
            }
            self.out.push_str("- ");
            match item {
                YamlValue::Mapping(child) if !child.is_empty() => {
                    self.write_mapping(child, col + 2, true);
                }
                YamlValue::Sequence(nested) if !nested.is_empty() => {
                    self.write_sequence(nested, col + 2, true);
                }
                other => {
                    self.write_inline(other);
                    self.out.push('\n');
                }
            }
        }
    }

    fn write_inline(&mut self, value: &YamlValue) {
        match value {
            YamlValue::Null => self.out.push_str("null"),
            YamlValue::Boolean(b) => self.out.push_str(if *b { "true" } else { "false" }),
            YamlValue::Integer(i) => {
                let _ = write!(self.out, "{}", i);
            }
            YamlValue::Real(r) => self.out.push_str(&format_real(*r)),
            YamlValue::String(s) => self.write_string(s),
            YamlValue::Sequence(_) => self.out.push_str("[]"),
            YamlValue::Mapping(_) => self.out.push_str("{}"),
        }
    }

    fn write_string(&mut self, s: &str) {
        if needs_quotes(s) {
            write_double_quoted(&mut self.out, s);
        } else {
            self.out.push_str(s);
        }
    }
}

/// Whether a string must be quoted to survive a parse as the same string.
fn needs_quotes(s: &str) -> bool {
    const INDICATORS: &str = "-?:,[]{}#&*!|>'\"%@` \t";

    s.is_empty()
        || !matches!(resolve_plain_scalar(s), YamlValue::String(_))
        || s.starts_with(|c| INDICATORS.contains(c))
        || s.starts_with("...")
        || s.ends_with([' ', '\t', ':'])
        || s.contains(": ")
        || s.contains(" #")
        || s.chars().any(char::is_control)
}

fn write_double_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() && (c as u32) <= 0xFF => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn map(entries: Vec<(&str, YamlValue)>) -> YamlValue {
        YamlValue::Mapping(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    fn s(value: &str) -> YamlValue {
        YamlValue::String(value.into())
    }

    fn emit_with(value: &YamlValue, indent: usize) -> String {
        emit(value.as_mapping().unwrap(), &EmitOptions { indent })
    }

    #[test]
    fn test_empty_mapping_is_empty_string() {
        assert_eq!(emit(&Mapping::new(), &EmitOptions::default()), "");
    }

    #[test]
    fn test_nested_block_layout() {
        let doc = map(vec![
            ("name", s("demo")),
            ("server", map(vec![("port", YamlValue::Integer(8080)), ("tls", YamlValue::Boolean(false))])),
            ("tags", YamlValue::Sequence(vec![s("a"), s("b")])),
        ]);

        insta::assert_snapshot!(emit_with(&doc, 2), @r"
        name: demo
        server:
          port: 8080
          tls: false
        tags:
          - a
          - b
        ");
    }

    #[test]
    fn test_custom_indent() {
        let doc = map(vec![("a", map(vec![("b", map(vec![("c", YamlValue::Integer(1))]))]))]);
        assert_eq!(emit_with(&doc, 4), "a:\n    b:\n        c: 1\n");
    }

    #[test]
    fn test_mappings_inside_sequences() {
        let doc = map(vec![(
            "servers",
            YamlValue::Sequence(vec![
                map(vec![("host", s("a.example")), ("port", YamlValue::Integer(1))]),
                map(vec![("host", s("b.example")), ("port", YamlValue::Integer(2))]),
            ]),
        )]);

        insta::assert_snapshot!(emit_with(&doc, 2), @r"
        servers:
          - host: a.example
            port: 1
          - host: b.example
            port: 2
        ");
    }

    #[test]
    fn test_empty_collections_use_flow_markers() {
        let doc = map(vec![
            ("empty_map", YamlValue::Mapping(Mapping::new())),
            ("empty_list", YamlValue::Sequence(Vec::new())),
        ]);
        assert_eq!(emit_with(&doc, 2), "empty_map: {}\nempty_list: []\n");
    }

    #[test]
    fn test_ambiguous_strings_are_quoted() {
        let doc = map(vec![
            ("number", s("42")),
            ("flag", s("yes")),
            ("empty", s("")),
            ("colon", s("a: b")),
            ("comment", s("# not a comment")),
            ("multiline", s("one\ntwo")),
            ("plain", s("hello world")),
        ]);
        let text = emit_with(&doc, 2);

        assert!(text.contains("number: \"42\"\n"));
        assert!(text.contains("flag: \"yes\"\n"));
        assert!(text.contains("empty: \"\"\n"));
        assert!(text.contains("colon: \"a: b\"\n"));
        assert!(text.contains("comment: \"# not a comment\"\n"));
        assert!(text.contains("multiline: \"one\\ntwo\"\n"));
        assert!(text.contains("plain: hello world\n"));
    }

    #[test]
    fn test_emitted_text_parses_back() {
        let doc = map(vec![
            ("title", s("Config: \"quoted\" \\ tricky")),
            ("ratio", YamlValue::Real(2.0)),
            ("neg", YamlValue::Real(f64::NEG_INFINITY)),
            ("count", YamlValue::Integer(-3)),
            ("nothing", YamlValue::Null),
            (
                "matrix",
                YamlValue::Sequence(vec![
                    YamlValue::Sequence(vec![YamlValue::Integer(1), YamlValue::Integer(2)]),
                    YamlValue::Sequence(vec![YamlValue::Integer(3)]),
                ]),
            ),
            ("nested", map(vec![("list", YamlValue::Sequence(vec![map(vec![("k", s("v"))])]))])),
        ]);

        for indent in 2..=9 {
            let text = emit_with(&doc, indent);
            assert_eq!(parse(&text).unwrap(), doc, "indent {}:\n{}", indent, text);
        }
    }

    #[test]
    fn test_long_keys_use_explicit_form() {
        let long = "k".repeat(1100);
        let doc = map(vec![
            (long.as_str(), YamlValue::Integer(1)),
            ("nested", map(vec![(long.as_str(), map(vec![("inner", s("x"))]))])),
            (
                "items",
                YamlValue::Sequence(vec![map(vec![
                    (long.as_str(), YamlValue::Sequence(vec![YamlValue::Integer(2)])),
                    ("short", YamlValue::Boolean(true)),
                ])]),
            ),
        ]);

        let text = emit_with(&doc, 2);
        assert!(text.starts_with(&format!("? {}\n: 1\n", long)));
        assert!(text.contains(&format!("\n  ? {}\n  :\n    inner: x\n", long)));
        assert!(text.contains(&format!("\n  - ? {}\n    :\n", long)));
        assert!(text.contains("\n    short: true\n"));

        for indent in 2..=4 {
            let text = emit_with(&doc, indent);
            assert_eq!(parse(&text).unwrap(), doc, "indent {}:\n{}", indent, text);
        }
    }

    #[test]
    fn test_short_keys_stay_implicit() {
        let key = "k".repeat(1000);
        let doc = map(vec![(key.as_str(), YamlValue::Integer(1))]);
        assert_eq!(emit_with(&doc, 2), format!("{}: 1\n", key));
    }

    #[test]
    fn test_emit_value_scalar_root() {
        assert_eq!(emit_value(&YamlValue::Integer(7), &EmitOptions::default()), "7\n");
    }
}
