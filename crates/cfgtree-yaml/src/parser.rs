//! YAML parser that builds ordered `YamlValue` trees.

use crate::value::{Mapping, resolve_plain_scalar};
use crate::{Error, Location, Result, YamlValue};
use std::collections::HashMap;
use tracing::warn;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Parse YAML from a string, producing an ordered `YamlValue` tree.
///
/// This parses a single YAML document. If the input contains multiple documents,
/// only the first one is parsed. Input without any document (empty text, or
/// only comments) yields `YamlValue::Null`.
///
/// # Example
///
/// ```rust
/// use cfgtree_yaml::parse;
///
/// let yaml = parse("title: My Document").unwrap();
/// assert!(yaml.is_mapping());
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid or if it uses a collection as a
/// mapping key.
pub fn parse(content: &str) -> Result<YamlValue> {
    parse_impl(content)
}

/// Parse YAML from a string with an associated source name.
///
/// The name is included in error locations for better error reporting.
///
/// # Example
///
/// ```rust
/// use cfgtree_yaml::parse_named;
///
/// let err = parse_named("a: [1, 2", "config.yml").unwrap_err();
/// assert_eq!(err.location().file.as_deref(), Some("config.yml"));
/// ```
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_named(content: &str, name: &str) -> Result<YamlValue> {
    parse_impl(content).map_err(|err| err.with_file(name))
}

fn parse_impl(content: &str) -> Result<YamlValue> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = YamlBuilder::new();

    parser
        .load(&mut builder, false) // false = single document only
        .map_err(Error::from)?;

    builder.result()
}

/// Builder that implements MarkedEventReceiver to construct a `YamlValue`.
struct YamlBuilder {
    /// Stack of nodes being constructed
    stack: Vec<BuildNode>,

    /// Anchored nodes, by anchor id
    anchors: HashMap<usize, YamlValue>,

    /// The completed root node
    root: Option<YamlValue>,

    /// First structural error; later events are ignored once set
    error: Option<Error>,
}

/// A node being constructed during parsing.
enum BuildNode {
    /// Building a sequence
    Sequence {
        anchor_id: usize,
        items: Vec<YamlValue>,
    },

    /// Building a mapping
    Mapping {
        anchor_id: usize,
        entries: Mapping,
        pending_key: Option<String>,
    },
}

impl YamlBuilder {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<YamlValue> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(self.root.unwrap_or(YamlValue::Null))
    }

    fn fail(&mut self, message: impl Into<String>, marker: &Marker) {
        if self.error.is_none() {
            self.error = Some(Error::InvalidStructure {
                message: message.into(),
                location: Location::from_marker(marker),
            });
        }
    }

    fn register_anchor(&mut self, anchor_id: usize, node: &YamlValue) {
        if anchor_id > 0 {
            self.anchors.insert(anchor_id, node.clone());
        }
    }

    fn push_complete(&mut self, node: YamlValue, marker: &Marker) {
        let bad_key = match self.stack.last_mut() {
            None => {
                // This is the root
                self.root = Some(node);
                return;
            }
            Some(BuildNode::Sequence { items, .. }) => {
                items.push(node);
                None
            }
            Some(BuildNode::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => {
                    if entries.contains_key(&key) {
                        warn!(key = %key, "duplicate mapping key, last value wins");
                    }
                    entries.insert(key, node);
                    None
                }
                None if node.is_scalar() => {
                    *pending_key = Some(scalar_key(node));
                    None
                }
                None => Some(node.kind()),
            },
        };

        if let Some(kind) = bad_key {
            self.fail(format!("{} used as a mapping key", kind), marker);
        }
    }
}

impl MarkedEventReceiver for YamlBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Scalar(value, style, anchor_id, tag) => {
                let node = if matches!(style, TScalarStyle::Plain) && !is_str_tag(tag.as_ref()) {
                    resolve_plain_scalar(&value)
                } else {
                    YamlValue::String(value)
                };
                self.register_anchor(anchor_id, &node);
                self.push_complete(node, &marker);
            }

            Event::SequenceStart(anchor_id, _tag) => {
                self.stack.push(BuildNode::Sequence {
                    anchor_id,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => match self.stack.pop() {
                Some(BuildNode::Sequence { anchor_id, items }) => {
                    let node = YamlValue::Sequence(items);
                    self.register_anchor(anchor_id, &node);
                    self.push_complete(node, &marker);
                }
                _ => self.fail("sequence end without matching start", &marker),
            },

            Event::MappingStart(anchor_id, _tag) => {
                self.stack.push(BuildNode::Mapping {
                    anchor_id,
                    entries: Mapping::new(),
                    pending_key: None,
                });
            }

            Event::MappingEnd => match self.stack.pop() {
                Some(BuildNode::Mapping {
                    anchor_id,
                    entries,
                    pending_key,
                }) => {
                    if let Some(key) = pending_key {
                        self.fail(format!("mapping key '{}' without a value", key), &marker);
                        return;
                    }
                    let node = YamlValue::Mapping(entries);
                    self.register_anchor(anchor_id, &node);
                    self.push_complete(node, &marker);
                }
                _ => self.fail("mapping end without matching start", &marker),
            },

            Event::Alias(anchor_id) => match self.anchors.get(&anchor_id).cloned() {
                Some(node) => self.push_complete(node, &marker),
                None => self.fail("alias refers to an unknown anchor", &marker),
            },

            // Stream and document boundaries carry no content
            _ => {}
        }
    }
}

/// Stringify a scalar used as a mapping key (`1: x` has the key `"1"`).
fn scalar_key(node: YamlValue) -> String {
    match node {
        YamlValue::String(s) => s,
        other => other.to_string(),
    }
}

fn is_str_tag(tag: Option<&Tag>) -> bool {
    tag.is_some_and(|tag| {
        tag.suffix == "str" && (tag.handle == "!!" || tag.handle == "tag:yaml.org,2002:")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar() {
        let yaml = parse("hello").unwrap();
        assert_eq!(yaml.as_str(), Some("hello"));
    }

    #[test]
    fn test_parse_integer() {
        let yaml = parse("42").unwrap();
        assert_eq!(yaml.as_i64(), Some(42));
    }

    #[test]
    fn test_parse_quoted_number_stays_string() {
        let yaml = parse("a: \"42\"\nb: '1.5'").unwrap();
        assert_eq!(yaml.get("a").and_then(YamlValue::as_str), Some("42"));
        assert_eq!(yaml.get("b").and_then(YamlValue::as_str), Some("1.5"));
    }

    #[test]
    fn test_parse_str_tag() {
        let yaml = parse("a: !!str 42").unwrap();
        assert_eq!(yaml.get("a").and_then(YamlValue::as_str), Some("42"));
    }

    #[test]
    fn test_parse_array() {
        let yaml = parse("[1, 2, 3]").unwrap();
        let items = yaml.as_sequence().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_i64(), Some(1));
        assert_eq!(items[2].as_i64(), Some(3));
    }

    #[test]
    fn test_parse_hash_keeps_order() {
        let yaml = parse("zeta: 1\nalpha: 2\nmid: 3").unwrap();
        let keys: Vec<_> = yaml.as_mapping().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_nested_structure() {
        let yaml = parse(
            r#"
project:
  title: My Project
  authors:
    - Alice
    - Bob
"#,
        )
        .unwrap();

        let project = yaml.get("project").unwrap();
        assert!(project.is_mapping());

        let authors = project.get("authors").unwrap();
        assert_eq!(authors.as_sequence().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let yaml = parse("1: one\ntrue: yes").unwrap();
        assert_eq!(yaml.get("1").and_then(YamlValue::as_str), Some("one"));
        assert_eq!(yaml.get("true").and_then(YamlValue::as_bool), Some(true));
    }

    #[test]
    fn test_null_values_are_kept() {
        let yaml = parse("a:\nb: ~").unwrap();
        assert_eq!(yaml.get("a"), Some(&YamlValue::Null));
        assert_eq!(yaml.get("b"), Some(&YamlValue::Null));
    }

    #[test]
    fn test_anchor_and_alias() {
        let yaml = parse("base: &b\n  x: 1\ncopy: *b").unwrap();
        assert_eq!(yaml.get("copy"), yaml.get("base"));
        assert_eq!(
            yaml.get("copy").and_then(|c| c.get("x")).and_then(YamlValue::as_i64),
            Some(1)
        );
    }

    #[test]
    fn test_empty_input_is_null() {
        assert_eq!(parse("").unwrap(), YamlValue::Null);
        assert_eq!(parse("# just a comment\n").unwrap(), YamlValue::Null);
    }

    #[test]
    fn test_complex_key_is_rejected() {
        let err = parse("? [a, b]\n: value").unwrap_err();
        assert!(matches!(err, Error::InvalidStructure { .. }));
    }

    #[test]
    fn test_syntax_error_has_location() {
        let err = parse_named("a: 1\nb: c: d\n", "broken.yml").unwrap_err();
        assert!(matches!(err, Error::ParseError { .. }));
        assert_eq!(err.location().file.as_deref(), Some("broken.yml"));
        assert_eq!(err.location().line, 2);
    }

    #[test]
    fn test_first_line_error_is_line_one() {
        let err = parse("a: b: c\n").unwrap_err();
        assert_eq!(err.location().line, 1);
    }

    #[test]
    fn test_structure_error_location() {
        let err = parse("a: 1\n? [x]\n: v\n").unwrap_err();
        assert!(matches!(err, Error::InvalidStructure { .. }));
        let location = err.location();
        assert_eq!(location.offset, 9);
        assert_eq!(location.line, 2);
        assert_eq!(location.col, 5);
    }
}
