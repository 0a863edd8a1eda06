//! Conversion between parsed YAML and the section tree.
//!
//! Loading turns every nested mapping into a child section and every other
//! value into a leaf [`Value`]. Saving walks the tree back into an ordered
//! [`Mapping`] for the emitter. Neither direction consults the defaults tree.

use crate::section::{Section, SectionId, Slot};
use crate::{Configuration, Value};
use cfgtree_yaml::{Mapping, YamlValue};
use tracing::warn;

/// Convert a parsed YAML value into a leaf value.
///
/// Mappings nested in sequences stay mappings; this is only called for values
/// that do not become sections.
pub(crate) fn value_from_yaml(yaml: YamlValue) -> Value {
    match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Boolean(b) => Value::Bool(b),
        YamlValue::Integer(i) => Value::Int(i),
        YamlValue::Real(f) => Value::Float(f),
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::List(items.into_iter().map(value_from_yaml).collect()),
        YamlValue::Mapping(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key, value_from_yaml(value)))
                .collect(),
        ),
    }
}

pub(crate) fn yaml_from_value(value: &Value) -> YamlValue {
    match value {
        Value::Null => YamlValue::Null,
        Value::Bool(b) => YamlValue::Boolean(*b),
        Value::Int(i) => YamlValue::Integer(*i),
        Value::Float(f) => YamlValue::Real(*f),
        Value::String(s) => YamlValue::String(s.clone()),
        Value::List(items) => YamlValue::Sequence(items.iter().map(yaml_from_value).collect()),
        Value::Map(entries) => YamlValue::Mapping(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), yaml_from_value(value)))
                .collect(),
        ),
    }
}

impl From<YamlValue> for Value {
    fn from(yaml: YamlValue) -> Self {
        value_from_yaml(yaml)
    }
}

impl From<&Value> for YamlValue {
    fn from(value: &Value) -> Self {
        yaml_from_value(value)
    }
}

/// The own entries of `section`, recursively, as a YAML mapping.
pub(crate) fn to_mapping(section: Section<'_>) -> Mapping {
    let node = section.config.arena.node(section.id);
    node.entries
        .iter()
        .map(|(key, slot)| {
            let yaml = match slot {
                Slot::Value(value) => yaml_from_value(value),
                Slot::Section(child) => {
                    YamlValue::Mapping(to_mapping(Section::new(section.config, *child)))
                }
            };
            (key.clone(), yaml)
        })
        .collect()
}

impl Configuration {
    /// Add the entries of a parsed mapping to the section `id`.
    ///
    /// Keys are stored as written. Null values are skipped, so a key with no
    /// value does not survive a load.
    pub(crate) fn populate(&mut self, id: SectionId, mapping: Mapping) {
        let separator = self.options.path_separator();
        for (key, yaml) in mapping {
            if key.contains(separator) {
                warn!(
                    key = %key,
                    separator = %separator,
                    "key contains the path separator and cannot be addressed by path"
                );
            }
            match yaml {
                YamlValue::Null => {}
                YamlValue::Mapping(nested) => {
                    let child = self.arena.add_child(id, &key);
                    self.populate(child, nested);
                }
                other => self.arena.store(id, key, Slot::Value(value_from_yaml(other))),
            }
        }
    }
}
