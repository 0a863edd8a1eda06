//! The section tree.
//!
//! Sections live in an arena owned by their [`Configuration`]. Ownership is
//! strictly top-down: a parent's entry map holds the ids of its child
//! sections, and the `parent` link of a node is a plain index that is never
//! used for lifetime management.
//!
//! Two handle types give access to a section:
//!
//! - [`Section<'a>`] is a cheap, copyable read handle. Resolution through it
//!   consults the defaults tree where documented.
//! - [`SectionMut<'a>`] borrows the configuration mutably and performs
//!   structural changes (`set`, `create_section`, `add_default`).
//!
//! When a section is removed or overwritten, its node and every node below it
//! go on the arena's free list and are reused by the next section created.
//! No handle can observe this: removal needs the configuration mutably, so
//! every [`Section`] is gone by then.

use crate::path;
use crate::{Configuration, Error, Result, Value};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::ptr;
use tracing::debug;

/// Index of a section node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SectionId(usize);

impl SectionId {
    pub(crate) const ROOT: SectionId = SectionId(0);
}

#[derive(Debug, Clone)]
pub(crate) struct SectionNode {
    /// Segment name under the parent ("" for the root)
    pub(crate) key: String,
    pub(crate) parent: Option<SectionId>,
    pub(crate) entries: IndexMap<String, Slot>,
}

/// What a section stores under a local key.
#[derive(Debug, Clone)]
pub(crate) enum Slot {
    Value(Value),
    Section(SectionId),
}

/// Every section of one tree. Index 0 is the root.
#[derive(Debug, Clone)]
pub(crate) struct SectionArena {
    nodes: Vec<SectionNode>,
    /// Detached nodes waiting to be reused
    free: Vec<SectionId>,
}

impl SectionArena {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![SectionNode {
                key: String::new(),
                parent: None,
                entries: IndexMap::new(),
            }],
            free: Vec::new(),
        }
    }

    pub(crate) fn node(&self, id: SectionId) -> &SectionNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: SectionId) -> &mut SectionNode {
        &mut self.nodes[id.0]
    }

    /// Drop every section except an emptied root.
    pub(crate) fn reset(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0].entries.clear();
        self.free.clear();
    }

    /// Number of nodes still attached to the tree, root included.
    pub(crate) fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Store `slot` at `key` in `parent`, releasing a section it replaces.
    pub(crate) fn store(&mut self, parent: SectionId, key: String, slot: Slot) {
        if let Some(Slot::Section(old)) = self.node_mut(parent).entries.insert(key, slot) {
            self.release(old);
        }
    }

    /// Remove `key` from `parent`, releasing the section stored there.
    pub(crate) fn remove(&mut self, parent: SectionId, key: &str) {
        if let Some(Slot::Section(old)) = self.node_mut(parent).entries.shift_remove(key) {
            self.release(old);
        }
    }

    /// Remove every entry of `id`, releasing its child sections.
    pub(crate) fn clear(&mut self, id: SectionId) {
        let entries = std::mem::take(&mut self.node_mut(id).entries);
        self.release_slots(entries);
    }

    fn release(&mut self, id: SectionId) {
        self.clear(id);
        self.free.push(id);
    }

    fn release_slots(&mut self, entries: IndexMap<String, Slot>) {
        for slot in entries.into_values() {
            if let Slot::Section(child) = slot {
                self.release(child);
            }
        }
    }

    pub(crate) fn child_section(&self, id: SectionId, key: &str) -> Option<SectionId> {
        match self.node(id).entries.get(key)? {
            Slot::Section(child) => Some(*child),
            Slot::Value(_) => None,
        }
    }

    /// Create a fresh empty section under `parent`, replacing whatever was stored at `key`.
    pub(crate) fn add_child(&mut self, parent: SectionId, key: &str) -> SectionId {
        let node = SectionNode {
            key: key.to_string(),
            parent: Some(parent),
            entries: IndexMap::new(),
        };
        let id = match self.free.pop() {
            Some(id) => {
                *self.node_mut(id) = node;
                id
            }
            None => {
                self.nodes.push(node);
                SectionId(self.nodes.len() - 1)
            }
        };
        self.store(parent, key.to_string(), Slot::Section(id));
        id
    }

    /// The section at `key`, created if `key` is absent or holds a value.
    pub(crate) fn ensure_child(&mut self, parent: SectionId, key: &str) -> SectionId {
        self.child_section(parent, key)
            .unwrap_or_else(|| self.add_child(parent, key))
    }

    /// Follow `segments` through existing sections only.
    pub(crate) fn walk(&self, from: SectionId, segments: &[&str]) -> Option<SectionId> {
        segments
            .iter()
            .try_fold(from, |current, segment| self.child_section(current, segment))
    }

    /// Keys from the root down to `id`, root excluded.
    pub(crate) fn keys_from_root(&self, id: SectionId) -> Vec<&str> {
        let mut keys = Vec::new();
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            keys.push(self.node(current).key.as_str());
            current = parent;
        }
        keys.reverse();
        keys
    }
}

/// The result of a path lookup: a stored value or a section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry<'a> {
    Value(&'a Value),
    Section(Section<'a>),
}

impl<'a> Entry<'a> {
    pub fn as_value(self) -> Option<&'a Value> {
        match self {
            Entry::Value(value) => Some(value),
            Entry::Section(_) => None,
        }
    }

    pub fn as_section(self) -> Option<Section<'a>> {
        match self {
            Entry::Section(section) => Some(section),
            Entry::Value(_) => None,
        }
    }

    pub fn is_section(self) -> bool {
        matches!(self, Entry::Section(_))
    }

    /// Copy the entry out as an owned value; sections become `Value::Map`.
    pub fn to_value(self) -> Value {
        match self {
            Entry::Value(value) => value.clone(),
            Entry::Section(section) => Value::Map(section.to_map()),
        }
    }
}

/// A read handle on one section of a configuration tree.
#[derive(Clone, Copy)]
pub struct Section<'a> {
    pub(crate) config: &'a Configuration,
    pub(crate) id: SectionId,
}

impl<'a> Section<'a> {
    pub(crate) fn new(config: &'a Configuration, id: SectionId) -> Self {
        Self { config, id }
    }

    fn node(&self) -> &'a SectionNode {
        self.config.arena.node(self.id)
    }

    fn entry(&self, slot: &'a Slot) -> Entry<'a> {
        match slot {
            Slot::Value(value) => Entry::Value(value),
            Slot::Section(id) => Entry::Section(Section::new(self.config, *id)),
        }
    }

    /// The configuration this section belongs to.
    pub fn configuration(&self) -> &'a Configuration {
        self.config
    }

    /// The separator used for every path in this tree (the root's option).
    pub fn separator(&self) -> char {
        self.config.options.path_separator()
    }

    /// Local key of this section under its parent ("" for the root).
    pub fn name(&self) -> &'a str {
        &self.node().key
    }

    pub fn is_root(&self) -> bool {
        self.id == SectionId::ROOT
    }

    pub fn parent(&self) -> Option<Section<'a>> {
        self.node()
            .parent
            .map(|parent| Section::new(self.config, parent))
    }

    pub fn root(&self) -> Section<'a> {
        Section::new(self.config, SectionId::ROOT)
    }

    /// Absolute path from the root, joined with the current separator.
    pub fn full_path(&self) -> String {
        path::join(&self.config.arena.keys_from_root(self.id), self.separator())
    }

    /// Path of this section relative to `ancestor`.
    ///
    /// Returns `None` if `ancestor` is not this section or one of its ancestors.
    pub fn path_relative_to(&self, ancestor: Section<'_>) -> Option<String> {
        if !ptr::eq(self.config, ancestor.config) {
            return None;
        }
        let arena = &self.config.arena;
        let mut keys = Vec::new();
        let mut current = self.id;
        while current != ancestor.id {
            let node = arena.node(current);
            keys.push(node.key.as_str());
            current = node.parent?;
        }
        keys.reverse();
        Some(path::join(&keys, self.separator()))
    }

    /// Number of entries stored directly in this section.
    pub fn len(&self) -> usize {
        self.node().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node().entries.is_empty()
    }

    /// Look up `path` in this tree only, ignoring defaults.
    ///
    /// The empty path returns this section itself.
    pub fn get_own(&self, path: &str) -> Option<Entry<'a>> {
        let segments = path::split(path, self.separator());
        self.config.lookup(self.id, &segments)
    }

    /// Look up `path` in this tree, returning `fallback` on a miss.
    ///
    /// Defaults are not consulted.
    pub fn get_or<'b>(&self, path: &str, fallback: Entry<'b>) -> Entry<'b>
    where
        'a: 'b,
    {
        self.get_own(path).unwrap_or(fallback)
    }

    /// Look up `path`, falling back to the equivalent path in the defaults tree.
    pub fn get(&self, path: &str) -> Option<Entry<'a>> {
        self.get_own(path).or_else(|| self.get_default(path))
    }

    /// Whether `path` resolves in this tree or in the defaults.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Whether `path` holds an entry of its own.
    ///
    /// With `copy_defaults` enabled, a value present only in the defaults
    /// counts as set.
    pub fn is_set(&self, path: &str) -> bool {
        if self.config.options.copy_defaults() {
            self.contains(path)
        } else {
            self.get_own(path).is_some()
        }
    }

    /// The section at `path`, or the equivalent defaults section.
    ///
    /// A section found only in the defaults is a handle into the defaults tree.
    /// Returns `None` when `path` holds a value rather than a section.
    pub fn get_section(&self, path: &str) -> Option<Section<'a>> {
        self.get(path)?.as_section()
    }

    /// Like [`get_section`](Self::get_section), for callers that cannot do without it.
    ///
    /// # Errors
    ///
    /// Returns `SectionNotFound` with the absolute path when no section exists.
    pub fn require_section(&self, path: &str) -> Result<Section<'a>> {
        self.get_section(path).ok_or_else(|| {
            Error::SectionNotFound(path::child(&self.full_path(), path, self.separator()))
        })
    }

    /// Keys of this section, in insertion order.
    ///
    /// With `deep`, descendants are included as relative dotted paths. With
    /// `copy_defaults`, keys of the equivalent defaults section come first.
    pub fn keys(&self, deep: bool) -> IndexSet<String> {
        self.values(deep).into_keys().collect()
    }

    /// Entries of this section keyed by relative path, in insertion order.
    ///
    /// With `deep`, every section entry is followed by its own entries under
    /// dotted sub-paths. With `copy_defaults`, the defaults are collected
    /// first and this tree's entries are laid over them: a key keeps the
    /// position where it was first seen and takes the value seen last.
    pub fn values(&self, deep: bool) -> IndexMap<String, Entry<'a>> {
        let mut out = IndexMap::new();
        self.collect_effective(&mut out, self.separator(), deep);
        out
    }

    pub(crate) fn collect_effective(
        &self,
        out: &mut IndexMap<String, Entry<'a>>,
        separator: char,
        deep: bool,
    ) {
        if self.config.options.copy_defaults() {
            if let Some(defaults) = self.default_section() {
                defaults.collect_effective(out, separator, deep);
            }
        }
        self.collect_own(out, "", separator, deep);
    }

    fn collect_own(
        &self,
        out: &mut IndexMap<String, Entry<'a>>,
        prefix: &str,
        separator: char,
        deep: bool,
    ) {
        for (key, slot) in &self.node().entries {
            let child_path = path::child(prefix, key, separator);
            let entry = self.entry(slot);
            out.insert(child_path.clone(), entry);
            if let (true, Entry::Section(child)) = (deep, entry) {
                child.collect_own(out, &child_path, separator, deep);
            }
        }
    }

    /// Own entries copied into an ordered map; nested sections become `Value::Map`.
    pub fn to_map(&self) -> IndexMap<String, Value> {
        self.node()
            .entries
            .iter()
            .map(|(key, slot)| (key.clone(), self.entry(slot).to_value()))
            .collect()
    }
}

impl PartialEq for Section<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.config, other.config) && self.id == other.id
    }
}

impl fmt::Debug for Section<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("path", &self.full_path())
            .field("entries", &self.len())
            .finish()
    }
}

/// A write handle on one section of a configuration tree.
pub struct SectionMut<'a> {
    pub(crate) config: &'a mut Configuration,
    pub(crate) id: SectionId,
}

impl<'a> SectionMut<'a> {
    pub(crate) fn new(config: &'a mut Configuration, id: SectionId) -> Self {
        Self { config, id }
    }

    /// Reborrow as a read handle.
    pub fn as_section(&self) -> Section<'_> {
        Section::new(self.config, self.id)
    }

    pub fn full_path(&self) -> String {
        self.as_section().full_path()
    }

    fn separator(&self) -> char {
        self.config.options.path_separator()
    }

    /// Store `value` at `path`, creating missing intermediate sections.
    ///
    /// Intermediate segments that hold a value are replaced by sections.
    /// Storing [`Value::Null`] removes the entry instead.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty path, an empty segment, or a
    /// [`Value::Map`] (use [`create_section_from`](Self::create_section_from)).
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let segments = path::split_non_empty(path, self.separator())?;
        self.config.set_at(self.id, &segments, value.into())
    }

    /// Remove the entry at `path`; a removed section becomes unreachable.
    pub fn remove(&mut self, path: &str) -> Result<()> {
        self.set(path, Value::Null)
    }

    /// The section at `path`, creating it and any missing intermediate sections.
    ///
    /// An existing section at `path` is returned as is; a value stored there is
    /// replaced by a new empty section.
    pub fn create_section(&mut self, path: &str) -> Result<SectionMut<'_>> {
        let id = self.config.create_section_at(self.id, path)?;
        Ok(SectionMut::new(self.config, id))
    }

    /// Create the section at `path` and fill it from `entries`.
    ///
    /// Nested [`Value::Map`]s become nested sections and `Null` entries are
    /// skipped; entries are merged into an existing section.
    pub fn create_section_from(
        &mut self,
        path: &str,
        entries: IndexMap<String, Value>,
    ) -> Result<SectionMut<'_>> {
        let id = self.config.create_section_at(self.id, path)?;
        self.config.fill_section(id, entries);
        Ok(SectionMut::new(self.config, id))
    }

    /// Mutable handle on an existing section of this tree (defaults excluded).
    pub fn section_mut(&mut self, path: &str) -> Option<SectionMut<'_>> {
        let segments = path::split(path, self.separator());
        let id = self.config.arena.walk(self.id, &segments)?;
        Some(SectionMut::new(self.config, id))
    }

    /// Add a default value for `path` relative to this section.
    ///
    /// Defaults belong to the root, so the path is rewritten relative to the
    /// root and stored in the root's defaults tree, which is created on demand.
    pub fn add_default(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let separator = self.separator();
        let relative = path::split_non_empty(path, separator)?;
        let mut absolute: Vec<String> = self
            .config
            .arena
            .keys_from_root(self.id)
            .into_iter()
            .map(str::to_string)
            .collect();
        absolute.extend(relative.into_iter().map(str::to_string));
        let segments: Vec<&str> = absolute.iter().map(String::as_str).collect();
        self.config.add_default_at(&segments, value.into())
    }

    /// Remove every entry of this section.
    pub fn clear(&mut self) {
        self.config.arena.clear(self.id);
    }
}

impl fmt::Debug for SectionMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionMut")
            .field("path", &self.full_path())
            .finish()
    }
}

/// Structural operations on the arena, addressed by section id.
impl Configuration {
    /// Resolve `segments` below `id` in this tree only.
    pub(crate) fn lookup(&self, id: SectionId, segments: &[&str]) -> Option<Entry<'_>> {
        let Some((last, parents)) = segments.split_last() else {
            return Some(Entry::Section(Section::new(self, id)));
        };
        let parent = self.arena.walk(id, parents)?;
        let section = Section::new(self, parent);
        self.arena
            .node(parent)
            .entries
            .get(*last)
            .map(|slot| section.entry(slot))
    }

    /// Resolve absolute `segments` here, then in this tree's own defaults.
    pub(crate) fn lookup_absolute(&self, segments: &[&str]) -> Option<Entry<'_>> {
        self.lookup(SectionId::ROOT, segments).or_else(|| {
            self.defaults
                .as_deref()
                .and_then(|defaults| defaults.lookup_absolute(segments))
        })
    }

    pub(crate) fn set_at(&mut self, id: SectionId, segments: &[&str], value: Value) -> Result<()> {
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::invalid_argument("path must not be empty"));
        };

        match value {
            Value::Null => {
                // Removal never creates the sections leading up to the key
                if let Some(parent) = self.arena.walk(id, parents) {
                    self.arena.remove(parent, last);
                }
            }
            Value::Map(_) => {
                return Err(Error::invalid_argument(format!(
                    "cannot store a mapping at '{}', create a section instead",
                    last
                )));
            }
            value => {
                let parent = parents
                    .iter()
                    .fold(id, |current, segment| self.arena.ensure_child(current, segment));
                self.arena
                    .store(parent, (*last).to_string(), Slot::Value(value));
            }
        }
        Ok(())
    }

    pub(crate) fn create_at(&mut self, id: SectionId, segments: &[&str]) -> SectionId {
        segments
            .iter()
            .fold(id, |current, segment| self.arena.ensure_child(current, segment))
    }

    /// Split `path` and create the section it names below `id`.
    pub(crate) fn create_section_at(&mut self, id: SectionId, path: &str) -> Result<SectionId> {
        let segments = path::split_non_empty(path, self.options.path_separator())?;
        let created = self.create_at(id, &segments);
        debug!(path = %Section::new(self, created).full_path(), "created section");
        Ok(created)
    }

    /// Copy `entries` into the section `id`, turning maps into child sections.
    ///
    /// Keys are stored verbatim, without splitting on the separator.
    pub(crate) fn fill_section(&mut self, id: SectionId, entries: IndexMap<String, Value>) {
        for (key, value) in entries {
            match value {
                Value::Null => {}
                Value::Map(nested) => {
                    let child = self.arena.ensure_child(id, &key);
                    self.fill_section(child, nested);
                }
                value => self.arena.store(id, key, Slot::Value(value)),
            }
        }
    }
}
