//! The root of a configuration tree.

use crate::convert::to_mapping;
use crate::header::{parse_header, render_header};
use crate::section::{Entry, Section, SectionArena, SectionId, SectionMut};
use crate::store::{ConfigStore, FileStore};
use crate::{ConfigOptions, Error, Result, Value};
use cfgtree_yaml::{EmitOptions, Mapping, YamlValue};
use indexmap::{IndexMap, IndexSet};
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// A configuration document: the root section, its options, an optional
/// defaults tree and an optional backing store.
///
/// Reads go through [`root`](Self::root) and writes through
/// [`root_mut`](Self::root_mut); the most common section operations are also
/// available directly on the configuration.
///
/// # Example
///
/// ```rust
/// use cfgtree::Configuration;
///
/// let mut config = Configuration::new();
/// config.load_from_str("server:\n  port: 8080\n").unwrap();
/// config.set("server.host", "localhost").unwrap();
///
/// assert_eq!(config.get_i64("server.port"), Some(8080));
/// assert_eq!(
///     config.save_to_string(),
///     "server:\n  port: 8080\n  host: localhost\n"
/// );
/// ```
#[derive(Debug)]
pub struct Configuration {
    pub(crate) arena: SectionArena,
    pub(crate) options: ConfigOptions,
    pub(crate) defaults: Option<Box<Configuration>>,
    store: Option<Box<dyn ConfigStore>>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Configuration {
    /// An empty configuration that is not bound to a store.
    pub fn new() -> Self {
        Self {
            arena: SectionArena::new(),
            options: ConfigOptions::default(),
            defaults: None,
            store: None,
        }
    }

    /// An empty configuration bound to `store`. Nothing is read until [`load`](Self::load).
    pub fn with_store(store: impl ConfigStore + 'static) -> Self {
        Self {
            store: Some(Box::new(store)),
            ..Self::new()
        }
    }

    /// Bind to the file at `path` and load it.
    ///
    /// A missing file gives an empty configuration; it is created by the first
    /// [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file exists but cannot be read and
    /// `InvalidConfiguration` if its contents are not a YAML mapping.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = FileStore::new(path);
        let exists = store.path().exists();
        let mut config = Self::with_store(store);
        if exists {
            config.load()?;
        }
        Ok(config)
    }

    pub fn store(&self) -> Option<&dyn ConfigStore> {
        self.store.as_deref()
    }

    pub fn options(&self) -> &ConfigOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ConfigOptions {
        &mut self.options
    }

    pub fn defaults(&self) -> Option<&Configuration> {
        self.defaults.as_deref()
    }

    pub fn defaults_mut(&mut self) -> Option<&mut Configuration> {
        self.defaults.as_deref_mut()
    }

    /// Replace the defaults tree.
    pub fn set_defaults(&mut self, defaults: Configuration) {
        self.defaults = Some(Box::new(defaults));
    }

    /// Add a default value at `path`, creating the defaults tree if needed.
    pub fn add_default(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        self.root_mut().add_default(path, value)
    }

    /// Add several defaults, stopping at the first invalid path.
    pub fn add_defaults<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (path, value) in entries {
            self.add_default(path.as_ref(), value)?;
        }
        Ok(())
    }

    pub(crate) fn add_default_at(&mut self, segments: &[&str], value: Value) -> Result<()> {
        let separator = self.options.path_separator();
        let defaults = self.defaults.get_or_insert_with(|| {
            let mut defaults = Configuration::new();
            defaults.options.path_separator = separator;
            Box::new(defaults)
        });
        defaults.set_at(SectionId::ROOT, segments, value)
    }

    pub fn root(&self) -> Section<'_> {
        Section::new(self, SectionId::ROOT)
    }

    pub fn root_mut(&mut self) -> SectionMut<'_> {
        SectionMut::new(self, SectionId::ROOT)
    }

    pub fn get(&self, path: &str) -> Option<Entry<'_>> {
        self.root().get(path)
    }

    pub fn get_own(&self, path: &str) -> Option<Entry<'_>> {
        self.root().get_own(path)
    }

    pub fn get_section(&self, path: &str) -> Option<Section<'_>> {
        self.root().get_section(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.root().contains(path)
    }

    pub fn is_set(&self, path: &str) -> bool {
        self.root().is_set(path)
    }

    pub fn keys(&self, deep: bool) -> IndexSet<String> {
        self.root().keys(deep)
    }

    pub fn values(&self, deep: bool) -> IndexMap<String, Entry<'_>> {
        self.root().values(deep)
    }

    pub fn get_string(&self, path: &str) -> Option<String> {
        self.root().get_string(path)
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.root().get_i64(path)
    }

    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.root().get_f64(path)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.root().get_bool(path)
    }

    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        self.root_mut().set(path, value)
    }

    pub fn remove(&mut self, path: &str) -> Result<()> {
        self.root_mut().remove(path)
    }

    pub fn create_section(&mut self, path: &str) -> Result<SectionMut<'_>> {
        let id = self.create_section_at(SectionId::ROOT, path)?;
        Ok(SectionMut::new(self, id))
    }

    pub fn create_section_from(
        &mut self,
        path: &str,
        entries: IndexMap<String, Value>,
    ) -> Result<SectionMut<'_>> {
        let id = self.create_section_at(SectionId::ROOT, path)?;
        self.fill_section(id, entries);
        Ok(SectionMut::new(self, id))
    }

    /// Mutable handle on an existing section of this tree.
    pub fn section_mut(&mut self, path: &str) -> Option<SectionMut<'_>> {
        let segments = crate::path::split(path, self.options.path_separator());
        let id = self.arena.walk(SectionId::ROOT, &segments)?;
        Some(SectionMut::new(self, id))
    }

    /// Remove every entry. Options, defaults and the store are kept.
    pub fn clear(&mut self) {
        self.arena.reset();
    }

    fn store_name(&self) -> String {
        self.store
            .as_ref()
            .map_or_else(|| "<string>".to_string(), |store| store.name())
    }

    fn io_error(&self, source: io::Error) -> Error {
        Error::Io {
            store: self.store_name(),
            source,
        }
    }

    /// Replace the tree with the contents of the backing store.
    ///
    /// # Errors
    ///
    /// `NoBackingStore` when unbound, `Io` when the store cannot be read and
    /// `InvalidConfiguration` when its text is not a YAML mapping.
    pub fn load(&mut self) -> Result<()> {
        let store = self.store.as_ref().ok_or(Error::NoBackingStore)?;
        let text = store.read().map_err(|source| self.io_error(source))?;
        self.load_from_str(&text)
    }

    /// Replace the tree with the entries parsed from `text`.
    ///
    /// All existing entries are cleared first. The header option is replaced
    /// only when `text` starts with a comment block. On error the tree is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` when `text` is not valid YAML or its
    /// top-level value is not a mapping.
    pub fn load_from_str(&mut self, text: &str) -> Result<()> {
        let name = self.store_name();
        let mapping = match cfgtree_yaml::parse_named(text, &name)? {
            YamlValue::Null => Mapping::new(),
            YamlValue::Mapping(mapping) => mapping,
            other => {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "top-level value in {} must be a mapping, found {}",
                        name,
                        other.kind()
                    ),
                    source: None,
                });
            }
        };

        self.arena.reset();
        self.populate(SectionId::ROOT, mapping);
        if let Some(header) = parse_header(text) {
            self.options.set_header(Some(header));
        }

        debug!(store = %name, entries = self.root().len(), "loaded configuration");
        Ok(())
    }

    /// Render the tree, and its header if any, as YAML text.
    ///
    /// Defaults are not written. An empty tree without a header renders as
    /// the empty string.
    pub fn save_to_string(&self) -> String {
        let emit_options = EmitOptions {
            indent: self.options.indent(),
        };
        let body = cfgtree_yaml::emit(&to_mapping(self.root()), &emit_options);
        let header = self
            .build_header()
            .map(|header| render_header(&header))
            .unwrap_or_default();

        match (header.is_empty(), body.is_empty()) {
            (true, _) => body,
            (false, true) => header,
            (false, false) => format!("{}\n{}", header, body),
        }
    }

    /// Write the tree to the backing store.
    ///
    /// # Errors
    ///
    /// `NoBackingStore` when unbound, `Io` when the store cannot be written.
    pub fn save(&mut self) -> Result<()> {
        let text = self.save_to_string();
        let name = self.store_name();
        let store = self.store.as_mut().ok_or(Error::NoBackingStore)?;
        store
            .write(&text)
            .map_err(|source| Error::Io { store: name.clone(), source })?;

        debug!(store = %name, bytes = text.len(), "saved configuration");
        Ok(())
    }
}
