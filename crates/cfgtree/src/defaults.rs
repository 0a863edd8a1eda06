//! Resolution through the defaults overlay.
//!
//! A root configuration may own a second tree holding defaults. A path that
//! misses in a section is retried in the defaults tree at the same absolute
//! location: the section's keys from the root followed by the segments of the
//! requested path. Lookups work on segments, so the two trees never need to
//! agree on a separator.
//!
//! The defaults tree is read-only from the point of view of lookups: nothing
//! here writes into it, and values found there are never copied back.

use crate::path;
use crate::section::{Entry, Section};
use crate::Configuration;

impl<'a> Section<'a> {
    /// The defaults tree of this section's root, if any.
    pub fn defaults(&self) -> Option<&'a Configuration> {
        self.config.defaults.as_deref()
    }

    /// Look up `path` in the defaults tree only.
    pub fn get_default(&self, path: &str) -> Option<Entry<'a>> {
        let defaults = self.config.defaults.as_deref()?;
        let mut segments = self.config.arena.keys_from_root(self.id);
        segments.extend(path::split(path, self.separator()));
        defaults.lookup_absolute(&segments)
    }

    /// The section in the defaults tree equivalent to this one.
    pub fn default_section(&self) -> Option<Section<'a>> {
        self.get_default("")?.as_section()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Configuration, Entry, Value};

    fn with_defaults() -> Configuration {
        let mut defaults = Configuration::new();
        defaults.set("server.host", "localhost").unwrap();
        defaults.set("server.port", 80).unwrap();
        defaults.set("debug", false).unwrap();

        let mut config = Configuration::new();
        config.set("server.port", 8080).unwrap();
        config.set_defaults(defaults);
        config
    }

    #[test]
    fn test_get_falls_back_to_defaults() {
        let config = with_defaults();
        assert_eq!(config.get_i64("server.port"), Some(8080));
        assert_eq!(config.get_string("server.host").as_deref(), Some("localhost"));
        assert_eq!(config.get_bool("debug"), Some(false));
        assert_eq!(config.get_own("server.host"), None);
    }

    #[test]
    fn test_defaults_from_nested_section() {
        let config = with_defaults();
        let server = config.root().get_section("server").unwrap();
        assert_eq!(
            server.get_default("host").and_then(Entry::as_value),
            Some(&Value::from("localhost"))
        );
        assert_eq!(server.get_string("host").as_deref(), Some("localhost"));
        let default_server = server.default_section().unwrap();
        assert!(std::ptr::eq(
            default_server.configuration(),
            config.defaults().unwrap()
        ));
    }

    #[test]
    fn test_section_only_in_defaults() {
        let mut defaults = Configuration::new();
        defaults.set("logging.level", "info").unwrap();
        let mut config = Configuration::new();
        config.set_defaults(defaults);

        let logging = config.root().get_section("logging").unwrap();
        assert!(!std::ptr::eq(logging.configuration(), &config));
        assert!(config.root().get_own("logging").is_none());
    }

    #[test]
    fn test_own_value_shadows_default_section() {
        let mut config = with_defaults();
        config.set("server", "flat").unwrap();
        assert_eq!(config.root().get_section("server"), None);
        assert_eq!(config.get_string("server").as_deref(), Some("flat"));
    }

    #[test]
    fn test_defaults_with_different_separator() {
        let mut defaults = Configuration::new();
        defaults.options_mut().set_path_separator('/').unwrap();
        defaults.set("a/b", 1).unwrap();

        let mut config = Configuration::new();
        config.set_defaults(defaults);
        assert_eq!(config.get_i64("a.b"), Some(1));
    }

    #[test]
    fn test_defaults_of_defaults() {
        let mut base = Configuration::new();
        base.set("deep", "base").unwrap();
        let mut middle = Configuration::new();
        middle.set_defaults(base);

        let mut config = Configuration::new();
        config.set_defaults(middle);
        assert_eq!(config.get_string("deep").as_deref(), Some("base"));
    }

    #[test]
    fn test_add_default_creates_defaults_tree() {
        let mut config = Configuration::new();
        assert!(config.defaults().is_none());
        config.add_default("a.b", 5).unwrap();

        assert_eq!(config.get_i64("a.b"), Some(5));
        assert!(config.get_own("a.b").is_none());
        assert_eq!(config.defaults().unwrap().get_i64("a.b"), Some(5));
    }

    #[test]
    fn test_add_default_from_section_is_rooted() {
        let mut config = Configuration::new();
        config
            .create_section("x.y")
            .unwrap()
            .add_default("z", "deep")
            .unwrap();
        assert_eq!(
            config.defaults().unwrap().get_string("x.y.z").as_deref(),
            Some("deep")
        );
        assert_eq!(config.get_string("x.y.z").as_deref(), Some("deep"));
    }

    #[test]
    fn test_overlay_ordering() {
        let mut defaults = Configuration::new();
        defaults.set("a", 1).unwrap();
        defaults.set("b", 2).unwrap();
        let mut config = Configuration::new();
        config.set("c", 3).unwrap();
        config.set("a", 10).unwrap();
        config.set_defaults(defaults);

        let own: Vec<_> = config.keys(false).into_iter().collect();
        assert_eq!(own, vec!["c", "a"]);

        config.options_mut().set_copy_defaults(true);
        let values = config.values(false);
        let keys: Vec<_> = values.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(values["a"].as_value(), Some(&Value::Int(10)));
    }

    #[test]
    fn test_is_set_and_contains() {
        let mut config = with_defaults();
        assert!(config.contains("server.host"));
        assert!(!config.is_set("server.host"));
        assert!(config.is_set("server.port"));

        config.options_mut().set_copy_defaults(true);
        assert!(config.is_set("server.host"));
        assert!(!config.is_set("server.missing"));
    }

    #[test]
    fn test_lookups_leave_defaults_untouched() {
        let mut config = with_defaults();
        config.options_mut().set_copy_defaults(true);
        let before = config.defaults().unwrap().root().to_map();

        let _ = config.values(true);
        let _ = config.get("server.host");
        config.set("server.host", "example.org").unwrap();

        assert_eq!(config.defaults().unwrap().root().to_map(), before);
    }
}
