//! Subcommand implementations.
//!
//! Each command works on an already opened [`Configuration`] and writes its
//! output to the given writer, so the commands can be exercised without a
//! terminal.

use anyhow::{Context, Result, bail};
use cfgtree::{Configuration, Entry, Value};
use cfgtree_yaml::{EmitOptions, YamlValue, emit_value, resolve_plain_scalar};
use std::io::Write;

/// Interpret command-line text the way an unquoted YAML scalar would be read.
pub fn parse_value(text: &str) -> Value {
    Value::from(resolve_plain_scalar(text))
}

/// Print the value at `path`: scalars as plain text, lists and sections as YAML.
pub fn get(config: &Configuration, path: &str, out: &mut impl Write) -> Result<()> {
    let entry = config
        .get(path)
        .with_context(|| format!("no value at '{}'", path))?;

    let text = match entry {
        Entry::Value(value) if value.is_scalar() => format!("{}\n", value),
        other => {
            let options = EmitOptions {
                indent: config.options().indent(),
            };
            emit_value(&YamlValue::from(&other.to_value()), &options)
        }
    };
    out.write_all(text.as_bytes())?;
    Ok(())
}

pub fn set(config: &mut Configuration, path: &str, raw: &str) -> Result<()> {
    config
        .set(path, parse_value(raw))
        .with_context(|| format!("cannot set '{}'", path))?;
    config.save().context("failed to save configuration")
}

pub fn unset(config: &mut Configuration, path: &str) -> Result<()> {
    if config.get_own(path).is_none() {
        bail!("no value at '{}'", path);
    }
    config
        .remove(path)
        .with_context(|| format!("cannot remove '{}'", path))?;
    config.save().context("failed to save configuration")
}

pub fn keys(config: &Configuration, deep: bool, out: &mut impl Write) -> Result<()> {
    for key in config.keys(deep) {
        writeln!(out, "{}", key)?;
    }
    Ok(())
}

/// Print the document exactly as `save` would write it.
pub fn dump(config: &Configuration, out: &mut impl Write) -> Result<()> {
    out.write_all(config.save_to_string().as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgtree::MemoryStore;

    fn open(text: &str) -> (Configuration, MemoryStore) {
        let store = MemoryStore::new(text);
        let mut config = Configuration::with_store(store.clone());
        config.load().unwrap();
        (config, store)
    }

    fn output(run: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        run(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42"), Value::Int(42));
        assert_eq!(parse_value("yes"), Value::Bool(true));
        assert_eq!(parse_value("1.5"), Value::Float(1.5));
        assert_eq!(parse_value("hello"), Value::from("hello"));
        assert_eq!(parse_value("~"), Value::Null);
    }

    #[test]
    fn test_get_scalar_and_section() {
        let (config, _) = open("server:\n  host: example.org\n  ports: [80, 443]\n");
        assert_eq!(
            output(|out| get(&config, "server.host", out)),
            "example.org\n"
        );
        assert_eq!(
            output(|out| get(&config, "server", out)),
            "host: example.org\nports:\n  - 80\n  - 443\n"
        );
        assert!(get(&config, "server.missing", &mut Vec::new()).is_err());
    }

    #[test]
    fn test_set_and_unset_save_through_store() {
        let (mut config, store) = open("a: 1\n");
        set(&mut config, "b.c", "true").unwrap();
        assert_eq!(store.contents(), "a: 1\nb:\n  c: true\n");

        unset(&mut config, "a").unwrap();
        assert_eq!(store.contents(), "b:\n  c: true\n");
        assert!(unset(&mut config, "a").is_err());
    }

    #[test]
    fn test_set_rejects_empty_segment() {
        let (mut config, store) = open("a: 1\n");
        assert!(set(&mut config, "a..b", "x").is_err());
        assert_eq!(store.contents(), "a: 1\n");
    }

    #[test]
    fn test_keys_and_dump() {
        let (config, _) = open("# Header\n\nx:\n  y: 1\nz: 2\n");
        assert_eq!(output(|out| keys(&config, false, out)), "x\nz\n");
        assert_eq!(output(|out| keys(&config, true, out)), "x\nx.y\nz\n");
        assert_eq!(
            output(|out| dump(&config, out)),
            "# Header\n\nx:\n  y: 1\nz: 2\n"
        );
    }
}
