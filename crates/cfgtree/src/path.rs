//! Splitting and joining of delimited paths.
//!
//! A path is a string of segments separated by one configurable character,
//! e.g. `server.http.port`. The empty path addresses the section itself.
//! There is no escaping: a key containing the separator cannot be addressed.

use crate::{Error, Result};

/// Split a path into its segments.
///
/// The empty path yields no segments. Empty segments (`a..b`, `.a`, `a.`) are
/// kept so callers can reject them or treat them as misses.
pub fn split(path: &str, separator: char) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split(separator).collect()
    }
}

/// Join segments with the separator.
pub fn join<S: AsRef<str>>(segments: &[S], separator: char) -> String {
    let mut path = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            path.push(separator);
        }
        path.push_str(segment.as_ref());
    }
    path
}

/// Append `key` to `prefix`, omitting the separator when `prefix` is empty.
pub fn child(prefix: &str, key: &str, separator: char) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        let mut path = String::with_capacity(prefix.len() + key.len() + 1);
        path.push_str(prefix);
        path.push(separator);
        path.push_str(key);
        path
    }
}

/// Split a path that must address an entry below a section.
///
/// # Errors
///
/// Returns `InvalidArgument` for the empty path or any empty segment.
pub(crate) fn split_non_empty(path: &str, separator: char) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Err(Error::invalid_argument("path must not be empty"));
    }
    let segments = split(path, separator);
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::invalid_argument(format!(
            "path '{}' contains an empty segment",
            path
        )));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        assert_eq!(split("a.b.c", '.'), vec!["a", "b", "c"]);
        assert_eq!(split("a/b", '/'), vec!["a", "b"]);
        assert_eq!(split("a.b", '/'), vec!["a.b"]);
        assert!(split("", '.').is_empty());
        assert_eq!(split("a..b", '.'), vec!["a", "", "b"]);
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&["a", "b", "c"], '.'), "a.b.c");
        assert_eq!(join(&["x"], '/'), "x");
        assert_eq!(join::<&str>(&[], '.'), "");
    }

    #[test]
    fn test_child() {
        assert_eq!(child("", "a", '.'), "a");
        assert_eq!(child("a.b", "c", '.'), "a.b.c");
    }

    #[test]
    fn test_split_non_empty_rejects_bad_paths() {
        assert!(split_non_empty("", '.').is_err());
        assert!(split_non_empty("a..b", '.').is_err());
        assert!(split_non_empty(".a", '.').is_err());
        assert!(split_non_empty("a.", '.').is_err());
        assert_eq!(split_non_empty("a.b", '.').unwrap(), vec!["a", "b"]);
    }
}
