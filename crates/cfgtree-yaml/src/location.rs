//! Source locations for YAML parse errors.

use std::fmt;

/// Position of an element in the original YAML text.
///
/// Lines and columns are 1-based so they can be shown to users directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Name of the document, when it came from a named source
    pub file: Option<String>,
    /// 0-based byte index into the text
    pub offset: usize,
    pub line: usize,
    /// Counted in characters
    pub col: usize,
}

impl Location {
    /// Create a location from a yaml-rust2 marker.
    ///
    /// Markers count lines from 1 and columns from 0.
    pub fn from_marker(marker: &yaml_rust2::scanner::Marker) -> Self {
        Self {
            file: None,
            offset: marker.index(),
            line: marker.line(),
            col: marker.col() + 1,
        }
    }

    /// Attach the document name.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            file: None,
            offset: 0,
            line: 1,
            col: 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.col),
            None => write!(f, "line {}, column {}", self.line, self.col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let loc = Location::default();
        assert_eq!(loc.file, None);
        assert_eq!(loc.offset, 0);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.col, 1);
    }

    #[test]
    fn test_display_with_file() {
        let loc = Location {
            file: None,
            offset: 12,
            line: 3,
            col: 7,
        }
        .with_file("config.yml");
        assert_eq!(loc.to_string(), "config.yml:3:7");
    }

    #[test]
    fn test_display_without_file() {
        let loc = Location {
            file: None,
            offset: 0,
            line: 2,
            col: 1,
        };
        assert_eq!(loc.to_string(), "line 2, column 1");
    }
}
