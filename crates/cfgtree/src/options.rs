//! Parsing and formatting options for a configuration tree.

use crate::{Error, Result};

/// Smallest accepted indentation width.
pub const MIN_INDENT: usize = 2;

/// Largest accepted indentation width.
pub const MAX_INDENT: usize = 9;

/// Options affecting path resolution, defaults and the saved text.
///
/// Options belong to the tree's root [`Configuration`](crate::Configuration);
/// every section of the tree resolves paths with the root's separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOptions {
    pub(crate) path_separator: char,
    copy_defaults: bool,
    header: Option<String>,
    copy_header: bool,
    indent: usize,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            path_separator: '.',
            copy_defaults: false,
            header: None,
            copy_header: true,
            indent: 2,
        }
    }
}

impl ConfigOptions {
    /// The character separating path segments (default `.`).
    pub fn path_separator(&self) -> char {
        self.path_separator
    }

    /// Change the path separator.
    ///
    /// Paths already computed with the previous separator are not rewritten;
    /// do not mix separators within one tree.
    ///
    /// # Errors
    ///
    /// Whitespace and control characters are rejected.
    pub fn set_path_separator(&mut self, separator: char) -> Result<&mut Self> {
        if separator.is_whitespace() || separator.is_control() {
            return Err(Error::invalid_argument(format!(
                "path separator must be a visible character, got {:?}",
                separator
            )));
        }
        self.path_separator = separator;
        Ok(self)
    }

    /// Whether key/value enumeration includes values from the defaults tree.
    pub fn copy_defaults(&self) -> bool {
        self.copy_defaults
    }

    pub fn set_copy_defaults(&mut self, value: bool) -> &mut Self {
        self.copy_defaults = value;
        self
    }

    /// The comment header written at the top of the saved text.
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn set_header(&mut self, header: Option<String>) -> &mut Self {
        self.header = header;
        self
    }

    /// Whether the defaults tree's header is used when no header is set.
    pub fn copy_header(&self) -> bool {
        self.copy_header
    }

    pub fn set_copy_header(&mut self, value: bool) -> &mut Self {
        self.copy_header = value;
        self
    }

    /// Spaces per nesting level in the saved text.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Change the indentation width.
    ///
    /// # Errors
    ///
    /// Values outside `2..=9` are rejected, never clamped.
    pub fn set_indent(&mut self, indent: usize) -> Result<&mut Self> {
        if !(MIN_INDENT..=MAX_INDENT).contains(&indent) {
            return Err(Error::invalid_argument(format!(
                "indent must be between {} and {}, got {}",
                MIN_INDENT, MAX_INDENT, indent
            )));
        }
        self.indent = indent;
        Ok(self)
    }
}
