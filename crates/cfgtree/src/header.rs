//! The comment header at the top of a saved configuration.

use crate::Configuration;

const COMMENT_PREFIX: char = '#';

/// Extract the leading comment block of `text` as header text.
///
/// Consecutive lines starting with `#` are collected with the marker and
/// surrounding whitespace removed. Collection stops at the first other line.
/// Returns `None` when the text does not start with a comment line.
pub fn parse_header(text: &str) -> Option<String> {
    let lines: Vec<&str> = text
        .lines()
        .map_while(|line| line.strip_prefix(COMMENT_PREFIX))
        .map(str::trim)
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Render header text as comment lines, one `# ` line per input line.
///
/// Empty lines become a bare `#` and trailing empty lines are dropped. The
/// result ends with a newline unless it is empty.
pub fn render_header(header: &str) -> String {
    let lines: Vec<&str> = header.lines().collect();
    let used = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |last| last + 1);

    let mut out = String::new();
    for line in &lines[..used] {
        let line = line.trim_end();
        out.push(COMMENT_PREFIX);
        if !line.is_empty() {
            out.push(' ');
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

impl Configuration {
    /// The header text `save` would write.
    ///
    /// In order of precedence: the explicit header option; the defaults
    /// tree's header when `copy_header` is on; a `key: value` line for each
    /// direct scalar entry of the defaults root. Without defaults and without
    /// an explicit header there is no header.
    pub fn build_header(&self) -> Option<String> {
        if let Some(header) = self.options.header() {
            return Some(header.to_string());
        }

        let defaults = self.defaults.as_deref()?;
        if self.options.copy_header() {
            if let Some(header) = defaults.options.header() {
                return Some(header.to_string());
            }
        }

        let lines: Vec<String> = defaults
            .root()
            .values(false)
            .into_iter()
            .filter_map(|(key, entry)| {
                entry
                    .as_value()
                    .filter(|value| value.is_scalar())
                    .map(|value| format!("{}: {}", key, value))
            })
            .collect();

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}
