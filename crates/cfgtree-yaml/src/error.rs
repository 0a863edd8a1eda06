//! Error types for YAML parsing.

use crate::Location;
use thiserror::Error;

/// Result type alias for cfgtree-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during YAML parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// YAML syntax error reported by the scanner
    #[error("Parse error at {location}: {message}")]
    ParseError { message: String, location: Location },

    /// Well-formed YAML that cannot be represented as an ordered tree
    #[error("Invalid YAML structure at {location}: {message}")]
    InvalidStructure { message: String, location: Location },
}

impl Error {
    /// The location the error points at.
    pub fn location(&self) -> &Location {
        match self {
            Error::ParseError { location, .. } | Error::InvalidStructure { location, .. } => {
                location
            }
        }
    }

    /// Attach a filename to the error location.
    pub fn with_file(self, file: &str) -> Self {
        match self {
            Error::ParseError { message, location } => Error::ParseError {
                message,
                location: location.with_file(file),
            },
            Error::InvalidStructure { message, location } => Error::InvalidStructure {
                message,
                location: location.with_file(file),
            },
        }
    }
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::ParseError {
            message: err.info().to_string(),
            location: Location::from_marker(err.marker()),
        }
    }
}
