//! Error types for configuration operations.

use thiserror::Error;

/// Result type alias for cfgtree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, loading or saving a configuration.
///
/// Lookup misses are not errors: accessors return `None` or a caller-supplied
/// default instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A call violated an argument constraint (empty path, indent out of range, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The configuration text could not be parsed or is not a mapping.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
        #[source]
        source: Option<cfgtree_yaml::Error>,
    },

    /// A section was required at a path that holds no section.
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// `load` or `save` was called on a configuration without a backing store.
    #[error("Configuration is not bound to a backing store")]
    NoBackingStore,

    /// The backing store could not be read or written.
    #[error("I/O error on {store}: {source}")]
    Io {
        store: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Whether this error comes from malformed or non-mapping configuration text.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Error::InvalidConfiguration { .. })
    }
}

impl From<cfgtree_yaml::Error> for Error {
    fn from(err: cfgtree_yaml::Error) -> Self {
        Error::InvalidConfiguration {
            message: err.to_string(),
            source: Some(err),
        }
    }
}
