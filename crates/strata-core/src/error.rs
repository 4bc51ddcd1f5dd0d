//! Error types for strata operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for strata operations
pub type Result<T> = std::result::Result<T, StrataError>;

/// Main error type for strata operations
#[derive(Error, Debug)]
pub enum StrataError {
    /// No valid session could be found
    #[error("not authenticated: {0}")]
    Auth(String),

    /// A remote API call failed (transport, HTTP status or GraphQL error)
    #[error("remote {operation} failed: {message}")]
    Remote { operation: String, message: String },

    /// An explicit target reference did not resolve
    #[error("service '{name}' not found in local targets")]
    ServiceNotFound { name: String },

    /// Cluster name is neither built in nor configured
    #[error("unknown cluster '{name}'")]
    UnknownCluster { name: String },

    /// Persisted config could not be parsed
    #[error("failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// IO error
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File watcher could not be set up
    #[error("file watcher error: {0}")]
    Watch(String),
}

impl StrataError {
    pub(crate) fn remote(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from the remote API.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}
