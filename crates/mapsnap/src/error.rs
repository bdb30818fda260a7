//! Error types for opening mapping sources.

use std::path::PathBuf;

use mapsnap_core::error::SnapshotError;

/// Errors that can occur while turning a connection URL into a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The URL does not start with a known mapping-source scheme.
    #[error("Unsupported connection URL '{0}'")]
    UnsupportedUrl(String),

    /// The URL names a scheme but no mapping path.
    #[error("Connection URL '{0}' has no mapping path")]
    EmptyPath(String),

    /// The mapping document could not be read.
    #[error("Cannot read mapping document '{path}': {source}")]
    Io {
        /// Path to the mapping document.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The mapping document is not valid JSON or has the wrong shape.
    #[error("Invalid mapping document '{path}': {source}")]
    Document {
        /// Path to the mapping document.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The configured dialect is not known.
    #[error("Unknown dialect '{0}'")]
    UnknownDialect(String),

    /// The configured physical naming strategy is not known.
    #[error("Unknown physical naming strategy '{0}'")]
    UnknownNamingStrategy(String),

    /// A registered mapping factory failed.
    #[error("Mapping factory '{name}' failed: {message}")]
    Factory {
        /// Name the factory is registered under.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// Snapshot resolution failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Result type for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;
