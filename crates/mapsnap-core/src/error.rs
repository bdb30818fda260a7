//! Error types for snapshot resolution.
//!
//! A mapping object that cannot be found is not an error: generators report
//! it through [`Resolution`](crate::generator::Resolution). Errors here abort
//! the whole snapshot.

use crate::model::ObjectType;

/// Boxed cause kept on configuration failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while resolving a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The metadata provider cannot be queried.
    #[error("Mapping metadata is unavailable: {message}")]
    Configuration {
        /// What the provider was asked for.
        message: String,
        /// The originating cause, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// Two generators claim to be the default resolver for the same type.
    #[error(
        "Object type {object_type} has more than one default resolver: '{first}' and '{second}'"
    )]
    AmbiguousBinding {
        /// The contested object type.
        object_type: ObjectType,
        /// The generator registered first.
        first: &'static str,
        /// The generator that tried to register second.
        second: &'static str,
    },

    /// A child object was attached to a parent that cannot own it.
    #[error("A {child} cannot be added to a {parent}")]
    InvalidNesting {
        /// Type of the receiving object.
        parent: ObjectType,
        /// Type of the rejected child.
        child: ObjectType,
    },
}

impl SnapshotError {
    /// Creates a configuration error without an underlying cause.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a configuration error wrapping the originating cause.
    #[must_use]
    pub fn configuration_caused_by(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Result type for snapshot operations.
pub type Result<T> = std::result::Result<T, SnapshotError>;
