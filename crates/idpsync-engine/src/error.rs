//! Errors raised while loading snapshots.

use idpsync_model::SnapshotError;
use thiserror::Error;

// ============================================================================
// Load Errors
// ============================================================================

/// Failure while fetching or shaping one system's snapshot.
///
/// Backend crates map their transport errors into these variants, so callers
/// can treat both loaders uniformly.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Could not reach or authenticate against the backend.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The backend rejected or failed a query.
    #[error("query failed: {0}")]
    Query(String),

    /// An entry is missing an attribute the mapping requires.
    #[error("entry '{entity}' is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Identifier of the offending entry.
        entity: String,
        /// Name of the absent attribute.
        attribute: String,
    },

    /// An entry or response could not be interpreted.
    #[error("malformed entry '{entity}': {message}")]
    Malformed {
        /// Identifier of the offending entry.
        entity: String,
        /// What was wrong with it.
        message: String,
    },

    /// The shaped records did not form a valid snapshot.
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl LoadError {
    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Creates a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Creates a missing-attribute error.
    pub fn missing_attribute(entity: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            entity: entity.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates a malformed-entry error.
    pub fn malformed(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Whether the failure happened before any data was read.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
