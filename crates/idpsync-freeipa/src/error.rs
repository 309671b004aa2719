//! FreeIPA error types.

use idpsync_engine::LoadError;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Failures talking to the FreeIPA server.
#[derive(Debug, Error)]
pub enum IpaError {
    /// The server configuration is unusable.
    #[error("FreeIPA configuration error: {0}")]
    Configuration(String),

    /// The session login was rejected.
    #[error("FreeIPA login failed ({status}): {reason}")]
    Login {
        /// HTTP status of the login response.
        status: u16,
        /// Rejection reason reported by the server.
        reason: String,
    },

    /// The API answered with a non-success HTTP status.
    #[error("FreeIPA API error ({status}): {message}")]
    Api {
        /// HTTP status of the response.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// The API executed the call and reported a failure.
    #[error("FreeIPA {name} ({code}): {message}")]
    Rpc {
        /// FreeIPA error code.
        code: i64,
        /// FreeIPA error class name.
        name: String,
        /// Error message from the server.
        message: String,
    },

    /// The response envelope did not have the expected shape.
    #[error("unexpected FreeIPA response: {0}")]
    Decode(String),

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl IpaError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Whether the server rejected our credentials.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Login { .. })
    }

    /// Whether the server reported a missing entry (FreeIPA code 4001).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Rpc { code: 4001, .. })
    }
}

impl From<IpaError> for LoadError {
    fn from(err: IpaError) -> Self {
        let message = err.to_string();
        match err {
            IpaError::Configuration(_) | IpaError::Login { .. } | IpaError::Http(_) => {
                Self::Connection(message)
            }
            IpaError::Api { .. } | IpaError::Rpc { .. } => Self::Query(message),
            IpaError::Decode(detail) => Self::malformed("freeipa response", detail),
        }
    }
}

/// Result alias for FreeIPA operations.
pub type IpaResult<T> = Result<T, IpaError>;

// ============================================================================
// Tests
// ============================================================================
