//! LDAP error types.

use idpsync_engine::LoadError;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Failures talking to the directory.
#[derive(Debug, Error)]
pub enum LdapError {
    /// The directory configuration is unusable.
    #[error("LDAP configuration error: {0}")]
    Configuration(String),

    /// Could not establish a connection.
    #[error("LDAP connection failed: {0}")]
    Connection(String),

    /// The bind was rejected.
    #[error("LDAP bind failed: {0}")]
    Bind(String),

    /// A search did not complete.
    #[error("LDAP search failed: {0}")]
    Search(String),

    /// Protocol-level failure from the client library.
    #[error("LDAP protocol error: {0}")]
    Protocol(#[from] ldap3::LdapError),
}

impl LdapError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Whether the directory was never reached.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Bind(_))
    }
}

impl From<LdapError> for LoadError {
    fn from(err: LdapError) -> Self {
        let message = err.to_string();
        match err {
            LdapError::Configuration(_) | LdapError::Connection(_) | LdapError::Bind(_) => {
                Self::Connection(message)
            }
            LdapError::Search(_) | LdapError::Protocol(_) => Self::Query(message),
        }
    }
}

/// Result alias for directory operations.
pub type LdapResult<T> = Result<T, LdapError>;

// ============================================================================
// Tests
// ============================================================================
