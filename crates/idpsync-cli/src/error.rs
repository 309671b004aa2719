//! CLI error type.

use idpsync_engine::{ApplyError, LoadError};
use idpsync_freeipa::IpaError;
use idpsync_ldap::LdapError;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Anything that can abort a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file is missing or unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Directory-side failure.
    #[error(transparent)]
    Ldap(#[from] LdapError),

    /// FreeIPA-side failure.
    #[error(transparent)]
    Ipa(#[from] IpaError),

    /// A snapshot could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A plan action could not be applied.
    #[error(transparent)]
    Apply(#[from] ApplyError),

    /// Terminal or file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_message() {
        let err = CliError::config("no such file: idpsync.toml");
        assert_eq!(err.to_string(), "configuration error: no such file: idpsync.toml");
    }

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err = CliError::from(LdapError::config("url is required"));
        assert_eq!(err.to_string(), "LDAP configuration error: url is required");

        let err = CliError::from(LoadError::connection("refused"));
        assert_eq!(err.to_string(), "connection failed: refused");
    }
}
