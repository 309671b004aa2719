//! FreeIPA server configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{IpaError, IpaResult};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Server Configuration
// ============================================================================

/// Connection settings for the FreeIPA server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpaConfig {
    /// Server hostname or base URL. A bare hostname gets `https://` prefixed.
    pub server: String,
    /// Account to log in as. Needs user and group administration rights.
    pub username: String,
    /// Whether to verify the server's TLS certificate.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    /// Name of the FreeIPA identity provider reference accounts link to.
    pub idp_name: String,
    /// Usernames on the FreeIPA side to leave alone entirely.
    #[serde(default)]
    pub ignore_users: Vec<String>,
    /// Group names on the FreeIPA side to leave alone entirely.
    #[serde(default)]
    pub ignore_groups: Vec<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for IpaConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            username: String::new(),
            verify_tls: default_verify_tls(),
            idp_name: String::new(),
            ignore_users: Vec::new(),
            ignore_groups: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

const fn default_verify_tls() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl IpaConfig {
    /// Checks that the configuration is complete enough to connect.
    pub fn validate(&self) -> IpaResult<()> {
        if self.server.is_empty() {
            return Err(IpaError::config("server is required"));
        }
        if self.server.starts_with("ldap://") || self.server.starts_with("ldaps://") {
            return Err(IpaError::config(format!(
                "server must be an https endpoint, got '{}'",
                self.server
            )));
        }
        if self.username.is_empty() {
            return Err(IpaError::config("username is required"));
        }
        if self.idp_name.is_empty() {
            return Err(IpaError::config("idp_name is required"));
        }
        Ok(())
    }

    /// Base URL of the server, scheme included, no trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        let server = self.server.trim_end_matches('/');
        if server.starts_with("https://") || server.starts_with("http://") {
            server.to_string()
        } else {
            format!("https://{server}")
        }
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Whether the given username is on the ignore list.
    #[must_use]
    pub fn is_ignored_user(&self, username: &str) -> bool {
        self.ignore_users.iter().any(|u| u == username)
    }

    /// Whether the given group name is on the ignore list.
    #[must_use]
    pub fn is_ignored_group(&self, name: &str) -> bool {
        self.ignore_groups.iter().any(|g| g == name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> IpaConfig {
        IpaConfig {
            server: "ipa.corp.example.com".to_string(),
            username: "admin".to_string(),
            idp_name: "corp-idp".to_string(),
            ..IpaConfig::default()
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
        assert!(valid_config().verify_tls);
        assert_eq!(valid_config().request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn rejects_incomplete_config() {
        let config = IpaConfig {
            idp_name: String::new(),
            ..valid_config()
        };
        assert!(config.validate().is_err());

        let config = IpaConfig {
            server: "ldaps://ipa.corp.example.com".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn base_url_normalization() {
        let config = valid_config();
        assert_eq!(config.base_url(), "https://ipa.corp.example.com");

        let config = IpaConfig {
            server: "https://ipa.corp.example.com/".to_string(),
            ..valid_config()
        };
        assert_eq!(config.base_url(), "https://ipa.corp.example.com");

        let config = IpaConfig {
            server: "http://ipa.test.local".to_string(),
            ..valid_config()
        };
        assert_eq!(config.base_url(), "http://ipa.test.local");
    }
}
