//! Configuration file handling.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use idpsync_freeipa::IpaConfig;
use idpsync_ldap::LdapConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

// ============================================================================
// Output Format
// ============================================================================

/// How command results are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored text.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

// ============================================================================
// Sync Configuration
// ============================================================================

/// The complete configuration file: one directory, one FreeIPA server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directory (source) settings.
    pub ldap: LdapConfig,
    /// FreeIPA (target) settings.
    pub freeipa: IpaConfig,
}

impl SyncConfig {
    /// Reads and parses the configuration file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read '{}': {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| {
            CliError::config(format!("cannot parse '{}': {e}", path.display()))
        })?;
        Ok(config)
    }

    /// Validates both halves of the configuration.
    pub fn validate(&self) -> CliResult<()> {
        self.ldap.validate()?;
        self.freeipa.validate()?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [ldap]
        url = "ldaps://ldap.corp.example.com"
        bind_dn = "cn=reader,dc=corp,dc=example,dc=com"
        user_base = "ou=people,dc=corp,dc=example,dc=com"
        group_base = "ou=groups,dc=corp,dc=example,dc=com"
        ignore_users = ["svc-bot@corp.example.com"]

        [ldap.attributes]
        email = "mail"
        active = "employeeStatus"
        active_values = ["active"]

        [freeipa]
        server = "ipa.corp.example.com"
        username = "admin"
        idp_name = "corp-idp"
        ignore_users = ["admin"]
        ignore_groups = ["admins", "trust admins"]
    "#;

    #[test]
    fn loads_sample_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = SyncConfig::load(file.path()).unwrap();
        assert_eq!(config.ldap.url, "ldaps://ldap.corp.example.com");
        assert_eq!(config.ldap.attributes.email.as_deref(), Some("mail"));
        assert_eq!(config.ldap.attributes.username, "uid");
        assert_eq!(config.freeipa.idp_name, "corp-idp");
        assert!(config.freeipa.verify_tls);
        assert!(config.freeipa.is_ignored_group("trust admins"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = SyncConfig::load(Path::new("/nonexistent/idpsync.toml")).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("/nonexistent/idpsync.toml"));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[ldap\nurl = ").unwrap();
        let err = SyncConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn output_format_parses_from_serde() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
