//! Directory connection and attribute mapping configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LdapError, LdapResult};

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Attribute Mapping
// ============================================================================

/// Which directory attributes feed which account fields.
///
/// Optional entries (`email`, `numeric_id`, `shell`, `group_description`)
/// switch the corresponding field to managed when set; left unset, the target
/// side keeps whatever it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMap {
    /// Attribute carrying the login name.
    #[serde(default = "default_username_attr")]
    pub username: String,
    /// Attribute carrying the display name.
    #[serde(default = "default_display_name_attr")]
    pub display_name: String,
    /// Attribute carrying the given name.
    #[serde(default = "default_given_name_attr")]
    pub given_name: String,
    /// Attribute carrying the family name.
    #[serde(default = "default_family_name_attr")]
    pub family_name: String,
    /// Attribute carrying the mail address, if managed.
    #[serde(default)]
    pub email: Option<String>,
    /// Attribute carrying the numeric uid/gid, if managed.
    #[serde(default)]
    pub numeric_id: Option<String>,
    /// Attribute carrying the login shell, if managed.
    #[serde(default)]
    pub shell: Option<String>,
    /// Attribute carrying the account state. Always required.
    #[serde(default)]
    pub active: String,
    /// Raw values of the state attribute that mean "enabled".
    #[serde(default)]
    pub active_values: Vec<String>,
    /// Attribute carrying the group name.
    #[serde(default = "default_group_name_attr")]
    pub group_name: String,
    /// Attribute carrying the group description, if managed.
    #[serde(default)]
    pub group_description: Option<String>,
    /// Attribute carrying member references.
    #[serde(default = "default_group_members_attr")]
    pub group_members: String,
}

impl Default for AttributeMap {
    fn default() -> Self {
        Self {
            username: default_username_attr(),
            display_name: default_display_name_attr(),
            given_name: default_given_name_attr(),
            family_name: default_family_name_attr(),
            email: None,
            numeric_id: None,
            shell: None,
            active: String::new(),
            active_values: Vec::new(),
            group_name: default_group_name_attr(),
            group_description: None,
            group_members: default_group_members_attr(),
        }
    }
}

fn default_username_attr() -> String {
    "uid".to_string()
}

fn default_display_name_attr() -> String {
    "cn".to_string()
}

fn default_given_name_attr() -> String {
    "givenName".to_string()
}

fn default_family_name_attr() -> String {
    "sn".to_string()
}

fn default_group_name_attr() -> String {
    "cn".to_string()
}

fn default_group_members_attr() -> String {
    "member".to_string()
}

// ============================================================================
// Directory Configuration
// ============================================================================

/// Connection settings for the identity provider's directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LdapConfig {
    /// Directory URL, `ldap://` or `ldaps://`.
    pub url: String,
    /// DN to bind as.
    pub bind_dn: String,
    /// Bind password. Prompted for when absent.
    #[serde(default, skip_serializing)]
    pub bind_password: Option<String>,
    /// Subtree that holds user entries.
    pub user_base: String,
    /// Subtree that holds group entries.
    pub group_base: String,
    /// Raw directory usernames to leave alone entirely.
    #[serde(default)]
    pub ignore_users: Vec<String>,
    /// Group names to leave alone entirely.
    #[serde(default)]
    pub ignore_groups: Vec<String>,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Attribute mapping for users and groups.
    #[serde(default)]
    pub attributes: AttributeMap,
}

impl Default for LdapConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            bind_dn: String::new(),
            bind_password: None,
            user_base: String::new(),
            group_base: String::new(),
            ignore_users: Vec::new(),
            ignore_groups: Vec::new(),
            connect_timeout_secs: default_connect_timeout(),
            attributes: AttributeMap::default(),
        }
    }
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl LdapConfig {
    /// Checks that the configuration is complete enough to connect and map.
    pub fn validate(&self) -> LdapResult<()> {
        if self.url.is_empty() {
            return Err(LdapError::config("url is required"));
        }
        if !self.url.starts_with("ldap://") && !self.url.starts_with("ldaps://") {
            return Err(LdapError::config(format!(
                "url must start with ldap:// or ldaps://, got '{}'",
                self.url
            )));
        }
        if self.bind_dn.is_empty() {
            return Err(LdapError::config("bind_dn is required"));
        }
        if self.user_base.is_empty() {
            return Err(LdapError::config("user_base is required"));
        }
        if self.group_base.is_empty() {
            return Err(LdapError::config("group_base is required"));
        }
        let attrs = &self.attributes;
        for (value, name) in [
            (&attrs.username, "attributes.username"),
            (&attrs.display_name, "attributes.display_name"),
            (&attrs.given_name, "attributes.given_name"),
            (&attrs.family_name, "attributes.family_name"),
            (&attrs.group_name, "attributes.group_name"),
            (&attrs.group_members, "attributes.group_members"),
        ] {
            if value.is_empty() {
                return Err(LdapError::config(format!("{name} must not be empty")));
            }
        }
        if attrs.active.is_empty() {
            return Err(LdapError::config(
                "attributes.active must name the attribute that carries account state",
            ));
        }
        if attrs.active_values.is_empty() {
            return Err(LdapError::config(
                "attributes.active_values must list at least one enabled value",
            ));
        }
        Ok(())
    }

    /// Connect timeout as a [`Duration`].
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Whether the given raw directory username is on the ignore list.
    #[must_use]
    pub fn is_ignored_user(&self, raw_username: &str) -> bool {
        self.ignore_users.iter().any(|u| u == raw_username)
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

    fn valid_config() -> LdapConfig {
        LdapConfig {
            url: "ldaps://ldap.corp.example.com".to_string(),
            bind_dn: "cn=reader,dc=corp,dc=example,dc=com".to_string(),
            user_base: "ou=people,dc=corp,dc=example,dc=com".to_string(),
            group_base: "ou=groups,dc=corp,dc=example,dc=com".to_string(),
            attributes: AttributeMap {
                active: "employeeStatus".to_string(),
                active_values: vec!["active".to_string()],
                ..AttributeMap::default()
            },
            ..LdapConfig::default()
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_bad_scheme() {
        let config = LdapConfig {
            url: "http://ldap.corp.example.com".to_string(),
            ..valid_config()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ldap://"));
    }

    #[test]
    fn rejects_missing_bases() {
        let config = LdapConfig {
            group_base: String::new(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unset_active_mapping() {
        let mut config = valid_config();
        config.attributes.active = String::new();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.attributes.active_values.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_defaults_apply() {
        let config: LdapConfig = toml::from_str(
            r#"
            url = "ldap://ldap.corp.example.com"
            bind_dn = "cn=reader,dc=corp,dc=example,dc=com"
            user_base = "ou=people,dc=corp,dc=example,dc=com"
            group_base = "ou=groups,dc=corp,dc=example,dc=com"

            [attributes]
            active = "employeeStatus"
            active_values = ["active", "onboarding"]
            "#,
        )
        .unwrap();

        assert_eq!(config.attributes.username, "uid");
        assert_eq!(config.attributes.group_members, "member");
        assert_eq!(config.connect_timeout_secs, 10);
        assert!(config.ignore_users.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ignore_lists_match_exactly() {
        let mut config = valid_config();
        config.ignore_users.push("svc-bot@corp.example.com".to_string());
        config.ignore_groups.push("wheel".to_string());
        assert!(config.is_ignored_user("svc-bot@corp.example.com"));
        assert!(!config.is_ignored_user("svc-bot"));
        assert!(config.is_ignored_group("wheel"));
    }

    #[test]
    fn password_is_not_serialized() {
        let mut config = valid_config();
        config.bind_password = Some("secret".to_string());
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("secret"));
    }
}
