//! FreeIPA snapshot loading.

use idpsync_engine::{LoadError, SnapshotLoader};
use idpsync_model::{auth_types, Group, Snapshot, User};
use serde_json::Value;

use crate::client::IpaClient;
use crate::config::IpaConfig;

// ============================================================================
// FreeIPA Loader
// ============================================================================

/// Loads the current account state from FreeIPA.
pub struct IpaLoader {
    client: IpaClient,
    config: IpaConfig,
}

impl IpaLoader {
    /// Creates a loader over a logged-in client.
    pub fn new(client: IpaClient, config: IpaConfig) -> Self {
        Self { client, config }
    }
}

impl SnapshotLoader for IpaLoader {
    fn source_name(&self) -> &'static str {
        "freeipa"
    }

    async fn load(&mut self) -> Result<Snapshot, LoadError> {
        let mut builder = Snapshot::builder();

        let rows = self.client.user_find().await?;
        for row in &rows {
            let user = map_user_row(row)?;
            if self.config.is_ignored_user(&user.username) {
                tracing::debug!(user = %user.username, "user is on the ignore list, skipping");
                continue;
            }
            builder.add_user(user)?;
        }

        let rows = self.client.group_find().await?;
        for row in &rows {
            let group = map_group_row(row, &self.config)?;
            if self.config.is_ignored_group(&group.name) {
                tracing::debug!(group = %group.name, "group is on the ignore list, skipping");
                continue;
            }
            builder.add_group(group)?;
        }

        let snapshot = builder.build();
        tracing::info!(
            source = self.source_name(),
            users = snapshot.user_count(),
            groups = snapshot.group_count(),
            "FreeIPA snapshot loaded"
        );
        Ok(snapshot)
    }
}

// ============================================================================
// Row Mapping
// ============================================================================

/// Shapes one `user_find` row into a [`User`].
///
/// FreeIPA wraps most attributes in single-element lists; scalars are accepted
/// too. Accounts without an authentication type count as password accounts,
/// and a missing `nsaccountlock` means the account is enabled.
fn map_user_row(row: &Value) -> Result<User, LoadError> {
    let username = required_string(row, "uid", "user entry")?;
    let display_name = required_string(row, "cn", &username)?;
    let family_name = required_string(row, "sn", &username)?;
    let numeric_id = required_string(row, "uidnumber", &username)?;
    let given_name = first_string(row, "givenname").unwrap_or_default();
    let auth_type =
        first_string(row, "ipauserauthtype").unwrap_or_else(|| auth_types::PASSWORD.to_string());
    let idp_name = first_string(row, "ipaidpconfiglink").unwrap_or_default();
    let idp_subject = first_string(row, "ipaidpsub").unwrap_or_default();
    let locked = first_bool(row, "nsaccountlock").unwrap_or(false);

    let mut user = User::new(username)
        .with_display_name(display_name)
        .with_given_name(given_name)
        .with_family_name(family_name)
        .with_numeric_id(numeric_id)
        .with_active(!locked)
        .with_auth_type(auth_type)
        .with_idp(idp_name, idp_subject);
    if let Some(email) = first_string(row, "mail") {
        user = user.with_email(email);
    }
    if let Some(shell) = first_string(row, "loginshell") {
        user = user.with_shell(shell);
    }
    Ok(user)
}

/// Shapes one `group_find` row into a [`Group`].
///
/// Ignored users never appear as members, matching how the directory side
/// leaves them out of its snapshot.
fn map_group_row(row: &Value, config: &IpaConfig) -> Result<Group, LoadError> {
    let name = required_string(row, "cn", "group entry")?;
    let mut group = Group::new(name);
    if let Some(description) = first_string(row, "description") {
        group = group.with_description(description);
    }
    for member in string_list(row, "member_user") {
        if config.is_ignored_user(&member) {
            continue;
        }
        group.members.insert(member);
    }
    Ok(group)
}

// ============================================================================
// JSON Helpers
// ============================================================================

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn first_string(row: &Value, key: &str) -> Option<String> {
    match row.get(key) {
        Some(Value::Array(values)) => values.first().and_then(scalar_string),
        Some(value) => scalar_string(value),
        None => None,
    }
}

fn required_string(row: &Value, key: &str, entity: &str) -> Result<String, LoadError> {
    first_string(row, key).ok_or_else(|| LoadError::missing_attribute(entity, key))
}

fn first_bool(row: &Value, key: &str) -> Option<bool> {
    match row.get(key) {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => Some(s.eq_ignore_ascii_case("true")),
        Some(Value::Array(values)) => match values.first() {
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::String(s)) => Some(s.eq_ignore_ascii_case("true")),
            _ => None,
        },
        _ => None,
    }
}

fn string_list(row: &Value, key: &str) -> Vec<String> {
    row.get(key)
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(scalar_string).collect())
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_row() -> Value {
        json!({
            "uid": ["jdoe"],
            "cn": ["John Doe"],
            "givenname": ["John"],
            "sn": ["Doe"],
            "mail": ["john.doe@example.com"],
            "uidnumber": ["12001"],
            "gidnumber": ["12001"],
            "loginshell": ["/bin/bash"],
            "ipauserauthtype": ["idp"],
            "ipaidpconfiglink": ["corp-idp"],
            "ipaidpsub": ["jdoe@corp.example.com"],
            "nsaccountlock": false,
        })
    }

    #[test]
    fn maps_full_user_row() {
        let user = map_user_row(&user_row()).unwrap();
        assert_eq!(user.username, "jdoe");
        assert_eq!(user.display_name, "John Doe");
        assert_eq!(user.family_name, "Doe");
        assert_eq!(user.numeric_id.as_deref(), Some("12001"));
        assert_eq!(user.shell.as_deref(), Some("/bin/bash"));
        assert_eq!(user.auth_type, "idp");
        assert_eq!(user.idp_subject, "jdoe@corp.example.com");
        assert!(user.active);
    }

    #[test]
    fn defaults_for_absent_attributes() {
        let row = json!({
            "uid": ["legacy"],
            "cn": ["Legacy Account"],
            "sn": ["Account"],
            "uidnumber": ["500"],
        });
        let user = map_user_row(&row).unwrap();
        assert_eq!(user.given_name, "");
        assert_eq!(user.auth_type, auth_types::PASSWORD);
        assert_eq!(user.idp_name, "");
        assert!(user.email.is_none());
        assert!(user.shell.is_none());
        // No nsaccountlock means not locked.
        assert!(user.active);
    }

    #[test]
    fn locked_account_is_inactive() {
        let mut row = user_row();
        row["nsaccountlock"] = json!(["TRUE"]);
        let user = map_user_row(&row).unwrap();
        assert!(!user.active);

        row["nsaccountlock"] = json!(true);
        assert!(!map_user_row(&row).unwrap().active);
    }

    #[test]
    fn missing_required_attribute_fails() {
        let row = json!({ "uid": ["jdoe"], "cn": ["John Doe"], "sn": ["Doe"] });
        let err = map_user_row(&row).unwrap_err();
        assert!(err.to_string().contains("uidnumber"));
        assert!(err.to_string().contains("jdoe"));
    }

    #[test]
    fn maps_group_row() {
        let row = json!({
            "cn": ["developers"],
            "description": ["Development team"],
            "member_user": ["alice", "bob"],
        });
        let group = map_group_row(&row, &IpaConfig::default()).unwrap();
        assert_eq!(group.name, "developers");
        assert_eq!(group.description.as_deref(), Some("Development team"));
        assert_eq!(group.members.len(), 2);
    }

    #[test]
    fn group_row_filters_ignored_members() {
        let config = IpaConfig {
            ignore_users: vec!["admin".to_string()],
            ..IpaConfig::default()
        };
        let row = json!({
            "cn": ["developers"],
            "member_user": ["admin", "alice"],
        });
        let group = map_group_row(&row, &config).unwrap();
        assert!(!group.has_member("admin"));
        assert!(group.has_member("alice"));
        assert!(group.description.is_none());
    }

    #[test]
    fn scalar_and_list_values_are_equivalent() {
        let row = json!({
            "uid": "jdoe",
            "cn": "John Doe",
            "sn": "Doe",
            "uidnumber": 12001,
        });
        let user = map_user_row(&row).unwrap();
        assert_eq!(user.username, "jdoe");
        assert_eq!(user.numeric_id.as_deref(), Some("12001"));
    }
}
