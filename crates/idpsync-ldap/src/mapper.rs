//! Shapes directory entries into model records.

use idpsync_engine::LoadError;
use idpsync_model::{auth_types, Group, User};

use crate::config::LdapConfig;
use crate::search::LdapEntry;

// ============================================================================
// Entry Mapper
// ============================================================================

/// Maps raw directory entries to [`User`] and [`Group`] records.
///
/// Skipping is part of the mapping: entries without the key attribute are
/// treated as structural (organizational units and the like), and ignore-list
/// matches are dropped here. Both cases come back as `Ok(None)`.
#[derive(Debug, Clone)]
pub struct EntryMapper {
    config: LdapConfig,
    idp_name: String,
}

impl EntryMapper {
    /// Creates a mapper over the given directory configuration.
    ///
    /// `idp_name` is the FreeIPA identity provider reference every mapped
    /// account gets linked to.
    pub fn new(config: LdapConfig, idp_name: impl Into<String>) -> Self {
        Self {
            config,
            idp_name: idp_name.into(),
        }
    }

    /// Maps one user entry.
    ///
    /// The raw username keeps its place as the provider subject while the
    /// canonical login drops any `@domain` suffix. Ignore lists match the raw
    /// value, before stripping.
    pub fn map_user(&self, entry: &LdapEntry) -> Result<Option<User>, LoadError> {
        let attrs = &self.config.attributes;
        let Some(raw_username) = entry.get_attr(&attrs.username) else {
            tracing::trace!(dn = %entry.dn, "entry has no username attribute, skipping");
            return Ok(None);
        };
        if self.config.is_ignored_user(raw_username) {
            tracing::debug!(user = %raw_username, "user is on the ignore list, skipping");
            return Ok(None);
        }

        let display_name = self.required(entry, &attrs.display_name)?;
        let family_name = self.required(entry, &attrs.family_name)?;
        let given_name = entry.get_attr(&attrs.given_name).unwrap_or_default();
        let active_raw = self.required(entry, &attrs.active)?;
        let active = attrs.active_values.iter().any(|v| v == active_raw);

        let mut user = User::new(local_part(raw_username))
            .with_display_name(display_name)
            .with_given_name(given_name)
            .with_family_name(family_name)
            .with_active(active)
            .with_auth_type(auth_types::IDP)
            .with_idp(self.idp_name.as_str(), raw_username);
        if let Some(attr) = &attrs.email {
            if let Some(value) = entry.get_attr(attr) {
                user = user.with_email(value);
            }
        }
        if let Some(attr) = &attrs.numeric_id {
            if let Some(value) = entry.get_attr(attr) {
                user = user.with_numeric_id(value);
            }
        }
        if let Some(attr) = &attrs.shell {
            if let Some(value) = entry.get_attr(attr) {
                user = user.with_shell(value);
            }
        }
        Ok(Some(user))
    }

    /// Maps one group entry.
    ///
    /// Member references are reduced to the first RDN value and then
    /// canonicalized like usernames. References to ignored users are dropped;
    /// references to unknown accounts are the loader's problem, the mapper
    /// keeps them.
    pub fn map_group(&self, entry: &LdapEntry) -> Result<Option<Group>, LoadError> {
        let attrs = &self.config.attributes;
        let Some(name) = entry.get_attr(&attrs.group_name) else {
            tracing::trace!(dn = %entry.dn, "entry has no group name attribute, skipping");
            return Ok(None);
        };
        if self.config.is_ignored_group(name) {
            tracing::debug!(group = %name, "group is on the ignore list, skipping");
            return Ok(None);
        }

        let mut group = Group::new(name);
        if let Some(attr) = &attrs.group_description {
            if let Some(value) = entry.get_attr(attr) {
                group = group.with_description(value);
            }
        }
        if let Some(values) = entry.get_attrs(&attrs.group_members) {
            for value in values {
                let member = member_name(value);
                if member.is_empty() || self.config.is_ignored_user(member) {
                    continue;
                }
                group.members.insert(local_part(member).to_string());
            }
        }
        Ok(Some(group))
    }

    fn required<'a>(&self, entry: &'a LdapEntry, attribute: &str) -> Result<&'a str, LoadError> {
        entry
            .get_attr(attribute)
            .ok_or_else(|| LoadError::missing_attribute(&entry.dn, attribute))
    }
}

/// Canonical short form of a directory username.
fn local_part(username: &str) -> &str {
    username.split('@').next().unwrap_or(username)
}

/// Extracts the member name from a member reference.
///
/// References are usually DNs (`uid=alice,ou=people,...`), where the first
/// RDN value is the name. Plain values without `=` are taken as-is, which
/// covers memberUid-style attributes.
fn member_name(value: &str) -> &str {
    let first_rdn = value.split(',').next().unwrap_or(value);
    match first_rdn.split_once('=') {
        Some((_, rdn_value)) => rdn_value,
        None => first_rdn,
    }
}

// ============================================================================
// Tests
// ============================================================================
