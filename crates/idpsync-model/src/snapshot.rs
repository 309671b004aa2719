//! Point-in-time account state of one system.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Group, User};

// ============================================================================
// Errors
// ============================================================================

/// Rejected input while assembling a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Two user records carried the same canonical username.
    #[error("duplicate user '{0}' in snapshot")]
    DuplicateUser(String),

    /// Two group records carried the same name.
    #[error("duplicate group '{0}' in snapshot")]
    DuplicateGroup(String),

    /// A user record carried an empty username.
    #[error("user with empty username in snapshot")]
    EmptyUsername,

    /// A group record carried an empty name.
    #[error("group with empty name in snapshot")]
    EmptyGroupName,
}

// ============================================================================
// Snapshot
// ============================================================================

/// The complete user and group state of one system at load time.
///
/// Entries are keyed by canonical name, so lookups are cheap and iteration
/// order is deterministic. Snapshots are immutable once built; use
/// [`Snapshot::builder`] to assemble one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    users: BTreeMap<String, User>,
    groups: BTreeMap<String, Group>,
}

impl Snapshot {
    /// Starts building a snapshot.
    #[must_use]
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    /// All users, sorted by username.
    #[must_use]
    pub const fn users(&self) -> &BTreeMap<String, User> {
        &self.users
    }

    /// All groups, sorted by name.
    #[must_use]
    pub const fn groups(&self) -> &BTreeMap<String, Group> {
        &self.groups
    }

    /// Looks up one user by canonical username.
    #[must_use]
    pub fn user(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    /// Looks up one group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Whether a user with the given canonical username exists.
    #[must_use]
    pub fn contains_user(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Number of users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Whether the snapshot holds no users and no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates users and groups while a loader walks backend entries.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    users: BTreeMap<String, User>,
    groups: BTreeMap<String, Group>,
}

impl SnapshotBuilder {
    /// Adds a user, rejecting empty and duplicate usernames.
    pub fn add_user(&mut self, user: User) -> Result<(), SnapshotError> {
        if user.username.is_empty() {
            return Err(SnapshotError::EmptyUsername);
        }
        if self.users.contains_key(&user.username) {
            return Err(SnapshotError::DuplicateUser(user.username));
        }
        self.users.insert(user.username.clone(), user);
        Ok(())
    }

    /// Adds a group, rejecting empty and duplicate names.
    pub fn add_group(&mut self, group: Group) -> Result<(), SnapshotError> {
        if group.name.is_empty() {
            return Err(SnapshotError::EmptyGroupName);
        }
        if self.groups.contains_key(&group.name) {
            return Err(SnapshotError::DuplicateGroup(group.name));
        }
        self.groups.insert(group.name.clone(), group);
        Ok(())
    }

    /// Whether a user with the given canonical username was already added.
    ///
    /// Loaders use this to drop group member references that point at accounts
    /// outside the loaded set.
    #[must_use]
    pub fn contains_user(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Finishes the snapshot.
    #[must_use]
    pub fn build(self) -> Snapshot {
        Snapshot {
            users: self.users,
            groups: self.groups,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_users_and_groups() {
        let mut builder = Snapshot::builder();
        builder.add_user(User::new("bob")).unwrap();
        builder.add_user(User::new("alice")).unwrap();
        builder
            .add_group(Group::new("developers").with_member("alice"))
            .unwrap();

        assert!(builder.contains_user("alice"));
        assert!(!builder.contains_user("carol"));

        let snapshot = builder.build();
        assert_eq!(snapshot.user_count(), 2);
        assert_eq!(snapshot.group_count(), 1);
        assert!(snapshot.contains_user("bob"));
        assert!(snapshot.group("developers").is_some());
        assert!(!snapshot.is_empty());

        // BTreeMap keys come back sorted.
        let names: Vec<_> = snapshot.users().keys().cloned().collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn duplicate_user_is_rejected() {
        let mut builder = Snapshot::builder();
        builder.add_user(User::new("alice")).unwrap();
        let err = builder.add_user(User::new("alice")).unwrap_err();
        assert_eq!(err, SnapshotError::DuplicateUser("alice".to_string()));
    }

    #[test]
    fn duplicate_group_is_rejected() {
        let mut builder = Snapshot::builder();
        builder.add_group(Group::new("developers")).unwrap();
        let err = builder.add_group(Group::new("developers")).unwrap_err();
        assert_eq!(err, SnapshotError::DuplicateGroup("developers".to_string()));
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut builder = Snapshot::builder();
        assert_eq!(
            builder.add_user(User::new("")).unwrap_err(),
            SnapshotError::EmptyUsername
        );
        assert_eq!(
            builder.add_group(Group::new("")).unwrap_err(),
            SnapshotError::EmptyGroupName
        );
    }

    #[test]
    fn empty_snapshot() {
        let snapshot = Snapshot::builder().build();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.user_count(), 0);
        assert!(snapshot.user("anyone").is_none());
    }
}
