//! Group representation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ============================================================================
// Group
// ============================================================================

/// A named group and its full membership.
///
/// Members are canonical usernames, held in a sorted set so comparisons and
/// iteration order are stable regardless of how the backend returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group name, unique within a snapshot.
    pub name: String,
    /// Free-form description. `None` when the source carries none.
    pub description: Option<String>,
    /// Canonical usernames of all members.
    pub members: BTreeSet<String>,
}

impl Group {
    /// Creates an empty group with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            members: BTreeSet::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds one member.
    #[must_use]
    pub fn with_member(mut self, username: impl Into<String>) -> Self {
        self.members.insert(username.into());
        self
    }

    /// Adds all of the given members.
    #[must_use]
    pub fn with_members<I, S>(mut self, usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members.extend(usernames.into_iter().map(Into::into));
        self
    }

    /// Whether the given username is a member.
    #[must_use]
    pub fn has_member(&self, username: &str) -> bool {
        self.members.contains(username)
    }

    /// Whether `current` already reflects this desired group state.
    ///
    /// Unlike [`crate::User::matches`] this comparison is symmetric: both the
    /// description and the full member set must agree.
    #[must_use]
    pub fn matches(&self, current: &Group) -> bool {
        self.description == current.description && self.members == current.members
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_group_is_empty() {
        let group = Group::new("developers");
        assert_eq!(group.name, "developers");
        assert!(group.description.is_none());
        assert!(group.members.is_empty());
    }

    #[test]
    fn members_are_sorted_and_deduplicated() {
        let group = Group::new("developers")
            .with_member("zoe")
            .with_member("alice")
            .with_member("alice");
        let members: Vec<_> = group.members.iter().cloned().collect();
        assert_eq!(members, vec!["alice", "zoe"]);
        assert!(group.has_member("zoe"));
        assert!(!group.has_member("bob"));
    }

    #[test]
    fn matches_compares_description_and_members() {
        let desired = Group::new("developers")
            .with_description("Development team")
            .with_members(["alice", "bob"]);
        let same = desired.clone();
        assert!(desired.matches(&same));

        let different_description = Group::new("developers")
            .with_description("Dev team")
            .with_members(["alice", "bob"]);
        assert!(!desired.matches(&different_description));

        let different_members = Group::new("developers")
            .with_description("Development team")
            .with_members(["alice"]);
        assert!(!desired.matches(&different_members));
    }

    #[test]
    fn missing_description_differs_from_empty() {
        let desired = Group::new("developers");
        let current = Group::new("developers").with_description("");
        assert!(!desired.matches(&current));
    }
}
