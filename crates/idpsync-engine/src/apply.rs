//! Action application abstraction.

use std::fmt;

use idpsync_model::{Group, User};
use thiserror::Error;

use crate::plan::GroupChange;

// ============================================================================
// Operations
// ============================================================================

/// The write operations a sync can perform against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create a user account.
    UserAdd,
    /// Delete a user account.
    UserDelete,
    /// Update a user account's attributes.
    UserModify,
    /// Create a group.
    GroupAdd,
    /// Delete a group.
    GroupDelete,
    /// Update a group's description.
    GroupModify,
    /// Add a member to a group.
    MemberAdd,
    /// Remove a member from a group.
    MemberRemove,
}

impl Operation {
    /// Stable identifier used in messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserAdd => "user-add",
            Self::UserDelete => "user-del",
            Self::UserModify => "user-mod",
            Self::GroupAdd => "group-add",
            Self::GroupDelete => "group-del",
            Self::GroupModify => "group-mod",
            Self::MemberAdd => "member-add",
            Self::MemberRemove => "member-remove",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Apply Errors
// ============================================================================

/// A write against the target failed.
///
/// Application is fail-fast: the first error aborts the run, so the error
/// names the exact operation and entity that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed for '{entity}': {message}")]
pub struct ApplyError {
    /// Which operation failed.
    pub operation: Operation,
    /// The user, group, or `group:member` pair it failed for.
    pub entity: String,
    /// Backend failure detail.
    pub message: String,
}

impl ApplyError {
    /// Creates an apply error.
    pub fn new(operation: Operation, entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation,
            entity: entity.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Applier Trait
// ============================================================================

/// Performs plan actions against the target system.
///
/// Each method applies exactly one plan entry. Implementations report failures
/// through [`ApplyError`] and perform no retries; ordering and fail-fast
/// semantics are the caller's responsibility.
#[allow(async_fn_in_trait)]
pub trait ActionApplier: Send + Sync {
    /// Creates the given user account.
    async fn add_user(&self, user: &User) -> Result<(), ApplyError>;

    /// Deletes the given user account.
    async fn delete_user(&self, user: &User) -> Result<(), ApplyError>;

    /// Updates the given user account to the desired state.
    async fn modify_user(&self, user: &User) -> Result<(), ApplyError>;

    /// Creates the given group including its full membership.
    async fn add_group(&self, group: &Group) -> Result<(), ApplyError>;

    /// Deletes the given group.
    async fn delete_group(&self, group: &Group) -> Result<(), ApplyError>;

    /// Applies a description and membership change to an existing group.
    async fn modify_group(&self, change: &GroupChange) -> Result<(), ApplyError>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::MembershipDelta;
    use std::sync::Mutex;

    #[test]
    fn operation_identifiers() {
        assert_eq!(Operation::UserAdd.as_str(), "user-add");
        assert_eq!(Operation::MemberRemove.to_string(), "member-remove");
    }

    #[test]
    fn apply_error_message() {
        let err = ApplyError::new(Operation::GroupDelete, "legacy", "no such entry");
        assert_eq!(err.to_string(), "group-del failed for 'legacy': no such entry");
    }

    struct CountingApplier {
        calls: Mutex<usize>,
    }

    impl CountingApplier {
        fn bump(&self) {
            *self.calls.lock().unwrap() += 1;
        }
    }

    impl ActionApplier for CountingApplier {
        async fn add_user(&self, _user: &User) -> Result<(), ApplyError> {
            self.bump();
            Ok(())
        }

        async fn delete_user(&self, _user: &User) -> Result<(), ApplyError> {
            self.bump();
            Ok(())
        }

        async fn modify_user(&self, _user: &User) -> Result<(), ApplyError> {
            self.bump();
            Ok(())
        }

        async fn add_group(&self, _group: &Group) -> Result<(), ApplyError> {
            self.bump();
            Ok(())
        }

        async fn delete_group(&self, _group: &Group) -> Result<(), ApplyError> {
            self.bump();
            Ok(())
        }

        async fn modify_group(&self, _change: &GroupChange) -> Result<(), ApplyError> {
            self.bump();
            Ok(())
        }
    }

    #[tokio::test]
    async fn applier_methods_are_callable() {
        let applier = CountingApplier {
            calls: Mutex::new(0),
        };
        applier.add_user(&User::new("alice")).await.unwrap();
        applier.delete_group(&Group::new("legacy")).await.unwrap();
        applier
            .modify_group(&GroupChange {
                group: Group::new("developers"),
                delta: MembershipDelta::default(),
                description_changed: true,
            })
            .await
            .unwrap();
        assert_eq!(*applier.calls.lock().unwrap(), 3);
    }
}
