//! The sync plan: every action that makes the target match the source.

use idpsync_model::{Group, User};
use serde::{Deserialize, Serialize};

// ============================================================================
// Membership Delta
// ============================================================================

/// Member-level changes for one existing group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipDelta {
    /// Usernames to add to the group, sorted.
    pub to_add: Vec<String>,
    /// Usernames to remove from the group, sorted.
    pub to_remove: Vec<String>,
}

impl MembershipDelta {
    /// Whether no membership changes are needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

// ============================================================================
// Group Change
// ============================================================================

/// A group that exists on both sides but differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupChange {
    /// The desired state of the group.
    pub group: Group,
    /// Membership changes to perform.
    pub delta: MembershipDelta,
    /// Whether the description needs updating.
    pub description_changed: bool,
}

impl GroupChange {
    /// Whether applying this change would touch nothing.
    ///
    /// This happens when the only membership differences were suppressed, for
    /// example because the extra members belong to accounts that are being
    /// deleted in the same run.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        !self.description_changed && self.delta.is_empty()
    }
}

// ============================================================================
// Sync Plan
// ============================================================================

/// The full set of actions produced by [`crate::diff`].
///
/// All lists are sorted by username or group name, so two runs over the same
/// snapshots produce identical plans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    /// Users present in the source but not the target.
    pub users_to_add: Vec<User>,
    /// Users present in the target but not the source.
    pub users_to_delete: Vec<User>,
    /// Users present on both sides whose attributes differ, desired state.
    pub users_to_modify: Vec<User>,
    /// Groups present in the source but not the target.
    pub groups_to_add: Vec<Group>,
    /// Groups present in the target but not the source.
    pub groups_to_delete: Vec<Group>,
    /// Groups present on both sides that differ.
    pub groups_to_modify: Vec<GroupChange>,
}

impl SyncPlan {
    /// Whether the target already matches the source.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users_to_add.is_empty()
            && self.users_to_delete.is_empty()
            && self.users_to_modify.is_empty()
            && self.groups_to_add.is_empty()
            && self.groups_to_delete.is_empty()
            && self.groups_to_modify.is_empty()
    }

    /// Total number of user and group actions.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.users_to_add.len()
            + self.users_to_delete.len()
            + self.users_to_modify.len()
            + self.groups_to_add.len()
            + self.groups_to_delete.len()
            + self.groups_to_modify.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_plan() {
        let plan = SyncPlan::default();
        assert!(plan.is_empty());
        assert_eq!(plan.action_count(), 0);
    }

    #[test]
    fn plan_with_actions() {
        let plan = SyncPlan {
            users_to_add: vec![User::new("alice")],
            groups_to_delete: vec![Group::new("legacy")],
            ..SyncPlan::default()
        };
        assert!(!plan.is_empty());
        assert_eq!(plan.action_count(), 2);
    }

    #[test]
    fn noop_group_change() {
        let change = GroupChange {
            group: Group::new("developers"),
            delta: MembershipDelta::default(),
            description_changed: false,
        };
        assert!(change.is_noop());

        let change = GroupChange {
            description_changed: true,
            ..change
        };
        assert!(!change.is_noop());
    }
}
