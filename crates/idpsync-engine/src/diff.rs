//! Snapshot comparison.

use std::collections::BTreeMap;

use idpsync_model::{Group, Snapshot, User};

use crate::plan::{GroupChange, MembershipDelta, SyncPlan};

// ============================================================================
// Diff
// ============================================================================

/// Compares the desired state against the current state of the target.
///
/// Every user and group in either snapshot lands in exactly one category:
/// add, delete, modify, or unchanged (absent from the plan). The function is
/// pure and deterministic. Diffing a snapshot against itself yields an empty
/// plan, and re-running after a successful apply yields an empty plan as well.
#[must_use]
pub fn diff(desired: &Snapshot, current: &Snapshot) -> SyncPlan {
    let mut plan = SyncPlan::default();

    for (username, user) in desired.users() {
        match current.user(username) {
            None => plan.users_to_add.push(user.clone()),
            Some(existing) if !user.matches(existing) => plan.users_to_modify.push(user.clone()),
            Some(_) => {}
        }
    }
    for (username, user) in current.users() {
        if desired.user(username).is_none() {
            plan.users_to_delete.push(user.clone());
        }
    }

    for (name, group) in desired.groups() {
        match current.group(name) {
            None => plan.groups_to_add.push(group.clone()),
            Some(existing) if !group.matches(existing) => {
                plan.groups_to_modify.push(GroupChange {
                    delta: membership_delta(group, existing, desired.users()),
                    description_changed: group.description != existing.description,
                    group: group.clone(),
                });
            }
            Some(_) => {}
        }
    }
    for (name, group) in current.groups() {
        if desired.group(name).is_none() {
            plan.groups_to_delete.push(group.clone());
        }
    }

    tracing::debug!(
        users_add = plan.users_to_add.len(),
        users_delete = plan.users_to_delete.len(),
        users_modify = plan.users_to_modify.len(),
        groups_add = plan.groups_to_add.len(),
        groups_delete = plan.groups_to_delete.len(),
        groups_modify = plan.groups_to_modify.len(),
        "computed sync plan"
    );
    plan
}

/// Member changes for a group present on both sides.
///
/// A member that exists only on the target side is scheduled for removal only
/// when the account itself survives in the source. Memberships of accounts
/// that vanished from the source disappear together with the account when it
/// is deleted, so removing them here would just fail against a backend that
/// already dropped them.
fn membership_delta(
    desired: &Group,
    current: &Group,
    desired_users: &BTreeMap<String, User>,
) -> MembershipDelta {
    let to_add = desired.members.difference(&current.members).cloned().collect();
    let mut to_remove = Vec::new();
    for member in current.members.difference(&desired.members) {
        if desired_users.contains_key(member) {
            to_remove.push(member.clone());
        } else {
            tracing::debug!(
                group = %desired.name,
                member = %member,
                "not removing member; the account is gone from the source"
            );
        }
    }
    MembershipDelta { to_add, to_remove }
}

// ============================================================================
// Tests
// ============================================================================
