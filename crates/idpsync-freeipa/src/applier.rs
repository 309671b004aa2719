//! Applies plan actions through the FreeIPA API.

use idpsync_engine::{ActionApplier, ApplyError, GroupChange, Operation};
use idpsync_model::{Group, User};

use crate::client::IpaClient;

// ============================================================================
// FreeIPA Applier
// ============================================================================

/// Executes user and group actions against FreeIPA.
///
/// Each plan entry maps to one or more API calls; the first failing call
/// surfaces as an [`ApplyError`] naming the operation and entity. Membership
/// failures use `group:member` as the entity.
pub struct IpaApplier {
    client: IpaClient,
}

impl IpaApplier {
    /// Creates an applier over a logged-in client.
    pub const fn new(client: IpaClient) -> Self {
        Self { client }
    }
}

impl ActionApplier for IpaApplier {
    async fn add_user(&self, user: &User) -> Result<(), ApplyError> {
        tracing::debug!(user = %user.username, "adding user");
        self.client
            .user_add(user)
            .await
            .map_err(|e| ApplyError::new(Operation::UserAdd, &user.username, e.to_string()))
    }

    async fn delete_user(&self, user: &User) -> Result<(), ApplyError> {
        tracing::debug!(user = %user.username, "deleting user");
        self.client
            .user_del(&user.username)
            .await
            .map_err(|e| ApplyError::new(Operation::UserDelete, &user.username, e.to_string()))
    }

    async fn modify_user(&self, user: &User) -> Result<(), ApplyError> {
        tracing::debug!(user = %user.username, "modifying user");
        self.client
            .user_mod(user)
            .await
            .map_err(|e| ApplyError::new(Operation::UserModify, &user.username, e.to_string()))
    }

    async fn add_group(&self, group: &Group) -> Result<(), ApplyError> {
        tracing::debug!(group = %group.name, members = group.members.len(), "adding group");
        self.client
            .group_add(&group.name, group.description.as_deref())
            .await
            .map_err(|e| ApplyError::new(Operation::GroupAdd, &group.name, e.to_string()))?;
        for member in &group.members {
            self.client
                .group_add_member(&group.name, member)
                .await
                .map_err(|e| {
                    ApplyError::new(
                        Operation::MemberAdd,
                        format!("{}:{member}", group.name),
                        e.to_string(),
                    )
                })?;
        }
        Ok(())
    }

    async fn delete_group(&self, group: &Group) -> Result<(), ApplyError> {
        tracing::debug!(group = %group.name, "deleting group");
        self.client
            .group_del(&group.name)
            .await
            .map_err(|e| ApplyError::new(Operation::GroupDelete, &group.name, e.to_string()))
    }

    async fn modify_group(&self, change: &GroupChange) -> Result<(), ApplyError> {
        let group = &change.group;
        tracing::debug!(
            group = %group.name,
            add = change.delta.to_add.len(),
            remove = change.delta.to_remove.len(),
            description = change.description_changed,
            "modifying group"
        );
        if change.description_changed {
            // Clearing a description means writing an empty value.
            let description = group.description.as_deref().unwrap_or_default();
            self.client
                .group_mod_description(&group.name, description)
                .await
                .map_err(|e| ApplyError::new(Operation::GroupModify, &group.name, e.to_string()))?;
        }
        for member in &change.delta.to_add {
            self.client
                .group_add_member(&group.name, member)
                .await
                .map_err(|e| {
                    ApplyError::new(
                        Operation::MemberAdd,
                        format!("{}:{member}", group.name),
                        e.to_string(),
                    )
                })?;
        }
        for member in &change.delta.to_remove {
            self.client
                .group_remove_member(&group.name, member)
                .await
                .map_err(|e| {
                    ApplyError::new(
                        Operation::MemberRemove,
                        format!("{}:{member}", group.name),
                        e.to_string(),
                    )
                })?;
        }
        Ok(())
    }
}
