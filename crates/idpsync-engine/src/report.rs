//! Outcome accounting for one sync run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Sync Report
// ============================================================================

/// Counts what a run changed, or would change in a dry run.
///
/// The driver records one tick per applied action while walking the plan and
/// seals the report with [`SyncReport::complete`] when the walk ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Users created.
    pub users_added: u32,
    /// Users deleted.
    pub users_deleted: u32,
    /// Users updated.
    pub users_modified: u32,
    /// Groups created.
    pub groups_added: u32,
    /// Groups deleted.
    pub groups_deleted: u32,
    /// Groups updated.
    pub groups_modified: u32,
    /// Group memberships added.
    pub members_added: u32,
    /// Group memberships removed.
    pub members_removed: u32,
    /// Whether this run only reported actions without applying them.
    pub dry_run: bool,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished, `None` while still going.
    pub completed_at: Option<DateTime<Utc>>,
    /// Human-readable outcome summary.
    pub status: String,
}

impl SyncReport {
    /// Starts a report for a run beginning now.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            users_added: 0,
            users_deleted: 0,
            users_modified: 0,
            groups_added: 0,
            groups_deleted: 0,
            groups_modified: 0,
            members_added: 0,
            members_removed: 0,
            dry_run,
            started_at: Utc::now(),
            completed_at: None,
            status: "in progress".to_string(),
        }
    }

    /// Records a created user.
    pub fn record_user_added(&mut self) {
        self.users_added += 1;
    }

    /// Records a deleted user.
    pub fn record_user_deleted(&mut self) {
        self.users_deleted += 1;
    }

    /// Records an updated user.
    pub fn record_user_modified(&mut self) {
        self.users_modified += 1;
    }

    /// Records a created group.
    pub fn record_group_added(&mut self) {
        self.groups_added += 1;
    }

    /// Records a deleted group.
    pub fn record_group_deleted(&mut self) {
        self.groups_deleted += 1;
    }

    /// Records an updated group.
    pub fn record_group_modified(&mut self) {
        self.groups_modified += 1;
    }

    /// Records an added membership.
    pub fn record_member_added(&mut self) {
        self.members_added += 1;
    }

    /// Records a removed membership.
    pub fn record_member_removed(&mut self) {
        self.members_removed += 1;
    }

    /// Seals the report with a completion time and summary line.
    #[must_use]
    pub fn complete(mut self) -> Self {
        self.completed_at = Some(Utc::now());
        let verb = if self.dry_run { "dry run complete" } else { "sync complete" };
        self.status = format!(
            "{verb}: users +{}/~{}/-{}, groups +{}/~{}/-{}, members +{}/-{}",
            self.users_added,
            self.users_modified,
            self.users_deleted,
            self.groups_added,
            self.groups_modified,
            self.groups_deleted,
            self.members_added,
            self.members_removed,
        );
        self
    }

    /// Whether anything was (or would be) changed.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.users_added
            + self.users_deleted
            + self.users_modified
            + self.groups_added
            + self.groups_deleted
            + self.groups_modified
            + self.members_added
            + self.members_removed
            > 0
    }

    /// Run duration in milliseconds, `None` while still going.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        self.completed_at
            .map(|completed| (completed - self.started_at).num_milliseconds())
    }
}

// ============================================================================
// Tests
// ============================================================================
