//! The `sync` subcommand.

use idpsync_engine::{
    diff, ActionApplier, ApplyError, GroupChange, SnapshotLoader, SyncPlan, SyncReport,
};
use idpsync_freeipa::{IpaApplier, IpaLoader};
use idpsync_ldap::LdapSource;

use crate::commands::{login_ipa, resolve_bind_password};
use crate::config::{OutputFormat, SyncConfig};
use crate::error::CliResult;
use crate::output;

// ============================================================================
// Sync Command
// ============================================================================

/// Loads both snapshots, plans the difference and applies it.
///
/// With `dry_run` the same actions are enumerated but nothing is written; the
/// output is the walk's announcements either way, so a dry run shows exactly
/// what a real run would do.
pub async fn run_sync(
    config: &SyncConfig,
    ipa_password: Option<&str>,
    dry_run: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let announce = format == OutputFormat::Text;

    let mut ldap_config = config.ldap.clone();
    resolve_bind_password(&mut ldap_config)?;
    let mut source = LdapSource::new(ldap_config, config.freeipa.idp_name.as_str())?;

    let client = login_ipa(&config.freeipa, ipa_password).await?;
    let mut target = IpaLoader::new(client.clone(), config.freeipa.clone());

    let desired = source.load().await?;
    if announce {
        output::info(&format!(
            "{}: {} users, {} groups",
            source.source_name(),
            desired.user_count(),
            desired.group_count()
        ));
    }
    let current = target.load().await?;
    if announce {
        output::info(&format!(
            "{}: {} users, {} groups",
            target.source_name(),
            current.user_count(),
            current.group_count()
        ));
    }

    let plan = diff(&desired, &current);
    if announce {
        output::heading("Plan");
        output::plan_summary(&plan);
        if dry_run {
            output::warning("dry run: nothing will be applied");
        }
        if plan.is_empty() {
            output::success("FreeIPA already matches the directory");
        } else {
            output::heading("Actions");
        }
    }

    let applier = IpaApplier::new(client);
    let mut report = SyncReport::new(dry_run);
    let walk = apply_plan(&plan, &applier, dry_run, announce, &mut report).await;
    let report = report.complete();

    match format {
        OutputFormat::Text => {
            if let Err(err) = walk {
                output::error(&format!("aborted, partial result: {}", report.status));
                return Err(err.into());
            }
            output::success(&report.status);
        }
        OutputFormat::Json => {
            let doc = serde_json::json!({ "plan": plan, "report": report });
            println!("{}", serde_json::to_string_pretty(&doc)?);
            walk?;
        }
    }
    Ok(())
}

// ============================================================================
// Plan Walk
// ============================================================================

/// Walks the plan in a fixed order, announcing and applying each action.
///
/// Order: additions first (users, then groups with their members), then
/// deletions (users, then groups), then modifications (users, then groups).
/// Users precede groups within each phase so new groups can reference new
/// accounts and deletions drop memberships before the groups go. The first
/// backend failure aborts the walk, leaving the report with what was done.
pub async fn apply_plan<A: ActionApplier>(
    plan: &SyncPlan,
    applier: &A,
    dry_run: bool,
    announce: bool,
    report: &mut SyncReport,
) -> Result<(), ApplyError> {
    for user in &plan.users_to_add {
        if announce {
            output::added(&format!("user {}", user.username));
        }
        if !dry_run {
            applier.add_user(user).await?;
        }
        report.record_user_added();
    }
    for group in &plan.groups_to_add {
        if announce {
            output::added(&format!("group {} ({} members)", group.name, group.members.len()));
        }
        if !dry_run {
            applier.add_group(group).await?;
        }
        report.record_group_added();
        for _ in &group.members {
            report.record_member_added();
        }
    }

    for user in &plan.users_to_delete {
        if announce {
            output::removed(&format!("user {}", user.username));
        }
        if !dry_run {
            applier.delete_user(user).await?;
        }
        report.record_user_deleted();
    }
    for group in &plan.groups_to_delete {
        if announce {
            output::removed(&format!("group {}", group.name));
        }
        if !dry_run {
            applier.delete_group(group).await?;
        }
        report.record_group_deleted();
    }

    for user in &plan.users_to_modify {
        if announce {
            output::changed(&format!("user {}", user.username));
        }
        if !dry_run {
            applier.modify_user(user).await?;
        }
        report.record_user_modified();
    }
    for change in &plan.groups_to_modify {
        if announce {
            announce_group_change(change);
        }
        if !dry_run {
            applier.modify_group(change).await?;
        }
        report.record_group_modified();
        for _ in &change.delta.to_add {
            report.record_member_added();
        }
        for _ in &change.delta.to_remove {
            report.record_member_removed();
        }
    }
    Ok(())
}

fn announce_group_change(change: &GroupChange) {
    let mut parts = Vec::new();
    if change.description_changed {
        parts.push("description".to_string());
    }
    if !change.delta.to_add.is_empty() {
        parts.push(format!("+{} members", change.delta.to_add.len()));
    }
    if !change.delta.to_remove.is_empty() {
        parts.push(format!("-{} members", change.delta.to_remove.len()));
    }
    if parts.is_empty() {
        parts.push("no direct changes".to_string());
    }
    output::changed(&format!("group {} ({})", change.group.name, parts.join(", ")));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use idpsync_engine::{MembershipDelta, Operation};
    use idpsync_model::{Group, User};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApplier {
        calls: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl RecordingApplier {
        fn record(&self, call: String) -> Result<(), ApplyError> {
            if self.fail_on.as_deref() == Some(call.as_str()) {
                return Err(ApplyError::new(Operation::UserDelete, call, "induced failure"));
            }
            self.calls.lock().unwrap().push(call);
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ActionApplier for RecordingApplier {
        async fn add_user(&self, user: &User) -> Result<(), ApplyError> {
            self.record(format!("user-add {}", user.username))
        }

        async fn delete_user(&self, user: &User) -> Result<(), ApplyError> {
            self.record(format!("user-del {}", user.username))
        }

        async fn modify_user(&self, user: &User) -> Result<(), ApplyError> {
            self.record(format!("user-mod {}", user.username))
        }

        async fn add_group(&self, group: &Group) -> Result<(), ApplyError> {
            self.record(format!("group-add {}", group.name))
        }

        async fn delete_group(&self, group: &Group) -> Result<(), ApplyError> {
            self.record(format!("group-del {}", group.name))
        }

        async fn modify_group(&self, change: &GroupChange) -> Result<(), ApplyError> {
            self.record(format!("group-mod {}", change.group.name))
        }
    }

    fn sample_plan() -> SyncPlan {
        SyncPlan {
            users_to_add: vec![User::new("alice")],
            users_to_delete: vec![User::new("carol")],
            users_to_modify: vec![User::new("bob")],
            groups_to_add: vec![Group::new("ops").with_member("alice")],
            groups_to_delete: vec![Group::new("legacy")],
            groups_to_modify: vec![GroupChange {
                group: Group::new("developers"),
                delta: MembershipDelta {
                    to_add: vec!["alice".to_string()],
                    to_remove: vec!["bob".to_string()],
                },
                description_changed: false,
            }],
        }
    }

    #[tokio::test]
    async fn apply_walks_in_fixed_order() {
        let applier = RecordingApplier::default();
        let mut report = SyncReport::new(false);
        apply_plan(&sample_plan(), &applier, false, false, &mut report)
            .await
            .unwrap();

        assert_eq!(
            applier.calls(),
            vec![
                "user-add alice",
                "group-add ops",
                "user-del carol",
                "group-del legacy",
                "user-mod bob",
                "group-mod developers",
            ]
        );

        let report = report.complete();
        assert_eq!(report.users_added, 1);
        assert_eq!(report.users_deleted, 1);
        assert_eq!(report.users_modified, 1);
        assert_eq!(report.groups_added, 1);
        assert_eq!(report.groups_deleted, 1);
        assert_eq!(report.groups_modified, 1);
        // One member in the new group, one added through the delta.
        assert_eq!(report.members_added, 2);
        assert_eq!(report.members_removed, 1);
    }

    #[tokio::test]
    async fn dry_run_applies_nothing() {
        let applier = RecordingApplier::default();
        let mut report = SyncReport::new(true);
        apply_plan(&sample_plan(), &applier, true, false, &mut report)
            .await
            .unwrap();

        assert!(applier.calls().is_empty());
        // The report still counts what would have happened.
        assert_eq!(report.users_added, 1);
        assert_eq!(report.members_added, 2);
    }

    #[tokio::test]
    async fn first_failure_stops_the_walk() {
        let applier = RecordingApplier {
            fail_on: Some("user-del carol".to_string()),
            ..RecordingApplier::default()
        };
        let mut report = SyncReport::new(false);
        let err = apply_plan(&sample_plan(), &applier, false, false, &mut report)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("induced failure"));
        // Additions went through; nothing after the failing delete ran.
        assert_eq!(applier.calls(), vec!["user-add alice", "group-add ops"]);
        assert_eq!(report.users_added, 1);
        assert_eq!(report.users_deleted, 0);
        assert_eq!(report.groups_deleted, 0);
    }

    #[tokio::test]
    async fn empty_plan_is_a_quiet_success() {
        let applier = RecordingApplier::default();
        let mut report = SyncReport::new(false);
        apply_plan(&SyncPlan::default(), &applier, false, false, &mut report)
            .await
            .unwrap();
        assert!(applier.calls().is_empty());
        assert!(!report.has_changes());
    }
}
