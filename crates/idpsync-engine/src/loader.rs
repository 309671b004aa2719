//! Snapshot loading abstraction.

use idpsync_model::Snapshot;

use crate::error::LoadError;

// ============================================================================
// Loader Trait
// ============================================================================

/// Fetches one system's complete account state.
///
/// Implementations own their connection details; the engine only sees the
/// resulting [`Snapshot`]. Loading takes `&mut self` because backends keep
/// session state (directory connections, authentication cookies) across the
/// calls a load is made of.
#[allow(async_fn_in_trait)]
pub trait SnapshotLoader: Send + Sync {
    /// Short name of the backing system, used in logs and messages.
    fn source_name(&self) -> &'static str;

    /// Fetches users and groups and shapes them into a snapshot.
    async fn load(&mut self) -> Result<Snapshot, LoadError>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use idpsync_model::{Group, User};

    struct FixedLoader {
        snapshot: Snapshot,
    }

    impl SnapshotLoader for FixedLoader {
        fn source_name(&self) -> &'static str {
            "fixed"
        }

        async fn load(&mut self) -> Result<Snapshot, LoadError> {
            Ok(self.snapshot.clone())
        }
    }

    #[tokio::test]
    async fn loader_returns_snapshot() {
        let mut builder = Snapshot::builder();
        builder.add_user(User::new("alice")).unwrap();
        builder.add_group(Group::new("developers").with_member("alice")).unwrap();
        let mut loader = FixedLoader {
            snapshot: builder.build(),
        };

        assert_eq!(loader.source_name(), "fixed");
        let snapshot = loader.load().await.unwrap();
        assert_eq!(snapshot.user_count(), 1);
        assert_eq!(snapshot.group_count(), 1);
    }
}
