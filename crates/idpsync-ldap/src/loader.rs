//! Directory snapshot loading.

use idpsync_engine::{LoadError, SnapshotLoader};
use idpsync_model::Snapshot;

use crate::config::LdapConfig;
use crate::connection::LdapConnection;
use crate::error::LdapResult;
use crate::mapper::EntryMapper;
use crate::search::search_subtree;

const ENTRY_FILTER: &str = "(objectClass=*)";

// ============================================================================
// Directory Source
// ============================================================================

/// Loads the desired account state from the identity provider's directory.
pub struct LdapSource {
    config: LdapConfig,
    mapper: EntryMapper,
}

impl LdapSource {
    /// Creates a source over a validated configuration.
    pub fn new(config: LdapConfig, idp_name: impl Into<String>) -> LdapResult<Self> {
        config.validate()?;
        let mapper = EntryMapper::new(config.clone(), idp_name);
        Ok(Self { config, mapper })
    }

    /// The configured directory URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.config.url
    }
}

impl SnapshotLoader for LdapSource {
    fn source_name(&self) -> &'static str {
        "ldap"
    }

    async fn load(&mut self) -> Result<Snapshot, LoadError> {
        let mut conn = LdapConnection::connect(&self.config).await?;
        let user_entries = search_subtree(&mut conn, &self.config.user_base, ENTRY_FILTER).await?;
        let group_entries = search_subtree(&mut conn, &self.config.group_base, ENTRY_FILTER).await?;
        conn.close().await;

        let mut builder = Snapshot::builder();
        for entry in &user_entries {
            if let Some(user) = self.mapper.map_user(entry)? {
                builder.add_user(user)?;
            }
        }

        let mut groups = Vec::new();
        for entry in &group_entries {
            if let Some(group) = self.mapper.map_group(entry)? {
                groups.push(group);
            }
        }
        for mut group in groups {
            // Member references can outlive the account they point at, and
            // ignored accounts leave their references behind as well.
            let group_name = group.name.clone();
            group.members.retain(|member| {
                let known = builder.contains_user(member);
                if !known {
                    tracing::debug!(
                        group = %group_name,
                        member = %member,
                        "dropping member reference to an account outside the loaded set"
                    );
                }
                known
            });
            builder.add_group(group)?;
        }

        let snapshot = builder.build();
        tracing::info!(
            source = self.source_name(),
            users = snapshot.user_count(),
            groups = snapshot.group_count(),
            "directory snapshot loaded"
        );
        Ok(snapshot)
    }
}
