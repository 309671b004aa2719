//! Directory connection handling.

use ldap3::{Ldap, LdapConnAsync, LdapConnSettings};

use crate::config::LdapConfig;
use crate::error::{LdapError, LdapResult};

// ============================================================================
// Connection
// ============================================================================

/// An authenticated directory connection.
///
/// Connecting also performs the simple bind; a constructed value is ready for
/// searches. The underlying I/O driver runs on a spawned task until the
/// connection is closed or dropped.
pub struct LdapConnection {
    pub(crate) ldap: Ldap,
}

impl LdapConnection {
    /// Connects to the configured directory and binds.
    pub async fn connect(config: &LdapConfig) -> LdapResult<Self> {
        let password = config
            .bind_password
            .as_deref()
            .ok_or_else(|| LdapError::config("bind password not provided"))?;

        let settings = LdapConnSettings::new().set_conn_timeout(config.connect_timeout());
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &config.url)
            .await
            .map_err(|e| LdapError::connection(format!("{}: {e}", config.url)))?;

        // Drive connection I/O in the background for the life of the session.
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!(error = %e, "LDAP connection driver stopped");
            }
        });

        ldap.simple_bind(&config.bind_dn, password)
            .await?
            .success()
            .map_err(|e| LdapError::Bind(format!("as '{}': {e}", config.bind_dn)))?;
        tracing::debug!(url = %config.url, bind_dn = %config.bind_dn, "LDAP bind succeeded");

        Ok(Self { ldap })
    }

    /// Unbinds and drops the connection.
    pub async fn close(mut self) {
        if let Err(e) = self.ldap.unbind().await {
            tracing::debug!(error = %e, "LDAP unbind failed");
        }
    }
}
