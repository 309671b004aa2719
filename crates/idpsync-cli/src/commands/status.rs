//! The `status` subcommand.

use idpsync_ldap::LdapConnection;

use crate::commands::{login_ipa, resolve_bind_password};
use crate::config::SyncConfig;
use crate::error::CliResult;
use crate::output;

// ============================================================================
// Status Command
// ============================================================================

/// Verifies that both systems are reachable with the configured credentials.
///
/// Binds to the directory and logs into FreeIPA, then disconnects without
/// reading or writing any account data.
pub async fn run_status(config: &SyncConfig, ipa_password: Option<&str>) -> CliResult<()> {
    let mut ldap_config = config.ldap.clone();
    ldap_config.validate()?;
    resolve_bind_password(&mut ldap_config)?;
    let conn = LdapConnection::connect(&ldap_config).await?;
    conn.close().await;
    output::success(&format!("directory reachable at {}", ldap_config.url));

    let client = login_ipa(&config.freeipa, ipa_password).await?;
    client.ping().await?;
    output::success(&format!("FreeIPA reachable at {}", client.base_url()));

    Ok(())
}
