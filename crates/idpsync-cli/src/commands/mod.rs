//! Subcommand implementations.

pub mod status;
pub mod sync;

use idpsync_freeipa::{IpaClient, IpaConfig};
use idpsync_ldap::LdapConfig;

use crate::error::CliResult;
use crate::output;

/// Fills in the directory bind password, prompting when the file left it out.
fn resolve_bind_password(config: &mut LdapConfig) -> CliResult<()> {
    if config.bind_password.is_none() {
        let prompt = format!("Bind password for {}: ", config.bind_dn);
        config.bind_password = Some(output::prompt_password(&prompt)?);
    }
    Ok(())
}

/// Builds a FreeIPA client and logs it in, prompting for the password if the
/// caller did not supply one.
async fn login_ipa(config: &IpaConfig, password: Option<&str>) -> CliResult<IpaClient> {
    let client = IpaClient::new(config)?;
    let password = match password {
        Some(p) => p.to_string(),
        None => {
            let prompt = format!("FreeIPA password for {}: ", config.username);
            output::prompt_password(&prompt)?
        }
    };
    client.login(&config.username, &password).await?;
    Ok(client)
}
