//! JSON-RPC client for the FreeIPA API.

use idpsync_model::User;
use reqwest::header;
use serde_json::{json, Map, Value};

use crate::config::IpaConfig;
use crate::error::{IpaError, IpaResult};

// ============================================================================
// Client
// ============================================================================

/// Thin wrapper over the FreeIPA session API.
///
/// [`IpaClient::login`] establishes the session; the cookie store carries it
/// through every later call. Cloning shares the session.
#[derive(Debug, Clone)]
pub struct IpaClient {
    http: reqwest::Client,
    base_url: String,
}

impl IpaClient {
    /// Creates a client for the given server. No network traffic yet.
    pub fn new(config: &IpaConfig) -> IpaResult<Self> {
        config.validate()?;
        let mut builder = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .cookie_store(true);
        if !config.verify_tls {
            tracing::warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url: config.base_url(),
        })
    }

    /// The server base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Logs in with username and password, storing the session cookie.
    pub async fn login(&self, username: &str, password: &str) -> IpaResult<()> {
        let response = self
            .http
            .post(format!("{}/ipa/session/login_password", self.base_url))
            .header(header::REFERER, format!("{}/ipa", self.base_url))
            .header(header::ACCEPT, "text/plain")
            .form(&[("user", username), ("password", password)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let reason = response
                .headers()
                .get("x-ipa-rejection-reason")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            return Err(IpaError::Login { status, reason });
        }
        tracing::debug!(server = %self.base_url, user = %username, "FreeIPA login succeeded");
        Ok(())
    }

    /// Round-trips a `ping` call over the established session.
    pub async fn ping(&self) -> IpaResult<()> {
        self.call("ping", &[], Map::new()).await.map(|_| ())
    }

    // === Users ===

    /// Lists all user entries with their attributes.
    pub async fn user_find(&self) -> IpaResult<Vec<Value>> {
        let mut options = Map::new();
        options.insert("sizelimit".to_string(), json!(0));
        let result = self.call("user_find", &[], options).await?;
        result_rows("user_find", &result)
    }

    /// Creates a user account.
    pub async fn user_add(&self, user: &User) -> IpaResult<()> {
        self.call("user_add", &[&user.username], user_options(user))
            .await
            .map(|_| ())
    }

    /// Updates a user account's managed attributes.
    pub async fn user_mod(&self, user: &User) -> IpaResult<()> {
        self.call("user_mod", &[&user.username], user_options(user))
            .await
            .map(|_| ())
    }

    /// Deletes a user account permanently.
    pub async fn user_del(&self, username: &str) -> IpaResult<()> {
        let mut options = Map::new();
        options.insert("preserve".to_string(), json!(false));
        self.call("user_del", &[username], options).await.map(|_| ())
    }

    // === Groups ===

    /// Lists all group entries with their attributes.
    pub async fn group_find(&self) -> IpaResult<Vec<Value>> {
        let mut options = Map::new();
        options.insert("sizelimit".to_string(), json!(0));
        let result = self.call("group_find", &[], options).await?;
        result_rows("group_find", &result)
    }

    /// Creates a group.
    pub async fn group_add(&self, name: &str, description: Option<&str>) -> IpaResult<()> {
        let mut options = Map::new();
        if let Some(description) = description {
            options.insert("description".to_string(), json!(description));
        }
        self.call("group_add", &[name], options).await.map(|_| ())
    }

    /// Sets a group's description. An empty string clears it.
    pub async fn group_mod_description(&self, name: &str, description: &str) -> IpaResult<()> {
        let mut options = Map::new();
        options.insert("description".to_string(), json!(description));
        self.call("group_mod", &[name], options).await.map(|_| ())
    }

    /// Deletes a group.
    pub async fn group_del(&self, name: &str) -> IpaResult<()> {
        self.call("group_del", &[name], Map::new()).await.map(|_| ())
    }

    /// Adds a user to a group.
    pub async fn group_add_member(&self, group: &str, username: &str) -> IpaResult<()> {
        let mut options = Map::new();
        options.insert("user".to_string(), json!([username]));
        self.call("group_add_member", &[group], options)
            .await
            .map(|_| ())
    }

    /// Removes a user from a group.
    pub async fn group_remove_member(&self, group: &str, username: &str) -> IpaResult<()> {
        let mut options = Map::new();
        options.insert("user".to_string(), json!([username]));
        self.call("group_remove_member", &[group], options)
            .await
            .map(|_| ())
    }

    /// Performs one JSON-RPC call and unwraps the response envelope.
    async fn call(&self, method: &str, args: &[&str], options: Map<String, Value>) -> IpaResult<Value> {
        tracing::trace!(method = %method, "FreeIPA RPC call");
        let response = self
            .http
            .post(format!("{}/ipa/session/json", self.base_url))
            .header(header::REFERER, format!("{}/ipa", self.base_url))
            .json(&rpc_body(method, args, &options))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IpaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Value = response.json().await?;
        unwrap_envelope(method, &envelope)
    }
}

// ============================================================================
// Wire Shaping
// ============================================================================

fn rpc_body(method: &str, args: &[&str], options: &Map<String, Value>) -> Value {
    json!({
        "id": 0,
        "method": method,
        "params": [args, options],
    })
}

/// Call options for `user_add` and `user_mod`, derived from the desired state.
///
/// Unmanaged fields are omitted, never cleared. The numeric id feeds both
/// `uidnumber` and `gidnumber` so the private group follows the account.
fn user_options(user: &User) -> Map<String, Value> {
    let mut options = Map::new();
    options.insert("givenname".to_string(), json!(user.given_name));
    options.insert("sn".to_string(), json!(user.family_name));
    options.insert("cn".to_string(), json!(user.display_name));
    options.insert("gecos".to_string(), json!(user.display_name));
    options.insert("ipauserauthtype".to_string(), json!(user.auth_type));
    options.insert("ipaidpconfiglink".to_string(), json!(user.idp_name));
    options.insert("ipaidpsub".to_string(), json!(user.idp_subject));
    options.insert("nsaccountlock".to_string(), json!(!user.active));
    if let Some(email) = &user.email {
        options.insert("mail".to_string(), json!(email));
    }
    if let Some(numeric_id) = &user.numeric_id {
        options.insert("uidnumber".to_string(), json!(numeric_id));
        options.insert("gidnumber".to_string(), json!(numeric_id));
    }
    if let Some(shell) = &user.shell {
        options.insert("loginshell".to_string(), json!(shell));
    }
    options
}

fn unwrap_envelope(method: &str, envelope: &Value) -> IpaResult<Value> {
    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        return Err(IpaError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or(-1),
            name: error
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("UnknownError")
                .to_string(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message")
                .to_string(),
        });
    }
    envelope
        .get("result")
        .cloned()
        .ok_or_else(|| IpaError::decode(format!("'{method}' response carries no result")))
}

fn result_rows(method: &str, result: &Value) -> IpaResult<Vec<Value>> {
    result
        .get("result")
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| IpaError::decode(format!("'{method}' result is not a list")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use idpsync_model::auth_types;

    #[test]
    fn rpc_body_shape() {
        let mut options = Map::new();
        options.insert("description".to_string(), json!("Development team"));
        let body = rpc_body("group_add", &["developers"], &options);

        assert_eq!(body["id"], 0);
        assert_eq!(body["method"], "group_add");
        assert_eq!(body["params"][0][0], "developers");
        assert_eq!(body["params"][1]["description"], "Development team");
    }

    #[test]
    fn user_options_full() {
        let user = User::new("jdoe")
            .with_display_name("John Doe")
            .with_given_name("John")
            .with_family_name("Doe")
            .with_email("john.doe@example.com")
            .with_numeric_id("12001")
            .with_shell("/bin/bash")
            .with_active(true)
            .with_auth_type(auth_types::IDP)
            .with_idp("corp-idp", "jdoe@corp.example.com");
        let options = user_options(&user);

        assert_eq!(options["givenname"], "John");
        assert_eq!(options["sn"], "Doe");
        assert_eq!(options["cn"], "John Doe");
        assert_eq!(options["gecos"], "John Doe");
        assert_eq!(options["mail"], "john.doe@example.com");
        assert_eq!(options["uidnumber"], "12001");
        assert_eq!(options["gidnumber"], "12001");
        assert_eq!(options["loginshell"], "/bin/bash");
        assert_eq!(options["ipauserauthtype"], "idp");
        assert_eq!(options["ipaidpconfiglink"], "corp-idp");
        assert_eq!(options["ipaidpsub"], "jdoe@corp.example.com");
        assert_eq!(options["nsaccountlock"], false);
    }

    #[test]
    fn user_options_omit_unmanaged_fields() {
        let user = User::new("jdoe")
            .with_display_name("John Doe")
            .with_family_name("Doe")
            .with_active(false);
        let options = user_options(&user);

        assert!(!options.contains_key("mail"));
        assert!(!options.contains_key("uidnumber"));
        assert!(!options.contains_key("gidnumber"));
        assert!(!options.contains_key("loginshell"));
        assert_eq!(options["nsaccountlock"], true);
    }

    #[test]
    fn rpc_error_envelope_is_decoded() {
        let envelope = json!({
            "error": { "code": 4001, "name": "NotFound", "message": "jdoe: user not found" },
            "result": null,
        });
        let err = unwrap_envelope("user_show", &envelope).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("jdoe: user not found"));

        let ok = json!({ "error": null, "result": { "count": 0 } });
        assert!(unwrap_envelope("user_find", &ok).is_ok());

        let headless = json!({ "error": null });
        assert!(unwrap_envelope("ping", &headless).is_err());
    }

    #[test]
    fn result_rows_unwraps_find_results() {
        let result = json!({ "count": 1, "result": [{ "uid": ["jdoe"] }] });
        let rows = result_rows("user_find", &result).unwrap();
        assert_eq!(rows.len(), 1);

        let bad = json!({ "count": 0 });
        assert!(result_rows("user_find", &bad).is_err());
    }
}
