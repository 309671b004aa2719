//! User account representation.

use serde::{Deserialize, Serialize};

// ============================================================================
// Authentication Types
// ============================================================================

/// Well-known values for [`User::auth_type`].
pub mod auth_types {
    /// Account authenticates through an external identity provider.
    pub const IDP: &str = "idp";
    /// Account authenticates with a locally stored password.
    pub const PASSWORD: &str = "password";
}

// ============================================================================
// User
// ============================================================================

/// A user account in canonical form.
///
/// Both the directory loader and the FreeIPA loader produce this shape, so a
/// field-by-field comparison is all the engine needs. The `username` is the
/// canonical short login (any `@domain` suffix already stripped); the original
/// directory value survives in `idp_subject`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    // === Identity ===
    /// Canonical login name, unique within a snapshot.
    pub username: String,
    /// Whether the account is enabled.
    pub active: bool,

    // === Profile ===
    /// Full display name.
    pub display_name: String,
    /// Given (first) name. Empty when the source does not carry one.
    pub given_name: String,
    /// Family (last) name.
    pub family_name: String,
    /// Mail address. `None` means the source does not manage this field.
    pub email: Option<String>,

    // === Posix ===
    /// Numeric uid/gid, kept as text exactly as the source presents it.
    /// `None` means the source does not manage this field.
    pub numeric_id: Option<String>,
    /// Login shell. `None` means the source does not manage this field.
    pub shell: Option<String>,

    // === Federation ===
    /// How the account authenticates, see [`auth_types`].
    pub auth_type: String,
    /// Name of the identity provider the account is linked to.
    pub idp_name: String,
    /// Subject identifier at the identity provider.
    pub idp_subject: String,
}

impl User {
    /// Creates an active account with the given username and empty profile.
    ///
    /// New accounts default to [`auth_types::PASSWORD`]; loaders that link
    /// accounts to a provider override this with [`Self::with_auth_type`].
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            active: true,
            display_name: String::new(),
            given_name: String::new(),
            family_name: String::new(),
            email: None,
            numeric_id: None,
            shell: None,
            auth_type: auth_types::PASSWORD.to_string(),
            idp_name: String::new(),
            idp_subject: String::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Sets the given name.
    #[must_use]
    pub fn with_given_name(mut self, given_name: impl Into<String>) -> Self {
        self.given_name = given_name.into();
        self
    }

    /// Sets the family name.
    #[must_use]
    pub fn with_family_name(mut self, family_name: impl Into<String>) -> Self {
        self.family_name = family_name.into();
        self
    }

    /// Sets the mail address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the numeric uid/gid.
    #[must_use]
    pub fn with_numeric_id(mut self, numeric_id: impl Into<String>) -> Self {
        self.numeric_id = Some(numeric_id.into());
        self
    }

    /// Sets the login shell.
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Sets the authentication type.
    #[must_use]
    pub fn with_auth_type(mut self, auth_type: impl Into<String>) -> Self {
        self.auth_type = auth_type.into();
        self
    }

    /// Links the account to an identity provider.
    #[must_use]
    pub fn with_idp(mut self, idp_name: impl Into<String>, idp_subject: impl Into<String>) -> Self {
        self.idp_name = idp_name.into();
        self.idp_subject = idp_subject.into();
        self
    }

    /// Whether `current` already reflects this desired account state.
    ///
    /// The comparison is directional: `email`, `numeric_id` and `shell` are
    /// only checked when this (the desired) side carries a value. A `None`
    /// there means the source does not manage the field, so whatever the
    /// target holds is left alone.
    #[must_use]
    pub fn matches(&self, current: &User) -> bool {
        if self.active != current.active
            || self.display_name != current.display_name
            || self.given_name != current.given_name
            || self.family_name != current.family_name
            || self.auth_type != current.auth_type
            || self.idp_name != current.idp_name
            || self.idp_subject != current.idp_subject
        {
            return false;
        }
        if let Some(email) = &self.email {
            if current.email.as_ref() != Some(email) {
                return false;
            }
        }
        if let Some(numeric_id) = &self.numeric_id {
            if current.numeric_id.as_ref() != Some(numeric_id) {
                return false;
            }
        }
        if let Some(shell) = &self.shell {
            if current.shell.as_ref() != Some(shell) {
                return false;
            }
        }
        true
    }

    /// Whether the account is linked to an identity provider.
    #[must_use]
    pub fn is_federated(&self) -> bool {
        self.auth_type == auth_types::IDP && !self.idp_name.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
