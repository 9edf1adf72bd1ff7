//! The signed-in user as the client sees it.

use crate::role::{self, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer token handed out by the backend at sign-in.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Server-assigned user id
    pub id: i64,
    /// Login name
    pub username: String,
    /// Display name
    pub full_name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Role; `None` when the backend sent one this client does not know
    #[serde(default, deserialize_with = "role::deserialize_lenient")]
    pub role: Option<Role>,
}

impl UserProfile {
    /// A profile with the given role and no optional fields.
    #[must_use]
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            full_name: None,
            email: None,
            role: Some(role),
        }
    }

    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}

/// Token plus profile; both absent for a guest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<AuthToken>,
    user: Option<UserProfile>,
}

impl Session {
    /// A guest session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session for a signed-in user.
    #[must_use]
    pub fn signed_in(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: Some(AuthToken::new(token)),
            user: Some(user),
        }
    }

    /// The bearer token, if signed in.
    #[must_use]
    pub const fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// True when a token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Role of the signed-in user, if recognized.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(|user| user.role)
    }
}
