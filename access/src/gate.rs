//! Route authorization gate.

use crate::role::Role;
use std::fmt;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Outcome of [`authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Show the route's content
    Render,
    /// No token: go sign in
    RedirectToLogin {
        /// Login route
        path: &'static str,
    },
    /// Signed in, but the role is not on the allow-list
    AccessDenied(AccessDenied),
}

impl GateDecision {
    /// True for [`GateDecision::Render`].
    #[must_use]
    pub const fn renders(&self) -> bool {
        matches!(self, Self::Render)
    }
}

/// The roles a route wanted and the role the user has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied {
    /// Allow-list of the route
    pub required: Vec<Role>,
    /// Role of the signed-in user, if recognized
    pub actual: Option<Role>,
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let required = self
            .required
            .iter()
            .map(|role| role.as_str())
            .collect::<Vec<_>>()
            .join(" or ");
        let actual = self.actual.map_or("unknown", Role::as_str);

        write!(
            f,
            "You don't have permission to access this page. Required role: {required}. Your role: {actual}"
        )
    }
}

/// Decide whether a route may render.
///
/// Renders iff a token is present and the allow-list is empty or contains
/// the role. A missing token always redirects to [`LOGIN_PATH`], whatever
/// the role.
#[must_use]
pub fn authorize(token_present: bool, role: Option<Role>, allowed: &[Role]) -> GateDecision {
    if !token_present {
        return GateDecision::RedirectToLogin { path: LOGIN_PATH };
    }

    if allowed.is_empty() || role.is_some_and(|role| allowed.contains(&role)) {
        return GateDecision::Render;
    }

    GateDecision::AccessDenied(AccessDenied {
        required: allowed.to_vec(),
        actual: role,
    })
}
