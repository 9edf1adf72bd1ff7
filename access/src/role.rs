//! The closed set of user roles.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A user's role. Every role-keyed table matches on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access to every dashboard section
    Admin,
    /// Operations management
    Manager,
    /// Receives and dispatches goods in one warehouse
    WarehouseStaff,
    /// Delivers shipments
    Driver,
    /// Storefront shopper
    Customer,
}

/// Colour family of the role badge in the navigation shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Red
    Error,
    /// Orange
    Warning,
    /// Blue
    Info,
    /// Green
    Success,
    /// Brand colour
    Primary,
}

/// Role string that names none of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    /// Every role.
    pub const ALL: [Self; 5] = [
        Self::Admin,
        Self::Manager,
        Self::WarehouseStaff,
        Self::Driver,
        Self::Customer,
    ];

    /// Wire name (`WAREHOUSE_STAFF`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::WarehouseStaff => "WAREHOUSE_STAFF",
            Self::Driver => "DRIVER",
            Self::Customer => "CUSTOMER",
        }
    }

    /// Badge text (`WAREHOUSE STAFF`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::WarehouseStaff => "WAREHOUSE STAFF",
            Self::Driver => "DRIVER",
            Self::Customer => "CUSTOMER",
        }
    }

    /// Badge colour.
    #[must_use]
    pub const fn tone(self) -> Tone {
        match self {
            Self::Admin => Tone::Error,
            Self::Manager => Tone::Warning,
            Self::WarehouseStaff => Tone::Info,
            Self::Driver => Tone::Success,
            Self::Customer => Tone::Primary,
        }
    }

    /// Where a signed-in user of this role lands.
    #[must_use]
    pub const fn landing_route(self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::Manager => "/manager/dashboard",
            Self::WarehouseStaff => "/warehouse/dashboard",
            Self::Driver => "/driver/dashboard",
            Self::Customer => "/",
        }
    }

    /// Parse an optional role string; absent or unrecognized yields `None`.
    #[must_use]
    pub fn parse_lenient(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| v.parse().ok())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Deserialize an optional role, reading unrecognized strings as `None`.
///
/// A profile with a role this client does not know still loads; its owner
/// simply gets no menu and no role-gated routes.
///
/// # Errors
///
/// Fails only when the value is neither null nor a string.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let role = Role::parse_lenient(raw.as_deref());
    if let (None, Some(raw)) = (role, raw.as_deref()) {
        tracing::debug!(role = raw, "unrecognized role in profile");
    }
    Ok(role)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("WAREHOUSE_STAFF".parse::<Role>().unwrap(), Role::WarehouseStaff);
        assert_eq!(" driver ".parse::<Role>().unwrap(), Role::Driver);
        assert_eq!(
            "SUPERVISOR".parse::<Role>(),
            Err(UnknownRole("SUPERVISOR".to_string()))
        );
    }

    #[test]
    fn lenient_parse_swallows_unknowns() {
        assert_eq!(Role::parse_lenient(Some("ADMIN")), Some(Role::Admin));
        assert_eq!(Role::parse_lenient(Some("ROOT")), None);
        assert_eq!(Role::parse_lenient(None), None);
    }

    #[test]
    fn badges() {
        assert_eq!(Role::WarehouseStaff.label(), "WAREHOUSE STAFF");
        assert_eq!(Role::Admin.tone(), Tone::Error);
        assert_eq!(Role::Manager.tone(), Tone::Warning);
        assert_eq!(Role::WarehouseStaff.tone(), Tone::Info);
        assert_eq!(Role::Driver.tone(), Tone::Success);
        assert_eq!(Role::Customer.tone(), Tone::Primary);
    }

    #[test]
    fn landing_routes() {
        assert_eq!(Role::Admin.landing_route(), "/admin/dashboard");
        assert_eq!(Role::Customer.landing_route(), "/");
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::WarehouseStaff).unwrap(),
            "\"WAREHOUSE_STAFF\""
        );
    }
}
