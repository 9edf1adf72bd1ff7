//! Console configuration.
//!
//! Loaded from environment variables (and a `.env` file, read by `main`)
//! with defaults for everything except the signed-in user.

use depot_access::{Role, Session, UserProfile};
use depot_api::ApiConfig;
use depot_api::config::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while reading the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable was set to something that does not parse
    #[error("{key} has an invalid value: {value}")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Rejected value
        value: String,
    },

    /// A token was given without the user it belongs to
    #[error("{key} must be set when DEPOT_TOKEN is set")]
    Missing {
        /// Variable name
        key: &'static str,
    },
}

/// Everything the console needs to start.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend connection settings
    pub api: ApiConfig,
    /// Bearer token obtained out of band
    pub token: Option<String>,
    /// Profile of the token's owner
    pub user: Option<UserProfile>,
}

impl ConsoleConfig {
    /// Read the configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `DEPOT_API_URL` | `http://localhost:8080/api` |
    /// | `DEPOT_API_TIMEOUT_SECS` | unbounded |
    /// | `DEPOT_PAGE_SIZE` | `10` |
    /// | `DEPOT_TOKEN` | guest |
    /// | `DEPOT_USER_ID`, `DEPOT_USERNAME`, `DEPOT_FULL_NAME`, `DEPOT_ROLE` | required with a token |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unparseable numbers or a token without a
    /// username.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`ConsoleConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut api = ApiConfig::new(var("DEPOT_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
            .with_page_size(parse(&var, "DEPOT_PAGE_SIZE")?.unwrap_or(DEFAULT_PAGE_SIZE));
        if let Some(secs) = parse::<u64>(&var, "DEPOT_API_TIMEOUT_SECS")? {
            api = api.with_timeout(Duration::from_secs(secs));
        }

        let token = var("DEPOT_TOKEN");
        let user = match &token {
            None => None,
            Some(_) => {
                let username = var("DEPOT_USERNAME").ok_or(ConfigError::Missing {
                    key: "DEPOT_USERNAME",
                })?;
                let role_name = var("DEPOT_ROLE");
                let role = Role::parse_lenient(role_name.as_deref());
                if role.is_none() {
                    tracing::warn!(role = ?role_name, "unrecognized role, no menu will be shown");
                }
                Some(UserProfile {
                    id: parse(&var, "DEPOT_USER_ID")?.unwrap_or(0),
                    username,
                    full_name: var("DEPOT_FULL_NAME"),
                    email: var("DEPOT_EMAIL"),
                    role,
                })
            },
        };

        Ok(Self { api, token, user })
    }

    /// The session described by the token and profile, if both are present.
    #[must_use]
    pub fn session(&self) -> Session {
        match (&self.token, &self.user) {
            (Some(token), Some(user)) => Session::signed_in(token.clone(), user.clone()),
            _ => Session::anonymous(),
        }
    }
}

fn parse<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    var(key)
        .map(|value| value.parse().map_err(|_| ConfigError::Invalid { key, value }))
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ConsoleConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ConsoleConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_describe_a_guest_on_localhost() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.page_size, 10);
        assert_eq!(config.api.timeout, None);
        assert!(!config.session().is_authenticated());
    }

    #[test]
    fn signed_in_user_from_env() {
        let config = config(&[
            ("DEPOT_API_URL", "http://backend:9000/api/"),
            ("DEPOT_API_TIMEOUT_SECS", "5"),
            ("DEPOT_TOKEN", "tok"),
            ("DEPOT_USER_ID", "7"),
            ("DEPOT_USERNAME", "mai"),
            ("DEPOT_ROLE", "warehouse_staff"),
        ])
        .unwrap();

        assert_eq!(config.api.base_url, "http://backend:9000/api");
        assert_eq!(config.api.timeout, Some(Duration::from_secs(5)));
        let session = config.session();
        assert_eq!(session.role(), Some(Role::WarehouseStaff));
        assert_eq!(session.user().unwrap().id, 7);
    }

    #[test]
    fn unknown_role_still_signs_in() {
        let config = config(&[
            ("DEPOT_TOKEN", "tok"),
            ("DEPOT_USERNAME", "x"),
            ("DEPOT_ROLE", "SUPERVISOR"),
        ])
        .unwrap();
        let session = config.session();
        assert!(session.is_authenticated());
        assert_eq!(session.role(), None);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config(&[("DEPOT_PAGE_SIZE", "ten")]).unwrap_err(),
            ConfigError::Invalid {
                key: "DEPOT_PAGE_SIZE",
                value: "ten".to_string(),
            }
        );
        assert_eq!(
            config(&[("DEPOT_TOKEN", "tok")]).unwrap_err().to_string(),
            "DEPOT_USERNAME must be set when DEPOT_TOKEN is set"
        );
    }
}
