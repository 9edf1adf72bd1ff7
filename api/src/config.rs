//! Connection settings for the backend.

use std::time::Duration;

/// Default backend root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default number of rows requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Settings for [`HttpClient`](crate::HttpClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Backend root, without a trailing slash (e.g. `http://localhost:8080/api`)
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// Page size used by list screens
    pub page_size: u32,
}

impl ApiConfig {
    /// Create a configuration for the given backend root.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Bound every request by `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the page size used by list screens (at least 1).
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ApiConfig::new("http://backend:8080/api/");
        assert_eq!(config.base_url, "http://backend:8080/api");
    }

    #[test]
    fn builder_setters() {
        let config = ApiConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_page_size(0);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.page_size, 1);
    }
}
