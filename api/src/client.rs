//! Thin HTTP wrapper over the backend REST API

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

/// Shared slot holding the bearer token.
///
/// The session container writes it on sign-in and clears it on sign-out;
/// every clone of the [`HttpClient`] reads it per request.
///
/// Writes from the session carry a generation. Effects run on their own
/// tasks, so a sign-out's clear may land before the sign-in's set that
/// preceded it; [`TokenSlot::apply`] drops any write older than the last
/// one applied.
#[derive(Clone, Default)]
pub struct TokenSlot(Arc<RwLock<Stored>>);

#[derive(Default)]
struct Stored {
    generation: u64,
    token: Option<String>,
}

impl TokenSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a token for subsequent requests.
    pub fn set(&self, token: impl Into<String>) {
        self.write().token = Some(token.into());
    }

    /// Forget the token.
    pub fn clear(&self) {
        self.write().token = None;
    }

    /// Store `token` (or forget it, for `None`) as of session `generation`.
    ///
    /// Returns `false` and leaves the slot alone when a write of the same
    /// or a later generation has already been applied.
    pub fn apply(&self, generation: u64, token: Option<String>) -> bool {
        let mut stored = self.write();
        if generation <= stored.generation {
            tracing::debug!(generation, current = stored.generation, "stale token write ignored");
            return false;
        }
        stored.generation = generation;
        stored.token = token;
        true
    }

    /// Current token, if any.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).token.clone()
    }

    /// True when a token is stored.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.0.read().unwrap_or_else(PoisonError::into_inner).token.is_some()
    }

    fn write(&self) -> RwLockWriteGuard<'_, Stored> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.is_present() { "<redacted>" } else { "<empty>" };
        f.debug_tuple("TokenSlot").field(&state).finish()
    }
}

/// Response envelope: some endpoints wrap their payload in `{"data": ...}`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// HTTP client for the backend
///
/// Cheap to clone; clones share the connection pool and the token slot.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: TokenSlot,
}

impl HttpClient {
    /// Create a client with a fresh token slot.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_token(config, TokenSlot::new())
    }

    /// Create a client sharing an existing token slot.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying client cannot be built.
    pub fn with_token(config: &ApiConfig, token: TokenSlot) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token,
        })
    }

    /// The token slot read on every request.
    #[must_use]
    pub const fn token(&self) -> &TokenSlot {
        &self.token
    }

    /// Backend root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET path?query`, decoding the (possibly wrapped) body.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] for transport, status, or decode failures.
    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path).query(query);
        self.execute(Method::GET, path, request).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] for transport, status, or decode failures.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).json(body);
        self.execute(Method::POST, path, request).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] for transport, status, or decode failures.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path).json(body);
        self.execute(Method::PUT, path, request).await
    }

    /// `PUT path?query` without a body.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] for transport, status, or decode failures.
    pub async fn put_query<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path).query(query);
        self.execute(Method::PUT, path, request).await
    }

    /// `PATCH path?query` without a body.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] for transport, status, or decode failures.
    pub async fn patch_query<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::PATCH, path).query(query);
        self.execute(Method::PATCH, path, request).await
    }

    /// `DELETE path`, returning the plain-text confirmation body.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] for transport or status failures.
    pub async fn delete(&self, path: &str) -> Result<String> {
        let response = self.send(Method::DELETE, path, self.request(Method::DELETE, path)).await?;
        let body = response.text().await?;

        // Some deployments answer with a JSON string or envelope instead of text
        Ok(serde_json::from_str::<Envelope<String>>(&body)
            .map(Envelope::into_inner)
            .unwrap_or(body))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{path}", self.base_url));
        match self.token.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T>(&self, method: Method, path: &str, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, request).await?;
        let bytes = response.bytes().await?;

        serde_json::from_slice::<Envelope<T>>(&bytes)
            .map(Envelope::into_inner)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send the request and map non-success statuses to [`ApiError`].
    async fn send(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!(%method, path, error = %e, "request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        tracing::debug!(%method, path, status = status.as_u16(), "api request");

        match status {
            s if s.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound {
                path: path.to_string(),
            }),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message: error_message(&body),
                })
            },
        }
    }
}

/// Pull `message` out of a JSON error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn token_slot_round_trip() {
        let slot = TokenSlot::new();
        assert!(!slot.is_present());

        slot.set("abc");
        assert_eq!(slot.get().as_deref(), Some("abc"));
        assert_eq!(format!("{slot:?}"), "TokenSlot(\"<redacted>\")");

        slot.clear();
        assert_eq!(slot.get(), None);
    }

    #[test]
    fn older_generations_cannot_overwrite_newer_ones() {
        let slot = TokenSlot::new();

        // Sign-out (generation 2) lands before the sign-in (generation 1).
        assert!(slot.apply(2, None));
        assert!(!slot.apply(1, Some("late".to_string())));
        assert!(!slot.is_present());

        assert!(slot.apply(3, Some("fresh".to_string())));
        assert_eq!(slot.get().as_deref(), Some("fresh"));
        assert!(!slot.apply(3, None));
        assert_eq!(slot.get().as_deref(), Some("fresh"));
    }

    #[test]
    fn clones_share_the_token() {
        let client = HttpClient::new(&ApiConfig::default()).expect("client builds");
        let other = client.clone();
        client.token().set("shared");
        assert_eq!(other.token().get().as_deref(), Some("shared"));
    }

    #[test]
    fn envelope_accepts_wrapped_and_bare() {
        let wrapped: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"data":[1,2]}"#).unwrap();
        assert_eq!(wrapped.into_inner(), vec![1, 2]);

        let bare: Envelope<Vec<u32>> =
            serde_json::from_str("[3]").unwrap();
        assert_eq!(bare.into_inner(), vec![3]);
    }

    #[test]
    fn error_message_reads_json_or_text() {
        assert_eq!(error_message(r#"{"message":"SKU already exists"}"#), "SKU already exists");
        assert_eq!(error_message("  plain failure \n"), "plain failure");
    }
}
