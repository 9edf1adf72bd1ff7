//! Error types for the backend client

use thiserror::Error;

/// Result alias used by every service module.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur when talking to the backend
///
/// Each failure is reported once; the client never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Missing or expired token (HTTP 401)
    #[error("Unauthorized - please sign in again")]
    Unauthorized,

    /// Authenticated, but the role may not do this (HTTP 403)
    #[error("Forbidden - insufficient permissions")]
    Forbidden,

    /// The addressed resource does not exist (HTTP 404)
    #[error("Not found: {path}")]
    NotFound {
        /// Request path that produced the 404
        path: String,
    },

    /// Any other non-success status
    #[error("Backend error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Message from the response body
        message: String,
    },

    /// Request never produced a response (connection refused, timeout, ...)
    #[error("Request failed: {0}")]
    Transport(String),

    /// Response body did not match the expected shape
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// Client-side check rejected the request before it was sent
    #[error("Invalid request: {0}")]
    Invalid(String),
}

impl ApiError {
    /// True for [`ApiError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Message suitable for a user-facing notice.
    ///
    /// Backend messages are shown as-is; everything else uses the error's
    /// display form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_backend_text() {
        let error = ApiError::Status {
            status: 400,
            message: "Insufficient stock for product: Mouse".to_string(),
        };
        assert_eq!(error.user_message(), "Insufficient stock for product: Mouse");

        let error = ApiError::Status {
            status: 500,
            message: String::new(),
        };
        assert_eq!(error.user_message(), "Backend error (status 500): ");
    }

    #[test]
    fn not_found_is_typed() {
        let error = ApiError::NotFound {
            path: "/products/9".to_string(),
        };
        assert!(error.is_not_found());
        assert!(!ApiError::Forbidden.is_not_found());
    }
}
