//! Error type shared by the HTTP helpers and the reset flow. Messages carried by
//! `Http` come from the backend body and are already trimmed and truncated, so
//! they are safe to show to the user.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Http { status: u16, message: Option<String> },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Message supplied by the backend in a rejected response, if any.
    /// Transport and decoding failures never carry one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Http {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Backend message, or `fallback` when the failure carried none.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.backend_message().unwrap_or(fallback).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_only_for_http_with_message() {
        let rejected = AppError::Http {
            status: 400,
            message: Some("Invalid verification code".to_string()),
        };
        assert_eq!(rejected.backend_message(), Some("Invalid verification code"));

        let bare = AppError::Http {
            status: 500,
            message: None,
        };
        assert_eq!(bare.backend_message(), None);

        let network = AppError::Network("connection refused".to_string());
        assert_eq!(network.backend_message(), None);
    }

    #[test]
    fn user_message_falls_back() {
        let timeout = AppError::Timeout("Request timed out.".to_string());
        assert_eq!(
            timeout.user_message("Failed to send reset code"),
            "Failed to send reset code"
        );
    }

    #[test]
    fn display_includes_status() {
        let err = AppError::Http {
            status: 404,
            message: None,
        };
        assert_eq!(err.to_string(), "Request failed (404): no details");
    }
}
