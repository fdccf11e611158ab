//! Client configuration for the reset flow. Values come from CLI arguments or
//! their environment fallbacks; the optional access token is the only secret and
//! is kept in a `SecretString`.

use crate::errors::AppError;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// API base used when nothing is configured, matching the dashboard's local backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
/// Minimum accepted length for a new password.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;
/// Login entry point the flow hands control back to.
pub const DEFAULT_LOGIN_PATH: &str = "/";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub access_token: Option<SecretString>,
    pub min_password_length: usize,
    /// `None` leaves timeouts to the HTTP stack.
    pub request_timeout: Option<Duration>,
    pub login_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token: None,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            request_timeout: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl AppConfig {
    /// Builds a config for the given API base URL with default policy values.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the URL is not an absolute http(s) URL.
    pub fn new(api_base_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            api_base_url: validate_base_url(api_base_url)?,
            ..Self::default()
        })
    }

    /// Sets the bearer token; blank values are treated as absent.
    #[must_use]
    pub fn with_access_token(mut self, token: Option<&str>) -> Self {
        self.access_token = token
            .and_then(normalize_value)
            .map(SecretString::from);
        self
    }

    /// # Errors
    /// Returns `AppError::Config` for a zero length policy.
    pub fn with_min_password_length(mut self, length: usize) -> Result<Self, AppError> {
        if length == 0 {
            return Err(AppError::Config(
                "Minimum password length must be at least 1.".to_string(),
            ));
        }
        self.min_password_length = length;
        Ok(self)
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout.filter(|value| !value.is_zero());
        self
    }
}

fn validate_base_url(value: &str) -> Result<String, AppError> {
    let trimmed = normalize_value(value)
        .ok_or_else(|| AppError::Config("API base URL is empty.".to_string()))?;
    let url = Url::parse(&trimmed)
        .map_err(|err| AppError::Config(format!("Invalid API base URL: {err}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::Config(format!(
                "Unsupported API base URL scheme: {scheme}"
            )))
        }
    }
    if url.host().is_none() {
        return Err(AppError::Config("API base URL has no host.".to_string()));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
