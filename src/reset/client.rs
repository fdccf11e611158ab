//! Backend capability used by the reset flow, plus its HTTP implementation.
//! The flow only sees `ResetApi`, so tests can swap in a fake backend.

use crate::{
    api::ApiClient,
    config::AppConfig,
    errors::AppError,
    reset::types::{ConfirmResetRequest, PasswordResetRequest, VerifyCodeRequest, VerifyCodeResponse},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

pub const REQUEST_RESET_PATH: &str = "/auth/password-reset/";
pub const VERIFY_CODE_PATH: &str = "/auth/password-reset/verify/";
pub const CONFIRM_RESET_PATH: &str = "/auth/password-reset/confirm/";

#[async_trait]
pub trait ResetApi: Send + Sync {
    /// Asks the backend to issue a verification code for `email`.
    async fn request_reset(&self, email: &str) -> Result<(), AppError>;

    /// Exchanges the emailed code for a reset token.
    async fn verify_code(&self, email: &str, code: &str) -> Result<SecretString, AppError>;

    /// Sets the new password using the token from `verify_code`.
    async fn confirm_reset(
        &self,
        token: &SecretString,
        password: &SecretString,
    ) -> Result<(), AppError>;
}

/// `ResetApi` over the dashboard's REST endpoints.
#[derive(Clone, Debug)]
pub struct HttpResetApi {
    client: ApiClient,
}

impl HttpResetApi {
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self {
            client: ApiClient::new(config)?,
        })
    }

    #[must_use]
    pub fn from_client(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResetApi for HttpResetApi {
    #[instrument(skip_all)]
    async fn request_reset(&self, email: &str) -> Result<(), AppError> {
        let request = PasswordResetRequest {
            email: email.to_string(),
        };
        self.client.post_json(REQUEST_RESET_PATH, &request).await
    }

    #[instrument(skip_all)]
    async fn verify_code(&self, email: &str, code: &str) -> Result<SecretString, AppError> {
        let request = VerifyCodeRequest {
            email: email.to_string(),
            code: code.to_string(),
        };
        let response: VerifyCodeResponse = self
            .client
            .post_json_response(VERIFY_CODE_PATH, &request)
            .await?;

        if response.token.trim().is_empty() {
            debug!("verify response carried an empty token");
            return Err(AppError::Parse("Reset token missing from response".to_string()));
        }

        Ok(SecretString::from(response.token))
    }

    #[instrument(skip_all)]
    async fn confirm_reset(
        &self,
        token: &SecretString,
        password: &SecretString,
    ) -> Result<(), AppError> {
        let request = ConfirmResetRequest {
            token: token.expose_secret(),
            password: password.expose_secret(),
        };
        self.client.post_json(CONFIRM_RESET_PATH, &request).await
    }
}
