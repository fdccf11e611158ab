//! Request and response payloads for the reset endpoints. The confirm request
//! and the verify response carry reset tokens and passwords, so they have no
//! `Debug` impl and must never be logged.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct VerifyCodeResponse {
    pub token: String,
}

#[derive(Serialize)]
pub struct ConfirmResetRequest<'a> {
    pub token: &'a str,
    pub password: &'a str,
}
