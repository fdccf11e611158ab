//! # healthdesk
//!
//! Client side of the Health Management System password reset. The flow runs in
//! three steps against the dashboard's REST backend:
//!
//! 1. **Request:** `POST /auth/password-reset/` with the account email issues a
//!    verification code.
//! 2. **Verify:** `POST /auth/password-reset/verify/` exchanges email and code for
//!    an opaque reset token.
//! 3. **Confirm:** `POST /auth/password-reset/confirm/` sets the new password using
//!    that token, after which control returns to the login screen.
//!
//! The flow itself lives in [`reset`] and talks to the backend only through the
//! [`reset::ResetApi`] trait, so it can run against a fake in tests. The `cli`
//! module drives it interactively from a terminal.
//!
//! Reset tokens and passwords are held in `SecretString` and must never be
//! logged.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod reset;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
