//! Client-side checks run before any reset request leaves the process.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Email address looks invalid")]
    EmailInvalid,
    #[error("Verification code is required")]
    CodeRequired,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least {min_length} characters long")]
    PasswordTooShort { min_length: usize },
}

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

#[must_use]
pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// Trims the email and checks that it is present and plausible.
///
/// # Errors
/// Returns `EmailRequired` or `EmailInvalid`.
pub fn check_email(email: &str) -> Result<String, PolicyError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(PolicyError::EmailRequired);
    }
    if !valid_email(email) {
        return Err(PolicyError::EmailInvalid);
    }
    Ok(email.to_string())
}

/// # Errors
/// Returns `CodeRequired` when the code is blank.
pub fn check_code(code: &str) -> Result<String, PolicyError> {
    let code = code.trim();
    if code.is_empty() {
        Err(PolicyError::CodeRequired)
    } else {
        Ok(code.to_string())
    }
}

/// Password rules for the final step. Mismatch is reported before length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl PasswordPolicy {
    #[must_use]
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// # Errors
    /// Returns `PasswordMismatch` or `PasswordTooShort`.
    pub fn check(&self, new_password: &str, confirm_password: &str) -> Result<(), PolicyError> {
        if new_password != confirm_password {
            return Err(PolicyError::PasswordMismatch);
        }
        if new_password.chars().count() < self.min_length {
            return Err(PolicyError::PasswordTooShort {
                min_length: self.min_length,
            });
        }
        Ok(())
    }
}
