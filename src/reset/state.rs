use secrecy::SecretString;

/// Message handed to the login screen after a successful reset.
pub const RESET_SUCCESS_MESSAGE: &str =
    "Password reset successful. You can now log in with your new password.";

/// Current step of the reset flow. Each variant carries only the data that
/// exists at that step, so a token can never be present before verification.
#[derive(Clone, Debug)]
pub enum FlowState {
    EnteringEmail {
        email: String,
    },
    EnteringCode {
        email: String,
        code: String,
    },
    SettingPassword {
        email: String,
        token: SecretString,
        new_password: SecretString,
        confirm_password: SecretString,
        show_password: bool,
        show_confirm_password: bool,
    },
}

impl Default for FlowState {
    fn default() -> Self {
        Self::EnteringEmail {
            email: String::new(),
        }
    }
}

impl FlowState {
    #[must_use]
    pub fn stage(&self) -> FlowStage {
        match self {
            Self::EnteringEmail { .. } => FlowStage::EnteringEmail,
            Self::EnteringCode { .. } => FlowStage::EnteringCode,
            Self::SettingPassword { .. } => FlowStage::SettingPassword,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::EnteringEmail { email }
            | Self::EnteringCode { email, .. }
            | Self::SettingPassword { email, .. } => email,
        }
    }

    /// Reset token, only ever present in `SettingPassword`.
    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        match self {
            Self::SettingPassword { token, .. } => Some(token),
            _ => None,
        }
    }

    pub(crate) fn entering_code(email: String) -> Self {
        Self::EnteringCode {
            email,
            code: String::new(),
        }
    }

    pub(crate) fn setting_password(email: String, token: SecretString) -> Self {
        Self::SettingPassword {
            email,
            token,
            new_password: SecretString::default(),
            confirm_password: SecretString::default(),
            show_password: false,
            show_confirm_password: false,
        }
    }
}

/// Data-free mirror of `FlowState`, handy for logging and assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowStage {
    EnteringEmail,
    EnteringCode,
    SettingPassword,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionStatus {
    pub is_submitting: bool,
    pub last_error: Option<String>,
}

/// Hand-off to the login entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub path: String,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn starts_in_entering_email() {
        let state = FlowState::default();
        assert_eq!(state.stage(), FlowStage::EnteringEmail);
        assert_eq!(state.email(), "");
        assert!(state.token().is_none());
    }

    #[test]
    fn token_only_in_setting_password() {
        let state = FlowState::entering_code("user@example.com".to_string());
        assert!(state.token().is_none());

        let state = FlowState::setting_password(
            "user@example.com".to_string(),
            SecretString::from("tok".to_string()),
        );
        assert_eq!(state.stage(), FlowStage::SettingPassword);
        assert_eq!(state.email(), "user@example.com");
        assert_eq!(state.token().map(|token| token.expose_secret()), Some("tok"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let state = FlowState::setting_password(
            "user@example.com".to_string(),
            SecretString::from("super-secret-token".to_string()),
        );
        let rendered = format!("{state:?}");
        assert!(!rendered.contains("super-secret-token"));
    }
}
