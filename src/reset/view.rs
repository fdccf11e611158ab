//! What each step of the reset flow shows: one form per state, plus the inline
//! error and busy indicator. Front ends render a `FormView`; they never look at
//! `FlowState` directly.

use crate::reset::state::{FlowStage, FlowState, SubmissionStatus};
use secrecy::{ExposeSecret, SecretString};

pub const APP_TITLE: &str = "Health Management System";

const MASK_CHAR: char = '•';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldView {
    pub id: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub masked: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecondaryAction {
    ReturnToLogin,
    ResendCode,
}

impl SecondaryAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReturnToLogin => "Return to login",
            Self::ResendCode => "Didn't receive a code? Resend",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormView {
    pub stage: FlowStage,
    pub title: &'static str,
    pub subtitle: String,
    pub fields: Vec<FieldView>,
    pub submit_label: &'static str,
    pub busy: bool,
    pub secondary_action: Option<SecondaryAction>,
    pub error: Option<String>,
}

#[must_use]
pub fn render(state: &FlowState, status: &SubmissionStatus) -> FormView {
    let busy = status.is_submitting;

    let (subtitle, fields, submit_label, secondary_action) = match state {
        FlowState::EnteringEmail { email } => (
            "Enter your email to receive a password reset code".to_string(),
            vec![FieldView {
                id: "email",
                label: "Email Address",
                placeholder: "your@email.com",
                value: email.clone(),
                masked: false,
            }],
            if busy { "Sending..." } else { "Send Reset Code" },
            Some(SecondaryAction::ReturnToLogin),
        ),
        FlowState::EnteringCode { email, code } => (
            format!("We've sent a verification code to {email}"),
            vec![FieldView {
                id: "code",
                label: "Verification Code",
                placeholder: "Enter your 6-digit code",
                value: code.clone(),
                masked: false,
            }],
            if busy { "Verifying..." } else { "Verify Code" },
            Some(SecondaryAction::ResendCode),
        ),
        FlowState::SettingPassword {
            new_password,
            confirm_password,
            show_password,
            show_confirm_password,
            ..
        } => (
            "Enter your new password".to_string(),
            vec![
                password_field("password", "New Password", new_password, *show_password),
                password_field(
                    "confirmPassword",
                    "Confirm Password",
                    confirm_password,
                    *show_confirm_password,
                ),
            ],
            if busy {
                "Resetting Password..."
            } else {
                "Reset Password"
            },
            None,
        ),
    };

    FormView {
        stage: state.stage(),
        title: APP_TITLE,
        subtitle,
        fields,
        submit_label,
        busy,
        secondary_action,
        error: status.last_error.clone(),
    }
}

fn password_field(
    id: &'static str,
    label: &'static str,
    value: &SecretString,
    visible: bool,
) -> FieldView {
    let value = value.expose_secret();
    FieldView {
        id,
        label,
        placeholder: "••••••••••",
        value: if visible {
            value.to_string()
        } else {
            mask(value)
        },
        masked: !visible,
    }
}

fn mask(value: &str) -> String {
    std::iter::repeat(MASK_CHAR)
        .take(value.chars().count())
        .collect()
}
