//! Password reset flow controller.
//!
//! The controller is a reducer: [`ResetFlow::dispatch`] applies a UI event and,
//! for submits, hands back the single backend request to run. Feeding that
//! request's [`Completion`] to [`ResetFlow::complete`] applies the outcome.
//! [`ResetFlow::handle`] does both in one call for callers that simply await.
//!
//! While a request is in flight every event except returning to login is
//! ignored, which covers repeated submits as well as edits to a form that is
//! already on its way.

use crate::{
    config::AppConfig,
    errors::AppError,
    reset::{
        client::ResetApi,
        policy::{self, PasswordPolicy, PolicyError},
        state::{FlowStage, FlowState, Redirect, SubmissionStatus, RESET_SUCCESS_MESSAGE},
        view::{self, FormView},
    },
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use ulid::Ulid;

#[derive(Debug)]
pub enum FlowEvent {
    EmailChanged(String),
    CodeChanged(String),
    NewPasswordChanged(SecretString),
    ConfirmPasswordChanged(SecretString),
    TogglePasswordVisibility,
    ToggleConfirmPasswordVisibility,
    SubmitEmail,
    SubmitCode,
    ResendCode,
    SubmitPassword,
    ReturnToLogin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    RequestCode,
    ResendCode,
    VerifyCode,
    ConfirmReset,
}

impl RequestKind {
    /// Message shown when the backend gives no reason for a failure.
    #[must_use]
    pub const fn default_error(self) -> &'static str {
        match self {
            Self::RequestCode | Self::ResendCode => "Failed to send reset code",
            Self::VerifyCode => "Invalid verification code",
            Self::ConfirmReset => "Failed to reset password",
        }
    }
}

/// Backend call requested by a submit event.
#[derive(Clone, Debug)]
pub enum PendingRequest {
    RequestCode { email: String },
    ResendCode { email: String },
    VerifyCode { email: String, code: String },
    ConfirmReset { token: SecretString, password: SecretString },
}

impl PendingRequest {
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::RequestCode { .. } => RequestKind::RequestCode,
            Self::ResendCode { .. } => RequestKind::ResendCode,
            Self::VerifyCode { .. } => RequestKind::VerifyCode,
            Self::ConfirmReset { .. } => RequestKind::ConfirmReset,
        }
    }

    /// Performs the one network call this request stands for.
    pub async fn execute<T: ResetApi + ?Sized>(&self, api: &T) -> Completion {
        match self {
            Self::RequestCode { email } => Completion::CodeSent(api.request_reset(email).await),
            Self::ResendCode { email } => Completion::CodeResent(api.request_reset(email).await),
            Self::VerifyCode { email, code } => {
                Completion::CodeVerified(api.verify_code(email, code).await)
            }
            Self::ConfirmReset { token, password } => {
                Completion::PasswordReset(api.confirm_reset(token, password).await)
            }
        }
    }
}

#[derive(Debug)]
pub enum Completion {
    CodeSent(Result<(), AppError>),
    CodeResent(Result<(), AppError>),
    CodeVerified(Result<SecretString, AppError>),
    PasswordReset(Result<(), AppError>),
}

impl Completion {
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::CodeSent(_) => RequestKind::RequestCode,
            Self::CodeResent(_) => RequestKind::ResendCode,
            Self::CodeVerified(_) => RequestKind::VerifyCode,
            Self::PasswordReset(_) => RequestKind::ConfirmReset,
        }
    }
}

/// Immediate result of [`ResetFlow::dispatch`].
#[derive(Debug)]
pub enum Dispatch {
    Updated,
    Ignored,
    Rejected(PolicyError),
    Request(PendingRequest),
    Navigate(Redirect),
}

/// Observable result of an event once any backend call has resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowUpdate {
    Updated,
    Ignored,
    Rejected(PolicyError),
    Advanced(FlowStage),
    CodeResent,
    Failed(String),
    Finished(Redirect),
}

pub struct ResetFlow<A> {
    api: A,
    state: FlowState,
    status: SubmissionStatus,
    policy: PasswordPolicy,
    login_path: String,
    in_flight: Option<RequestKind>,
    finished: bool,
    flow_id: Ulid,
}

impl<A> ResetFlow<A> {
    #[must_use]
    pub fn new(api: A, config: &AppConfig) -> Self {
        Self {
            api,
            state: FlowState::default(),
            status: SubmissionStatus::default(),
            policy: PasswordPolicy::new(config.min_password_length),
            login_path: config.login_path.clone(),
            in_flight: None,
            finished: false,
            flow_id: Ulid::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn stage(&self) -> FlowStage {
        self.state.stage()
    }

    pub fn flow_id(&self) -> Ulid {
        self.flow_id
    }

    pub fn policy(&self) -> PasswordPolicy {
        self.policy
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn view(&self) -> FormView {
        view::render(&self.state, &self.status)
    }

    /// Applies an event. Submits that pass client-side checks return the
    /// request to run; its result must be passed back to [`Self::complete`].
    pub fn dispatch(&mut self, event: FlowEvent) -> Dispatch {
        if self.finished {
            return Dispatch::Ignored;
        }
        if let FlowEvent::ReturnToLogin = event {
            return self.return_to_login();
        }
        if self.status.is_submitting {
            debug!(flow_id = %self.flow_id, "event ignored while a request is in flight");
            return Dispatch::Ignored;
        }

        match event {
            FlowEvent::EmailChanged(value) => match &mut self.state {
                FlowState::EnteringEmail { email } => {
                    *email = value;
                    Dispatch::Updated
                }
                _ => Dispatch::Ignored,
            },
            FlowEvent::CodeChanged(value) => match &mut self.state {
                FlowState::EnteringCode { code, .. } => {
                    *code = value;
                    Dispatch::Updated
                }
                _ => Dispatch::Ignored,
            },
            FlowEvent::NewPasswordChanged(value) => match &mut self.state {
                FlowState::SettingPassword { new_password, .. } => {
                    *new_password = value;
                    Dispatch::Updated
                }
                _ => Dispatch::Ignored,
            },
            FlowEvent::ConfirmPasswordChanged(value) => match &mut self.state {
                FlowState::SettingPassword {
                    confirm_password, ..
                } => {
                    *confirm_password = value;
                    Dispatch::Updated
                }
                _ => Dispatch::Ignored,
            },
            FlowEvent::TogglePasswordVisibility => match &mut self.state {
                FlowState::SettingPassword { show_password, .. } => {
                    *show_password = !*show_password;
                    Dispatch::Updated
                }
                _ => Dispatch::Ignored,
            },
            FlowEvent::ToggleConfirmPasswordVisibility => match &mut self.state {
                FlowState::SettingPassword {
                    show_confirm_password,
                    ..
                } => {
                    *show_confirm_password = !*show_confirm_password;
                    Dispatch::Updated
                }
                _ => Dispatch::Ignored,
            },
            FlowEvent::SubmitEmail => self.submit_email(),
            FlowEvent::SubmitCode => self.submit_code(),
            FlowEvent::ResendCode => self.resend_code(),
            FlowEvent::SubmitPassword => self.submit_password(),
            FlowEvent::ReturnToLogin => self.return_to_login(),
        }
    }

    /// Applies the result of the request handed out by [`Self::dispatch`].
    /// Completions that do not match the in-flight request are ignored.
    pub fn complete(&mut self, completion: Completion) -> FlowUpdate {
        let kind = completion.kind();
        if self.finished || self.in_flight != Some(kind) {
            warn!(flow_id = %self.flow_id, ?kind, "completion without a matching request");
            return FlowUpdate::Ignored;
        }
        self.in_flight = None;
        self.status.is_submitting = false;

        match completion {
            Completion::CodeSent(Ok(())) => {
                let email = self.state.email().to_string();
                self.state = FlowState::entering_code(email);
                info!(flow_id = %self.flow_id, "verification code sent");
                FlowUpdate::Advanced(FlowStage::EnteringCode)
            }
            Completion::CodeResent(Ok(())) => {
                self.status.last_error = None;
                info!(flow_id = %self.flow_id, "verification code resent");
                FlowUpdate::CodeResent
            }
            Completion::CodeVerified(Ok(token)) => {
                if token.expose_secret().trim().is_empty() {
                    let err = AppError::Parse("Reset token missing from response".to_string());
                    return self.fail(kind, &err);
                }
                let email = self.state.email().to_string();
                self.state = FlowState::setting_password(email, token);
                info!(flow_id = %self.flow_id, "verification code accepted");
                FlowUpdate::Advanced(FlowStage::SettingPassword)
            }
            Completion::PasswordReset(Ok(())) => {
                self.finished = true;
                info!(flow_id = %self.flow_id, "password reset complete");
                FlowUpdate::Finished(Redirect {
                    path: self.login_path.clone(),
                    message: Some(RESET_SUCCESS_MESSAGE.to_string()),
                })
            }
            Completion::CodeSent(Err(err))
            | Completion::CodeResent(Err(err))
            | Completion::CodeVerified(Err(err))
            | Completion::PasswordReset(Err(err)) => self.fail(kind, &err),
        }
    }

    fn submit_email(&mut self) -> Dispatch {
        let FlowState::EnteringEmail { email } = &mut self.state else {
            return Dispatch::Ignored;
        };
        self.status.last_error = None;

        match policy::check_email(email) {
            Ok(normalized) => {
                email.clone_from(&normalized);
                self.begin(PendingRequest::RequestCode { email: normalized })
            }
            Err(err) => self.reject(err),
        }
    }

    fn submit_code(&mut self) -> Dispatch {
        let FlowState::EnteringCode { email, code } = &self.state else {
            return Dispatch::Ignored;
        };

        let request = policy::check_code(code).map(|code| PendingRequest::VerifyCode {
            email: email.clone(),
            code,
        });
        self.status.last_error = None;

        match request {
            Ok(request) => self.begin(request),
            Err(err) => self.reject(err),
        }
    }

    fn resend_code(&mut self) -> Dispatch {
        let FlowState::EnteringCode { email, .. } = &self.state else {
            return Dispatch::Ignored;
        };
        let request = PendingRequest::ResendCode {
            email: email.clone(),
        };
        self.begin(request)
    }

    fn submit_password(&mut self) -> Dispatch {
        let FlowState::SettingPassword {
            token,
            new_password,
            confirm_password,
            ..
        } = &self.state
        else {
            return Dispatch::Ignored;
        };

        let request = self
            .policy
            .check(new_password.expose_secret(), confirm_password.expose_secret())
            .map(|()| PendingRequest::ConfirmReset {
                token: token.clone(),
                password: new_password.clone(),
            });
        self.status.last_error = None;

        match request {
            Ok(request) => self.begin(request),
            Err(err) => self.reject(err),
        }
    }

    /// Leaves the flow from any step. A request still in flight is abandoned
    /// and its completion will be ignored.
    fn return_to_login(&mut self) -> Dispatch {
        info!(flow_id = %self.flow_id, stage = ?self.state.stage(), "returning to login");
        self.finished = true;
        self.in_flight = None;
        self.status.is_submitting = false;
        Dispatch::Navigate(Redirect {
            path: self.login_path.clone(),
            message: None,
        })
    }

    fn begin(&mut self, request: PendingRequest) -> Dispatch {
        let kind = request.kind();
        debug!(flow_id = %self.flow_id, ?kind, "submitting");
        self.status.is_submitting = true;
        self.in_flight = Some(kind);
        Dispatch::Request(request)
    }

    fn reject(&mut self, err: PolicyError) -> Dispatch {
        debug!(flow_id = %self.flow_id, error = %err, "submission rejected before sending");
        self.status.last_error = Some(err.to_string());
        Dispatch::Rejected(err)
    }

    fn fail(&mut self, kind: RequestKind, err: &AppError) -> FlowUpdate {
        let message = err.user_message(kind.default_error());
        warn!(flow_id = %self.flow_id, ?kind, error = %err, "reset request failed");
        self.status.last_error = Some(message.clone());
        FlowUpdate::Failed(message)
    }
}

impl<A: ResetApi> ResetFlow<A> {
    /// Dispatches an event and, if it produced a request, awaits it and applies
    /// the outcome.
    pub async fn handle(&mut self, event: FlowEvent) -> FlowUpdate {
        match self.dispatch(event) {
            Dispatch::Request(request) => {
                let completion = request.execute(&self.api).await;
                self.complete(completion)
            }
            Dispatch::Updated => FlowUpdate::Updated,
            Dispatch::Ignored => FlowUpdate::Ignored,
            Dispatch::Rejected(err) => FlowUpdate::Rejected(err),
            Dispatch::Navigate(redirect) => FlowUpdate::Finished(redirect),
        }
    }
}
