//! Password reset feature: flow controller, backend capability and view model.
//! This module handles reset tokens and new passwords and must never log them.
//!
//! Flow Overview: the email step requests a code, the code step exchanges it for
//! a reset token (with resend available), and the password step confirms the new
//! password with that token before handing control back to login.

pub mod client;
pub mod controller;
pub mod policy;
pub mod state;
pub mod types;
pub mod view;

pub use client::{HttpResetApi, ResetApi};
pub use controller::{Completion, Dispatch, FlowEvent, FlowUpdate, PendingRequest, RequestKind, ResetFlow};
pub use policy::{PasswordPolicy, PolicyError};
pub use state::{FlowStage, FlowState, Redirect, SubmissionStatus, RESET_SUCCESS_MESSAGE};
pub use view::{FieldView, FormView, SecondaryAction};
