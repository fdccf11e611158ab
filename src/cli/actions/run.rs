use crate::cli::actions::{reset, Action};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::ResetPassword(args) => reset::execute(args).await,
    }
}
