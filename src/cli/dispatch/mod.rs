use crate::cli::{
    actions::{reset::Args, Action},
    commands::reset::{Options, COMMAND_RESET_PASSWORD},
};
use anyhow::{bail, Result};

/// # Errors
/// Returns an error if the subcommand is unknown or its arguments are invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((COMMAND_RESET_PASSWORD, sub_m)) => {
            let Options { config, email } = Options::parse(sub_m)?;
            Ok(Action::ResetPassword(Args { config, email }))
        }
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("missing command"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_handler_reset_password() {
        temp_env::with_vars(
            [
                ("HEALTHDESK_API_URL", None::<&str>),
                ("HEALTHDESK_ACCESS_TOKEN", None),
                ("HEALTHDESK_EMAIL", None),
                ("HEALTHDESK_MIN_PASSWORD_LENGTH", None),
                ("HEALTHDESK_TIMEOUT", None),
            ],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "healthdesk",
                    "reset-password",
                    "--email",
                    "user@example.com",
                ]);
                let action = handler(&matches).unwrap();
                let Action::ResetPassword(args) = action;
                assert_eq!(args.email.as_deref(), Some("user@example.com"));
                assert_eq!(args.config.api_base_url, "http://localhost:8000/api");
                assert_eq!(args.config.min_password_length, 8);
            },
        );
    }
}
