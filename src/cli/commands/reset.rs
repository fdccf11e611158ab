use crate::config::{AppConfig, DEFAULT_API_BASE_URL, DEFAULT_MIN_PASSWORD_LENGTH};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::time::Duration;

pub const COMMAND_RESET_PASSWORD: &str = "reset-password";
pub const ARG_API_URL: &str = "api-url";
pub const ARG_ACCESS_TOKEN: &str = "access-token";
pub const ARG_EMAIL: &str = "email";
pub const ARG_MIN_PASSWORD_LENGTH: &str = "min-password-length";
pub const ARG_TIMEOUT: &str = "timeout";

#[must_use]
pub fn command() -> Command {
    Command::new(COMMAND_RESET_PASSWORD)
        .about("Reset an account password with an emailed verification code")
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the dashboard REST API")
                .env("HEALTHDESK_API_URL")
                .default_value(DEFAULT_API_BASE_URL),
        )
        .arg(
            Arg::new(ARG_ACCESS_TOKEN)
                .long(ARG_ACCESS_TOKEN)
                .help("Optional bearer token sent with reset requests")
                .env("HEALTHDESK_ACCESS_TOKEN")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_EMAIL)
                .short('e')
                .long(ARG_EMAIL)
                .help("Prefill the account email")
                .env("HEALTHDESK_EMAIL"),
        )
        .arg(
            Arg::new(ARG_MIN_PASSWORD_LENGTH)
                .long(ARG_MIN_PASSWORD_LENGTH)
                .help("Minimum length accepted for the new password")
                .env("HEALTHDESK_MIN_PASSWORD_LENGTH")
                .default_value("8")
                .value_parser(clap::value_parser!(u16).range(1..)),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds (default: none)")
                .env("HEALTHDESK_TIMEOUT")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub config: AppConfig,
    pub email: Option<String>,
}

impl Options {
    /// Builds the client config from the `reset-password` matches.
    ///
    /// # Errors
    /// Returns an error if the API URL or policy values are invalid.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let api_url = matches
            .get_one::<String>(ARG_API_URL)
            .map_or(DEFAULT_API_BASE_URL, String::as_str);
        let min_password_length = matches
            .get_one::<u16>(ARG_MIN_PASSWORD_LENGTH)
            .copied()
            .map_or(DEFAULT_MIN_PASSWORD_LENGTH, usize::from);
        let timeout = matches
            .get_one::<u64>(ARG_TIMEOUT)
            .copied()
            .map(Duration::from_secs);

        let config = AppConfig::new(api_url)
            .context("invalid --api-url")?
            .with_access_token(matches.get_one::<String>(ARG_ACCESS_TOKEN).map(String::as_str))
            .with_min_password_length(min_password_length)
            .context("invalid --min-password-length")?
            .with_request_timeout(timeout);

        let email = matches
            .get_one::<String>(ARG_EMAIL)
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());

        Ok(Self { config, email })
    }
}
