use crate::{
    config::AppConfig,
    reset::{
        Dispatch, FlowEvent, FlowStage, FlowState, FlowUpdate, FormView, HttpResetApi, Redirect,
        ResetApi, ResetFlow, SecondaryAction,
    },
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::io::{ErrorKind, IsTerminal};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

const CMD_LOGIN: &str = ":login";
const CMD_RESEND: &str = ":resend";
const CMD_SHOW: &str = ":show";
const CMD_SHOW_CONFIRM: &str = ":show-confirm";

/// How password answers are read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordEcho {
    /// Read from the terminal with echo off unless visibility is toggled on.
    Hidden,
    /// Read from the line input like any other answer.
    Visible,
}

impl PasswordEcho {
    const fn hides(self, shown: bool) -> bool {
        matches!(self, Self::Hidden) && !shown
    }
}

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub email: Option<String>,
}

/// Run the reset flow interactively on stdin/stdout.
/// # Errors
/// Returns an error if the HTTP client cannot be built or the terminal fails.
pub async fn execute(args: Args) -> Result<()> {
    let api = HttpResetApi::new(&args.config).context("failed to build HTTP client")?;
    let mut flow = ResetFlow::new(api, &args.config);

    info!(
        flow_id = %flow.flow_id(),
        api_url = %args.config.api_base_url,
        "starting password reset"
    );

    if let Some(email) = args.email {
        flow.dispatch(FlowEvent::EmailChanged(email));
    }

    let echo = if std::io::stdin().is_terminal() {
        PasswordEcho::Hidden
    } else {
        PasswordEcho::Visible
    };
    let mut input = BufReader::new(io::stdin());
    let mut output = io::stdout();

    if drive(&mut flow, &mut input, &mut output, echo).await?.is_none() {
        debug!(flow_id = %flow.flow_id(), "input closed before the flow finished");
    }

    Ok(())
}

/// Feeds lines from `input` into the flow until it finishes or input ends.
///
/// Returns the redirect the flow finished with, or `None` on end of input.
///
/// # Errors
/// Returns an error if reading or writing the terminal fails.
pub async fn drive<A, R, W>(
    flow: &mut ResetFlow<A>,
    input: &mut R,
    output: &mut W,
    echo: PasswordEcho,
) -> Result<Option<Redirect>>
where
    A: ResetApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        write_out(output, &render_form(&flow.view())).await?;

        let events = match flow.stage() {
            FlowStage::EnteringEmail => {
                let Some(line) = prompt(input, output, "Email Address: ").await? else {
                    return Ok(None);
                };
                let command = line.trim().to_owned();
                match command.as_str() {
                    CMD_LOGIN => vec![FlowEvent::ReturnToLogin],
                    // Keep a prefilled address on an empty answer.
                    "" if !flow.state().email().is_empty() => vec![FlowEvent::SubmitEmail],
                    _ => vec![FlowEvent::EmailChanged(line), FlowEvent::SubmitEmail],
                }
            }
            FlowStage::EnteringCode => {
                let Some(line) = prompt(input, output, "Verification Code: ").await? else {
                    return Ok(None);
                };
                let command = line.trim().to_owned();
                match command.as_str() {
                    CMD_LOGIN => vec![FlowEvent::ReturnToLogin],
                    CMD_RESEND => vec![FlowEvent::ResendCode],
                    _ => vec![FlowEvent::CodeChanged(line), FlowEvent::SubmitCode],
                }
            }
            FlowStage::SettingPassword => {
                let (show_password, show_confirm) = match flow.state() {
                    FlowState::SettingPassword {
                        show_password,
                        show_confirm_password,
                        ..
                    } => (*show_password, *show_confirm_password),
                    _ => (false, false),
                };
                let hide = echo.hides(show_password);
                let Some(line) = read_password(input, output, "New Password: ", hide).await?
                else {
                    return Ok(None);
                };
                if line.trim() == CMD_LOGIN {
                    vec![FlowEvent::ReturnToLogin]
                } else if line.trim() == CMD_SHOW {
                    vec![FlowEvent::TogglePasswordVisibility]
                } else if line.trim() == CMD_SHOW_CONFIRM {
                    vec![FlowEvent::ToggleConfirmPasswordVisibility]
                } else {
                    let new_password = SecretString::from(line);
                    let hide = echo.hides(show_confirm);
                    let Some(confirm) =
                        read_password(input, output, "Confirm Password: ", hide).await?
                    else {
                        return Ok(None);
                    };
                    vec![
                        FlowEvent::NewPasswordChanged(new_password),
                        FlowEvent::ConfirmPasswordChanged(SecretString::from(confirm)),
                        FlowEvent::SubmitPassword,
                    ]
                }
            }
        };

        for event in events {
            match apply(flow, event, output).await? {
                FlowUpdate::Finished(redirect) => {
                    if let Some(message) = &redirect.message {
                        write_out(output, &format!("{message}\n")).await?;
                    }
                    write_out(output, &format!("Returning to login ({})\n", redirect.path))
                        .await?;
                    return Ok(Some(redirect));
                }
                FlowUpdate::CodeResent => {
                    let notice = format!(
                        "A new verification code has been sent to {}\n",
                        flow.state().email()
                    );
                    write_out(output, &notice).await?;
                }
                FlowUpdate::Rejected(_) | FlowUpdate::Failed(_) => break,
                FlowUpdate::Updated | FlowUpdate::Ignored | FlowUpdate::Advanced(_) => {}
            }
        }
    }
}

/// Runs one event, showing the busy label while its request is in flight.
async fn apply<A, W>(flow: &mut ResetFlow<A>, event: FlowEvent, output: &mut W) -> Result<FlowUpdate>
where
    A: ResetApi,
    W: AsyncWrite + Unpin,
{
    let update = match flow.dispatch(event) {
        Dispatch::Request(request) => {
            write_out(output, &format!("{}\n", flow.view().submit_label)).await?;
            let completion = request.execute(flow.api()).await;
            flow.complete(completion)
        }
        Dispatch::Updated => FlowUpdate::Updated,
        Dispatch::Ignored => FlowUpdate::Ignored,
        Dispatch::Rejected(err) => FlowUpdate::Rejected(err),
        Dispatch::Navigate(redirect) => FlowUpdate::Finished(redirect),
    };
    Ok(update)
}

fn render_form(view: &FormView) -> String {
    let mut lines = vec![String::new(), view.title.to_string(), view.subtitle.clone()];

    for field in view.fields.iter().filter(|field| !field.value.is_empty()) {
        lines.push(format!("  {}: {}", field.label, field.value));
    }

    if let Some(error) = &view.error {
        lines.push(format!("Error: {error}"));
    }

    let mut hints = vec![format!("Enter to {}", view.submit_label)];
    match view.secondary_action {
        Some(SecondaryAction::ReturnToLogin) => {
            hints.push(format!("{CMD_LOGIN}: {}", SecondaryAction::ReturnToLogin.label()));
        }
        Some(SecondaryAction::ResendCode) => {
            hints.push(format!("{CMD_RESEND}: {}", SecondaryAction::ResendCode.label()));
            hints.push(format!("{CMD_LOGIN}: Return to login"));
        }
        None => {
            hints.push(format!("{CMD_SHOW} / {CMD_SHOW_CONFIRM}: toggle visibility"));
            hints.push(format!("{CMD_LOGIN}: Return to login"));
        }
    }
    lines.push(format!("[{}]", hints.join(" | ")));
    lines.push(String::new());

    lines.join("\n")
}

async fn prompt<R, W>(input: &mut R, output: &mut W, label: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_out(output, label).await?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .await
        .context("failed to read input")?;
    if read == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Reads a password answer, straight from the terminal with echo off when
/// `hide` is set.
async fn read_password<R, W>(
    input: &mut R,
    output: &mut W,
    label: &str,
    hide: bool,
) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if !hide {
        return prompt(input, output, label).await;
    }

    write_out(output, label).await?;
    let read = tokio::task::spawn_blocking(rpassword::read_password)
        .await
        .context("password reader stopped")?;

    match read {
        Ok(line) => Ok(Some(line)),
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => Ok(None),
        Err(err) => Err(err).context("failed to read password"),
    }
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output
        .write_all(text.as_bytes())
        .await
        .context("failed to write output")?;
    output.flush().await.context("failed to flush output")?;
    Ok(())
}
