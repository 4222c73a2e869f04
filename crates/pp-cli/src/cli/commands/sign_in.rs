use std::io::{IsTerminal, Write};

use anyhow::{Context, Result};
use pp_app::{SignInFormController, SubmitOutcome};
use pp_core::auth::{AuthFailure, FormField, FormState, SubmissionState};
use pp_core::ports::AuthEvent;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::bootstrap::Wired;
use crate::cli::terminal;

type Input = Lines<BufReader<Stdin>>;

/// Read one line; `None` on end of input. An empty answer takes `default`.
async fn prompt(input: &mut Input, label: &str, default: &str) -> Result<Option<String>> {
    if default.is_empty() {
        print!("{label}: ");
    } else {
        print!("{label} [{default}]: ");
    }
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let Some(line) = input.next_line().await.context("Failed to read stdin")? else {
        return Ok(None);
    };
    Ok(Some(if line.is_empty() {
        default.to_string()
    } else {
        line
    }))
}

/// Read the password without echo when stdin is a terminal; piped input is
/// read as a plain line.
async fn prompt_password(input: &mut Input) -> Result<Option<String>> {
    if !std::io::stdin().is_terminal() {
        return prompt(input, "Password", "").await;
    }

    print!("Password: ");
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let password = tokio::task::spawn_blocking(terminal::read_hidden_line)
        .await
        .context("Password reader task failed")??;
    // Enter was consumed in raw mode.
    println!();
    Ok(password)
}

fn describe(reason: AuthFailure) -> &'static str {
    match reason {
        AuthFailure::InvalidCredentials => "wrong identifier or password",
        AuthFailure::UserDisabled => "this account is disabled",
        AuthFailure::TooManyAttempts => "too many attempts, try again later",
        AuthFailure::Network => "could not reach the server",
        AuthFailure::Other => "something went wrong",
    }
}

fn field_errors(form: &FormState) -> Vec<String> {
    [
        ("identifier", FormField::Identifier),
        ("password", FormField::Password),
    ]
    .into_iter()
    .filter_map(|(label, field)| form.error_for(field).map(|err| format!("{label}: {err}")))
    .collect()
}

fn spawn_observer(mut events: UnboundedReceiver<AuthEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                AuthEvent::FormChanged(form) => {
                    debug!(valid = form.is_form_valid(), "form state changed")
                }
                AuthEvent::SubmissionChanged(state) => {
                    debug!(status = state.status(), "submission state changed")
                }
            }
        }
    })
}

async fn sign_in_loop(
    controller: &SignInFormController,
    input: &mut Input,
    mut identifier: Option<String>,
) -> Result<()> {
    loop {
        let text = match identifier.take() {
            Some(text) => text,
            None => {
                let current = controller.form_state();
                match prompt(input, "Username, email or phone", current.identifier()).await? {
                    Some(text) => text,
                    None => return Ok(()),
                }
            }
        };
        controller.on_identifier_changed(&text);

        let Some(password) = prompt_password(input).await? else {
            return Ok(());
        };
        if controller.on_password_changed(&password).is_form_valid() {
            println!("Signing in...");
        }

        let outcome = tokio::select! {
            outcome = controller.submit() => outcome,
            _ = tokio::signal::ctrl_c() => {
                controller.close();
                println!("Cancelled");
                return Ok(());
            }
        };

        match outcome {
            SubmitOutcome::Completed(SubmissionState::Authenticated { user }) => {
                println!("Signed in as {}", user.label());
                return Ok(());
            }
            SubmitOutcome::Completed(SubmissionState::Unauthenticated { reason }) => {
                println!("Sign-in failed: {}", describe(reason));
            }
            SubmitOutcome::Completed(state) => {
                debug!(status = state.status(), "submission ended in a non-terminal state");
            }
            SubmitOutcome::Rejected(form) => {
                for error in field_errors(&form) {
                    println!("  {error}");
                }
            }
            SubmitOutcome::AlreadySubmitting => {}
            SubmitOutcome::Cancelled => return Ok(()),
        }
    }
}

/// Interactive sign-in. Loops until the user is signed in or input ends.
pub async fn run(wired: Wired, identifier: Option<String>) -> Result<()> {
    let Wired { app, events } = wired;
    let observer = spawn_observer(events);

    let controller = app.sign_in_form();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let result = sign_in_loop(&controller, &mut input, identifier).await;

    controller.close();
    observer.abort();
    result
}
