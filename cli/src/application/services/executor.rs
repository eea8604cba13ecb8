//! Application service: item executors.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Each executor is a function of session + item and returns a typed
//! [`ItemOutcome`]; nothing here prints or exits.

use std::path::Path;

use tracing::{debug, warn};

use crate::application::ports::RemoteSession;
use crate::domain::{ItemOutcome, RemoteOutcome};

/// Run one literal shell command. No remote state is created.
pub async fn execute_command(session: &impl RemoteSession, command: &str) -> ItemOutcome {
    debug!(command, "executing command");
    classify(session.execute(command).await)
}

/// Stage, run, and remove one script.
///
/// Protocol, each step able to fail:
/// 1. upload `<scripts_dir>/<name>` to `~/<name>`
/// 2. `chmod +x ~/<name>`
/// 3. `~/<name>`
/// 4. `rm -f ~/<name>`
///
/// Step 4 runs after a success or a controlled failure only. A fatal
/// failure in steps 1–3 returns immediately and leaves the staged file on
/// the remote host.
pub async fn execute_script(
    session: &impl RemoteSession,
    scripts_dir: &Path,
    name: &str,
) -> ItemOutcome {
    let outcome = stage_and_run(session, &scripts_dir.join(name), name).await;
    if outcome.is_terminal() {
        warn!(script = name, "run stopped before cleanup, ~/{name} may remain on the host");
        return outcome;
    }

    match session.execute(&format!("rm -f ~/{name}")).await {
        RemoteOutcome::Success { .. } => {
            debug!(script = name, "staged script removed");
            outcome
        }
        RemoteOutcome::ControlledFailure { detail } => {
            warn!(script = name, %detail, "could not remove staged script");
            outcome
        }
        RemoteOutcome::FatalFailure { detail } => ItemOutcome::FatalFailure {
            detail: format!("cleanup of ~/{name} failed: {detail}"),
        },
    }
}

async fn stage_and_run(session: &impl RemoteSession, local: &Path, name: &str) -> ItemOutcome {
    debug!(script = name, local = %local.display(), "uploading script");
    if let Err(e) = session.transfer(local, name).await {
        return ItemOutcome::FatalFailure {
            detail: format!("{e:#}"),
        };
    }

    match session.execute(&format!("chmod +x ~/{name}")).await {
        RemoteOutcome::Success { .. } => {}
        other => return classify(other),
    }

    classify(session.execute(&format!("~/{name}")).await)
}

fn classify(outcome: RemoteOutcome) -> ItemOutcome {
    match outcome {
        RemoteOutcome::Success { stdout } => ItemOutcome::from_stdout(&stdout),
        RemoteOutcome::ControlledFailure { detail } => ItemOutcome::ControlledFailure { detail },
        RemoteOutcome::FatalFailure { detail } => ItemOutcome::FatalFailure { detail },
    }
}
