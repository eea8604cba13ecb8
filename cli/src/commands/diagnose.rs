//! `rdiag`: connect to a host and run the configured diagnostic blocks.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tracing::{debug, info, warn};

use crate::application::ports::BlockSource;
use crate::application::services::diagnose::{RunOptions, run_blocks};
use crate::domain::{Credential, RunStatus};
use crate::infra::config::{DEFAULT_BLOCK_FILE, YamlBlockSource};
use crate::infra::ssh::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_SSH_PORT, SshSession};
use crate::output::{OutputContext, TerminalReporter, progress};

/// Arguments for a diagnostic run.
#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    /// Credentials, must have the form 'username:password@ip_address'
    #[arg(short, long, value_name = "USER:PASSWORD@HOST")]
    pub creds: String,

    /// Echo every command and script before running it
    #[arg(long)]
    pub debug: bool,

    /// Block list to run
    #[arg(long, value_name = "FILE", env = "RDIAG_CONFIG", default_value = DEFAULT_BLOCK_FILE)]
    pub config: PathBuf,

    /// Directory that script names are resolved against
    #[arg(long, value_name = "DIR", default_value = "scripts")]
    pub scripts_dir: PathBuf,

    /// SSH port on the target host
    #[arg(short, long, default_value_t = DEFAULT_SSH_PORT)]
    pub port: u16,

    /// Seconds allowed to connect and authenticate
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs())]
    pub connect_timeout: u64,
}

/// Run the diagnostic sweep.
///
/// Startup validation (credential, then block list) happens before any
/// connection is attempted.
///
/// # Errors
///
/// Returns an error if the credential is malformed, the block list cannot
/// be loaded, or the session cannot be established.
pub async fn run(ctx: &OutputContext, args: &DiagnoseArgs) -> Result<ExitCode> {
    let credential = Credential::parse(&args.creds)?;
    let blocks = YamlBlockSource::new(&args.config).load()?;

    let session = connect(ctx, &credential, args).await?;

    let options = RunOptions {
        debug: args.debug,
        scripts_dir: args.scripts_dir.clone(),
    };
    let reporter = TerminalReporter::new(ctx);
    let mut interrupt = std::pin::pin!(interrupted());
    let status = run_blocks(&session, &blocks, &options, &reporter, &mut interrupt).await;

    match &status {
        RunStatus::Completed {
            items,
            controlled_failures,
        } => {
            info!(items, controlled_failures, "all blocks completed");
            tokio::select! {
                biased;
                () = &mut interrupt => {
                    debug!("interrupted while closing the session");
                    return Ok(ExitCode::from(RunStatus::Interrupted.exit_code()));
                }
                () = session.close() => {}
            }
        }
        RunStatus::Aborted { block, item, .. } => {
            warn!(block, item, "run aborted on fatal failure");
        }
        RunStatus::Interrupted => {}
    }

    Ok(ExitCode::from(status.exit_code()))
}

async fn connect(
    ctx: &OutputContext,
    credential: &Credential,
    args: &DiagnoseArgs,
) -> Result<SshSession> {
    let timeout = Duration::from_secs(args.connect_timeout);
    let target = format!("{}@{}:{}", credential.user(), credential.host(), args.port);

    if !ctx.show_progress() {
        return Ok(SshSession::connect(credential, args.port, timeout).await?);
    }

    let pb = progress::spinner(&format!("connecting to {target}"));
    match SshSession::connect(credential, args.port, timeout).await {
        Ok(session) => {
            progress::finish_ok(&pb, &format!("connected to {target}"));
            Ok(session)
        }
        Err(e) => {
            progress::finish_clear(&pb);
            Err(e.into())
        }
    }
}

/// Resolves when the operator presses Ctrl-C.
///
/// The first poll replaces the default SIGINT action, so the same future is
/// kept alive from the first item until the session is closed. A Ctrl-C
/// after that point is not observed and the process exits normally.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
