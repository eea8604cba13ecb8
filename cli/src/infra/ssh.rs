//! Infrastructure implementation of the `RemoteSession` port over SSH.
//!
//! One authenticated `russh` connection is opened per run. Commands each get
//! their own exec channel; uploads go through an SFTP subsystem channel.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use russh::ChannelMsg;
use russh::client::{self, Handle};
use russh::keys::ssh_key::{HashAlg, PublicKey};
use russh_sftp::client::SftpSession;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::application::ports::RemoteSession;
use crate::domain::{Credential, RemoteOutcome, StartupError};

/// Default SSH port.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Default time allowed for TCP connect, handshake, and authentication.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ── Client handler ────────────────────────────────────────────────────────────

/// Accepts any host key and logs its fingerprint. Keys are not pinned.
struct HostKeyLogger {
    host: String,
}

impl client::Handler for HostKeyLogger {
    type Error = russh::Error;

    async fn check_server_key(&mut self, server_public_key: &PublicKey) -> Result<bool, Self::Error> {
        debug!(
            host = %self.host,
            fingerprint = %server_public_key.fingerprint(HashAlg::Sha256),
            "accepting host key"
        );
        Ok(true)
    }
}

// ── Exit classification ───────────────────────────────────────────────────────

/// How the remote process ended, as reported on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteExit {
    Status(u32),
    Signal(String),
}

/// Maps a finished exec channel onto the tagged session outcome.
///
/// Exit status 0 is success; any other status or a signal is a controlled
/// failure carrying stderr; a channel that closed without reporting how the
/// process ended is fatal.
#[must_use]
pub fn classify_exit(exit: Option<&RemoteExit>, stdout: &[u8], stderr: &[u8]) -> RemoteOutcome {
    let stderr = String::from_utf8_lossy(stderr).trim().to_string();
    match exit {
        Some(RemoteExit::Status(0)) => RemoteOutcome::Success {
            stdout: String::from_utf8_lossy(stdout).into_owned(),
        },
        Some(RemoteExit::Status(code)) => RemoteOutcome::ControlledFailure {
            detail: if stderr.is_empty() {
                format!("exit status {code}")
            } else {
                stderr
            },
        },
        Some(RemoteExit::Signal(signal)) => RemoteOutcome::ControlledFailure {
            detail: if stderr.is_empty() {
                format!("terminated by signal {signal}")
            } else {
                stderr
            },
        },
        None => RemoteOutcome::FatalFailure {
            detail: "channel closed without an exit status".to_string(),
        },
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Captured result of one exec channel.
struct ExecCapture {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    exit: Option<RemoteExit>,
}

/// Authenticated SSH session to the diagnosed host.
pub struct SshSession {
    handle: Handle<HostKeyLogger>,
    host: String,
}

impl SshSession {
    /// Connect and authenticate with the credential's password.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Connect`] if the host is unreachable, the
    /// handshake fails, `timeout` elapses, or authentication is rejected.
    pub async fn connect(
        credential: &Credential,
        port: u16,
        timeout: Duration,
    ) -> Result<Self, StartupError> {
        let host = credential.host().to_string();
        let connect_error = |reason: String| StartupError::Connect {
            host: host.clone(),
            reason,
        };

        let config = Arc::new(client::Config::default());
        let handler = HostKeyLogger { host: host.clone() };

        let establish = async {
            let mut handle = client::connect(config, (credential.host(), port), handler)
                .await
                .map_err(|e| connect_error(e.to_string()))?;
            let auth = handle
                .authenticate_password(credential.user(), credential.secret())
                .await
                .map_err(|e| connect_error(e.to_string()))?;
            if !auth.success() {
                return Err(connect_error(format!(
                    "authentication rejected for user {}",
                    credential.user()
                )));
            }
            Ok::<_, StartupError>(handle)
        };

        let handle = tokio::time::timeout(timeout, establish)
            .await
            .map_err(|_| connect_error(format!("timed out after {}s", timeout.as_secs())))??;

        info!(host = %host, port, user = credential.user(), "session established");
        Ok(Self { handle, host })
    }

    /// Politely close the connection.
    pub async fn close(&self) {
        if let Err(e) = self
            .handle
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
        {
            debug!(host = %self.host, error = %e, "disconnect failed");
        }
    }

    async fn exec(&self, command: &str) -> Result<ExecCapture> {
        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .context("cannot open session channel")?;
        channel
            .exec(true, command)
            .await
            .with_context(|| format!("cannot start `{command}`"))?;

        let mut capture = ExecCapture {
            stdout: Vec::new(),
            stderr: Vec::new(),
            exit: None,
        };
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { data } => capture.stdout.extend_from_slice(&data),
                ChannelMsg::ExtendedData { data, ext: 1 } => {
                    capture.stderr.extend_from_slice(&data);
                }
                ChannelMsg::ExitStatus { exit_status } => {
                    capture.exit = Some(RemoteExit::Status(exit_status));
                }
                ChannelMsg::ExitSignal { signal_name, .. } => {
                    capture.exit = Some(RemoteExit::Signal(format!("{signal_name:?}")));
                }
                _ => {}
            }
        }
        Ok(capture)
    }
}

impl RemoteSession for SshSession {
    async fn execute(&self, command: &str) -> RemoteOutcome {
        match self.exec(command).await {
            Ok(capture) => {
                debug!(command, exit = ?capture.exit, "remote command finished");
                classify_exit(capture.exit.as_ref(), &capture.stdout, &capture.stderr)
            }
            Err(e) => RemoteOutcome::FatalFailure {
                detail: format!("{e:#}"),
            },
        }
    }

    async fn transfer(&self, local: &Path, remote: &str) -> Result<()> {
        let contents = tokio::fs::read(local)
            .await
            .with_context(|| format!("cannot read {}", local.display()))?;

        let channel = self
            .handle
            .channel_open_session()
            .await
            .context("cannot open sftp channel")?;
        channel
            .request_subsystem(true, "sftp")
            .await
            .context("sftp subsystem refused")?;
        let sftp = SftpSession::new(channel.into_stream())
            .await
            .context("cannot start sftp session")?;

        let mut file = sftp
            .create(remote)
            .await
            .with_context(|| format!("cannot create remote file {remote}"))?;
        file.write_all(&contents)
            .await
            .with_context(|| format!("cannot write remote file {remote}"))?;
        file.shutdown()
            .await
            .with_context(|| format!("cannot flush remote file {remote}"))?;
        sftp.close().await.context("cannot close sftp session")?;

        debug!(local = %local.display(), remote, bytes = contents.len(), "upload complete");
        Ok(())
    }
}
