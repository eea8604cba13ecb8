//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;

use anyhow::Result;

use crate::domain::{Block, BlockKind, RemoteOutcome, StartupError};

// ── Remote Session Port ───────────────────────────────────────────────────────

/// An authenticated channel to one host.
///
/// The session decides what counts as an unexpected exit; callers only see
/// the tagged [`RemoteOutcome`] and never inspect exit codes.
#[allow(async_fn_in_trait)]
pub trait RemoteSession {
    /// Execute a shell command with output captured.
    async fn execute(&self, command: &str) -> RemoteOutcome;

    /// Copy a local file to `remote` (relative paths land in the remote home).
    ///
    /// # Errors
    ///
    /// Returns an error if the local file cannot be read or the upload fails.
    async fn transfer(&self, local: &Path, remote: &str) -> Result<()>;
}

// ── Block Source Port ─────────────────────────────────────────────────────────

/// Abstracts loading the ordered block list.
pub trait BlockSource {
    /// Load and validate every block, preserving declaration order.
    ///
    /// # Errors
    ///
    /// Returns a [`StartupError`] if the source is missing or invalid.
    fn load(&self) -> Result<Vec<Block>, StartupError>;
}

// ── Run Reporting Port ────────────────────────────────────────────────────────

/// Abstracts per-block and per-item reporting so services never touch the
/// terminal directly. Sync trait, no async needed.
pub trait RunReporter {
    /// Announce a block before its items run.
    fn block_header(&self, block: &Block);
    /// Echo an item before it runs (debug mode only).
    fn item_started(&self, kind: BlockKind, item: &str);
    /// Report captured output; `None` means the item printed nothing.
    fn item_output(&self, output: Option<&str>);
    /// Report a failure that does not stop the run.
    fn controlled_failure(&self, block: &Block, item: &str, detail: &str);
    /// Report a failure that stops the run.
    fn fatal_failure(&self, block: &Block, item: &str, detail: &str);
}
