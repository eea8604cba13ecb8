//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Startup errors ────────────────────────────────────────────────────────────

/// Errors raised before any block runs. Every variant is fatal (exit 1).
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Credentials must have the form username:password@ip_address")]
    MalformedCredential,

    #[error("Cannot read block list from {path}: {reason}")]
    ConfigRead { path: String, reason: String },

    #[error("Cannot parse block list from {path}: {reason}")]
    ConfigParse { path: String, reason: String },

    #[error("Block {label}: {reason}")]
    InvalidBlock { label: String, reason: String },

    #[error("Cannot connect to {host}: {reason}")]
    Connect { host: String, reason: String },
}
