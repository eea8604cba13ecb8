//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod block;
pub mod credential;
pub mod error;
pub mod outcome;

pub use block::{Block, BlockKind, BlockLabel, parse_blocks};
pub use credential::Credential;
pub use error::StartupError;
pub use outcome::{ItemOutcome, RemoteOutcome, RunStatus};
