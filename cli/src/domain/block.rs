//! Diagnostic block definitions and the YAML block-list schema.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::domain::error::StartupError;

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static SCRIPT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid script name pattern"));

// ── Block model ──────────────────────────────────────────────────────────────

/// Block identifier as written in the block file (`block: 1` or `block: net`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BlockLabel {
    Number(i64),
    Name(String),
}

impl fmt::Display for BlockLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Name(s) => f.write_str(s),
        }
    }
}

/// Whether a block's items are literal shell commands or script file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Commands,
    Scripts,
}

impl BlockKind {
    /// Plural name used in block headers (`commands` / `scripts`).
    #[must_use]
    pub fn plural(self) -> &'static str {
        match self {
            Self::Commands => "commands",
            Self::Scripts => "scripts",
        }
    }

    /// Singular name used in per-item failure lines (`command` / `script`).
    #[must_use]
    pub fn singular(self) -> &'static str {
        match self {
            Self::Commands => "command",
            Self::Scripts => "script",
        }
    }
}

/// An ordered, labelled group of same-kind items executed as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub label: BlockLabel,
    pub description: String,
    pub kind: BlockKind,
    pub items: Vec<String>,
}

// ── File schema ──────────────────────────────────────────────────────────────

/// One record of the block file, before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BlockRecord {
    block: BlockLabel,
    #[serde(default)]
    description: String,
    commands: Option<Vec<String>>,
    scripts: Option<Vec<String>>,
}

/// Parses and validates the block file contents.
///
/// A record carrying both `commands` and `scripts` becomes two blocks with
/// the same label, commands first. An empty document is an empty run.
///
/// # Errors
///
/// Returns [`StartupError::ConfigParse`] for malformed YAML and
/// [`StartupError::InvalidBlock`] for a record with no items list or a
/// script name that is not a plain file name.
pub fn parse_blocks(source: &str, path: &str) -> Result<Vec<Block>, StartupError> {
    let records: Option<Vec<BlockRecord>> =
        serde_yaml::from_str(source).map_err(|e| StartupError::ConfigParse {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    let mut blocks = Vec::new();
    for record in records.unwrap_or_default() {
        if record.commands.is_none() && record.scripts.is_none() {
            return Err(StartupError::InvalidBlock {
                label: record.block.to_string(),
                reason: "declares neither `commands` nor `scripts`".to_string(),
            });
        }
        if let Some(commands) = record.commands {
            blocks.push(Block {
                label: record.block.clone(),
                description: record.description.clone(),
                kind: BlockKind::Commands,
                items: commands,
            });
        }
        if let Some(scripts) = record.scripts {
            for name in &scripts {
                validate_script_name(name).map_err(|reason| StartupError::InvalidBlock {
                    label: record.block.to_string(),
                    reason,
                })?;
            }
            blocks.push(Block {
                label: record.block,
                description: record.description,
                kind: BlockKind::Scripts,
                items: scripts,
            });
        }
    }
    Ok(blocks)
}

/// Script names are staged at `~/<name>` and spliced into remote commands.
fn validate_script_name(name: &str) -> Result<(), String> {
    if name == "." || name == ".." || !SCRIPT_NAME.is_match(name) {
        return Err(format!(
            "script name {name:?} must be a plain file name ([A-Za-z0-9._-]+)"
        ));
    }
    Ok(())
}
