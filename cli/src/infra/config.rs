//! Infrastructure implementation of the `BlockSource` port.

use std::path::PathBuf;

use tracing::debug;

use crate::application::ports::BlockSource;
use crate::domain::{Block, StartupError, parse_blocks};

/// Default block file, resolved against the working directory.
pub const DEFAULT_BLOCK_FILE: &str = "diagnostics.yaml";

/// Production implementation of `BlockSource` that reads a YAML file on disk.
pub struct YamlBlockSource {
    path: PathBuf,
}

impl YamlBlockSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BlockSource for YamlBlockSource {
    fn load(&self) -> Result<Vec<Block>, StartupError> {
        let shown = self.path.display().to_string();
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| StartupError::ConfigRead {
                path: shown.clone(),
                reason: e.to_string(),
            })?;
        let blocks = parse_blocks(&content, &shown)?;
        debug!(path = %shown, blocks = blocks.len(), "block list loaded");
        Ok(blocks)
    }
}
