//! Application service: diagnostic run use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Blocks run strictly in declaration order and items strictly in order
//! within a block; there is no concurrency and no retry.

use std::future::Future;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::application::ports::{RemoteSession, RunReporter};
use crate::application::services::executor::{execute_command, execute_script};
use crate::domain::{Block, BlockKind, ItemOutcome, RunStatus};

/// Behaviour knobs for a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Echo each item before executing it.
    pub debug: bool,
    /// Local directory that script names are resolved against.
    pub scripts_dir: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            debug: false,
            scripts_dir: PathBuf::from("scripts"),
        }
    }
}

/// How a single block ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStatus {
    /// All items ran; controlled failures were reported and absorbed.
    Finished {
        items: usize,
        controlled_failures: usize,
    },
    /// `item` failed fatally; later items were not run.
    Aborted { item: String, detail: String },
    /// The interrupt fired while an item was running.
    Interrupted,
}

/// Run every block in order until completion or the first fatal outcome.
///
/// `interrupt` resolves when the operator cancels the run (production code
/// passes a Ctrl-C listener). It is raced against every item and checked
/// once more after the last one; when it wins the in-flight remote work is
/// dropped and nothing further runs.
pub async fn run_blocks(
    session: &impl RemoteSession,
    blocks: &[Block],
    options: &RunOptions,
    reporter: &impl RunReporter,
    interrupt: impl Future<Output = ()>,
) -> RunStatus {
    let mut interrupt = std::pin::pin!(interrupt);
    let mut items = 0;
    let mut controlled_failures = 0;

    for block in blocks {
        match run_block(session, block, options, reporter, &mut interrupt).await {
            BlockStatus::Finished {
                items: n,
                controlled_failures: failed,
            } => {
                items += n;
                controlled_failures += failed;
            }
            BlockStatus::Aborted { item, detail } => {
                return RunStatus::Aborted {
                    block: block.label.to_string(),
                    item,
                    detail,
                };
            }
            BlockStatus::Interrupted => return RunStatus::Interrupted,
        }
    }

    // An interrupt that lands after the last item settled still counts.
    tokio::select! {
        biased;
        () = &mut interrupt => return RunStatus::Interrupted,
        () = std::future::ready(()) => {}
    }

    info!(
        blocks = blocks.len(),
        items, controlled_failures, "diagnostic run complete"
    );
    RunStatus::Completed {
        items,
        controlled_failures,
    }
}

/// Run one block's items in order, applying the failure classification.
pub async fn run_block<I>(
    session: &impl RemoteSession,
    block: &Block,
    options: &RunOptions,
    reporter: &impl RunReporter,
    interrupt: &mut I,
) -> BlockStatus
where
    I: Future<Output = ()> + Unpin,
{
    reporter.block_header(block);
    let mut controlled_failures = 0;

    for item in &block.items {
        if options.debug {
            reporter.item_started(block.kind, item);
        }

        let outcome = tokio::select! {
            biased;
            () = &mut *interrupt => ItemOutcome::Interrupted,
            outcome = execute_item(session, block.kind, item, options) => outcome,
        };

        match outcome {
            ItemOutcome::Success { output } => reporter.item_output(output.as_deref()),
            ItemOutcome::ControlledFailure { detail } => {
                controlled_failures += 1;
                reporter.controlled_failure(block, item, &detail);
            }
            ItemOutcome::FatalFailure { detail } => {
                reporter.fatal_failure(block, item, &detail);
                return BlockStatus::Aborted {
                    item: item.clone(),
                    detail,
                };
            }
            ItemOutcome::Interrupted => {
                debug!(block = %block.label, item, "interrupted");
                return BlockStatus::Interrupted;
            }
        }
    }

    BlockStatus::Finished {
        items: block.items.len(),
        controlled_failures,
    }
}

async fn execute_item(
    session: &impl RemoteSession,
    kind: BlockKind,
    item: &str,
    options: &RunOptions,
) -> ItemOutcome {
    match kind {
        BlockKind::Commands => execute_command(session, item).await,
        BlockKind::Scripts => execute_script(session, &options.scripts_dir, item).await,
    }
}
