//! `TerminalReporter`: Presentation-layer implementation of `RunReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::RunReporter`
//! trait so application services can report block and item results without
//! depending on any presentation type directly.

use std::cell::RefCell;
use std::io::{self, Write};

use crate::application::ports::RunReporter;
use crate::domain::{Block, BlockKind};
use crate::output::{OutputContext, Severity};

/// Notice printed when an item succeeds without output.
pub const NO_OUTPUT: &str = "No output.";

/// Terminal run reporter that wraps an `OutputContext`.
///
/// Every line goes to the same writer (stdout in production), so a
/// redirected report keeps fatal lines in order with everything else.
///
/// - `block_header()` prints `"[-] Block {label} -- {kind} -- {description}"`
/// - `item_started()` prints `"[~] {item}"`
/// - `item_output()` prints `"[.] {output}"` or `"[.] No output."`
/// - `controlled_failure()` prints `"[!] Block {label}, {kind} [{item}] failed: {detail}"`
/// - `fatal_failure()` prints the same with `[!!]` in the fatal style
pub struct TerminalReporter<'a, W: Write = io::Stdout> {
    ctx: &'a OutputContext,
    out: RefCell<W>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` writing to stdout.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self::with_writer(ctx, io::stdout())
    }
}

impl<'a, W: Write> TerminalReporter<'a, W> {
    /// Create a reporter writing every line to `out`.
    #[must_use]
    pub fn with_writer(ctx: &'a OutputContext, out: W) -> Self {
        Self {
            ctx,
            out: RefCell::new(out),
        }
    }

    /// Consume the reporter and return its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn line(&self, severity: Severity, msg: &str) {
        let painted = self.ctx.styles.paint(severity, msg);
        // Write errors (closed stdout) are ignored.
        let _ = writeln!(self.out.borrow_mut(), "{painted}");
    }
}

/// Header line for a block.
#[must_use]
pub fn format_header(block: &Block) -> String {
    format!(
        "[-] Block {} -- {} -- {}",
        block.label,
        block.kind.plural(),
        block.description
    )
}

/// Failure line for an item; `marker` is `!` or `!!`.
#[must_use]
pub fn format_failure(marker: &str, block: &Block, item: &str, detail: &str) -> String {
    format!(
        "[{marker}] Block {}, {} [{item}] failed: {detail}",
        block.label,
        block.kind.singular()
    )
}

impl<W: Write> RunReporter for TerminalReporter<'_, W> {
    fn block_header(&self, block: &Block) {
        let _ = writeln!(self.out.borrow_mut());
        self.line(Severity::Header, &format_header(block));
    }

    fn item_started(&self, _kind: BlockKind, item: &str) {
        self.line(Severity::Trace, &format!("[~] {item}"));
    }

    fn item_output(&self, output: Option<&str>) {
        self.line(
            Severity::Plain,
            &format!("[.] {}", output.unwrap_or(NO_OUTPUT)),
        );
    }

    fn controlled_failure(&self, block: &Block, item: &str, detail: &str) {
        self.line(
            Severity::Controlled,
            &format_failure("!", block, item, detail),
        );
    }

    fn fatal_failure(&self, block: &Block, item: &str, detail: &str) {
        self.line(Severity::Fatal, &format_failure("!!", block, item, detail));
    }
}
