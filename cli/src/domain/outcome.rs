//! Outcome types flowing from the remote session up to the process exit code.

/// Tagged result returned by a remote session for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// The command ran and exited normally.
    Success { stdout: String },
    /// The command ran but exited with an unexpected status.
    ControlledFailure { detail: String },
    /// Anything else: channel error, lost connection, missing exit status.
    FatalFailure { detail: String },
}

/// Classification of one executed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Captured output, trimmed; `None` when the item printed nothing.
    Success { output: Option<String> },
    /// Reported, and the run continues with the next item.
    ControlledFailure { detail: String },
    /// Reported, and the run stops.
    FatalFailure { detail: String },
    /// Operator cancelled; the run stops without a report line.
    Interrupted,
}

impl ItemOutcome {
    /// Builds a success outcome from raw stdout.
    #[must_use]
    pub fn from_stdout(stdout: &str) -> Self {
        let trimmed = stdout.trim();
        Self::Success {
            output: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    /// Returns `true` when the run cannot continue past this item.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FatalFailure { .. } | Self::Interrupted)
    }
}

/// Final state of a whole diagnostic run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Every block ran to the end.
    Completed {
        items: usize,
        controlled_failures: usize,
    },
    /// A fatal failure on `item` of block `block` stopped the run.
    Aborted {
        block: String,
        item: String,
        detail: String,
    },
    /// The operator interrupted the run.
    Interrupted,
}

impl RunStatus {
    /// Process exit code for this status: 0 on completion, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Completed { .. } => 0,
            Self::Aborted { .. } | Self::Interrupted => 1,
        }
    }
}
