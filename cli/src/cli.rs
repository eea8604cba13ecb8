//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::commands;
use crate::output::OutputContext;

/// Run declarative diagnostic blocks on a remote host over SSH
#[derive(Parser, Debug)]
#[command(
    name = "rdiag",
    version,
    after_help = "Messages are printed in English. Colors are also disabled when NO_COLOR is set to a non-empty value."
)]
pub struct Cli {
    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    #[command(flatten)]
    pub diagnose: commands::diagnose::DiagnoseArgs,
}

impl Cli {
    /// Execute the diagnostic run.
    ///
    /// # Errors
    ///
    /// Returns an error on any startup validation or connection failure.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli { no_color, diagnose } = self;
        let ctx = OutputContext::new(no_color);
        commands::diagnose::run(&ctx, &diagnose).await
    }
}
