//! rdiag - run declarative diagnostic blocks on a remote host over SSH

use std::process::ExitCode;

use clap::Parser;
use rdiag_cli::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go to stderr so they never interleave with the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RDIAG_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
