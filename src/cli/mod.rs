//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Check prerequisites before any network call
//! - Delegate to [`generate`] for the changelog flow
//!
//! The binary has a single command, so there is no subcommand dispatch.

pub mod args;
pub mod generate;
pub mod prereq;

pub use args::Cli;

use crate::telemetry;
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    telemetry::init_tracing(cli.verbosity().tracing_level());

    generate::run_generate(&cli)
}
