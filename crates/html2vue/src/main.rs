//! html2vue: convert static HTML pages into Vue single-file components.

mod cli;
mod config;
mod orchestrator;
mod output;

use clap::Parser;
use cli::Args;
use miette::{IntoDiagnostic, Result};

fn main() -> Result<()> {
    let args = Args::parse();
    let fail_on_invalid = args.fail_on_invalid;

    let summary = orchestrator::run(args).into_diagnostic()?;

    if summary.has_errors() || (fail_on_invalid && !summary.all_converted()) {
        std::process::exit(1);
    }
    Ok(())
}
