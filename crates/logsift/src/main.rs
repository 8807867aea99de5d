mod cli;
mod commands;
mod discover;
mod logging;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = if cli.verbose {
        true
    } else {
        logging::env_flag()
    };
    logging::init(verbose);
    match cli.command {
        Command::Analyze {
            logs,
            term,
            output,
            eps,
            min_samples,
            disable_ai,
            debug,
        } => commands::analyze::run(logs, term, output, eps, min_samples, disable_ai, debug),
        Command::Cluster {
            input,
            output,
            eps,
            min_samples,
        } => commands::cluster::run(input, output, eps, min_samples),
        Command::Summarize {
            clusters,
            output,
            disable_ai,
            debug,
        } => commands::summarize::run(clusters, output, disable_ai, debug),
        Command::Scan { logs, term, output } => commands::scan::run(logs, term, output),
    }
}
