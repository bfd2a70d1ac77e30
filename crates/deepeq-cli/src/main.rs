use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

mod cli;
mod commands;
mod config;
mod leaf;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let outcome = commands::run_command(cli);
    if let Err(e) = &outcome {
        eprintln!("Error: {e:#}");
    }
    ExitCode::from(commands::exit_status(&outcome))
}
