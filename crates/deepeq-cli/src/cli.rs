use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(
    name = "deepeq",
    about = "Deep-compare and diff JSON documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format; overrides the config file
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check two documents for deep equality (exit 1 when unequal)
    Compare(CompareArgs),
    /// Show the parts of two documents that disagree (exit 1 when they differ)
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    pub actual: PathBuf,
    pub expected: PathBuf,
}

#[derive(Args)]
pub struct DiffArgs {
    pub left: PathBuf,
    pub right: PathBuf,
}
