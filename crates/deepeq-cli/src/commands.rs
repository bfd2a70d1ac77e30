use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use deepeq_diff::{diff_values_with, SparseDiff};
use deepeq_engine::compare_deep;
use deepeq_types::Value;
use tracing::{debug, info};

use crate::cli::*;
use crate::config::{CompareConfig, OutputFormat};
use crate::leaf::ConfiguredLeaf;

/// Exit status when the documents agree.
pub const EXIT_SAME: u8 = 0;
/// Exit status when the documents differ.
pub const EXIT_DIFFERENT: u8 = 1;
/// Exit status when the comparison could not be carried out.
pub const EXIT_TROUBLE: u8 = 2;

/// Map the outcome of [`run_command`] to a process exit status.
pub fn exit_status(outcome: &anyhow::Result<bool>) -> u8 {
    match outcome {
        Ok(true) => EXIT_SAME,
        Ok(false) => EXIT_DIFFERENT,
        Err(_) => EXIT_TROUBLE,
    }
}

/// Run a subcommand. Returns `true` when the documents agree.
pub fn run_command(cli: Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => CompareConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CompareConfig::default(),
    };
    if let Some(format) = cli.format {
        config.format = format;
    }
    debug!(?config, "effective configuration");

    match cli.command {
        Command::Compare(args) => cmd_compare(args, &config),
        Command::Diff(args) => cmd_diff(args, &config),
    }
}

fn cmd_compare(args: CompareArgs, config: &CompareConfig) -> anyhow::Result<bool> {
    let equal = compare_files(&args.actual, &args.expected, config)?;
    match config.format {
        OutputFormat::Text if equal => println!("{} equal", "✓".green().bold()),
        OutputFormat::Text => println!("{} not equal", "✗".red().bold()),
        OutputFormat::Json => println!("{}", serde_json::json!({ "equal": equal })),
    }
    Ok(equal)
}

fn cmd_diff(args: DiffArgs, config: &CompareConfig) -> anyhow::Result<bool> {
    let diff = diff_files(&args.left, &args.right, config)?;
    match (&diff, config.format) {
        (None, OutputFormat::Text) => println!("No differences."),
        (None, OutputFormat::Json) => println!("[]"),
        (Some(diff), OutputFormat::Text) => {
            println!("{} {}", "-".red().bold(), diff.left.to_string().red());
            println!("{} {}", "+".green().bold(), diff.right.to_string().green());
        }
        (Some(diff), OutputFormat::Json) => {
            let json = diff.to_json().context("exporting diff")?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(diff.is_none())
}

/// Read a JSON document into a [`Value`].
pub fn load_document(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing {} as JSON", path.display()))?;
    Ok(Value::from(json))
}

pub fn compare_files(actual: &Path, expected: &Path, config: &CompareConfig) -> anyhow::Result<bool> {
    let (a, b) = (load_document(actual)?, load_document(expected)?);
    let equal = match compare_deep(&a, &b, &ConfiguredLeaf::from(config)) {
        Ok(equal) => equal,
        Err(never) => match never {},
    };
    info!(actual = %actual.display(), expected = %expected.display(), equal, "compared documents");
    Ok(equal)
}

pub fn diff_files(left: &Path, right: &Path, config: &CompareConfig) -> anyhow::Result<Option<SparseDiff>> {
    let (a, b) = (load_document(left)?, load_document(right)?);
    let diff = match diff_values_with(&a, &b, &ConfiguredLeaf::from(config)) {
        Ok(diff) => diff,
        Err(never) => match never {},
    };
    info!(left = %left.display(), right = %right.display(), differs = diff.is_some(), "diffed documents");
    Ok(diff)
}
