//! # BigDiff CLI
//!
//! Command-line front end for the BigDiff comparison engine.
//!
//! ## Usage
//! ```bash
//! # Materialize the differences between two trees
//! bigdiff ./before ./after ./differences
//!
//! # Ignore log files and normalize line endings first
//! bigdiff ./before ./after ./diff -i "*.log" -E
//!
//! # Preview without writing anything
//! bigdiff ./before ./after ./diff --dry-run
//! ```

use bigdiff::utils::{format_bytes, parse_size};
use bigdiff::{bigdiff, Options, Result, RunReport};
use clap::Parser;
use colored::*;
use humantime::format_duration;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Generate an annotated difference tree between two directories
#[derive(Parser)]
#[command(name = "bigdiff")]
#[command(version)]
#[command(about = "Materialize an annotated difference tree between two directories")]
#[command(long_about = None)]
struct Cli {
    /// Base directory (before)
    base: PathBuf,

    /// Target directory (after)
    target: PathBuf,

    /// Output directory for the differences (created if missing)
    output: PathBuf,

    /// Glob patterns to ignore (repeatable, comma-separable)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Normalize CRLF/CR line endings to LF before comparing
    #[arg(short = 'E', long)]
    normalize_eol: bool,

    /// Maximum per-file size for text diffing (e.g. 5MB, 8MiB)
    #[arg(short = 'S', long, default_value = "5MB")]
    max_text_size: String,

    /// Plan everything but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    // Disable colors if needed
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let options = Options::new()
        .normalize_eol(cli.normalize_eol)
        .max_text_size(parse_size(&cli.max_text_size)?)
        .ignore_patterns(cli.ignore)
        .dry_run(cli.dry_run);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message("Comparing trees...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    let report = bigdiff(&cli.base, &cli.target, &cli.output, &options);
    spinner.finish_and_clear();
    let report = report?;

    let elapsed = Duration::from_secs(start.elapsed().as_secs());
    if report.dry_run {
        print_dry_run(&report);
    }
    print_summary(&report, &cli.output);
    println!("  Elapsed: {}", format_duration(elapsed).to_string().cyan());

    Ok(())
}

/// List every planned action without touching the filesystem
fn print_dry_run(report: &RunReport) {
    println!("{}", "== DRY RUN ==".blue().bold());
    for action in &report.actions {
        println!(
            "  [{}] {} -> {}",
            action.verdict.label().yellow(),
            action.rel.display(),
            action.dest.display()
        );
    }
}

/// Print the counter summary
fn print_summary(report: &RunReport, output: &Path) {
    let c = &report.counters;
    println!("{}", "== BigDiff summary ==".blue().bold());
    println!("  Unchanged (omitted):   {}", c.unchanged.to_string().green());
    println!("  New (.new):            {}", c.new_files.to_string().green());
    println!("  Deleted (.deleted):    {}", c.deleted_files.to_string().red());
    println!("  Modified (annotated):  {}", c.modified_text.to_string().yellow());
    println!("  Modified (skipped):    {}", c.modified_skipped.to_string().yellow());
    println!("  New directories:       {}", c.new_dirs.to_string().green());
    println!("  Deleted directories:   {}", c.deleted_dirs.to_string().red());
    if report.dry_run {
        println!("  {} nothing was written", "Dry run:".bold());
    } else {
        println!("  Bytes written:         {}", format_bytes(c.bytes_written).cyan());
        println!("  Output: {}", output.display().to_string().cyan());
    }
}
