//! Command-line interface module for datetidy.
//!
//! Parses arguments, validates the target directory, loads the filter
//! configuration and runs the organizer.

use crate::config::FilterConfig;
use crate::file_organizer::{DateOrganizer, OrganizeResult, RunReport, validate_directory};
use crate::matcher::Registry;
use crate::output::OutputFormatter;
use clap::Parser;
use std::path::PathBuf;

/// Sorts photos and videos into YYYY-MM-DD folders based on their file names.
#[derive(Debug, Parser)]
#[command(name = "datetidy", version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the pictures and videos to organize
    pub directory: PathBuf,

    /// Show what would be moved without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Filter configuration file (defaults to ./.datetidyrc.toml, then
    /// ~/.config/datetidy/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Runs one organization pass as described by `cli`.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use datetidy::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["datetidy", "/path/to/camera", "--dry-run"]);
/// match run_cli(&cli) {
///     Ok(report) => println!("{} files to move", report.moved.len()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> OrganizeResult<RunReport> {
    validate_directory(&cli.directory)?;

    let filters = FilterConfig::load(cli.config.as_deref())?.compile()?;

    if !cli.json {
        if cli.dry_run {
            OutputFormatter::dry_run_notice(&format!(
                "Analyzing contents of: {}",
                cli.directory.display()
            ));
        } else {
            OutputFormatter::info(&format!(
                "Organizing contents of: {}",
                cli.directory.display()
            ));
        }
    }

    let report = DateOrganizer::new(Registry::global(), &filters)
        .dry_run(cli.dry_run)
        .organize(&cli.directory)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        OutputFormatter::report(&report);
    }

    Ok(report)
}
