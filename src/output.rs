//! Output formatting and styling module.
//!
//! User-facing messages go through [`OutputFormatter`] so styling stays consistent.
//! Per-file diagnostics are emitted through the `log` facade instead.

use crate::file_organizer::RunReport;
use colored::*;
use std::collections::BTreeMap;

/// Prints styled CLI output.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Counts files per destination folder, sorted by folder name.
    pub fn folder_counts(report: &RunReport) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for placed in &report.moved {
            *counts.entry(placed.folder.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Prints a table of files per date folder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use datetidy::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("2021-02-22", 15);
    /// counts.insert("2021-02-23", 1);
    /// OutputFormatter::summary_table(&counts, 16);
    /// ```
    pub fn summary_table(folder_counts: &BTreeMap<&str, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let width = folder_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max("Folder".len());

        println!(
            "{:<width$} | {}",
            "Folder".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (folder, count) in folder_counts {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = width
        );
    }

    /// Prints the end-of-run summary for a report.
    pub fn report(report: &RunReport) {
        let verb = if report.dry_run { "Would move" } else { "Moved" };

        if report.moved.is_empty() {
            Self::info("No files to organize.");
        } else {
            Self::summary_table(&Self::folder_counts(report), report.moved.len());
        }

        println!();
        Self::success(&format!(
            "{} {} {}",
            verb,
            report.moved.len(),
            plural(report.moved.len())
        ));

        if !report.unrecognized.is_empty() {
            Self::warning(&format!(
                "{} {} not recognized",
                report.unrecognized.len(),
                plural(report.unrecognized.len())
            ));
        }
        if !report.collisions.is_empty() {
            Self::warning(&format!(
                "{} {} already present at destination, left in place",
                report.collisions.len(),
                plural(report.collisions.len())
            ));
        }
        if !report.failed.is_empty() {
            Self::error(&format!(
                "{} {} could not be moved",
                report.failed.len(),
                plural(report.failed.len())
            ));
        }
        if report.excluded > 0 {
            Self::info(&format!(
                "{} {} excluded by filters",
                report.excluded,
                plural(report.excluded)
            ));
        }

        if report.dry_run {
            Self::dry_run_notice("No files were modified.");
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
