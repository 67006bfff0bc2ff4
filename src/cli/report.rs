//! Report formatting and printing.
//!
//! Text output lists the keys of every file followed by cargo-style warnings and
//! errors; `--json` prints one machine-readable document instead.

use std::io::{self, Write};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use super::run::{CommandResult, ExtractSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::{ExtractedKey, Report, Warning};
use crate::runner::FileReport;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match result {
        CommandResult::Extract(summary) if summary.json => print_json_to(summary, &mut stdout),
        CommandResult::Extract(summary) => {
            report_to(summary, verbose, &mut stdout);
            Ok(())
        }
        CommandResult::Init => {
            print_init_to(&mut stdout);
            Ok(())
        }
    }
}

/// Print an extraction summary as text to a custom writer.
pub fn report_to<W: Write>(summary: &ExtractSummary, verbose: bool, writer: &mut W) {
    for file in &summary.files {
        let path = summary.display_path(&file.path);
        match &file.result {
            Ok(report) => print_file(&path, report, verbose, writer),
            Err(error) => {
                let _ = writeln!(writer, "{}: {:#}", "error".bold().red(), error);
                let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
                let _ = writeln!(writer);
            }
        }
    }
    print_summary(summary, writer);
}

// ============================================================
// Internal Functions
// ============================================================

fn print_file<W: Write>(path: &str, report: &Report, verbose: bool, writer: &mut W) {
    if report.keys.is_empty() && report.warnings.is_empty() && !verbose {
        return;
    }

    let _ = writeln!(writer, "{}", path.bold());
    if report.keys.is_empty() {
        let _ = writeln!(writer, "  {}", "(no keys)".dimmed());
    }
    let line_width = report
        .keys
        .iter()
        .map(|key| key.line.to_string().len())
        .max()
        .unwrap_or(1);
    for key in &report.keys {
        print_key(key, line_width, writer);
    }
    let _ = writeln!(writer);

    for warning in &report.warnings {
        print_warning(path, warning, writer);
    }
}

fn print_key<W: Write>(key: &ExtractedKey, line_width: usize, writer: &mut W) {
    let line = format!("{:>width$}", key.line, width = line_width);
    let mut text = format!("  {} {}", line.blue(), key.key_name.green());
    if let Some(namespace) = &key.namespace {
        text.push_str(&format!(" {} {}", "ns:".dimmed(), namespace));
    }
    if let Some(default_value) = &key.default_value {
        text.push_str(&format!(" {} \"{}\"", "default:".dimmed(), default_value));
    }
    let _ = writeln!(writer, "{}", text);
}

fn print_warning<W: Write>(path: &str, warning: &Warning, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{}: {}  {}",
        "warning".bold().yellow(),
        warning.kind.description(),
        warning.kind.code().dimmed().cyan()
    );
    let _ = writeln!(writer, "  {} {}:{}", "-->".blue(), path, warning.line);
    let _ = writeln!(writer);
}

fn print_summary<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let keys = summary.key_count();
    let files = summary.files.len();
    let headline = format!(
        "Extracted {} {} from {} {}",
        keys,
        if keys == 1 { "key" } else { "keys" },
        files,
        if files == 1 { "file" } else { "files" }
    );

    let errors = summary.error_count();
    let warnings = summary.warning_count();
    if errors + warnings == 0 {
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), headline.green());
        return;
    }
    let _ = writeln!(
        writer,
        "{} {} ({} {}, {} {})",
        FAILURE_MARK.red(),
        headline,
        errors,
        if errors == 1 { "error" } else { "errors" }.red(),
        warnings,
        if warnings == 1 { "warning" } else { "warnings" }.yellow()
    );
}

fn print_init_to<W: Write>(writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );
}

// ============================================================
// JSON
// ============================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary<'a> {
    files: Vec<JsonFile<'a>>,
    key_count: usize,
    warning_count: usize,
    error_count: usize,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    keys: Option<&'a [ExtractedKey]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<&'a [Warning]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> JsonFile<'a> {
    fn new(summary: &ExtractSummary, file: &'a FileReport) -> Self {
        let path = summary.display_path(&file.path).into_owned();
        match &file.result {
            Ok(report) => Self {
                path,
                keys: Some(report.keys.as_slice()),
                warnings: Some(report.warnings.as_slice()),
                error: None,
            },
            Err(error) => Self {
                path,
                keys: None,
                warnings: None,
                error: Some(format!("{:#}", error)),
            },
        }
    }
}

pub fn print_json_to<W: Write>(summary: &ExtractSummary, writer: &mut W) -> Result<()> {
    let document = JsonSummary {
        files: summary
            .files
            .iter()
            .map(|file| JsonFile::new(summary, file))
            .collect(),
        key_count: summary.key_count(),
        warning_count: summary.warning_count(),
        error_count: summary.error_count(),
    };
    serde_json::to_writer_pretty(&mut *writer, &document).context("Failed to write JSON report")?;
    writeln!(writer).context("Failed to write JSON report")?;
    Ok(())
}

// ============================================================
// Tests
// ============================================================
