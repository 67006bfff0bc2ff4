//! Multi-file extraction.
//!
//! - `discover_files`: expand the configured glob patterns into a sorted file list
//! - `extract_files`: run extraction on the rayon pool, one report per input path,
//!   in input order

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern, glob_with};
use rayon::prelude::*;
use tracing::debug;

use crate::core::{ExtractOptions, Report};
use crate::plugins::ExtractorRegistry;

/// Outcome of extracting one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<Report>,
}

impl FileReport {
    pub fn warning_count(&self) -> usize {
        self.result
            .as_ref()
            .map_or(0, |report| report.warnings.len())
    }
}

/// Expand `patterns` relative to `root`, dropping paths matched by `ignores`.
///
/// Ignore patterns are matched against the path relative to `root`.
pub fn discover_files(root: &Path, patterns: &[String], ignores: &[String]) -> Result<Vec<PathBuf>> {
    let ignores = ignores
        .iter()
        .map(|pattern| {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))
        })
        .collect::<Result<Vec<_>>>()?;
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut files = BTreeSet::new();
    for pattern in patterns {
        let full_pattern = root.join(pattern.trim_start_matches("./"));
        let entries = glob_with(&full_pattern.to_string_lossy(), options)
            .with_context(|| format!("Invalid glob pattern in 'patterns': \"{}\"", pattern))?;
        for path in entries.flatten() {
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(&path);
            if ignores.iter().any(|ignore| ignore.matches_path(relative)) {
                continue;
            }
            files.insert(path);
        }
    }
    debug!(count = files.len(), "discovered source files");
    Ok(files.into_iter().collect())
}

pub fn extract_files(
    paths: &[PathBuf],
    registry: &ExtractorRegistry,
    options: &ExtractOptions,
) -> Vec<FileReport> {
    paths
        .par_iter()
        .map(|path| FileReport {
            path: path.clone(),
            result: extract_file(path, registry, options),
        })
        .collect()
}

pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn extract_file(path: &Path, registry: &ExtractorRegistry, options: &ExtractOptions) -> Result<Report> {
    let source = read_source(path)?;
    let report = registry
        .extract(&source, &path.to_string_lossy(), options)
        .with_context(|| format!("Failed to extract {}", path.display()))?;
    Ok(report)
}
