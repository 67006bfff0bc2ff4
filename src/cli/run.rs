//! Command dispatch.
//!
//! `extract` resolves the configuration (file, then CLI overrides), collects the
//! source files and feeds them one by one through an [`ExtractionWorker`], so every
//! file is bounded by the configured timeout.

use std::{
    env, fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use tracing::debug;

use super::args::{Arguments, Command, ExtractArgs};
use crate::config::{CONFIG_FILE_NAME, Config, SOURCE_EXTENSIONS, default_config_json, load_config};
use crate::plugins::ExtractorRegistry;
use crate::runner::{FileReport, discover_files, read_source};
use crate::worker::ExtractionWorker;

/// How a run ended, from a CI script's point of view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every file was extracted and nothing was skipped.
    Clean,
    /// Extraction finished, but some keys could not be read statically (exit code 1).
    Skipped,
    /// A file or the configuration could not be processed (exit code 2).
    Failed,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Clean => ExitCode::SUCCESS,
            Outcome::Skipped => ExitCode::from(1),
            Outcome::Failed => ExitCode::from(2),
        }
    }
}

pub enum CommandResult {
    Extract(ExtractSummary),
    Init,
}

impl CommandResult {
    pub fn outcome(&self) -> Outcome {
        match self {
            CommandResult::Extract(summary) => summary.outcome(),
            CommandResult::Init => Outcome::Clean,
        }
    }
}

pub struct ExtractSummary {
    /// Directory paths are displayed relative to.
    pub base_dir: PathBuf,
    pub files: Vec<FileReport>,
    pub json: bool,
}

impl ExtractSummary {
    pub fn key_count(&self) -> usize {
        self.files
            .iter()
            .filter_map(|file| file.result.as_ref().ok())
            .map(|report| report.keys.len())
            .sum()
    }

    pub fn warning_count(&self) -> usize {
        self.files.iter().map(FileReport::warning_count).sum()
    }

    pub fn error_count(&self) -> usize {
        self.files.iter().filter(|file| file.result.is_err()).count()
    }

    /// Hard failures outrank warnings.
    pub fn outcome(&self) -> Outcome {
        if self.error_count() > 0 {
            Outcome::Failed
        } else if self.warning_count() > 0 {
            Outcome::Skipped
        } else {
            Outcome::Clean
        }
    }

    pub fn display_path<'a>(&self, path: &'a Path) -> std::borrow::Cow<'a, str> {
        path.strip_prefix(&self.base_dir)
            .unwrap_or(path)
            .to_string_lossy()
    }
}

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Extract(args)) => extract(args).map(CommandResult::Extract),
        Some(Command::Init) => {
            init()?;
            Ok(CommandResult::Init)
        }
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}

fn extract(args: ExtractArgs) -> Result<ExtractSummary> {
    let base_dir = env::current_dir().context("Failed to read the working directory")?;
    let loaded = load_config(&base_dir)?;
    debug!(from_file = loaded.from_file, root = %loaded.root.display(), "loaded configuration");

    let mut config = loaded.config;
    apply_overrides(&mut config, &args);
    config.validate()?;

    let files = collect_files(&base_dir, &loaded.root, &config, &args.paths)?;
    let worker = ExtractionWorker::new(ExtractorRegistry::default(), config.extract_timeout());
    let options = config.extract_options();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start the extraction runtime")?;
    let files = runtime.block_on(async {
        let mut reports = Vec::with_capacity(files.len());
        for path in files {
            let result = match read_source(&path) {
                Ok(source) => worker
                    .extract(source, path.to_string_lossy(), options.clone())
                    .await
                    .with_context(|| format!("Failed to extract {}", path.display())),
                Err(error) => Err(error),
            };
            reports.push(FileReport { path, result });
        }
        reports
    });

    Ok(ExtractSummary {
        base_dir,
        files,
        json: args.json,
    })
}

fn apply_overrides(config: &mut Config, args: &ExtractArgs) {
    if let Some(namespace) = &args.default_namespace {
        config.default_namespace = Some(namespace.clone());
    }
    if let Some(strict) = args.strict_namespace {
        config.strict_namespace = strict;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.extract_timeout_ms = timeout_ms;
    }
}

/// Files named on the command line, or the configured patterns when none are.
///
/// Directories are searched for every supported extension; explicit files are taken
/// as they are, so an unsupported one is reported rather than skipped.
fn collect_files(
    base_dir: &Path,
    root: &Path,
    config: &Config,
    paths: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    if paths.is_empty() {
        return discover_files(root, &config.patterns, &config.ignores);
    }

    let directory_patterns: Vec<String> = SOURCE_EXTENSIONS
        .iter()
        .map(|extension| format!("**/*.{}", extension))
        .collect();
    let mut files = Vec::new();
    for path in paths {
        let path = base_dir.join(path);
        if path.is_dir() {
            files.extend(discover_files(&path, &directory_patterns, &config.ignores)?);
        } else {
            files.push(path);
        }
    }
    Ok(files)
}

fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(config_path, default_config_json()?)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::{Report, Warning, WarningKind};
    use crate::error::ExtractError;

    fn summary(results: Vec<crate::error::Result<Report>>) -> ExtractSummary {
        ExtractSummary {
            base_dir: PathBuf::from("/project"),
            files: results
                .into_iter()
                .enumerate()
                .map(|(index, result)| FileReport {
                    path: PathBuf::from(format!("/project/src/{index}.ts")),
                    result: result.map_err(Into::into),
                })
                .collect(),
            json: false,
        }
    }

    fn with_warning() -> crate::error::Result<Report> {
        Ok(Report {
            keys: Vec::new(),
            warnings: vec![Warning::new(WarningKind::DynamicKey, 2)],
        })
    }

    #[test]
    fn test_outcome_of_extraction() {
        assert_eq!(summary(vec![Ok(Report::default())]).outcome(), Outcome::Clean);
        assert_eq!(summary(Vec::new()).outcome(), Outcome::Clean);
        assert_eq!(
            summary(vec![Ok(Report::default()), with_warning()]).outcome(),
            Outcome::Skipped
        );
        assert_eq!(
            summary(vec![with_warning(), Err(ExtractError::Cancelled)]).outcome(),
            Outcome::Failed
        );
        assert_eq!(CommandResult::Init.outcome(), Outcome::Clean);
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(Outcome::Clean.exit_code(), ExitCode::SUCCESS);
        assert_eq!(Outcome::Skipped.exit_code(), ExitCode::from(1));
        assert_eq!(Outcome::Failed.exit_code(), ExitCode::from(2));
    }
}
