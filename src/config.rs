use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::ExtractOptions;

pub const CONFIG_FILE_NAME: &str = ".tolgeerc.json";

/// Extensions the built-in dialects handle.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts", "vue", "svelte", "html",
];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_namespace: Option<String>,
    #[serde(default = "default_strict_namespace")]
    pub strict_namespace: bool,
    #[serde(default = "default_extract_timeout_ms")]
    pub extract_timeout_ms: u64,
}

fn default_patterns() -> Vec<String> {
    SOURCE_EXTENSIONS
        .iter()
        .map(|extension| format!("./src/**/*.{}", extension))
        .collect()
}

fn default_ignores() -> Vec<String> {
    ["**/node_modules/**", "**/dist/**"].map(String::from).to_vec()
}

fn default_strict_namespace() -> bool {
    true
}

fn default_extract_timeout_ms() -> u64 {
    10_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            ignores: default_ignores(),
            default_namespace: None,
            strict_namespace: default_strict_namespace(),
            extract_timeout_ms: default_extract_timeout_ms(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `patterns` or `ignores` is invalid.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.patterns {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'patterns': \"{}\"", pattern))?;
        }
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }
        if self.extract_timeout_ms == 0 {
            anyhow::bail!("'extractTimeoutMs' must be greater than 0");
        }
        Ok(())
    }

    pub fn extract_options(&self) -> ExtractOptions {
        let options = ExtractOptions::default().with_strict_namespace(self.strict_namespace);
        match &self.default_namespace {
            Some(namespace) => options.with_default_namespace(namespace.clone()),
            None => options,
        }
    }

    pub fn extract_timeout(&self) -> Duration {
        Duration::from_millis(self.extract_timeout_ms)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory patterns are resolved against: the config file's directory, or the
    /// start directory when using defaults.
    pub root: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let root = path
                .parent()
                .map_or_else(|| start_dir.to_path_buf(), Path::to_path_buf);
            Ok(ConfigLoadResult {
                config,
                root,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            root: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}
