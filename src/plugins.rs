//! Custom extractors.
//!
//! Projects with their own translation helpers can register a [`CustomExtractor`].
//! The [`ExtractorRegistry`] asks every registered plugin, in registration order,
//! whether it handles a file before falling back to the built-in dialects.

use tracing::debug;

use crate::core::{ExtractOptions, Report, extract};
use crate::error::Result;

pub trait CustomExtractor: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn handles(&self, file_name: &str) -> bool;

    fn extract(&self, source: &str, file_name: &str, options: &ExtractOptions) -> Result<Report>;
}

#[derive(Default)]
pub struct ExtractorRegistry {
    plugins: Vec<Box<dyn CustomExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: impl CustomExtractor + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    pub fn with(mut self, plugin: impl CustomExtractor + 'static) -> Self {
        self.register(plugin);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn extract(&self, source: &str, file_name: &str, options: &ExtractOptions) -> Result<Report> {
        match self.plugins.iter().find(|plugin| plugin.handles(file_name)) {
            Some(plugin) => {
                debug!(file = file_name, plugin = plugin.name(), "extracting with plugin");
                plugin.extract(source, file_name, options)
            }
            None => extract(source, file_name, options),
        }
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|plugin| plugin.name()))
            .finish()
    }
}
