//! Tolgee key extractor.
//!
//! Finds the translation keys a React, Vue, Svelte or Angular code base uses, together
//! with their namespaces and default values, without building a syntax tree: each file
//! is tokenized line by line and the tokens drive a set of small statecharts.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: `.tolgeerc.json` loading and parsing
//! - `core`: Extraction engine (tokenizer, statecharts, dialects, report)
//! - `error`: Hard failures of the extraction pipeline
//! - `plugins`: Custom extractors tried before the built-in dialects
//! - `runner`: File discovery and parallel multi-file extraction
//! - `worker`: Long-lived extraction worker with per-call timeout

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod plugins;
pub mod runner;
pub mod worker;

pub use crate::core::{ExtractOptions, ExtractedKey, Report, Warning, WarningKind, extract};
pub use crate::error::ExtractError;
