//! Extraction engine.
//!
//! ## Module Structure
//!
//! - `tokenizer`: grammar-driven, line-by-line tokenizer producing scope-tagged tokens
//! - `scan`: helpers reading strings, blocks and object literals from token runs
//! - `machine`: generic statechart interpreter
//! - `properties`: sub-machine extracting `{keyName, defaultValue, namespace}`
//! - `comments`: `@tolgee-ignore` / `@tolgee-key` directives
//! - `context`: state shared by the regions of a dialect
//! - `dialects`: React, Vue, Svelte and Angular region sets
//! - `report`: namespace policy and warning classification
//! - `extract`: per-file entry point

pub mod comments;
pub mod context;
pub mod dialects;
pub mod extract;
pub mod machine;
pub mod properties;
pub mod report;
pub mod scan;
pub mod tokenizer;
pub mod types;

pub use extract::extract;
pub use tokenizer::{GrammarId, Scope, Token, tokenize};
pub use types::{
    AbortFlag, ExtractOptions, ExtractedKey, PropertyValue, Report, Warning, WarningKind,
};
