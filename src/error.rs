//! Hard failures of the extraction pipeline.
//!
//! Recoverable problems (dynamic keys, unused directives, ...) are not errors: they are
//! reported as [`Warning`](crate::core::Warning)s and extraction continues. The variants
//! here abort the extraction of a single file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file extension maps to no declared grammar.
    #[error("no grammar is declared for \"{file_name}\"")]
    UnknownGrammar { file_name: String },

    /// End of input was reached while a bracket, string or template capture was open.
    #[error("unterminated construct starting on line {line}")]
    UnterminatedConstruct { line: usize },

    /// A single event re-entered the statechart more often than any grammar needs.
    #[error("statechart dispatch exceeded depth {depth} on line {line}")]
    RunawayDispatch { line: usize, depth: usize },

    /// The caller aborted the extraction.
    #[error("extraction was cancelled")]
    Cancelled,

    /// The extraction worker did not answer within the configured time.
    #[error("extraction timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// The extraction worker went away before answering.
    #[error("extraction worker is unavailable")]
    WorkerUnavailable,
}

pub type Result<T> = std::result::Result<T, ExtractError>;
