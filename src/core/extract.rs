//! Per-file extraction entry point.
//!
//! One tokenizer and one fresh set of dialect regions per call: tokens are folded
//! into the shared [`MachineContext`](crate::core::context::MachineContext)
//! synchronously, then the orchestrator turns the raw entries into a [`Report`].

use tracing::debug;

use crate::core::dialects::Dialect;
use crate::core::report::build_report;
use crate::core::tokenizer::{GrammarId, tokenize};
use crate::core::types::{ExtractOptions, Report};
use crate::error::{ExtractError, Result};

/// Extract the translation keys used in `source`.
///
/// `file_name` only selects the grammar and dialect; nothing is read from disk.
///
/// # Errors
///
/// - `UnknownGrammar` when the extension maps to no dialect
/// - `UnterminatedConstruct` when the input ends inside a capture
/// - `Cancelled` when the abort flag of `options` is raised
pub fn extract(source: &str, file_name: &str, options: &ExtractOptions) -> Result<Report> {
    let grammar = GrammarId::for_file(file_name)?;
    let dialect = Dialect::for_grammar(grammar);
    debug!(file = file_name, ?grammar, "extracting");

    let (mut regions, mut context) = dialect.start();
    for token in tokenize(source, grammar) {
        if options.is_aborted() {
            debug!(file = file_name, line = token.line, "extraction cancelled");
            return Err(ExtractError::Cancelled);
        }
        regions.step(&mut context, &token)?;
        context.advance(&token);
    }
    regions.finish()?;

    let report = build_report(context.finish(), options);
    debug!(
        file = file_name,
        keys = report.keys.len(),
        warnings = report.warnings.len(),
        "extracted"
    );
    Ok(report)
}
