//! Grammar-driven tokenizer.
//!
//! Converts source text into a lazy sequence of scope-tagged [`Token`]s, one line at a
//! time, carrying the [`LexerState`] (context stack) across lines so that template
//! literals, block comments and markup sections can span several lines.
//!
//! ## Module Structure
//!
//! - `scope`: token classifications
//! - `grammar`: rule-stack engine and grammar declarations
//! - `grammars`: TypeScript, TSX, Vue, Svelte and Angular grammars

mod grammar;
pub mod grammars;
mod scope;

use std::collections::VecDeque;
use std::path::Path;

pub use grammar::{ContextSpec, Grammar, Lead, Pattern, StackOp};
pub use scope::Scope;

use crate::error::{ExtractError, Result};
use grammar::Op;

/// A scope-tagged span of source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub scope: Scope,
    pub text: String,
    /// Absolute byte offset of the first byte.
    pub start: usize,
    /// Absolute byte offset one past the last byte.
    pub end: usize,
    /// 1-indexed source line.
    pub line: usize,
}

impl Token {
    pub fn new(scope: Scope, text: impl Into<String>, line: usize) -> Self {
        let text = text.into();
        Self {
            scope,
            end: text.len(),
            text,
            start: 0,
            line,
        }
    }

    pub fn is(&self, scope: Scope) -> bool {
        self.scope == scope
    }
}

// ============================================================
// Grammar selection
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarId {
    TypeScript,
    Tsx,
    Vue,
    Svelte,
    Angular,
}

impl GrammarId {
    /// Select the grammar for a file by its extension.
    pub fn for_file(file_name: &str) -> Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("js" | "jsx" | "mjs" | "cjs" | "tsx") => Ok(GrammarId::Tsx),
            Some("ts" | "mts" | "cts") => Ok(GrammarId::TypeScript),
            Some("vue") => Ok(GrammarId::Vue),
            Some("svelte") => Ok(GrammarId::Svelte),
            Some("html") => Ok(GrammarId::Angular),
            _ => Err(ExtractError::UnknownGrammar {
                file_name: file_name.to_string(),
            }),
        }
    }

    pub fn grammar(&self) -> &'static Grammar {
        match self {
            GrammarId::TypeScript => &grammars::TYPESCRIPT,
            GrammarId::Tsx => &grammars::TSX,
            GrammarId::Vue => &grammars::VUE,
            GrammarId::Svelte => &grammars::SVELTE,
            GrammarId::Angular => &grammars::ANGULAR,
        }
    }
}

// ============================================================
// Lexer state
// ============================================================

/// Rule stack carried from one line to the next, plus what the last token allows
/// to follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerState {
    stack: Vec<usize>,
    expression_start: bool,
    type_start: bool,
    /// Between `type` and the `=` of a type alias.
    alias_head: bool,
}

impl LexerState {
    /// State at the start of a file: root context, expression position.
    pub fn initial() -> Self {
        Self {
            stack: vec![0],
            expression_start: true,
            type_start: false,
            alias_head: false,
        }
    }

    /// Update the follow-up positions after a non-comment token.
    fn observe(&mut self, scope: Scope, text: &str) {
        self.expression_start = scope.allows_expression_after(text);
        self.type_start = match scope {
            Scope::Colon => true,
            Scope::Operator => text == "=" && self.alias_head,
            _ => false,
        };
        self.alias_head = match scope {
            Scope::Identifier if text == "type" => true,
            Scope::Operator if text == "=" => false,
            Scope::Semicolon | Scope::BraceOpen | Scope::BraceClose | Scope::ParenOpen => false,
            _ => self.alias_head,
        };
    }

    fn top(&self) -> usize {
        self.stack.last().copied().unwrap_or(0)
    }

    fn apply(&mut self, op: Op) {
        match op {
            Op::Stay => {}
            Op::Push(context) => self.stack.push(context),
            Op::Pop => {
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
            }
            Op::Set(context) => {
                if let Some(top) = self.stack.last_mut() {
                    *top = context;
                }
            }
        }
    }

    /// Names of the active contexts, root first.
    pub fn context_names(&self, grammar: &Grammar) -> Vec<&'static str> {
        self.stack
            .iter()
            .map(|&index| grammar.context(index).name)
            .collect()
    }
}

// ============================================================
// Token stream
// ============================================================

/// Tokenize `source` with the given grammar.
pub fn tokenize(source: &str, grammar: GrammarId) -> Tokens<'_> {
    Tokens {
        grammar: grammar.grammar(),
        lines: source.split('\n'),
        state: LexerState::initial(),
        offset: 0,
        line: 0,
        pending: VecDeque::new(),
    }
}

/// Tokenize a file, selecting the grammar from its extension.
pub fn tokenize_file<'a>(source: &'a str, file_name: &str) -> Result<Tokens<'a>> {
    Ok(tokenize(source, GrammarId::for_file(file_name)?))
}

/// Lazy token iterator. Each line is tokenized when the previous one is exhausted.
pub struct Tokens<'a> {
    grammar: &'static Grammar,
    lines: std::str::Split<'a, char>,
    state: LexerState,
    offset: usize,
    line: usize,
    pending: VecDeque<Token>,
}

impl Tokens<'_> {
    pub fn state(&self) -> &LexerState {
        &self.state
    }

    fn tokenize_line(&mut self, raw: &str) {
        let grammar = self.grammar;
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        let mut pos = 0;
        let mut gap: Option<usize> = None;

        while pos < text.len() {
            let context = grammar.context(self.state.top());
            let matched = context.rules.iter().find_map(|rule| {
                rule.try_match(text, pos, &self.state)
                    .map(|caps| (rule, caps))
            });

            match matched {
                Some((rule, caps)) => {
                    if let Some(start) = gap.take() {
                        self.emit(context.default_scope, text, start, pos);
                    }
                    let width = caps.get(0).map_or(0, |m| m.end());
                    for (scope, start, end) in rule.spans(&caps) {
                        self.emit(scope, text, pos + start, pos + end);
                    }
                    self.state.apply(rule.op);
                    pos += width;
                }
                None => {
                    gap.get_or_insert(pos);
                    pos += text[pos..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }

        let context = grammar.context(self.state.top());
        if let Some(start) = gap {
            self.emit(context.default_scope, text, start, text.len());
        }
        if context.pop_at_eol {
            self.state.apply(Op::Pop);
        }
    }

    fn emit(&mut self, scope: Scope, text: &str, start: usize, end: usize) {
        let span = &text[start..end];
        if scope == Scope::Whitespace || span.is_empty() {
            return;
        }
        if !scope.keeps_whitespace() && span.trim().is_empty() {
            return;
        }

        let (start, end) = (self.offset + start, self.offset + end);
        if !scope.is_comment() {
            self.state.observe(scope, span);
        }

        if scope.is_mergeable()
            && let Some(last) = self.pending.back_mut()
            && last.scope == scope
            && last.line == self.line
        {
            let gap = start.saturating_sub(last.end);
            last.text.push_str(&" ".repeat(gap));
            last.text.push_str(span);
            last.end = end;
            return;
        }

        self.pending.push_back(Token {
            scope,
            text: span.to_string(),
            start,
            end,
            line: self.line,
        });
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            let raw = self.lines.next()?;
            self.line += 1;
            self.tokenize_line(raw);
            self.offset += raw.len() + 1;
        }
    }
}
