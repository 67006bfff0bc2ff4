//! Rule-stack grammar engine.
//!
//! A grammar is a set of named contexts. Each context holds an ordered rule list; at a
//! given position the first rule whose anchored regex matches wins, emits scoped spans
//! and may push, pop or replace the active context. Text no rule claims is collected
//! into a single span of the context's default scope.
//!
//! Grammars are declared as [`ContextSpec`] tables and compiled once into a [`Grammar`].
//! Compilation resolves `Include`s (a context borrowing another context's rules) and
//! context names in stack operations.

use regex::{Captures, Regex};

use super::{LexerState, Scope};

// ============================================================
// Declarations
// ============================================================

/// Context stack operation performed after a rule matched.
#[derive(Debug, Clone, Copy)]
pub enum StackOp {
    Stay,
    Push(&'static str),
    Pop,
    /// Replace the top of the stack.
    Set(&'static str),
}

/// Precondition on the lexer state for a rule to be tried at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lead {
    Anywhere,
    /// Only where an expression may start (after an operator, `(`, `return`, ...).
    ExpressionStart,
    /// Only where a type may start: after `:` or the `=` of a type alias.
    TypeStart,
}

impl Lead {
    fn allows(self, state: &LexerState) -> bool {
        match self {
            Lead::Anywhere => true,
            Lead::ExpressionStart => state.expression_start,
            Lead::TypeStart => state.type_start,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    Match {
        regex: &'static str,
        /// One scope per capture group, or a single scope for the whole match when the
        /// regex has no groups.
        scopes: &'static [Scope],
        op: StackOp,
        lead: Lead,
    },
    /// Splice in the rules of another context.
    Include(&'static str),
}

/// Shorthand constructors used by the grammar tables.
pub const fn rule(regex: &'static str, scopes: &'static [Scope]) -> Pattern {
    Pattern::Match {
        regex,
        scopes,
        op: StackOp::Stay,
        lead: Lead::Anywhere,
    }
}

pub const fn push(regex: &'static str, scopes: &'static [Scope], context: &'static str) -> Pattern {
    Pattern::Match {
        regex,
        scopes,
        op: StackOp::Push(context),
        lead: Lead::Anywhere,
    }
}

pub const fn pop(regex: &'static str, scopes: &'static [Scope]) -> Pattern {
    Pattern::Match {
        regex,
        scopes,
        op: StackOp::Pop,
        lead: Lead::Anywhere,
    }
}

pub const fn set(regex: &'static str, scopes: &'static [Scope], context: &'static str) -> Pattern {
    Pattern::Match {
        regex,
        scopes,
        op: StackOp::Set(context),
        lead: Lead::Anywhere,
    }
}

pub const fn include(context: &'static str) -> Pattern {
    Pattern::Include(context)
}

impl Pattern {
    /// Restrict this rule to expression-start positions.
    pub const fn at_expression_start(self) -> Pattern {
        self.with_lead(Lead::ExpressionStart)
    }

    /// Restrict this rule to type-start positions.
    pub const fn at_type_start(self) -> Pattern {
        self.with_lead(Lead::TypeStart)
    }

    const fn with_lead(self, lead: Lead) -> Pattern {
        match self {
            Pattern::Match {
                regex, scopes, op, ..
            } => Pattern::Match {
                regex,
                scopes,
                op,
                lead,
            },
            Pattern::Include(context) => Pattern::Include(context),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContextSpec {
    pub name: &'static str,
    pub default_scope: Scope,
    /// Single-line constructs (quoted strings) end at the end of the line.
    pub pop_at_eol: bool,
    pub patterns: Vec<Pattern>,
}

impl ContextSpec {
    pub fn new(name: &'static str, default_scope: Scope, patterns: Vec<Pattern>) -> Self {
        Self {
            name,
            default_scope,
            pop_at_eol: false,
            patterns,
        }
    }

    pub fn line_bound(mut self) -> Self {
        self.pop_at_eol = true;
        self
    }
}

// ============================================================
// Compiled grammar
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Stay,
    Push(usize),
    Pop,
    Set(usize),
}

#[derive(Debug)]
pub(crate) struct Rule {
    regex: Regex,
    scopes: &'static [Scope],
    pub(crate) op: Op,
    lead: Lead,
}

impl Rule {
    /// Try the rule at `pos`. Matches are relative to `&line[pos..]`; empty matches
    /// never count.
    pub(crate) fn try_match<'l>(
        &self,
        line: &'l str,
        pos: usize,
        state: &LexerState,
    ) -> Option<Captures<'l>> {
        if !self.lead.allows(state) {
            return None;
        }
        let caps = self.regex.captures(&line[pos..])?;
        let whole = caps.get(0)?;
        (whole.end() > 0).then_some(caps)
    }

    /// Scoped spans of a match, relative to the match start.
    pub(crate) fn spans(&self, caps: &Captures<'_>) -> Vec<(Scope, usize, usize)> {
        if caps.len() == 1 {
            return caps
                .get(0)
                .map(|m| vec![(self.scopes[0], m.start(), m.end())])
                .unwrap_or_default();
        }
        (1..caps.len())
            .filter_map(|group| {
                let m = caps.get(group)?;
                let scope = *self.scopes.get(group - 1)?;
                Some((scope, m.start(), m.end()))
            })
            .collect()
    }
}

#[derive(Debug)]
pub(crate) struct Context {
    pub(crate) name: &'static str,
    pub(crate) rules: Vec<Rule>,
    pub(crate) default_scope: Scope,
    pub(crate) pop_at_eol: bool,
}

#[derive(Debug)]
pub struct Grammar {
    pub(crate) contexts: Vec<Context>,
}

impl Grammar {
    /// Compile context declarations. The first context is the root.
    ///
    /// Grammar tables are static data: an unknown context name or an invalid pattern
    /// is a programming error and panics.
    pub fn build(specs: Vec<ContextSpec>) -> Grammar {
        let index_of = |name: &str| {
            specs
                .iter()
                .position(|spec| spec.name == name)
                .unwrap_or_else(|| panic!("unknown lexer context `{name}`"))
        };

        let contexts = specs
            .iter()
            .map(|spec| {
                let mut patterns = Vec::new();
                flatten(spec, &specs, &index_of, &mut patterns, &mut vec![spec.name]);
                let rules = patterns
                    .into_iter()
                    .map(|(regex, scopes, op, lead)| Rule {
                        regex: Regex::new(&format!("^(?:{regex})"))
                            .unwrap_or_else(|err| panic!("invalid lexer pattern `{regex}`: {err}")),
                        scopes,
                        op: match op {
                            StackOp::Stay => Op::Stay,
                            StackOp::Push(name) => Op::Push(index_of(name)),
                            StackOp::Pop => Op::Pop,
                            StackOp::Set(name) => Op::Set(index_of(name)),
                        },
                        lead,
                    })
                    .collect();
                Context {
                    name: spec.name,
                    rules,
                    default_scope: spec.default_scope,
                    pop_at_eol: spec.pop_at_eol,
                }
            })
            .collect();

        Grammar { contexts }
    }

    pub(crate) fn context(&self, index: usize) -> &Context {
        &self.contexts[index]
    }
}

type FlatRule = (&'static str, &'static [Scope], StackOp, Lead);

fn flatten(
    spec: &ContextSpec,
    specs: &[ContextSpec],
    index_of: &impl Fn(&str) -> usize,
    out: &mut Vec<FlatRule>,
    visiting: &mut Vec<&'static str>,
) {
    for pattern in &spec.patterns {
        match *pattern {
            Pattern::Match {
                regex,
                scopes,
                op,
                lead,
            } => out.push((regex, scopes, op, lead)),
            Pattern::Include(name) => {
                if visiting.contains(&name) {
                    continue;
                }
                visiting.push(name);
                flatten(&specs[index_of(name)], specs, index_of, out, visiting);
                visiting.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::tokenizer::grammar::*;

    #[test]
    fn test_include_splices_rules_in_order() {
        let grammar = Grammar::build(vec![
            ContextSpec::new(
                "root",
                Scope::Source,
                vec![rule(r"a", &[Scope::Identifier]), include("shared")],
            ),
            ContextSpec::new(
                "shared",
                Scope::Source,
                vec![rule(r"b", &[Scope::Keyword]), include("root")],
            ),
        ]);
        assert_eq!(grammar.context(0).rules.len(), 2);
        assert_eq!(grammar.context(1).rules.len(), 2);
    }

    #[test]
    fn test_stack_ops_resolve_context_names() {
        let grammar = Grammar::build(vec![
            ContextSpec::new("root", Scope::Source, vec![push(r"\(", &[Scope::ParenOpen], "inner")]),
            ContextSpec::new("inner", Scope::Source, vec![pop(r"\)", &[Scope::ParenClose])]),
        ]);
        assert_eq!(grammar.context(0).rules[0].op, Op::Push(1));
        assert_eq!(grammar.context(1).rules[0].op, Op::Pop);
    }

    #[test]
    fn test_expression_start_lead() {
        let grammar = Grammar::build(vec![ContextSpec::new(
            "root",
            Scope::Source,
            vec![rule(r"<", &[Scope::TagOpen]).at_expression_start()],
        )]);
        let rule = &grammar.context(0).rules[0];
        let mut state = LexerState::initial();
        assert!(rule.try_match("<div", 0, &state).is_some());
        state.expression_start = false;
        assert!(rule.try_match("<div", 0, &state).is_none());
    }

    #[test]
    fn test_type_start_lead() {
        let grammar = Grammar::build(vec![ContextSpec::new(
            "root",
            Scope::Source,
            vec![rule(r"<", &[Scope::Operator]).at_type_start()],
        )]);
        let rule = &grammar.context(0).rules[0];
        let mut state = LexerState::initial();
        assert!(rule.try_match("<T>", 0, &state).is_none());
        state.type_start = true;
        assert!(rule.try_match("<T>", 0, &state).is_some());
    }

    #[test]
    fn test_group_spans() {
        let grammar = Grammar::build(vec![ContextSpec::new(
            "root",
            Scope::Source,
            vec![rule(r"([a-z]+)(\s*)(\()", &[
                Scope::FunctionName,
                Scope::Whitespace,
                Scope::ParenOpen,
            ])],
        )]);
        let rule = &grammar.context(0).rules[0];
        let caps = rule.try_match("x = t (", 4, &LexerState::initial()).unwrap();
        assert_eq!(
            rule.spans(&caps),
            vec![
                (Scope::FunctionName, 0, 1),
                (Scope::Whitespace, 1, 2),
                (Scope::ParenOpen, 2, 3),
            ]
        );
    }
}
