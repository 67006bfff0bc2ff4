//! Mutable record shared by the regions of a dialect.
//!
//! ## Module Structure
//!
//! - binding stack: `{depth, namespace}` entries pushed by translation hooks and popped
//!   when the block that holds them closes
//! - directive slot: the pending `@tolgee-ignore` / `@tolgee-key` and the line it
//!   applies to
//! - drafts: per-region scratch space for constructs spanning several tokens
//! - entries: raw keys and warnings in encounter order, resolved later by
//!   [`report`](crate::core::report)

use std::mem;

use crate::core::comments::{Directive, KeyOverride};
use crate::core::dialects::{CallSource, Syntax};
use crate::core::properties::PropertiesOutput;
use crate::core::tokenizer::{Scope, Token};
use crate::core::types::{PropertyValue, WarningKind};

/// Part of a multi-section file the tokens currently come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Template markup (Vue, Svelte and Angular outside `<script>`).
    Markup,
    /// Attributes of a `<script>` tag that is not closed yet.
    ScriptTag { setup: bool },
    Script { setup: bool },
}

impl Section {
    pub fn is_script(&self) -> bool {
        matches!(self, Section::Script { .. })
    }
}

/// Where a key takes its inherited namespace from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// `t()` bound to a translation hook with this namespace.
    Binding(PropertyValue),
    /// `t()` with no enclosing translation hook.
    Unbound,
    /// Components, `$t` and directives; no binding needed.
    Global,
    /// Vue template `t()`, bound to the script's hook once the whole file is read.
    Setup,
}

/// Key fields exactly as written, before the namespace policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKey {
    pub key_name: PropertyValue,
    pub default_value: PropertyValue,
    pub namespace: PropertyValue,
    pub dynamic_options: bool,
    pub source: KeySource,
    pub line: usize,
}

impl RawKey {
    pub fn from_output(output: &PropertiesOutput, source: KeySource) -> Self {
        Self {
            key_name: output.key_name.clone(),
            default_value: output.default_value.clone(),
            namespace: output.namespace.clone(),
            dynamic_options: output.dynamic_options,
            source,
            line: output.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEntry {
    Key(RawKey),
    Override(KeyOverride, usize),
    Warning(WarningKind, usize),
}

/// Everything the orchestrator needs once the token stream is exhausted.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub entries: Vec<RawEntry>,
    /// Namespace of the first translation hook found in a script section.
    pub setup_binding: Option<PropertyValue>,
}

#[derive(Debug, Clone)]
struct Binding {
    depth: usize,
    namespace: PropertyValue,
}

#[derive(Debug, Clone)]
struct PendingDirective {
    directive: Directive,
    line: usize,
    applies_to: usize,
    /// An extraction attempt started on `applies_to` and has not finished yet.
    claimed: bool,
}

/// Scratch space of regions whose constructs span several tokens.
#[derive(Debug, Clone, Default)]
pub struct Drafts {
    /// Source of the `t()` call whose arguments are being captured.
    pub call: Option<CallSource>,
    /// The call's name stands where a class or object member may be declared.
    pub call_at_member: bool,
    /// Finished call that turns out to be a method declaration if a body follows.
    pub method_candidate: Option<RawKey>,
    /// Tokens of the string literal preceding a possible `| translate`.
    pub operand: Vec<Token>,
    /// Key read from the pipe operand, with its line.
    pub pipe: Option<(PropertyValue, usize)>,
}

pub struct MachineContext {
    pub syntax: &'static Syntax,
    pub section: Section,
    pub drafts: Drafts,
    depth: usize,
    bindings: Vec<Binding>,
    setup_binding: Option<PropertyValue>,
    directive: Option<PendingDirective>,
    /// Line a `@tolgee-key` override replaced; every later entry on it is dropped.
    overridden: Option<usize>,
    /// Last line holding a token that is not a comment.
    code_line: usize,
    /// The two tokens before the current one, most recent first.
    recent: [Token; 2],
    entries: Vec<RawEntry>,
}

impl MachineContext {
    pub fn new(syntax: &'static Syntax, section: Section) -> Self {
        Self {
            syntax,
            section,
            drafts: Drafts::default(),
            depth: 0,
            bindings: Vec::new(),
            setup_binding: None,
            directive: None,
            overridden: None,
            code_line: 0,
            recent: Default::default(),
            entries: Vec::new(),
        }
    }

    // ============================================================
    // Token history
    // ============================================================

    /// Token before the one being dispatched.
    pub fn previous(&self) -> &Token {
        &self.recent[0]
    }

    pub fn before_previous(&self) -> &Token {
        &self.recent[1]
    }

    /// Called once every region has seen `token`.
    pub fn advance(&mut self, token: &Token) {
        self.recent[1] = mem::replace(&mut self.recent[0], token.clone());
    }

    // ============================================================
    // Bindings
    // ============================================================

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn enter_block(&mut self) {
        self.depth += 1;
    }

    pub fn leave_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        let depth = self.depth;
        self.bindings.retain(|binding| binding.depth <= depth);
    }

    /// Record a translation hook in the current block.
    pub fn bind(&mut self, namespace: PropertyValue) {
        if self.setup_binding.is_none() && self.section.is_script() {
            self.setup_binding = Some(namespace.clone());
        }
        self.bindings.push(Binding {
            depth: self.depth,
            namespace,
        });
    }

    /// Record a deferred call before the directive slot moves on.
    fn flush_method_candidate(&mut self) {
        if let Some(key) = self.drafts.method_candidate.take() {
            self.push_key(key);
        }
    }

    /// Resolve where a call of the given kind takes its namespace from.
    pub fn source_for(&self, call: CallSource) -> KeySource {
        match call {
            CallSource::Bound => self
                .bindings
                .last()
                .map_or(KeySource::Unbound, |binding| {
                    KeySource::Binding(binding.namespace.clone())
                }),
            CallSource::Global => KeySource::Global,
            CallSource::Setup => KeySource::Setup,
        }
    }

    // ============================================================
    // Directive slot
    // ============================================================

    pub fn set_directive(&mut self, directive: Directive, line: usize) {
        self.flush_method_candidate();
        self.retire();
        self.directive = Some(PendingDirective {
            directive,
            line,
            applies_to: line + 1,
            claimed: false,
        });
    }

    /// Let the directive slot see a token: retires a directive whose line went by
    /// without an extraction attempt, and moves it past comment-only lines.
    pub fn observe(&mut self, token: &Token) {
        let is_comment = token.scope.is_comment();
        let code_line = self.code_line;

        if let Some(pending) = self.directive.as_mut()
            && !pending.claimed
        {
            if token.line > pending.applies_to {
                self.retire();
            } else if token.line == pending.applies_to && is_comment && code_line != token.line {
                pending.applies_to += 1;
            }
        }
        if !is_comment {
            self.code_line = token.line;
        }
    }

    /// An extraction attempt starts on `line`; keep the directive for it until the
    /// attempt finishes.
    pub fn hold(&mut self, line: usize) {
        if let Some(pending) = self.directive.as_mut()
            && pending.applies_to == line
        {
            pending.claimed = true;
        }
    }

    /// The attempt started on `line` turned out not to be an extraction.
    pub fn release(&mut self, line: usize) {
        let Some(pending) = self.directive.as_mut() else {
            return;
        };
        if pending.applies_to != line || !pending.claimed {
            return;
        }
        pending.claimed = false;
        if self.code_line > line {
            self.retire();
        }
    }

    /// Take the directive applying to `line`. Returns `true` when the entry about to
    /// be recorded must be dropped.
    fn consult(&mut self, line: usize) -> bool {
        if self.overridden == Some(line) {
            return true;
        }
        if !self
            .directive
            .as_ref()
            .is_some_and(|pending| pending.applies_to == line)
        {
            return false;
        }
        if let Some(PendingDirective {
            directive: Directive::Key(key),
            ..
        }) = self.directive.take()
        {
            self.entries.push(RawEntry::Override(key, line));
            self.overridden = Some(line);
        }
        true
    }

    fn retire(&mut self) {
        let Some(pending) = self.directive.take() else {
            return;
        };
        match pending.directive {
            Directive::Ignore if !pending.claimed => self
                .entries
                .push(RawEntry::Warning(WarningKind::UnusedIgnore, pending.line)),
            Directive::Ignore => {}
            Directive::Key(key) => self.entries.push(RawEntry::Override(key, pending.applies_to)),
        }
    }

    // ============================================================
    // Entries
    // ============================================================

    pub fn push_key(&mut self, key: RawKey) {
        if !self.consult(key.line) {
            self.entries.push(RawEntry::Key(key));
        }
    }

    pub fn push_warning(&mut self, kind: WarningKind, line: usize) {
        if !self.consult(line) {
            self.entries.push(RawEntry::Warning(kind, line));
        }
    }

    /// Record a warning about a directive itself; directives never suppress these.
    pub fn report(&mut self, kind: WarningKind, line: usize) {
        self.entries.push(RawEntry::Warning(kind, line));
    }

    /// End of input.
    pub fn finish(mut self) -> Extraction {
        self.flush_method_candidate();
        self.retire();
        Extraction {
            entries: self.entries,
            setup_binding: self.setup_binding,
        }
    }
}
