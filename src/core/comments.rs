//! Magic comments.
//!
//! - `@tolgee-ignore`: nothing is extracted from the next line
//! - `@tolgee-key <payload>`: the next line yields exactly the given key
//!
//! The payload of `@tolgee-key` is either a JSON5 object
//! (`{ key: 'k', ns: 'n', defaultValue: 'd' }`), a quoted string or a bare key name.
//! A leading `\` escapes a key that starts like an object (`\{count}`).
//!
//! The [`Comments`] chart runs as the first region of every dialect. It feeds comment
//! tokens to the directive slot of the [`MachineContext`] and lets the slot observe
//! every other token so stale directives get retired.

use std::sync::Arc;

use swc_common::{FileName, GLOBALS, Globals, SourceMap};
use swc_ecma_ast::{Expr, Lit, ModuleItem, ObjectLit, Prop, PropName, PropOrSpread, Stmt};
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

use crate::core::context::MachineContext;
use crate::core::machine::{Action, Chart, Event, Leaf, Transition};
use crate::core::tokenizer::Scope;
use crate::core::types::WarningKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Ignore,
    Key(KeyOverride),
}

/// Key forced by `@tolgee-key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOverride {
    pub key_name: String,
    pub namespace: Option<String>,
    pub default_value: Option<String>,
}

impl KeyOverride {
    fn named(key_name: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            namespace: None,
            default_value: None,
        }
    }
}

impl Directive {
    /// Read a directive from the text of a comment token.
    ///
    /// Returns `None` for ordinary comments, and the warning to report for an override
    /// whose payload is unusable.
    pub fn parse(comment: &str) -> Option<Result<Directive, WarningKind>> {
        let body = comment_body(comment);

        if strip_tag(body, "@tolgee-ignore").is_some() {
            return Some(Ok(Directive::Ignore));
        }
        let payload = strip_tag(body, "@tolgee-key")?;
        Some(parse_payload(payload.trim()).map(Directive::Key))
    }
}

/// Strip `tag` when it stands alone as the first word of `body`.
fn strip_tag<'a>(body: &'a str, tag: &str) -> Option<&'a str> {
    let rest = body.strip_prefix(tag)?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

/// Comment text without its delimiters and leading `*` decoration.
fn comment_body(text: &str) -> &str {
    let mut body = text.trim();
    for prefix in ["//", "/*", "<!--"] {
        if let Some(rest) = body.strip_prefix(prefix) {
            body = rest;
            break;
        }
    }
    for suffix in ["*/", "-->"] {
        if let Some(rest) = body.strip_suffix(suffix) {
            body = rest;
            break;
        }
    }
    body.trim_start_matches(|c: char| c == '*' || c.is_whitespace())
        .trim_end()
}

fn parse_payload(payload: &str) -> Result<KeyOverride, WarningKind> {
    if payload.is_empty() {
        return Err(WarningKind::InvalidKeyOverride);
    }
    if let Some(literal) = payload.strip_prefix("\\{") {
        return Ok(KeyOverride::named(format!("{{{literal}")));
    }
    if payload.starts_with('{') {
        let expression = parse_expression(payload).ok_or(WarningKind::MalformedKeyOverride)?;
        return match expression {
            Expr::Object(object) => read_override(&object),
            _ => Err(WarningKind::MalformedKeyOverride),
        };
    }
    if payload.starts_with(['\'', '"'])
        && let Some(Expr::Lit(Lit::Str(string))) = parse_expression(payload)
        && let Some(value) = string.value.as_str()
    {
        return Ok(KeyOverride::named(value));
    }
    Ok(KeyOverride::named(payload))
}

/// Parse a JSON5 value as a parenthesized script expression.
fn parse_expression(payload: &str) -> Option<Expr> {
    let source_map = Arc::new(SourceMap::default());

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Anon.into(), format!("({payload})"));
        let syntax = Syntax::Typescript(TsSyntax::default());
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let module = parser.parse_module().ok()?;
        if !parser.take_errors().is_empty() {
            return None;
        }
        let [ModuleItem::Stmt(Stmt::Expr(statement))] = module.body.as_slice() else {
            return None;
        };
        match &*statement.expr {
            Expr::Paren(paren) => Some((*paren.expr).clone()),
            _ => None,
        }
    })
}

fn read_override(object: &ObjectLit) -> Result<KeyOverride, WarningKind> {
    let mut key_name = None;
    let mut namespace = None;
    let mut default_value = None;

    for property in &object.props {
        let PropOrSpread::Prop(property) = property else {
            return Err(WarningKind::InvalidKeyOverride);
        };
        let Prop::KeyValue(entry) = &**property else {
            return Err(WarningKind::InvalidKeyOverride);
        };
        let name = match &entry.key {
            PropName::Ident(ident) => ident.sym.to_string(),
            PropName::Str(s) => s.value.as_str().map(str::to_string).unwrap_or_default(),
            _ => continue,
        };
        let slot = match name.as_str() {
            "key" => &mut key_name,
            "ns" => &mut namespace,
            "defaultValue" => &mut default_value,
            _ => continue,
        };
        let Expr::Lit(Lit::Str(value)) = &*entry.value else {
            return Err(WarningKind::InvalidKeyOverride);
        };
        *slot = value.value.as_str().map(str::to_string);
    }

    Ok(KeyOverride {
        key_name: key_name.ok_or(WarningKind::InvalidKeyOverride)?,
        namespace,
        default_value,
    })
}

// ============================================================
// Comment region
// ============================================================

pub struct Comments;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentsState {
    Watching,
}

type Rule = Transition<Comments>;

const WATCHING: &[Rule] = &[
    Rule::one_of(&[Scope::CommentLine, Scope::CommentBlock])
        .run(&[Action::Assign(read_comment)]),
    Rule::any().run(&[Action::Assign(observe)]),
];

fn read_comment(context: &mut MachineContext, event: &Event<'_, ()>) {
    let Some(token) = event.token() else {
        return;
    };
    context.observe(token);
    match Directive::parse(&token.text) {
        Some(Ok(directive)) => context.set_directive(directive, token.line),
        Some(Err(kind)) => context.report(kind, token.line),
        None => {}
    }
}

fn observe(context: &mut MachineContext, event: &Event<'_, ()>) {
    if let Some(token) = event.token() {
        context.observe(token);
    }
}

impl Chart for Comments {
    type State = CommentsState;
    type Context = MachineContext;
    type Output = ();
    type Child = Leaf;

    const NAME: &'static str = "comments";
    const INITIAL: CommentsState = CommentsState::Watching;

    fn transitions(_state: CommentsState) -> &'static [Transition<Self>] {
        WATCHING
    }

    fn output(_state: CommentsState, _context: &MachineContext) {}
}
