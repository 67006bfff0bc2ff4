//! Token classifications.
//!
//! Every token carries the innermost scope the grammar assigned to it. Scopes are the
//! event types of the statechart: dialect grammars key their transition tables on them.
//! `Display` renders TextMate-flavoured names, which keeps traces readable.

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Text no rule classified (plain code, CSS, ...).
    #[default]
    Source,
    /// Insignificant whitespace; never emitted.
    Whitespace,

    CommentLine,
    CommentBlock,

    Keyword,
    ThisKeyword,
    /// `true`, `false`, `null`, `undefined`.
    Constant,
    Number,
    Regex,

    Identifier,
    /// Identifier directly followed by `.` or `?.`.
    ObjectName,
    /// Identifier directly followed by `(`.
    FunctionName,

    StringBegin,
    StringEnd,
    StringContent,
    StringEscape,
    TemplateBegin,
    TemplateEnd,
    TemplateContent,
    /// `${` inside a template literal.
    TemplateExprBegin,
    TemplateExprEnd,

    BraceOpen,
    BraceClose,
    ParenOpen,
    ParenClose,
    BracketOpen,
    BracketClose,
    Comma,
    Colon,
    Semicolon,
    Accessor,
    Operator,

    /// `<` opening a tag.
    TagOpen,
    /// `</` opening a closing tag.
    TagEndOpen,
    TagName,
    /// `>` ending a tag.
    TagClose,
    /// `/>` ending a self-closing tag.
    TagSelfClose,
    AttributeName,
    AttributeEquals,
    /// Element children text (JSX children, HTML text).
    TagText,

    /// Start of an expression embedded in markup: JSX/Svelte `{`, Vue/Angular `{{`, or
    /// the opening quote of a bound attribute.
    EmbedOpen,
    EmbedClose,
}

impl Scope {
    pub fn name(&self) -> &'static str {
        match self {
            Scope::Source => "source",
            Scope::Whitespace => "whitespace",
            Scope::CommentLine => "comment.line.double-slash",
            Scope::CommentBlock => "comment.block",
            Scope::Keyword => "keyword.control",
            Scope::ThisKeyword => "variable.language.this",
            Scope::Constant => "constant.language",
            Scope::Number => "constant.numeric",
            Scope::Regex => "string.regexp",
            Scope::Identifier => "variable.other.readwrite",
            Scope::ObjectName => "variable.other.object",
            Scope::FunctionName => "entity.name.function",
            Scope::StringBegin => "punctuation.definition.string.begin",
            Scope::StringEnd => "punctuation.definition.string.end",
            Scope::StringContent => "string.quoted",
            Scope::StringEscape => "constant.character.escape",
            Scope::TemplateBegin => "punctuation.definition.string.template.begin",
            Scope::TemplateEnd => "punctuation.definition.string.template.end",
            Scope::TemplateContent => "string.template",
            Scope::TemplateExprBegin => "punctuation.definition.template-expression.begin",
            Scope::TemplateExprEnd => "punctuation.definition.template-expression.end",
            Scope::BraceOpen => "punctuation.definition.block.begin",
            Scope::BraceClose => "punctuation.definition.block.end",
            Scope::ParenOpen => "meta.brace.round.begin",
            Scope::ParenClose => "meta.brace.round.end",
            Scope::BracketOpen => "meta.brace.square.begin",
            Scope::BracketClose => "meta.brace.square.end",
            Scope::Comma => "punctuation.separator.comma",
            Scope::Colon => "punctuation.separator.key-value",
            Scope::Semicolon => "punctuation.terminator.statement",
            Scope::Accessor => "punctuation.accessor",
            Scope::Operator => "keyword.operator",
            Scope::TagOpen => "punctuation.definition.tag.begin",
            Scope::TagEndOpen => "punctuation.definition.tag.end-begin",
            Scope::TagName => "entity.name.tag",
            Scope::TagClose => "punctuation.definition.tag.end",
            Scope::TagSelfClose => "punctuation.definition.tag.self-close",
            Scope::AttributeName => "entity.other.attribute-name",
            Scope::AttributeEquals => "punctuation.separator.attribute",
            Scope::TagText => "meta.tag.children",
            Scope::EmbedOpen => "punctuation.section.embedded.begin",
            Scope::EmbedClose => "punctuation.section.embedded.end",
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Scope::CommentLine | Scope::CommentBlock)
    }

    /// Scopes that open a nested bracket level.
    pub fn is_opener(&self) -> bool {
        matches!(
            self,
            Scope::BraceOpen
                | Scope::ParenOpen
                | Scope::BracketOpen
                | Scope::TemplateExprBegin
                | Scope::EmbedOpen
        )
    }

    /// Scopes that close a nested bracket level.
    pub fn is_closer(&self) -> bool {
        matches!(
            self,
            Scope::BraceClose
                | Scope::ParenClose
                | Scope::BracketClose
                | Scope::TemplateExprEnd
                | Scope::EmbedClose
        )
    }

    /// String bodies keep whitespace-only spans; everywhere else they are dropped.
    pub(crate) fn keeps_whitespace(&self) -> bool {
        matches!(self, Scope::StringContent | Scope::TemplateContent)
    }

    /// Adjacent spans of these scopes are merged into one token.
    pub(crate) fn is_mergeable(&self) -> bool {
        matches!(
            self,
            Scope::CommentBlock | Scope::TagText | Scope::Source | Scope::StringContent
        )
    }

    /// Whether an expression (and therefore a JSX tag or a regex literal) may start
    /// right after a token of this scope.
    pub(crate) fn allows_expression_after(&self, text: &str) -> bool {
        match self {
            Scope::Operator
            | Scope::Comma
            | Scope::Colon
            | Scope::Semicolon
            | Scope::ParenOpen
            | Scope::BracketOpen
            | Scope::BraceOpen
            | Scope::BraceClose
            | Scope::EmbedOpen
            | Scope::TemplateExprBegin
            | Scope::TagClose
            | Scope::TagSelfClose => true,
            Scope::Keyword => matches!(
                text,
                "return"
                    | "yield"
                    | "await"
                    | "case"
                    | "default"
                    | "else"
                    | "do"
                    | "in"
                    | "of"
                    | "typeof"
                    | "void"
                    | "delete"
                    | "throw"
                    | "export"
            ),
            _ => false,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
