//! Declared grammars.
//!
//! - TypeScript: plain script code
//! - TSX: script code with JSX elements (also used for `.js`/`.jsx`)
//! - Vue: single-file components; `<script>` bodies use the TypeScript rules, the
//!   `<template>` section knows about bound attributes and `{{ }}` interpolation
//! - Svelte: markup with `{ }` expressions everywhere, including inside attribute values
//! - Angular: HTML templates with `{{ }}` interpolation and `[prop]`/`(event)` bindings

use std::sync::LazyLock;

use super::Scope::*;
use super::grammar::{ContextSpec, Grammar, Pattern, include, pop, push, rule, set};

pub static TYPESCRIPT: LazyLock<Grammar> = LazyLock::new(|| Grammar::build(script(false)));
pub static TSX: LazyLock<Grammar> = LazyLock::new(|| Grammar::build(script(true)));
pub static VUE: LazyLock<Grammar> = LazyLock::new(|| Grammar::build(vue()));
pub static SVELTE: LazyLock<Grammar> = LazyLock::new(|| Grammar::build(svelte()));
pub static ANGULAR: LazyLock<Grammar> = LazyLock::new(|| Grammar::build(angular()));

const END_TAG: &str = r"(</)([^\s>]*)(\s*)(>)";
const END_TAG_SCOPES: &[super::Scope] = &[TagEndOpen, TagName, Whitespace, TagClose];
const START_TAG: &str = r"(<)(\p{L}[\w.:-]*)";
const ATTRIBUTE: &str = r#"[^\s"'<>/=]+"#;

// ============================================================
// Script code
// ============================================================

/// Script code contexts. The first one (`code`) is the entry point other grammars
/// include.
fn script(jsx: bool) -> Vec<ContextSpec> {
    let mut code = vec![
        rule(r"\s+", &[Whitespace]),
        rule(r"//.*", &[CommentLine]),
        push(r"/\*", &[CommentBlock], "block_comment"),
        push(r"'", &[StringBegin], "string_single"),
        push(r#"""#, &[StringBegin], "string_double"),
        push(r"`", &[TemplateBegin], "template"),
    ];
    if jsx {
        code.extend([
            // Generic parameters: `<T,>`, `<T extends U>` and call signatures in type
            // position (`type F = <T>(x: T) => T`).
            rule(
                r"(<)(\s*)([\p{L}_$][\w$]*)(\s*)(,)",
                &[Operator, Whitespace, Identifier, Whitespace, Comma],
            )
            .at_expression_start(),
            rule(
                r"(<)(\s*)([\p{L}_$][\w$]*)(\s+)(extends)\b",
                &[Operator, Whitespace, Identifier, Whitespace, Keyword],
            )
            .at_expression_start(),
            rule(
                r"(<)(\s*)([\p{L}_$][\w$]*)(\s*)(>)(\s*)(\()",
                &[Operator, Whitespace, Identifier, Whitespace, Operator, Whitespace, ParenOpen],
            )
            .at_type_start(),
            push(r"(<)(>)", &[TagOpen, TagClose], "jsx_children").at_expression_start(),
            push(r"(<)([\p{L}_$][\w$.:-]*)", &[TagOpen, TagName], "jsx_tag").at_expression_start(),
        ]);
    }
    code.extend([
        rule(r"/(?:[^/\\\[\n]|\\.|\[(?:[^\]\\\n]|\\.)*\])+/[a-z]*", &[Regex]).at_expression_start(),
        rule(
            r"(?:const|let|var|function|return|if|else|for|while|do|switch|case|default|break|continue|new|delete|typeof|instanceof|void|in|of|throw|try|catch|finally|class|extends|import|export|as|satisfies|async|await|yield|interface|enum|implements|super)\b",
            &[Keyword],
        ),
        rule(r"this\b", &[ThisKeyword]),
        rule(r"(?:true|false|null|undefined|NaN|Infinity)\b", &[Constant]),
        rule(
            r"(?:0[xXbBoO][0-9a-fA-F_]+|(?:\d[\d_]*\.?[\d_]*|\.\d[\d_]*)(?:[eE][+-]?\d+)?)n?",
            &[Number],
        ),
        rule(r"([\p{L}_$][\w$]*)(\s*)(\()", &[FunctionName, Whitespace, ParenOpen]),
        rule(r"([\p{L}_$][\w$]*)(\s*)(\?\.|\.)", &[ObjectName, Whitespace, Accessor]),
        rule(r"[\p{L}_$][\w$]*", &[Identifier]),
        rule(r"\.\.\.", &[Operator]),
        rule(r"\?\.|\.", &[Accessor]),
        push(r"\{", &[BraceOpen], "block"),
        rule(r"\}", &[BraceClose]),
        rule(r"\(", &[ParenOpen]),
        rule(r"\)", &[ParenClose]),
        rule(r"\[", &[BracketOpen]),
        rule(r"\]", &[BracketClose]),
        rule(r",", &[Comma]),
        rule(r":", &[Colon]),
        rule(r";", &[Semicolon]),
        rule(
            r"=>|===|!==|>>>=|\*\*=|<<=|>>=|&&=|\|\|=|\?\?=|==|!=|<=|>=|&&|\|\||\?\?|\*\*|<<|>>>|>>|\+\+|--|[-+*/%&|^!~?<>=]=?",
            &[Operator],
        ),
    ]);

    let escape = rule(
        r"\\(?:u\{[0-9a-fA-F]+\}|u[0-9a-fA-F]{4}|x[0-9a-fA-F]{2}|.|$)",
        &[StringEscape],
    );

    let mut contexts = vec![
        ContextSpec::new("code", Source, code),
        ContextSpec::new("block", Source, vec![pop(r"\}", &[BraceClose]), include("code")]),
        ContextSpec::new("block_comment", CommentBlock, vec![pop(r"\*/", &[CommentBlock])]),
        ContextSpec::new("string_single", StringContent, vec![escape, pop(r"'", &[StringEnd])])
            .line_bound(),
        ContextSpec::new(
            "string_double",
            StringContent,
            vec![escape, pop(r#"""#, &[StringEnd])],
        )
        .line_bound(),
        ContextSpec::new(
            "template",
            TemplateContent,
            vec![
                escape,
                pop(r"`", &[TemplateEnd]),
                push(r"\$\{", &[TemplateExprBegin], "template_expr"),
            ],
        ),
        ContextSpec::new(
            "template_expr",
            Source,
            vec![pop(r"\}", &[TemplateExprEnd]), include("code")],
        ),
    ];

    if jsx {
        contexts.extend([
            ContextSpec::new(
                "jsx_tag",
                Source,
                vec![
                    rule(r"\s+", &[Whitespace]),
                    pop(r"/>", &[TagSelfClose]),
                    set(r">", &[TagClose], "jsx_children"),
                    push(r"\{", &[EmbedOpen], "jsx_embed"),
                    rule(r"=", &[AttributeEquals]),
                    push(r#"""#, &[StringBegin], "jsx_string_double"),
                    push(r"'", &[StringBegin], "jsx_string_single"),
                    rule(r"[\p{L}_$][\w$.:-]*", &[AttributeName]),
                ],
            ),
            ContextSpec::new(
                "jsx_children",
                TagText,
                vec![
                    pop(END_TAG, END_TAG_SCOPES),
                    push(r"(<)(>)", &[TagOpen, TagClose], "jsx_children"),
                    push(r"(<)([\p{L}_$][\w$.:-]*)", &[TagOpen, TagName], "jsx_tag"),
                    push(r"\{", &[EmbedOpen], "jsx_embed"),
                ],
            ),
            ContextSpec::new(
                "jsx_embed",
                Source,
                vec![pop(r"\}", &[EmbedClose]), include("code")],
            ),
            ContextSpec::new("jsx_string_double", StringContent, vec![pop(r#"""#, &[StringEnd])]),
            ContextSpec::new("jsx_string_single", StringContent, vec![pop(r"'", &[StringEnd])]),
        ]);
    }

    contexts
}

// ============================================================
// Markup building blocks
// ============================================================

fn html_comment() -> Pattern {
    push(r"<!--", &[CommentBlock], "html_comment")
}

/// Plain attribute rules shared by every tag context.
fn plain_attributes(strings: (&'static str, &'static str)) -> Vec<Pattern> {
    vec![
        rule(ATTRIBUTE, &[AttributeName]),
        rule(r"=", &[AttributeEquals]),
        push(r#"""#, &[StringBegin], strings.0),
        push(r"'", &[StringBegin], strings.1),
    ]
}

/// `<script>` and `<style>` sections plus the HTML comment and plain string contexts.
fn sections() -> Vec<ContextSpec> {
    let tag = |body: &'static str| {
        let mut patterns = vec![
            rule(r"\s+", &[Whitespace]),
            pop(r"/>", &[TagSelfClose]),
            set(r">", &[TagClose], body),
        ];
        patterns.extend(plain_attributes(("html_string_double", "html_string_single")));
        patterns
    };

    vec![
        ContextSpec::new("script_tag", Source, tag("script_body")),
        ContextSpec::new(
            "script_body",
            Source,
            vec![
                pop(r"(</)(script)(\s*)(>)", END_TAG_SCOPES),
                include("code"),
            ],
        ),
        ContextSpec::new("style_tag", Source, tag("style_body")),
        ContextSpec::new(
            "style_body",
            Source,
            vec![pop(r"(</)(style)(\s*)(>)", END_TAG_SCOPES)],
        ),
        ContextSpec::new("html_comment", CommentBlock, vec![pop(r"-->", &[CommentBlock])]),
        ContextSpec::new(
            "html_string_double",
            StringContent,
            vec![pop(r#"""#, &[StringEnd])],
        ),
        ContextSpec::new("html_string_single", StringContent, vec![pop(r"'", &[StringEnd])]),
    ]
}

fn section_openers() -> Vec<Pattern> {
    vec![
        html_comment(),
        push(r"(<)(script)\b", &[TagOpen, TagName], "script_tag"),
        push(r"(<)(style)\b", &[TagOpen, TagName], "style_tag"),
    ]
}

/// Attribute whose value is an expression: `prefix-name="expr"`. Both quotes delimit the
/// embedded expression.
fn bound_attribute(prefix: &'static str, context_double: &'static str) -> Pattern {
    push(prefix, &[AttributeName, Whitespace, AttributeEquals, Whitespace, EmbedOpen], context_double)
}

fn embedded(name: &'static str, close: &'static str) -> ContextSpec {
    ContextSpec::new(name, Source, vec![pop(close, &[EmbedClose]), include("code")])
}

// ============================================================
// Vue
// ============================================================

fn vue() -> Vec<ContextSpec> {
    let mut sfc = section_openers();
    sfc.extend([
        push(r"(<)(template)\b", &[TagOpen, TagName], "template_tag"),
        rule(END_TAG, END_TAG_SCOPES),
        push(START_TAG, &[TagOpen, TagName], "html_tag"),
    ]);

    let mut vue_tag = vec![
        rule(r"\s+", &[Whitespace]),
        pop(r"/>", &[TagSelfClose]),
        pop(r">", &[TagClose]),
        bound_attribute(r#"((?::|@|#|v-)[^\s"'<>/=]*)(\s*)(=)(\s*)(")"#, "vue_expr_double"),
        bound_attribute(r#"((?::|@|#|v-)[^\s"'<>/=]*)(\s*)(=)(\s*)(')"#, "vue_expr_single"),
    ];
    vue_tag.extend(plain_attributes(("html_string_double", "html_string_single")));

    let mut html_tag = vec![
        rule(r"\s+", &[Whitespace]),
        pop(r"/>", &[TagSelfClose]),
        pop(r">", &[TagClose]),
    ];
    html_tag.extend(plain_attributes(("html_string_double", "html_string_single")));

    let mut contexts = vec![
        ContextSpec::new("sfc", Source, sfc),
        ContextSpec::new(
            "template_tag",
            Source,
            vec![set(r">", &[TagClose], "template_content"), include("vue_tag")],
        ),
        ContextSpec::new(
            "template_content",
            TagText,
            vec![
                html_comment(),
                pop(r"(</)(template)(\s*)(>)", END_TAG_SCOPES),
                push(r"(<)(template)\b", &[TagOpen, TagName], "template_tag"),
                rule(END_TAG, END_TAG_SCOPES),
                push(START_TAG, &[TagOpen, TagName], "vue_tag"),
                push(r"\{\{", &[EmbedOpen], "vue_interpolation"),
            ],
        ),
        ContextSpec::new("vue_tag", Source, vue_tag),
        ContextSpec::new("html_tag", Source, html_tag),
        embedded("vue_expr_double", r#"""#),
        embedded("vue_expr_single", r"'"),
        embedded("vue_interpolation", r"\}\}"),
    ];
    contexts.extend(sections());
    contexts.extend(script(false));
    contexts
}

// ============================================================
// Svelte
// ============================================================

fn svelte() -> Vec<ContextSpec> {
    let mut markup = section_openers();
    markup.extend([
        rule(END_TAG, END_TAG_SCOPES),
        push(START_TAG, &[TagOpen, TagName], "svelte_tag"),
        push(r"\{", &[EmbedOpen], "svelte_embed"),
    ]);

    let mut contexts = vec![
        ContextSpec::new("markup", TagText, markup),
        ContextSpec::new(
            "svelte_tag",
            Source,
            vec![
                rule(r"\s+", &[Whitespace]),
                pop(r"/>", &[TagSelfClose]),
                pop(r">", &[TagClose]),
                push(r"\{", &[EmbedOpen], "svelte_embed"),
                rule(r#"[^\s"'<>/={}]+"#, &[AttributeName]),
                rule(r"=", &[AttributeEquals]),
                push(r#"""#, &[StringBegin], "svelte_string_double"),
                push(r"'", &[StringBegin], "svelte_string_single"),
            ],
        ),
        ContextSpec::new(
            "svelte_string_double",
            StringContent,
            vec![
                pop(r#"""#, &[StringEnd]),
                push(r"\{", &[EmbedOpen], "svelte_embed"),
            ],
        ),
        ContextSpec::new(
            "svelte_string_single",
            StringContent,
            vec![pop(r"'", &[StringEnd]), push(r"\{", &[EmbedOpen], "svelte_embed")],
        ),
        ContextSpec::new(
            "svelte_embed",
            Source,
            vec![
                pop(r"\}", &[EmbedClose]),
                // Block tags: {#if}, {:else}, {/each}, {@html}
                rule(r"[#:/@]\p{L}+", &[Keyword]),
                include("code"),
            ],
        ),
    ];
    contexts.extend(sections());
    contexts.extend(script(false));
    contexts
}

// ============================================================
// Angular
// ============================================================

fn angular() -> Vec<ContextSpec> {
    let mut content = section_openers();
    content.extend([
        rule(END_TAG, END_TAG_SCOPES),
        push(START_TAG, &[TagOpen, TagName], "ng_tag"),
        push(r"\{\{", &[EmbedOpen], "ng_interpolation"),
    ]);

    let mut ng_tag = vec![
        rule(r"\s+", &[Whitespace]),
        pop(r"/>", &[TagSelfClose]),
        pop(r">", &[TagClose]),
        bound_attribute(
            r#"((?:\[|\(|\*|bind-|on-)[^\s"'<>/=]*)(\s*)(=)(\s*)(")"#,
            "ng_expr_double",
        ),
        bound_attribute(
            r#"((?:\[|\(|\*|bind-|on-)[^\s"'<>/=]*)(\s*)(=)(\s*)(')"#,
            "ng_expr_single",
        ),
    ];
    ng_tag.extend(plain_attributes(("ng_string_double", "ng_string_single")));

    let mut contexts = vec![
        ContextSpec::new("ng_content", TagText, content),
        ContextSpec::new("ng_tag", Source, ng_tag),
        ContextSpec::new(
            "ng_string_double",
            StringContent,
            vec![
                pop(r#"""#, &[StringEnd]),
                push(r"\{\{", &[EmbedOpen], "ng_interpolation"),
            ],
        ),
        ContextSpec::new(
            "ng_string_single",
            StringContent,
            vec![
                pop(r"'", &[StringEnd]),
                push(r"\{\{", &[EmbedOpen], "ng_interpolation"),
            ],
        ),
        embedded("ng_expr_double", r#"""#),
        embedded("ng_expr_single", r"'"),
        embedded("ng_interpolation", r"\}\}"),
    ];
    contexts.extend(sections());
    contexts.extend(script(false));
    contexts
}
