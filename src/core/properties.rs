//! Properties sub-machine.
//!
//! Invoked by dialect regions at the start of a bounded token run (call arguments, a
//! tag's attributes, an element's children, a bound attribute value or pipe
//! arguments). It captures the run while tracking bracket depth, finalizes on the
//! run's closing token and hands back `{keyName, defaultValue, namespace}`, each of
//! them absent, static or dynamic.
//!
//! Capture is streaming; classification happens once the run is complete, using the
//! helpers in [`scan`](crate::core::scan).

use crate::core::machine::{Action, Chart, Event, Leaf, Transition};
use crate::core::scan::{
    PropertyKey, capture_block, extract_object, extract_string, is_array, is_object,
    is_string_like, raw_text, split_top_level,
};
use crate::core::tokenizer::{Scope, Token};
use crate::core::types::PropertyValue;

// ============================================================
// Configuration
// ============================================================

/// Kind of run being captured. Decides where the run ends and how it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Arguments of `t(...)`, started after `(`.
    TranslateCall,
    /// Arguments of `useTranslate(...)` / `getTranslate(...)`, started after `(`.
    HookArguments,
    /// Arguments of `createElement(...)`, started after `(`.
    ElementArguments,
    /// Attributes of a tag, started after its name.
    Attributes,
    /// Children of an element, started after its `>`.
    Children,
    /// Value of a bound attribute (`v-t="..."`), started after the opening quote.
    Embedded,
    /// Arguments of the `translate` pipe, started after the first `:`.
    PipeArguments,
}

/// Property names recognized for each field.
#[derive(Debug, Clone, Copy)]
pub struct Aliases {
    pub key_name: &'static [&'static str],
    pub default_value: &'static [&'static str],
    pub namespace: &'static [&'static str],
}

/// Option objects: `t({ key, defaultValue, ns })`.
pub const OBJECT_ALIASES: Aliases = Aliases {
    key_name: &["key", "keyName"],
    default_value: &["defaultValue"],
    namespace: &["ns"],
};

/// `<T>` props, including Vue's kebab-case spelling.
pub const COMPONENT_ALIASES: Aliases = Aliases {
    key_name: &["keyName", "key-name"],
    default_value: &["defaultValue", "default-value"],
    namespace: &["ns"],
};

/// Angular `t` directive attributes and pipe options.
pub const ANGULAR_ALIASES: Aliases = Aliases {
    key_name: &["key"],
    default_value: &["default", "defaultValue"],
    namespace: &["ns"],
};

// ============================================================
// Output
// ============================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesOutput {
    pub key_name: PropertyValue,
    pub default_value: PropertyValue,
    pub namespace: PropertyValue,
    /// An options argument exists but is not an object literal.
    pub dynamic_options: bool,
    /// Attribute names seen (attribute captures only), without binding prefixes.
    pub attributes: Vec<String>,
    /// First argument of `createElement`, as written.
    pub target: Option<String>,
    /// Line where the capture started.
    pub line: usize,
    /// Token that ended the run.
    pub last: Token,
}

impl PropertiesOutput {
    pub fn is_self_closing(&self) -> bool {
        self.last.is(Scope::TagSelfClose)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attribute| attribute == name)
    }
}

// ============================================================
// Chart
// ============================================================

pub struct Properties;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertiesState {
    Capturing,
    Done,
}

#[derive(Debug, Clone)]
pub struct PropertiesContext {
    capture: Capture,
    aliases: Aliases,
    depth: usize,
    /// Nested elements currently open (children captures).
    elements: usize,
    /// Inside the start tag of a void element, which has no end tag.
    void_tag: bool,
    tokens: Vec<Token>,
    line: usize,
    last: Token,
    /// Attribute output the children capture completes.
    seed: PropertiesOutput,
}

impl PropertiesContext {
    pub fn new(capture: Capture, aliases: Aliases) -> Self {
        let depth = match capture {
            Capture::TranslateCall | Capture::HookArguments | Capture::ElementArguments => 1,
            _ => 0,
        };
        Self {
            capture,
            aliases,
            depth,
            elements: 0,
            void_tag: false,
            tokens: Vec::new(),
            line: 0,
            last: Token::default(),
            seed: PropertiesOutput::default(),
        }
    }

    pub fn starting_at(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Children capture completing the props read from the element's attributes.
    pub fn children_of(seed: PropertiesOutput, aliases: Aliases) -> Self {
        Self {
            line: seed.line,
            seed,
            ..Self::new(Capture::Children, aliases)
        }
    }

    fn closes(&self, token: &Token) -> bool {
        match self.capture {
            Capture::TranslateCall | Capture::HookArguments | Capture::ElementArguments => {
                self.depth == 1 && token.is(Scope::ParenClose)
            }
            Capture::Attributes => {
                self.depth == 0 && matches!(token.scope, Scope::TagClose | Scope::TagSelfClose)
            }
            Capture::Children => {
                self.depth == 0 && self.elements == 0 && token.is(Scope::TagEndOpen)
            }
            Capture::Embedded => self.depth == 0 && token.is(Scope::EmbedClose),
            Capture::PipeArguments => {
                self.depth == 0
                    && (token.scope.is_closer()
                        || matches!(token.scope, Scope::Comma | Scope::Semicolon)
                        || (token.is(Scope::Operator) && token.text == "|"))
            }
        }
    }

    fn capture(&mut self, token: &Token) {
        if token.scope.is_opener() {
            self.depth += 1;
        } else if token.scope.is_closer() {
            self.depth = self.depth.saturating_sub(1);
        }
        if self.capture == Capture::Children {
            match token.scope {
                Scope::TagOpen => self.elements += 1,
                Scope::TagName
                    if self.tokens.last().is_some_and(|last| last.is(Scope::TagOpen))
                        && is_void_element(&token.text) =>
                {
                    self.elements = self.elements.saturating_sub(1);
                    self.void_tag = true;
                }
                Scope::TagClose => self.void_tag = false,
                Scope::TagSelfClose if self.void_tag => self.void_tag = false,
                Scope::TagSelfClose | Scope::TagEndOpen => {
                    self.elements = self.elements.saturating_sub(1)
                }
                _ => {}
            }
        }
        self.tokens.push(token.clone());
    }
}

/// HTML elements that never have an end tag (`<br>`, `<img>`).
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|element| element.eq_ignore_ascii_case(name))
}

type Rule = Transition<Properties>;

const CAPTURING: &[Rule] = &[
    Rule::any()
        .when(closes_capture)
        .to(PropertiesState::Done)
        .run(&[Action::Assign(record_last)]),
    Rule::any().run(&[Action::Assign(capture_token)]),
];

fn closes_capture(context: &PropertiesContext, event: &Event<'_, ()>) -> bool {
    event.token().is_some_and(|token| context.closes(token))
}

fn record_last(context: &mut PropertiesContext, event: &Event<'_, ()>) {
    if let Some(token) = event.token() {
        context.last = token.clone();
    }
}

fn capture_token(context: &mut PropertiesContext, event: &Event<'_, ()>) {
    if let Some(token) = event.token() {
        context.capture(token);
    }
}

impl Chart for Properties {
    type State = PropertiesState;
    type Context = PropertiesContext;
    type Output = PropertiesOutput;
    type Child = Leaf;

    const NAME: &'static str = "properties";
    const INITIAL: PropertiesState = PropertiesState::Capturing;

    fn transitions(state: PropertiesState) -> &'static [Transition<Self>] {
        match state {
            PropertiesState::Capturing => CAPTURING,
            PropertiesState::Done => &[],
        }
    }

    fn is_final(state: PropertiesState) -> bool {
        state == PropertiesState::Done
    }

    fn output(_state: PropertiesState, context: &PropertiesContext) -> PropertiesOutput {
        let tokens = context.tokens.as_slice();
        let aliases = &context.aliases;
        let mut output = match context.capture {
            Capture::TranslateCall => translate_arguments(tokens, aliases),
            Capture::HookArguments => PropertiesOutput {
                namespace: hook_namespace(tokens),
                ..Default::default()
            },
            Capture::ElementArguments => element_arguments(tokens, aliases),
            Capture::Attributes => attributes(tokens, aliases),
            Capture::Children => children(context.seed.clone(), tokens),
            Capture::Embedded => embedded(tokens, aliases),
            Capture::PipeArguments => pipe_arguments(tokens, aliases),
        };
        output.line = context.line;
        output.last = context.last.clone();
        output
    }
}

// ============================================================
// Classification
// ============================================================

fn value_of(tokens: &[Token]) -> PropertyValue {
    extract_string(tokens).into()
}

fn is_nullish(tokens: &[Token]) -> bool {
    matches!(tokens, [token] if token.is(Scope::Constant) && matches!(token.text.as_str(), "null" | "undefined"))
}

impl Aliases {
    fn assign(&self, output: &mut PropertiesOutput, name: &str, value: PropertyValue, with_key: bool) {
        if with_key && self.key_name.contains(&name) {
            output.key_name = value;
        } else if self.default_value.contains(&name) {
            output.default_value = value;
        } else if self.namespace.contains(&name) {
            output.namespace = value;
        }
    }
}

/// Read the recognized fields of an object literal run.
fn apply_object(output: &mut PropertiesOutput, tokens: &[Token], aliases: &Aliases, with_key: bool) {
    let Some(entries) = extract_object(tokens) else {
        return;
    };
    for entry in entries {
        if let PropertyKey::Static(name) = &entry.key {
            aliases.assign(output, name, value_of(entry.value), with_key);
        }
    }
}

/// `t(key)`, `t(key, default)`, `t(key, default, opts)`, `t(key, opts)`, `t(opts)`.
fn translate_arguments(tokens: &[Token], aliases: &Aliases) -> PropertiesOutput {
    let mut output = PropertiesOutput::default();
    let args = split_top_level(tokens, Scope::Comma);
    let Some((first, rest)) = args.split_first() else {
        return output;
    };

    if is_object(first) {
        apply_object(&mut output, first, aliases, true);
        return output;
    }
    output.key_name = value_of(first);

    for (position, arg) in rest.iter().take(2).enumerate() {
        if is_object(arg) {
            apply_object(&mut output, arg, aliases, false);
        } else if position == 0 && is_string_like(arg) {
            output.default_value = value_of(arg);
        } else if !is_nullish(arg) {
            output.dynamic_options = true;
        }
    }
    output
}

/// Namespace argument of a translation hook: a string or an array whose first element
/// is a string.
fn hook_namespace(tokens: &[Token]) -> PropertyValue {
    let args = split_top_level(tokens, Scope::Comma);
    let Some(first) = args.first() else {
        return PropertyValue::Absent;
    };
    if is_nullish(first) {
        return PropertyValue::Absent;
    }
    if is_array(first) {
        let inner = &first[1..first.len() - 1];
        return match split_top_level(inner, Scope::Comma).first() {
            Some(element) => value_of(element),
            None => PropertyValue::Absent,
        };
    }
    value_of(first)
}

/// `createElement(T, props, ...children)`.
fn element_arguments(tokens: &[Token], aliases: &Aliases) -> PropertiesOutput {
    let mut output = PropertiesOutput::default();
    let args = split_top_level(tokens, Scope::Comma);
    output.target = args.first().map(|arg| raw_text(arg));

    if let Some(props) = args.get(1) {
        if is_object(props) {
            apply_object(&mut output, props, aliases, true);
        } else if !is_nullish(props) {
            output.dynamic_options = true;
        }
    }
    if let Some(child) = args.get(2) {
        output = complete_with_child(output, value_of(child));
    }
    output
}

/// Children supply the key when the props did not, and the default value otherwise.
fn complete_with_child(mut output: PropertiesOutput, child: PropertyValue) -> PropertiesOutput {
    if child.is_absent() {
        return output;
    }
    if output.key_name.is_absent() {
        output.key_name = child;
    } else {
        output.default_value = std::mem::take(&mut output.default_value).or(child);
    }
    output
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Plain,
    /// `:name`, `v-bind:name`, `[name]`: the value is an expression.
    Bound,
    /// `@name`, `v-on:name`, `(name)`: the value is a handler.
    Event,
}

fn normalize_attribute(raw: &str) -> (&str, Binding) {
    if let Some(name) = raw.strip_prefix("v-bind:").or_else(|| raw.strip_prefix(':')) {
        return (name, Binding::Bound);
    }
    if let Some(name) = raw.strip_prefix("v-on:").or_else(|| raw.strip_prefix('@')) {
        return (name, Binding::Event);
    }
    if let Some(name) = raw.strip_prefix("[(").and_then(|rest| rest.strip_suffix(")]")) {
        return (name, Binding::Bound);
    }
    if let Some(name) = raw.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        return (name, Binding::Bound);
    }
    if let Some(name) = raw.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        return (name, Binding::Event);
    }
    if let Some(name) = raw.strip_prefix("bind-") {
        return (name, Binding::Bound);
    }
    if let Some(name) = raw.strip_prefix("on-") {
        return (name, Binding::Event);
    }
    (raw, Binding::Plain)
}

/// Value of a quoted attribute: plain text, or a single embedded static expression.
fn quoted_value(inner: &[Token]) -> PropertyValue {
    if inner.iter().all(|token| token.is(Scope::StringContent)) {
        return PropertyValue::Static(inner.iter().map(|token| token.text.as_str()).collect());
    }
    match inner {
        [open, expression @ .., close] if open.is(Scope::EmbedOpen) && close.is(Scope::EmbedClose) => {
            value_of(expression)
        }
        _ => PropertyValue::Dynamic,
    }
}

fn attributes(tokens: &[Token], aliases: &Aliases) -> PropertiesOutput {
    let mut output = PropertiesOutput::default();
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        match token.scope {
            Scope::AttributeName => {
                let (name, binding) = normalize_attribute(&token.text);
                index += 1;

                let mut value = PropertyValue::Dynamic;
                if tokens.get(index).is_some_and(|token| token.is(Scope::AttributeEquals)) {
                    index += 1;
                    let (read, consumed) = attribute_value(&tokens[index..], binding);
                    value = read;
                    index += consumed;
                }
                if binding == Binding::Event {
                    value = PropertyValue::Dynamic;
                }

                output.attributes.push(name.to_string());
                aliases.assign(&mut output, name, value, true);
            }
            // Svelte `{keyName}` shorthand or a spread `{...props}`
            Scope::EmbedOpen => {
                let block = capture_block(&tokens[index..]).unwrap_or(&tokens[index..]);
                if let [_, name, ..] = block
                    && name.is(Scope::Identifier)
                    && block.len() == 3
                {
                    output.attributes.push(name.text.clone());
                    aliases.assign(&mut output, &name.text, PropertyValue::Dynamic, true);
                }
                index += block.len();
            }
            _ => index += 1,
        }
    }
    output
}

/// Read an attribute value; returns it with the number of tokens it spans.
fn attribute_value(tokens: &[Token], binding: Binding) -> (PropertyValue, usize) {
    let Some(first) = tokens.first() else {
        return (PropertyValue::Dynamic, 0);
    };
    match first.scope {
        Scope::StringBegin => {
            let end = tokens
                .iter()
                .position(|token| token.is(Scope::StringEnd))
                .unwrap_or(tokens.len() - 1);
            let value = match binding {
                Binding::Plain => quoted_value(&tokens[1..end]),
                Binding::Bound | Binding::Event => PropertyValue::Dynamic,
            };
            (value, end + 1)
        }
        Scope::EmbedOpen => {
            let block = capture_block(tokens).unwrap_or(tokens);
            let inner = &block[1..block.len().saturating_sub(1).max(1)];
            (value_of(inner), block.len())
        }
        Scope::AttributeName => {
            let value = match binding {
                Binding::Plain => PropertyValue::Static(first.text.clone()),
                Binding::Bound | Binding::Event => PropertyValue::Dynamic,
            };
            (value, 1)
        }
        _ => (PropertyValue::Dynamic, 0),
    }
}

/// Element children: text, static `{'expressions'}` and comments are fine; anything
/// else (nested elements, identifiers) makes the value dynamic.
fn children(seed: PropertiesOutput, tokens: &[Token]) -> PropertiesOutput {
    let mut text = String::new();
    let mut dynamic = false;
    let mut present = false;
    let mut previous_line: Option<usize> = None;
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        match token.scope {
            Scope::TagText => {
                let collapsed = token.text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !collapsed.is_empty() {
                    if previous_line.is_some_and(|line| line != token.line) && !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(&collapsed);
                    present = true;
                    previous_line = Some(token.line);
                }
                index += 1;
            }
            Scope::EmbedOpen => {
                let block = capture_block(&tokens[index..]).unwrap_or(&tokens[index..]);
                let inner: Vec<Token> = block[1..block.len().saturating_sub(1).max(1)]
                    .iter()
                    .filter(|token| !token.scope.is_comment())
                    .cloned()
                    .collect();
                if !inner.is_empty() {
                    match extract_string(&inner) {
                        Some(value) => text.push_str(&value),
                        None => dynamic = true,
                    }
                    present = true;
                }
                index += block.len();
            }
            Scope::CommentBlock | Scope::CommentLine => index += 1,
            _ => {
                dynamic = true;
                present = true;
                index += 1;
            }
        }
    }

    let child = if dynamic {
        PropertyValue::Dynamic
    } else if present {
        PropertyValue::Static(text)
    } else {
        PropertyValue::Absent
    };
    complete_with_child(seed, child)
}

/// `v-t="'key'"` or `v-t="{ key, ns, defaultValue }"`.
fn embedded(tokens: &[Token], aliases: &Aliases) -> PropertiesOutput {
    let mut output = PropertiesOutput::default();
    if is_object(tokens) {
        apply_object(&mut output, tokens, aliases, true);
    } else {
        output.key_name = value_of(tokens);
    }
    output
}

/// `translate:'default'` or `translate:{ ns, defaultValue }`; other arguments are
/// interpolation parameters.
fn pipe_arguments(tokens: &[Token], aliases: &Aliases) -> PropertiesOutput {
    let mut output = PropertiesOutput::default();
    for arg in split_top_level(tokens, Scope::Colon) {
        if is_object(arg) {
            apply_object(&mut output, arg, aliases, false);
        } else if is_string_like(arg) {
            output.default_value = value_of(arg);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::machine::Machine;
    use crate::core::properties::*;
    use crate::core::tokenizer::{GrammarId, tokenize};

    fn static_value(value: &str) -> PropertyValue {
        PropertyValue::Static(value.to_string())
    }

    /// Feed tokens (after skipping `skip`) until the capture finalizes.
    fn run(
        source: &str,
        grammar: GrammarId,
        skip: usize,
        context: PropertiesContext,
    ) -> PropertiesOutput {
        let mut machine = Machine::<Properties>::new(context);
        for token in tokenize(source, grammar).skip(skip) {
            if let Some(output) = machine.step(&token).unwrap() {
                return output;
            }
        }
        panic!("capture did not finish: {source}");
    }

    fn call(arguments: &str) -> PropertiesOutput {
        run(
            arguments,
            GrammarId::TypeScript,
            0,
            PropertiesContext::new(Capture::TranslateCall, OBJECT_ALIASES),
        )
    }

    fn tag(source: &str, grammar: GrammarId) -> PropertiesOutput {
        run(
            source,
            grammar,
            2,
            PropertiesContext::new(Capture::Attributes, COMPONENT_ALIASES),
        )
    }

    // ============================================================
    // Call arguments
    // ============================================================

    #[test]
    fn test_call_key_only() {
        let output = call("'hello')");
        assert_eq!(output.key_name, static_value("hello"));
        assert_eq!(output.default_value, PropertyValue::Absent);
        assert_eq!(output.namespace, PropertyValue::Absent);
        assert_eq!(output.last.scope, Scope::ParenClose);
    }

    #[test]
    fn test_call_key_default_and_options() {
        let output = call("'hello', 'Hello!', { ns: 'common', noWrap: true })");
        assert_eq!(output.key_name, static_value("hello"));
        assert_eq!(output.default_value, static_value("Hello!"));
        assert_eq!(output.namespace, static_value("common"));
        assert!(!output.dynamic_options);
    }

    #[test]
    fn test_call_key_and_options() {
        let output = call("'hello', { defaultValue: `Hi`, ns: '' })");
        assert_eq!(output.default_value, static_value("Hi"));
        assert_eq!(output.namespace, static_value(""));
    }

    #[test]
    fn test_call_options_object() {
        let output = call("{ key: 'k', ns: ns, nested: { key: 'ignored' } })");
        assert_eq!(output.key_name, static_value("k"));
        assert_eq!(output.namespace, PropertyValue::Dynamic);
    }

    #[test]
    fn test_call_dynamic_forms() {
        assert_eq!(call("`key-${i}`)").key_name, PropertyValue::Dynamic);
        assert_eq!(call("'a' + b)").key_name, PropertyValue::Dynamic);
        assert_eq!(call("'k', `Hi ${name}`)").default_value, PropertyValue::Dynamic);
        assert!(call("'k', params)").dynamic_options);
        assert!(call("'k', 'default', params)").dynamic_options);
        assert!(!call("'k', undefined, { ns: 'a' })").dynamic_options);
    }

    #[test]
    fn test_call_nested_parens_do_not_close() {
        let output = call("('a' as Key), fn(1, 2))");
        assert_eq!(output.key_name, static_value("a"));
        assert!(output.dynamic_options);
    }

    #[test]
    fn test_call_without_arguments() {
        assert_eq!(call(")").key_name, PropertyValue::Absent);
    }

    #[test]
    fn test_hook_namespace() {
        let hook = |arguments: &str| {
            run(
                arguments,
                GrammarId::TypeScript,
                0,
                PropertiesContext::new(Capture::HookArguments, OBJECT_ALIASES),
            )
            .namespace
        };
        assert_eq!(hook(")"), PropertyValue::Absent);
        assert_eq!(hook("'ns')"), static_value("ns"));
        assert_eq!(hook("['ns1', 'ns2'])"), static_value("ns1"));
        assert_eq!(hook("namespace)"), PropertyValue::Dynamic);
    }

    #[test]
    fn test_element_arguments() {
        let output = run(
            "T, { keyName: 'k' }, 'Default')",
            GrammarId::TypeScript,
            0,
            PropertiesContext::new(Capture::ElementArguments, COMPONENT_ALIASES),
        );
        assert_eq!(output.target.as_deref(), Some("T"));
        assert_eq!(output.key_name, static_value("k"));
        assert_eq!(output.default_value, static_value("Default"));
    }

    // ============================================================
    // Attributes and children
    // ============================================================

    #[test]
    fn test_jsx_attributes() {
        let output = tag(r#"<T keyName="key1" ns="" defaultValue={'Hi'} />"#, GrammarId::Tsx);
        assert_eq!(output.key_name, static_value("key1"));
        assert_eq!(output.namespace, static_value(""));
        assert_eq!(output.default_value, static_value("Hi"));
        assert!(output.is_self_closing());
    }

    #[test]
    fn test_jsx_attribute_forms_that_are_dynamic() {
        let output = tag(r#"<T keyName={key} ns defaultValue={`a${b}`}>"#, GrammarId::Tsx);
        assert_eq!(output.key_name, PropertyValue::Dynamic);
        assert_eq!(output.namespace, PropertyValue::Dynamic);
        assert_eq!(output.default_value, PropertyValue::Dynamic);
        assert!(!output.is_self_closing());
    }

    #[test]
    fn test_vue_bound_and_event_attributes() {
        let source = r#"<template><T :key-name="'a'" @ns="onNs" default-value="b" /></template>"#;
        let output = run(
            source,
            GrammarId::Vue,
            5,
            PropertiesContext::new(Capture::Attributes, COMPONENT_ALIASES),
        );
        assert_eq!(output.key_name, static_value("a"));
        assert_eq!(output.namespace, PropertyValue::Dynamic);
        assert_eq!(output.default_value, static_value("b"));
        assert_eq!(output.attributes, vec!["key-name", "ns", "default-value"]);
    }

    #[test]
    fn test_svelte_shorthand_attribute() {
        let output = tag(r#"<T {keyName} ns="x" />"#, GrammarId::Svelte);
        assert_eq!(output.key_name, PropertyValue::Dynamic);
        assert_eq!(output.namespace, static_value("x"));
    }

    #[test]
    fn test_children_supply_key_or_default() {
        let attributes = tag(r#"<T keyName="k">Hello   world</T>"#, GrammarId::Tsx);
        let source = r#"<T keyName="k">Hello   world</T>"#;
        let output = run(
            source,
            GrammarId::Tsx,
            8,
            PropertiesContext::children_of(attributes, COMPONENT_ALIASES),
        );
        assert_eq!(output.key_name, static_value("k"));
        assert_eq!(output.default_value, static_value("Hello world"));
        assert_eq!(output.last.scope, Scope::TagEndOpen);

        let output = run(
            "<T>{'key'}</T>",
            GrammarId::Tsx,
            3,
            PropertiesContext::children_of(PropertiesOutput::default(), COMPONENT_ALIASES),
        );
        assert_eq!(output.key_name, static_value("key"));
    }

    #[test]
    fn test_children_with_elements_are_dynamic() {
        let output = run(
            "<T keyName='k'>Hi <b>there</b></T>",
            GrammarId::Tsx,
            8,
            PropertiesContext::children_of(
                PropertiesOutput {
                    key_name: static_value("k"),
                    ..Default::default()
                },
                COMPONENT_ALIASES,
            ),
        );
        assert_eq!(output.default_value, PropertyValue::Dynamic);
    }

    #[test]
    fn test_children_void_elements_have_no_end_tag() {
        let children = |source: &str, grammar: GrammarId, skip: usize| {
            run(
                source,
                grammar,
                skip,
                PropertiesContext::children_of(PropertiesOutput::default(), COMPONENT_ALIASES),
            )
        };

        let output = children("<T>Line<br>two</T><p>after</p>", GrammarId::Svelte, 3);
        assert_eq!(output.last.scope, Scope::TagEndOpen);
        assert_eq!(output.default_value, PropertyValue::Dynamic);

        let source = "<template><T>a<br/>b<IMG src=\"x\">c</T>\n<p>after</p></template>";
        let output = children(source, GrammarId::Vue, 6);
        assert_eq!(output.last.scope, Scope::TagEndOpen);
        assert_eq!(output.last.line, 1);
    }

    // ============================================================
    // Embedded values and pipes
    // ============================================================

    #[test]
    fn test_embedded_value() {
        let vt = |source: &str| {
            run(
                source,
                GrammarId::Vue,
                8,
                PropertiesContext::new(Capture::Embedded, OBJECT_ALIASES),
            )
        };
        assert_eq!(vt(r#"<template><p v-t="'k'"></p></template>"#).key_name, static_value("k"));
        let output = vt(r#"<template><p v-t="{ key: 'k', ns: 'n' }"></p></template>"#);
        assert_eq!(output.key_name, static_value("k"));
        assert_eq!(output.namespace, static_value("n"));
        assert_eq!(vt(r#"<template><p v-t="key"></p></template>"#).key_name, PropertyValue::Dynamic);
    }

    #[test]
    fn test_pipe_arguments() {
        let output = run(
            "{{ 'k' | translate:'Default':{ ns: 'n' } }}",
            GrammarId::Angular,
            7,
            PropertiesContext::new(Capture::PipeArguments, ANGULAR_ALIASES),
        );
        assert_eq!(output.default_value, static_value("Default"));
        assert_eq!(output.namespace, static_value("n"));
        assert_eq!(output.last.scope, Scope::EmbedClose);
    }
}
