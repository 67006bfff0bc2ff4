//! Angular templates.
//!
//! - `{{ 'key' | translate }}`, `[title]="'key' | translate:'Default'"`: the pipe
//!   operand is the key, pipe arguments give the default value and namespace
//! - `<span t key="key" ns="ns" default="Default">`: the `t` attribute directive
//!
//! Neither needs a translation hook.

use crate::core::comments::Comments;
use crate::core::context::{KeySource, MachineContext, RawKey, Section};
use crate::core::machine::{Action, Chart, Step, Transition};
use crate::core::properties::{ANGULAR_ALIASES, Capture, Properties, PropertiesContext};
use crate::core::scan::extract_string;
use crate::core::tokenizer::Scope;
use crate::core::types::PropertyValue;

use super::shared::{Done, hold_line, region};
use super::{ANGULAR_SYNTAX, DialectGrammar, Syntax};

#[derive(Debug, Clone, Copy)]
pub struct Angular;

impl DialectGrammar for Angular {
    fn syntax(&self) -> &'static Syntax {
        &ANGULAR_SYNTAX
    }

    fn initial_section(&self) -> Section {
        Section::Markup
    }

    fn regions(&self) -> Vec<Box<dyn Step<MachineContext>>> {
        vec![region::<Comments>(), region::<AttributeDirective>(), region::<Pipes>()]
    }
}

// ============================================================
// translate pipe
// ============================================================

pub struct Pipes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipesState {
    Idle,
    /// Inside a string literal that may turn out to be a pipe operand.
    Operand,
    /// Saw `|` after an operand.
    Piped,
    /// Saw `| translate`.
    Translate,
    Arguments,
}

type PipeRule = Transition<Pipes>;

const PIPES_IDLE: &[PipeRule] = &[
    PipeRule::on(Scope::StringBegin)
        .to(PipesState::Operand)
        .run(&[Action::Assign(|context: &mut MachineContext, event: &Done<'_>| {
            context.drafts.operand.clear();
            extend_operand(context, event);
        })]),
    PipeRule::on(Scope::Operator)
        .when(|_, event| event.text() == "|")
        .to(PipesState::Piped)
        .run(&[Action::Assign(read_operand)]),
    PipeRule::any().run(&[Action::Assign(|context: &mut MachineContext, _: &Done<'_>| {
        context.drafts.operand.clear()
    })]),
];

const PIPES_OPERAND: &[PipeRule] = &[
    PipeRule::one_of(&[Scope::StringContent, Scope::StringEscape])
        .run(&[Action::Assign(extend_operand)]),
    PipeRule::on(Scope::StringEnd)
        .to(PipesState::Idle)
        .run(&[Action::Assign(extend_operand)]),
    PipeRule::any().to(PipesState::Idle).run(&[Action::Replay]),
];

const PIPES_PIPED: &[PipeRule] = &[
    PipeRule::on(Scope::Identifier)
        .when(|_, event| event.text() == "translate")
        .to(PipesState::Translate)
        .run(&[Action::Assign(|context: &mut MachineContext, _: &Done<'_>| {
            if let Some((_, line)) = context.drafts.pipe {
                context.hold(line);
            }
        })]),
    PipeRule::any().to(PipesState::Idle).run(&[Action::Replay]),
];

const PIPES_TRANSLATE: &[PipeRule] = &[
    PipeRule::on(Scope::Colon)
        .to(PipesState::Arguments)
        .run(&[Action::Invoke(|_: &MachineContext, event: &Done<'_>| {
            PropertiesContext::new(Capture::PipeArguments, ANGULAR_ALIASES)
                .starting_at(event.line())
        })]),
    PipeRule::any()
        .to(PipesState::Idle)
        .run(&[Action::Assign(finish_pipe), Action::Replay]),
];

const PIPES_ARGUMENTS: &[PipeRule] = &[
    PipeRule::done()
        .to(PipesState::Idle)
        .run(&[Action::Assign(finish_pipe)]),
    PipeRule::any().run(&[Action::Forward]),
];

fn extend_operand(context: &mut MachineContext, event: &Done<'_>) {
    if let Some(token) = event.token() {
        context.drafts.operand.push(token.clone());
    }
}

/// The operand is static only when a complete string literal directly precedes `|`.
fn read_operand(context: &mut MachineContext, event: &Done<'_>) {
    let operand = std::mem::take(&mut context.drafts.operand);
    let key = match operand.last() {
        Some(last) if last.is(Scope::StringEnd) => PropertyValue::from(extract_string(&operand)),
        _ => PropertyValue::Dynamic,
    };
    let line = operand.first().map_or(event.line(), |token| token.line);
    context.drafts.pipe = Some((key, line));
}

/// Record the pipe key, completed with the pipe arguments when there are some.
fn finish_pipe(context: &mut MachineContext, event: &Done<'_>) {
    let Some((key_name, line)) = context.drafts.pipe.take() else {
        return;
    };
    let arguments = event.done().cloned().unwrap_or_default();
    context.push_key(RawKey {
        key_name,
        line,
        ..RawKey::from_output(&arguments, KeySource::Global)
    });
}

impl Chart for Pipes {
    type State = PipesState;
    type Context = MachineContext;
    type Output = ();
    type Child = Properties;

    const NAME: &'static str = "pipes";
    const INITIAL: PipesState = PipesState::Idle;

    fn transitions(state: PipesState) -> &'static [Transition<Self>] {
        match state {
            PipesState::Idle => PIPES_IDLE,
            PipesState::Operand => PIPES_OPERAND,
            PipesState::Piped => PIPES_PIPED,
            PipesState::Translate => PIPES_TRANSLATE,
            PipesState::Arguments => PIPES_ARGUMENTS,
        }
    }

    fn output(_state: PipesState, _context: &MachineContext) {}
}

// ============================================================
// t attribute directive
// ============================================================

pub struct AttributeDirective;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeDirectiveState {
    Idle,
    Attributes,
}

type DirectiveRule = Transition<AttributeDirective>;

const DIRECTIVE_IDLE: &[DirectiveRule] = &[DirectiveRule::on(Scope::TagName)
    .when(|context, _| context.previous().is(Scope::TagOpen))
    .to(AttributeDirectiveState::Attributes)
    .run(&[
        Action::Assign(hold_line),
        Action::Invoke(|_: &MachineContext, event: &Done<'_>| {
            PropertiesContext::new(Capture::Attributes, ANGULAR_ALIASES).starting_at(event.line())
        }),
    ])];

const DIRECTIVE_ATTRIBUTES: &[DirectiveRule] = &[
    DirectiveRule::done()
        .to(AttributeDirectiveState::Idle)
        .run(&[Action::Assign(finish_tag)]),
    DirectiveRule::any().run(&[Action::Forward]),
];

fn finish_tag(context: &mut MachineContext, event: &Done<'_>) {
    let Some(output) = event.done() else {
        return;
    };
    if output.has_attribute("t") {
        context.push_key(RawKey::from_output(output, KeySource::Global));
    } else {
        context.release(output.line);
    }
}

impl Chart for AttributeDirective {
    type State = AttributeDirectiveState;
    type Context = MachineContext;
    type Output = ();
    type Child = Properties;

    const NAME: &'static str = "t-directive";
    const INITIAL: AttributeDirectiveState = AttributeDirectiveState::Idle;

    fn transitions(state: AttributeDirectiveState) -> &'static [Transition<Self>] {
        match state {
            AttributeDirectiveState::Idle => DIRECTIVE_IDLE,
            AttributeDirectiveState::Attributes => DIRECTIVE_ATTRIBUTES,
        }
    }

    fn output(_state: AttributeDirectiveState, _context: &MachineContext) {}
}
