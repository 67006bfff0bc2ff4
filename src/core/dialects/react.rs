//! React: scripts with optional JSX.

use crate::core::comments::Comments;
use crate::core::context::{KeySource, MachineContext, RawKey, Section};
use crate::core::machine::{Action, Chart, Step, Transition};
use crate::core::properties::{COMPONENT_ALIASES, Capture, Properties, PropertiesContext};
use crate::core::tokenizer::Scope;

use super::shared::{BlockDepth, Calls, Components, Done, Hooks, hold_line, region};
use super::{CallPattern, CallSource, DialectGrammar, REACT_SYNTAX, Receiver, Syntax};

#[derive(Debug, Clone, Copy)]
pub struct React;

impl DialectGrammar for React {
    fn syntax(&self) -> &'static Syntax {
        &REACT_SYNTAX
    }

    fn initial_section(&self) -> Section {
        Section::Script { setup: false }
    }

    fn regions(&self) -> Vec<Box<dyn Step<MachineContext>>> {
        vec![
            region::<Comments>(),
            region::<BlockDepth>(),
            region::<Hooks>(),
            region::<Calls>(),
            region::<Components>(),
            region::<CreateElement>(),
        ]
    }
}

// ============================================================
// createElement
// ============================================================

const CREATE_ELEMENT: &[CallPattern] = &[
    CallPattern::bare("createElement", CallSource::Global),
    CallPattern::method(Receiver::Object("React"), "createElement", CallSource::Global),
];

/// `React.createElement(T, props, ...children)`.
pub struct CreateElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateElementState {
    Idle,
    Named,
    Arguments,
}

type Rule = Transition<CreateElement>;

const IDLE: &[Rule] = &[Rule::on(Scope::FunctionName)
    .when(|context, event| {
        event.token().is_some_and(|token| {
            CREATE_ELEMENT
                .iter()
                .any(|pattern| pattern.matches(context, token))
        })
    })
    .to(CreateElementState::Named)
    .run(&[Action::Assign(hold_line)])];

const NAMED: &[Rule] = &[
    Rule::on(Scope::ParenOpen)
        .to(CreateElementState::Arguments)
        .run(&[Action::Invoke(|_: &MachineContext, event: &Done<'_>| {
            PropertiesContext::new(Capture::ElementArguments, COMPONENT_ALIASES)
                .starting_at(event.line())
        })]),
    Rule::any().to(CreateElementState::Idle).run(&[Action::Replay]),
];

const ARGUMENTS: &[Rule] = &[
    Rule::done()
        .to(CreateElementState::Idle)
        .run(&[Action::Assign(finish_element)]),
    Rule::any().run(&[Action::Forward]),
];

fn finish_element(context: &mut MachineContext, event: &Done<'_>) {
    let Some(output) = event.done() else {
        return;
    };
    if output.target.as_deref() == Some(context.syntax.component) {
        context.push_key(RawKey::from_output(output, KeySource::Global));
    } else {
        context.release(output.line);
    }
}

impl Chart for CreateElement {
    type State = CreateElementState;
    type Context = MachineContext;
    type Output = ();
    type Child = Properties;

    const NAME: &'static str = "create-element";
    const INITIAL: CreateElementState = CreateElementState::Idle;

    fn transitions(state: CreateElementState) -> &'static [Transition<Self>] {
        match state {
            CreateElementState::Idle => IDLE,
            CreateElementState::Named => NAMED,
            CreateElementState::Arguments => ARGUMENTS,
        }
    }

    fn output(_state: CreateElementState, _context: &MachineContext) {}
}
