//! Vue single-file components.
//!
//! Script sections behave like React (`useTranslate`, `t()`, plus `t.value()` and
//! `this.$t()`). The template knows `$t()`, `t()` bound to the script's hook, `<T>`
//! components and the `v-t` directive.

use crate::core::comments::Comments;
use crate::core::context::{KeySource, MachineContext, RawKey, Section};
use crate::core::machine::{Action, Chart, Leaf, Step, Transition};
use crate::core::properties::{Capture, OBJECT_ALIASES, Properties, PropertiesContext};
use crate::core::tokenizer::Scope;
use crate::core::types::WarningKind;

use super::shared::{
    BlockDepth, Calls, Components, Done, Hooks, Sections, Tick, hold_line, region,
};
use super::{DialectGrammar, Syntax, VUE_SYNTAX};

#[derive(Debug, Clone, Copy)]
pub struct Vue;

impl DialectGrammar for Vue {
    fn syntax(&self) -> &'static Syntax {
        &VUE_SYNTAX
    }

    fn initial_section(&self) -> Section {
        Section::Markup
    }

    fn regions(&self) -> Vec<Box<dyn Step<MachineContext>>> {
        vec![
            region::<Comments>(),
            region::<Sections>(),
            region::<BlockDepth>(),
            region::<Hooks>(),
            region::<Calls>(),
            region::<Components>(),
            region::<TranslateDirective>(),
            region::<SetupReference>(),
        ]
    }
}

// ============================================================
// v-t
// ============================================================

/// `v-t="'key'"` or `v-t="{ key, ns, defaultValue }"`.
pub struct TranslateDirective;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateDirectiveState {
    Idle,
    Named,
    Value,
}

type DirectiveRule = Transition<TranslateDirective>;

const DIRECTIVE_IDLE: &[DirectiveRule] = &[DirectiveRule::on(Scope::AttributeName)
    .when(|_, event| event.text() == "v-t")
    .to(TranslateDirectiveState::Named)];

const DIRECTIVE_NAMED: &[DirectiveRule] = &[
    DirectiveRule::on(Scope::AttributeEquals),
    DirectiveRule::on(Scope::EmbedOpen)
        .to(TranslateDirectiveState::Value)
        .run(&[
            Action::Assign(hold_line),
            Action::Invoke(|_: &MachineContext, event: &Done<'_>| {
                PropertiesContext::new(Capture::Embedded, OBJECT_ALIASES).starting_at(event.line())
            }),
        ]),
    DirectiveRule::any()
        .to(TranslateDirectiveState::Idle)
        .run(&[Action::Replay]),
];

const DIRECTIVE_VALUE: &[DirectiveRule] = &[
    DirectiveRule::done()
        .to(TranslateDirectiveState::Idle)
        .run(&[Action::Assign(finish_directive)]),
    DirectiveRule::any().run(&[Action::Forward]),
];

fn finish_directive(context: &mut MachineContext, event: &Done<'_>) {
    if let Some(output) = event.done() {
        context.push_key(RawKey::from_output(output, KeySource::Global));
    }
}

impl Chart for TranslateDirective {
    type State = TranslateDirectiveState;
    type Context = MachineContext;
    type Output = ();
    type Child = Properties;

    const NAME: &'static str = "v-t";
    const INITIAL: TranslateDirectiveState = TranslateDirectiveState::Idle;

    fn transitions(state: TranslateDirectiveState) -> &'static [Transition<Self>] {
        match state {
            TranslateDirectiveState::Idle => DIRECTIVE_IDLE,
            TranslateDirectiveState::Named => DIRECTIVE_NAMED,
            TranslateDirectiveState::Value => DIRECTIVE_VALUE,
        }
    }

    fn output(_state: TranslateDirectiveState, _context: &MachineContext) {}
}

// ============================================================
// Options-API setup
// ============================================================

/// `export default { setup }` or `setup: someFunction`: the setup body lives elsewhere,
/// so its translation hook cannot be followed.
pub struct SetupReference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupReferenceState {
    Idle,
    /// Saw the `setup` property name.
    Property,
    /// Saw `setup:`.
    Value,
    /// Saw `setup: name`.
    Reference,
}

type SetupRule = Transition<SetupReference>;

const SETUP_IDLE: &[SetupRule] = &[SetupRule::on(Scope::Identifier)
    .when(|context, event| {
        event.text() == "setup"
            && context.section == Section::Script { setup: false }
            && context.depth() >= 1
    })
    .to(SetupReferenceState::Property)];

const SETUP_PROPERTY: &[SetupRule] = &[
    SetupRule::one_of(&[Scope::Comma, Scope::BraceClose])
        .to(SetupReferenceState::Idle)
        .run(&[Action::Assign(report_reference)]),
    SetupRule::on(Scope::Colon).to(SetupReferenceState::Value),
    SetupRule::any()
        .to(SetupReferenceState::Idle)
        .run(&[Action::Replay]),
];

const SETUP_VALUE: &[SetupRule] = &[
    SetupRule::on(Scope::Identifier).to(SetupReferenceState::Reference),
    SetupRule::any()
        .to(SetupReferenceState::Idle)
        .run(&[Action::Replay]),
];

const SETUP_REFERENCE: &[SetupRule] = &[
    SetupRule::one_of(&[Scope::Comma, Scope::BraceClose])
        .to(SetupReferenceState::Idle)
        .run(&[Action::Assign(report_reference)]),
    SetupRule::any()
        .to(SetupReferenceState::Idle)
        .run(&[Action::Replay]),
];

fn report_reference(context: &mut MachineContext, event: &Tick<'_>) {
    context.push_warning(WarningKind::VueSetupIsAReference, event.line());
}

impl Chart for SetupReference {
    type State = SetupReferenceState;
    type Context = MachineContext;
    type Output = ();
    type Child = Leaf;

    const NAME: &'static str = "setup-reference";
    const INITIAL: SetupReferenceState = SetupReferenceState::Idle;

    fn transitions(state: SetupReferenceState) -> &'static [Transition<Self>] {
        match state {
            SetupReferenceState::Idle => SETUP_IDLE,
            SetupReferenceState::Property => SETUP_PROPERTY,
            SetupReferenceState::Value => SETUP_VALUE,
            SetupReferenceState::Reference => SETUP_REFERENCE,
        }
    }

    fn output(_state: SetupReferenceState, _context: &MachineContext) {}
}
