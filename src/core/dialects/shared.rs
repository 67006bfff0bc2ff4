//! Regions shared by the script-based dialects.

use crate::core::context::{KeySource, MachineContext, RawKey, Section};
use crate::core::machine::{Action, Chart, Event, Leaf, Region, Step, Transition};
use crate::core::properties::{
    COMPONENT_ALIASES, Capture, OBJECT_ALIASES, Properties, PropertiesContext, PropertiesOutput,
};
use crate::core::tokenizer::Scope;
use crate::core::types::WarningKind;

use super::CallSource;

/// Box a fresh region of chart `M`.
pub(super) fn region<M>() -> Box<dyn Step<MachineContext>>
where
    M: Chart<Context = MachineContext>,
    Region<M>: 'static,
{
    Box::new(Region::<M>::new())
}

pub(super) type Done<'t> = Event<'t, PropertiesOutput>;

/// Keep the directive slot for the construct starting at this token.
pub(super) fn hold_line(context: &mut MachineContext, event: &Done<'_>) {
    context.hold(event.line());
}

// ============================================================
// Sections
// ============================================================

/// Follows `<script>` / `<script setup>` boundaries of a single-file component.
pub struct Sections;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionsState {
    Markup,
    ScriptTag,
    Script,
}

type SectionRule = Transition<Sections>;

pub(super) type Tick<'t> = Event<'t, ()>;

const MARKUP: &[SectionRule] = &[SectionRule::on(Scope::TagName)
    .when(|context, event| context.previous().is(Scope::TagOpen) && event.text() == "script")
    .to(SectionsState::ScriptTag)
    .run(&[Action::Assign(|context: &mut MachineContext, _: &Tick<'_>| {
        context.section = Section::ScriptTag { setup: false }
    })])];

const SCRIPT_TAG: &[SectionRule] = &[
    SectionRule::on(Scope::AttributeName)
        .when(|_, event| event.text() == "setup")
        .run(&[Action::Assign(|context: &mut MachineContext, _: &Tick<'_>| {
            context.section = Section::ScriptTag { setup: true }
        })]),
    SectionRule::on(Scope::TagClose)
        .to(SectionsState::Script)
        .run(&[Action::Assign(|context: &mut MachineContext, _: &Tick<'_>| {
            if let Section::ScriptTag { setup } = context.section {
                context.section = Section::Script { setup };
            }
        })]),
    SectionRule::on(Scope::TagSelfClose)
        .to(SectionsState::Markup)
        .run(&[Action::Assign(enter_markup)]),
];

const SCRIPT: &[SectionRule] = &[SectionRule::on(Scope::TagEndOpen)
    .to(SectionsState::Markup)
    .run(&[Action::Assign(enter_markup)])];

fn enter_markup(context: &mut MachineContext, _: &Tick<'_>) {
    context.section = Section::Markup;
}

impl Chart for Sections {
    type State = SectionsState;
    type Context = MachineContext;
    type Output = ();
    type Child = Leaf;

    const NAME: &'static str = "sections";
    const INITIAL: SectionsState = SectionsState::Markup;

    fn transitions(state: SectionsState) -> &'static [Transition<Self>] {
        match state {
            SectionsState::Markup => MARKUP,
            SectionsState::ScriptTag => SCRIPT_TAG,
            SectionsState::Script => SCRIPT,
        }
    }

    fn output(_state: SectionsState, _context: &MachineContext) {}
}

// ============================================================
// Block depth
// ============================================================

/// Tracks `{`/`}` nesting and pops bindings of closed blocks.
pub struct BlockDepth;

type DepthRule = Transition<BlockDepth>;

const COUNTING: &[DepthRule] = &[
    DepthRule::on(Scope::BraceOpen).run(&[Action::Assign(
        |context: &mut MachineContext, _: &Event<'_, ()>| context.enter_block(),
    )]),
    DepthRule::on(Scope::BraceClose).run(&[Action::Assign(
        |context: &mut MachineContext, _: &Event<'_, ()>| context.leave_block(),
    )]),
];

impl Chart for BlockDepth {
    type State = ();
    type Context = MachineContext;
    type Output = ();
    type Child = Leaf;

    const NAME: &'static str = "block-depth";
    const INITIAL: () = ();

    fn transitions(_state: ()) -> &'static [Transition<Self>] {
        COUNTING
    }

    fn output(_state: (), _context: &MachineContext) {}
}

// ============================================================
// Translation hooks
// ============================================================

/// `useTranslate(ns?)` / `getTranslate(ns?)`.
pub struct Hooks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HooksState {
    Idle,
    Named,
    Arguments,
}

type HookRule = Transition<Hooks>;

const HOOKS_IDLE: &[HookRule] = &[HookRule::on(Scope::FunctionName)
    .when(|context, event| {
        event
            .token()
            .is_some_and(|token| context.syntax.is_hook(context, token))
    })
    .to(HooksState::Named)];

const HOOKS_NAMED: &[HookRule] = &[
    HookRule::on(Scope::ParenOpen)
        .to(HooksState::Arguments)
        .run(&[Action::Invoke(|_: &MachineContext, event: &Done<'_>| {
            PropertiesContext::new(Capture::HookArguments, OBJECT_ALIASES).starting_at(event.line())
        })]),
    HookRule::any().to(HooksState::Idle).run(&[Action::Replay]),
];

const HOOKS_ARGUMENTS: &[HookRule] = &[
    HookRule::done()
        .to(HooksState::Idle)
        .run(&[Action::Assign(bind_hook)]),
    HookRule::any().run(&[Action::Forward]),
];

fn bind_hook(context: &mut MachineContext, event: &Done<'_>) {
    let Some(output) = event.done() else {
        return;
    };
    if output.namespace.is_dynamic() {
        context.push_warning(WarningKind::DynamicNamespace, output.line);
    }
    context.bind(output.namespace.clone());
}

impl Chart for Hooks {
    type State = HooksState;
    type Context = MachineContext;
    type Output = ();
    type Child = Properties;

    const NAME: &'static str = "hooks";
    const INITIAL: HooksState = HooksState::Idle;

    fn transitions(state: HooksState) -> &'static [Transition<Self>] {
        match state {
            HooksState::Idle => HOOKS_IDLE,
            HooksState::Named => HOOKS_NAMED,
            HooksState::Arguments => HOOKS_ARGUMENTS,
        }
    }

    fn output(_state: HooksState, _context: &MachineContext) {}
}

// ============================================================
// Translate calls
// ============================================================

/// `t(...)` and the dialect's other call shapes.
pub struct Calls;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallsState {
    Idle,
    Named,
    Arguments,
    /// Arguments closed in member position; a `{` or `:` next makes it a method.
    Closed,
}

type CallRule = Transition<Calls>;

const CALLS_IDLE: &[CallRule] = &[CallRule::on(Scope::FunctionName)
    .when(|context, event| {
        event
            .token()
            .is_some_and(|token| context.syntax.call(context, token).is_some())
    })
    .to(CallsState::Named)
    .run(&[Action::Assign(begin_call)])];

const CALLS_NAMED: &[CallRule] = &[
    CallRule::on(Scope::ParenOpen)
        .to(CallsState::Arguments)
        .run(&[Action::Invoke(|_: &MachineContext, event: &Done<'_>| {
            PropertiesContext::new(Capture::TranslateCall, OBJECT_ALIASES).starting_at(event.line())
        })]),
    CallRule::any().to(CallsState::Idle).run(&[Action::Replay]),
];

const CALLS_ARGUMENTS: &[CallRule] = &[
    CallRule::done()
        .when(|context, _| context.drafts.call_at_member)
        .to(CallsState::Closed)
        .run(&[Action::Assign(defer_call)]),
    CallRule::done()
        .to(CallsState::Idle)
        .run(&[Action::Assign(finish_call)]),
    CallRule::any().run(&[Action::Forward]),
];

const CALLS_CLOSED: &[CallRule] = &[
    CallRule::one_of(&[Scope::BraceOpen, Scope::Colon])
        .to(CallsState::Idle)
        .run(&[Action::Assign(drop_method)]),
    CallRule::any()
        .to(CallsState::Idle)
        .run(&[Action::Assign(record_deferred), Action::Replay]),
];

/// Words that may precede a member name in a class body.
const MEMBER_MODIFIERS: &[&str] = &[
    "async", "static", "public", "private", "protected", "override", "readonly", "get", "set",
];

fn begin_call(context: &mut MachineContext, event: &Done<'_>) {
    let Some(token) = event.token() else {
        return;
    };
    let previous = context.previous();
    let at_member = matches!(
        previous.scope,
        Scope::BraceOpen | Scope::BraceClose | Scope::Semicolon | Scope::Comma
    ) || (matches!(previous.scope, Scope::Identifier | Scope::Keyword)
        && MEMBER_MODIFIERS.contains(&previous.text.as_str()));
    context.drafts.call_at_member = at_member;
    context.drafts.call = context.syntax.call(context, token).map(|call| call.source);
    context.hold(token.line);
}

fn call_key(context: &mut MachineContext, output: &PropertiesOutput) -> RawKey {
    let call = context.drafts.call.take().unwrap_or(CallSource::Bound);
    RawKey::from_output(output, context.source_for(call))
}

fn finish_call(context: &mut MachineContext, event: &Done<'_>) {
    if let Some(output) = event.done() {
        let key = call_key(context, output);
        context.push_key(key);
    }
}

/// The namespace is resolved now, before a closing `}` can pop the binding.
fn defer_call(context: &mut MachineContext, event: &Done<'_>) {
    if let Some(output) = event.done() {
        context.drafts.method_candidate = Some(call_key(context, output));
    }
}

fn record_deferred(context: &mut MachineContext, _: &Done<'_>) {
    if let Some(key) = context.drafts.method_candidate.take() {
        context.push_key(key);
    }
}

fn drop_method(context: &mut MachineContext, _: &Done<'_>) {
    if let Some(key) = context.drafts.method_candidate.take() {
        context.release(key.line);
    }
}

impl Chart for Calls {
    type State = CallsState;
    type Context = MachineContext;
    type Output = ();
    type Child = Properties;

    const NAME: &'static str = "calls";
    const INITIAL: CallsState = CallsState::Idle;

    fn transitions(state: CallsState) -> &'static [Transition<Self>] {
        match state {
            CallsState::Idle => CALLS_IDLE,
            CallsState::Named => CALLS_NAMED,
            CallsState::Arguments => CALLS_ARGUMENTS,
            CallsState::Closed => CALLS_CLOSED,
        }
    }

    fn output(_state: CallsState, _context: &MachineContext) {}
}

// ============================================================
// Components
// ============================================================

/// `<T keyName="..." ns="..." defaultValue="...">children</T>`.
pub struct Components;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentsState {
    Idle,
    Attributes,
    Children,
}

type ComponentRule = Transition<Components>;

const COMPONENTS_IDLE: &[ComponentRule] = &[ComponentRule::on(Scope::TagName)
    .when(|context, event| {
        context.previous().is(Scope::TagOpen) && event.text() == context.syntax.component
    })
    .to(ComponentsState::Attributes)
    .run(&[
        Action::Assign(hold_line),
        Action::Invoke(|_: &MachineContext, event: &Done<'_>| {
            PropertiesContext::new(Capture::Attributes, COMPONENT_ALIASES).starting_at(event.line())
        }),
    ])];

const COMPONENTS_ATTRIBUTES: &[ComponentRule] = &[
    ComponentRule::done()
        .when(|_, event| event.done().is_some_and(PropertiesOutput::is_self_closing))
        .to(ComponentsState::Idle)
        .run(&[Action::Assign(finish_component)]),
    ComponentRule::done()
        .to(ComponentsState::Children)
        .run(&[Action::Invoke(|_: &MachineContext, event: &Done<'_>| {
            let attributes = event.done().cloned().unwrap_or_default();
            PropertiesContext::children_of(attributes, COMPONENT_ALIASES)
        })]),
    ComponentRule::any().run(&[Action::Forward]),
];

const COMPONENTS_CHILDREN: &[ComponentRule] = &[
    ComponentRule::done()
        .to(ComponentsState::Idle)
        .run(&[Action::Assign(finish_component)]),
    ComponentRule::any().run(&[Action::Forward]),
];

fn finish_component(context: &mut MachineContext, event: &Done<'_>) {
    if let Some(output) = event.done() {
        context.push_key(RawKey::from_output(output, KeySource::Global));
    }
}

impl Chart for Components {
    type State = ComponentsState;
    type Context = MachineContext;
    type Output = ();
    type Child = Properties;

    const NAME: &'static str = "components";
    const INITIAL: ComponentsState = ComponentsState::Idle;

    fn transitions(state: ComponentsState) -> &'static [Transition<Self>] {
        match state {
            ComponentsState::Idle => COMPONENTS_IDLE,
            ComponentsState::Attributes => COMPONENTS_ATTRIBUTES,
            ComponentsState::Children => COMPONENTS_CHILDREN,
        }
    }

    fn output(_state: ComponentsState, _context: &MachineContext) {}
}
