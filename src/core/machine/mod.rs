//! Generic statechart engine.
//!
//! A chart is an explicit state enum plus a static transition table per state. The
//! engine feeds it tokens:
//!
//! - candidates whose trigger matches the event are tried in declaration order, the
//!   first with a passing guard (or no guard) is taken
//! - `Any` wildcards are only tried when no specific candidate applied
//! - a transition with a target re-enters that state, dropping any invoked child
//! - actions then run in order: `Assign` mutates the context, `Invoke` starts a child
//!   chart with its own context, `Forward` hands the token to the child and `Replay`
//!   re-dispatches the token to the (possibly new) current state
//!
//! When a forwarded token drives the child into a final state, the parent immediately
//! receives a `Done` event carrying the child's output.
//!
//! Whole-file grammars are made of several [`Region`]s sharing one context and stepped
//! together; invoked children run as self-contained [`Machine`]s.

use std::fmt::Debug;

use tracing::{trace, warn};

use crate::core::tokenizer::{Scope, Token};
use crate::error::{ExtractError, Result};

/// Maximum nesting of re-entrant dispatches for a single token.
pub const MAX_DISPATCH_DEPTH: usize = 8;

pub trait Chart: Sized + 'static {
    type State: Copy + Eq + Debug + 'static;
    type Context: 'static;
    type Output: 'static;
    /// Chart started by `Invoke` actions. Charts that never invoke use [`Leaf`].
    type Child: Chart;

    const NAME: &'static str;
    const INITIAL: Self::State;

    fn transitions(state: Self::State) -> &'static [Transition<Self>];

    fn is_final(_state: Self::State) -> bool {
        false
    }

    /// Output delivered to the parent once a final state is reached.
    fn output(state: Self::State, context: &Self::Context) -> Self::Output;
}

/// Output of the chart's child, as carried by `Done` events.
pub type DoneData<M> = <<M as Chart>::Child as Chart>::Output;

/// Chart that does nothing; used as the child of charts that never invoke one.
pub enum Leaf {}

impl Chart for Leaf {
    type State = ();
    type Context = ();
    type Output = ();
    type Child = Leaf;

    const NAME: &'static str = "leaf";
    const INITIAL: () = ();

    fn transitions(_state: ()) -> &'static [Transition<Self>] {
        &[]
    }

    fn output(_state: (), _context: &()) {}
}

// ============================================================
// Events and transitions
// ============================================================

#[derive(Debug)]
pub enum Event<'t, D> {
    Token(&'t Token),
    /// The invoked child reached a final state.
    Done(D),
}

impl<D> Event<'_, D> {
    pub fn token(&self) -> Option<&Token> {
        match self {
            Event::Token(token) => Some(token),
            Event::Done(_) => None,
        }
    }

    pub fn done(&self) -> Option<&D> {
        match self {
            Event::Done(data) => Some(data),
            Event::Token(_) => None,
        }
    }

    /// Text of the token, or `""` for `Done` events.
    pub fn text(&self) -> &str {
        self.token().map_or("", |token| token.text.as_str())
    }

    pub fn line(&self) -> usize {
        self.token().map_or(0, |token| token.line)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    Scope(Scope),
    OneOf(&'static [Scope]),
    Done,
    /// Wildcard for tokens; tried after every specific candidate.
    Any,
}

impl Trigger {
    fn matches<D>(&self, event: &Event<'_, D>) -> bool {
        match (self, event) {
            (Trigger::Scope(scope), Event::Token(token)) => token.scope == *scope,
            (Trigger::OneOf(scopes), Event::Token(token)) => scopes.contains(&token.scope),
            (Trigger::Done, Event::Done(_)) => true,
            (Trigger::Any, Event::Token(_)) => true,
            _ => false,
        }
    }
}

pub type Guard<M> = fn(&<M as Chart>::Context, &Event<'_, DoneData<M>>) -> bool;

pub enum Action<M: Chart> {
    Assign(fn(&mut M::Context, &Event<'_, DoneData<M>>)),
    Invoke(fn(&M::Context, &Event<'_, DoneData<M>>) -> <M::Child as Chart>::Context),
    Forward,
    Replay,
}

pub struct Transition<M: Chart> {
    pub on: Trigger,
    pub guard: Option<Guard<M>>,
    pub target: Option<M::State>,
    pub actions: &'static [Action<M>],
}

impl<M: Chart> Clone for Transition<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Chart> Copy for Transition<M> {}

impl<M: Chart> Transition<M> {
    pub const fn on(scope: Scope) -> Self {
        Self::with_trigger(Trigger::Scope(scope))
    }

    pub const fn one_of(scopes: &'static [Scope]) -> Self {
        Self::with_trigger(Trigger::OneOf(scopes))
    }

    pub const fn done() -> Self {
        Self::with_trigger(Trigger::Done)
    }

    pub const fn any() -> Self {
        Self::with_trigger(Trigger::Any)
    }

    const fn with_trigger(on: Trigger) -> Self {
        Self {
            on,
            guard: None,
            target: None,
            actions: &[],
        }
    }

    pub const fn when(self, guard: Guard<M>) -> Self {
        Self {
            on: self.on,
            guard: Some(guard),
            target: self.target,
            actions: self.actions,
        }
    }

    pub const fn to(self, state: M::State) -> Self {
        Self {
            on: self.on,
            guard: self.guard,
            target: Some(state),
            actions: self.actions,
        }
    }

    pub const fn run(self, actions: &'static [Action<M>]) -> Self {
        Self {
            on: self.on,
            guard: self.guard,
            target: self.target,
            actions,
        }
    }

    fn accepts(&self, context: &M::Context, event: &Event<'_, DoneData<M>>) -> bool {
        self.on.matches(event) && self.guard.is_none_or(|guard| guard(context, event))
    }
}

// ============================================================
// Interpreter
// ============================================================

/// A running child chart, seen only through the output it delivers.
trait Child<D> {
    fn step(&mut self, token: &Token) -> Result<Option<D>>;
}

impl<M: Chart> Child<M::Output> for Machine<M> {
    fn step(&mut self, token: &Token) -> Result<Option<M::Output>> {
        Machine::step(self, token)
    }
}

/// Active state of one chart plus its invoked child. The context lives outside, so
/// that several regions can share it.
pub struct Region<M: Chart> {
    state: M::State,
    child: Option<Box<dyn Child<DoneData<M>>>>,
    /// Line of the token that invoked the current child.
    invoked_at: usize,
}

impl<M: Chart> Default for Region<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Chart> Region<M> {
    pub fn new() -> Self {
        Self {
            state: M::INITIAL,
            child: None,
            invoked_at: 0,
        }
    }

    pub fn state(&self) -> M::State {
        self.state
    }

    pub fn is_final(&self) -> bool {
        M::is_final(self.state)
    }

    /// Line where the still-running child was invoked, if any.
    pub fn open_since(&self) -> Option<usize> {
        self.child.as_ref().map(|_| self.invoked_at)
    }

    pub fn step(&mut self, context: &mut M::Context, token: &Token) -> Result<()> {
        self.dispatch(context, Event::Token(token), 0, token.line)
    }

    fn dispatch(
        &mut self,
        context: &mut M::Context,
        event: Event<'_, DoneData<M>>,
        depth: usize,
        line: usize,
    ) -> Result<()> {
        if depth > MAX_DISPATCH_DEPTH {
            warn!(chart = M::NAME, line, depth, "runaway statechart dispatch");
            return Err(ExtractError::RunawayDispatch { line, depth });
        }

        let Some(transition) = self.select(context, &event) else {
            return Ok(());
        };

        if let Some(target) = transition.target {
            trace!(chart = M::NAME, from = ?self.state, to = ?target, line, "transition");
            self.state = target;
            self.child = None;
        }

        for action in transition.actions {
            match action {
                Action::Assign(assign) => assign(context, &event),
                Action::Invoke(invoke) => {
                    let child_context = invoke(context, &event);
                    self.child = Some(Box::new(Machine::<M::Child>::new(child_context)));
                    self.invoked_at = line;
                    trace!(chart = M::NAME, child = <M::Child as Chart>::NAME, line, "invoke");
                }
                Action::Forward => {
                    let (Event::Token(token), Some(child)) = (&event, self.child.as_mut()) else {
                        continue;
                    };
                    if let Some(output) = child.step(token)? {
                        trace!(chart = M::NAME, child = <M::Child as Chart>::NAME, line, "done");
                        self.child = None;
                        self.dispatch(context, Event::Done(output), depth + 1, line)?;
                    }
                }
                Action::Replay => {
                    if let Event::Token(token) = event {
                        self.dispatch(context, Event::Token(token), depth + 1, line)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn select(
        &self,
        context: &M::Context,
        event: &Event<'_, DoneData<M>>,
    ) -> Option<&'static Transition<M>> {
        let table = M::transitions(self.state);
        table
            .iter()
            .filter(|transition| !matches!(transition.on, Trigger::Any))
            .find(|transition| transition.accepts(context, event))
            .or_else(|| {
                table
                    .iter()
                    .filter(|transition| matches!(transition.on, Trigger::Any))
                    .find(|transition| transition.accepts(context, event))
            })
    }
}

/// A chart together with the context it owns.
pub struct Machine<M: Chart> {
    region: Region<M>,
    context: M::Context,
}

impl<M: Chart> Machine<M> {
    pub fn new(context: M::Context) -> Self {
        Self {
            region: Region::new(),
            context,
        }
    }

    /// Feed one token; returns the output once a final state is reached.
    pub fn step(&mut self, token: &Token) -> Result<Option<M::Output>> {
        self.region.step(&mut self.context, token)?;
        Ok(self
            .region
            .is_final()
            .then(|| M::output(self.region.state(), &self.context)))
    }

    pub fn state(&self) -> M::State {
        self.region.state()
    }

    pub fn context(&self) -> &M::Context {
        &self.context
    }
}

// ============================================================
// Regions sharing a context
// ============================================================

/// Object-safe view of a region, so a dialect can hold regions of different charts.
pub trait Step<C> {
    fn name(&self) -> &'static str;
    fn step(&mut self, context: &mut C, token: &Token) -> Result<()>;
    fn open_since(&self) -> Option<usize>;
}

impl<M: Chart> Step<M::Context> for Region<M> {
    fn name(&self) -> &'static str {
        M::NAME
    }

    fn step(&mut self, context: &mut M::Context, token: &Token) -> Result<()> {
        Region::step(self, context, token)
    }

    fn open_since(&self) -> Option<usize> {
        Region::open_since(self)
    }
}

/// Parallel regions stepped in declaration order over one shared context.
pub struct Parallel<C> {
    regions: Vec<Box<dyn Step<C>>>,
}

impl<C> Parallel<C> {
    pub fn new(regions: Vec<Box<dyn Step<C>>>) -> Self {
        Self { regions }
    }

    pub fn step(&mut self, context: &mut C, token: &Token) -> Result<()> {
        for region in &mut self.regions {
            region.step(context, token)?;
        }
        Ok(())
    }

    /// End of input: fails when a region is still mid-capture.
    pub fn finish(&self) -> Result<()> {
        match self
            .regions
            .iter()
            .filter_map(|region| region.open_since().map(|line| (region.name(), line)))
            .min_by_key(|(_, line)| *line)
        {
            Some((name, line)) => {
                warn!(region = name, line, "input ended inside an open construct");
                Err(ExtractError::UnterminatedConstruct { line })
            }
            None => Ok(()),
        }
    }
}
