//! Dialect grammars.
//!
//! A dialect is a fixed set of statechart regions stepped in parallel over one
//! [`MachineContext`]. The comment region always runs first so the directive slot is
//! up to date before any other region records an entry.
//!
//! ## Module Structure
//!
//! - `shared`: block depth, translation hooks, `t()` calls and `<T>` components
//! - `react`: `.js`/`.jsx`/`.ts`/`.tsx` files, adds `createElement(T, ...)`
//! - `vue`: single-file components, adds sections, `v-t` and the Options-API check
//! - `svelte`: `.svelte` files
//! - `angular`: `.html` templates with the `translate` pipe and the `t` directive

mod angular;
mod react;
mod shared;
mod svelte;
mod vue;

use enum_dispatch::enum_dispatch;

use crate::core::context::{MachineContext, Section};
use crate::core::machine::{Parallel, Step};
use crate::core::tokenizer::{GrammarId, Scope, Token};

pub use angular::Angular;
pub use react::React;
pub use svelte::Svelte;
pub use vue::Vue;

// ============================================================
// Call syntax
// ============================================================

/// Where a recognized call takes its namespace from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSource {
    /// Needs the nearest enclosing translation hook.
    Bound,
    /// Works without a hook (`$t`, `this.$t`).
    Global,
    /// Vue template `t()`, bound to the script's hook.
    Setup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// `name(`, not preceded by `.` or `function`.
    Bare,
    /// `object.name(`.
    Object(&'static str),
    /// `this.name(`.
    This,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Within {
    Anywhere,
    Script,
    Markup,
}

impl Within {
    fn contains(&self, section: Section) -> bool {
        match self {
            Within::Anywhere => true,
            Within::Script => section.is_script(),
            Within::Markup => section == Section::Markup,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CallPattern {
    pub receiver: Receiver,
    pub name: &'static str,
    pub source: CallSource,
    pub within: Within,
}

impl CallPattern {
    pub const fn bare(name: &'static str, source: CallSource) -> Self {
        Self {
            receiver: Receiver::Bare,
            name,
            source,
            within: Within::Anywhere,
        }
    }

    pub const fn method(receiver: Receiver, name: &'static str, source: CallSource) -> Self {
        Self {
            receiver,
            name,
            source,
            within: Within::Anywhere,
        }
    }

    pub const fn within(self, within: Within) -> Self {
        Self { within, ..self }
    }

    /// Does the function name `token` start this call?
    pub fn matches(&self, context: &MachineContext, token: &Token) -> bool {
        if token.text != self.name || !self.within.contains(context.section) {
            return false;
        }
        let previous = context.previous();
        let before = context.before_previous();
        match self.receiver {
            Receiver::Bare => {
                !previous.is(Scope::Accessor)
                    && !(previous.is(Scope::Keyword) && previous.text == "function")
            }
            Receiver::Object(object) => {
                previous.is(Scope::Accessor) && before.is(Scope::ObjectName) && before.text == object
            }
            Receiver::This => previous.is(Scope::Accessor) && before.is(Scope::ThisKeyword),
        }
    }
}

/// Call shapes a dialect recognizes.
#[derive(Debug)]
pub struct Syntax {
    pub calls: &'static [CallPattern],
    pub hooks: &'static [CallPattern],
    /// Name of the translation component.
    pub component: &'static str,
}

impl Syntax {
    pub fn call(&self, context: &MachineContext, token: &Token) -> Option<&'static CallPattern> {
        self.calls.iter().find(|call| call.matches(context, token))
    }

    pub fn is_hook(&self, context: &MachineContext, token: &Token) -> bool {
        self.hooks.iter().any(|hook| hook.matches(context, token))
    }
}

const HOOKS: &[CallPattern] = &[
    CallPattern::bare("useTranslate", CallSource::Bound),
    CallPattern::bare("getTranslate", CallSource::Bound),
];

pub static REACT_SYNTAX: Syntax = Syntax {
    calls: &[CallPattern::bare("t", CallSource::Bound)],
    hooks: HOOKS,
    component: "T",
};

pub static VUE_SYNTAX: Syntax = Syntax {
    calls: &[
        CallPattern::bare("t", CallSource::Bound).within(Within::Script),
        CallPattern::method(Receiver::Object("t"), "value", CallSource::Bound).within(Within::Script),
        CallPattern::method(Receiver::This, "$t", CallSource::Global).within(Within::Script),
        CallPattern::bare("$t", CallSource::Global).within(Within::Markup),
        CallPattern::bare("t", CallSource::Setup).within(Within::Markup),
    ],
    hooks: HOOKS,
    component: "T",
};

pub static SVELTE_SYNTAX: Syntax = Syntax {
    calls: &[
        CallPattern::bare("$t", CallSource::Bound).within(Within::Script),
        CallPattern::bare("$t", CallSource::Setup).within(Within::Markup),
    ],
    hooks: HOOKS,
    component: "T",
};

pub static ANGULAR_SYNTAX: Syntax = Syntax {
    calls: &[],
    hooks: &[],
    component: "",
};

// ============================================================
// Dialects
// ============================================================

#[enum_dispatch]
pub trait DialectGrammar {
    fn syntax(&self) -> &'static Syntax;

    /// Section the first token belongs to.
    fn initial_section(&self) -> Section;

    /// Regions in stepping order, comment region first.
    fn regions(&self) -> Vec<Box<dyn Step<MachineContext>>>;
}

#[enum_dispatch(DialectGrammar)]
#[derive(Debug, Clone, Copy)]
pub enum Dialect {
    React(React),
    Vue(Vue),
    Svelte(Svelte),
    Angular(Angular),
}

impl Dialect {
    pub fn for_grammar(grammar: GrammarId) -> Self {
        match grammar {
            GrammarId::TypeScript | GrammarId::Tsx => Dialect::React(React),
            GrammarId::Vue => Dialect::Vue(Vue),
            GrammarId::Svelte => Dialect::Svelte(Svelte),
            GrammarId::Angular => Dialect::Angular(Angular),
        }
    }

    /// Fresh regions and context for one file.
    pub fn start(&self) -> (Parallel<MachineContext>, MachineContext) {
        (
            Parallel::new(self.regions()),
            MachineContext::new(self.syntax(), self.initial_section()),
        )
    }
}

#[cfg(test)]
mod tests;
