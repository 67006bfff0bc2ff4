//! Svelte: `getTranslate()` in the script, `$t(...)` and `<T>` anywhere.
//!
//! A `$t` in markup takes the namespace of the script's `getTranslate()`, even when
//! the markup comes first.

use crate::core::comments::Comments;
use crate::core::context::{MachineContext, Section};
use crate::core::machine::Step;

use super::shared::{BlockDepth, Calls, Components, Hooks, Sections, region};
use super::{DialectGrammar, SVELTE_SYNTAX, Syntax};

#[derive(Debug, Clone, Copy)]
pub struct Svelte;

impl DialectGrammar for Svelte {
    fn syntax(&self) -> &'static Syntax {
        &SVELTE_SYNTAX
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
        ]
    }
}
