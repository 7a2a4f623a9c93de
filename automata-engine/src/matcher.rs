//! Contains the [`DynamicMatcher`], which walks a [`CompiledPattern`] at runtime.
//! Code generated by `compile_pattern!` does the same walk with the table inlined.

use crate::compile::{CompiledPattern, StateID};
use crate::dfa::DFA;
use crate::state::Symbol;
use crate::PatternMatcher;

pub struct DynamicMatcher<'a, C> {
    compiled: &'a CompiledPattern<C>,
    dfa: DFA<'a, StateID, C>,
    stuck: bool,
}

impl<C: Symbol> CompiledPattern<C> {
    pub fn matcher(&self) -> DynamicMatcher<'_, C> {
        DynamicMatcher {
            compiled: self,
            dfa: self.design.to_dfa(),
            stuck: false,
        }
    }
}

impl<C: Symbol> DynamicMatcher<'_, C> {
    pub fn current_state(&self) -> Option<StateID> {
        (!self.stuck).then(|| *self.dfa.current_state())
    }
}

impl<C: Symbol> PatternMatcher for DynamicMatcher<'_, C> {
    type Alphabet = C;

    fn accept(&mut self, inp: C) {
        if self.stuck {
            return;
        }
        // symbols outside the pattern's alphabet have no rule
        if self.dfa.read_character(&inp).is_err() {
            self.stuck = true;
        }
    }

    fn is_accepting(&self) -> bool {
        !self.stuck && self.dfa.accepting()
    }

    fn is_stuck(&self) -> bool {
        self.stuck || self.compiled.is_dead(*self.dfa.current_state())
    }
}
