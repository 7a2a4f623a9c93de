use std::fmt::Debug;
use thiserror::Error;

mod compile;
mod dfa;
mod matcher;
mod nfa;
mod parse;
mod pattern;
mod pda;
mod rule;
mod simulation;
mod state;

#[cfg(feature = "rust-code-emitting")]
mod emit;

#[cfg(feature = "dot")]
mod dot;

pub use compile::{CompiledPattern, StateID};
pub use dfa::{DFADesign, DFARulebook, DFA};
pub use matcher::DynamicMatcher;
pub use nfa::{NFADesign, NFARulebook, NFA};
pub use parse::parse_pattern;
pub use pattern::Pattern;
pub use pda::{DPDADesign, DPDARulebook, PDAConfiguration, PDARule, PDAState, Stack, DPDA};
pub use rule::FARule;
pub use simulation::NFASimulation;
pub use state::{PatternState, State, StateArena, StateSet, Symbol};

pub trait PatternMatcher {
    type Alphabet;

    /// accepts the specified symbol.
    ///
    /// Once stuck, further symbols are ignored.
    fn accept(&mut self, inp: Self::Alphabet);
    fn accept_many(&mut self, inp: impl IntoIterator<Item = Self::Alphabet>) {
        for i in inp {
            self.accept(i);
        }
    }

    /// Returns true if the pattern accepts the input iterator
    fn accepts(&mut self, iter: impl IntoIterator<Item = Self::Alphabet>) -> bool {
        for i in iter {
            self.accept(i);
            if self.is_stuck() {
                return false;
            }
        }

        self.is_accepting()
    }

    fn is_accepting(&self) -> bool;
    /// True when no continuation of the input can be accepted any more.
    fn is_stuck(&self) -> bool;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("no rule applies to {state} reading {character}")]
    NoApplicableRule { state: String, character: String },
}

impl AutomatonError {
    pub(crate) fn no_applicable_rule(state: &impl Debug, character: Option<&impl Debug>) -> Self {
        Self::NoApplicableRule {
            state: format!("{state:?}"),
            character: state::fmt_symbol(character),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("group opened at {0} is never closed")]
    UnclosedGroup(usize),
    #[error("unmatched `)` at {0}")]
    UnmatchedClose(usize),
    #[error("nothing to repeat before `*` at {0}")]
    NothingToRepeat(usize),
    #[error("unknown escape `\\{0}` at {1}")]
    UnknownEscape(char, usize),
    #[error("`\\` at {0} escapes nothing")]
    DanglingEscape(usize),
}
