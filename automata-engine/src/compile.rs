use crate::dfa::DFADesign;
use crate::state::{StateSet, Symbol};
use crate::Pattern;
use std::fmt::{self, Debug, Formatter};

pub type StateID = usize;

/// A pattern turned into a DFA with dense state numbers, ready to drive a matcher or to be
/// emitted as code.
#[derive(Clone)]
pub struct CompiledPattern<C = char> {
    pub pattern: Pattern<C>,
    pub design: DFADesign<StateID, C>,
    /// States that can never reach an accept state again.
    pub dead_states: StateSet<StateID>,
}

impl<C: Symbol> CompiledPattern<C> {
    pub fn initial(&self) -> StateID {
        self.design.start_state
    }

    pub fn states(&self) -> StateSet<StateID> {
        self.design.states()
    }

    pub fn is_accepting(&self, state: StateID) -> bool {
        self.design.accept_states.contains(&state)
    }

    pub fn is_dead(&self, state: StateID) -> bool {
        self.dead_states.contains(&state)
    }

    /// The outgoing edges of `state`, in rulebook order.
    pub fn transitions(&self, state: StateID) -> impl Iterator<Item = (&C, StateID)> + '_ {
        self.design
            .rulebook
            .rules()
            .iter()
            .filter(move |rule| rule.state == state)
            .filter_map(|rule| Some((rule.character.as_ref()?, rule.next_state)))
    }
}

impl<C: Debug> Debug for CompiledPattern<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPattern")
            .field("design", &self.design)
            .field("dead_states", &self.dead_states)
            .finish_non_exhaustive()
    }
}

impl<C: Symbol> Pattern<C> {
    /// Compile to an NFA, run the subset construction and number the resulting states.
    pub fn compile(&self) -> CompiledPattern<C> {
        let design = self.to_nfa_design().to_dfa_design().number_states();
        let dead_states = design.dead_states();
        log::debug!(
            "compiled pattern into {} states ({} dead)",
            design.states().len(),
            dead_states.len()
        );

        CompiledPattern {
            pattern: self.clone(),
            design,
            dead_states,
        }
    }
}
