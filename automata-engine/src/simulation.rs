use crate::dfa::{DFADesign, DFARulebook};
use crate::nfa::NFADesign;
use crate::rule::FARule;
use crate::state::{State, StateSet, Symbol};
use std::collections::VecDeque;

/// Runs an NFA design on whole sets of states at once, which is what turns it into a DFA.
#[derive(Debug, Clone, Copy)]
pub struct NFASimulation<'a, S, C> {
    nfa_design: &'a NFADesign<S, C>,
}

impl<'a, S: State, C: Symbol> NFASimulation<'a, S, C> {
    pub fn new(nfa_design: &'a NFADesign<S, C>) -> Self {
        Self { nfa_design }
    }

    /// Where the NFA goes from `states` on `character`. Always closed under free moves.
    pub fn next_state(&self, states: &StateSet<S>, character: &C) -> StateSet<S> {
        let mut nfa = self.nfa_design.to_nfa_from(states.clone());
        nfa.read_character(character);
        nfa.current_states()
    }

    /// One rule per alphabet symbol leaving `states`.
    pub fn rules_for(&self, states: &StateSet<S>) -> Vec<FARule<StateSet<S>, C>> {
        self.nfa_design
            .rulebook
            .alphabet()
            .into_iter()
            .map(|character| {
                let next_state = self.next_state(states, &character);
                FARule::new(states.clone(), character, next_state)
            })
            .collect()
    }

    /// Everything reachable from `states`, and the rules between them.
    ///
    /// Breadth-first over sets of states; each set is expanded once, so this stops once no
    /// new set shows up. There are finitely many subsets of the NFA's states.
    pub fn discover_states_and_rules(
        &self,
        states: StateSet<StateSet<S>>,
    ) -> (StateSet<StateSet<S>>, Vec<FARule<StateSet<S>, C>>) {
        let mut discovered = states;
        let mut work_list: VecDeque<StateSet<S>> = discovered.iter().cloned().collect();
        let mut rules = Vec::new();

        while let Some(state) = work_list.pop_front() {
            for rule in self.rules_for(&state) {
                if discovered.insert(rule.next_state.clone()) {
                    log::trace!("discovered {:?}", rule.next_state);
                    work_list.push_back(rule.next_state.clone());
                }
                rules.push(rule);
            }
        }

        (discovered, rules)
    }

    pub fn to_dfa_design(&self) -> DFADesign<StateSet<S>, C> {
        let start_state = self.nfa_design.to_nfa().current_states();
        let (states, rules) =
            self.discover_states_and_rules(StateSet::from([start_state.clone()]));
        log::debug!(
            "subset construction: {} states, {} rules",
            states.len(),
            rules.len()
        );

        let accept_states = states
            .into_iter()
            .filter(|state| self.nfa_design.to_nfa_from(state.clone()).accepting())
            .collect::<Vec<_>>();

        DFADesign::new(start_state, accept_states, DFARulebook::new(rules))
    }
}

impl<S: State, C: Symbol> NFADesign<S, C> {
    /// Shorthand for [`NFASimulation::to_dfa_design`].
    pub fn to_dfa_design(&self) -> DFADesign<StateSet<S>, C> {
        NFASimulation::new(self).to_dfa_design()
    }
}
