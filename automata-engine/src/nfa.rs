use crate::rule::FARule;
use crate::state::{State, StateSet, Symbol};

/// All the rules of an NFA. Unlike a [`DFARulebook`](crate::DFARulebook), every matching
/// rule is followed, so order does not matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NFARulebook<S, C> {
    rules: Vec<FARule<S, C>>,
}

impl<S: State, C: Symbol> NFARulebook<S, C> {
    pub fn new(rules: impl IntoIterator<Item = FARule<S, C>>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn rules(&self) -> &[FARule<S, C>] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<FARule<S, C>> {
        self.rules
    }

    pub fn rules_for<'a>(
        &'a self,
        state: &'a S,
        character: Option<&'a C>,
    ) -> impl Iterator<Item = &'a FARule<S, C>> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.applies_to(state, character))
    }

    pub fn follow_rules_for<'a>(
        &'a self,
        state: &'a S,
        character: Option<&'a C>,
    ) -> impl Iterator<Item = &'a S> + 'a {
        self.rules_for(state, character).map(FARule::follow)
    }

    /// Every state reachable from `states` by one rule reading `character`.
    /// An empty result is fine: all branches died.
    pub fn next_states(&self, states: &StateSet<S>, character: Option<&C>) -> StateSet<S> {
        states
            .iter()
            .flat_map(|state| self.follow_rules_for(state, character))
            .cloned()
            .collect()
    }

    /// The epsilon-closure of `states`.
    ///
    /// Grows the set until a fixed point. Terminates because the set only grows and every
    /// member is a state mentioned by some rule or by the input.
    pub fn follow_free_moves(&self, states: &StateSet<S>) -> StateSet<S> {
        let mut closure = states.clone();
        let mut work_list: Vec<&S> = states.iter().collect();

        while let Some(state) = work_list.pop() {
            for next in self.follow_rules_for(state, None) {
                if closure.insert(next.clone()) {
                    log::trace!("free move {state:?} -> {next:?}");
                    work_list.push(next);
                }
            }
        }

        closure
    }

    /// Every real symbol some rule reads.
    pub fn alphabet(&self) -> StateSet<C> {
        self.rules
            .iter()
            .filter_map(|rule| rule.character.clone())
            .collect()
    }
}

/// A running NFA. The stored set may lack epsilon-reachable states,
/// but [`current_states`](Self::current_states) never does.
#[derive(Debug, Clone)]
pub struct NFA<'a, S, C> {
    current_states: StateSet<S>,
    accept_states: &'a StateSet<S>,
    rulebook: &'a NFARulebook<S, C>,
}

impl<'a, S: State, C: Symbol> NFA<'a, S, C> {
    pub fn new(
        current_states: StateSet<S>,
        accept_states: &'a StateSet<S>,
        rulebook: &'a NFARulebook<S, C>,
    ) -> Self {
        Self {
            current_states,
            accept_states,
            rulebook,
        }
    }

    pub fn current_states(&self) -> StateSet<S> {
        self.rulebook.follow_free_moves(&self.current_states)
    }

    pub fn accepting(&self) -> bool {
        !self.current_states().is_disjoint(self.accept_states)
    }

    pub fn read_character(&mut self, character: &C) {
        self.current_states = self
            .rulebook
            .next_states(&self.current_states(), Some(character));
    }

    pub fn read_string(&mut self, input: impl IntoIterator<Item = C>) {
        for character in input {
            self.read_character(&character);
        }
    }
}

/// Blueprint of an NFA. Every call to [`accepts`](Self::accepts) runs a fresh machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NFADesign<S, C> {
    pub start_state: S,
    pub accept_states: StateSet<S>,
    pub rulebook: NFARulebook<S, C>,
}

impl<S: State, C: Symbol> NFADesign<S, C> {
    pub fn new(
        start_state: S,
        accept_states: impl IntoIterator<Item = S>,
        rulebook: NFARulebook<S, C>,
    ) -> Self {
        Self {
            start_state,
            accept_states: accept_states.into_iter().collect(),
            rulebook,
        }
    }

    pub fn to_nfa(&self) -> NFA<'_, S, C> {
        self.to_nfa_from(StateSet::from([self.start_state.clone()]))
    }

    /// A machine that starts in `current_states` instead of the start state.
    pub fn to_nfa_from(&self, current_states: StateSet<S>) -> NFA<'_, S, C> {
        NFA::new(current_states, &self.accept_states, &self.rulebook)
    }

    pub fn accepts(&self, input: impl IntoIterator<Item = C>) -> bool {
        let mut nfa = self.to_nfa();
        nfa.read_string(input);
        nfa.accepting()
    }
}
