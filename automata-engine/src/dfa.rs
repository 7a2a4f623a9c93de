use crate::rule::FARule;
use crate::state::{State, StateSet, Symbol};
use crate::AutomatonError;
use std::collections::{BTreeMap, VecDeque};

/// An ordered list of rules, at most one per (state, symbol).
///
/// Determinism is the author's responsibility: lookups take the first matching rule and
/// never check for a second one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DFARulebook<S, C> {
    rules: Vec<FARule<S, C>>,
}

impl<S: State, C: Symbol> DFARulebook<S, C> {
    pub fn new(rules: impl IntoIterator<Item = FARule<S, C>>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn rules(&self) -> &[FARule<S, C>] {
        &self.rules
    }

    pub fn rule_for(&self, state: &S, character: &C) -> Option<&FARule<S, C>> {
        self.rules
            .iter()
            .find(|rule| rule.applies_to(state, Some(character)))
    }

    pub fn next_state(&self, state: &S, character: &C) -> Result<S, AutomatonError> {
        self.rule_for(state, character)
            .map(|rule| rule.follow().clone())
            .ok_or_else(|| AutomatonError::no_applicable_rule(state, Some(character)))
    }
}

/// A running DFA. Borrows its accept states and rules from whoever built it,
/// usually a [`DFADesign`].
#[derive(Debug, Clone)]
pub struct DFA<'a, S, C> {
    current_state: S,
    accept_states: &'a StateSet<S>,
    rulebook: &'a DFARulebook<S, C>,
}

impl<'a, S: State, C: Symbol> DFA<'a, S, C> {
    pub fn new(
        current_state: S,
        accept_states: &'a StateSet<S>,
        rulebook: &'a DFARulebook<S, C>,
    ) -> Self {
        Self {
            current_state,
            accept_states,
            rulebook,
        }
    }

    pub fn current_state(&self) -> &S {
        &self.current_state
    }

    pub fn accepting(&self) -> bool {
        self.accept_states.contains(&self.current_state)
    }

    /// On error the machine stays where it was.
    pub fn read_character(&mut self, character: &C) -> Result<(), AutomatonError> {
        self.current_state = self.rulebook.next_state(&self.current_state, character)?;
        Ok(())
    }

    pub fn read_string(
        &mut self,
        input: impl IntoIterator<Item = C>,
    ) -> Result<(), AutomatonError> {
        for character in input {
            self.read_character(&character)?;
        }
        Ok(())
    }
}

/// Blueprint of a DFA: start state, accept states and rules.
/// Every call to [`accepts`](Self::accepts) runs a fresh machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DFADesign<S, C> {
    pub start_state: S,
    pub accept_states: StateSet<S>,
    pub rulebook: DFARulebook<S, C>,
}

impl<S: State, C: Symbol> DFADesign<S, C> {
    pub fn new(
        start_state: S,
        accept_states: impl IntoIterator<Item = S>,
        rulebook: DFARulebook<S, C>,
    ) -> Self {
        Self {
            start_state,
            accept_states: accept_states.into_iter().collect(),
            rulebook,
        }
    }

    pub fn to_dfa(&self) -> DFA<'_, S, C> {
        DFA::new(self.start_state.clone(), &self.accept_states, &self.rulebook)
    }

    /// Runs the input and reports acceptance, or the first symbol that had no rule.
    pub fn try_accepts(&self, input: impl IntoIterator<Item = C>) -> Result<bool, AutomatonError> {
        let mut dfa = self.to_dfa();
        dfa.read_string(input)?;
        Ok(dfa.accepting())
    }

    /// Like [`try_accepts`](Self::try_accepts), but a missing rule counts as rejection.
    ///
    /// This treats the design as a partial DFA: a symbol with no rule sends the run to an
    /// implicit dead state. Callers that rely on a total rulebook, and want a missing rule
    /// reported instead of swallowed, should use [`try_accepts`](Self::try_accepts).
    pub fn accepts(&self, input: impl IntoIterator<Item = C>) -> bool {
        self.try_accepts(input).unwrap_or_else(|err| {
            log::debug!("rejecting input: {err}");
            false
        })
    }

    /// All states mentioned by the design, in order.
    pub fn states(&self) -> StateSet<S> {
        let mut states = StateSet::new();
        states.insert(self.start_state.clone());
        states.extend(self.accept_states.iter().cloned());
        for rule in self.rulebook.rules() {
            states.insert(rule.state.clone());
            states.insert(rule.next_state.clone());
        }
        states
    }

    /// States from which no accept state can be reached any more.
    pub fn dead_states(&self) -> StateSet<S> {
        let mut reverse: BTreeMap<&S, Vec<&S>> = BTreeMap::new();
        for rule in self.rulebook.rules() {
            reverse.entry(&rule.next_state).or_default().push(&rule.state);
        }

        let mut live = StateSet::new();
        let mut work_list: VecDeque<&S> = self.accept_states.iter().collect();
        while let Some(state) = work_list.pop_front() {
            if live.insert(state.clone()) {
                work_list.extend(reverse.get(state).into_iter().flatten().copied());
            }
        }

        self.states()
            .into_iter()
            .filter(|state| !live.contains(state))
            .collect()
    }

    /// Renames the states reachable from the start to `0..n`, in breadth-first order.
    /// The start state becomes `0`.
    pub fn number_states(&self) -> DFADesign<usize, C> {
        let mut ids: BTreeMap<&S, usize> = BTreeMap::new();
        let mut work_list = VecDeque::new();
        let mut rules = Vec::new();

        ids.insert(&self.start_state, 0);
        work_list.push_back(&self.start_state);

        while let Some(state) = work_list.pop_front() {
            let source = ids[state];
            for rule in self.rulebook.rules().iter().filter(|rule| &rule.state == state) {
                let next = ids.len();
                let target = *ids.entry(rule.follow()).or_insert_with(|| {
                    work_list.push_back(rule.follow());
                    next
                });
                rules.push(FARule {
                    state: source,
                    character: rule.character.clone(),
                    next_state: target,
                });
            }
        }

        let accept_states = self
            .accept_states
            .iter()
            .filter_map(|state| ids.get(state).copied())
            .collect::<Vec<_>>();

        DFADesign::new(0, accept_states, DFARulebook::new(rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rulebook() -> DFARulebook<u32, char> {
        DFARulebook::new([
            FARule::new(1, 'a', 2),
            FARule::new(1, 'b', 1),
            FARule::new(2, 'a', 2),
            FARule::new(2, 'b', 3),
            FARule::new(3, 'a', 3),
            FARule::new(3, 'b', 3),
        ])
    }

    #[test]
    fn next_state() {
        let rulebook = rulebook();
        assert_eq!(rulebook.next_state(&1, &'a'), Ok(2));
        assert_eq!(rulebook.next_state(&1, &'b'), Ok(1));
        assert_eq!(rulebook.next_state(&2, &'b'), Ok(3));
    }

    #[test]
    fn missing_rule_is_an_error() {
        let rulebook = rulebook();
        assert!(matches!(
            rulebook.next_state(&1, &'c'),
            Err(AutomatonError::NoApplicableRule { .. })
        ));
    }

    #[test]
    fn first_matching_rule_wins() {
        let rulebook = DFARulebook::new([FARule::new(1, 'a', 2), FARule::new(1, 'a', 3)]);
        assert_eq!(rulebook.next_state(&1, &'a'), Ok(2));
    }

    #[test]
    fn accepting() {
        let rulebook = rulebook();
        let one_and_three = StateSet::from([1, 3]);
        let three = StateSet::from([3]);
        assert!(DFA::new(1, &one_and_three, &rulebook).accepting());
        assert!(!DFA::new(1, &three, &rulebook).accepting());
    }

    #[test]
    fn read_character_by_character() {
        let rulebook = rulebook();
        let accept = StateSet::from([3]);
        let mut dfa = DFA::new(1, &accept, &rulebook);
        assert!(!dfa.accepting());

        dfa.read_character(&'b').unwrap();
        assert_eq!(dfa.current_state(), &1);
        assert!(!dfa.accepting());

        for _ in 0..3 {
            dfa.read_character(&'a').unwrap();
        }
        assert_eq!(dfa.current_state(), &2);
        assert!(!dfa.accepting());

        dfa.read_character(&'b').unwrap();
        assert_eq!(dfa.current_state(), &3);
        assert!(dfa.accepting());
    }

    #[test]
    fn read_string() {
        let rulebook = rulebook();
        let accept = StateSet::from([3]);
        let mut dfa = DFA::new(1, &accept, &rulebook);
        dfa.read_string("baaab".chars()).unwrap();
        assert!(dfa.accepting());
    }

    #[test]
    fn design_accepts() {
        let design = DFADesign::new(1, [3], rulebook());
        assert!(!design.accepts("a".chars()));
        assert!(!design.accepts("baa".chars()));
        assert!(design.accepts("baba".chars()));
        assert!(!design.accepts("".chars()));
    }

    #[test]
    fn design_is_reusable() {
        let design = DFADesign::new(1, [3], rulebook());
        let mut first = design.to_dfa();
        let mut second = design.to_dfa();
        first.read_string("ab".chars()).unwrap();
        second.read_string("b".chars()).unwrap();
        assert!(first.accepting());
        assert!(!second.accepting());
    }

    #[test]
    fn partial_rulebooks_reject() {
        let design = DFADesign::new(1, [2], DFARulebook::new([FARule::new(1, 'a', 2)]));
        assert!(design.accepts("a".chars()));
        assert!(!design.accepts("ab".chars()));
        assert!(design.try_accepts("ab".chars()).is_err());
        assert_eq!(design.try_accepts("a".chars()), Ok(true));
    }

    #[test]
    fn dead_states() {
        let design = DFADesign::new(
            0,
            [1],
            DFARulebook::new([
                FARule::new(0, 'a', 1),
                FARule::new(0, 'b', 2),
                FARule::new(1, 'a', 1),
                FARule::new(2, 'a', 2),
            ]),
        );
        assert_eq!(design.dead_states(), StateSet::from([2]));
    }

    #[test]
    fn number_states_keeps_language() {
        let design = DFADesign::new('x', ['z'], DFARulebook::new([
            FARule::new('x', 'a', 'y'),
            FARule::new('y', 'b', 'z'),
            FARule::new('z', 'a', 'y'),
            FARule::new('q', 'a', 'x'),
        ]));
        let numbered = design.number_states();

        assert_eq!(numbered.start_state, 0);
        assert_eq!(numbered.states(), StateSet::from([0, 1, 2]));
        for input in ["", "ab", "abab", "aba", "b"] {
            assert_eq!(numbered.accepts(input.chars()), design.accepts(input.chars()));
        }
    }

    const ALPHABET: [char; 3] = ['a', 'b', 'c'];

    /// A total transition table over `ALPHABET` for `n` states, and which states accept.
    fn total_table() -> impl Strategy<Value = (usize, Vec<usize>, Vec<bool>)> {
        (1usize..6).prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec(0..n, n * ALPHABET.len()),
                prop::collection::vec(any::<bool>(), n),
            )
        })
    }

    proptest! {
        #[test]
        fn accepts_matches_walking_the_table(
            table in total_table(),
            input in "[abc]{0,12}",
        ) {
            let (n, targets, accepting) = table;
            let rules = (0..n).flat_map(|state| {
                ALPHABET
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| FARule::new(state, c, targets[state * ALPHABET.len() + i]))
                    .collect::<Vec<_>>()
            });
            let accept_states = (0..n).filter(|&state| accepting[state]);
            let design = DFADesign::new(0, accept_states, DFARulebook::new(rules));

            let mut state = 0;
            for c in input.chars() {
                let i = ALPHABET.iter().position(|&a| a == c).unwrap();
                state = targets[state * ALPHABET.len() + i];
            }

            prop_assert_eq!(design.try_accepts(input.chars()), Ok(accepting[state]));
            prop_assert_eq!(design.accepts(input.chars()), accepting[state]);
        }
    }
}
