use automata::{
    AutomatonError, DFADesign, DFARulebook, FARule, NFADesign, NFARulebook, NFASimulation, StateSet,
};
use pretty_assertions::assert_eq;

#[ctor::ctor]
fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn contains_ab() -> DFADesign<u32, char> {
    let rulebook = DFARulebook::new([
        FARule::new(1, 'a', 2),
        FARule::new(1, 'b', 1),
        FARule::new(2, 'a', 2),
        FARule::new(2, 'b', 3),
        FARule::new(3, 'a', 3),
        FARule::new(3, 'b', 3),
    ]);
    DFADesign::new(1, [3], rulebook)
}

fn free_moves() -> NFADesign<u32, char> {
    let rulebook = NFARulebook::new([
        FARule::new(1, 'a', 1),
        FARule::new(1, 'a', 2),
        FARule::free(1, 2),
        FARule::new(2, 'b', 3),
        FARule::new(3, 'b', 1),
        FARule::free(3, 2),
    ]);
    NFADesign::new(1, [3], rulebook)
}

#[test]
fn test_dfa() {
    let design = contains_ab();

    assert!(!design.accepts("a".chars()));
    assert!(!design.accepts("baa".chars()));
    assert!(design.accepts("baba".chars()));
}

#[test]
fn test_dfa_missing_rule() {
    let design = contains_ab();

    assert!(matches!(
        design.try_accepts("abc".chars()),
        Err(AutomatonError::NoApplicableRule { .. })
    ));
    assert!(!design.accepts("abc".chars()));
}

#[test]
fn test_nfa_with_free_moves() {
    let design = free_moves();
    let mut nfa = design.to_nfa();
    assert_eq!(nfa.current_states(), StateSet::from([1, 2]));

    nfa.read_character(&'b');
    assert_eq!(nfa.current_states(), StateSet::from([2, 3]));
    assert!(nfa.accepting());
}

#[test]
fn test_subset_construction() {
    let nfa_design = free_moves();
    let simulation = NFASimulation::new(&nfa_design);
    let (states, rules) = simulation.discover_states_and_rules(StateSet::from([StateSet::from([1, 2])]));
    assert_eq!(states.len(), 4);
    assert_eq!(rules.len(), 8);

    let dfa_design = simulation.to_dfa_design();
    assert!(!dfa_design.accepts("aaa".chars()));
    assert!(dfa_design.accepts("aab".chars()));
    assert!(dfa_design.accepts("bbbabb".chars()));

    for input in ["", "a", "b", "ab", "bb", "abba", "bbbb", "babab"] {
        assert_eq!(
            nfa_design.accepts(input.chars()),
            dfa_design.accepts(input.chars()),
            "{input:?}"
        );
    }
}

#[test]
fn test_number_states() {
    let dfa_design = free_moves().to_dfa_design().number_states();
    assert_eq!(dfa_design.start_state, 0);
    assert_eq!(dfa_design.states(), (0..4).collect::<StateSet<_>>());
    assert!(dfa_design.accepts("aab".chars()));
}
