//! Deterministic pushdown automata.

use crate::state::{fmt_symbol, State, StateSet, Symbol};
use crate::AutomatonError;
use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;

#[derive(Debug)]
struct Node<C> {
    value: C,
    next: Option<Rc<Node<C>>>,
}

/// An immutable stack. `push` and `pop` return new stacks that share their tails
/// with the original, so configurations can hold on to old stacks for free.
pub struct Stack<C> {
    head: Option<Rc<Node<C>>>,
    len: usize,
}

impl<C> Stack<C> {
    /// The first item of `contents` ends up on top.
    pub fn new(contents: impl IntoIterator<Item = C>) -> Self {
        let contents: Vec<C> = contents.into_iter().collect();
        contents
            .into_iter()
            .rev()
            .fold(Self::empty(), |stack, value| stack.push(value))
    }

    pub fn empty() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn push(&self, value: C) -> Self {
        Self {
            head: Some(Rc::new(Node {
                value,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Popping an empty stack gives an empty stack.
    pub fn pop(&self) -> Self {
        match &self.head {
            Some(node) => Self {
                head: node.next.clone(),
                len: self.len - 1,
            },
            None => Self::empty(),
        }
    }

    pub fn top(&self) -> Option<&C> {
        self.head.as_deref().map(|node| &node.value)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// From the top down.
    pub fn iter(&self) -> impl Iterator<Item = &C> + '_ {
        let mut node = self.head.as_deref();
        std::iter::from_fn(move || {
            let current = node?;
            node = current.next.as_deref();
            Some(&current.value)
        })
    }
}

impl<C> Clone for Stack<C> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<C> Default for Stack<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C: PartialEq> PartialEq for Stack<C> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<C: Eq> Eq for Stack<C> {}

impl<C> Drop for Stack<C> {
    // unlink iteratively so long stacks don't overflow the call stack when dropped
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(node) = head {
            match Rc::try_unwrap(node) {
                Ok(mut node) => head = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

impl<C: Debug> Debug for Stack<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<C: Display> Display for Stack<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#<Stack (")?;
        if let Some(top) = self.top() {
            write!(f, "{top}")?;
        }
        write!(f, ")")?;
        for value in self.iter().skip(1) {
            write!(f, "{value}")?;
        }
        write!(f, ">")
    }
}

/// The control state of a PDA. `Stuck` is shared by every PDA and no rule ever mentions it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PDAState<S> {
    Live(S),
    Stuck,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PDAConfiguration<S, C> {
    pub state: PDAState<S>,
    pub stack: Stack<C>,
}

impl<S: State, C: Symbol> PDAConfiguration<S, C> {
    pub fn new(state: S, stack: Stack<C>) -> Self {
        Self {
            state: PDAState::Live(state),
            stack,
        }
    }

    /// The same stack, in the stuck state.
    pub fn stuck(&self) -> Self {
        Self {
            state: PDAState::Stuck,
            stack: self.stack.clone(),
        }
    }

    pub fn is_stuck(&self) -> bool {
        self.state == PDAState::Stuck
    }
}

/// In `state` with `pop_character` on top, reading `character` (or nothing, for `None`),
/// go to `next_state` and replace the top of the stack with `push_characters`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PDARule<S, C> {
    pub state: S,
    pub character: Option<C>,
    pub next_state: S,
    pub pop_character: C,
    pub push_characters: Vec<C>,
}

impl<S: State, C: Symbol> PDARule<S, C> {
    pub fn new(
        state: S,
        character: impl Into<Option<C>>,
        next_state: S,
        pop_character: C,
        push_characters: impl IntoIterator<Item = C>,
    ) -> Self {
        Self {
            state,
            character: character.into(),
            next_state,
            pop_character,
            push_characters: push_characters.into_iter().collect(),
        }
    }

    /// A rule that reads no input.
    pub fn free(
        state: S,
        next_state: S,
        pop_character: C,
        push_characters: impl IntoIterator<Item = C>,
    ) -> Self {
        Self::new(state, None, next_state, pop_character, push_characters)
    }

    pub fn applies_to(&self, configuration: &PDAConfiguration<S, C>, character: Option<&C>) -> bool {
        matches!(&configuration.state, PDAState::Live(state) if state == &self.state)
            && configuration.stack.top() == Some(&self.pop_character)
            && self.character.as_ref() == character
    }

    pub fn follow(&self, configuration: &PDAConfiguration<S, C>) -> PDAConfiguration<S, C> {
        PDAConfiguration::new(self.next_state.clone(), self.next_stack(configuration))
    }

    /// Pops the top, then pushes `push_characters` so that the first one ends up on top.
    pub fn next_stack(&self, configuration: &PDAConfiguration<S, C>) -> Stack<C> {
        self.push_characters
            .iter()
            .rev()
            .fold(configuration.stack.pop(), |stack, character| {
                stack.push(character.clone())
            })
    }
}

impl<S: State, C: Symbol> Display for PDARule<S, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#<PDARule {:?} --{}; {:?}/{:?}--> {:?}>",
            self.state,
            fmt_symbol(self.character.as_ref()),
            self.pop_character,
            self.push_characters,
            self.next_state
        )
    }
}

/// Rules of a deterministic PDA. At most one rule may apply to any configuration and input;
/// the first one found is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DPDARulebook<S, C> {
    rules: Vec<PDARule<S, C>>,
}

impl<S: State, C: Symbol> DPDARulebook<S, C> {
    pub fn new(rules: impl IntoIterator<Item = PDARule<S, C>>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn rules(&self) -> &[PDARule<S, C>] {
        &self.rules
    }

    pub fn rule_for(
        &self,
        configuration: &PDAConfiguration<S, C>,
        character: Option<&C>,
    ) -> Option<&PDARule<S, C>> {
        self.rules
            .iter()
            .find(|rule| rule.applies_to(configuration, character))
    }

    pub fn applies_to(&self, configuration: &PDAConfiguration<S, C>, character: Option<&C>) -> bool {
        self.rule_for(configuration, character).is_some()
    }

    pub fn next_configuration(
        &self,
        configuration: &PDAConfiguration<S, C>,
        character: Option<&C>,
    ) -> Result<PDAConfiguration<S, C>, AutomatonError> {
        self.rule_for(configuration, character)
            .map(|rule| rule.follow(configuration))
            .ok_or_else(|| AutomatonError::no_applicable_rule(&configuration.state, character))
    }

    /// Follows free moves until none applies.
    ///
    /// Only terminates if the rules have no cycle of free moves, which a deterministic
    /// rulebook author has to make sure of.
    pub fn follow_free_moves(&self, configuration: PDAConfiguration<S, C>) -> PDAConfiguration<S, C> {
        let mut configuration = configuration;
        while let Some(rule) = self.rule_for(&configuration, None) {
            configuration = rule.follow(&configuration);
        }
        configuration
    }
}

/// A running deterministic PDA. Like [`NFA`](crate::NFA), free moves are applied whenever
/// the configuration is looked at.
#[derive(Debug, Clone)]
pub struct DPDA<'a, S, C> {
    current_configuration: PDAConfiguration<S, C>,
    accept_states: &'a StateSet<S>,
    rulebook: &'a DPDARulebook<S, C>,
}

impl<'a, S: State, C: Symbol> DPDA<'a, S, C> {
    pub fn new(
        current_configuration: PDAConfiguration<S, C>,
        accept_states: &'a StateSet<S>,
        rulebook: &'a DPDARulebook<S, C>,
    ) -> Self {
        Self {
            current_configuration,
            accept_states,
            rulebook,
        }
    }

    pub fn current_configuration(&self) -> PDAConfiguration<S, C> {
        self.rulebook
            .follow_free_moves(self.current_configuration.clone())
    }

    pub fn accepting(&self) -> bool {
        match self.current_configuration().state {
            PDAState::Live(state) => self.accept_states.contains(&state),
            PDAState::Stuck => false,
        }
    }

    pub fn is_stuck(&self) -> bool {
        self.current_configuration.is_stuck()
    }

    fn next_configuration(&self, character: &C) -> PDAConfiguration<S, C> {
        let configuration = self.current_configuration();
        match self.rulebook.next_configuration(&configuration, Some(character)) {
            Ok(next) => next,
            Err(err) => {
                log::debug!("stuck: {err}");
                configuration.stuck()
            }
        }
    }

    pub fn read_character(&mut self, character: &C) {
        self.current_configuration = self.next_configuration(character);
    }

    /// Once stuck, the rest of the input is ignored.
    pub fn read_string(&mut self, input: impl IntoIterator<Item = C>) {
        for character in input {
            if self.is_stuck() {
                break;
            }
            self.read_character(&character);
        }
    }
}

/// Blueprint of a deterministic PDA. Runs start with only `bottom_character` on the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DPDADesign<S, C> {
    pub start_state: S,
    pub bottom_character: C,
    pub accept_states: StateSet<S>,
    pub rulebook: DPDARulebook<S, C>,
}

impl<S: State, C: Symbol> DPDADesign<S, C> {
    pub fn new(
        start_state: S,
        bottom_character: C,
        accept_states: impl IntoIterator<Item = S>,
        rulebook: DPDARulebook<S, C>,
    ) -> Self {
        Self {
            start_state,
            bottom_character,
            accept_states: accept_states.into_iter().collect(),
            rulebook,
        }
    }

    pub fn to_dpda(&self) -> DPDA<'_, S, C> {
        let start_stack = Stack::new([self.bottom_character.clone()]);
        let start_configuration = PDAConfiguration::new(self.start_state.clone(), start_stack);
        DPDA::new(start_configuration, &self.accept_states, &self.rulebook)
    }

    pub fn accepts(&self, input: impl IntoIterator<Item = C>) -> bool {
        let mut dpda = self.to_dpda();
        dpda.read_string(input);
        dpda.accepting() && !dpda.is_stuck()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn balanced() -> DPDARulebook<u32, char> {
        DPDARulebook::new([
            PDARule::new(1, '(', 2, '$', ['b', '$']),
            PDARule::new(2, '(', 2, 'b', ['b', 'b']),
            PDARule::new(2, ')', 2, 'b', []),
            PDARule::free(2, 1, '$', ['$']),
        ])
    }

    fn stack(contents: &str) -> Stack<char> {
        Stack::new(contents.chars())
    }

    #[test]
    fn stack_operations() {
        let stack = stack("abcde");
        assert_eq!(stack.top(), Some(&'a'));
        assert_eq!(stack.pop().pop().top(), Some(&'c'));
        assert_eq!(stack.push('x').push('y').top(), Some(&'y'));
        assert_eq!(stack.push('x').push('y').pop().top(), Some(&'x'));
        assert_eq!(stack.len(), 5);
        assert_eq!(stack.to_string(), "#<Stack (a)bcde>");
    }

    #[test]
    fn stack_is_persistent() {
        let base = stack("ab");
        let pushed = base.push('x');
        let popped = base.pop();
        assert_eq!(base, stack("ab"));
        assert_eq!(pushed, stack("xab"));
        assert_eq!(popped, stack("b"));
        assert!(Stack::<char>::empty().pop().is_empty());
    }

    #[test]
    fn deep_stacks_drop() {
        let mut stack = Stack::empty();
        for i in 0..200_000u32 {
            stack = stack.push(i);
        }
        assert_eq!(stack.len(), 200_000);
        drop(stack);
    }

    #[test]
    fn rule_applies_to() {
        let rule = PDARule::new(1, '(', 2, '$', ['b', '$']);
        let configuration = PDAConfiguration::new(1, stack("$"));
        assert!(rule.applies_to(&configuration, Some(&'(')));
        assert!(!rule.applies_to(&configuration, Some(&')')));
        assert!(!rule.applies_to(&configuration, None));
        assert!(!rule.applies_to(&configuration.stuck(), Some(&'(')));
        assert!(!rule.applies_to(&PDAConfiguration::new(1, stack("b$")), Some(&'(')));
    }

    #[test]
    fn rule_follow_replaces_top() {
        let rule = PDARule::new(1, '(', 2, '$', ['b', '$']);
        let configuration = PDAConfiguration::new(1, stack("$"));
        assert_eq!(
            rule.follow(&configuration),
            PDAConfiguration::new(2, stack("b$"))
        );
    }

    #[test]
    fn rulebook_next_configuration() {
        let rulebook = balanced();
        let configuration = PDAConfiguration::new(1, stack("$"));
        let configuration = rulebook.next_configuration(&configuration, Some(&'(')).unwrap();
        assert_eq!(configuration, PDAConfiguration::new(2, stack("b$")));
        let configuration = rulebook.next_configuration(&configuration, Some(&'(')).unwrap();
        assert_eq!(configuration, PDAConfiguration::new(2, stack("bb$")));
        let configuration = rulebook.next_configuration(&configuration, Some(&')')).unwrap();
        assert_eq!(configuration, PDAConfiguration::new(2, stack("b$")));

        assert!(rulebook
            .next_configuration(&PDAConfiguration::new(1, stack("$")), Some(&')'))
            .is_err());
    }

    #[test]
    fn rulebook_follow_free_moves() {
        let rulebook = balanced();
        assert_eq!(
            rulebook.follow_free_moves(PDAConfiguration::new(2, stack("$"))),
            PDAConfiguration::new(1, stack("$"))
        );
        assert_eq!(
            rulebook.follow_free_moves(PDAConfiguration::new(2, stack("b$"))),
            PDAConfiguration::new(2, stack("b$"))
        );
    }

    #[test]
    fn dpda_reads() {
        let rulebook = balanced();
        let accept = StateSet::from([1]);
        let mut dpda = DPDA::new(PDAConfiguration::new(1, stack("$")), &accept, &rulebook);
        assert!(dpda.accepting());

        dpda.read_string("(()(".chars());
        assert!(!dpda.accepting());
        assert_eq!(
            dpda.current_configuration(),
            PDAConfiguration::new(2, stack("bb$"))
        );

        dpda.read_string("))()".chars());
        assert!(dpda.accepting());
        assert_eq!(
            dpda.current_configuration(),
            PDAConfiguration::new(1, stack("$"))
        );
    }

    #[test]
    fn design_accepts() {
        let design = DPDADesign::new(1, '$', [1], balanced());
        assert!(design.accepts("(((())))".chars()));
        assert!(design.accepts("(((((((((())))))))))".chars()));
        assert!(design.accepts("()(())((()))(()(()))".chars()));
        assert!(!design.accepts("(()(()(()()(()()))()".chars()));
        assert!(!design.accepts("(()".chars()));
        assert!(design.accepts("".chars()));
    }

    #[test]
    fn gets_stuck_instead_of_failing() {
        let design = DPDADesign::new(1, '$', [1], balanced());
        let mut dpda = design.to_dpda();
        dpda.read_string("())".chars());

        assert!(dpda.is_stuck());
        assert!(!dpda.accepting());
        assert_eq!(dpda.current_configuration().state, PDAState::Stuck);
        assert_eq!(dpda.current_configuration().stack, stack("$"));
        assert!(!design.accepts("())".chars()));

        dpda.read_string("()".chars());
        assert!(dpda.is_stuck());
        assert!(!dpda.accepting());
    }

    #[test]
    fn display() {
        assert_eq!(
            PDARule::new(1, '(', 2, '$', ['b', '$']).to_string(),
            "#<PDARule 1 --'('; '$'/['b', '$']--> 2>"
        );
    }

    proptest! {
        #[test]
        fn stack_laws(contents in "[a-z]{0,8}", x in any::<char>()) {
            let stack = Stack::new(contents.chars());
            prop_assert_eq!(stack.push(x).pop(), stack.clone());
            prop_assert_eq!(stack.push(x).pop().top().copied(), stack.top().copied());
            prop_assert_eq!(stack.push(x).top().copied(), Some(x));
            prop_assert_eq!(stack.push(x).len(), stack.len() + 1);
        }
    }
}
