use crate::nfa::{NFADesign, NFARulebook};
use crate::rule::FARule;
use crate::state::{PatternState, StateArena, Symbol};
use std::fmt::{self, Debug, Display, Formatter};
use std::mem;
use std::rc::Rc;

/// A regular expression over symbols of type `C`.
#[derive(Hash, Clone, PartialEq, Eq)]
pub enum Pattern<C = char> {
    /// Matches only the empty string.
    Empty,
    Literal(C),
    Concatenate(Rc<Pattern<C>>, Rc<Pattern<C>>),
    Choose(Rc<Pattern<C>>, Rc<Pattern<C>>),
    Repeat(Rc<Pattern<C>>),
}

impl<C> Pattern<C> {
    pub fn empty() -> Self {
        Pattern::Empty
    }

    pub fn literal(character: C) -> Self {
        Pattern::Literal(character)
    }

    pub fn concatenate(first: Self, second: Self) -> Self {
        Pattern::Concatenate(Rc::new(first), Rc::new(second))
    }

    pub fn choose(first: Self, second: Self) -> Self {
        Pattern::Choose(Rc::new(first), Rc::new(second))
    }

    pub fn repeat(pattern: Self) -> Self {
        Pattern::Repeat(Rc::new(pattern))
    }

    /// How tightly this node binds when written out. Higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            Pattern::Empty | Pattern::Literal(_) => 3,
            Pattern::Repeat(_) => 2,
            Pattern::Concatenate(..) => 1,
            Pattern::Choose(..) => 0,
        }
    }
}

impl<C: Display> Pattern<C> {
    /// Writes this pattern, parenthesised if it binds looser than `outer_precedence`.
    pub fn bracket(&self, outer_precedence: u8) -> String {
        if self.precedence() < outer_precedence {
            format!("({self})")
        } else {
            self.to_string()
        }
    }
}

enum Render<'a, C> {
    Node(&'a Pattern<C>, u8),
    Text(&'static str),
}

impl<C: Display> Display for Pattern<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // explicit stack, patterns from the parser can be nested arbitrarily deep
        let mut work_list = vec![Render::Node(self, 0)];

        while let Some(item) = work_list.pop() {
            let (pattern, outer_precedence) = match item {
                Render::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Render::Node(pattern, outer_precedence) => (pattern, outer_precedence),
            };

            let precedence = pattern.precedence();
            let bracketed = precedence < outer_precedence;
            if bracketed {
                f.write_str("(")?;
                work_list.push(Render::Text(")"));
            }

            match pattern {
                Pattern::Empty => {}
                Pattern::Literal(c) => write!(f, "{c}")?,
                Pattern::Concatenate(first, second) => {
                    work_list.push(Render::Node(second, precedence));
                    work_list.push(Render::Node(first, precedence));
                }
                Pattern::Choose(first, second) => {
                    work_list.push(Render::Node(second, precedence));
                    work_list.push(Render::Text("|"));
                    work_list.push(Render::Node(first, precedence));
                }
                Pattern::Repeat(inner) => {
                    work_list.push(Render::Text("*"));
                    work_list.push(Render::Node(inner, precedence));
                }
            }
        }

        Ok(())
    }
}

impl<C: Display> Debug for Pattern<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "/{self}/")
    }
}

impl<C> Pattern<C> {
    /// Moves uniquely owned compound children into `into`, leaving empty patterns behind.
    fn detach_children(&mut self, into: &mut Vec<Rc<Self>>) {
        let mut detach = |child: &mut Rc<Self>| {
            if Rc::strong_count(child) == 1
                && !matches!(**child, Pattern::Empty | Pattern::Literal(_))
            {
                into.push(mem::replace(child, Rc::new(Pattern::Empty)));
            }
        };

        match self {
            Pattern::Empty | Pattern::Literal(_) => {}
            Pattern::Concatenate(first, second) | Pattern::Choose(first, second) => {
                detach(first);
                detach(second);
            }
            Pattern::Repeat(inner) => detach(inner),
        }
    }
}

impl<C> Drop for Pattern<C> {
    // unlink iteratively so deeply nested patterns don't overflow the call stack when dropped
    fn drop(&mut self) {
        let mut work_list = Vec::new();
        self.detach_children(&mut work_list);

        while let Some(child) = work_list.pop() {
            if let Ok(mut pattern) = Rc::try_unwrap(child) {
                pattern.detach_children(&mut work_list);
            }
        }
    }
}

enum Build<'a, C> {
    Enter(&'a Pattern<C>),
    Exit(&'a Pattern<C>),
}

impl<C: Symbol> Pattern<C> {
    /// Thompson construction: every node becomes a small NFA glued to its children's.
    ///
    /// Walks the tree in post-order with an explicit work list; children are built before
    /// their parent, first child first.
    pub fn to_nfa_design(&self) -> NFADesign<PatternState, C> {
        let mut arena = StateArena::new();
        let mut work_list = vec![Build::Enter(self)];
        let mut built: Vec<NFADesign<PatternState, C>> = Vec::new();

        while let Some(item) = work_list.pop() {
            match item {
                Build::Enter(pattern) => {
                    work_list.push(Build::Exit(pattern));
                    match pattern {
                        Pattern::Empty | Pattern::Literal(_) => {}
                        Pattern::Concatenate(first, second) | Pattern::Choose(first, second) => {
                            work_list.push(Build::Enter(second));
                            work_list.push(Build::Enter(first));
                        }
                        Pattern::Repeat(inner) => work_list.push(Build::Enter(inner)),
                    }
                }
                Build::Exit(pattern) => {
                    let design = pattern.combine(&mut arena, &mut built);
                    built.push(design);
                }
            }
        }

        built.pop().unwrap_or_else(|| Pattern::Empty.combine(&mut arena, &mut built))
    }

    /// Builds this node's NFA from the designs of its children, popped off `built`.
    fn combine(
        &self,
        arena: &mut StateArena,
        built: &mut Vec<NFADesign<PatternState, C>>,
    ) -> NFADesign<PatternState, C> {
        match self {
            Pattern::Empty => {
                let start_state = arena.fresh();
                NFADesign::new(start_state, [start_state], NFARulebook::new([]))
            }
            Pattern::Literal(character) => {
                let start_state = arena.fresh();
                let accept_state = arena.fresh();
                let rule = FARule::new(start_state, character.clone(), accept_state);
                NFADesign::new(start_state, [accept_state], NFARulebook::new([rule]))
            }
            Pattern::Concatenate(..) => {
                let (first, second) = pop_pair(arena, built);

                let mut rules = merge(first.rulebook.into_rules(), second.rulebook.into_rules());
                rules.extend(
                    first
                        .accept_states
                        .iter()
                        .map(|&state| FARule::free(state, second.start_state)),
                );

                NFADesign {
                    start_state: first.start_state,
                    accept_states: second.accept_states,
                    rulebook: NFARulebook::new(rules),
                }
            }
            Pattern::Choose(..) => {
                let (first, second) = pop_pair(arena, built);

                let start_state = arena.fresh();
                let mut rules = merge(first.rulebook.into_rules(), second.rulebook.into_rules());
                rules.push(FARule::free(start_state, first.start_state));
                rules.push(FARule::free(start_state, second.start_state));

                let (mut accept_states, smaller) =
                    if first.accept_states.len() >= second.accept_states.len() {
                        (first.accept_states, second.accept_states)
                    } else {
                        (second.accept_states, first.accept_states)
                    };
                accept_states.extend(smaller);

                NFADesign {
                    start_state,
                    accept_states,
                    rulebook: NFARulebook::new(rules),
                }
            }
            Pattern::Repeat(..) => {
                let inner = pop_design(arena, built);

                let start_state = arena.fresh();
                let mut rules = inner.rulebook.into_rules();
                rules.extend(
                    inner
                        .accept_states
                        .iter()
                        .map(|&state| FARule::free(state, inner.start_state)),
                );
                rules.push(FARule::free(start_state, inner.start_state));

                let mut accept_states = inner.accept_states;
                accept_states.insert(start_state);

                NFADesign {
                    start_state,
                    accept_states,
                    rulebook: NFARulebook::new(rules),
                }
            }
        }
    }

    pub fn matches(&self, input: impl IntoIterator<Item = C>) -> bool {
        self.to_nfa_design().accepts(input)
    }
}

// The work list always pushes a node's children before the node itself, so `built` holds
// their designs here. An empty stack would be a broken traversal; fall back to `Empty`.
fn pop_design<C: Symbol>(
    arena: &mut StateArena,
    built: &mut Vec<NFADesign<PatternState, C>>,
) -> NFADesign<PatternState, C> {
    match built.pop() {
        Some(design) => design,
        None => Pattern::Empty.combine(arena, built),
    }
}

/// Appends the shorter rule list to the longer one; rule order is irrelevant to an NFA.
fn merge<T>(first: Vec<T>, second: Vec<T>) -> Vec<T> {
    let (mut longer, shorter) = if first.len() >= second.len() {
        (first, second)
    } else {
        (second, first)
    };
    longer.extend(shorter);
    longer
}

fn pop_pair<C: Symbol>(
    arena: &mut StateArena,
    built: &mut Vec<NFADesign<PatternState, C>>,
) -> (NFADesign<PatternState, C>, NFADesign<PatternState, C>) {
    let second = pop_design(arena, built);
    let first = pop_design(arena, built);
    (first, second)
}
