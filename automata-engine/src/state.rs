use std::collections::BTreeSet;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;

/// Anything that can label a state of an automaton.
///
/// Blanket implemented: integers, strings, [`PatternState`]s and sets of states all qualify.
pub trait State: Clone + Eq + Ord + Hash + Debug {}
impl<T: Clone + Eq + Ord + Hash + Debug> State for T {}

/// Anything that can be read as input (or kept on a pushdown stack).
///
/// Epsilon is never a symbol: places that allow free moves take an `Option<C>`
/// where `None` is the empty move.
pub trait Symbol: Clone + Eq + Ord + Hash + Debug {}
impl<T: Clone + Eq + Ord + Hash + Debug> Symbol for T {}

/// A canonical set of states. Sorted, so two equal sets compare and hash the same,
/// which lets a set of states act as a single state of a DFA.
pub type StateSet<S> = BTreeSet<S>;

/// A state allocated while compiling a [`Pattern`](crate::Pattern).
///
/// These are indices handed out by a [`StateArena`], one arena per compilation.
/// They have their own type so they can never collide with states a caller labels by hand.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternState(usize);

impl PatternState {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Debug for PatternState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl Display for PatternState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Hands out fresh [`PatternState`]s.
#[derive(Debug, Default)]
pub struct StateArena {
    allocated: usize,
}

impl StateArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> PatternState {
        let state = PatternState(self.allocated);
        self.allocated += 1;
        state
    }

    /// Number of states allocated so far.
    pub fn len(&self) -> usize {
        self.allocated
    }

    pub fn is_empty(&self) -> bool {
        self.allocated == 0
    }
}

pub(crate) fn fmt_symbol<C: Debug>(character: Option<&C>) -> String {
    match character {
        Some(c) => format!("{c:?}"),
        None => "ε".to_string(),
    }
}
