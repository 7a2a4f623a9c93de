use crate::state::{fmt_symbol, State, Symbol};
use std::fmt::{self, Display, Formatter};

/// An edge of a finite automaton: in `state`, reading `character` leads to `next_state`.
///
/// A `character` of `None` is a free move (epsilon).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FARule<S, C> {
    pub state: S,
    pub character: Option<C>,
    pub next_state: S,
}

impl<S: State, C: Symbol> FARule<S, C> {
    /// `character` may be a symbol or `None` for a free move.
    pub fn new(state: S, character: impl Into<Option<C>>, next_state: S) -> Self {
        Self {
            state,
            character: character.into(),
            next_state,
        }
    }

    pub fn free(state: S, next_state: S) -> Self {
        Self {
            state,
            character: None,
            next_state,
        }
    }

    pub fn applies_to(&self, state: &S, character: Option<&C>) -> bool {
        &self.state == state && self.character.as_ref() == character
    }

    pub fn follow(&self) -> &S {
        &self.next_state
    }

    pub fn is_free(&self) -> bool {
        self.character.is_none()
    }
}

impl<S: State, C: Symbol> Display for FARule<S, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#<FARule {:?} --{}--> {:?}>",
            self.state,
            fmt_symbol(self.character.as_ref()),
            self.next_state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_to_matching_state_and_character() {
        let rule = FARule::new(1, 'a', 2);
        assert!(rule.applies_to(&1, Some(&'a')));
        assert!(!rule.applies_to(&1, Some(&'b')));
        assert!(!rule.applies_to(&2, Some(&'a')));
        assert!(!rule.applies_to(&1, None));
        assert_eq!(rule.follow(), &2);
    }

    #[test]
    fn free_moves_only_apply_to_epsilon() {
        let rule: FARule<u32, char> = FARule::free(1, 2);
        assert!(rule.is_free());
        assert!(rule.applies_to(&1, None));
        assert!(!rule.applies_to(&1, Some(&'a')));
        assert_eq!(rule.character, None);
    }

    #[test]
    fn display() {
        assert_eq!(FARule::new(1, 'a', 2).to_string(), "#<FARule 1 --'a'--> 2>");
        assert_eq!(FARule::<_, char>::free(1, 2).to_string(), "#<FARule 1 --ε--> 2>");
    }
}
