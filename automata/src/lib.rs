#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
//! ## This Documentation
//!
//! * Finite automata: [`DFADesign`], [`NFADesign`] and [`NFASimulation`]
//! * Pushdown automata: [`DPDADesign`]
//! * Patterns: [`Pattern`], [`parse_pattern`], [`compile_pattern`] and [`pattern`]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]
#![allow(unexpected_cfgs)]

pub use automata_engine::*;

/// Compile a pattern into Rust code.
///
/// Generates a struct implementing [`PatternMatcher`].
/// Instances of this struct match strings against the pattern that is specified.
///
/// Syntax: `$attrs $vis type $name = "pattern";`.
/// For example:
///
/// ```rust
/// use automata::*;
///
/// compile_pattern!(type Machine = "a(b|c)*");
/// assert!(Machine::new().accepts("abcb".chars()));
///
/// let mut m = Machine::new();
/// m.accept('b');
/// assert!(m.is_stuck());
/// ```
///
/// Syntax errors in the pattern are reported on the string literal.
///
/// # Supported Attributes
/// * `#[graph="$path"]` location to put a graphviz dot file representing the generated finite state machine. (only with the `dot` feature)
pub use automata_macros::compile_pattern;

/// Build a [`Pattern`] from its textual syntax, checked at compile time.
///
/// ```rust
/// use automata::*;
///
/// let p = pattern!("a*|b");
/// assert_eq!(p.to_string(), "a*|b");
/// assert!(p.matches("aaa".chars()));
/// ```
pub use automata_macros::pattern;
