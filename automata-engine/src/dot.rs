use crate::rule::FARule;
use crate::state::{fmt_symbol, State, StateSet, Symbol};
use crate::{CompiledPattern, DFADesign, NFADesign};
use std::io;
use std::io::Write;

fn output_graph<S: State, C: Symbol>(
    w: &mut impl Write,
    start_state: &S,
    accept_states: &StateSet<S>,
    rules: &[FARule<S, C>],
) -> io::Result<()> {
    let mut states = StateSet::new();
    states.insert(start_state);
    states.extend(accept_states.iter());
    for rule in rules {
        states.insert(&rule.state);
        states.insert(&rule.next_state);
    }
    let ids = states.into_iter().zip(0..).collect::<Vec<_>>();
    let id = |state: &S| ids.iter().find(|(s, _)| *s == state).map(|(_, id)| *id);

    writeln!(w, "digraph {{")?;
    writeln!(w, "node[shape=point] start")?;

    for (state, src) in &ids {
        let attrs = if accept_states.contains(*state) {
            ", shape=doublecircle"
        } else {
            ""
        };
        let label = format!("{state:?}").replace('"', "\\\"");
        writeln!(w, "node[label=\"{label}\"{attrs}] id{src}")?;
    }

    if let Some(start) = id(start_state) {
        writeln!(w, "start -> id{start}")?;
    }

    for rule in rules {
        if let (Some(src), Some(tgt)) = (id(&rule.state), id(&rule.next_state)) {
            let sym = fmt_symbol(rule.character.as_ref()).replace('"', "\\\"");
            writeln!(w, "id{src} -> id{tgt} [label=\"{sym}\"]")?;
        }
    }

    writeln!(w, "}}")?;

    Ok(())
}

impl<S: State, C: Symbol> DFADesign<S, C> {
    pub fn output_dot(&self, w: &mut impl Write) -> io::Result<()> {
        output_graph(w, &self.start_state, &self.accept_states, self.rulebook.rules())
    }
}

impl<S: State, C: Symbol> NFADesign<S, C> {
    pub fn output_dot(&self, w: &mut impl Write) -> io::Result<()> {
        output_graph(w, &self.start_state, &self.accept_states, self.rulebook.rules())
    }
}

impl<C: Symbol> CompiledPattern<C> {
    pub fn output_dot(&self, w: &mut impl Write) -> io::Result<()> {
        self.design.output_dot(w)
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse_pattern, DFADesign, DFARulebook, FARule};

    #[test]
    fn dfa_graph() {
        let design = DFADesign::new(1, [2], DFARulebook::new([FARule::new(1, 'a', 2)]));
        let mut out = Vec::new();
        design.output_dot(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with("digraph {"));
        assert!(out.contains("node[label=\"2\", shape=doublecircle] id1"));
        assert!(out.contains("start -> id0"));
        assert!(out.contains("id0 -> id1 [label=\"'a'\"]"));
    }

    #[test]
    fn nfa_graph_shows_free_moves() {
        let design = parse_pattern("a*").unwrap().to_nfa_design();
        let mut out = Vec::new();
        design.output_dot(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("[label=\"ε\"]"));
    }
}
