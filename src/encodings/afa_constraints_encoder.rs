use super::{AfaVarMap, SuffixTrie};
use crate::{
    sat::{Literal, SatSolver},
    traces::Sample,
};

/// Encodes the existence of an automaton of a given size classifying a sample into CNF clauses.
///
/// The clauses state that the run variables of each suffix node are exactly the values of the transition formulas
/// on the run variables of the next node, that the initial state accepts the positive traces and rejects the negative ones.
/// The suffix trie is built once and shared by the encodings of all sizes.
///
/// # Example
///
/// ```
/// # use limeltl::encodings::AfaConstraintsEncoder;
/// # use limeltl::sat::{self, SatSolver};
/// # use limeltl::traces::{TraceEncoder, Vocabulary};
/// let vocabulary = Vocabulary::new_with_symbols(&["p"]).unwrap();
/// let sample = TraceEncoder::new(&vocabulary)
///     .encode_sample(&[vec![vec!["p"]]], &[vec![vec!["p"], vec!["p"]]])
///     .unwrap();
/// let encoder = AfaConstraintsEncoder::new(&sample);
/// let mut solver = sat::default_solver();
/// encoder.encode_constraints(1, solver.as_mut());
/// assert!(solver.solve().unwrap_model().is_none());
/// let mut solver = sat::default_solver();
/// encoder.encode_constraints(2, solver.as_mut());
/// assert!(solver.solve().unwrap_model().is_some());
/// ```
pub struct AfaConstraintsEncoder<'a> {
    sample: &'a Sample,
    trie: SuffixTrie,
}

impl<'a> AfaConstraintsEncoder<'a> {
    /// Builds an encoder for the sample.
    pub fn new(sample: &'a Sample) -> Self {
        Self {
            sample,
            trie: SuffixTrie::new(sample),
        }
    }

    /// Returns the sample this encoder works on.
    pub fn sample(&self) -> &Sample {
        self.sample
    }

    /// Returns the suffix trie of the sample.
    pub fn suffix_trie(&self) -> &SuffixTrie {
        &self.trie
    }

    /// Returns the variable map used for an automaton size.
    pub fn var_map(&self, n_states: usize) -> AfaVarMap {
        AfaVarMap::new(
            n_states,
            self.trie.n_letter_classes(),
            self.trie.n_nodes(),
        )
    }

    /// Adds the clauses for an automaton size to the solver and returns the variable map.
    ///
    /// The same size always produces the same clauses, in the same order.
    pub fn encode_constraints(&self, n_states: usize, solver: &mut dyn SatSolver) -> AfaVarMap {
        let var_map = self.var_map(n_states);
        solver.reserve(var_map.n_vars());
        self.trie
            .iter_non_empty()
            .for_each(|(node, class, next)| {
                (0..n_states).for_each(|q| {
                    encode_run_constraints(&var_map, solver, node, class, next, q)
                })
            });
        self.trie
            .positive_nodes()
            .iter()
            .for_each(|n| solver.add_clause(vec![var_map.run(*n, 0)]));
        self.trie
            .negative_nodes()
            .iter()
            .for_each(|n| solver.add_clause(vec![var_map.run(*n, 0).negate()]));
        var_map
    }
}

fn encode_run_constraints(
    var_map: &AfaVarMap,
    solver: &mut dyn SatSolver,
    node: usize,
    class: usize,
    next: usize,
    state: usize,
) {
    let n_states = var_map.n_states();
    let run = var_map.run(node, state);
    let universal = var_map.universal(state);
    let mut existential_support_cl = vec![run.negate(), universal];
    let mut universal_support_cl = vec![run, universal.negate()];
    for j in 0..n_states {
        let edge = var_map.edge(state, class, j);
        let next_run = var_map.run(next, j);
        let support = var_map.support(node, state, j);
        solver.add_clause(vec![universal, edge.negate(), next_run.negate(), run]);
        solver.add_clause(vec![run.negate(), universal.negate(), edge.negate(), next_run]);
        encode_support_constraints(solver, support, universal, edge, next_run);
        existential_support_cl.push(support);
        universal_support_cl.push(support);
    }
    solver.add_clause(existential_support_cl);
    solver.add_clause(universal_support_cl);
}

fn encode_support_constraints(
    solver: &mut dyn SatSolver,
    support: Literal,
    universal: Literal,
    edge: Literal,
    next_run: Literal,
) {
    solver.add_clause(vec![support.negate(), edge]);
    solver.add_clause(vec![support.negate(), universal, next_run]);
    solver.add_clause(vec![support.negate(), universal.negate(), next_run.negate()]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        sat::{default_solver, BufferedSatSolver, SolvingResult},
        traces::{TraceEncoder, Vocabulary},
    };
    use std::{cell::RefCell, io::Read, rc::Rc};

    fn sample(symbols: &[&str], pos: &[Vec<Vec<&str>>], neg: &[Vec<Vec<&str>>]) -> Sample {
        let vocabulary = Vocabulary::new_with_symbols(symbols).unwrap();
        TraceEncoder::new(&vocabulary)
            .encode_sample(pos, neg)
            .unwrap()
    }

    fn is_sat(sample: &Sample, n_states: usize) -> bool {
        let mut solver = default_solver();
        AfaConstraintsEncoder::new(sample).encode_constraints(n_states, solver.as_mut());
        solver.solve().unwrap_model().is_some()
    }

    #[test]
    fn test_contradiction_is_unsat() {
        let s = sample(&["p"], &[vec![vec!["p"]]], &[vec![vec!["p"]]]);
        assert!((1..=3).all(|k| !is_sat(&s, k)));
    }

    #[test]
    fn test_empty_trace_constraints() {
        let s = sample(&["p"], &[vec![]], &[]);
        let encoder = AfaConstraintsEncoder::new(&s);
        let mut solver = default_solver();
        let var_map = encoder.encode_constraints(1, solver.as_mut());
        assert_eq!(2, var_map.n_vars());
        let model = solver.solve().unwrap_model().unwrap();
        assert!(model.is_true(var_map.accepting(0)));
    }

    #[test]
    fn test_parity_needs_two_states() {
        let s = sample(
            &["p"],
            &[vec![], vec![vec!["p"]; 2], vec![vec!["p"]; 4]],
            &[vec![vec!["p"]], vec![vec!["p"]; 3]],
        );
        assert!(!is_sat(&s, 1));
        assert!(is_sat(&s, 2));
    }

    fn dimacs(encoder: &AfaConstraintsEncoder, n_states: usize) -> String {
        let captured = Rc::new(RefCell::new(String::new()));
        let captured_by_solver = Rc::clone(&captured);
        let mut solver = BufferedSatSolver::new(Box::new(move |mut r| {
            r.read_to_string(&mut captured_by_solver.borrow_mut())?;
            Ok(Box::new("s UNSATISFIABLE\n".as_bytes()))
        }));
        encoder.encode_constraints(n_states, &mut solver);
        assert_eq!(SolvingResult::Unsatisfiable, solver.solve());
        let dimacs = captured.borrow().clone();
        dimacs
    }

    #[test]
    fn test_deterministic_clauses() {
        let s = sample(
            &["p", "q"],
            &[vec![vec!["p"], vec!["q"]]],
            &[vec![vec!["q"]], vec![]],
        );
        let d1 = dimacs(&AfaConstraintsEncoder::new(&s), 2);
        let d2 = dimacs(&AfaConstraintsEncoder::new(&s), 2);
        assert!(d1.starts_with("p cnf "));
        assert_eq!(d1, d2);
        assert_ne!(d1, dimacs(&AfaConstraintsEncoder::new(&s), 3));
    }

    #[test]
    fn test_clause_count() {
        let s = sample(&["p"], &[vec![vec!["p"]]], &[vec![]]);
        let encoder = AfaConstraintsEncoder::new(&s);
        let mut solver = BufferedSatSolver::new(Box::new(|_| {
            Ok(Box::new("s UNSATISFIABLE\n".as_bytes()))
        }));
        let var_map = encoder.encode_constraints(2, &mut solver);
        // one node, two states: (2 + 3) clauses per successor, plus 2 support clauses, per state; plus 2 trace units
        assert_eq!(2 * (2 * 5 + 2) + 2, solver.n_clauses());
        assert_eq!(var_map.n_vars(), solver.n_vars());
    }
}
