//! Alternating Finite Automata: data structure, run semantics, symbolic rendering and LTLf translation.

mod automaton;
pub use automaton::Afa;
pub use automaton::StateMode;
pub use automaton::Successors;

mod formula;
pub use formula::SymbolicFormula;

mod ltl;
pub use ltl::LtlFormula;
pub use ltl::LtlNode;

#[cfg(test)]
pub(crate) fn all_traces(width: usize, max_len: usize) -> Vec<crate::traces::Trace> {
    use crate::traces::{Letter, Trace};
    let letters = (0..1usize << width)
        .map(|bits| {
            let values = (0..width).map(|i| bits & (1 << i) != 0).collect::<Vec<bool>>();
            Letter::new_with_values(&values)
        })
        .collect::<Vec<Letter>>();
    let mut words: Vec<Vec<Letter>> = vec![vec![]];
    let mut start = 0;
    for _ in 0..max_len {
        let end = words.len();
        for w in start..end {
            for l in letters.iter() {
                let mut word = words[w].clone();
                word.push(l.clone());
                words.push(word);
            }
        }
        start = end;
    }
    words.into_iter().map(Trace::new).collect()
}
