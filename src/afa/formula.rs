use super::{Afa, StateMode};
use crate::traces::Letter;
use std::fmt::Display;

/// A textual rendering of an [Afa] as a system of LTLf equations.
///
/// The rendering is `let q0 = <body>; q1 = <body> in q0`, restricted to the reachable states.
/// The body of a state is a disjunction of `<letters> & <successors>` terms, one per group of letters sharing the same successors.
/// Letters are written as full conjunctions of vocabulary literals (`p & !q`).
/// A successor `j` is written `N qj` (weak next) if `j` is accepting, and `X qj` (strong next) otherwise.
/// Terms which successor formula is `false` are omitted, and an empty body is written `false`.
///
/// # Example
///
/// ```
/// # use limeltl::afa::{Afa, StateMode, SymbolicFormula};
/// # use limeltl::traces::{Letter, Vocabulary};
/// let afa = Afa::new(
///     Vocabulary::new_with_symbols(&["p", "q"]).unwrap(),
///     vec![true],
///     vec![StateMode::Existential],
///     vec![
///         (Letter::new_with_values(&[true, false]), vec![vec![0]]),
///         (Letter::new_with_values(&[false, true]), vec![vec![]]),
///     ],
/// )
/// .unwrap();
/// assert_eq!("let q0 = p & !q & N q0 in q0", SymbolicFormula::new(&afa).to_string());
/// ```
pub struct SymbolicFormula<'a> {
    afa: &'a Afa,
}

impl<'a> SymbolicFormula<'a> {
    /// Builds the formula of an automaton.
    pub fn new(afa: &'a Afa) -> Self {
        Self { afa }
    }

    fn state_body(&self, state: usize) -> String {
        let mut groups: Vec<(String, Vec<&Letter>)> = vec![];
        for letter in self.afa.observed_letters() {
            let successors = match self.successor_formula(state, letter) {
                Some(s) => s,
                None => continue,
            };
            match groups.iter_mut().find(|(s, _)| *s == successors) {
                Some((_, letters)) => letters.push(letter),
                None => groups.push((successors, vec![letter])),
            }
        }
        let terms = groups
            .iter()
            .map(|(successors, letters)| {
                let predicate = self.letters_predicate(letters);
                if successors == "true" {
                    predicate
                } else if predicate == "true" {
                    successors.to_string()
                } else {
                    format!("{} & {}", predicate, successors)
                }
            })
            .collect::<Vec<String>>();
        match terms.len() {
            0 => "false".to_string(),
            1 => terms[0].clone(),
            _ => terms
                .iter()
                .map(|t| format!("({})", t))
                .collect::<Vec<String>>()
                .join(" | "),
        }
    }

    // None stands for false
    fn successor_formula(&self, state: usize, letter: &Letter) -> Option<String> {
        let mode = self.afa.mode(state);
        let successors = self.afa.successors(state, letter);
        match (mode, successors.len()) {
            (StateMode::Existential, 0) => None,
            (StateMode::Universal, 0) => Some("true".to_string()),
            (_, 1) => Some(self.next_state(successors[0])),
            _ => Some(format!(
                "({})",
                successors
                    .iter()
                    .map(|j| self.next_state(*j))
                    .collect::<Vec<String>>()
                    .join(&format!(" {} ", mode.operator()))
            )),
        }
    }

    fn next_state(&self, state: usize) -> String {
        if self.afa.is_accepting(state) {
            format!("N q{}", state)
        } else {
            format!("X q{}", state)
        }
    }

    fn letters_predicate(&self, letters: &[&Letter]) -> String {
        if letters.len() == 1 {
            return self.letter_predicate(letters[0]);
        }
        let vocabulary_len = self.afa.vocabulary().len();
        format!(
            "({})",
            letters
                .iter()
                .map(|l| {
                    let p = self.letter_predicate(l);
                    if vocabulary_len > 1 {
                        format!("({})", p)
                    } else {
                        p
                    }
                })
                .collect::<Vec<String>>()
                .join(" | ")
        )
    }

    fn letter_predicate(&self, letter: &Letter) -> String {
        let vocabulary = self.afa.vocabulary();
        if vocabulary.is_empty() {
            return "true".to_string();
        }
        vocabulary
            .iter()
            .enumerate()
            .map(|(i, s)| {
                if letter.value(i) {
                    s.to_string()
                } else {
                    format!("!{}", s)
                }
            })
            .collect::<Vec<String>>()
            .join(" & ")
    }
}

impl Display for SymbolicFormula<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let equations = self
            .afa
            .reachable_states()
            .into_iter()
            .map(|q| format!("q{} = {}", q, self.state_body(q)))
            .collect::<Vec<String>>();
        write!(
            f,
            "let {} in q{}",
            equations.join("; "),
            self.afa.initial_state()
        )
    }
}
