use crate::traces::{Letter, Trace, Vocabulary};
use anyhow::{anyhow, Result};
use std::collections::{HashMap, VecDeque};

/// The way the successors of a state are combined by its transition formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateMode {
    /// The transition formula is the disjunction of the successors.
    Existential,
    /// The transition formula is the conjunction of the successors.
    Universal,
}

impl StateMode {
    /// Returns the symbol of the boolean operator associated with this mode (`|` or `&`).
    pub fn operator(&self) -> &'static str {
        match self {
            StateMode::Existential => "|",
            StateMode::Universal => "&",
        }
    }
}

/// The successor set of a state on a letter, as a sorted list of state indices.
pub type Successors = Vec<usize>;

/// An Alternating Finite Automaton.
///
/// The automaton has `n` states indexed from `0` to `n-1`, `0` being the initial one.
/// Each state is accepting or not, and has a [StateMode] that tells how its successors are combined.
///
/// Transitions are only defined for the letters given at construction time (the observed letters).
/// On any other letter, every state has the transition formula `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Afa {
    vocabulary: Vocabulary,
    accepting: Vec<bool>,
    modes: Vec<StateMode>,
    transitions: Vec<(Letter, Vec<Successors>)>,
    letter_indices: HashMap<Letter, usize>,
}

impl Afa {
    /// Builds a new automaton.
    ///
    /// The number of states is given by the length of the `accepting` vector.
    /// The `transitions` vector gives, for each observed letter, the successor set of each state.
    ///
    /// An error is returned if the vectors do not have consistent lengths, if a successor index is out of bounds,
    /// if a letter does not fit the vocabulary or appears twice, or if the automaton has no state.
    pub fn new(
        vocabulary: Vocabulary,
        accepting: Vec<bool>,
        modes: Vec<StateMode>,
        transitions: Vec<(Letter, Vec<Successors>)>,
    ) -> Result<Self> {
        let n_states = accepting.len();
        if n_states == 0 {
            return Err(anyhow!("an automaton must have at least one state"));
        }
        if modes.len() != n_states {
            return Err(anyhow!(
                "got {} state modes for {} states",
                modes.len(),
                n_states
            ));
        }
        let mut letter_indices = HashMap::with_capacity(transitions.len());
        for (i, (letter, successors)) in transitions.iter().enumerate() {
            if letter.width() != vocabulary.len() {
                return Err(anyhow!("letter with index {} does not fit the vocabulary", i));
            }
            if letter_indices.insert(letter.clone(), i).is_some() {
                return Err(anyhow!("letter with index {} is defined twice", i));
            }
            if successors.len() != n_states {
                return Err(anyhow!(
                    "letter with index {} has {} successor sets for {} states",
                    i,
                    successors.len(),
                    n_states
                ));
            }
            if let Some(j) = successors.iter().flatten().find(|j| **j >= n_states) {
                return Err(anyhow!(
                    "successor {} on letter with index {} is out of bounds",
                    j,
                    i
                ));
            }
        }
        Ok(Self {
            vocabulary,
            accepting,
            modes,
            transitions,
            letter_indices,
        })
    }

    /// Returns the vocabulary the letters of this automaton are built on.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Returns the number of states.
    pub fn n_states(&self) -> usize {
        self.accepting.len()
    }

    /// Returns the initial state, which is always `0`.
    pub fn initial_state(&self) -> usize {
        0
    }

    /// Returns `true` iff the state accepts the empty suffix.
    pub fn is_accepting(&self, state: usize) -> bool {
        self.accepting[state]
    }

    /// Returns the mode of the state.
    pub fn mode(&self, state: usize) -> StateMode {
        self.modes[state]
    }

    /// Iterates over the letters that have transitions, in the order they were given.
    pub fn observed_letters(&self) -> impl Iterator<Item = &Letter> + '_ {
        self.transitions.iter().map(|(l, _)| l)
    }

    /// Returns `true` iff transitions are defined for this letter.
    pub fn is_observed(&self, letter: &Letter) -> bool {
        self.letter_indices.contains_key(letter)
    }

    /// Returns the successor set of a state on a letter.
    ///
    /// For an unobserved letter, the successor set is empty.
    /// Use [evaluate_transition](Self::evaluate_transition) to get the semantics of such transitions.
    pub fn successors(&self, state: usize, letter: &Letter) -> &[usize] {
        match self.letter_indices.get(letter) {
            Some(i) => &self.transitions[*i].1[state],
            None => &[],
        }
    }

    /// Evaluates the transition formula of a state on a letter, given which states accept the rest of the trace.
    ///
    /// On an unobserved letter, the result is `false` whatever the mode of the state.
    pub fn evaluate_transition(&self, state: usize, letter: &Letter, next: &[bool]) -> bool {
        let index = match self.letter_indices.get(letter) {
            Some(i) => *i,
            None => return false,
        };
        let successors = &self.transitions[index].1[state];
        match self.modes[state] {
            StateMode::Existential => successors.iter().any(|j| next[*j]),
            StateMode::Universal => successors.iter().all(|j| next[*j]),
        }
    }

    /// Checks whether the automaton accepts a trace.
    ///
    /// The trace is read backward: the states accepting the empty suffix are the accepting ones,
    /// and the states accepting a suffix starting by a letter are given by their transition formulas.
    /// The trace is accepted iff the initial state accepts it.
    ///
    /// # Example
    ///
    /// ```
    /// # use limeltl::afa::{Afa, StateMode};
    /// # use limeltl::traces::{Letter, Trace, Vocabulary};
    /// let vocabulary = Vocabulary::new_with_symbols(&["p"]).unwrap();
    /// let p = Letter::new_with_values(&[true]);
    /// // accepts p*
    /// let afa = Afa::new(
    ///     vocabulary,
    ///     vec![true],
    ///     vec![StateMode::Existential],
    ///     vec![(p.clone(), vec![vec![0]])],
    /// )
    /// .unwrap();
    /// assert!(afa.accepts(&Trace::default()));
    /// assert!(afa.accepts(&Trace::new(vec![p.clone(), p])));
    /// assert!(!afa.accepts(&Trace::new(vec![Letter::new_with_values(&[false])])));
    /// ```
    pub fn accepts(&self, trace: &Trace) -> bool {
        let final_config = self.accepting.clone();
        let config = trace.letters().iter().rev().fold(final_config, |next, letter| {
            (0..self.n_states())
                .map(|q| self.evaluate_transition(q, letter, &next))
                .collect()
        });
        config[self.initial_state()]
    }

    /// Returns the states that can be reached from the initial state, in increasing order.
    ///
    /// A state is reachable if it is the initial one or it is a successor of a reachable state on an observed letter.
    pub fn reachable_states(&self) -> Vec<usize> {
        let mut reached = vec![false; self.n_states()];
        let mut queue = VecDeque::new();
        reached[self.initial_state()] = true;
        queue.push_back(self.initial_state());
        while let Some(q) = queue.pop_front() {
            for (_, successors) in self.transitions.iter() {
                for j in successors[q].iter() {
                    if !reached[*j] {
                        reached[*j] = true;
                        queue.push_back(*j);
                    }
                }
            }
        }
        (0..self.n_states()).filter(|q| reached[*q]).collect()
    }
}
