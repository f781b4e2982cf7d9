use crate::sat::{Literal, Variable};
use std::fmt::Display;

/// The meaning of a SAT variable used to encode an automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfaVariable {
    /// The state accepts the empty suffix.
    Accepting(usize),
    /// The state is universal.
    Universal(usize),
    /// The successor belongs to the successor set of the state on the letter class.
    Edge {
        /// the state
        state: usize,
        /// the letter class
        class: usize,
        /// the successor
        successor: usize,
    },
    /// The state accepts the suffix of the (non-empty) node.
    Run {
        /// the suffix node
        node: usize,
        /// the state
        state: usize,
    },
    /// Auxiliary witness for the transition of the state on the node.
    Support {
        /// the suffix node
        node: usize,
        /// the state
        state: usize,
        /// the successor involved
        successor: usize,
    },
}

impl Display for AfaVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AfaVariable::Accepting(q) => write!(f, "accepting(q{})", q),
            AfaVariable::Universal(q) => write!(f, "universal(q{})", q),
            AfaVariable::Edge {
                state,
                class,
                successor,
            } => write!(f, "edge(q{}, l{}, q{})", state, class, successor),
            AfaVariable::Run { node, state } => write!(f, "run(n{}, q{})", node, state),
            AfaVariable::Support {
                node,
                state,
                successor,
            } => write!(f, "support(n{}, q{}, q{})", node, state, successor),
        }
    }
}

/// The mapping between the SAT variables and their meaning for a candidate automaton size.
///
/// Variables are allocated in blocks, in this order: acceptance, modes, edges, runs, supports.
/// Run variables exist only for non-empty suffix nodes; the run of a state on the empty suffix is its acceptance variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AfaVarMap {
    n_states: usize,
    n_letter_classes: usize,
    n_nodes: usize,
}

impl AfaVarMap {
    /// Builds the variable map for an automaton size, a number of letter classes and a number of suffix nodes (empty suffix included).
    pub fn new(n_states: usize, n_letter_classes: usize, n_nodes: usize) -> Self {
        Self {
            n_states,
            n_letter_classes,
            n_nodes,
        }
    }

    /// Returns the size of the automaton.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Returns the number of letter classes.
    pub fn n_letter_classes(&self) -> usize {
        self.n_letter_classes
    }

    /// Returns the number of allocated variables.
    pub fn n_vars(&self) -> usize {
        self.support_offset() + self.n_non_empty_nodes() * self.n_states * self.n_states
    }

    fn n_non_empty_nodes(&self) -> usize {
        self.n_nodes.saturating_sub(1)
    }

    fn edge_offset(&self) -> usize {
        2 * self.n_states
    }

    fn run_offset(&self) -> usize {
        self.edge_offset() + self.n_states * self.n_letter_classes * self.n_states
    }

    fn support_offset(&self) -> usize {
        self.run_offset() + self.n_non_empty_nodes() * self.n_states
    }

    fn var(index: usize) -> Variable {
        Variable::from(index + 1)
    }

    /// Returns the positive literal of the acceptance variable of a state.
    pub fn accepting(&self, state: usize) -> Literal {
        Self::var(state).positive()
    }

    /// Returns the positive literal of the variable telling a state is universal.
    pub fn universal(&self, state: usize) -> Literal {
        Self::var(self.n_states + state).positive()
    }

    /// Returns the positive literal of the variable telling `successor` is a successor of `state` on the letter class.
    pub fn edge(&self, state: usize, class: usize, successor: usize) -> Literal {
        Self::var(
            self.edge_offset()
                + (state * self.n_letter_classes + class) * self.n_states
                + successor,
        )
        .positive()
    }

    /// Returns the positive literal telling the state accepts the suffix of the node.
    ///
    /// For the empty suffix node, this is the acceptance literal of the state.
    pub fn run(&self, node: usize, state: usize) -> Literal {
        if node == 0 {
            self.accepting(state)
        } else {
            Self::var(self.run_offset() + (node - 1) * self.n_states + state).positive()
        }
    }

    /// Returns the positive literal of a support variable of a non-empty node.
    pub fn support(&self, node: usize, state: usize, successor: usize) -> Literal {
        Self::var(
            self.support_offset() + ((node - 1) * self.n_states + state) * self.n_states + successor,
        )
        .positive()
    }

    /// Returns the meaning of a variable, or [Option::None] if it is out of the allocated range.
    pub fn describe(&self, var: Variable) -> Option<AfaVariable> {
        let index = usize::from(var) - 1;
        let k = self.n_states;
        if index < k {
            Some(AfaVariable::Accepting(index))
        } else if index < self.edge_offset() {
            Some(AfaVariable::Universal(index - k))
        } else if index < self.run_offset() {
            let i = index - self.edge_offset();
            Some(AfaVariable::Edge {
                state: i / (self.n_letter_classes * k),
                class: (i / k) % self.n_letter_classes,
                successor: i % k,
            })
        } else if index < self.support_offset() {
            let i = index - self.run_offset();
            Some(AfaVariable::Run {
                node: 1 + i / k,
                state: i % k,
            })
        } else if index < self.n_vars() {
            let i = index - self.support_offset();
            Some(AfaVariable::Support {
                node: 1 + i / (k * k),
                state: (i / k) % k,
                successor: i % k,
            })
        } else {
            None
        }
    }
}
