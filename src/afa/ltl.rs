use super::{Afa, StateMode};
use crate::traces::{Letter, Trace, Vocabulary};
use std::fmt::Display;

/// A node of an LTLf formula.
///
/// Literals refer to symbols by their index in the vocabulary of the formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LtlNode {
    /// `true`
    True,
    /// `false`
    False,
    /// `p` or `!p`
    Literal(bool, usize),
    /// `a & b`
    And(Box<LtlNode>, Box<LtlNode>),
    /// `a | b`
    Or(Box<LtlNode>, Box<LtlNode>),
    /// `X a` (strong next)
    Next(Box<LtlNode>),
    /// `N a` (weak next)
    WNext(Box<LtlNode>),
    /// `a U b`
    Until(Box<LtlNode>, Box<LtlNode>),
    /// `a R b`
    Release(Box<LtlNode>, Box<LtlNode>),
    /// `F a`
    Eventually(Box<LtlNode>),
    /// `G a`
    Always(Box<LtlNode>),
}

impl LtlNode {
    fn and(lhs: LtlNode, rhs: LtlNode) -> LtlNode {
        match (lhs, rhs) {
            (LtlNode::False, _) | (_, LtlNode::False) => LtlNode::False,
            (LtlNode::True, n) | (n, LtlNode::True) => n,
            (l, r) => LtlNode::And(Box::new(l), Box::new(r)),
        }
    }

    fn or(lhs: LtlNode, rhs: LtlNode) -> LtlNode {
        match (lhs, rhs) {
            (LtlNode::True, _) | (_, LtlNode::True) => LtlNode::True,
            (LtlNode::False, n) | (n, LtlNode::False) => n,
            (l, r) => LtlNode::Or(Box::new(l), Box::new(r)),
        }
    }

    fn conjunction(nodes: impl Iterator<Item = LtlNode>) -> LtlNode {
        nodes.fold(LtlNode::True, LtlNode::and)
    }

    fn disjunction(nodes: impl Iterator<Item = LtlNode>) -> LtlNode {
        nodes.fold(LtlNode::False, LtlNode::or)
    }

    fn next(node: LtlNode) -> LtlNode {
        match node {
            LtlNode::False => LtlNode::False,
            n => LtlNode::Next(Box::new(n)),
        }
    }

    fn weak_next(node: LtlNode) -> LtlNode {
        match node {
            LtlNode::True => LtlNode::True,
            n => LtlNode::WNext(Box::new(n)),
        }
    }

    fn until(lhs: LtlNode, rhs: LtlNode) -> LtlNode {
        match (lhs, rhs) {
            (_, LtlNode::False) => LtlNode::False,
            (_, LtlNode::True) => LtlNode::True,
            (LtlNode::False, r) => r,
            (LtlNode::True, r) => LtlNode::Eventually(Box::new(r)),
            (l, r) => LtlNode::Until(Box::new(l), Box::new(r)),
        }
    }

    // lhs W rhs, written rhs R (rhs | lhs)
    fn weak_until(lhs: LtlNode, rhs: LtlNode) -> LtlNode {
        match (lhs, rhs) {
            (LtlNode::True, _) | (_, LtlNode::True) => LtlNode::True,
            (LtlNode::False, r) => r,
            (l, LtlNode::False) => LtlNode::Always(Box::new(l)),
            (l, r) => LtlNode::Release(Box::new(r.clone()), Box::new(LtlNode::or(r, l))),
        }
    }

    /// Computes the truth value of this node at each position of a trace.
    fn values(&self, trace: &Trace) -> Vec<bool> {
        let n = trace.len();
        match self {
            LtlNode::True => vec![true; n],
            LtlNode::False => vec![false; n],
            LtlNode::Literal(positive, index) => trace
                .letters()
                .iter()
                .map(|l| l.value(*index) == *positive)
                .collect(),
            LtlNode::And(lhs, rhs) => zip_with(lhs.values(trace), rhs.values(trace), |a, b| a && b),
            LtlNode::Or(lhs, rhs) => zip_with(lhs.values(trace), rhs.values(trace), |a, b| a || b),
            LtlNode::Next(operand) => {
                let values = operand.values(trace);
                (0..n).map(|i| i + 1 < n && values[i + 1]).collect()
            }
            LtlNode::WNext(operand) => {
                let values = operand.values(trace);
                (0..n).map(|i| i + 1 >= n || values[i + 1]).collect()
            }
            LtlNode::Until(lhs, rhs) => {
                let (l, r) = (lhs.values(trace), rhs.values(trace));
                fold_backward(n, |i, next| r[i] || (l[i] && next.unwrap_or(false)))
            }
            LtlNode::Release(lhs, rhs) => {
                let (l, r) = (lhs.values(trace), rhs.values(trace));
                fold_backward(n, |i, next| r[i] && (l[i] || next.unwrap_or(true)))
            }
            LtlNode::Eventually(operand) => {
                let values = operand.values(trace);
                fold_backward(n, |i, next| values[i] || next.unwrap_or(false))
            }
            LtlNode::Always(operand) => {
                let values = operand.values(trace);
                fold_backward(n, |i, next| values[i] && next.unwrap_or(true))
            }
        }
    }
}

// computes result[i] from i and result[i+1], the latter being None at the last position
fn fold_backward<F>(n: usize, f: F) -> Vec<bool>
where
    F: Fn(usize, Option<bool>) -> bool,
{
    let mut result = vec![false; n];
    for i in (0..n).rev() {
        let next = result.get(i + 1).copied();
        result[i] = f(i, next);
    }
    result
}

fn zip_with(lhs: Vec<bool>, rhs: Vec<bool>, f: fn(bool, bool) -> bool) -> Vec<bool> {
    lhs.into_iter().zip(rhs).map(|(a, b)| f(a, b)).collect()
}

/// A closed LTLf formula equivalent to an [Afa].
///
/// The formula is built for automata which reachable states have no cycle other than self-loops.
/// Following the automaton from its initial state, each state becomes a formula of the shape
/// `alpha | (beta & next q)`, where `next q` is `N q` if `q` is accepting and `X q` otherwise.
/// Non-accepting self-looping states become `beta U alpha` and accepting ones become `beta W alpha`,
/// the latter being written `alpha R (alpha | beta)`.
///
/// LTLf formulas are evaluated on non-empty traces.
/// The formula keeps track of the acceptance of the empty trace, given by the initial state of the automaton.
///
/// # Example
///
/// ```
/// # use limeltl::afa::{Afa, LtlFormula, StateMode};
/// # use limeltl::traces::{Letter, Trace, Vocabulary};
/// let p = Letter::new_with_values(&[true]);
/// let afa = Afa::new(
///     Vocabulary::new_with_symbols(&["p"]).unwrap(),
///     vec![true],
///     vec![StateMode::Existential],
///     vec![(p.clone(), vec![vec![0]])],
/// )
/// .unwrap();
/// let formula = LtlFormula::from_afa(&afa).unwrap();
/// assert_eq!("(G (p))", formula.to_string());
/// assert!(formula.accepts(&Trace::new(vec![p.clone(), p])));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LtlFormula {
    vocabulary: Vocabulary,
    root: LtlNode,
    accepts_empty_trace: bool,
}

impl LtlFormula {
    /// Translates an automaton into a closed formula.
    ///
    /// Returns `None` if a cycle of length at least two exists among the reachable states.
    pub fn from_afa(afa: &Afa) -> Option<Self> {
        let mut translator = Translator {
            afa,
            formulas: vec![None; afa.n_states()],
            visiting: vec![false; afa.n_states()],
        };
        let root = translator.translate(afa.initial_state())?;
        Some(Self {
            vocabulary: afa.vocabulary().clone(),
            root,
            accepts_empty_trace: afa.is_accepting(afa.initial_state()),
        })
    }

    /// Returns the root node of the formula.
    pub fn root(&self) -> &LtlNode {
        &self.root
    }

    /// Checks whether the formula holds at a position of a trace.
    ///
    /// Positions out of the trace are never satisfied.
    pub fn holds_at(&self, trace: &Trace, position: usize) -> bool {
        position < trace.len() && self.root.values(trace)[position]
    }

    /// Checks whether a trace is accepted.
    ///
    /// Non-empty traces are accepted iff the formula holds at their first position.
    pub fn accepts(&self, trace: &Trace) -> bool {
        if trace.is_empty() {
            self.accepts_empty_trace
        } else {
            self.holds_at(trace, 0)
        }
    }

    fn fmt_node(&self, node: &LtlNode, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match node {
            LtlNode::True => write!(f, "true"),
            LtlNode::False => write!(f, "false"),
            LtlNode::Literal(true, i) => write!(f, "({})", self.vocabulary.symbol(*i)),
            LtlNode::Literal(false, i) => write!(f, "(!({}))", self.vocabulary.symbol(*i)),
            LtlNode::And(lhs, rhs) => self.fmt_binary(lhs, "&", rhs, f),
            LtlNode::Or(lhs, rhs) => self.fmt_binary(lhs, "|", rhs, f),
            LtlNode::Next(operand) => self.fmt_unary("X", operand, f),
            LtlNode::WNext(operand) => self.fmt_unary("N", operand, f),
            LtlNode::Until(lhs, rhs) => self.fmt_binary(lhs, "U", rhs, f),
            LtlNode::Release(lhs, rhs) => self.fmt_binary(lhs, "R", rhs, f),
            LtlNode::Eventually(operand) => self.fmt_unary("F", operand, f),
            LtlNode::Always(operand) => self.fmt_unary("G", operand, f),
        }
    }

    fn fmt_binary(
        &self,
        lhs: &LtlNode,
        operator: &str,
        rhs: &LtlNode,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "(")?;
        self.fmt_node(lhs, f)?;
        write!(f, " {} ", operator)?;
        self.fmt_node(rhs, f)?;
        write!(f, ")")
    }

    fn fmt_unary(&self, operator: &str, operand: &LtlNode, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} ", operator)?;
        self.fmt_node(operand, f)?;
        write!(f, ")")
    }
}

impl Display for LtlFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_node(&self.root, f)
    }
}

struct Translator<'a> {
    afa: &'a Afa,
    formulas: Vec<Option<LtlNode>>,
    visiting: Vec<bool>,
}

impl Translator<'_> {
    fn translate(&mut self, state: usize) -> Option<LtlNode> {
        if let Some(formula) = &self.formulas[state] {
            return Some(formula.clone());
        }
        if self.visiting[state] {
            return None;
        }
        self.visiting[state] = true;
        let afa = self.afa;
        let mode = afa.mode(state);
        let mut looping = vec![];
        let mut exiting = vec![];
        for (successors, letters) in successor_groups(afa, state) {
            let predicate = letters_predicate(afa.vocabulary(), &letters);
            let others = successors
                .iter()
                .filter(|j| **j != state)
                .map(|j| self.next_state(*j))
                .collect::<Option<Vec<LtlNode>>>()?;
            let others = match mode {
                StateMode::Existential => LtlNode::disjunction(others.into_iter()),
                StateMode::Universal => LtlNode::conjunction(others.into_iter()),
            };
            if !successors.contains(&state) {
                exiting.push(LtlNode::and(predicate, others));
                continue;
            }
            match mode {
                StateMode::Existential => {
                    looping.push(predicate.clone());
                    exiting.push(LtlNode::and(predicate, others));
                }
                StateMode::Universal => looping.push(LtlNode::and(predicate, others)),
            }
        }
        let exiting = LtlNode::disjunction(exiting.into_iter());
        let looping = LtlNode::disjunction(looping.into_iter());
        let formula = if afa.is_accepting(state) {
            LtlNode::weak_until(looping, exiting)
        } else {
            LtlNode::until(looping, exiting)
        };
        self.visiting[state] = false;
        self.formulas[state] = Some(formula.clone());
        Some(formula)
    }

    fn next_state(&mut self, state: usize) -> Option<LtlNode> {
        let formula = self.translate(state)?;
        if self.afa.is_accepting(state) {
            Some(LtlNode::weak_next(formula))
        } else {
            Some(LtlNode::next(formula))
        }
    }
}

fn successor_groups(afa: &Afa, state: usize) -> Vec<(&[usize], Vec<&Letter>)> {
    let mut groups: Vec<(&[usize], Vec<&Letter>)> = vec![];
    for letter in afa.observed_letters() {
        let successors = afa.successors(state, letter);
        match groups.iter_mut().find(|(s, _)| *s == successors) {
            Some((_, letters)) => letters.push(letter),
            None => groups.push((successors, vec![letter])),
        }
    }
    groups
}

fn letters_predicate(vocabulary: &Vocabulary, letters: &[&Letter]) -> LtlNode {
    let n_letters = 1u128.checked_shl(vocabulary.len() as u32);
    if n_letters == Some(letters.len() as u128) {
        return LtlNode::True;
    }
    LtlNode::disjunction(letters.iter().map(|l| {
        LtlNode::conjunction((0..vocabulary.len()).map(|i| LtlNode::Literal(l.value(i), i)))
    }))
}
