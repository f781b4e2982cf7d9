use super::cadical_solver::CadicalSolver;
use std::{
    fmt::Display,
    num::{NonZeroIsize, NonZeroUsize},
};

/// A variable in a SAT solver.
///
/// A variable is represented by a non-null positive integer.
/// It can be obtained through the [From] trait from a `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(NonZeroUsize);

impl From<usize> for Variable {
    fn from(v: usize) -> Self {
        match NonZeroUsize::new(v) {
            Some(n) => Self(n),
            None => panic!("cannot build a variable from zero"),
        }
    }
}

impl From<Variable> for usize {
    fn from(v: Variable) -> Self {
        v.0.into()
    }
}

impl Variable {
    /// Returns the positive literal of this variable.
    pub fn positive(self) -> Literal {
        Literal(NonZeroIsize::new(usize::from(self) as isize).unwrap())
    }

    /// Returns the negative literal of this variable.
    pub fn negative(self) -> Literal {
        self.positive().negate()
    }
}

/// A literal in a SAT solver.
///
/// A literal is represented by a non-null integer.
/// It can be obtained through the [From] trait from an `isize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal(NonZeroIsize);

impl Literal {
    /// Returns the opposite literal.
    pub fn negate(self) -> Self {
        Self(NonZeroIsize::new(-self.0.get()).unwrap())
    }

    /// Returns the variable of this literal.
    pub fn var(&self) -> Variable {
        Variable(self.0.unsigned_abs())
    }

    /// Returns `true` iff this literal is the positive one of its variable.
    pub fn is_positive(&self) -> bool {
        self.0.get() > 0
    }
}

impl From<isize> for Literal {
    fn from(l: isize) -> Self {
        match NonZeroIsize::new(l) {
            Some(n) => Self(n),
            None => panic!("cannot build a literal from zero"),
        }
    }
}

impl From<Literal> for isize {
    fn from(l: Literal) -> Self {
        l.0.into()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds a clause from a list of literals or signed integers.
#[macro_export]
macro_rules! clause {
    () => (
        vec![] as Vec<$crate::sat::Literal>
    );
    ($($x:expr),+ $(,)?) => (
        [$(($x) as isize),+].into_iter().map($crate::sat::Literal::from).collect::<Vec<$crate::sat::Literal>>()
    );
}

/// An assignment of a set of variables.
///
/// Inside the set of variables involved in the assignment, some may be unassigned.
/// This is the reason why accessors to assigned value returns an [Option<bool>].
/// Variables the solver never heard of are considered unassigned.
#[derive(Debug, PartialEq, Eq)]
pub struct Assignment(Vec<Option<bool>>);

impl Assignment {
    /// Builds an assignment from the values of the variables `1..=n`.
    pub fn new(assignment: Vec<Option<bool>>) -> Self {
        Self(assignment)
    }

    /// Returns the value potentially assigned to the variable.
    ///
    /// In case the variable is not assigned, [Option::None] is returned.
    pub fn value_of<T>(&self, v: T) -> Option<bool>
    where
        T: Into<Variable>,
    {
        self.0.get(usize::from(v.into()) - 1).copied().flatten()
    }

    /// Returns the value of a literal, reading unassigned variables as `false`.
    pub fn is_true(&self, l: Literal) -> bool {
        let value = self.value_of(l.var()).unwrap_or(false);
        value == l.is_positive()
    }

    /// Returns the number of variables covered by this assignment.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` iff this assignment covers no variable.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The result of a call to a SAT solver.
#[derive(Debug, PartialEq, Eq)]
pub enum SolvingResult {
    /// The problem is satisfiable; a model is given.
    Satisfiable(Assignment),
    /// The problem is unsatisfiable.
    Unsatisfiable,
    /// The solver was unable to decide the problem.
    Unknown,
}

impl SolvingResult {
    /// Returns the underlying model if it exists, or [Option::None].
    ///
    /// # Panics
    ///
    /// If the solving result is set [SolvingResult::Unknown], this function panics.
    pub fn unwrap_model(self) -> Option<Assignment> {
        match self {
            SolvingResult::Satisfiable(assignment) => Some(assignment),
            SolvingResult::Unsatisfiable => None,
            SolvingResult::Unknown => {
                panic!(r#"cannot unwrap solving result when the solver returned "Unknown""#)
            }
        }
    }

    /// Returns a short uppercase name of the result kind.
    pub fn kind_str(&self) -> &'static str {
        match self {
            SolvingResult::Satisfiable(_) => "SAT",
            SolvingResult::Unsatisfiable => "UNSAT",
            SolvingResult::Unknown => "UNKNOWN",
        }
    }
}

/// A trait for SAT solvers.
pub trait SatSolver {
    /// Adds a clause to this solver.
    fn add_clause(&mut self, cl: Vec<Literal>);

    /// Solves the problem formed by the clauses added so far.
    fn solve(&mut self) -> SolvingResult;

    /// Returns the highest variable index known by this solver.
    fn n_vars(&self) -> usize;

    /// Adds a listener notified at each call to a solving function.
    fn add_listener(&mut self, listener: Box<dyn SolvingListener>);

    /// Declares that the variables `1..=new_max_id` are in use, even if no clause refers to some of them.
    fn reserve(&mut self, new_max_id: usize);
}

/// A trait for objects listening to the solving calls of a [SatSolver].
pub trait SolvingListener {
    /// Called when a solving function starts.
    fn solving_start(&self, n_vars: usize, n_clauses: usize);

    /// Called when a solving function ends.
    fn solving_end(&self, result: &SolvingResult);
}

/// A trait for objects building fresh SAT solvers.
///
/// Each candidate automaton size is checked by its own solver, so the learning process asks the factory for a new one at each step.
pub trait SatSolverFactory {
    /// Builds a new, empty SAT solver.
    fn new_solver(&self) -> Box<dyn SatSolver>;
}

/// The factory of the default SAT solver (Cadical).
#[derive(Default)]
pub struct DefaultSatSolverFactory;

impl SatSolverFactory for DefaultSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        default_solver()
    }
}

/// The default SAT solver (Cadical).
pub fn default_solver() -> Box<dyn SatSolver> {
    Box::<CadicalSolver>::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_from_pos() {
        let v = Variable::from(1usize);
        assert_eq!(1, usize::from(v))
    }

    #[test]
    #[allow(unused_must_use)]
    #[should_panic]
    fn test_var_from_null() {
        Variable::from(0usize);
    }

    #[test]
    fn test_lit_from_neg() {
        let l = Literal::from(-3isize);
        assert_eq!(-3, isize::from(l));
        assert!(!l.is_positive());
        assert_eq!(Variable::from(3usize), l.var());
    }

    #[test]
    #[allow(unused_must_use)]
    #[should_panic]
    fn test_lit_from_null() {
        Literal::from(0isize);
    }

    #[test]
    fn test_var_literals() {
        let v = Variable::from(2usize);
        assert_eq!(Literal::from(2isize), v.positive());
        assert_eq!(Literal::from(-2isize), v.negative());
    }

    #[test]
    fn test_negate_lit() {
        assert_eq!(Literal::from(-1isize), Literal::from(1isize).negate());
        assert_eq!(Literal::from(1isize), Literal::from(-1isize).negate());
    }

    #[test]
    fn test_clause_macro() {
        assert_eq!(
            vec![Literal::from(1isize), Literal::from(-2isize)],
            crate::clause![1, -2]
        );
        assert!(crate::clause![].is_empty());
    }

    #[test]
    fn test_assignment_out_of_range_is_unassigned() {
        let assignment = Assignment::new(vec![Some(true), None]);
        assert_eq!(Some(true), assignment.value_of(1usize));
        assert_eq!(None, assignment.value_of(2usize));
        assert_eq!(None, assignment.value_of(10usize));
        assert!(assignment.is_true(Literal::from(1isize)));
        assert!(assignment.is_true(Literal::from(-2isize)));
        assert!(!assignment.is_true(Literal::from(10isize)));
    }

    #[test]
    fn test_solving_result_unwrap_model_none() {
        assert_eq!(None, SolvingResult::Unsatisfiable.unwrap_model());
    }

    #[test]
    #[should_panic]
    fn test_solving_result_unwrap_model_unknown() {
        SolvingResult::Unknown.unwrap_model();
    }

    #[test]
    fn test_kind_str() {
        assert_eq!("UNSAT", SolvingResult::Unsatisfiable.kind_str());
        assert_eq!("UNKNOWN", SolvingResult::Unknown.kind_str());
        assert_eq!(
            "SAT",
            SolvingResult::Satisfiable(Assignment::new(vec![])).kind_str()
        );
    }
}
