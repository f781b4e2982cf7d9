use super::ModelDecoder;
use crate::{
    afa::Afa,
    encodings::AfaConstraintsEncoder,
    sat::{DefaultSatSolverFactory, SatSolverFactory, SolvingListener, SolvingResult},
    traces::Sample,
};
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

/// The states of the search for a minimal automaton.
#[derive(Debug)]
pub enum SearchState {
    /// The given size is the next one to check.
    Trying(usize),
    /// An automaton was found.
    Succeeded(Afa),
    /// No size up to the maximal one admits an automaton.
    ExhaustedFailed,
}

/// Statistics about the check of a single automaton size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeAttempt {
    /// the automaton size
    pub n_states: usize,
    /// the number of variables of the SAT instance
    pub n_vars: usize,
    /// the number of clauses of the SAT instance
    pub n_clauses: usize,
    /// the kind of result returned by the solver (`SAT`, `UNSAT` or `UNKNOWN`)
    pub result: &'static str,
    /// the time spent encoding, solving and decoding
    pub duration: Duration,
}

/// Statistics about a search, one entry per size checked.
#[derive(Clone, Debug, Default)]
pub struct SearchStats {
    attempts: Vec<SizeAttempt>,
}

impl SearchStats {
    /// Returns the attempts, in the order they were made.
    pub fn attempts(&self) -> &[SizeAttempt] {
        &self.attempts
    }

    /// Returns the time spent in all the attempts.
    pub fn total_duration(&self) -> Duration {
        self.attempts.iter().map(|a| a.duration).sum()
    }
}

#[derive(Default)]
struct InstanceSize(Option<(usize, usize)>);

struct SatSolvingLogger {
    n_states: usize,
    instance_size: Rc<RefCell<InstanceSize>>,
}

impl SolvingListener for SatSolvingLogger {
    fn solving_start(&self, n_vars: usize, n_clauses: usize) {
        info!(
            "launching SAT solver for size {} on an instance with {} variables and {} clauses",
            self.n_states, n_vars, n_clauses
        );
        self.instance_size.borrow_mut().0 = Some((n_vars, n_clauses));
    }

    fn solving_end(&self, result: &SolvingResult) {
        info!("SAT solver ended with result {}", result.kind_str());
    }
}

/// Searches for a minimal automaton classifying a sample.
///
/// Sizes are checked in increasing order from `1` to the maximal size, each with a fresh SAT solver.
/// The first size that admits an automaton is reported; no monotonicity is assumed, so no size is skipped.
///
/// # Example
///
/// ```
/// # use limeltl::learning::SizeSearchController;
/// # use limeltl::traces::{TraceEncoder, Vocabulary};
/// let vocabulary = Vocabulary::new_with_symbols(&["p"]).unwrap();
/// let sample = TraceEncoder::new(&vocabulary)
///     .encode_sample(&[vec![vec!["p"]]], &[vec![vec!["p"], vec!["p"]]])
///     .unwrap();
/// let mut controller = SizeSearchController::new(&sample, 5).unwrap();
/// let afa = controller.learn().unwrap().unwrap();
/// assert_eq!(2, afa.n_states());
/// ```
pub struct SizeSearchController<'a> {
    sample: &'a Sample,
    max_size: usize,
    solver_factory: Box<dyn SatSolverFactory>,
    encoder: AfaConstraintsEncoder<'a>,
    stats: SearchStats,
}

impl<'a> SizeSearchController<'a> {
    /// Builds a new controller using the default SAT solver.
    ///
    /// An error is returned if the maximal size is `0`.
    pub fn new(sample: &'a Sample, max_size: usize) -> Result<Self> {
        Self::new_with_sat_solver_factory(sample, max_size, Box::new(DefaultSatSolverFactory))
    }

    /// Builds a new controller using the provided SAT solvers.
    ///
    /// An error is returned if the maximal size is `0`.
    pub fn new_with_sat_solver_factory(
        sample: &'a Sample,
        max_size: usize,
        solver_factory: Box<dyn SatSolverFactory>,
    ) -> Result<Self> {
        if max_size == 0 {
            return Err(anyhow!("the maximal automaton size must be at least 1"));
        }
        Ok(Self {
            sample,
            max_size,
            solver_factory,
            encoder: AfaConstraintsEncoder::new(sample),
            stats: SearchStats::default(),
        })
    }

    /// Returns the maximal size of the search.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the statistics of the sizes checked so far.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Searches for a minimal automaton.
    ///
    /// Returns `Ok(Some(afa))` when an automaton is found, and `Ok(None)` when no size up to the maximal one admits one.
    /// A sample with a trace that is both positive and negative leads to `Ok(None)` without calling the solver.
    /// An error is returned if the solver fails to decide an instance or if a model cannot be decoded.
    pub fn learn(&mut self) -> Result<Option<Afa>> {
        if let Some((i, j)) = self.sample.find_contradiction() {
            warn!(
                "positive trace {} and negative trace {} are identical; no automaton can classify the sample",
                i, j
            );
            return Ok(None);
        }
        let mut state = SearchState::Trying(1);
        loop {
            state = match state {
                SearchState::Trying(k) => self.step(k)?,
                SearchState::Succeeded(afa) => {
                    info!("found an automaton with {} state(s)", afa.n_states());
                    return Ok(Some(afa));
                }
                SearchState::ExhaustedFailed => {
                    info!("no automaton with at most {} state(s)", self.max_size);
                    return Ok(None);
                }
            }
        }
    }

    fn step(&mut self, n_states: usize) -> Result<SearchState> {
        Ok(match self.try_size(n_states)? {
            Some(afa) => SearchState::Succeeded(afa),
            None if n_states < self.max_size => SearchState::Trying(n_states + 1),
            None => SearchState::ExhaustedFailed,
        })
    }

    /// Checks whether an automaton with exactly the given number of states classifies the sample.
    ///
    /// This function does not depend on the previous calls; it may be used to check minimality.
    pub fn try_size(&mut self, n_states: usize) -> Result<Option<Afa>> {
        if n_states == 0 {
            return Err(anyhow!("an automaton must have at least one state"));
        }
        info!("trying automaton size {}", n_states);
        let start = Instant::now();
        let instance_size = Rc::new(RefCell::new(InstanceSize::default()));
        let mut solver = self.solver_factory.new_solver();
        solver.add_listener(Box::new(SatSolvingLogger {
            n_states,
            instance_size: Rc::clone(&instance_size),
        }));
        let var_map = self.encoder.encode_constraints(n_states, solver.as_mut());
        let result = solver.solve();
        let result_kind = result.kind_str();
        let decoded = match result {
            SolvingResult::Satisfiable(assignment) => Some(
                ModelDecoder::new(self.sample, self.encoder.suffix_trie())
                    .decode(&var_map, &assignment)
                    .with_context(|| format!("while decoding the model for size {}", n_states)),
            ),
            SolvingResult::Unsatisfiable => None,
            SolvingResult::Unknown => Some(Err(anyhow!(
                "the SAT solver failed to decide the instance for size {}",
                n_states
            ))),
        };
        let (n_vars, n_clauses) = instance_size.borrow().0.unwrap_or_default();
        let attempt = SizeAttempt {
            n_states,
            n_vars,
            n_clauses,
            result: result_kind,
            duration: start.elapsed(),
        };
        debug!("size {} checked in {:?}", n_states, attempt.duration);
        self.stats.attempts.push(attempt);
        decoded.transpose()
    }
}
