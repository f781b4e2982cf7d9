use super::{
    buffered_sat_solver::{BufferedSatSolver, DimacsInstanceRead},
    sat_solver::{SolvingListener, SolvingResult},
    Literal, SatSolver, SatSolverFactory,
};
use log::debug;
use std::{
    io::{Cursor, Read},
    process::{Command, Stdio},
};

/// A SAT solver which execution is made by a system command.
///
/// The system command is composed by an executable program, and a potential list of CLI arguments.
///
/// The SAT solver must read from the standard input (if it does not by default, this may be possible with the right CLI arguments).
/// The input and output formats must follow the ones from the SAT competitions.
/// A program that cannot be run, or which output cannot be read, makes the solving functions return [SolvingResult::Unknown].
pub struct ExternalSatSolver {
    buffered_sat_solver: BufferedSatSolver,
}

impl ExternalSatSolver {
    /// Builds a new external SAT solver.
    ///
    /// The `program` argument is the path from a directory in execution path to the software to execute.
    /// The `options` parameter is the CLI options to provide to the software under execution.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use limeltl::sat::{ExternalSatSolver, Literal, SatSolver};
    /// let mut solver = ExternalSatSolver::new(
    ///     "/home/me/my_solver".to_string(),
    ///     vec!["-i".to_string(), "/dev/stdin".to_string()],
    /// );
    /// solver.add_clause(vec![Literal::from(-1isize), Literal::from(-2isize)]);
    /// solver.add_clause(vec![Literal::from(-1isize), Literal::from(2isize)]);
    /// let model = solver.solve().unwrap_model().unwrap();
    /// assert_eq!(Some(false), model.value_of(1usize));
    /// ```
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self {
            buffered_sat_solver: BufferedSatSolver::new(Box::new(move |r| {
                exec_solver(r, &program, &options)
            })),
        }
    }
}

impl SatSolver for ExternalSatSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.buffered_sat_solver.add_clause(cl)
    }

    fn solve(&mut self) -> SolvingResult {
        self.buffered_sat_solver.solve()
    }

    fn n_vars(&self) -> usize {
        self.buffered_sat_solver.n_vars()
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.buffered_sat_solver.add_listener(listener);
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.buffered_sat_solver.reserve(new_max_id)
    }
}

fn exec_solver(
    mut reader: DimacsInstanceRead,
    program: &str,
    options: &[String],
) -> std::io::Result<Box<dyn Read>> {
    debug!("running external SAT solver {} {:?}", program, options);
    let mut child = Command::new(program)
        .args(options)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;
    let writer = child.stdin.take().map(|mut stdin| {
        std::thread::spawn(move || std::io::copy(&mut reader, &mut stdin).map(|_| ()))
    });
    let output = child.wait_with_output()?;
    if let Some(Ok(Err(e))) = writer.map(|w| w.join()) {
        // solvers may exit before reading the whole instance
        debug!("could not write the whole instance to the SAT solver: {}", e);
    }
    Ok(Box::new(Cursor::new(output.stdout)))
}

/// A factory building [ExternalSatSolver] instances that share the same command.
#[derive(Clone, Debug)]
pub struct ExternalSatSolverFactory {
    program: String,
    options: Vec<String>,
}

impl ExternalSatSolverFactory {
    /// Builds a new factory given the program and its CLI options.
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self { program, options }
    }
}

impl SatSolverFactory for ExternalSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        Box::new(ExternalSatSolver::new(
            self.program.clone(),
            self.options.clone(),
        ))
    }
}
