use super::{Assignment, Literal, SatSolver, SolvingListener, SolvingResult};
use anyhow::{anyhow, Context, Result};
use log::warn;
use std::io::{BufRead, BufReader, Cursor, Read};

/// The type of functions that solve a DIMACS instance and return the solver output.
///
/// The output must follow the SAT competition format (`s` status line, `v` value lines, `c` comments).
pub type SolvingFn = dyn Fn(DimacsInstanceRead) -> std::io::Result<Box<dyn Read>>;

/// A reader over a DIMACS instance built by a [BufferedSatSolver].
pub struct DimacsInstanceRead {
    preamble: Cursor<String>,
    clauses: Cursor<String>,
}

impl Read for DimacsInstanceRead {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let r = self.preamble.read(buf)?;
        if r > 0 {
            return Ok(r);
        }
        self.clauses.read(buf)
    }
}

const DEFAULT_BUFFER_CAP: usize = 1 << 20;

/// A SAT solver that buffers the clauses in DIMACS format and delegates solving to a function.
pub struct BufferedSatSolver {
    n_vars: usize,
    n_clauses: usize,
    clauses: String,
    solving_fn: Box<SolvingFn>,
    listeners: Vec<Box<dyn SolvingListener>>,
}

impl BufferedSatSolver {
    /// Builds a new buffered solver given the solving function.
    pub fn new(solving_fn: Box<SolvingFn>) -> Self {
        Self {
            n_vars: 0,
            n_clauses: 0,
            clauses: String::with_capacity(DEFAULT_BUFFER_CAP),
            solving_fn,
            listeners: Vec::new(),
        }
    }

    /// Returns the number of clauses added so far.
    pub fn n_clauses(&self) -> usize {
        self.n_clauses
    }

    fn instance_reader(&self) -> DimacsInstanceRead {
        DimacsInstanceRead {
            preamble: Cursor::new(format!("p cnf {} {}\n", self.n_vars, self.n_clauses)),
            clauses: Cursor::new(self.clauses.clone()),
        }
    }
}

impl SatSolver for BufferedSatSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        cl.iter().for_each(|l| {
            self.n_vars = usize::max(self.n_vars, usize::from(l.var()));
            self.clauses.push_str(&format!("{} ", l));
        });
        self.clauses.push_str("0\n");
        self.n_clauses += 1;
    }

    fn solve(&mut self) -> SolvingResult {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(self.n_vars(), self.n_clauses));
        let instance_reader = self.instance_reader();
        let solving_result = match (self.solving_fn)(instance_reader)
            .context("while running the solving function")
            .and_then(|output| read_solver_output(output, self.n_vars))
        {
            Ok(r) => r,
            Err(e) => {
                warn!("the SAT solver failed: {:#}", e);
                SolvingResult::Unknown
            }
        };
        self.listeners
            .iter()
            .for_each(|l| l.solving_end(&solving_result));
        solving_result
    }

    fn n_vars(&self) -> usize {
        self.n_vars
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.listeners.push(listener);
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.n_vars = usize::max(self.n_vars, new_max_id);
    }
}

fn read_solver_output(output: Box<dyn Read>, n_vars: usize) -> Result<SolvingResult> {
    let context = "while reading the SAT solver output";
    let mut status = None;
    let mut assignment = vec![None; n_vars];
    let mut assignment_line_seen = false;
    let mut assignment_line_end = false;
    for line in BufReader::new(output).lines() {
        let line = line.context(context)?;
        if line == "s SATISFIABLE" || line == "s UNSATISFIABLE" {
            if status.is_some() {
                return Err(anyhow!("multiple status lines")).context(context);
            }
            status = Some(line == "s SATISFIABLE");
        } else if line == "s UNKNOWN" {
            return Ok(SolvingResult::Unknown);
        } else if line.starts_with("v ") || line == "v" {
            assignment_line_seen = true;
            for w in line.split_ascii_whitespace().skip(1) {
                let n = w
                    .parse::<isize>()
                    .map_err(|_| anyhow!(r#""{}" is not a literal"#, w))
                    .context(context)?;
                if n == 0 {
                    if assignment_line_end {
                        return Err(anyhow!("multiple zeroes on value lines")).context(context);
                    }
                    assignment_line_end = true;
                } else {
                    let v = n.unsigned_abs() - 1;
                    if v >= n_vars {
                        return Err(anyhow!("variable {} in value line is out of bounds", v + 1))
                            .context(context);
                    }
                    assignment[v] = Some(n > 0);
                }
            }
        } else if !line.starts_with("c ") && line != "c" && !line.is_empty() {
            return Err(anyhow!(r#"unexpected line "{}""#, line)).context(context);
        }
    }
    Ok(match status {
        Some(true) if assignment_line_seen => SolvingResult::Satisfiable(Assignment::new(assignment)),
        Some(true) | None => SolvingResult::Unknown,
        Some(false) => SolvingResult::Unsatisfiable,
    })
}
