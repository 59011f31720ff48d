use std::path::Path;

use crate::error::SolverError;
use crate::models::{MessageLevel, ProblemKind, Status};

/// Files handed to a solver for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct SolverInput<'a> {
    pub model: &'a Path,
    pub data: Option<&'a Path>,
    /// Terminal output of the solver is appended here.
    pub log: &'a Path,
    /// Scratch directory the solver may use for its own files.
    pub workdir: &'a Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverParams {
    pub presolve: bool,
    pub msg_level: MessageLevel,
}

/// Common interface for MathProg-capable solvers
pub trait Solver: Send + Sync {
    /// Translate a model (and optional data section) into a solvable problem.
    ///
    /// # Returns
    /// `SolverError::Load` when the model or data is malformed; the
    /// translator diagnostics are then in `input.log`.
    fn load(&self, input: &SolverInput<'_>) -> Result<Box<dyn LoadedProblem>, SolverError>;

    /// Get the solver name for logging/debugging
    fn name(&self) -> &str;
}

/// A translated problem, ready to be solved.
pub trait LoadedProblem {
    fn kind(&self) -> ProblemKind;

    /// Solve with the simplex method.
    fn simplex(&mut self, params: SolverParams) -> Result<(), SolverError>;

    /// Solve with branch-and-cut.
    fn branch_and_cut(&mut self, params: SolverParams) -> Result<(), SolverError>;

    /// `Status::Undefined` until a solve has run.
    fn status(&self) -> Status;

    fn objective_value(&self) -> f64;

    /// (column name, primal value) for every column, in column order.
    fn columns(&self) -> Vec<(String, f64)>;

    /// Write the basic solution report of a simplex solve.
    fn write_solution(&self, path: &Path) -> Result<(), SolverError>;

    /// Write the MIP solution report of a branch-and-cut solve.
    fn write_mip_solution(&self, path: &Path) -> Result<(), SolverError>;
}
