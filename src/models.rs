use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------- Solver-facing types ----------

/// Solution status, numbered like GLPK's `GLP_*` status codes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Undefined = 1,
    Feasible = 2,
    Infeasible = 3,
    NoFeasible = 4,
    Optimal = 5,
    Unbounded = 6,
}

impl Status {
    /// Whether a solution (objective value and column values) is available.
    pub fn has_solution(self) -> bool {
        matches!(self, Status::Optimal | Status::Feasible)
    }

    pub fn describe(self) -> &'static str {
        match self {
            Status::Optimal => "Solution found is optimal.",
            Status::Undefined => "Solution found is undefined.",
            Status::Feasible => "Solution found is feasible, but not necessarily optimal.",
            Status::Infeasible => "Solution found is infeasible.",
            Status::NoFeasible => "Model is infeasible.",
            Status::Unbounded => "Model is unbounded.",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// Pure linear program.
    Continuous,
    MixedInteger,
}

/// Solver terminal verbosity (GLPK `GLP_MSG_OFF` .. `GLP_MSG_ALL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Off = 0,
    Errors = 1,
    Normal = 2,
    All = 3,
}

// ---------- Session-facing types ----------

/// Options shared by `%solve` and the inline `%%gmpl` cell command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveOptions {
    pub nolog: bool,
    /// Enables the LP presolver for continuous problems.
    pub presolve: bool,
    /// Session name to publish the `SolveResult` under.
    pub result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveRequest {
    pub model: String,
    pub data: Option<String>,
    pub options: SolveOptions,
}

/// Outcome of one solve, as published into the session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub status: Status,
    pub objval: Option<f64>,
    pub variables: Option<BTreeMap<String, f64>>,
}

impl SolveResult {
    /// Objective and variables are kept only when `status` carries a solution.
    pub fn new(status: Status, objval: f64, variables: BTreeMap<String, f64>) -> Self {
        if status.has_solution() {
            SolveResult {
                status,
                objval: Some(objval),
                variables: Some(variables),
            }
        } else {
            SolveResult {
                status,
                objval: None,
                variables: None,
            }
        }
    }
}

impl fmt::Display for SolveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status: {}", self.status.describe())?;
        if let Some(objval) = self.objval {
            writeln!(f, "Objective value: {}", objval)?;
        }
        if let Some(variables) = &self.variables {
            writeln!(f, "Decision variables:")?;
            for (name, value) in variables {
                writeln!(f, "    {} = {}", name, value)?;
            }
        }
        Ok(())
    }
}

// ---------- API (wire) types ----------

#[derive(Deserialize, Debug)]
pub struct CommandRequest {
    pub line: String,
    #[serde(default)]
    pub cell: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CommandResponse {
    pub output: String,
    pub success: bool,
}
