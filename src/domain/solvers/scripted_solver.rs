//! Solver double that replays a fixed outcome and records every call.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::solver::{LoadedProblem, Solver, SolverInput, SolverParams};
use crate::error::SolverError;
use crate::models::{ProblemKind, Status};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Load { model: PathBuf, data: Option<PathBuf> },
    Simplex(SolverParams),
    BranchAndCut(SolverParams),
    WriteSolution,
    WriteMipSolution,
}

/// What the scripted solver reports. `{model}` and `{data}` in the log
/// texts are replaced with the paths it was handed.
#[derive(Debug, Clone)]
pub(crate) struct Script {
    pub fail_load: bool,
    pub fail_run: bool,
    pub load_log: String,
    pub solve_log: String,
    pub kind: ProblemKind,
    pub status: Status,
    pub objective: f64,
    pub columns: Vec<(String, f64)>,
    /// `None` makes both writers fail as if no report was produced.
    pub report: Option<String>,
}

impl Script {
    pub fn optimal_lp() -> Self {
        Script {
            fail_load: false,
            fail_run: false,
            load_log: String::new(),
            solve_log: "Reading model section from {model}...\n\
                        Generating cost...\n\
                        OPTIMAL LP SOLUTION FOUND\n\
                        Writing basic solution to '/scratch/solution.txt'...\n"
                .to_string(),
            kind: ProblemKind::Continuous,
            status: Status::Optimal,
            objective: 2.0,
            columns: vec![("x".to_string(), 1.0)],
            report: Some("Status:     OPTIMAL\n".to_string()),
        }
    }

    pub fn load_failure() -> Self {
        Script {
            fail_load: true,
            load_log: "Reading model section from {model}...\n\
                       {model}:2: syntax error in variable statement\n\
                       Context: var x >=\n\
                       MathProg model processing error\n"
                .to_string(),
            ..Script::optimal_lp()
        }
    }

    /// Loads fine, then fails while running the post-solve statements.
    pub fn run_failure() -> Self {
        Script {
            fail_run: true,
            solve_log: "Reading model section from {model}...\n\
                        OPTIMAL LP SOLUTION FOUND\n\
                        {model}:4: division by zero\n\
                        Model postsolving error\n"
                .to_string(),
            status: Status::Undefined,
            report: None,
            ..Script::optimal_lp()
        }
    }
}

#[derive(Clone)]
pub(crate) struct ScriptedSolver {
    script: Script,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedSolver {
    pub fn new(script: Script) -> Self {
        ScriptedSolver {
            script,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

impl Solver for ScriptedSolver {
    fn load(&self, input: &SolverInput<'_>) -> Result<Box<dyn LoadedProblem>, SolverError> {
        self.calls.lock().push(Call::Load {
            model: input.model.to_path_buf(),
            data: input.data.map(Path::to_path_buf),
        });
        assert!(input.model.exists(), "model file was not materialized");

        let fill = |text: &str| {
            let mut text = text.replace("{model}", &input.model.display().to_string());
            if let Some(data) = input.data {
                text = text.replace("{data}", &data.display().to_string());
            }
            text
        };
        append(input.log, &fill(&self.script.load_log))?;
        if self.script.fail_load {
            return Err(SolverError::Load);
        }

        Ok(Box::new(ScriptedProblem {
            script: self.script.clone(),
            solve_log: fill(&self.script.solve_log),
            log: input.log.to_path_buf(),
            calls: Arc::clone(&self.calls),
            solved: false,
        }))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct ScriptedProblem {
    script: Script,
    solve_log: String,
    log: PathBuf,
    calls: Arc<Mutex<Vec<Call>>>,
    solved: bool,
}

impl ScriptedProblem {
    fn run(&mut self, call: Call) -> Result<(), SolverError> {
        self.calls.lock().push(call);
        append(&self.log, &self.solve_log)?;
        self.solved = true;
        if self.script.fail_run {
            return Err(SolverError::Failed);
        }
        Ok(())
    }

    fn write_report(&self, path: &Path) -> Result<(), SolverError> {
        let report = self.script.report.as_ref().ok_or(SolverError::NoSolution)?;
        fs::write(path, report)?;
        Ok(())
    }
}

impl LoadedProblem for ScriptedProblem {
    fn kind(&self) -> ProblemKind {
        self.script.kind
    }

    fn simplex(&mut self, params: SolverParams) -> Result<(), SolverError> {
        self.run(Call::Simplex(params))
    }

    fn branch_and_cut(&mut self, params: SolverParams) -> Result<(), SolverError> {
        self.run(Call::BranchAndCut(params))
    }

    fn status(&self) -> Status {
        if self.solved {
            self.script.status
        } else {
            Status::Undefined
        }
    }

    fn objective_value(&self) -> f64 {
        self.script.objective
    }

    fn columns(&self) -> Vec<(String, f64)> {
        self.script.columns.clone()
    }

    fn write_solution(&self, path: &Path) -> Result<(), SolverError> {
        self.calls.lock().push(Call::WriteSolution);
        self.write_report(path)
    }

    fn write_mip_solution(&self, path: &Path) -> Result<(), SolverError> {
        self.calls.lock().push(Call::WriteMipSolution);
        self.write_report(path)
    }
}

fn append(path: &Path, text: &str) -> Result<(), SolverError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}
