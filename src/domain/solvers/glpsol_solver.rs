use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::solver::{LoadedProblem, Solver, SolverInput, SolverParams};
use crate::domain::solvers::glpk_format::{parse_problem, parse_raw_solution, RawSolution};
use crate::error::SolverError;
use crate::models::{MessageLevel, ProblemKind, Status};

const PROBLEM_FILE: &str = "problem.glp";
const RAW_SOLUTION_FILE: &str = "solution.raw";
const REPORT_FILE: &str = "solution.txt";

/// GLPK solver driven through the `glpsol` command-line program
pub struct GlpsolSolver {
    program: PathBuf,
}

impl GlpsolSolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        GlpsolSolver {
            program: program.into(),
        }
    }

    /// First line of `glpsol --version`, if the program can be run.
    pub fn version(&self) -> Option<String> {
        let output = Command::new(&self.program).arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .map(|line| line.trim().to_string())
    }
}

impl Solver for GlpsolSolver {
    fn load(&self, input: &SolverInput<'_>) -> Result<Box<dyn LoadedProblem>, SolverError> {
        let problem_file = input.workdir.join(PROBLEM_FILE);

        let mut args = math_args(input.model, input.data);
        args.push("--check".into());
        args.push("--wglp".into());
        args.push(problem_file.clone().into());

        let run = run_glpsol(&self.program, &args)?;
        if !run.success {
            // Translation output is only kept when it explains a failure;
            // the solve run repeats it otherwise.
            append_log(input.log, &run.output)?;
            log::debug!("glpsol rejected model {:?}", input.model);
            return Err(SolverError::Load);
        }

        let header = parse_problem(&fs::read_to_string(&problem_file)?)?;
        log::debug!(
            "Loaded {:?} problem with {} columns",
            header.kind,
            header.columns.len()
        );

        Ok(Box::new(GlpsolProblem {
            program: self.program.clone(),
            model: input.model.to_path_buf(),
            data: input.data.map(Path::to_path_buf),
            log: input.log.to_path_buf(),
            workdir: input.workdir.to_path_buf(),
            kind: header.kind,
            names: header.columns,
            solved_as: None,
            solution: None,
        }))
    }

    fn name(&self) -> &str {
        "GLPK (glpsol)"
    }
}

struct GlpsolProblem {
    program: PathBuf,
    model: PathBuf,
    data: Option<PathBuf>,
    log: PathBuf,
    workdir: PathBuf,
    kind: ProblemKind,
    names: Vec<String>,
    solved_as: Option<ProblemKind>,
    solution: Option<RawSolution>,
}

impl GlpsolProblem {
    fn solve(
        &mut self,
        method_args: &[&str],
        params: SolverParams,
        solved_as: ProblemKind,
    ) -> Result<(), SolverError> {
        let raw_file = self.workdir.join(RAW_SOLUTION_FILE);
        let report_file = self.workdir.join(REPORT_FILE);
        // Stale outputs must not be mistaken for this run's.
        for stale in [&raw_file, &report_file] {
            if stale.exists() {
                fs::remove_file(stale)?;
            }
        }

        let mut args = math_args(&self.model, self.data.as_deref());
        args.extend(method_args.iter().map(OsString::from));
        args.push("-w".into());
        args.push(raw_file.clone().into());
        args.push("-o".into());
        args.push(report_file.into());

        let run = run_glpsol(&self.program, &args)?;
        if params.msg_level != MessageLevel::Off || !run.success {
            append_log(&self.log, &run.output)?;
        }

        self.solved_as = Some(solved_as);
        self.solution = if raw_file.exists() {
            Some(parse_raw_solution(&fs::read_to_string(&raw_file)?)?)
        } else {
            None
        };

        if !run.success {
            log::warn!("glpsol exited with failure while solving {:?}", self.model);
            return Err(SolverError::Failed);
        }
        Ok(())
    }

    fn copy_report(&self, requested: ProblemKind, path: &Path) -> Result<(), SolverError> {
        match self.solved_as {
            None => Err(SolverError::NoSolution),
            Some(solved) if solved != requested => Err(SolverError::WrongWriter {
                requested: kind_label(requested),
                solved: kind_label(solved),
            }),
            Some(_) => {
                let report = self.workdir.join(REPORT_FILE);
                if !report.exists() {
                    return Err(SolverError::NoSolution);
                }
                fs::copy(report, path)?;
                Ok(())
            }
        }
    }
}

impl LoadedProblem for GlpsolProblem {
    fn kind(&self) -> ProblemKind {
        self.kind
    }

    fn simplex(&mut self, params: SolverParams) -> Result<(), SolverError> {
        let presolve = if params.presolve { "--presol" } else { "--nopresol" };
        let mut method = vec!["--simplex", presolve];
        if self.kind == ProblemKind::MixedInteger {
            method.push("--nomip");
        }
        self.solve(&method, params, ProblemKind::Continuous)
    }

    fn branch_and_cut(&mut self, params: SolverParams) -> Result<(), SolverError> {
        let method: &[&str] = if params.presolve { &["--intopt"] } else { &[] };
        self.solve(method, params, self.kind)
    }

    fn status(&self) -> Status {
        self.solution
            .as_ref()
            .map_or(Status::Undefined, |solution| solution.status)
    }

    fn objective_value(&self) -> f64 {
        self.solution
            .as_ref()
            .map_or(0.0, |solution| solution.objective)
    }

    fn columns(&self) -> Vec<(String, f64)> {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let value = self
                    .solution
                    .as_ref()
                    .and_then(|solution| solution.columns.get(&(idx + 1)).copied())
                    .unwrap_or(0.0);
                (name.clone(), value)
            })
            .collect()
    }

    fn write_solution(&self, path: &Path) -> Result<(), SolverError> {
        self.copy_report(ProblemKind::Continuous, path)
    }

    fn write_mip_solution(&self, path: &Path) -> Result<(), SolverError> {
        self.copy_report(ProblemKind::MixedInteger, path)
    }
}

struct GlpsolRun {
    success: bool,
    output: String,
}

fn math_args(model: &Path, data: Option<&Path>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--math".into(), model.into()];
    if let Some(data) = data {
        args.push("--data".into());
        args.push(data.into());
    }
    args
}

fn run_glpsol(program: &Path, args: &[OsString]) -> Result<GlpsolRun, SolverError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| SolverError::Unavailable {
            program: program.to_path_buf(),
            source,
        })?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(GlpsolRun {
        success: output.status.success(),
        output: strip_banner(&text),
    })
}

/// Drop the program banner and the echoed command line that open every run.
fn strip_banner(output: &str) -> String {
    let mut lines = output.lines().peekable();
    if lines.peek().is_some_and(|line| line.starts_with("GLPSOL")) {
        lines.next();
        if lines
            .peek()
            .is_some_and(|line| line.starts_with("Parameter(s) specified"))
        {
            lines.next();
            while lines.peek().is_some_and(|line| line.starts_with(' ')) {
                lines.next();
            }
        }
    }

    let mut stripped = String::with_capacity(output.len());
    for line in lines {
        stripped.push_str(line);
        stripped.push('\n');
    }
    stripped
}

fn append_log(log: &Path, text: &str) -> Result<(), SolverError> {
    let mut file = OpenOptions::new().create(true).append(true).open(log)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

fn kind_label(kind: ProblemKind) -> &'static str {
    match kind {
        ProblemKind::Continuous => "basic",
        ProblemKind::MixedInteger => "MIP",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_banner_removes_header_and_parameters() {
        let output = "GLPSOL--GLPK LP/MIP Solver 5.0\n\
                      Parameter(s) specified in the command line:\n \
                      --math /tmp/x/model.mod --check --wglp\n \
                      /tmp/x/problem.glp\n\
                      Reading model section from /tmp/x/model.mod...\n\
                      Model has been successfully generated\n";
        assert_eq!(
            strip_banner(output),
            "Reading model section from /tmp/x/model.mod...\n\
             Model has been successfully generated\n"
        );
    }

    #[test]
    fn test_strip_banner_keeps_output_without_banner() {
        assert_eq!(strip_banner("a\n b\n"), "a\n b\n");
    }

    #[test]
    fn test_math_args_with_data() {
        let args = math_args(Path::new("m.mod"), Some(Path::new("d.dat")));
        let expected: Vec<OsString> = ["--math", "m.mod", "--data", "d.dat"]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_load_given_missing_program_should_be_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.mod");
        fs::write(&model, "end;\n").unwrap();
        let log = dir.path().join("solver.log");

        let solver = GlpsolSolver::new(dir.path().join("no-such-glpsol"));
        let input = SolverInput {
            model: &model,
            data: None,
            log: &log,
            workdir: dir.path(),
        };
        assert!(matches!(
            solver.load(&input),
            Err(SolverError::Unavailable { .. })
        ));
        assert_eq!(solver.version(), None);
    }
}
