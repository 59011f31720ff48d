use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::domain::log_filter::{present_log, Relabel};
use crate::domain::solver::{Solver, SolverInput, SolverParams};
use crate::error::{SolveError, SolverError};
use crate::models::{MessageLevel, ProblemKind, SolveOptions, SolveRequest, SolveResult};
use crate::session::Session;

const MODEL_FILE: &str = "model.mod";
const DATA_FILE: &str = "data.dat";
const LOG_FILE: &str = "solver.log";
const REPORT_FILE: &str = "report.txt";

/// Name under which inline `%%gmpl` cells appear in solver diagnostics.
pub const INLINE_MODEL_NAME: &str = "cell";

const SEPARATOR: &str =
    "================================================================================";

struct NamedText<'a> {
    name: &'a str,
    text: &'a str,
}

/// Solve a stored model (and optional stored data) and return the text to
/// display. A result is published under `request.options.result` once the
/// solver has run, whatever the status and even if the run failed.
pub fn solve(
    solver: &dyn Solver,
    session: &mut Session,
    request: &SolveRequest,
    scratch_root: &Path,
) -> Result<String, SolveError> {
    let store = session.store()?;
    let model = NamedText {
        name: &request.model,
        text: store.show_model(&request.model)?,
    };
    let data = match &request.data {
        Some(name) => Some(NamedText {
            name,
            text: store.show_data(name)?,
        }),
        None => None,
    };

    let run = run_solver(solver, &model, data.as_ref(), &request.options, scratch_root)?;
    finish(session, &request.options, run)
}

/// Solve a model given directly as text, bypassing the artifact store.
pub fn solve_inline(
    solver: &dyn Solver,
    session: &mut Session,
    text: &str,
    options: &SolveOptions,
    scratch_root: &Path,
) -> Result<String, SolveError> {
    let mut text = text.to_string();
    text.push('\n');
    let model = NamedText {
        name: INLINE_MODEL_NAME,
        text: &text,
    };

    let run = run_solver(solver, &model, None, options, scratch_root)?;
    finish(session, options, run)
}

struct SolverRun {
    display: String,
    result: SolveResult,
    failure: Option<SolverError>,
}

/// Publish the result of a solver run, then report the run's outcome.
fn finish(
    session: &mut Session,
    options: &SolveOptions,
    run: SolverRun,
) -> Result<String, SolveError> {
    if let Some(name) = &options.result {
        log::debug!("Publishing result '{}' ({:?})", name, run.result.status);
        session.publish(name.clone(), run.result);
    }
    match run.failure {
        None => Ok(run.display),
        Some(source) => Err(SolveError::Run {
            log: run.display,
            source,
        }),
    }
}

fn run_solver(
    solver: &dyn Solver,
    model: &NamedText<'_>,
    data: Option<&NamedText<'_>>,
    options: &SolveOptions,
    scratch_root: &Path,
) -> Result<SolverRun, SolveError> {
    // Everything below lives in `workdir`, removed when it goes out of scope.
    let workdir = tempfile::Builder::new()
        .prefix("gmpl-solve-")
        .tempdir_in(scratch_root)?;

    let model_path = workdir.path().join(MODEL_FILE);
    fs::write(&model_path, model.text)?;

    let data_path = workdir.path().join(DATA_FILE);
    if let Some(data) = data {
        let mut text = data.text.to_string();
        text.push('\n');
        fs::write(&data_path, text)?;
    }

    let log_path = workdir.path().join(LOG_FILE);
    let input = SolverInput {
        model: &model_path,
        data: data.map(|_| data_path.as_path()),
        log: &log_path,
        workdir: workdir.path(),
    };

    let model_label = format!("Model '{}'", model.name);
    let data_label = data.map(|data| format!("Data '{}'", data.name));
    let mut relabels = vec![Relabel {
        path: &model_path,
        label: &model_label,
    }];
    if let Some(label) = &data_label {
        relabels.push(Relabel {
            path: &data_path,
            label: label.as_str(),
        });
    }

    log::info!(
        "Solving model '{}'{} with {}",
        model.name,
        data.map(|data| format!(" on data '{}'", data.name))
            .unwrap_or_default(),
        solver.name()
    );

    let mut problem = match solver.load(&input) {
        Ok(problem) => problem,
        Err(SolverError::Load) => {
            // Load diagnostics are shown even with `nolog`.
            let log = presented_log(&log_path, &relabels);
            log::info!("Model '{}' failed to load", model.name);
            return Err(SolveError::Load { log });
        }
        Err(err) => return Err(err.into()),
    };

    let kind = problem.kind();
    let solved = match kind {
        ProblemKind::Continuous => problem.simplex(SolverParams {
            presolve: options.presolve,
            msg_level: MessageLevel::All,
        }),
        ProblemKind::MixedInteger => problem.branch_and_cut(SolverParams {
            presolve: true,
            msg_level: MessageLevel::All,
        }),
    };

    let status = problem.status();
    let variables: BTreeMap<String, f64> = problem.columns().into_iter().collect();
    let result = SolveResult::new(status, problem.objective_value(), variables);

    if let Err(source) = solved {
        // Run diagnostics are shown even with `nolog`.
        log::info!("Model '{}' failed to solve: {}", model.name, source);
        return Ok(SolverRun {
            display: presented_log(&log_path, &relabels),
            result,
            failure: Some(source),
        });
    }
    log::info!("Model '{}' solved with status {:?}", model.name, status);

    let mut display = String::new();
    if !options.nolog {
        display.push_str(&presented_log(&log_path, &relabels));

        let report_path = workdir.path().join(REPORT_FILE);
        let written = match kind {
            ProblemKind::Continuous => problem.write_solution(&report_path),
            ProblemKind::MixedInteger => problem.write_mip_solution(&report_path),
        };
        let report =
            written.and_then(|()| fs::read_to_string(&report_path).map_err(SolverError::from));
        display.push_str(SEPARATOR);
        display.push('\n');
        match report {
            Ok(report) => display.push_str(&report),
            Err(err) => {
                log::warn!("No report for model '{}': {}", model.name, err);
                display.push_str(&format!("{}.\n", err));
            }
        }
    }

    Ok(SolverRun {
        display,
        result,
        failure: None,
    })
}

/// The solver log as shown to the user; an unreadable log shows as empty.
fn presented_log(path: &Path, relabels: &[Relabel<'_>]) -> String {
    if !path.exists() {
        return String::new();
    }
    match fs::read_to_string(path) {
        Ok(text) => present_log(&text, relabels),
        Err(err) => {
            log::warn!("Cannot read solver log {:?}: {}", path, err);
            String::new()
        }
    }
}
