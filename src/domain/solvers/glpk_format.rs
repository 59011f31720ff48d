//! Readers for the GLPK plain-text files `glpsol` writes: the problem
//! header of a `--wglp` file and a raw solution from `-w`.

use std::collections::HashMap;

use crate::error::SolverError;
use crate::models::{ProblemKind, Status};

#[derive(Debug, Clone, PartialEq)]
pub struct ProblemHeader {
    pub kind: ProblemKind,
    /// Column names in column order.
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    pub status: Status,
    pub objective: f64,
    /// Primal value by 1-based column number.
    pub columns: HashMap<usize, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolutionLayout {
    Basic,
    InteriorPoint,
    Mip,
}

pub fn parse_problem(text: &str) -> Result<ProblemHeader, SolverError> {
    let mut kind = None;
    let mut columns: Vec<String> = Vec::new();

    for line in text.lines() {
        let fields: Vec<&str> = line.splitn(4, char::is_whitespace).collect();
        match fields.as_slice() {
            ["p", class, rest @ ..] => {
                kind = Some(match *class {
                    "lp" => ProblemKind::Continuous,
                    "mip" => ProblemKind::MixedInteger,
                    other => return Err(format_error("problem class", other)),
                });
                // rest = [direction, "m n nnz"]
                let counts: Vec<&str> = rest
                    .get(1)
                    .map(|s| s.split_whitespace().collect())
                    .unwrap_or_default();
                let n = counts
                    .get(1)
                    .ok_or_else(|| format_error("problem line", line))
                    .and_then(|n| parse_number::<usize>(n))?;
                columns = (1..=n).map(|j| format!("x{}", j)).collect();
            }
            ["n", "j", j, name] => {
                let j: usize = parse_number(j)?;
                let slot = j
                    .checked_sub(1)
                    .and_then(|idx| columns.get_mut(idx))
                    .ok_or_else(|| format_error("column number", line))?;
                *slot = name.trim_end().to_string();
            }
            _ => {}
        }
    }

    let kind = kind.ok_or_else(|| SolverError::Format("missing problem line".to_string()))?;
    Ok(ProblemHeader { kind, columns })
}

pub fn parse_raw_solution(text: &str) -> Result<RawSolution, SolverError> {
    let mut header: Option<(SolutionLayout, Status, f64)> = None;
    let mut columns = HashMap::new();

    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            ["s", "bas", _m, _n, primal, dual, obj] => {
                let status = basic_status(primal, dual)?;
                header = Some((SolutionLayout::Basic, status, parse_number(obj)?));
            }
            ["s", "ipt", _m, _n, stat, obj] => {
                let status = solution_status(stat)?;
                header = Some((SolutionLayout::InteriorPoint, status, parse_number(obj)?));
            }
            ["s", "mip", _m, _n, stat, obj] => {
                let status = solution_status(stat)?;
                header = Some((SolutionLayout::Mip, status, parse_number(obj)?));
            }
            ["j", j, rest @ ..] => {
                let layout = header
                    .map(|(layout, _, _)| layout)
                    .ok_or_else(|| format_error("column line before solution line", line))?;
                // bas: j st prim dual | ipt: j prim dual | mip: j prim
                let prim = match layout {
                    SolutionLayout::Basic => rest.get(1),
                    SolutionLayout::InteriorPoint | SolutionLayout::Mip => rest.first(),
                }
                .ok_or_else(|| format_error("column line", line))?;
                columns.insert(parse_number(j)?, parse_number(prim)?);
            }
            _ => {}
        }
    }

    let (_, status, objective) =
        header.ok_or_else(|| SolverError::Format("missing solution line".to_string()))?;
    Ok(RawSolution {
        status,
        objective,
        columns,
    })
}

/// Combine primal and dual basic-solution status the way `glp_get_status` does.
fn basic_status(primal: &str, dual: &str) -> Result<Status, SolverError> {
    let primal = solution_status(primal)?;
    let dual = solution_status(dual)?;
    Ok(match (primal, dual) {
        (Status::Feasible, Status::Feasible) => Status::Optimal,
        (Status::Feasible, Status::NoFeasible) => Status::Unbounded,
        (primal, _) => primal,
    })
}

fn solution_status(tag: &str) -> Result<Status, SolverError> {
    match tag {
        "u" => Ok(Status::Undefined),
        "f" => Ok(Status::Feasible),
        "i" => Ok(Status::Infeasible),
        "n" => Ok(Status::NoFeasible),
        "o" => Ok(Status::Optimal),
        other => Err(format_error("status", other)),
    }
}

fn parse_number<T: std::str::FromStr>(field: &str) -> Result<T, SolverError> {
    field.parse().map_err(|_| format_error("number", field))
}

fn format_error(what: &str, found: &str) -> SolverError {
    SolverError::Format(format!("unexpected {}: {}", what, found))
}
