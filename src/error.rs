//! Error types for the notebook commands.

use std::path::PathBuf;
use thiserror::Error;

/// Lookup failures inside an initialized artifact store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Model '{0}' does not exist.")]
    ModelNotFound(String),

    #[error("Data '{0}' does not exist.")]
    DataNotFound(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// The session never had a store command run against it.
    #[error("Model and data storage is missing. Try storing your model and data again.")]
    StoreMissing,
}

/// Failures at the solver boundary.
#[derive(Error, Debug)]
pub enum SolverError {
    /// The solver program could not be started
    #[error("Cannot run solver program {program:?}: {source}")]
    Unavailable {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model or data could not be translated; diagnostics are in the log
    #[error("Model or data could not be loaded")]
    Load,

    /// A solver output file did not have the expected layout
    #[error("Malformed solver output: {0}")]
    Format(String),

    /// The solve run itself failed; diagnostics are in the log
    #[error("Solver run failed")]
    Failed,

    /// No solution report is available to write
    #[error("Solver produced no solution report")]
    NoSolution,

    /// The requested writer does not match the solved problem kind
    #[error("Cannot write a {requested} solution for a {solved} problem")]
    WrongWriter {
        requested: &'static str,
        solved: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SolveError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Loading failed; `log` holds the presented solver diagnostics.
    #[error("{log}")]
    Load { log: String },

    /// The solve run failed after loading; `log` holds the presented
    /// diagnostics. A named result has already been published.
    #[error("{log}{source}.")]
    Run {
        log: String,
        #[source]
        source: SolverError,
    },

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),

    #[error("Unknown command '{0}'.")]
    UnknownCommand(String),

    #[error("Invalid {kind} name '{name}'.")]
    InvalidName { kind: &'static str, name: String },

    #[error("Result '{0}' does not exist.")]
    ResultNotFound(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Solve(#[from] SolveError),
}
