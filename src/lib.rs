//! Notebook commands for GNU MathProg models: store model and data texts
//! under names per session, solve them with GLPK, and publish the results.

pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod routes;
pub mod session;
