pub mod glpk_format;
pub mod glpsol_solver;

#[cfg(test)]
pub(crate) mod scripted_solver;

pub use glpsol_solver::GlpsolSolver;
