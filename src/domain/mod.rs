pub mod log_filter;
pub mod solve;
pub mod solver;
pub mod solvers;
pub mod store;
pub mod validate;
