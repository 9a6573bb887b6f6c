//! Support utilities for the fixed-point solvers.

pub mod convergence;

pub use convergence::{Convergence, SolveStats};
