//! andermix: Anderson mixing for fixed-point iteration over Faer
//!
//! This crate accelerates fixed-point iterations `x ← g(x)` toward `x* = g(x*)`
//! by mixing a bounded window of past iterates and residuals (Anderson
//! acceleration). The per-iteration least-squares mixing step is solved through
//! Faer's column-pivoted QR, which keeps the method robust when the recorded
//! history becomes linearly dependent.

pub mod core;
pub mod error;
pub mod solver;
pub mod utils;

// Re-exports for convenience
pub use crate::core::*;
pub use crate::error::*;
pub use crate::solver::*;
pub use crate::utils::*;

// Re-export SolveStats at the crate root for convenience
pub use crate::utils::convergence::SolveStats;
