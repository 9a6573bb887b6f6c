//! Fixed-point solver interfaces.

use crate::core::traits::FixedPointMap;
use crate::utils::convergence::SolveStats;

/// Common interface for fixed-point iteration schemes.
pub trait FixedPointSolver<S, T>
where
    S: FixedPointMap<T>,
{
    type Error;
    /// Drive `state` toward `x* = g(x*)`, mutating its unknowns in place.
    /// Returns iteration stats (including convergence info).
    fn solve(&mut self, state: &mut S) -> Result<SolveStats<T>, Self::Error>;
}

pub mod anderson;
pub use anderson::AndersonSolver;

pub mod history;
pub use history::DeltaHistory;

pub mod mixing;
pub use mixing::MixingWorkspace;
