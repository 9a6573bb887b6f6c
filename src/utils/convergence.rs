//! Convergence tracking & tolerance checks for fixed-point iteration.

/// Stopping criteria: relative/absolute tolerance and iteration cap.
pub struct Convergence<T> {
    pub rtol: T,
    pub atol: T,
    pub max_iters: usize,
}

#[derive(Clone, Debug)]
pub struct SolveStats<T> {
    pub iterations: usize,
    pub final_residual: T,
    pub initial_residual: T,
    pub converged: bool,
}

impl<T: Copy + num_traits::Float> Convergence<T> {
    /// Absolute stopping threshold for a run that started at `res0_norm`:
    /// `max(rtol · res0, atol)`.
    pub fn threshold(&self, res0_norm: T) -> T {
        let rel = self.rtol * res0_norm;
        if rel > self.atol { rel } else { self.atol }
    }

    /// Returns (should_stop, stats) given current `res_norm` and iteration `i`.
    pub fn check(&self, res_norm: T, res0_norm: T, i: usize) -> (bool, SolveStats<T>) {
        let converged = res_norm <= self.threshold(res0_norm);
        (
            converged || i >= self.max_iters,
            SolveStats {
                iterations: i,
                final_residual: res_norm,
                initial_residual: res0_norm,
                converged,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_takes_the_larger_tolerance() {
        let conv = Convergence { rtol: 1e-2, atol: 1e-8, max_iters: 10 };
        assert_eq!(conv.threshold(1.0), 1e-2);
        assert_eq!(conv.threshold(1e-7), 1e-8);
    }

    #[test]
    fn cap_stops_without_claiming_convergence() {
        let conv = Convergence { rtol: 0.0, atol: 1e-12, max_iters: 5 };
        let (stop, stats) = conv.check(1.0, 1.0, 5);
        assert!(stop);
        assert!(!stats.converged);
        assert_eq!(stats.iterations, 5);
    }
}
