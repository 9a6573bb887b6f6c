//! Cyclic history of iterate/residual deltas for Anderson mixing.
//!
//! Holds up to `depth` pairs of columns (Δx, Δf) under a fixed memory
//! footprint. Columns are overwritten cyclically, so slot order is NOT
//! chronological once the buffer wraps; the mixing solve treats the populated
//! columns as an unordered set, and only the by-index pairing of `Δx`/`Δf`
//! matters.

use faer::{Mat, MatRef};
use faer::traits::ComplexField;
use num_traits::Float;

/// Fixed-capacity column store for the most recent delta pairs.
pub struct DeltaHistory<T> {
    dx: Mat<T>,
    df: Mat<T>,
    /// Slot holding the newest Δx; its Δf partner lands on the next record.
    col: usize,
    /// Number of complete (Δx, Δf) pairs, saturating at `depth`.
    pairs: usize,
    depth: usize,
}

impl<T: ComplexField + Float> DeltaHistory<T> {
    pub fn new(n: usize, depth: usize) -> Self {
        assert!(depth > 0, "history depth must be positive");
        Self {
            dx: Mat::zeros(n, depth),
            df: Mat::zeros(n, depth),
            col: 0,
            pairs: 0,
            depth,
        }
    }

    /// Record the very first iterate delta `x₁ − x₀` into slot 0.
    ///
    /// There is no residual delta yet; the partner column is written by the
    /// first `record_residual_delta` of the iteration loop.
    pub fn record_first_delta(&mut self, dx0: &[T]) {
        for i in 0..dx0.len() {
            self.dx[(i, 0)] = dx0[i];
        }
        self.col = 0;
    }

    /// Complete the newest pair with `f_new − f_old`.
    pub fn record_residual_delta(&mut self, fnew: &[T], fold: &[T]) {
        let c = self.col;
        for i in 0..fnew.len() {
            self.df[(i, c)] = fnew[i] - fold[i];
        }
        if self.pairs < self.depth {
            self.pairs += 1;
        }
    }

    /// Move the write index to the next cyclic slot. Called once per
    /// iteration, after the mixing solve.
    pub fn advance(&mut self) {
        self.col = (self.col + 1) % self.depth;
    }

    /// Overwrite the current slot's iterate delta with `x − xold`.
    pub fn record_iterate_delta(&mut self, x: &[T], xold: &[T]) {
        let c = self.col;
        for i in 0..x.len() {
            self.dx[(i, c)] = x[i] - xold[i];
        }
    }

    /// Number of currently valid (Δx, Δf) column pairs, `min(k, depth)`.
    pub fn pairs(&self) -> usize {
        self.pairs
    }

    pub fn iterate_delta(&self, j: usize) -> &[T] {
        self.dx.col_as_slice(j)
    }

    pub fn residual_delta(&self, j: usize) -> &[T] {
        self.df.col_as_slice(j)
    }

    /// The full Δf storage; only the first `pairs()` columns are valid.
    pub fn residual_deltas(&self) -> MatRef<'_, T> {
        self.df.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_grow_then_saturate_at_depth() {
        let mut h = DeltaHistory::<f64>::new(3, 2);
        h.record_first_delta(&[1.0, 0.0, 0.0]);
        assert_eq!(h.pairs(), 0);
        h.record_residual_delta(&[1.0, 1.0, 1.0], &[0.0, 0.0, 0.0]);
        assert_eq!(h.pairs(), 1);
        h.advance();
        h.record_iterate_delta(&[2.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        h.record_residual_delta(&[2.0, 2.0, 2.0], &[1.0, 1.0, 1.0]);
        assert_eq!(h.pairs(), 2);
        h.advance();
        h.record_residual_delta(&[3.0, 3.0, 3.0], &[2.0, 2.0, 2.0]);
        assert_eq!(h.pairs(), 2, "pairs must saturate at the depth");
    }

    #[test]
    fn wraparound_keeps_the_most_recent_deltas() {
        // depth 2, five iterations; the surviving columns must be the deltas of
        // iterations 4 and 5, not the oldest ones.
        let depth = 2;
        let mut h = DeltaHistory::<f64>::new(1, depth);
        h.record_first_delta(&[0.0]);
        let mut f_prev = 0.0;
        for k in 1..=5 {
            let f_k = k as f64;
            h.record_residual_delta(&[f_k], &[f_prev]);
            f_prev = f_k;
            h.advance();
            // iterate delta of step k carries the value 10 + k
            h.record_iterate_delta(&[10.0 + k as f64], &[0.0]);
        }
        assert_eq!(h.pairs(), 2);
        let dx: Vec<f64> = (0..depth).map(|j| h.iterate_delta(j)[0]).collect();
        let df: Vec<f64> = (0..depth).map(|j| h.residual_delta(j)[0]).collect();
        assert!(dx.contains(&14.0) && dx.contains(&15.0), "dx = {dx:?}");
        // residual deltas are all 1.0 here, but the slot that was written last
        // must pair iteration 5's Δf with iteration 4's Δx by index
        assert_eq!(df, vec![1.0; depth]);
    }
}
