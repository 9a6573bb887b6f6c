//! Vector kernels and a ready-made adapter for maps over flat vectors.
//!
//! This module implements [`InnerProduct`] for plain `Vec<T>` (with optional
//! Rayon parallelism) and provides [`VecMap`], a [`FixedPointMap`] adapter for
//! models whose map `g` can be expressed directly as a function of the flat
//! vector. Models with a richer native representation implement
//! [`FixedPointMap`] themselves.

use crate::core::traits::{FixedPointMap, InnerProduct};
use crate::error::AmError;
use num_traits::Float;

/// Implements inner product and norms for vectors, with optional Rayon
/// parallelism.
impl<T: Float + From<f64> + Send + Sync> InnerProduct<Vec<T>> for () {
    type Scalar = T;
    /// Computes the dot product of two vectors: `x^T y`.
    fn dot(&self, x: &Vec<T>, y: &Vec<T>) -> T {
        assert_eq!(x.len(), y.len(), "Vectors must have the same length");
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            x.as_slice()
                .par_iter()
                .zip(y.as_slice().par_iter())
                .map(|(xi, yi)| *xi * *yi)
                .reduce(|| T::zero(), |acc, v| acc + v)
        }
        #[cfg(not(feature = "rayon"))]
        {
            x.iter()
                .zip(y.iter())
                .map(|(xi, yi)| *xi * *yi)
                .fold(T::zero(), |acc, v| acc + v)
        }
    }
    /// Computes the Euclidean norm of a vector: `||x||_2`.
    fn norm(&self, x: &Vec<T>) -> T {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            x.as_slice()
                .par_iter()
                .map(|xi| *xi * *xi)
                .reduce(|| T::zero(), |acc, v| acc + v)
                .sqrt()
        }
        #[cfg(not(feature = "rayon"))]
        {
            x.iter()
                .map(|xi| *xi * *xi)
                .fold(T::zero(), |acc, v| acc + v)
                .sqrt()
        }
    }
    /// Computes `||x - y||_2` without materializing the difference.
    fn norm_diff(&self, x: &Vec<T>, y: &Vec<T>) -> T {
        assert_eq!(x.len(), y.len(), "Vectors must have the same length");
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            x.as_slice()
                .par_iter()
                .zip(y.as_slice().par_iter())
                .map(|(xi, yi)| (*xi - *yi) * (*xi - *yi))
                .reduce(|| T::zero(), |acc, v| acc + v)
                .sqrt()
        }
        #[cfg(not(feature = "rayon"))]
        {
            x.iter()
                .zip(y.iter())
                .map(|(xi, yi)| (*xi - *yi) * (*xi - *yi))
                .fold(T::zero(), |acc, v| acc + v)
                .sqrt()
        }
    }
}

/// Adapter for maps expressed directly on a flat vector.
///
/// Caches the last evaluation of `g` so that a `refresh` followed by
/// `apply_map` at the same point costs a single map evaluation.
pub struct VecMap<T, G> {
    x: Vec<T>,
    gx: Vec<T>,
    g: G,
    /// `gx` matches the current `x`
    fresh: bool,
}

impl<T, G> VecMap<T, G>
where
    T: Float + From<f64> + Send + Sync,
    G: Fn(&[T], &mut [T]),
{
    /// Wrap an initial iterate and a map `g` writing `g(x)` into its second
    /// argument.
    pub fn new(x0: Vec<T>, g: G) -> Self {
        let gx = vec![T::zero(); x0.len()];
        Self { x: x0, gx, g, fresh: false }
    }

    /// Hand the final iterate back to the caller.
    pub fn into_unknowns(self) -> Vec<T> {
        self.x
    }
}

impl<T, G> FixedPointMap<T> for VecMap<T, G>
where
    T: Float + From<f64> + Send + Sync,
    G: Fn(&[T], &mut [T]),
{
    fn refresh(&mut self) -> Result<(), AmError> {
        (self.g)(&self.x, &mut self.gx);
        self.fresh = true;
        Ok(())
    }

    fn residual_norm(&self) -> T {
        let ip = ();
        ip.norm_diff(&self.gx, &self.x)
    }

    fn apply_map(&mut self) -> Result<(), AmError> {
        if !self.fresh {
            (self.g)(&self.x, &mut self.gx);
        }
        self.x.copy_from_slice(&self.gx);
        self.fresh = false;
        Ok(())
    }

    fn unknowns(&self) -> &[T] {
        &self.x
    }

    fn unknowns_mut(&mut self) -> &mut [T] {
        self.fresh = false;
        &mut self.x
    }
}
