//! Core traits for andermix.

use crate::error::AmError;

/// Contract between the solver and the model whose fixed point is sought.
///
/// The model owns its native state representation; the solver only ever sees
/// the flat vector of unknowns exposed by [`FixedPointMap::unknowns`]. Writes
/// through [`FixedPointMap::unknowns_mut`] must be visible to the model on the
/// next `refresh`, so the flattened view and the native state never diverge.
pub trait FixedPointMap<T> {
    /// Recompute residual-dependent quantities after the unknowns changed.
    fn refresh(&mut self) -> Result<(), AmError>;
    /// Scalar norm driving the convergence test. Valid after the last `refresh`.
    fn residual_norm(&self) -> T;
    /// Advance the model by one application of `g`, then re-flatten the
    /// unknowns.
    fn apply_map(&mut self) -> Result<(), AmError>;
    /// Flat view of the unknowns.
    fn unknowns(&self) -> &[T];
    /// Mutable flat view of the unknowns.
    fn unknowns_mut(&mut self) -> &mut [T];
}

/// Inner products & norms.
pub trait InnerProduct<V> {
    /// Associated scalar type.
    type Scalar: Copy + PartialOrd + From<f64>;
    /// Compute dot(x, y).
    fn dot(&self, x: &V, y: &V) -> Self::Scalar;
    /// Compute ‖x‖₂.
    fn norm(&self, x: &V) -> Self::Scalar;
    /// Compute ‖x − y‖₂.
    fn norm_diff(&self, x: &V, y: &V) -> Self::Scalar;
}
