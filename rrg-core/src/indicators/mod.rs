//! Series transforms.
//!
//! A transform maps a numeric series to a series of the same length. The first
//! `lookback()` values are `f64::NAN` (warmup), and NaN inputs propagate as
//! NaN outputs rather than raising.

pub mod pct_change;
pub mod rolling_mean;

pub use pct_change::PctChange;
pub use rolling_mean::RollingMean;

/// Index-preserving transform over a single `f64` series.
///
/// # Look-ahead guard
/// No output at index t may depend on input at t+1 or later.
pub trait SeriesTransform: Send + Sync {
    /// Human-readable name (e.g. "rolling_mean_10").
    fn name(&self) -> &str;

    /// Number of leading outputs that are always NaN.
    fn lookback(&self) -> usize;

    /// Returns a `Vec<f64>` of the same length as `values`.
    fn compute(&self, values: &[f64]) -> Vec<f64>;
}

/// Count the defined (non-NaN) entries of a series.
pub fn defined_count(values: &[f64]) -> usize {
    values.iter().filter(|v| !v.is_nan()).count()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for transform tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
