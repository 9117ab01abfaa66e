//! RS-Ratio and RS-Momentum from a raw ratio series.
//!
//! RS-Ratio    = rolling mean(ratio, smoothing_period) * 100
//! RS-Momentum = ratio[t] / ratio[t - momentum_period] - 1
//!
//! Momentum is taken on the unsmoothed ratio. Both outputs keep the input's
//! length and indexing; undefined points stay in place as NaN.

use crate::config::RrgParams;
use crate::indicators::{PctChange, RollingMean, SeriesTransform};

/// Scale applied to the smoothed ratio.
pub const RATIO_SCALE: f64 = 100.0;

/// Index-aligned RS-Ratio / RS-Momentum pair for one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct RsSeries {
    pub rs_ratio: Vec<f64>,
    pub rs_momentum: Vec<f64>,
}

impl RsSeries {
    pub fn len(&self) -> usize {
        self.rs_ratio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rs_ratio.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SmoothedRatioMomentum {
    smoothing: RollingMean,
    momentum: PctChange,
}

impl SmoothedRatioMomentum {
    /// Both periods must be >= 1; callers validate `RrgParams` first.
    pub fn new(smoothing_period: usize, momentum_period: usize) -> Self {
        Self {
            smoothing: RollingMean::new(smoothing_period),
            momentum: PctChange::new(momentum_period),
        }
    }

    pub fn from_params(params: &RrgParams) -> Self {
        Self::new(params.smoothing_period, params.momentum_period)
    }

    pub fn compute(&self, ratio: &[f64]) -> RsSeries {
        let rs_ratio = self
            .smoothing
            .compute(ratio)
            .into_iter()
            .map(|v| v * RATIO_SCALE)
            .collect();
        RsSeries {
            rs_ratio,
            rs_momentum: self.momentum.compute(ratio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, defined_count, DEFAULT_EPSILON};

    #[test]
    fn unsmoothed_ratio_is_scaled() {
        let rs = SmoothedRatioMomentum::new(1, 2).compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(rs.rs_ratio, vec![100.0, 200.0, 300.0, 400.0, 500.0]);
    }

    #[test]
    fn momentum_uses_raw_ratio() {
        let rs = SmoothedRatioMomentum::new(3, 1).compute(&[1.0, 2.0, 4.0]);
        assert_approx(rs.rs_ratio[2], 700.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(rs.rs_momentum[1], 1.0, DEFAULT_EPSILON);
        assert_approx(rs.rs_momentum[2], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn lengths_preserved() {
        let ratio = [1.0, 1.1, f64::NAN, 1.2, 1.3, 1.25];
        let rs = SmoothedRatioMomentum::new(2, 3).compute(&ratio);
        assert_eq!(rs.rs_ratio.len(), ratio.len());
        assert_eq!(rs.rs_momentum.len(), ratio.len());
    }

    #[test]
    fn defined_ratio_count_matches_window() {
        let ratio: Vec<f64> = (1..=10).map(f64::from).collect();
        let rs = SmoothedRatioMomentum::new(4, 2).compute(&ratio);
        assert_eq!(defined_count(&rs.rs_ratio), 10 - 4 + 1);
        assert_eq!(defined_count(&rs.rs_momentum), 10 - 2);
    }

    #[test]
    fn zero_lagged_ratio_is_gap() {
        let rs = SmoothedRatioMomentum::new(1, 1).compute(&[0.0, 1.0]);
        assert!(rs.rs_momentum[1].is_nan());
    }
}
