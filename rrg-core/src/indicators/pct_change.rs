//! Percent change over a fixed lag.
//!
//! pct[t] = x[t] / x[t-period] - 1
//! Lookback: period. NaN when either side is NaN or the lagged value is zero.

use super::SeriesTransform;

#[derive(Debug, Clone)]
pub struct PctChange {
    period: usize,
    name: String,
}

impl PctChange {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "pct change period must be >= 1");
        Self {
            period,
            name: format!("pct_change_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl SeriesTransform for PctChange {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let mut result = vec![f64::NAN; n];

        for i in self.period..n {
            let prev = values[i - self.period];
            let curr = values[i];
            if prev.is_nan() || curr.is_nan() || prev == 0.0 {
                result[i] = f64::NAN;
            } else {
                result[i] = curr / prev - 1.0;
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn pct_change_period_1() {
        let result = PctChange::new(1).compute(&[100.0, 110.0, 121.0]);
        assert!(result[0].is_nan());
        assert_approx(result[1], 0.1, DEFAULT_EPSILON);
        assert_approx(result[2], 0.1, DEFAULT_EPSILON);
    }

    #[test]
    fn pct_change_period_2() {
        let result = PctChange::new(2).compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 2.0, DEFAULT_EPSILON);
        assert_approx(result[3], 1.0, DEFAULT_EPSILON);
        assert_approx(result[4], 2.0 / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn negative_change() {
        let result = PctChange::new(1).compute(&[100.0, 90.0]);
        assert_approx(result[1], -0.1, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_denominator_is_nan() {
        let result = PctChange::new(1).compute(&[0.0, 5.0, 10.0]);
        assert!(result[1].is_nan());
        assert!(!result[1].is_infinite());
        assert_approx(result[2], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn nan_propagation() {
        let result = PctChange::new(1).compute(&[100.0, f64::NAN, 120.0]);
        assert!(result[1].is_nan()); // curr NaN
        assert!(result[2].is_nan()); // prev NaN
    }

    #[test]
    fn lag_beyond_series_is_all_nan() {
        let result = PctChange::new(5).compute(&[1.0, 2.0, 3.0]);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn lookback() {
        assert_eq!(PctChange::new(14).lookback(), 14);
    }
}
