//! Rolling arithmetic mean.
//!
//! Lookback: period - 1 (first valid value at index period-1). A window that
//! contains a NaN yields NaN; partial windows are never averaged.
//!
//! Each window is summed left to right from scratch instead of with a running
//! add/subtract, so results do not depend on how many windows came before.

use super::SeriesTransform;

#[derive(Debug, Clone)]
pub struct RollingMean {
    period: usize,
    name: String,
}

impl RollingMean {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "rolling mean period must be >= 1");
        Self {
            period,
            name: format!("rolling_mean_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl SeriesTransform for RollingMean {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period {
            return result;
        }

        for (i, window) in values.windows(self.period).enumerate() {
            let mut sum = 0.0;
            for v in window {
                sum += *v;
            }
            // NaN anywhere in the window poisons the sum.
            result[i + self.period - 1] = sum / self.period as f64;
        }

        result
    }
}
