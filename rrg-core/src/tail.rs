//! Tail extraction: the last N defined (RS-Ratio, RS-Momentum) points.
//!
//! An instrument with fewer than N defined points is left out of the chart.
//! That is a normal outcome, not an error.

use crate::config::{PairingMode, RrgParams};
use crate::rs::RsSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point of an instrument's trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailPoint {
    /// 1 = oldest retained point, `tail_length` = most recent.
    pub position: usize,
    /// Date of the RS-Ratio sample.
    pub date: NaiveDate,
    /// Date of the RS-Momentum sample. Equal to `date` under joint pairing;
    /// may differ under positional pairing when the two series have
    /// different gaps.
    pub momentum_date: NaiveDate,
    pub rs_ratio: f64,
    pub rs_momentum: f64,
}

impl TailPoint {
    /// True when ratio and momentum were sampled on the same date.
    pub fn is_aligned(&self) -> bool {
        self.date == self.momentum_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailExtractor {
    tail_length: usize,
    pairing: PairingMode,
}

impl TailExtractor {
    pub fn new(tail_length: usize, pairing: PairingMode) -> Self {
        assert!(tail_length >= 1, "tail length must be >= 1");
        Self {
            tail_length,
            pairing,
        }
    }

    pub fn from_params(params: &RrgParams) -> Self {
        Self::new(params.tail_length, params.pairing)
    }

    pub fn tail_length(&self) -> usize {
        self.tail_length
    }

    /// Cut the trail for one instrument.
    ///
    /// `dates` is the table's date axis, index-aligned with `series`. Returns
    /// `None` when there are fewer than `tail_length` usable points.
    pub fn extract(&self, dates: &[NaiveDate], series: &RsSeries) -> Option<Vec<TailPoint>> {
        match self.pairing {
            PairingMode::Joint => self.extract_joint(dates, series),
            PairingMode::Positional => self.extract_positional(dates, series),
        }
    }

    fn extract_joint(&self, dates: &[NaiveDate], series: &RsSeries) -> Option<Vec<TailPoint>> {
        let defined: Vec<(NaiveDate, f64, f64)> = dates
            .iter()
            .zip(series.rs_ratio.iter().zip(&series.rs_momentum))
            .filter(|(_, (r, m))| !r.is_nan() && !m.is_nan())
            .map(|(d, (r, m))| (*d, *r, *m))
            .collect();

        let start = defined.len().checked_sub(self.tail_length)?;
        Some(
            defined[start..]
                .iter()
                .enumerate()
                .map(|(i, &(date, rs_ratio, rs_momentum))| TailPoint {
                    position: i + 1,
                    date,
                    momentum_date: date,
                    rs_ratio,
                    rs_momentum,
                })
                .collect(),
        )
    }

    fn extract_positional(
        &self,
        dates: &[NaiveDate],
        series: &RsSeries,
    ) -> Option<Vec<TailPoint>> {
        let ratio = compact(dates, &series.rs_ratio);
        let momentum = compact(dates, &series.rs_momentum);
        let ratio_start = ratio.len().checked_sub(self.tail_length)?;
        let momentum_start = momentum.len().checked_sub(self.tail_length)?;

        Some(
            ratio[ratio_start..]
                .iter()
                .zip(&momentum[momentum_start..])
                .enumerate()
                .map(|(i, (&(date, rs_ratio), &(momentum_date, rs_momentum)))| TailPoint {
                    position: i + 1,
                    date,
                    momentum_date,
                    rs_ratio,
                    rs_momentum,
                })
                .collect(),
        )
    }
}

/// Drop NaN entries, keeping each value's date.
pub fn compact(dates: &[NaiveDate], values: &[f64]) -> Vec<(NaiveDate, f64)> {
    dates
        .iter()
        .zip(values)
        .filter(|(_, v)| !v.is_nan())
        .map(|(d, v)| (*d, *v))
        .collect()
}
