//! Timeframe sampling and trailing-window trimming.
//!
//! Weekly bars bucket by ISO week, monthly bars by calendar month. A bucket is
//! stamped with its last date, and each column takes the last finite close
//! inside the bucket (NaN if the bucket has none).

use chrono::{Datelike, Months, NaiveDate};
use rrg_core::{DataError, PriceColumn, PriceTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    /// Use prices exactly as loaded.
    #[default]
    Native,
    Weekly,
    Monthly,
}

impl Timeframe {
    /// Default trailing window: six months of weekly bars, two years of
    /// monthly bars, everything for native data.
    pub fn default_lookback_months(&self) -> Option<u32> {
        match self {
            Timeframe::Native => None,
            Timeframe::Weekly => Some(6),
            Timeframe::Monthly => Some(24),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Native => "native",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
        }
    }

    fn bucket(&self, date: NaiveDate) -> (i32, u32) {
        match self {
            Timeframe::Native => (date.year(), date.ordinal()),
            Timeframe::Weekly => {
                let week = date.iso_week();
                (week.year(), week.week())
            }
            Timeframe::Monthly => (date.year(), date.month()),
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(Timeframe::Native),
            "weekly" => Ok(Timeframe::Weekly),
            "monthly" => Ok(Timeframe::Monthly),
            other => Err(format!(
                "unknown timeframe '{other}' (expected native, weekly or monthly)"
            )),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resample a table to the given timeframe.
pub fn resample(table: &PriceTable, timeframe: Timeframe) -> Result<PriceTable, DataError> {
    if timeframe == Timeframe::Native {
        return Ok(table.clone());
    }

    // Row ranges [start, end) per bucket; dates are sorted so buckets are contiguous.
    let dates = table.dates();
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;
    for i in 1..=dates.len() {
        if i == dates.len() || timeframe.bucket(dates[i]) != timeframe.bucket(dates[start]) {
            ranges.push((start, i));
            start = i;
        }
    }

    let bucket_dates = ranges.iter().map(|&(_, end)| dates[end - 1]).collect();
    let columns = table
        .columns()
        .iter()
        .map(|column| {
            let closes = ranges
                .iter()
                .map(|&(s, e)| {
                    column.closes[s..e]
                        .iter()
                        .rev()
                        .find(|c| c.is_finite())
                        .copied()
                        .unwrap_or(f64::NAN)
                })
                .collect();
            PriceColumn::new(column.symbol.clone(), closes)
        })
        .collect();

    PriceTable::new(bucket_dates, columns)
}

/// Keep rows dated strictly after `last_date - months`.
pub fn trim_to_lookback(table: &PriceTable, months: u32) -> PriceTable {
    let Some(&last) = table.dates().last() else {
        return table.clone();
    };
    match last.checked_sub_months(Months::new(months)) {
        Some(cutoff) => table.retain_rows(|date| date > cutoff),
        None => table.clone(),
    }
}
