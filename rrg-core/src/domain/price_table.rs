//! Aligned closing prices on a shared date axis.

use crate::data::DataError;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Closing prices for one symbol. Missing observations are `f64::NAN`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceColumn {
    pub symbol: String,
    pub closes: Vec<f64>,
}

impl PriceColumn {
    pub fn new(symbol: impl Into<String>, closes: Vec<f64>) -> Self {
        Self {
            symbol: symbol.into(),
            closes,
        }
    }

    /// True when every close is a finite number.
    pub fn is_complete(&self) -> bool {
        self.closes.iter().all(|c| c.is_finite())
    }
}

/// Symbol → closes, all columns sharing one strictly increasing date axis.
///
/// Column order is significant: it is the "table order" used when a missing
/// benchmark has to be replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    columns: Vec<PriceColumn>,
}

impl PriceTable {
    /// Build a table, checking the date axis and column shapes.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<PriceColumn>) -> Result<Self, DataError> {
        if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(DataError::UnsortedDates {
                previous: w[0],
                next: w[1],
            });
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.symbol.as_str()) {
                return Err(DataError::DuplicateSymbol {
                    symbol: column.symbol.clone(),
                });
            }
            if column.closes.len() != dates.len() {
                return Err(DataError::LengthMismatch {
                    symbol: column.symbol.clone(),
                    expected: dates.len(),
                    actual: column.closes.len(),
                });
            }
        }

        Ok(Self { dates, columns })
    }

    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[PriceColumn] {
        &self.columns
    }

    /// Number of rows on the date axis.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.symbol.as_str()).collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.columns.iter().any(|c| c.symbol == symbol)
    }

    pub fn closes(&self, symbol: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.symbol == symbol)
            .map(|c| c.closes.as_slice())
    }

    /// Keep the columns for which `keep` returns true, in table order.
    pub fn retain_columns(&self, mut keep: impl FnMut(&PriceColumn) -> bool) -> Self {
        Self {
            dates: self.dates.clone(),
            columns: self.columns.iter().filter(|c| keep(c)).cloned().collect(),
        }
    }

    /// Keep the rows for which `keep(date)` returns true.
    pub fn retain_rows(&self, mut keep: impl FnMut(NaiveDate) -> bool) -> Self {
        let mask: Vec<bool> = self.dates.iter().map(|d| keep(*d)).collect();
        Self {
            dates: apply_mask(&self.dates, &mask),
            columns: self
                .columns
                .iter()
                .map(|c| PriceColumn::new(c.symbol.clone(), apply_mask(&c.closes, &mask)))
                .collect(),
        }
    }
}

fn apply_mask<T: Copy>(values: &[T], mask: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(mask)
        .filter(|(_, &m)| m)
        .map(|(v, _)| *v)
        .collect()
}
