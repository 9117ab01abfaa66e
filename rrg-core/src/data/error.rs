use chrono::NaiveDate;
use thiserror::Error;

/// Structured errors for price table construction and validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("no valid price data for any requested symbol ({requested:?})")]
    NoValidData { requested: Vec<String> },

    #[error("column '{symbol}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        symbol: String,
        expected: usize,
        actual: usize,
    },

    #[error("date axis must be strictly increasing ({previous} followed by {next})")]
    UnsortedDates { previous: NaiveDate, next: NaiveDate },

    #[error("symbol '{symbol}' appears more than once")]
    DuplicateSymbol { symbol: String },
}
