//! Multi-symbol time alignment.
//!
//! Given close observations for multiple symbols, align them to a common
//! timeline. Missing closes become NaN (no forward-fill of price data).

use super::DataError;
use crate::domain::{PriceColumn, PriceTable};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// One symbol's raw `(date, close)` observations, in any order.
pub type CloseSeries = (String, Vec<(NaiveDate, f64)>);

/// Align multiple symbols to a common timeline.
///
/// The date axis is the union of all observed dates. Column order follows the
/// input order. If a symbol reports the same date twice, the later
/// observation wins.
pub fn align_closes(series: Vec<CloseSeries>) -> Result<PriceTable, DataError> {
    let all_dates: BTreeSet<NaiveDate> = series
        .iter()
        .flat_map(|(_, obs)| obs.iter().map(|(date, _)| *date))
        .collect();
    let dates: Vec<NaiveDate> = all_dates.into_iter().collect();

    let columns = series
        .into_iter()
        .map(|(symbol, obs)| {
            let by_date: HashMap<NaiveDate, f64> = obs.into_iter().collect();
            let closes = dates
                .iter()
                .map(|date| by_date.get(date).copied().unwrap_or(f64::NAN))
                .collect();
            PriceColumn::new(symbol, closes)
        })
        .collect();

    PriceTable::new(dates, columns)
}
