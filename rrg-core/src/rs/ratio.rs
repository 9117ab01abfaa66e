//! Relative strength ratio: instrument close / benchmark close.

use crate::data::AlignedUniverse;
use crate::domain::Instrument;

/// Per-instrument ratio series, index-aligned with the price table.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioSeries {
    pub instrument: Instrument,
    pub values: Vec<f64>,
}

/// Element-wise `instrument / benchmark`.
///
/// A NaN on either side or a zero benchmark close yields NaN at that index.
/// Both slices come from one table and share its length.
pub fn ratio_series(instrument: &[f64], benchmark: &[f64]) -> Vec<f64> {
    debug_assert_eq!(instrument.len(), benchmark.len());
    instrument
        .iter()
        .zip(benchmark)
        .map(|(&price, &base)| {
            if price.is_nan() || base.is_nan() || base == 0.0 {
                f64::NAN
            } else {
                price / base
            }
        })
        .collect()
}

/// Ratio series for every instrument in the validated universe, in
/// configuration order.
pub fn compute_ratios(universe: &AlignedUniverse) -> Vec<RatioSeries> {
    let benchmark = universe.benchmark_closes();
    universe
        .instruments
        .iter()
        .filter_map(|instrument| {
            universe
                .table
                .closes(&instrument.symbol)
                .map(|closes| RatioSeries {
                    instrument: instrument.clone(),
                    values: ratio_series(closes, benchmark),
                })
        })
        .collect()
}
