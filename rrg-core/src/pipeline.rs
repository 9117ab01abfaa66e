//! Pipeline entry point: aligned prices in, tails and dividers out.
//!
//! prices → SeriesAligner → ratio → RS-Ratio / RS-Momentum → tails → dividers
//!
//! Bad parameters are an `Err`. "Nothing usable" and "nothing survived the
//! tail cut" are ordinary [`RrgOutcome`] variants the caller can render as a
//! notice.

use crate::config::{ConfigError, RrgParams};
use crate::data::{BenchmarkResolution, DataError, DroppedSymbol, SeriesAligner};
use crate::domain::{Instrument, InstrumentSet, PriceTable};
use crate::fingerprint::RunFingerprint;
use crate::quadrant::{Direction, Quadrant, QuadrantStatistics};
use crate::rs::{compute_ratios, RsSeries, SmoothedRatioMomentum};
use crate::tail::{TailExtractor, TailPoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RrgError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// One instrument's trail plus what a renderer needs to draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentTail {
    pub name: String,
    pub symbol: String,
    /// Oldest first; positions run 1..=tail_length.
    pub points: Vec<TailPoint>,
    /// Last movement; absent when the tail has a single point.
    pub direction: Option<Direction>,
    /// Quadrant of the most recent point.
    pub quadrant: Quadrant,
}

impl InstrumentTail {
    pub fn latest(&self) -> Option<&TailPoint> {
        self.points.last()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RrgReport {
    pub params: RrgParams,
    pub benchmark: BenchmarkResolution,
    pub dropped: Vec<DroppedSymbol>,
    /// Surviving instruments in configuration order.
    pub tails: Vec<InstrumentTail>,
    /// Names of instruments left out for lack of history.
    pub excluded: Vec<String>,
    pub statistics: QuadrantStatistics,
    /// Last date on the price axis.
    pub as_of: Option<NaiveDate>,
    pub fingerprint: RunFingerprint,
}

impl RrgReport {
    pub fn tail(&self, name: &str) -> Option<&InstrumentTail> {
        self.tails.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RrgOutcome {
    Chart(RrgReport),
    /// Valid prices exist but no instrument has `tail_length` usable points.
    InsufficientData {
        benchmark: BenchmarkResolution,
        dropped: Vec<DroppedSymbol>,
        excluded: Vec<String>,
    },
    /// No requested symbol has a complete price column.
    NoValidData { requested: Vec<String> },
}

impl RrgOutcome {
    pub fn report(&self) -> Option<&RrgReport> {
        match self {
            RrgOutcome::Chart(report) => Some(report),
            _ => None,
        }
    }

    pub fn benchmark(&self) -> Option<&BenchmarkResolution> {
        match self {
            RrgOutcome::Chart(report) => Some(&report.benchmark),
            RrgOutcome::InsufficientData { benchmark, .. } => Some(benchmark),
            RrgOutcome::NoValidData { .. } => None,
        }
    }
}

/// RS-Ratio / RS-Momentum for each instrument, before tail extraction.
pub fn compute_series(
    table: &PriceTable,
    instruments: &InstrumentSet,
    benchmark: &str,
    params: &RrgParams,
) -> Result<Vec<(Instrument, RsSeries)>, RrgError> {
    params.validate()?;
    let universe = SeriesAligner::new(instruments.clone(), benchmark).align(table)?;
    let transform = SmoothedRatioMomentum::from_params(params);
    Ok(compute_ratios(&universe)
        .into_iter()
        .map(|ratio| {
            let rs = transform.compute(&ratio.values);
            (ratio.instrument, rs)
        })
        .collect())
}

/// Run the full pipeline over one price snapshot.
pub fn compute_rrg(
    table: &PriceTable,
    instruments: &InstrumentSet,
    benchmark: &str,
    params: &RrgParams,
) -> Result<RrgOutcome, RrgError> {
    params.validate()?;
    tracing::info!(
        instruments = instruments.len(),
        rows = table.len(),
        benchmark,
        smoothing = params.smoothing_period,
        momentum = params.momentum_period,
        tail = params.tail_length,
        pairing = params.pairing.as_str(),
        "computing relative rotation"
    );

    let universe = match SeriesAligner::new(instruments.clone(), benchmark).align(table) {
        Ok(universe) => universe,
        Err(DataError::NoValidData { requested }) => {
            tracing::warn!(?requested, "no valid price data");
            return Ok(RrgOutcome::NoValidData { requested });
        }
        Err(e) => return Err(e.into()),
    };

    let transform = SmoothedRatioMomentum::from_params(params);
    let extractor = TailExtractor::from_params(params);
    let dates = universe.table.dates();

    let mut survivors: Vec<(Instrument, Vec<TailPoint>)> = Vec::new();
    let mut excluded = Vec::new();
    for ratio in compute_ratios(&universe) {
        let rs = transform.compute(&ratio.values);
        match extractor.extract(dates, &rs) {
            Some(points) => survivors.push((ratio.instrument, points)),
            None => {
                tracing::debug!(
                    instrument = %ratio.instrument.name,
                    tail_length = params.tail_length,
                    "not enough history for a tail"
                );
                excluded.push(ratio.instrument.name);
            }
        }
    }

    let statistics =
        match QuadrantStatistics::from_tails(survivors.iter().map(|(_, p)| p.as_slice())) {
            Some(stats) => stats,
            None => {
                tracing::warn!(excluded = excluded.len(), "not enough data for any tail");
                return Ok(RrgOutcome::InsufficientData {
                    benchmark: universe.benchmark,
                    dropped: universe.dropped,
                    excluded,
                });
            }
        };

    let tails: Vec<InstrumentTail> = survivors
        .into_iter()
        .filter_map(|(instrument, points)| {
            let latest = points.last()?;
            let quadrant = statistics.classify(latest);
            Some(InstrumentTail {
                direction: Direction::of_tail(&points),
                quadrant,
                name: instrument.name,
                symbol: instrument.symbol,
                points,
            })
        })
        .collect();

    let fingerprint = RunFingerprint::new(
        &universe.table,
        params,
        &universe.benchmark.resolved,
        &universe.instruments,
    );
    tracing::info!(
        plotted = tails.len(),
        excluded = excluded.len(),
        run_id = %fingerprint,
        "relative rotation computed"
    );

    Ok(RrgOutcome::Chart(RrgReport {
        params: *params,
        benchmark: universe.benchmark,
        dropped: universe.dropped,
        tails,
        excluded,
        statistics,
        as_of: dates.last().copied(),
        fingerprint,
    }))
}
