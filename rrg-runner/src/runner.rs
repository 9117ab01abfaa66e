//! RRG runner: wires configuration, price loading, sampling and the engine.
//!
//! Two entry points:
//! - `run_from_source()`: loads prices (CSV or synthetic), then runs. Used by the CLI.
//! - `run_rrg()`: takes an already loaded table. No I/O.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rrg_core::{compute_rrg, PriceTable, RrgError, RrgOutcome};

use crate::config::{RunConfig, RunConfigError};
use crate::data_loader::{load_prices_csv, synthetic_prices, LoadError};
use crate::resample::{resample, trim_to_lookback, Timeframe};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] RunConfigError),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error(transparent)]
    Rrg(#[from] RrgError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Where a run's prices came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Csv { path: PathBuf },
    Synthetic { start: NaiveDate, end: NaiveDate },
}

impl DataSource {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, DataSource::Synthetic { .. })
    }
}

/// Complete record of one RRG computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RrgRun {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub config: RunConfig,
    pub source: DataSource,
    pub has_synthetic: bool,
    /// Timeframe the engine actually saw.
    pub timeframe: Timeframe,
    /// Rows after resampling and the lookback trim.
    pub rows_used: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub outcome: RrgOutcome,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Load prices for every symbol the config needs.
pub fn load_prices(config: &RunConfig, source: &DataSource) -> Result<PriceTable, LoadError> {
    match source {
        DataSource::Csv { path } => load_prices_csv(path),
        DataSource::Synthetic { start, end } => synthetic_prices(&config.symbols(), *start, *end),
    }
}

/// Load prices from `source`, then run.
pub fn run_from_source(config: &RunConfig, source: DataSource) -> Result<RrgRun, RunError> {
    config.validate()?;
    let table = load_prices(config, &source)?;
    Ok(run_rrg(config, &table, source)?)
}

/// Run the engine on a loaded table: resample → lookback trim → compute.
pub fn run_rrg(
    config: &RunConfig,
    table: &PriceTable,
    source: DataSource,
) -> Result<RrgRun, RrgError> {
    let sampled = resample(table, config.timeframe)?;
    let windowed = match config.effective_lookback_months() {
        Some(months) => trim_to_lookback(&sampled, months),
        None => sampled,
    };
    tracing::debug!(
        loaded_rows = table.len(),
        rows = windowed.len(),
        timeframe = config.timeframe.as_str(),
        "prepared price window"
    );

    let outcome = compute_rrg(
        &windowed,
        &config.instruments,
        &config.benchmark,
        &config.params,
    )?;

    Ok(RrgRun {
        schema_version: SCHEMA_VERSION,
        config: config.clone(),
        has_synthetic: source.is_synthetic(),
        source,
        timeframe: config.timeframe,
        rows_used: windowed.len(),
        first_date: windowed.dates().first().copied(),
        last_date: windowed.dates().last().copied(),
        outcome,
    })
}
