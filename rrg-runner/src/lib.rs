//! RRG Runner: configuration, price loading, sampling and reporting.
//!
//! This crate builds on `rrg-core` to provide:
//! - TOML run configuration with the default NSE sector universe
//! - Price loading from CSV, with a synthetic random-walk fallback
//! - Weekly/monthly resampling and trailing lookback windows
//! - JSON, CSV and Markdown artifacts

pub mod config;
pub mod data_loader;
pub mod export;
pub mod resample;
pub mod runner;

pub use config::{RunConfig, RunConfigError};
pub use data_loader::{load_prices_csv, parse_prices_csv, synthetic_prices, write_prices_csv, LoadError};
pub use export::{export_json, export_tails_csv, import_json, render_markdown, save_artifacts};
pub use resample::{resample, trim_to_lookback, Timeframe};
pub use runner::{load_prices, run_from_source, run_rrg, DataSource, RrgRun, RunError, SCHEMA_VERSION};
