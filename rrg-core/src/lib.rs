//! RRG Core: relative strength transforms, tails and quadrant statistics.
//!
//! This crate contains the computational heart of a Relative Rotation Graph:
//! - Domain types (instruments, aligned price tables)
//! - Universe validation with benchmark fallback
//! - Relative strength ratio, RS-Ratio smoothing and RS-Momentum
//! - Tail extraction with joint or positional pairing
//! - Pooled quadrant dividers, trail direction and quadrant classification
//!
//! Everything here is a pure, single-threaded transformation over an
//! immutable price snapshot. No I/O.

pub mod config;
pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod indicators;
pub mod pipeline;
pub mod quadrant;
pub mod rs;
pub mod tail;

pub use config::{ConfigError, PairingMode, RrgParams};
pub use data::{BenchmarkResolution, DataError, SeriesAligner};
pub use domain::{Instrument, InstrumentSet, PriceColumn, PriceTable};
pub use pipeline::{compute_rrg, compute_series, InstrumentTail, RrgError, RrgOutcome, RrgReport};
pub use quadrant::{Direction, Quadrant, QuadrantStatistics};
pub use tail::{TailExtractor, TailPoint};
