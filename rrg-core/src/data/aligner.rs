//! Universe validation: which instruments and which benchmark can be used.
//!
//! A symbol with any missing close on the shared axis is dropped as a whole
//! column; nothing is interpolated. When the requested benchmark does not
//! survive, the last surviving requested column (table order) takes its place.

use super::DataError;
use crate::domain::{InstrumentSet, PriceTable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which benchmark was asked for and which one is actually used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkResolution {
    pub requested: String,
    pub resolved: String,
    /// True when `resolved` is a fallback for a missing `requested` symbol.
    pub substituted: bool,
}

/// Why a requested symbol was dropped before computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The price table has no column for the symbol.
    Missing,
    /// The column has at least one missing or non-finite close.
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedSymbol {
    pub symbol: String,
    pub reason: DropReason,
}

/// Output of [`SeriesAligner::align`].
#[derive(Debug, Clone)]
pub struct AlignedUniverse {
    /// Only the valid requested columns, in table order.
    pub table: PriceTable,
    /// Instruments whose symbol survived, in configuration order.
    pub instruments: InstrumentSet,
    pub benchmark: BenchmarkResolution,
    pub dropped: Vec<DroppedSymbol>,
}

impl AlignedUniverse {
    pub fn benchmark_closes(&self) -> &[f64] {
        // The resolved benchmark is always one of the retained columns.
        self.table.closes(&self.benchmark.resolved).unwrap_or(&[])
    }
}

/// Validates requested instruments and the benchmark against a price table.
#[derive(Debug, Clone)]
pub struct SeriesAligner {
    instruments: InstrumentSet,
    benchmark: String,
}

impl SeriesAligner {
    pub fn new(instruments: InstrumentSet, benchmark: impl Into<String>) -> Self {
        Self {
            instruments,
            benchmark: benchmark.into(),
        }
    }

    /// Requested symbols: instruments in configuration order, then the benchmark.
    pub fn requested_symbols(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.instruments
            .symbols()
            .into_iter()
            .chain(std::iter::once(self.benchmark.as_str()))
            .filter(|s| seen.insert(*s))
            .map(String::from)
            .collect()
    }

    /// Filter the table down to usable columns and resolve the benchmark.
    ///
    /// Fails with [`DataError::NoValidData`] when no requested column is usable.
    pub fn align(&self, table: &PriceTable) -> Result<AlignedUniverse, DataError> {
        let requested = self.requested_symbols();
        let requested_set: HashSet<&str> = requested.iter().map(String::as_str).collect();

        let mut dropped: Vec<DroppedSymbol> = requested
            .iter()
            .filter(|s| !table.contains(s))
            .map(|s| DroppedSymbol {
                symbol: s.clone(),
                reason: DropReason::Missing,
            })
            .collect();

        let valid = table.retain_columns(|column| {
            if !requested_set.contains(column.symbol.as_str()) {
                return false;
            }
            if column.is_complete() {
                true
            } else {
                dropped.push(DroppedSymbol {
                    symbol: column.symbol.clone(),
                    reason: DropReason::Incomplete,
                });
                false
            }
        });

        for d in &dropped {
            tracing::warn!(symbol = %d.symbol, reason = ?d.reason, "dropping symbol");
        }

        let resolved = if valid.contains(&self.benchmark) {
            self.benchmark.clone()
        } else {
            match valid.symbols().last() {
                Some(fallback) => fallback.to_string(),
                None => return Err(DataError::NoValidData { requested }),
            }
        };
        let substituted = resolved != self.benchmark;
        if substituted {
            tracing::warn!(
                requested = %self.benchmark,
                resolved = %resolved,
                "benchmark unavailable, using fallback"
            );
        }

        let instruments = self.instruments.retain_symbols(|s| valid.contains(s));

        Ok(AlignedUniverse {
            table: valid,
            instruments,
            benchmark: BenchmarkResolution {
                requested: self.benchmark.clone(),
                resolved,
                substituted,
            },
            dropped,
        })
    }
}
