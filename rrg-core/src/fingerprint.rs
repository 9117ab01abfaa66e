//! Run fingerprinting: deterministic identification of an RRG computation.
//!
//! - `dataset_hash`: BLAKE3 over the price table actually used.
//! - `params_hash`: BLAKE3 over the parameters, benchmark and instruments.
//!
//! Two runs with equal fingerprints must produce bit-identical tails and
//! divider statistics.

use crate::config::RrgParams;
use crate::domain::{InstrumentSet, PriceTable};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub dataset_hash: String,
    pub params_hash: String,
}

impl RunFingerprint {
    pub fn new(
        table: &PriceTable,
        params: &RrgParams,
        benchmark: &str,
        instruments: &InstrumentSet,
    ) -> Self {
        Self {
            dataset_hash: dataset_hash(table),
            params_hash: params_hash(params, benchmark, instruments),
        }
    }

    /// Combined identifier of dataset + parameters.
    pub fn run_id(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.dataset_hash.as_bytes());
        hasher.update(self.params_hash.as_bytes());
        hasher.finalize().to_hex().to_string()
    }
}

impl fmt::Display for RunFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", short(&self.dataset_hash), short(&self.params_hash))
    }
}

fn short(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

/// Hash dates and close bit patterns, columns in sorted symbol order so the
/// hash does not depend on column order.
pub fn dataset_hash(table: &PriceTable) -> String {
    let mut hasher = blake3::Hasher::new();
    for date in table.dates() {
        hasher.update(date.to_string().as_bytes());
    }

    let mut columns: Vec<_> = table.columns().iter().collect();
    columns.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    for column in columns {
        hasher.update(column.symbol.as_bytes());
        for close in &column.closes {
            hasher.update(&close.to_bits().to_le_bytes());
        }
    }

    hasher.finalize().to_hex().to_string()
}

/// Hash of the canonical JSON of everything that parameterises a run.
pub fn params_hash(params: &RrgParams, benchmark: &str, instruments: &InstrumentSet) -> String {
    let canonical = serde_json::json!({
        "benchmark": benchmark,
        "instruments": instruments,
        "params": params,
    });
    blake3::hash(canonical.to_string().as_bytes())
        .to_hex()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PairingMode;
    use crate::domain::PriceColumn;
    use chrono::NaiveDate;

    fn table(order: &[(&str, f64)]) -> PriceTable {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        PriceTable::new(
            vec![date],
            order
                .iter()
                .map(|(s, v)| PriceColumn::new(*s, vec![*v]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn dataset_hash_ignores_column_order() {
        let a = table(&[("SPY", 1.0), ("QQQ", 2.0)]);
        let b = table(&[("QQQ", 2.0), ("SPY", 1.0)]);
        assert_eq!(dataset_hash(&a), dataset_hash(&b));
    }

    #[test]
    fn dataset_hash_sees_values() {
        let a = table(&[("SPY", 1.0)]);
        let b = table(&[("SPY", 1.0000001)]);
        assert_ne!(dataset_hash(&a), dataset_hash(&b));
    }

    #[test]
    fn params_hash_sees_pairing_mode() {
        let set = InstrumentSet::from_pairs([("A", "AAA")]);
        let joint = RrgParams::default();
        let positional = joint.with_pairing(PairingMode::Positional);
        assert_ne!(
            params_hash(&joint, "SPY", &set),
            params_hash(&positional, "SPY", &set)
        );
        assert_eq!(
            params_hash(&joint, "SPY", &set),
            params_hash(&joint, "SPY", &set)
        );
    }

    #[test]
    fn run_id_is_deterministic() {
        let t = table(&[("SPY", 1.0)]);
        let set = InstrumentSet::default();
        let f1 = RunFingerprint::new(&t, &RrgParams::default(), "SPY", &set);
        let f2 = RunFingerprint::new(&t, &RrgParams::default(), "SPY", &set);
        assert_eq!(f1.run_id(), f2.run_id());
        assert_eq!(f1.run_id().len(), 64);
    }
}
