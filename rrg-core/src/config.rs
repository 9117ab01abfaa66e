//! Run parameters for the relative strength pipeline.
//!
//! All three tunables are validated before any computation starts. Zero is
//! rejected, never clamped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the ratio and momentum series are paired when cutting a tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMode {
    /// Keep only indices where both ratio and momentum are defined, then take
    /// the last N. Every tail point refers to a single date.
    #[default]
    Joint,
    /// Compact ratio and momentum independently and pair the last N of each
    /// by position. Kept for regression comparison against older output; the
    /// two halves of a point can come from different dates.
    Positional,
}

impl PairingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingMode::Joint => "joint",
            PairingMode::Positional => "positional",
        }
    }
}

impl std::str::FromStr for PairingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "joint" => Ok(PairingMode::Joint),
            "positional" => Ok(PairingMode::Positional),
            other => Err(format!(
                "unknown pairing mode '{other}' (expected 'joint' or 'positional')"
            )),
        }
    }
}

/// Parameters of one RRG computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RrgParams {
    /// Rolling window for the RS-Ratio mean.
    pub smoothing_period: usize,
    /// Lag for the RS-Momentum rate of change.
    pub momentum_period: usize,
    /// Number of trailing points kept per instrument.
    pub tail_length: usize,
    pub pairing: PairingMode,
}

impl Default for RrgParams {
    fn default() -> Self {
        Self {
            smoothing_period: 1,
            momentum_period: 14,
            tail_length: 7,
            pairing: PairingMode::Joint,
        }
    }
}

impl RrgParams {
    pub fn new(smoothing_period: usize, momentum_period: usize, tail_length: usize) -> Self {
        Self {
            smoothing_period,
            momentum_period,
            tail_length,
            pairing: PairingMode::default(),
        }
    }

    pub fn with_pairing(mut self, pairing: PairingMode) -> Self {
        self.pairing = pairing;
        self
    }

    /// Reject any non-positive period or length.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("smoothing_period", self.smoothing_period),
            ("momentum_period", self.momentum_period),
            ("tail_length", self.tail_length),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroPeriod { field });
            }
        }
        Ok(())
    }

    /// Minimum number of aligned rows before any tail point can exist.
    pub fn min_history(&self) -> usize {
        let warmup = self
            .smoothing_period
            .saturating_sub(1)
            .max(self.momentum_period);
        warmup + self.tail_length
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive integer, got 0")]
    ZeroPeriod { field: &'static str },
}
