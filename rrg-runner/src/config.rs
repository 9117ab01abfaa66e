//! Serializable run configuration.
//!
//! A run is fully described by its benchmark, its ordered instrument list, the
//! RRG parameters and the timeframe the prices are sampled at:
//!
//! ```toml
//! benchmark = "^NSEI"
//! timeframe = "weekly"
//!
//! [params]
//! smoothing_period = 1
//! momentum_period = 14
//! tail_length = 7
//! pairing = "joint"
//!
//! [[instruments]]
//! name = "Nifty Bank"
//! symbol = "^NSEBANK"
//! ```

use crate::resample::Timeframe;
use rrg_core::{Instrument, InstrumentSet, RrgParams};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid parameters: {0}")]
    Params(#[from] rrg_core::ConfigError),

    #[error("config lists no instruments")]
    NoInstruments,

    #[error("benchmark symbol is empty")]
    EmptyBenchmark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Symbol every instrument is divided by.
    pub benchmark: String,

    /// Sampling applied to the loaded prices before computation.
    #[serde(default)]
    pub timeframe: Timeframe,

    /// Keep only this many trailing months of prices. Defaults to the
    /// timeframe's own window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookback_months: Option<u32>,

    #[serde(default)]
    pub params: RrgParams,

    pub instruments: InstrumentSet,
}

impl RunConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RunConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| RunConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, RunConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, RunConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), RunConfigError> {
        self.params.validate()?;
        if self.benchmark.trim().is_empty() {
            return Err(RunConfigError::EmptyBenchmark);
        }
        if self.instruments.is_empty() {
            return Err(RunConfigError::NoInstruments);
        }
        Ok(())
    }

    /// Trailing window actually applied, if any.
    pub fn effective_lookback_months(&self) -> Option<u32> {
        self.lookback_months
            .or_else(|| self.timeframe.default_lookback_months())
    }

    /// Every symbol the run needs prices for: instruments, then benchmark.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .instruments
            .symbols()
            .into_iter()
            .map(String::from)
            .collect();
        if !symbols.contains(&self.benchmark) {
            symbols.push(self.benchmark.clone());
        }
        symbols
    }
}

impl Default for RunConfig {
    /// NSE sector indices against the Nifty 50, sampled weekly.
    fn default() -> Self {
        let instruments = [
            ("Nifty Bank", "^NSEBANK"),
            ("Nifty IT", "^CNXIT"),
            ("Nifty FMCG", "^CNXFMCG"),
            ("Nifty Auto", "^CNXAUTO"),
            ("Nifty Pharma", "^CNXPHARMA"),
            ("Nifty Metal", "^CNXMETAL"),
            ("Nifty Realty", "^CNXREALTY"),
            ("Nifty Energy", "^CNXENERGY"),
            ("Nifty Financial Services", "NIFTY_FIN_SERVICE.NS"),
        ]
        .into_iter()
        .map(|(name, symbol)| Instrument::new(name, symbol))
        .collect();

        Self {
            benchmark: "^NSEI".into(),
            timeframe: Timeframe::Weekly,
            lookback_months: None,
            params: RrgParams::default(),
            instruments: InstrumentSet::new(instruments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rrg_core::PairingMode;

    #[test]
    fn default_config_is_valid() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.instruments.len(), 9);
        assert_eq!(config.benchmark, "^NSEI");
        assert_eq!(config.effective_lookback_months(), Some(6));
    }

    #[test]
    fn toml_roundtrip() {
        let config = RunConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = RunConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn parses_minimal_toml_with_defaults() {
        let config = RunConfig::from_toml(
            r#"
            benchmark = "SPY"

            [[instruments]]
            name = "Tech"
            symbol = "XLK"
            "#,
        )
        .unwrap();
        assert_eq!(config.timeframe, Timeframe::Native);
        assert_eq!(config.params, RrgParams::default());
        assert_eq!(config.effective_lookback_months(), None);
        assert_eq!(config.symbols(), vec!["XLK", "SPY"]);
    }

    #[test]
    fn params_section_overrides() {
        let config = RunConfig::from_toml(
            r#"
            benchmark = "SPY"
            timeframe = "monthly"
            lookback_months = 36

            [params]
            smoothing_period = 3
            tail_length = 5
            pairing = "positional"

            [[instruments]]
            name = "Tech"
            symbol = "XLK"
            "#,
        )
        .unwrap();
        assert_eq!(config.params.smoothing_period, 3);
        assert_eq!(config.params.momentum_period, 14);
        assert_eq!(config.params.pairing, PairingMode::Positional);
        assert_eq!(config.effective_lookback_months(), Some(36));
    }

    #[test]
    fn zero_period_rejected() {
        let err = RunConfig::from_toml(
            r#"
            benchmark = "SPY"
            [params]
            tail_length = 0
            [[instruments]]
            name = "Tech"
            symbol = "XLK"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RunConfigError::Params(_)));
    }

    #[test]
    fn empty_instrument_list_rejected() {
        let err = RunConfig::from_toml("benchmark = \"SPY\"\ninstruments = []\n").unwrap_err();
        assert!(matches!(err, RunConfigError::NoInstruments));
    }

    #[test]
    fn negative_period_is_a_parse_error() {
        let err = RunConfig::from_toml(
            r#"
            benchmark = "SPY"
            [params]
            momentum_period = -3
            [[instruments]]
            name = "Tech"
            symbol = "XLK"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RunConfigError::Parse(_)));
    }
}
