use serde::{Deserialize, Serialize};

/// A named market instrument plotted against the benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    /// Display name (e.g. "Nifty Bank").
    pub name: String,
    /// Price column key (e.g. "^NSEBANK").
    pub symbol: String,
}

impl Instrument {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

/// Ordered display-name → symbol mapping.
///
/// Configuration order is preserved; it drives report order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentSet {
    instruments: Vec<Instrument>,
}

impl InstrumentSet {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }

    /// Build from `(name, symbol)` pairs.
    pub fn from_pairs<N, S>(pairs: impl IntoIterator<Item = (N, S)>) -> Self
    where
        N: Into<String>,
        S: Into<String>,
    {
        Self {
            instruments: pairs
                .into_iter()
                .map(|(name, symbol)| Instrument::new(name, symbol))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.instruments.iter().map(|i| i.symbol.as_str()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.instruments.iter().map(|i| i.name.as_str()).collect()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.name == name)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Keep only instruments whose symbol satisfies `keep`, preserving order.
    pub fn retain_symbols(&self, mut keep: impl FnMut(&str) -> bool) -> Self {
        Self {
            instruments: self
                .instruments
                .iter()
                .filter(|i| keep(&i.symbol))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a InstrumentSet {
    type Item = &'a Instrument;
    type IntoIter = std::slice::Iter<'a, Instrument>;

    fn into_iter(self) -> Self::IntoIter {
        self.instruments.iter()
    }
}
