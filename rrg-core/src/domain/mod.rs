//! Domain types: instruments and aligned price tables.

pub mod instrument;
pub mod price_table;

pub use instrument::{Instrument, InstrumentSet};
pub use price_table::{PriceColumn, PriceTable};
