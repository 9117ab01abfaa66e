//! Price table assembly and universe validation.

pub mod align;
pub mod aligner;
pub mod error;

pub use align::{align_closes, CloseSeries};
pub use aligner::{AlignedUniverse, BenchmarkResolution, DropReason, DroppedSymbol, SeriesAligner};
pub use error::DataError;
