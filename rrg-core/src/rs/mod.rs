//! Relative strength transforms.

pub mod ratio;
pub mod smoothed;

pub use ratio::{compute_ratios, ratio_series, RatioSeries};
pub use smoothed::{RsSeries, SmoothedRatioMomentum, RATIO_SCALE};
