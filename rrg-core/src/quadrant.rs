//! Quadrant dividers, trail direction, and quadrant classification.
//!
//! Dividers are pooled over every surviving instrument's tail points, not
//! computed per instrument. Sums run left to right: instruments in report
//! order, points oldest to newest.

use crate::tail::TailPoint;
use serde::{Deserialize, Serialize};

/// Pooled divider statistics over all tail points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadrantStatistics {
    pub x_mean: f64,
    pub y_mean: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Number of pooled points.
    pub count: usize,
}

impl QuadrantStatistics {
    /// Pool every point of every tail. `None` when there are no points.
    pub fn from_tails<'a, I>(tails: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [TailPoint]>,
    {
        let mut count = 0usize;
        let (mut x_sum, mut y_sum) = (0.0, 0.0);
        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

        for point in tails.into_iter().flatten() {
            count += 1;
            x_sum += point.rs_ratio;
            y_sum += point.rs_momentum;
            x_min = x_min.min(point.rs_ratio);
            x_max = x_max.max(point.rs_ratio);
            y_min = y_min.min(point.rs_momentum);
            y_max = y_max.max(point.rs_momentum);
        }

        if count == 0 {
            return None;
        }

        // A left-to-right sum can round the mean one ulp past the extrema
        // (e.g. three equal points); pin it back inside.
        Some(Self {
            x_mean: (x_sum / count as f64).clamp(x_min, x_max),
            y_mean: (y_sum / count as f64).clamp(y_min, y_max),
            x_min,
            x_max,
            y_min,
            y_max,
            count,
        })
    }

    /// The two dashed divider segments: vertical at `x_mean` spanning the
    /// momentum extent, horizontal at `y_mean` spanning the ratio extent.
    pub fn divider_lines(&self) -> DividerLines {
        DividerLines {
            vertical: Segment {
                x0: self.x_mean,
                y0: self.y_min,
                x1: self.x_mean,
                y1: self.y_max,
            },
            horizontal: Segment {
                x0: self.x_min,
                y0: self.y_mean,
                x1: self.x_max,
                y1: self.y_mean,
            },
        }
    }

    /// Quadrant of a point relative to the pooled means.
    pub fn classify(&self, point: &TailPoint) -> Quadrant {
        Quadrant::classify(point.rs_ratio, point.rs_momentum, self.x_mean, self.y_mean)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividerLines {
    pub vertical: Segment,
    pub horizontal: Segment,
}

/// RRG quadrant. Ties with a mean count as "at or above".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// Strong ratio, rising momentum.
    Leading,
    /// Strong ratio, fading momentum.
    Weakening,
    /// Weak ratio, fading momentum.
    Lagging,
    /// Weak ratio, rising momentum.
    Improving,
}

impl Quadrant {
    pub fn classify(ratio: f64, momentum: f64, x_mean: f64, y_mean: f64) -> Self {
        match (ratio >= x_mean, momentum >= y_mean) {
            (true, true) => Quadrant::Leading,
            (true, false) => Quadrant::Weakening,
            (false, false) => Quadrant::Lagging,
            (false, true) => Quadrant::Improving,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::Leading => "leading",
            Quadrant::Weakening => "weakening",
            Quadrant::Lagging => "lagging",
            Quadrant::Improving => "improving",
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Movement from the second-to-last to the last tail point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub dx: f64,
    pub dy: f64,
}

impl Direction {
    /// `None` for tails shorter than two points (no arrow to draw).
    pub fn of_tail(tail: &[TailPoint]) -> Option<Self> {
        match tail {
            [.., prev, last] => Some(Self {
                dx: last.rs_ratio - prev.rs_ratio,
                dy: last.rs_momentum - prev.rs_momentum,
            }),
            _ => None,
        }
    }

    /// Heading in degrees, counter-clockwise from the +ratio axis.
    pub fn heading_degrees(&self) -> f64 {
        self.dy.atan2(self.dx).to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn point(position: usize, rs_ratio: f64, rs_momentum: f64) -> TailPoint {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
            + chrono::Duration::weeks(position as i64);
        TailPoint {
            position,
            date,
            momentum_date: date,
            rs_ratio,
            rs_momentum,
        }
    }

    #[test]
    fn pooled_over_all_instruments() {
        let a = vec![point(1, 100.0, 0.1), point(2, 102.0, 0.3)];
        let b = vec![point(1, 96.0, -0.2)];
        let stats =
            QuadrantStatistics::from_tails([a.as_slice(), b.as_slice()]).unwrap();

        assert_eq!(stats.count, 3);
        assert_approx(stats.x_mean, 298.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(stats.y_mean, 0.2 / 3.0, DEFAULT_EPSILON);
        assert_eq!((stats.x_min, stats.x_max), (96.0, 102.0));
        assert_eq!((stats.y_min, stats.y_max), (-0.2, 0.3));
    }

    #[test]
    fn mean_of_identical_points_stays_within_extrema() {
        let a = vec![point(1, 0.1, 0.1), point(2, 0.1, 0.1), point(3, 0.1, 0.1)];
        let stats = QuadrantStatistics::from_tails([a.as_slice()]).unwrap();
        assert_eq!(stats.x_mean, 0.1);
        assert_eq!(stats.y_mean, 0.1);
        assert!(stats.x_min <= stats.x_mean && stats.x_mean <= stats.x_max);
        assert_eq!(stats.classify(&a[0]), Quadrant::Leading);
    }

    #[test]
    fn no_points_no_statistics() {
        assert!(QuadrantStatistics::from_tails(Vec::<&[TailPoint]>::new()).is_none());
        let empty: Vec<TailPoint> = vec![];
        assert!(QuadrantStatistics::from_tails([empty.as_slice()]).is_none());
    }

    #[test]
    fn divider_lines_span_extents() {
        let a = vec![point(1, 90.0, -1.0), point(2, 110.0, 3.0)];
        let stats = QuadrantStatistics::from_tails([a.as_slice()]).unwrap();
        let lines = stats.divider_lines();
        assert_eq!(
            lines.vertical,
            Segment {
                x0: 100.0,
                y0: -1.0,
                x1: 100.0,
                y1: 3.0
            }
        );
        assert_eq!(
            lines.horizontal,
            Segment {
                x0: 90.0,
                y0: 1.0,
                x1: 110.0,
                y1: 1.0
            }
        );
    }

    #[test]
    fn quadrant_classification() {
        assert_eq!(Quadrant::classify(101.0, 0.1, 100.0, 0.0), Quadrant::Leading);
        assert_eq!(Quadrant::classify(101.0, -0.1, 100.0, 0.0), Quadrant::Weakening);
        assert_eq!(Quadrant::classify(99.0, -0.1, 100.0, 0.0), Quadrant::Lagging);
        assert_eq!(Quadrant::classify(99.0, 0.1, 100.0, 0.0), Quadrant::Improving);
        assert_eq!(Quadrant::classify(100.0, 0.0, 100.0, 0.0), Quadrant::Leading);
    }

    #[test]
    fn direction_from_last_two_points() {
        let tail = vec![point(1, 100.0, 0.0), point(2, 101.0, 0.5), point(3, 103.0, 0.25)];
        let dir = Direction::of_tail(&tail).unwrap();
        assert_approx(dir.dx, 2.0, DEFAULT_EPSILON);
        assert_approx(dir.dy, -0.25, DEFAULT_EPSILON);
    }

    #[test]
    fn single_point_has_no_direction() {
        assert!(Direction::of_tail(&[point(1, 100.0, 0.0)]).is_none());
        assert!(Direction::of_tail(&[]).is_none());
    }

    #[test]
    fn heading_degrees() {
        assert_approx(Direction { dx: 1.0, dy: 0.0 }.heading_degrees(), 0.0, DEFAULT_EPSILON);
        assert_approx(Direction { dx: 0.0, dy: 1.0 }.heading_degrees(), 90.0, DEFAULT_EPSILON);
        assert_approx(Direction { dx: -1.0, dy: 0.0 }.heading_degrees(), 180.0, DEFAULT_EPSILON);
    }
}
