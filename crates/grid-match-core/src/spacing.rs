use std::fmt;

use log::debug;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::PointOrdering;

/// Grid axis whose spacing is being characterized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Columns,
    Rows,
}

impl Axis {
    #[inline]
    fn component(self, p: &Point2<f64>) -> f64 {
        match self {
            Axis::Columns => p.x,
            Axis::Rows => p.y,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Columns => write!(f, "column"),
            Axis::Rows => write!(f, "row"),
        }
    }
}

/// Acceptance interval around an expected signed spacing value.
///
/// Bounds are derived from the raw signed median, so for a negative median
/// the `1 ∓ tolerance` multipliers swap to keep the band around it. The
/// comparison stays signed throughout; no absolute values are taken.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBand {
    pub lo: f64,
    pub hi: f64,
}

impl ToleranceBand {
    pub fn around(median: f64, tolerance: f64) -> Self {
        let (lo_mul, hi_mul) = if median < 0.0 {
            (1.0 + tolerance, 1.0 - tolerance)
        } else {
            (1.0 - tolerance, 1.0 + tolerance)
        };
        Self {
            lo: median * lo_mul,
            hi: median * hi_mul,
        }
    }

    /// The same relative band around `factor` times the expected value.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            lo: self.lo * factor,
            hi: self.hi * factor,
        }
    }

    #[inline]
    pub fn contains(&self, d: f64) -> bool {
        self.lo <= d && d <= self.hi
    }
}

/// Accumulated displacement of point pairs accepted at one step depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    pub count: usize,
    pub sum: Vector2<f64>,
}

impl StepStats {
    fn add(&mut self, displacement: Vector2<f64>) {
        self.sum += displacement;
        self.count += 1;
    }

    /// Mean displacement vector, `None` while no pair has been accepted.
    pub fn mean(&self) -> Option<Vector2<f64>> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Spacing failure for one axis. Starved 1-step bands abort the axis
/// entirely; a starved 2-step band still leaves 1-step averages behind for
/// diagnostics.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SpacingFailure {
    #[error("no {axis} pairs matched within the 1-step tolerance band")]
    OneStepStarved { axis: Axis },
    #[error("no {axis} pairs matched within the 2-step tolerance band")]
    TwoStepStarved { axis: Axis },
}

/// Characterization of the dominant periodic spacing along one axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisSpacing {
    pub axis: Axis,
    /// Lower median of consecutive `prev − cur` differences along the axis.
    /// Negative for the usual ascending traversals.
    pub median: f64,
    /// 1-step acceptance band around the median.
    pub band: ToleranceBand,
    pub one_step: StepStats,
    pub two_step: StepStats,
    /// Grid pitch in image units per physical-separation unit. Defined only
    /// when both step depths accepted at least one pair.
    pub scale: Option<f64>,
}

impl AxisSpacing {
    /// Mean 1-step displacement of the accepted pairs.
    pub fn one_step_mean(&self) -> Option<Vector2<f64>> {
        self.one_step.mean()
    }

    /// Mean 2-step displacement, halved to a per-step estimate.
    pub fn two_step_mean(&self) -> Option<Vector2<f64>> {
        self.two_step.mean().map(|m| m / 2.0)
    }

    pub fn failure(&self) -> Option<SpacingFailure> {
        if self.one_step.count == 0 {
            Some(SpacingFailure::OneStepStarved { axis: self.axis })
        } else if self.two_step.count == 0 {
            Some(SpacingFailure::TwoStepStarved { axis: self.axis })
        } else {
            None
        }
    }
}

/// Estimate the grid spacing along `axis`.
///
/// Column pitch shows up as the x step between consecutive points of a
/// row-major scan; row pitch as the y step of a column-major scan. The
/// measured deltas are compared against the band in whole units, so
/// sub-unit spacings fail the 1-step test.
pub fn estimate_axis_spacing(
    ordering: &PointOrdering,
    axis: Axis,
    tolerance: f64,
    separation: f64,
) -> AxisSpacing {
    let points = match axis {
        Axis::Columns => ordering.row_major(),
        Axis::Rows => ordering.col_major(),
    };

    let mut diffs: Vec<f64> = points
        .windows(2)
        .map(|w| axis.component(&w[0]) - axis.component(&w[1]))
        .collect();
    diffs.sort_by(f64::total_cmp);
    let median = lower_median(&diffs);

    let band = ToleranceBand::around(median, tolerance);
    let band2 = band.scaled(2.0);

    let mut one_step = StepStats::default();
    let mut two_step = StepStats::default();
    for i in 1..points.len() {
        let cur = points[i];
        let prev = points[i - 1];
        let d1 = (axis.component(&prev) - axis.component(&cur)).trunc();
        if band.contains(d1) {
            one_step.add(prev - cur);
        }
        if i > 1 {
            let prev2 = points[i - 2];
            let d2 = (axis.component(&prev2) - axis.component(&cur)).trunc();
            if band2.contains(d2) {
                two_step.add(prev2 - cur);
            }
        }
    }

    let scale = match (one_step.count, two_step.mean()) {
        (c, Some(mean2)) if c > 0 => Some((mean2 / 2.0).norm() / separation),
        _ => None,
    };

    debug!(
        "{axis} spacing: median {median:.3}, {} one-step, {} two-step pairs",
        one_step.count, two_step.count
    );

    AxisSpacing {
        axis,
        median,
        band,
        one_step,
        two_step,
        scale,
    }
}

/// Lower median: the element at index `(len − 1) / 2` of an ascending slice.
fn lower_median(sorted: &[f64]) -> f64 {
    sorted[(sorted.len() - 1) / 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    fn grid(cols: usize, rows: usize, pitch: (f64, f64)) -> Vec<Point2<f64>> {
        let mut points = Vec::new();
        for j in 0..rows {
            for i in 0..cols {
                points.push(Point2::new(i as f64 * pitch.0, j as f64 * pitch.1));
            }
        }
        points
    }

    #[test]
    fn lower_median_picks_lower_middle_for_even_lengths() {
        assert_eq!(2.0, lower_median(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(3.0, lower_median(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        assert_eq!(7.0, lower_median(&[7.0]));
    }

    #[test]
    fn band_surrounds_negative_medians() {
        let band = ToleranceBand::around(-2.0, 0.35);
        assert_relative_eq!(band.lo, -2.7);
        assert_relative_eq!(band.hi, -1.3);
        assert!(band.contains(-2.0));
        assert!(!band.contains(-1.0));

        let band = ToleranceBand::around(2.0, 0.35);
        assert_relative_eq!(band.lo, 1.3);
        assert_relative_eq!(band.hi, 2.7);
        assert!(band.contains(2.0));
    }

    #[test]
    fn regular_grid_recovers_pitch_on_both_axes() {
        let points = grid(3, 3, (10.0, 10.0));
        let ordering = PointOrdering::new(&points).expect("ordering");

        let cols = estimate_axis_spacing(&ordering, Axis::Columns, 0.35, 5.0);
        assert_relative_eq!(cols.median, -10.0);
        assert_eq!(6, cols.one_step.count);
        assert_eq!(3, cols.two_step.count);
        let mean1 = cols.one_step_mean().expect("one-step mean");
        assert_relative_eq!(mean1.x, -10.0);
        assert_relative_eq!(mean1.y, 0.0);
        let mean2 = cols.two_step_mean().expect("two-step mean");
        assert_relative_eq!(mean2.x, -10.0);
        assert_relative_eq!(cols.scale.expect("scale"), 2.0);
        assert!(cols.failure().is_none());

        let rows = estimate_axis_spacing(&ordering, Axis::Rows, 0.35, 5.0);
        assert_relative_eq!(rows.median, -10.0);
        let mean2 = rows.two_step_mean().expect("two-step mean");
        assert_relative_eq!(mean2.y, -10.0);
        assert_relative_eq!(rows.scale.expect("scale"), 2.0);
    }

    #[test]
    fn sub_unit_spacing_starves_the_one_step_band() {
        // Deltas truncate to 0 in whole units, outside the fractional band.
        let points: Vec<_> = [0.0, 0.4, 0.9, 1.3, 1.8]
            .iter()
            .map(|&x| Point2::new(x, 0.0))
            .collect();
        let ordering = PointOrdering::new(&points).expect("ordering");
        let cols = estimate_axis_spacing(&ordering, Axis::Columns, 0.35, 5.0);
        assert_eq!(0, cols.one_step.count);
        assert_eq!(None, cols.scale);
        assert_eq!(
            Some(SpacingFailure::OneStepStarved {
                axis: Axis::Columns
            }),
            cols.failure()
        );
    }

    #[test]
    fn two_point_axis_reports_two_step_starvation_with_partial_stats() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)];
        let ordering = PointOrdering::new(&points).expect("ordering");
        let cols = estimate_axis_spacing(&ordering, Axis::Columns, 0.35, 5.0);
        assert_eq!(1, cols.one_step.count);
        assert!(cols.one_step_mean().is_some());
        assert_eq!(0, cols.two_step.count);
        assert_eq!(None, cols.scale);
        assert_eq!(
            Some(SpacingFailure::TwoStepStarved {
                axis: Axis::Columns
            }),
            cols.failure()
        );
    }

    #[test]
    fn two_row_grid_cannot_match_two_step_rows() {
        // A column never spans three points, so no pair two positions apart
        // in the column-major scan stays within one column.
        let points = grid(3, 2, (8.0, 6.0));
        let ordering = PointOrdering::new(&points).expect("ordering");

        let cols = estimate_axis_spacing(&ordering, Axis::Columns, 0.35, 4.0);
        assert_relative_eq!(cols.scale.expect("column scale"), 2.0);

        let rows = estimate_axis_spacing(&ordering, Axis::Rows, 0.35, 4.0);
        assert_eq!(
            Some(SpacingFailure::TwoStepStarved { axis: Axis::Rows }),
            rows.failure()
        );
    }
}
