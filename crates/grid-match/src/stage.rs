use grid_match_core::{
    assign_grid_coordinates, estimate_axis_spacing, Axis, CorrespondenceSet, PointOrdering,
};
use log::{debug, info};
use nalgebra::{Point2, Vector2};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::calibrate::{
    CalibrationSolver, CameraCalibration, ImageSize, ImageUndistorter,
};
use crate::error::MatchGridError;
use crate::params::MatchGridParams;
use crate::report::{correspondence_records, AxisReport, CalibrationReport, MatchGridReport};

/// Result of a successful grid match.
#[derive(Clone, Debug)]
pub struct MatchGridResult {
    /// Matched pairs, recentered on the grid centroid and scaled to
    /// physical units.
    pub correspondences: CorrespondenceSet,
    /// Image-space grid pitch (x, y) implied by the spacing estimates.
    pub image_pitch: Vector2<f64>,
    pub report: MatchGridReport,
}

/// Output of the full stage: correspondence inference, calibration, and
/// undistortion of the working image.
#[derive(Clone, Debug)]
pub struct MatchGridOutput<I> {
    pub result: MatchGridResult,
    pub calibration: CameraCalibration,
    /// The corrected image that replaces the stage's working image.
    pub image: I,
}

/// Grid-correspondence stage driver.
///
/// Each call works on freshly built local state, so one `MatchGrid` can be
/// shared across threads and images.
#[derive(Debug)]
pub struct MatchGrid {
    params: MatchGridParams,
}

impl MatchGrid {
    /// Create a stage driver, validating the configuration.
    pub fn new(params: MatchGridParams) -> Result<Self, MatchGridError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &MatchGridParams {
        &self.params
    }

    /// Infer the grid correspondence for one set of detected points.
    ///
    /// Row and column spacing failures are independent; when both axes
    /// starve, both messages surface joined with "; " (columns first). The
    /// returned error carries the partial diagnostics report.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, points), fields(points = points.len()))
    )]
    pub fn match_points(
        &self,
        points: &[Point2<f64>],
    ) -> Result<MatchGridResult, MatchGridError> {
        let p = &self.params;
        let ordering = PointOrdering::new(points)?;

        let columns = estimate_axis_spacing(&ordering, Axis::Columns, p.tolerance, p.sep_x);
        let rows = estimate_axis_spacing(&ordering, Axis::Rows, p.tolerance, p.sep_y);
        let mut report = MatchGridReport {
            columns: AxisReport::from(&columns),
            rows: AxisReport::from(&rows),
            correspondences: None,
            calibration: None,
        };

        let (Some(grid_x), Some(grid_y)) = (columns.scale, rows.scale) else {
            let message = columns
                .failure()
                .into_iter()
                .chain(rows.failure())
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(MatchGridError::SpacingEstimation {
                message,
                report: Box::new(report),
            });
        };

        let image_pitch = Vector2::new(grid_x * p.sep_x, grid_y * p.sep_y);
        debug!(
            "grid scales ({grid_x:.4}, {grid_y:.4}), image pitch ({:.3}, {:.3})",
            image_pitch.x, image_pitch.y
        );

        let Ok(assignment) = assign_grid_coordinates(&ordering, &columns, image_pitch) else {
            return Err(MatchGridError::EmptyCorrespondence {
                report: Box::new(report),
            });
        };

        let correspondences = assignment.recenter(Vector2::new(p.sep_x, p.sep_y), p.obj_z);
        report.correspondences = Some(correspondence_records(&correspondences));
        info!(
            "matched {} of {} points to the grid",
            correspondences.len(),
            points.len()
        );

        Ok(MatchGridResult {
            correspondences,
            image_pitch,
            report,
        })
    }

    /// Match, then hand the correspondences and image size to the
    /// calibration solver. Solver errors are fatal and propagated verbatim.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, points, solver), fields(points = points.len()))
    )]
    pub fn calibrate<S: CalibrationSolver>(
        &self,
        points: &[Point2<f64>],
        image_size: ImageSize,
        solver: &S,
    ) -> Result<(MatchGridResult, CameraCalibration), MatchGridError> {
        let mut result = self.match_points(points)?;
        let calibration = solver.calibrate(&result.correspondences, image_size)?;
        info!("calibrated: rms error {:.4}", calibration.rms_error);
        result.report.calibration = Some(CalibrationReport::from(&calibration));
        Ok((result, calibration))
    }

    /// Run the full stage: match, calibrate, and undistort the working
    /// image. The corrected image replaces the input unconditionally on
    /// success; any earlier failure leaves the caller's image untouched.
    pub fn run<S, U>(
        &self,
        points: &[Point2<f64>],
        image: &U::Image,
        image_size: ImageSize,
        solver: &S,
        undistorter: &U,
    ) -> Result<MatchGridOutput<U::Image>, MatchGridError>
    where
        S: CalibrationSolver,
        U: ImageUndistorter,
    {
        let (result, calibration) = self.calibrate(points, image_size, solver)?;
        let image = undistorter.undistort(image, &calibration)?;
        Ok(MatchGridOutput {
            result,
            calibration,
            image,
        })
    }
}
