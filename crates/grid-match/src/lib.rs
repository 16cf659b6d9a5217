//! Grid-correspondence matching stage for camera calibration pipelines.
//!
//! Given detected 2D feature points lying on an approximately regular,
//! axis-aligned grid, the stage estimates the grid pitch along both axes,
//! labels the points with integer (column, row) coordinates, and produces
//! centered image/object correspondences ready for a camera calibration
//! solver. The solver itself and the undistortion transform are external
//! collaborators behind the [`CalibrationSolver`] and [`ImageUndistorter`]
//! traits.
//!
//! ## Quickstart
//!
//! ```
//! use grid_match::{MatchGrid, MatchGridParams};
//! use nalgebra::Point2;
//!
//! let mut points = Vec::new();
//! for row in 0..3 {
//!     for col in 0..3 {
//!         points.push(Point2::new(col as f64 * 10.0, row as f64 * 10.0));
//!     }
//! }
//!
//! let stage = MatchGrid::new(MatchGridParams::default())?;
//! let result = stage.match_points(&points)?;
//! assert_eq!(9, result.correspondences.len());
//! # Ok::<(), grid_match::MatchGridError>(())
//! ```
//!
//! ## API map
//! - [`MatchGrid`]: the stage driver (match → calibrate → undistort).
//! - [`MatchGridParams`]: stage configuration (separations, tolerance,
//!   object depth).
//! - [`MatchGridReport`]: serializable diagnostics, populated even on
//!   partial failure.
//! - `grid_match::core`: the underlying geometric building blocks
//!   (ordering, spacing estimation, grid assignment).
//! - [`input`]: JSON rects boundary used by the CLI and pipeline hosts.

mod calibrate;
mod error;
mod params;
mod report;
mod stage;

pub mod input;

pub use grid_match_core as core;

pub use calibrate::{
    CalibrationError, CalibrationSolver, CameraCalibration, ImageSize, ImageUndistorter,
};
pub use error::MatchGridError;
pub use params::MatchGridParams;
pub use report::{
    AxisReport, CalibrationReport, CorrespondenceRecord, MatchGridReport, MeanDisplacement,
};
pub use stage::{MatchGrid, MatchGridOutput, MatchGridResult};

pub use grid_match_core::{
    Axis, AxisSpacing, CorrespondenceSet, PointOrdering, SpacingFailure, ToleranceBand,
};
