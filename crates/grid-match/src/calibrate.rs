//! Contracts for the external calibration and undistortion collaborators.
//!
//! The stage produces a single-view correspondence set and hands it to a
//! [`CalibrationSolver`]; it never validates or retries solver failures.

use grid_match_core::CorrespondenceSet;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Pixel dimensions of the image being calibrated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Error reported by a calibration or undistortion backend.
///
/// Propagated verbatim to the stage caller; a backend error is fatal to the
/// stage and leaves the working image unchanged.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("calibration failed: {0}")]
pub struct CalibrationError(pub String);

/// Single-view calibration result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraCalibration {
    /// 3×3 camera intrinsic matrix.
    pub camera_matrix: Matrix3<f64>,
    pub dist_coeffs: Vec<f64>,
    /// Per-view rotation vectors (one per calibration view).
    pub rvecs: Vec<Vector3<f64>>,
    /// Per-view translation vectors.
    pub tvecs: Vec<Vector3<f64>>,
    /// Reprojection RMS error.
    pub rms_error: f64,
}

/// Numerical solver turning correspondences into camera parameters.
pub trait CalibrationSolver {
    fn calibrate(
        &self,
        correspondences: &CorrespondenceSet,
        image_size: ImageSize,
    ) -> Result<CameraCalibration, CalibrationError>;
}

/// Applies the inverse distortion model to an image.
pub trait ImageUndistorter {
    type Image;

    /// Return a same-size corrected image.
    fn undistort(
        &self,
        image: &Self::Image,
        calibration: &CameraCalibration,
    ) -> Result<Self::Image, CalibrationError>;
}

/// Flatten a matrix row-major, the order the diagnostics report uses.
pub(crate) fn flatten_row_major(m: &Matrix3<f64>) -> Vec<f64> {
    (0..3).flat_map(|r| (0..3).map(move |c| m[(r, c)])).collect()
}
