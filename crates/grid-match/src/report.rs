//! Serializable stage diagnostics.
//!
//! The report collects every intermediate statistic the matcher derives
//! (medians, counts, mean displacements, grid scales) plus the final
//! correspondences and calibration numbers. Axis sections are populated
//! even when estimation fails partway; absent optional fields mark the
//! depth that starved.

use grid_match_core::{AxisSpacing, CorrespondenceSet};
use serde::Serialize;

use crate::calibrate::{flatten_row_major, CameraCalibration};

/// Mean displacement vector of the pairs accepted at one step depth.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct MeanDisplacement {
    pub dx: f64,
    pub dy: f64,
}

/// Per-axis spacing diagnostics.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisReport {
    /// Median of consecutive signed differences along the axis.
    pub median: f64,
    pub one_step_count: usize,
    pub two_step_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_step_mean: Option<MeanDisplacement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_step_mean: Option<MeanDisplacement>,
    /// Grid pitch in image units per physical-separation unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl From<&AxisSpacing> for AxisReport {
    fn from(spacing: &AxisSpacing) -> Self {
        let mean = |v: nalgebra::Vector2<f64>| MeanDisplacement { dx: v.x, dy: v.y };
        Self {
            median: spacing.median,
            one_step_count: spacing.one_step.count,
            two_step_count: spacing.two_step.count,
            one_step_mean: spacing.one_step_mean().map(mean),
            two_step_mean: spacing.two_step_mean().map(mean),
            scale: spacing.scale,
        }
    }
}

/// One matched pair: image point and recentered, separation-scaled object
/// coordinates.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrespondenceRecord {
    pub x: f64,
    pub y: f64,
    pub obj_x: f64,
    pub obj_y: f64,
    pub obj_z: f64,
}

/// Calibration numbers in report form; matrices flattened row-major.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationReport {
    pub rms_error: f64,
    pub camera: Vec<f64>,
    pub dist_coeffs: Vec<f64>,
    pub rvecs: Vec<[f64; 3]>,
    pub tvecs: Vec<[f64; 3]>,
}

impl From<&CameraCalibration> for CalibrationReport {
    fn from(c: &CameraCalibration) -> Self {
        Self {
            rms_error: c.rms_error,
            camera: flatten_row_major(&c.camera_matrix),
            dist_coeffs: c.dist_coeffs.clone(),
            rvecs: c.rvecs.iter().map(|v| [v.x, v.y, v.z]).collect(),
            tvecs: c.tvecs.iter().map(|v| [v.x, v.y, v.z]).collect(),
        }
    }
}

/// Full stage diagnostics.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchGridReport {
    pub columns: AxisReport,
    pub rows: AxisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correspondences: Option<Vec<CorrespondenceRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration: Option<CalibrationReport>,
}

pub(crate) fn correspondence_records(set: &CorrespondenceSet) -> Vec<CorrespondenceRecord> {
    set.pairs()
        .map(|(img, obj)| CorrespondenceRecord {
            x: img.x,
            y: img.y,
            obj_x: obj.x,
            obj_y: obj.y,
            obj_z: obj.z,
        })
        .collect()
}
