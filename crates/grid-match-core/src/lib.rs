//! Grid-correspondence inference for planar calibration targets.
//!
//! Given an unordered set of noisy 2D feature points that lie on an
//! approximately regular, axis-aligned grid, this crate estimates the grid
//! pitch along both axes, labels each point with integer (column, row)
//! coordinates, and produces image/object point correspondences centered on
//! the grid's centroid.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete feature detector, image type, or calibration
//! solver.

mod assign;
mod order;
mod spacing;

pub use assign::{
    assign_grid_coordinates, CorrespondenceSet, EmptyGridError, GridAssignment,
};
pub use order::{OrderingError, PointOrdering};
pub use spacing::{
    estimate_axis_spacing, Axis, AxisSpacing, SpacingFailure, StepStats, ToleranceBand,
};
