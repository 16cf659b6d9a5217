use log::debug;
use nalgebra::{Point2, Point3, Vector2, Vector3};

use crate::{AxisSpacing, PointOrdering};

/// The grid-assignment traversal accepted no point pair, so there is
/// nothing to center or calibrate on.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("no point pairs matched within the column tolerance band")]
pub struct EmptyGridError;

/// Integer grid labeling of a connected run of points.
///
/// `image_points` and `object_points` are parallel, index-aligned arrays.
/// Object coordinates are integral-valued (column, row, 0) labels in grid
/// steps; `centroid` is their mean. Use [`GridAssignment::recenter`] to get
/// physical-unit correspondences.
#[derive(Clone, Debug)]
pub struct GridAssignment {
    pub image_points: Vec<Point2<f64>>,
    pub object_points: Vec<Point3<f64>>,
    pub centroid: Point2<f64>,
}

/// Matched image/object point pairs in physical units, centered on the
/// grid centroid. Parallel arrays, never mutated after construction.
#[derive(Clone, Debug, Default)]
pub struct CorrespondenceSet {
    pub image_points: Vec<Point2<f64>>,
    pub object_points: Vec<Point3<f64>>,
}

impl CorrespondenceSet {
    #[inline]
    pub fn len(&self) -> usize {
        self.image_points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.image_points.is_empty()
    }

    /// Iterate index-aligned (image, object) pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&Point2<f64>, &Point3<f64>)> {
        self.image_points.iter().zip(self.object_points.iter())
    }
}

impl GridAssignment {
    pub fn len(&self) -> usize {
        self.image_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image_points.is_empty()
    }

    /// Re-center the labels on the centroid and scale by the physical grid
    /// separations. Every output object point carries `obj_z` as depth.
    pub fn recenter(&self, separation: Vector2<f64>, obj_z: f64) -> CorrespondenceSet {
        let object_points = self
            .object_points
            .iter()
            .map(|p| {
                Point3::new(
                    separation.x * (p.x - self.centroid.x),
                    separation.y * (p.y - self.centroid.y),
                    obj_z,
                )
            })
            .collect();
        CorrespondenceSet {
            image_points: self.image_points.clone(),
            object_points,
        }
    }
}

/// Walk the row-major ordering and label connected runs with integer
/// (column, row) grid coordinates.
///
/// Consecutive pairs inside the 1-step column band are grid neighbors; the
/// first accepted pair seeds the labeling, later accepted pairs extend it by
/// the rounded pitch-normalized image displacement. Pairs outside the band
/// are skipped point by point, and a run restarting after skips is stitched
/// to the previous one through the same rounded displacement.
pub fn assign_grid_coordinates(
    ordering: &PointOrdering,
    columns: &AxisSpacing,
    image_pitch: Vector2<f64>,
) -> Result<GridAssignment, EmptyGridError> {
    let points = ordering.row_major();
    let band = columns.band;
    // Differences are prev − cur over an ascending scan, so a negative
    // column median means x grows along the traversal.
    let col_step = if columns.median < 0.0 { 1.0 } else { -1.0 };

    let mut image_points: Vec<Point2<f64>> = Vec::new();
    let mut object_points: Vec<Point3<f64>> = Vec::new();
    let mut centroid_sum = Vector2::zeros();

    // Last labeled image point and its label; valid once the seed is placed.
    let mut tracked = points[0];
    let mut label = Point3::origin();

    for i in 1..points.len() {
        let prev = points[i - 1];
        let cur = points[i];
        let d1 = (prev.x - cur.x).trunc();
        if !band.contains(d1) {
            continue;
        }

        if object_points.is_empty() {
            label = Point3::new(
                round_half_away(prev.x / image_pitch.x),
                round_half_away(prev.y / image_pitch.y),
                0.0,
            );
            emit(&mut image_points, &mut object_points, &mut centroid_sum, prev, label);
            label.x += col_step;
            emit(&mut image_points, &mut object_points, &mut centroid_sum, cur, label);
            tracked = cur;
            continue;
        }

        if tracked != prev {
            label += grid_step(prev - tracked, image_pitch);
            tracked = prev;
            emit(&mut image_points, &mut object_points, &mut centroid_sum, prev, label);
        }
        label += grid_step(cur - tracked, image_pitch);
        tracked = cur;
        emit(&mut image_points, &mut object_points, &mut centroid_sum, cur, label);
    }

    if object_points.is_empty() {
        return Err(EmptyGridError);
    }

    let centroid = Point2::from(centroid_sum / object_points.len() as f64);
    debug!(
        "labeled {} of {} points, centroid ({:.3}, {:.3})",
        object_points.len(),
        points.len(),
        centroid.x,
        centroid.y
    );

    Ok(GridAssignment {
        image_points,
        object_points,
        centroid,
    })
}

fn emit(
    image_points: &mut Vec<Point2<f64>>,
    object_points: &mut Vec<Point3<f64>>,
    centroid_sum: &mut Vector2<f64>,
    image: Point2<f64>,
    label: Point3<f64>,
) {
    image_points.push(image);
    object_points.push(label);
    *centroid_sum += Vector2::new(label.x, label.y);
}

/// Integer label displacement for an image displacement, per axis.
fn grid_step(delta: Vector2<f64>, image_pitch: Vector2<f64>) -> Vector3<f64> {
    Vector3::new(
        round_half_away(delta.x / image_pitch.x),
        round_half_away(delta.y / image_pitch.y),
        0.0,
    )
}

/// Round to the nearest integer with halves away from zero.
fn round_half_away(v: f64) -> f64 {
    let shifted = if v < 0.0 { v - 0.5 } else { v + 0.5 };
    shifted.trunc()
}
