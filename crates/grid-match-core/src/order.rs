use nalgebra::Point2;

/// Errors raised while preparing the input point set.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    #[error("expected at least 2 grid points, got {got}")]
    NotEnoughPoints { got: usize },
    #[error("grid point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
}

/// The two sorted traversals of one input point set.
///
/// Both views are permutations of the same multiset of points:
/// - row-major: ascending y, ties broken by ascending x (reads the grid one
///   row at a time),
/// - column-major: ascending x, ties broken by ascending y (reads the grid
///   one column at a time).
///
/// Construction rejects sets with fewer than 2 points or any non-finite
/// coordinate, so every view is totally ordered by `f64::total_cmp`.
#[derive(Clone, Debug)]
pub struct PointOrdering {
    row_major: Vec<Point2<f64>>,
    col_major: Vec<Point2<f64>>,
}

impl PointOrdering {
    pub fn new(points: &[Point2<f64>]) -> Result<Self, OrderingError> {
        if points.len() < 2 {
            return Err(OrderingError::NotEnoughPoints { got: points.len() });
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(OrderingError::NonFiniteCoordinate { index });
        }

        let mut row_major = points.to_vec();
        row_major.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        let mut col_major = points.to_vec();
        col_major.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

        Ok(Self {
            row_major,
            col_major,
        })
    }

    /// Points ordered by ascending y, ties by ascending x.
    #[inline]
    pub fn row_major(&self) -> &[Point2<f64>] {
        &self.row_major
    }

    /// Points ordered by ascending x, ties by ascending y.
    #[inline]
    pub fn col_major(&self) -> &[Point2<f64>] {
        &self.col_major
    }

    /// Number of input points (shared by both views).
    #[inline]
    pub fn len(&self) -> usize {
        self.row_major.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_major.is_empty()
    }
}
