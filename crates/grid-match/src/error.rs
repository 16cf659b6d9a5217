use grid_match_core::OrderingError;

use crate::calibrate::CalibrationError;
use crate::report::MatchGridReport;

/// Errors produced by the grid-correspondence stage.
///
/// All variants are fatal to the stage's own output; none are retried.
/// Spacing and correspondence failures carry the diagnostics collected up
/// to the failure point.
#[derive(thiserror::Error, Debug)]
pub enum MatchGridError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("expected at least 2 grid points, got {got}")]
    NotEnoughPoints { got: usize },

    #[error("grid point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    /// One or both axes starved a tolerance band. Row and column failures
    /// are independent; when both fail the messages are joined with "; ".
    #[error("spacing estimation failed: {message}")]
    SpacingEstimation {
        message: String,
        report: Box<MatchGridReport>,
    },

    #[error("no point pairs matched within the column tolerance band")]
    EmptyCorrespondence { report: Box<MatchGridReport> },

    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

impl MatchGridError {
    /// Diagnostics collected before the stage failed, when any.
    pub fn report(&self) -> Option<&MatchGridReport> {
        match self {
            Self::SpacingEstimation { report, .. } | Self::EmptyCorrespondence { report } => {
                Some(report)
            }
            _ => None,
        }
    }
}

impl From<OrderingError> for MatchGridError {
    fn from(err: OrderingError) -> Self {
        match err {
            OrderingError::NotEnoughPoints { got } => Self::NotEnoughPoints { got },
            OrderingError::NonFiniteCoordinate { index } => Self::NonFiniteCoordinate { index },
        }
    }
}
