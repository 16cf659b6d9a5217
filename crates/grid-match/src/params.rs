use serde::{Deserialize, Serialize};

use crate::error::MatchGridError;

/// Configuration for the grid-correspondence stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchGridParams {
    /// Depth assigned to every object point.
    pub obj_z: f64,
    /// Physical grid spacing along columns (x), in real-world units.
    pub sep_x: f64,
    /// Physical grid spacing along rows (y), in real-world units.
    pub sep_y: f64,
    /// Fractional half-width of the spacing tolerance band.
    pub tolerance: f64,
}

impl Default for MatchGridParams {
    fn default() -> Self {
        Self {
            obj_z: 0.0,
            sep_x: 5.0,
            sep_y: 5.0,
            tolerance: 0.35,
        }
    }
}

impl MatchGridParams {
    pub fn validate(&self) -> Result<(), MatchGridError> {
        if !self.sep_x.is_finite() || self.sep_x <= 0.0 {
            return Err(MatchGridError::InvalidConfig(format!(
                "sepX must be a positive number, got {}",
                self.sep_x
            )));
        }
        if !self.sep_y.is_finite() || self.sep_y <= 0.0 {
            return Err(MatchGridError::InvalidConfig(format!(
                "sepY must be a positive number, got {}",
                self.sep_y
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 || self.tolerance >= 1.0 {
            return Err(MatchGridError::InvalidConfig(format!(
                "tolerance must lie in (0, 1), got {}",
                self.tolerance
            )));
        }
        if !self.obj_z.is_finite() {
            return Err(MatchGridError::InvalidConfig(format!(
                "objZ must be finite, got {}",
                self.obj_z
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stage_conventions() {
        let params = MatchGridParams::default();
        assert_eq!(0.0, params.obj_z);
        assert_eq!(5.0, params.sep_x);
        assert_eq!(5.0, params.sep_y);
        assert_eq!(0.35, params.tolerance);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn deserializes_with_partial_overrides() {
        let params: MatchGridParams =
            serde_json::from_str(r#"{"sepX": 2.5, "tolerance": 0.2}"#).expect("params");
        assert_eq!(2.5, params.sep_x);
        assert_eq!(5.0, params.sep_y);
        assert_eq!(0.2, params.tolerance);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad_sep = MatchGridParams {
            sep_x: 0.0,
            ..Default::default()
        };
        assert!(bad_sep.validate().is_err());

        let bad_tol = MatchGridParams {
            tolerance: 1.0,
            ..Default::default()
        };
        assert!(bad_tol.validate().is_err());

        let bad_z = MatchGridParams {
            obj_z: f64::NAN,
            ..Default::default()
        };
        assert!(bad_z.validate().is_err());
    }
}
