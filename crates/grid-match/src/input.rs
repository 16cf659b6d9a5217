//! JSON boundary for point input.
//!
//! Upstream pipeline stages publish detected features as a `rects` array
//! inside a per-stage model object. This module resolves a named stage in
//! such a model and extracts the candidate grid points, skipping entries
//! without numeric `x`/`y` fields.

use nalgebra::Point2;
use serde_json::Value;

use crate::error::MatchGridError;

/// Extract grid points from a `rects` array.
///
/// Entries missing `x` or `y`, or holding non-numeric values, are excluded
/// silently.
pub fn points_from_rects(rects: &[Value]) -> Vec<Point2<f64>> {
    rects
        .iter()
        .filter_map(|rect| {
            let x = rect.get("x")?.as_f64()?;
            let y = rect.get("y")?.as_f64()?;
            Some(Point2::new(x, y))
        })
        .collect()
}

/// Resolve the `rects` array of a named prior stage inside a pipeline
/// model.
pub fn rects_from_model<'a>(
    model: &'a Value,
    stage: &str,
) -> Result<&'a [Value], MatchGridError> {
    if stage.is_empty() {
        return Err(MatchGridError::InvalidConfig(
            "expected the name of a stage holding rects".into(),
        ));
    }
    let stage_model = model
        .get(stage)
        .filter(|v| v.is_object())
        .ok_or_else(|| {
            MatchGridError::InvalidConfig(format!("stage \"{stage}\" is not in the model"))
        })?;
    stage_model
        .get("rects")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| {
            MatchGridError::InvalidInput(format!(
                "stage \"{stage}\" has no array of rects to match"
            ))
        })
}
