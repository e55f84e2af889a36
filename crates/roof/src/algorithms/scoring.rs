use crate::{traits::ContourScorer, types::SimplifiedPolygon};

/// Scores candidates by enclosed area relative to a reference roof size.
///
/// Deterministic stand-in for a learned classifier: anything at or above
/// `reference_area` square pixels scores 1.0.
#[derive(Debug, Clone)]
pub struct AreaScorer {
    pub reference_area: f64,
}

impl Default for AreaScorer {
    fn default() -> Self {
        Self { reference_area: 400.0 }
    }
}

impl ContourScorer for AreaScorer {
    fn score(&self, polygon: &SimplifiedPolygon) -> f32 {
        if self.reference_area <= 0.0 {
            return 1.0;
        }
        (polygon.area() / self.reference_area).clamp(0.0, 1.0) as f32
    }
}
