use crate::{
    traits::ContourSimplifier,
    types::{RawContour, SimplifiedPolygon},
};

/// Douglas-Peucker simplifier using geo crate's implementation.
///
/// Tolerance scales with the contour: `perimeter_ratio * perimeter`, so small
/// and large roofs settle on comparable vertex counts.
#[derive(Debug, Clone)]
pub struct DouglasPeuckerSimplifier {
    pub perimeter_ratio: f64,
}

impl Default for DouglasPeuckerSimplifier {
    fn default() -> Self {
        Self { perimeter_ratio: 0.01 }
    }
}

impl DouglasPeuckerSimplifier {
    pub fn tolerance(&self, contour: &RawContour) -> f64 {
        self.perimeter_ratio * contour.perimeter()
    }
}

impl ContourSimplifier for DouglasPeuckerSimplifier {
    fn simplify(&self, contour: &RawContour) -> Option<SimplifiedPolygon> {
        use geo::Simplify;

        let tolerance = self.tolerance(contour);
        let polygon = contour.to_geo_polygon();
        let simplified = polygon.exterior().simplify(&tolerance);

        let mut vertices: Vec<[f64; 2]> = simplified
            .coords()
            .map(|coord| [coord.x, coord.y])
            .collect();

        // Drop the closing vertex; the ring stays closed implicitly
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        (vertices.len() >= 3).then(|| SimplifiedPolygon::new(vertices))
    }
}
