use crate::{
    calibration::{Calibration, Projection},
    error::{Result, RoofError},
    types::{LatLng, SimplifiedPolygon},
};

/// Map every vertex of a pixel-space polygon to geographic coordinates.
/// Vertex count and order are preserved.
pub fn project_polygon<P: Projection>(
    calibration: &Calibration<P>,
    polygon: &SimplifiedPolygon,
) -> Result<Vec<LatLng>> {
    if polygon.len() < 3 {
        return Err(RoofError::MalformedPolygon { vertices: polygon.len() });
    }

    Ok(polygon
        .vertices
        .iter()
        .map(|&[x, y]| calibration.to_geo(x, y))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeoBoundingBox;

    fn calibration() -> Calibration {
        let bounds = GeoBoundingBox::new(LatLng::new(1.0, 1.0), LatLng::new(0.0, 0.0));
        Calibration::new(100, 100, bounds).unwrap()
    }

    #[test]
    fn preserves_vertex_order() {
        let polygon = SimplifiedPolygon::new(vec![[0.0, 0.0], [100.0, 0.0], [50.0, 100.0]]);
        let ring = project_polygon(&calibration(), &polygon).unwrap();
        assert_eq!(ring.len(), 3);
        assert_eq!(ring[0], LatLng::new(1.0, 0.0));
        assert_eq!(ring[1], LatLng::new(1.0, 1.0));
        assert_eq!(ring[2], LatLng::new(0.0, 0.5));
    }

    #[test]
    fn rejects_fewer_than_three_vertices() {
        let polygon = SimplifiedPolygon::new(vec![[0.0, 0.0], [10.0, 10.0]]);
        let err = project_polygon(&calibration(), &polygon).unwrap_err();
        assert!(matches!(err, RoofError::MalformedPolygon { vertices: 2 }));
    }
}
