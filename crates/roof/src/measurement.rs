//! Planar area of geographic polygons on a spherical Earth.

use std::f64::consts::FRAC_PI_2;

use crate::types::{LatLng, RoofSection};

/// Sphere radius used for area, matching the common web-map convention
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Square feet per square metre
pub const SQFT_PER_SQM: f64 = 10.764;

/// Signed area of a closed ring in square metres.
///
/// Sums the signed areas of the polar triangles formed by each edge and the
/// north pole. The sign follows ring orientation; counter-clockwise is
/// positive.
pub fn signed_area_m2(ring: &[LatLng]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let Some(last) = ring.last() else {
        return 0.0;
    };
    let mut prev_tan_lat = half_colatitude_tan(last.lat);
    let mut prev_lng = last.lng.to_radians();

    let mut total = 0.0;
    for point in ring {
        let tan_lat = half_colatitude_tan(point.lat);
        let lng = point.lng.to_radians();
        total += polar_triangle_area(tan_lat, lng, prev_tan_lat, prev_lng);
        prev_tan_lat = tan_lat;
        prev_lng = lng;
    }

    total * EARTH_RADIUS_M * EARTH_RADIUS_M
}

fn half_colatitude_tan(lat: f64) -> f64 {
    ((FRAC_PI_2 - lat.to_radians()) / 2.0).tan()
}

fn polar_triangle_area(tan1: f64, lng1: f64, tan2: f64, lng2: f64) -> f64 {
    let delta_lng = lng1 - lng2;
    let t = tan1 * tan2;
    2.0 * (t * delta_lng.sin()).atan2(1.0 + t * delta_lng.cos())
}

/// Unsigned area of a closed ring in square metres, zero for degenerate rings
pub fn area_m2(ring: &[LatLng]) -> f64 {
    if distinct_vertices(ring) < 3 {
        return 0.0;
    }
    signed_area_m2(ring).abs()
}

/// Area in whole square feet. Fewer than three distinct vertices gives zero.
pub fn measure(ring: &[LatLng]) -> u64 {
    let sqft = area_m2(ring) * SQFT_PER_SQM;
    if sqft.is_finite() {
        sqft.round() as u64
    } else {
        0
    }
}

/// Sum of per-section rounded areas, folded left to right
pub fn total_area_sqft<'a>(sections: impl IntoIterator<Item = &'a RoofSection>) -> u64 {
    sections
        .into_iter()
        .fold(0, |total, section| total + section.area_sqft)
}

fn distinct_vertices(ring: &[LatLng]) -> usize {
    let mut seen: Vec<&LatLng> = Vec::with_capacity(ring.len());
    for point in ring {
        if !seen.iter().any(|p| *p == point) {
            seen.push(point);
            if seen.len() >= 3 {
                break;
            }
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Pitch, SectionSource};

    fn analytic_cell_area_m2(lat_min: f64, lat_max: f64, lng_span: f64) -> f64 {
        EARTH_RADIUS_M
            * EARTH_RADIUS_M
            * lng_span.to_radians()
            * (lat_max.to_radians().sin() - lat_min.to_radians().sin())
    }

    #[test]
    fn fewer_than_three_vertices_is_zero() {
        assert_eq!(measure(&[]), 0);
        assert_eq!(measure(&[LatLng::new(1.0, 1.0)]), 0);
        assert_eq!(measure(&[LatLng::new(1.0, 1.0), LatLng::new(1.0, 2.0)]), 0);
    }

    #[test]
    fn coincident_and_collinear_vertices_are_zero() {
        let p = LatLng::new(52.13, -106.67);
        assert_eq!(measure(&[p, p, p, p]), 0);

        let meridian = [
            LatLng::new(52.13, -106.67),
            LatLng::new(52.135, -106.67),
            LatLng::new(52.14, -106.67),
        ];
        assert_eq!(measure(&meridian), 0);
    }

    #[test]
    fn one_degree_cell_at_equator_matches_analytic_area() {
        let ring = [
            LatLng::new(-0.5, -0.5),
            LatLng::new(-0.5, 0.5),
            LatLng::new(0.5, 0.5),
            LatLng::new(0.5, -0.5),
        ];
        let expected = analytic_cell_area_m2(-0.5, 0.5, 1.0);
        let actual = area_m2(&ring);
        assert!(((actual - expected) / expected).abs() < 1e-4, "{actual} vs {expected}");
    }

    #[test]
    fn orientation_only_changes_sign() {
        let ring = vec![
            LatLng::new(52.13, -106.68),
            LatLng::new(52.13, -106.67),
            LatLng::new(52.14, -106.67),
        ];
        let mut reversed = ring.clone();
        reversed.reverse();
        let forward = signed_area_m2(&ring);
        let backward = signed_area_m2(&reversed);
        assert!((forward + backward).abs() < 1e-6);
        assert_eq!(measure(&ring), measure(&reversed));
    }

    #[test]
    fn small_lot_in_square_feet() {
        // Roughly 20m x 15m near Saskatoon
        let lat: f64 = 52.1332;
        let dlat = 15.0 / 111_319.49;
        let dlng = 20.0 / (111_319.49 * lat.to_radians().cos());
        let ring = [
            LatLng::new(lat, -106.67),
            LatLng::new(lat, -106.67 + dlng),
            LatLng::new(lat + dlat, -106.67 + dlng),
            LatLng::new(lat + dlat, -106.67),
        ];
        let sqft = measure(&ring) as f64;
        let expected = 300.0 * SQFT_PER_SQM;
        assert!((sqft - expected).abs() / expected < 0.01, "{sqft} vs {expected}");
    }

    #[test]
    fn total_sums_rounded_section_areas() {
        let section = |area_sqft| RoofSection {
            vertices: Vec::new(),
            area_sqft,
            pitch: Pitch::ManualDefault,
            source: SectionSource::Manual,
        };
        let sections = [section(101), section(250), section(7)];
        assert_eq!(total_area_sqft(&sections), 358);
    }
}
