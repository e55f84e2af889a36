use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use geo_types::{Coord, LineString, Polygon};
use schemars::JsonSchema;
use ts_rs::TS;

/// A geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Geographic extent of a captured map viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoBoundingBox {
    pub north_east: LatLng,
    pub south_west: LatLng,
}

impl GeoBoundingBox {
    pub fn new(north_east: LatLng, south_west: LatLng) -> Self {
        Self { north_east, south_west }
    }

    pub fn lat_span(&self) -> f64 {
        self.north_east.lat - self.south_west.lat
    }

    pub fn lng_span(&self) -> f64 {
        self.north_east.lng - self.south_west.lng
    }

    /// North-east strictly north of south-west, non-zero longitude span, finite corners
    pub fn is_valid(&self) -> bool {
        let finite = [
            self.north_east.lat,
            self.north_east.lng,
            self.south_west.lat,
            self.south_west.lng,
        ]
        .iter()
        .all(|v| v.is_finite());

        finite && self.lat_span() > 0.0 && self.lng_span() != 0.0
    }
}

/// A traced boundary in mask pixel space, in tracing order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawContour {
    pub points: Vec<[f64; 2]>,
}

impl RawContour {
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Self { points }
    }

    /// Closed ring as a geo-types polygon
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        ring_polygon(&self.points)
    }

    /// Enclosed area in square pixels
    pub fn area(&self) -> f64 {
        use geo::Area;
        self.to_geo_polygon().unsigned_area()
    }

    /// Length of the closed boundary in pixels
    pub fn perimeter(&self) -> f64 {
        use geo::EuclideanLength;
        self.to_geo_polygon().exterior().euclidean_length()
    }
}

/// Reduced vertex ring approximating a raw contour. Closed implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedPolygon {
    pub vertices: Vec<[f64; 2]>,
}

impl SimplifiedPolygon {
    pub fn new(vertices: Vec<[f64; 2]>) -> Self {
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        ring_polygon(&self.vertices)
    }

    pub fn area(&self) -> f64 {
        use geo::Area;
        self.to_geo_polygon().unsigned_area()
    }

    /// Axis-aligned bounding box of the vertices as (min, max)
    pub fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for &[x, y] in &self.vertices {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        ([min_x, min_y], [max_x, max_y])
    }
}

fn ring_polygon(points: &[[f64; 2]]) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = points
        .iter()
        .map(|&[x, y]| Coord { x, y })
        .collect();

    // Polygon::new closes the ring
    Polygon::new(LineString::new(coords), vec![])
}

/// Roof pitch expressed as rise over a 12 unit run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Pitch {
    /// `2/12`, light shadow
    Shallow,
    /// `3/12`, assigned to hand-drawn sections
    ManualDefault,
    /// `4/12`
    Medium,
    /// `6/12`, dark shadow
    Steep,
    /// Free-form label entered by the user
    Custom(String),
}

impl Pitch {
    pub fn label(&self) -> &str {
        match self {
            Pitch::Shallow => "2/12",
            Pitch::ManualDefault => "3/12",
            Pitch::Medium => "4/12",
            Pitch::Steep => "6/12",
            Pitch::Custom(label) => label,
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Pitch {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "2/12" => Pitch::Shallow,
            "3/12" => Pitch::ManualDefault,
            "4/12" => Pitch::Medium,
            "6/12" => Pitch::Steep,
            other => Pitch::Custom(other.to_string()),
        })
    }
}

impl From<String> for Pitch {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(pitch) => pitch,
            Err(never) => match never {},
        }
    }
}

impl From<Pitch> for String {
    fn from(value: Pitch) -> Self {
        value.label().to_string()
    }
}

/// How a section came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, TS, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SectionSource {
    Detected,
    #[default]
    Manual,
}

/// One closed geographic roof polygon with its measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofSection {
    pub vertices: Vec<LatLng>,
    pub area_sqft: u64,
    pub pitch: Pitch,
    pub source: SectionSource,
}

impl RoofSection {
    /// Build a section, measuring its area from the vertices
    pub fn new(vertices: Vec<LatLng>, pitch: Pitch, source: SectionSource) -> Self {
        let area_sqft = crate::measurement::measure(&vertices);
        Self {
            vertices,
            area_sqft,
            pitch,
            source,
        }
    }
}
