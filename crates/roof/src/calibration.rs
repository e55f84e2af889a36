//! Pixel to geographic mapping for a captured map viewport.
//!
//! The mapping is a pure function of the image size and the viewport's
//! bounding box. How pixel rows map to latitude is delegated to a
//! [`Projection`]; the default is the linear (equirectangular) approximation,
//! which is accurate enough over the small angular extent of one viewport.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    error::{Result, RoofError},
    types::{GeoBoundingBox, LatLng},
};

/// Web-Mercator cannot represent latitudes beyond this
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// Strategy for mapping normalised viewport positions to geographic points.
///
/// `u` runs west to east and `v` runs north to south, both over `[0, 1]`.
/// Implement this to plug a custom mapping into a [`Calibration`] or a
/// detector.
pub trait Projection: fmt::Debug + Send + Sync {
    fn unproject(&self, u: f64, v: f64, bounds: &GeoBoundingBox) -> LatLng;
    fn project(&self, point: LatLng, bounds: &GeoBoundingBox) -> (f64, f64);

    /// Whether the viewport can be represented at all
    fn supports(&self, _bounds: &GeoBoundingBox) -> bool {
        true
    }

    fn name(&self) -> String {
        "custom".to_string()
    }
}

impl<P: Projection + ?Sized> Projection for &P {
    fn unproject(&self, u: f64, v: f64, bounds: &GeoBoundingBox) -> LatLng {
        (**self).unproject(u, v, bounds)
    }

    fn project(&self, point: LatLng, bounds: &GeoBoundingBox) -> (f64, f64) {
        (**self).project(point, bounds)
    }

    fn supports(&self, bounds: &GeoBoundingBox) -> bool {
        (**self).supports(bounds)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProjectionKind {
    /// Latitude and longitude both linear in pixels
    #[default]
    Equirectangular,
    /// Longitude linear, latitude through the inverse Mercator transform
    WebMercator,
}

impl Projection for ProjectionKind {
    fn unproject(&self, u: f64, v: f64, bounds: &GeoBoundingBox) -> LatLng {
        let sw = bounds.south_west;
        let lng = sw.lng + bounds.lng_span() * u;
        let lat = match self {
            Self::Equirectangular => sw.lat + bounds.lat_span() * (1.0 - v),
            Self::WebMercator => {
                let south = mercator_y(sw.lat);
                let north = mercator_y(bounds.north_east.lat);
                inverse_mercator_y(south + (north - south) * (1.0 - v))
            }
        };
        LatLng { lat, lng }
    }

    fn project(&self, point: LatLng, bounds: &GeoBoundingBox) -> (f64, f64) {
        let sw = bounds.south_west;
        let u = (point.lng - sw.lng) / bounds.lng_span();
        let v = match self {
            Self::Equirectangular => 1.0 - (point.lat - sw.lat) / bounds.lat_span(),
            Self::WebMercator => {
                let south = mercator_y(sw.lat);
                let north = mercator_y(bounds.north_east.lat);
                1.0 - (mercator_y(point.lat) - south) / (north - south)
            }
        };
        (u, v)
    }

    fn supports(&self, bounds: &GeoBoundingBox) -> bool {
        match self {
            Self::Equirectangular => true,
            Self::WebMercator => {
                bounds.north_east.lat.abs() <= MERCATOR_MAX_LAT
                    && bounds.south_west.lat.abs() <= MERCATOR_MAX_LAT
            }
        }
    }

    fn name(&self) -> String {
        self.to_string()
    }
}

fn mercator_y(lat: f64) -> f64 {
    let phi = lat.to_radians();
    (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln()
}

fn inverse_mercator_y(y: f64) -> f64 {
    y.sinh().atan().to_degrees()
}

/// Pixel to geographic transform for one capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration<P = ProjectionKind> {
    width: u32,
    height: u32,
    bounds: GeoBoundingBox,
    projection: P,
}

impl Calibration {
    pub fn new(width: u32, height: u32, bounds: GeoBoundingBox) -> Result<Self> {
        Self::with_projection(width, height, bounds, ProjectionKind::default())
    }
}

impl<P: Projection> Calibration<P> {
    pub fn with_projection(
        width: u32,
        height: u32,
        bounds: GeoBoundingBox,
        projection: P,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RoofError::InvalidDimensions { width, height });
        }
        if !bounds.is_valid() || !projection.supports(&bounds) {
            return Err(RoofError::InvalidBounds);
        }

        Ok(Self {
            width,
            height,
            bounds,
            projection,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> &GeoBoundingBox {
        &self.bounds
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn to_geo(&self, x: f64, y: f64) -> LatLng {
        let u = x / f64::from(self.width);
        let v = y / f64::from(self.height);
        self.projection.unproject(u, v, &self.bounds)
    }

    pub fn to_pixel(&self, point: LatLng) -> (f64, f64) {
        let (u, v) = self.projection.project(point, &self.bounds);
        (u * f64::from(self.width), v * f64::from(self.height))
    }
}
