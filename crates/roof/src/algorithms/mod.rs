pub mod segmentation;
pub mod extraction;
pub mod simplification;
pub mod scoring;

pub use segmentation::*;
pub use extraction::*;
pub use simplification::*;
pub use scoring::*;

use image::GrayImage;
use tracing::debug;
use crate::{
    error::Result,
    traits::{ContourExtractor, ContourSimplifier},
    types::SimplifiedPolygon,
};

/// Trace, filter and simplify the outer boundaries of a mask.
///
/// An empty result means nothing was detected; it is not an error.
pub fn extract_polygons(
    mask: &GrayImage,
    extractor: &dyn ContourExtractor,
    simplifier: &dyn ContourSimplifier,
    min_area: f64,
) -> Result<Vec<SimplifiedPolygon>> {
    let contours = extractor.extract_contours(mask)?;
    let traced = contours.len();

    let polygons: Vec<SimplifiedPolygon> = contours
        .iter()
        .filter(|contour| contour.area() >= min_area)
        .filter_map(|contour| simplifier.simplify(contour))
        .collect();

    debug!(traced, kept = polygons.len(), min_area, "extracted contours");
    Ok(polygons)
}
