use image::{GrayImage, RgbImage};
use crate::{
    error::Result,
    types::{Pitch, RawContour, SimplifiedPolygon},
};

/// Trait for producing a binary roof mask (0 or 255 per pixel) from a color image
pub trait MaskSegmenter: Send + Sync {
    fn segment(&self, image: &RgbImage) -> Result<GrayImage>;
}

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Trace the outer boundaries of the foreground regions of a mask
    fn extract_contours(&self, mask: &GrayImage) -> Result<Vec<RawContour>>;
}

/// Trait for contour simplification algorithms
pub trait ContourSimplifier: Send + Sync {
    /// Reduce a raw contour to a low-vertex polygon.
    /// Returns `None` when fewer than three vertices survive.
    fn simplify(&self, contour: &RawContour) -> Option<SimplifiedPolygon>;
}

/// Confidence scorer for candidate sections, used to filter detections
pub trait ContourScorer: Send + Sync {
    /// Confidence in `[0, 1]` that the polygon outlines a roof
    fn score(&self, polygon: &SimplifiedPolygon) -> f32;
}

/// Trait for pitch estimation from the image around a section
pub trait PitchEstimator: Send + Sync {
    fn estimate(&self, polygon: &SimplifiedPolygon, gray: &GrayImage) -> Pitch;
}
