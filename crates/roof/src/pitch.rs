//! Shadow-intensity pitch heuristic.
//!
//! A steeper roof casts a darker, denser shadow on the ground below it under
//! a fixed sun position. The band directly below a section's bounding box is
//! sampled and its mean gray level bucketed into a pitch class. This is a
//! coarse ordinal estimate and degrades with sun angle and season.

use image::GrayImage;
use tracing::debug;

use crate::{
    config::PitchThresholds,
    traits::PitchEstimator,
    types::{Pitch, SimplifiedPolygon},
};

/// Pixel rectangle, half-open on the right and bottom edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Band directly below the polygon's bounding box, clipped to the image.
/// `None` when nothing of the image lies below the polygon.
pub fn shadow_band(polygon: &SimplifiedPolygon, width: u32, height: u32, band_height: u32) -> Option<Band> {
    if polygon.is_empty() {
        return None;
    }
    let (min, max) = polygon.bounding_box();
    if !(min[0].is_finite() && min[1].is_finite() && max[0].is_finite() && max[1].is_finite()) {
        return None;
    }

    let top = (max[1].floor() + 1.0).max(0.0);
    if top >= f64::from(height) {
        return None;
    }
    let top = top as u32;
    let band_height = band_height.min(height - top);

    let left = min[0].floor().clamp(0.0, f64::from(width)) as u32;
    let right = (max[0].floor() + 1.0).clamp(0.0, f64::from(width)) as u32;
    if band_height == 0 || right <= left {
        return None;
    }

    Some(Band {
        x: left,
        y: top,
        width: right - left,
        height: band_height,
    })
}

/// Mean gray level over the band
pub fn mean_intensity(gray: &GrayImage, band: Band) -> Option<f64> {
    let mut sum = 0u64;
    let mut count = 0u64;
    for y in band.y..(band.y + band.height).min(gray.height()) {
        for x in band.x..(band.x + band.width).min(gray.width()) {
            sum += u64::from(gray.get_pixel(x, y)[0]);
            count += 1;
        }
    }
    (count > 0).then(|| sum as f64 / count as f64)
}

/// Bucket a mean intensity: below `steep_below` is steep, below
/// `medium_below` is medium, anything else is shallow
pub fn classify_intensity(intensity: f64, thresholds: &PitchThresholds) -> Pitch {
    if intensity < thresholds.steep_below {
        Pitch::Steep
    } else if intensity < thresholds.medium_below {
        Pitch::Medium
    } else {
        Pitch::Shallow
    }
}

/// Estimate pitch for one detected polygon. With no ground visible below it
/// the section is reported shallow.
pub fn estimate_pitch(polygon: &SimplifiedPolygon, gray: &GrayImage, thresholds: &PitchThresholds) -> Pitch {
    let intensity = shadow_band(polygon, gray.width(), gray.height(), thresholds.band_height)
        .and_then(|band| mean_intensity(gray, band));

    match intensity {
        Some(intensity) => {
            let pitch = classify_intensity(intensity, thresholds);
            debug!(intensity, %pitch, "classified shadow band");
            pitch
        }
        None => {
            debug!("no shadow band below section");
            Pitch::Shallow
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShadowPitchEstimator {
    pub thresholds: PitchThresholds,
}

impl PitchEstimator for ShadowPitchEstimator {
    fn estimate(&self, polygon: &SimplifiedPolygon, gray: &GrayImage) -> Pitch {
        estimate_pitch(polygon, gray, &self.thresholds)
    }
}
