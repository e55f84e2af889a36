use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use tracing::debug;

use crate::{
    config::{ColorBand, DetectionConfig, EdgeCue},
    error::Result,
    traits::MaskSegmenter,
};

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// Convert an RGB pixel to HSV on the 8-bit scale: hue 0-180, saturation and value 0-255
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = f32::from(max - min);

    let saturation = if max == 0 {
        0.0
    } else {
        255.0 * delta / f32::from(max)
    };

    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
    let mut hue = if delta == 0.0 {
        0.0
    } else if max as f32 == r {
        60.0 * (g - b) / delta
    } else if max as f32 == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    [(hue / 2.0).round() as u8, saturation.round() as u8, max]
}

/// Flag pixels whose HSV value falls inside the band
pub fn color_mask(image: &RgbImage, band: &ColorBand) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let hsv = rgb_to_hsv(image.get_pixel(x, y).0);
        Luma([if band.contains(hsv) { FOREGROUND } else { BACKGROUND }])
    })
}

/// Smooth, detect edges with hysteresis thresholds, then bridge small gaps
pub fn edge_mask(image: &RgbImage, cue: &EdgeCue) -> GrayImage {
    let gray = image::imageops::grayscale(image);
    let blurred = imageproc::filter::gaussian_blur_f32(&gray, cue.sigma());
    // canny blurs once more (sigma 1.4) before computing gradients
    let edges = imageproc::edges::canny(&blurred, cue.canny_low, cue.canny_high);

    if cue.dilate_radius == 0 {
        edges
    } else {
        imageproc::morphology::dilate(&edges, Norm::LInf, cue.dilate_radius)
    }
}

/// Pixel-wise OR of two masks of equal size
pub fn union(a: &GrayImage, b: &GrayImage) -> GrayImage {
    let mut combined = a.clone();
    for (out, other) in combined.iter_mut().zip(b.iter()) {
        *out = (*out).max(*other);
    }
    combined
}

/// Color and edge cues combined, then cleaned with a morphological opening
#[derive(Debug, Clone, Default)]
pub struct CueSegmenter {
    pub color: ColorBand,
    pub edge: EdgeCue,
    pub open_radius: u8,
}

impl CueSegmenter {
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            color: config.color.clone(),
            edge: config.edge.clone(),
            open_radius: config.open_radius,
        }
    }
}

impl MaskSegmenter for CueSegmenter {
    fn segment(&self, image: &RgbImage) -> Result<GrayImage> {
        let color = color_mask(image, &self.color);
        let edges = edge_mask(image, &self.edge);
        let combined = union(&color, &edges);

        let mask = if self.open_radius == 0 {
            combined
        } else {
            imageproc::morphology::open(&combined, Norm::LInf, self.open_radius)
        };

        let foreground = mask.iter().filter(|&&p| p == FOREGROUND).count();
        debug!(
            foreground,
            total = mask.len(),
            "segmented {}x{} image",
            mask.width(),
            mask.height()
        );

        Ok(mask)
    }
}
