//! Tunable thresholds for the detection pipeline.
//!
//! Every field has a default matching the reference heuristic; a config file
//! only needs to name the knobs it changes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoofError};

/// Color cue band on the 8-bit HSV scale (hue 0-180, saturation and value 0-255)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ColorBand {
    pub hue_min: u8,
    pub hue_max: u8,
    pub saturation_min: u8,
    pub saturation_max: u8,
    pub value_min: u8,
    pub value_max: u8,
}

impl Default for ColorBand {
    fn default() -> Self {
        Self {
            hue_min: 0,
            hue_max: 180,
            saturation_min: 0,
            saturation_max: 50,
            value_min: 50,
            value_max: 150,
        }
    }
}

impl ColorBand {
    /// Inclusive on every bound
    pub fn contains(&self, [h, s, v]: [u8; 3]) -> bool {
        (self.hue_min..=self.hue_max).contains(&h)
            && (self.saturation_min..=self.saturation_max).contains(&s)
            && (self.value_min..=self.value_max).contains(&v)
    }
}

/// Edge cue: smoothing, gradient thresholds and gap bridging.
///
/// `edges::canny` smooths again internally (sigma 1.4) before taking
/// gradients, so `canny_low` and `canny_high` apply to a doubly smoothed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EdgeCue {
    /// Nominal smoothing kernel size; sets the sigma when `blur_sigma` is absent
    pub blur_kernel: u32,
    /// Explicit smoothing sigma, overriding the one derived from `blur_kernel`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_sigma: Option<f32>,
    pub canny_low: f32,
    pub canny_high: f32,
    /// Chessboard radius of the dilation applied to the edge map
    pub dilate_radius: u8,
}

impl EdgeCue {
    /// Sigma derived from a kernel size the way OpenCV does when none is given
    pub fn sigma_for_kernel(kernel: u32) -> f32 {
        0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8
    }

    /// Smoothing sigma actually applied before edge detection
    pub fn sigma(&self) -> f32 {
        self.blur_sigma
            .unwrap_or_else(|| Self::sigma_for_kernel(self.blur_kernel))
    }
}

impl Default for EdgeCue {
    fn default() -> Self {
        Self {
            blur_kernel: 5,
            blur_sigma: None,
            canny_low: 20.0,
            canny_high: 80.0,
            dilate_radius: 1,
        }
    }
}

/// Shadow band geometry and intensity buckets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PitchThresholds {
    /// Maximum height of the sampled band below a section, in pixels
    pub band_height: u32,
    /// Mean intensity below this is steep
    pub steep_below: f64,
    /// Mean intensity below this (and not steep) is medium
    pub medium_below: f64,
}

impl Default for PitchThresholds {
    fn default() -> Self {
        Self {
            band_height: 30,
            steep_below: 50.0,
            medium_below: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DetectionConfig {
    pub color: ColorBand,
    pub edge: EdgeCue,
    /// Chessboard radius of the opening that cleans the combined mask
    pub open_radius: u8,
    /// Contours enclosing fewer square pixels are noise
    pub min_contour_area: f64,
    /// Simplification tolerance as a fraction of contour perimeter
    pub simplify_ratio: f64,
    pub pitch: PitchThresholds,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            color: ColorBand::default(),
            edge: EdgeCue::default(),
            open_radius: 1,
            min_contour_area: 100.0,
            simplify_ratio: 0.01,
            pitch: PitchThresholds::default(),
        }
    }
}

impl DetectionConfig {
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DetectionConfig)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.edge.sigma() > 0.0) {
            return Err(RoofError::InvalidConfig("blur sigma must be positive".to_string()));
        }
        if self.edge.blur_sigma.is_none() && self.edge.blur_kernel % 2 == 0 {
            return Err(RoofError::InvalidConfig("blur_kernel must be odd".to_string()));
        }
        if self.edge.canny_low > self.edge.canny_high {
            return Err(RoofError::InvalidConfig("canny_low exceeds canny_high".to_string()));
        }
        if self.color.hue_min > self.color.hue_max
            || self.color.saturation_min > self.color.saturation_max
            || self.color.value_min > self.color.value_max
        {
            return Err(RoofError::InvalidConfig("color band minimum exceeds maximum".to_string()));
        }
        if !(self.simplify_ratio >= 0.0) || self.min_contour_area < 0.0 {
            return Err(RoofError::InvalidConfig(
                "simplify_ratio and min_contour_area must be non-negative".to_string(),
            ));
        }
        if self.pitch.steep_below > self.pitch.medium_below {
            return Err(RoofError::InvalidConfig("steep_below exceeds medium_below".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sigma_matches_five_by_five_kernel() {
        assert!((EdgeCue::default().sigma() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn kernel_size_drives_sigma_unless_overridden() {
        let config: DetectionConfig =
            serde_json::from_str(r#"{ "edge": { "blur_kernel": 7 } }"#).unwrap();
        assert!((config.edge.sigma() - 1.4).abs() < 1e-6);

        let config: DetectionConfig =
            serde_json::from_str(r#"{ "edge": { "blur_kernel": 7, "blur_sigma": 2.5 } }"#).unwrap();
        assert_eq!(config.edge.sigma(), 2.5);

        let mut config = DetectionConfig::default();
        config.edge.blur_kernel = 4;
        assert!(matches!(config.validate(), Err(RoofError::InvalidConfig(_))));
        config.edge.blur_sigma = Some(1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_validate() {
        DetectionConfig::default().validate().expect("defaults are valid");
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: DetectionConfig =
            serde_json::from_str(r#"{ "min_contour_area": 250.0, "edge": { "canny_high": 90.0 } }"#).unwrap();
        assert_eq!(config.min_contour_area, 250.0);
        assert_eq!(config.edge.canny_high, 90.0);
        assert_eq!(config.edge.canny_low, 20.0);
        assert_eq!(config.color, ColorBand::default());
    }

    #[test]
    fn inverted_canny_thresholds_rejected() {
        let mut config = DetectionConfig::default();
        config.edge.canny_low = 100.0;
        assert!(matches!(config.validate(), Err(RoofError::InvalidConfig(_))));
    }

    #[test]
    fn color_band_is_inclusive() {
        let band = ColorBand::default();
        assert!(band.contains([0, 50, 50]));
        assert!(band.contains([180, 0, 150]));
        assert!(!band.contains([90, 51, 100]));
        assert!(!band.contains([90, 0, 151]));
    }
}
