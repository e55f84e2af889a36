pub mod builder;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::{
    algorithms::extract_polygons,
    calibration::{Calibration, Projection},
    error::Result,
    measurement,
    projector::project_polygon,
    traits::{ContourExtractor, ContourScorer, ContourSimplifier, MaskSegmenter, PitchEstimator},
    types::{GeoBoundingBox, RoofSection, SectionSource, SimplifiedPolygon},
};

/// Whether a completed run found anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionOutcome {
    Found,
    NoRegionsDetected,
}

/// A detected section with the pixel outline it was projected from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSection {
    pub section: RoofSection,
    pub outline: SimplifiedPolygon,
    /// Scorer confidence, when a scorer is installed
    pub confidence: Option<f32>,
}

/// Result of one detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub sections: Vec<DetectedSection>,
    pub image_width: u32,
    pub image_height: u32,
}

impl Detection {
    pub fn outcome(&self) -> DetectionOutcome {
        if self.sections.is_empty() {
            DetectionOutcome::NoRegionsDetected
        } else {
            DetectionOutcome::Found
        }
    }

    /// Human-readable reason for an empty result
    pub fn diagnostic(&self) -> Option<&'static str> {
        match self.outcome() {
            DetectionOutcome::Found => None,
            DetectionOutcome::NoRegionsDetected => Some("no sections found"),
        }
    }

    pub fn total_area_sqft(&self) -> u64 {
        measurement::total_area_sqft(self.sections.iter().map(|detected| &detected.section))
    }

    pub fn into_sections(self) -> Vec<RoofSection> {
        self.sections.into_iter().map(|detected| detected.section).collect()
    }
}

/// Image-to-geometry pipeline: segment, trace, simplify, project, measure, estimate pitch
pub struct Detector {
    segmenter: Box<dyn MaskSegmenter>,
    contour_extractor: Box<dyn ContourExtractor>,
    simplifier: Box<dyn ContourSimplifier>,
    scorer: Option<(Box<dyn ContourScorer>, f32)>,
    pitch_estimator: Box<dyn PitchEstimator>,
    projection: Box<dyn Projection>,
    min_contour_area: f64,
}

impl Detector {
    /// Create a new detector builder
    pub fn builder() -> builder::DetectorBuilder {
        builder::DetectorBuilder::new()
    }

    pub fn new(
        segmenter: Box<dyn MaskSegmenter>,
        contour_extractor: Box<dyn ContourExtractor>,
        simplifier: Box<dyn ContourSimplifier>,
        scorer: Option<(Box<dyn ContourScorer>, f32)>,
        pitch_estimator: Box<dyn PitchEstimator>,
        projection: Box<dyn Projection>,
        min_contour_area: f64,
    ) -> Self {
        Self {
            segmenter,
            contour_extractor,
            simplifier,
            scorer,
            pitch_estimator,
            projection,
            min_contour_area,
        }
    }

    /// Run the pipeline over one captured viewport
    pub fn detect(&self, image: &DynamicImage, bounds: GeoBoundingBox) -> Result<Detection> {
        // Step 1: Calibrate against the capture
        let calibration = Calibration::with_projection(image.width(), image.height(), bounds, &*self.projection)?;

        // Step 2: Segment candidate roof pixels
        let rgb = image.to_rgb8();
        let mask = self.segmenter.segment(&rgb)?;

        // Step 3: Trace, filter and simplify outer boundaries
        let polygons = extract_polygons(
            &mask,
            self.contour_extractor.as_ref(),
            self.simplifier.as_ref(),
            self.min_contour_area,
        )?;
        drop(mask);

        // Step 4: Project, measure and estimate pitch per polygon
        let gray = image.to_luma8();
        let mut sections = Vec::with_capacity(polygons.len());
        for outline in polygons {
            let confidence = match &self.scorer {
                Some((scorer, min_confidence)) => {
                    let confidence = scorer.score(&outline);
                    if confidence < *min_confidence {
                        debug!(confidence, "dropping low-confidence candidate");
                        continue;
                    }
                    Some(confidence)
                }
                None => None,
            };

            let vertices = project_polygon(&calibration, &outline)?;
            let pitch = self.pitch_estimator.estimate(&outline, &gray);
            let section = RoofSection::new(vertices, pitch, SectionSource::Detected);
            debug!(
                vertices = section.vertices.len(),
                area_sqft = section.area_sqft,
                pitch = %section.pitch,
                "detected section"
            );

            sections.push(DetectedSection {
                section,
                outline,
                confidence,
            });
        }

        let detection = Detection {
            sections,
            image_width: calibration.width(),
            image_height: calibration.height(),
        };
        info!(
            sections = detection.sections.len(),
            total_area_sqft = detection.total_area_sqft(),
            "detection complete"
        );

        Ok(detection)
    }

    /// Get information about the detector configuration
    pub fn info(&self) -> String {
        format!(
            "Detector: {} projection, min contour area {} px², scorer {}",
            self.projection.name(),
            self.min_contour_area,
            if self.scorer.is_some() { "enabled" } else { "disabled" }
        )
    }
}
