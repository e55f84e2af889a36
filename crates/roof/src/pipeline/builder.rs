use crate::{
    algorithms::{CueSegmenter, DouglasPeuckerSimplifier, ImageprocContourExtractor},
    calibration::{Projection, ProjectionKind},
    config::DetectionConfig,
    error::Result,
    pipeline::Detector,
    pitch::ShadowPitchEstimator,
    traits::{ContourExtractor, ContourScorer, ContourSimplifier, MaskSegmenter, PitchEstimator},
};

/// Builder for creating detectors with a fluent API
pub struct DetectorBuilder {
    config: DetectionConfig,
    segmenter: Option<Box<dyn MaskSegmenter>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    simplifier: Option<Box<dyn ContourSimplifier>>,
    scorer: Option<(Box<dyn ContourScorer>, f32)>,
    pitch_estimator: Option<Box<dyn PitchEstimator>>,
    projection: Box<dyn Projection>,
}

impl DetectorBuilder {
    /// Create a new detector builder with default thresholds
    pub fn new() -> Self {
        Self {
            config: DetectionConfig::default(),
            segmenter: None,
            contour_extractor: None,
            simplifier: None,
            scorer: None,
            pitch_estimator: None,
            projection: Box::new(ProjectionKind::default()),
        }
    }

    /// Use the given thresholds for every default component
    pub fn with_config(mut self, config: DetectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the mask segmenter (replaces the cue-based default)
    pub fn set_segmenter<S>(mut self, segmenter: S) -> Self
    where
        S: MaskSegmenter + 'static,
    {
        self.segmenter = Some(Box::new(segmenter));
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    /// Set the contour simplifier (replaces any existing one)
    pub fn set_simplifier<S>(mut self, simplifier: S) -> Self
    where
        S: ContourSimplifier + 'static,
    {
        self.simplifier = Some(Box::new(simplifier));
        self
    }

    /// Drop candidates the scorer rates below `min_confidence`
    pub fn with_scorer<S>(mut self, scorer: S, min_confidence: f32) -> Self
    where
        S: ContourScorer + 'static,
    {
        self.scorer = Some((Box::new(scorer), min_confidence));
        self
    }

    /// Set the pitch estimator (replaces the shadow-band default)
    pub fn set_pitch_estimator<P>(mut self, estimator: P) -> Self
    where
        P: PitchEstimator + 'static,
    {
        self.pitch_estimator = Some(Box::new(estimator));
        self
    }

    /// Set the pixel-to-geo mapping (replaces the equirectangular default)
    pub fn with_projection<P>(mut self, projection: P) -> Self
    where
        P: Projection + 'static,
    {
        self.projection = Box::new(projection);
        self
    }

    /// Build the detector with default components where none were given
    pub fn build(self) -> Result<Detector> {
        self.config.validate()?;
        let config = self.config;

        let segmenter = self.segmenter
            .unwrap_or_else(|| Box::new(CueSegmenter::from_config(&config)));

        let contour_extractor = self.contour_extractor
            .unwrap_or_else(|| Box::new(ImageprocContourExtractor));

        let simplifier = self.simplifier.unwrap_or_else(|| {
            Box::new(DouglasPeuckerSimplifier {
                perimeter_ratio: config.simplify_ratio,
            })
        });

        let pitch_estimator = self.pitch_estimator.unwrap_or_else(|| {
            Box::new(ShadowPitchEstimator {
                thresholds: config.pitch.clone(),
            })
        });

        Ok(Detector::new(
            segmenter,
            contour_extractor,
            simplifier,
            self.scorer,
            pitch_estimator,
            self.projection,
            config.min_contour_area,
        ))
    }

    /// Build a detector with every default
    pub fn build_default() -> Result<Detector> {
        Self::new().build()
    }
}

impl Default for DetectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Detector {
    /// Default components and thresholds; these always validate
    fn default() -> Self {
        let config = DetectionConfig::default();
        Detector::new(
            Box::new(CueSegmenter::from_config(&config)),
            Box::new(ImageprocContourExtractor),
            Box::new(DouglasPeuckerSimplifier {
                perimeter_ratio: config.simplify_ratio,
            }),
            None,
            Box::new(ShadowPitchEstimator {
                thresholds: config.pitch,
            }),
            Box::new(ProjectionKind::default()),
            config.min_contour_area,
        )
    }
}
