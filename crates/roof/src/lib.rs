//! # Roof Footprint Extraction Library
//!
//! Turns a captured satellite viewport with known geographic bounds into
//! measured roof sections. Each section carries its outline in latitude and
//! longitude, an area in square feet and a coarse pitch label.
//!
//! ## Core Features
//!
//! - **Trait-based Pipeline**: Segmenter, contour extractor, simplifier, scorer
//!   and pitch estimator are swappable components behind a [`Detector`]
//! - **Geodesic Measurement**: Spherical polygon areas matching the mapping
//!   client's own area computation
//! - **Manual Sections**: A point-by-point editor for sections the detector misses
//! - **GeoJSON Support**: Export/import of whole projects as standard GeoJSON
//! - **MCP Server**: The same session operations exposed as tools
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roof::{Detector, GeoBoundingBox, LatLng};
//!
//! let image = image::open("capture.png")?;
//! let bounds = GeoBoundingBox::new(
//!     LatLng::new(52.14, -106.66),
//!     LatLng::new(52.13, -106.68),
//! );
//!
//! let detection = Detector::default().detect(&image, bounds)?;
//! for detected in &detection.sections {
//!     println!("{} sqft at {}", detected.section.area_sqft, detected.section.pitch);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use roof::{Detector, DetectionConfig, ProjectionKind, algorithms::*};
//!
//! let mut config = DetectionConfig::default();
//! config.min_contour_area = 250.0;
//!
//! let detector = Detector::builder()
//!     .with_config(config)
//!     .with_scorer(AreaScorer { reference_area: 900.0 }, 0.5)
//!     .with_projection(ProjectionKind::WebMercator)
//!     .build()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod config;
pub mod calibration;
pub mod traits;
pub mod algorithms;
pub mod projector;
pub mod measurement;
pub mod pitch;
pub mod pipeline;

// Editing and persistence
pub mod editor;
pub mod project;
pub mod io;
pub mod typed_geojson;
pub mod manager;
pub mod mcp;

// Re-exports for convenience
pub use error::{Result, RoofError};
pub use types::{GeoBoundingBox, LatLng, Pitch, RawContour, RoofSection, SectionSource, SimplifiedPolygon};
pub use config::{ColorBand, DetectionConfig, EdgeCue, PitchThresholds};
pub use calibration::{Calibration, Projection, ProjectionKind};
pub use traits::*;
pub use pipeline::{Detection, DetectionOutcome, DetectedSection, Detector, builder::DetectorBuilder};
pub use measurement::{measure, total_area_sqft};
pub use pitch::{estimate_pitch, ShadowPitchEstimator};
pub use editor::{EditorState, ManualEditor};
pub use project::{ProjectReport, RoofProject, SectionArea};
pub use manager::{CommandOutput, RoofCommand, RoofSession};

/// Run detection with the default pipeline
pub fn detect(image: &image::DynamicImage, bounds: GeoBoundingBox) -> Result<Detection> {
    Detector::default().detect(image, bounds)
}
