use std::sync::Arc;

use base64::Engine;
use image::DynamicImage;
use crate::{
    editor::{EditorState, ManualEditor},
    error::{Result, RoofError},
    pipeline::{Detection, Detector},
    project::{ProjectReport, RoofProject, section_label},
    types::{GeoBoundingBox, LatLng},
};
use serde::{Serialize, Deserialize};
use schemars::JsonSchema;
use strum::{Display, EnumString, EnumIter, IntoStaticStr, VariantNames};
use tracing::{info, warn};

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoofCommand {
    /// Run automatic detection over the loaded image and bounds
    Detect,

    /// Append a vertex to the hand-drawn section in progress
    AddPoint {
        #[schemars(range(min = -90.0, max = 90.0))]
        lat: f64,
        #[schemars(range(min = -180.0, max = 180.0))]
        lng: f64,
    },

    /// Close the hand-drawn section in progress
    FinishSection,

    /// Override the pitch label of one section
    SetPitch {
        index: usize,
        #[schemars(length(min = 1, max = 16))]
        label: String,
    },

    /// Remove every section and any drawing in progress
    Clear,

    /// Set the project address
    SetAddress {
        #[schemars(length(max = 200))]
        address: String,
    },
}

impl RoofCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RoofCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    /// Get a description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Self::Detect => "Detect roof sections in the loaded map capture, replacing existing sections",
            Self::AddPoint { .. } => "Add a vertex to the section being drawn by hand",
            Self::FinishSection => "Finish the hand-drawn section (needs at least 3 points)",
            Self::SetPitch { .. } => "Override the pitch label of a section",
            Self::Clear => "Remove all sections and the drawing in progress",
            Self::SetAddress { .. } => "Set the project address used for saving and reports",
        }
    }
}

/// State after a command has run
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CommandOutput {
    pub report: ProjectReport,
    pub editor_state: EditorState,
    pub pending_points: usize,
    /// Diagnostic for outcomes that produced nothing, e.g. "no sections found"
    pub message: Option<String>,
}

/// One user's working state: capture, drawing in progress and project
#[derive(Clone)]
pub struct RoofSession {
    image: Option<DynamicImage>,
    bounds: Option<GeoBoundingBox>,
    detector: Arc<Detector>,
    editor: ManualEditor,
    project: RoofProject,
}

impl RoofSession {
    pub fn new() -> Self {
        Self::with_detector(Detector::default())
    }

    /// Create a session with a custom detector
    pub fn with_detector(detector: Detector) -> Self {
        Self {
            image: None,
            bounds: None,
            detector: Arc::new(detector),
            editor: ManualEditor::new(),
            project: RoofProject::default(),
        }
    }

    /// Load a map capture from file
    pub fn load_image(&mut self, path: &str) -> Result<()> {
        self.image = Some(image::open(path)?);
        Ok(())
    }

    /// Load a map capture from encoded bytes
    pub fn load_image_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.image = Some(image::load_from_memory(bytes)?);
        Ok(())
    }

    /// Load a map capture from base64, with or without a data-URL prefix
    pub fn load_image_base64(&mut self, data: &str) -> Result<()> {
        let payload = match data.split_once(";base64,") {
            Some((_, payload)) => payload,
            None => data,
        };
        let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
        self.load_image_from_bytes(&bytes)
    }

    pub fn set_image(&mut self, image: DynamicImage) {
        self.image = Some(image);
    }

    pub fn set_bounds(&mut self, bounds: GeoBoundingBox) -> Result<()> {
        if !bounds.is_valid() {
            return Err(RoofError::InvalidBounds);
        }
        self.bounds = Some(bounds);
        Ok(())
    }

    pub fn project(&self) -> &RoofProject {
        &self.project
    }

    pub fn editor(&self) -> &ManualEditor {
        &self.editor
    }

    /// Run detection without touching the project
    pub fn detect(&self) -> Result<Detection> {
        let image = self.image.as_ref().ok_or(RoofError::NoImageLoaded)?;
        let bounds = self.bounds.ok_or(RoofError::NoBoundsSet)?;
        self.detector.detect(image, bounds)
    }

    /// Report for persistence or PDF export; needs an address
    pub fn export_report(&self) -> Result<ProjectReport> {
        self.project.validate_for_export()?;
        Ok(self.project.report())
    }

    pub fn execute(&mut self, command: RoofCommand) -> Result<CommandOutput> {
        let message = match command {
            RoofCommand::Detect => match self.detect() {
                Ok(detection) => match detection.diagnostic() {
                    Some(reason) => {
                        info!("{}", reason);
                        Some(reason.to_string())
                    }
                    None => {
                        let count = detection.sections.len();
                        self.project.replace_with(detection);
                        Some(format!("detected {count} sections"))
                    }
                },
                Err(e) => {
                    warn!("detection failed: {}", e);
                    Some(format!("detection failed: {e}"))
                }
            },
            RoofCommand::AddPoint { lat, lng } => {
                self.editor.add_point(LatLng::new(lat, lng));
                None
            }
            RoofCommand::FinishSection => match self.editor.finalize() {
                Some(section) => {
                    self.project.add_section(section);
                    Some(format!("{} added", section_label(self.project.sections().len() - 1)))
                }
                None => Some("at least 3 points are required to finish a section".to_string()),
            },
            RoofCommand::SetPitch { index, label } => {
                self.project.set_pitch(index, label.into())?;
                None
            }
            RoofCommand::Clear => {
                self.project.clear();
                self.editor.clear();
                None
            }
            RoofCommand::SetAddress { address } => {
                self.project.address = address;
                None
            }
        };

        Ok(CommandOutput {
            report: self.project.report(),
            editor_state: self.editor.state(),
            pending_points: self.editor.points().len(),
            message,
        })
    }
}

impl Default for RoofSession {
    fn default() -> Self {
        Self::new()
    }
}
