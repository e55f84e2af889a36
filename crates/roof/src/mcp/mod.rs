use crate::{
    manager::{CommandOutput, RoofCommand, RoofSession},
    measurement,
    types::{GeoBoundingBox, LatLng},
};
use rmcp::{
    handler::server::tool::IntoCallToolResult, model::{CallToolResult, Content, ServerCapabilities, ServerInfo}, schemars, tool, Error as McpError, ServerHandler
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

/// Request for loading a map capture from disk
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadImageRequest {
    #[schemars(description = "Path to the image file")]
    pub path: String,
}

/// Request for loading a map capture from base64 data
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadImageBase64Request {
    #[schemars(description = "Base64 PNG or JPEG, optionally as a data URL")]
    pub data: String,
}

/// Geographic extent of the loaded capture
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetBoundsRequest {
    #[schemars(description = "North-east corner latitude", range(min = -90.0, max = 90.0))]
    pub ne_lat: f64,
    #[schemars(description = "North-east corner longitude", range(min = -180.0, max = 180.0))]
    pub ne_lng: f64,
    #[schemars(description = "South-west corner latitude", range(min = -90.0, max = 90.0))]
    pub sw_lat: f64,
    #[schemars(description = "South-west corner longitude", range(min = -180.0, max = 180.0))]
    pub sw_lng: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, schemars::JsonSchema)]
pub struct PointParam {
    pub lat: f64,
    pub lng: f64,
}

impl From<PointParam> for LatLng {
    fn from(point: PointParam) -> Self {
        LatLng::new(point.lat, point.lng)
    }
}

/// Request for measuring an arbitrary polygon
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MeasureRequest {
    #[schemars(description = "Polygon vertices in order; the ring is closed implicitly")]
    pub points: Vec<PointParam>,
}

/// Request for naming the project
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetAddressRequest {
    #[schemars(description = "Street address the sections belong to")]
    pub address: String,
}

/// Request for relabelling one section's pitch
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetPitchRequest {
    #[schemars(description = "Section position, from 0")]
    pub index: usize,
    #[schemars(description = "Pitch label, e.g. \"8/12\"")]
    pub label: String,
}

/// Response describing the session after a tool call
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub output: Option<CommandOutput>,
    pub geojson: serde_json::Value,
    pub error: Option<String>,
}

impl IntoCallToolResult for SessionResponse {
    fn into_call_tool_result(self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&self).unwrap_or_else(|_| format!("{:?}", self)),
        )]))
    }
}

impl SessionResponse {
    fn error(message: String) -> Self {
        Self {
            output: None,
            geojson: serde_json::Value::Null,
            error: Some(message),
        }
    }
}

/// MCP Server for roof detection and measurement
#[derive(Clone)]
pub struct RoofMcpServer {
    session: Arc<RwLock<RoofSession>>,
}

impl RoofMcpServer {
    pub fn new() -> Self {
        Self { session: Arc::new(RwLock::new(RoofSession::new())) }
    }

    fn session(&self) -> RwLockWriteGuard<'_, RoofSession> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn run(&self, command: RoofCommand) -> SessionResponse {
        let mut session = self.session();
        match session.execute(command) {
            Ok(output) => SessionResponse {
                output: Some(output),
                geojson: serde_json::to_value(session.project().to_geojson())
                    .unwrap_or(serde_json::Value::Null),
                error: None,
            },
            Err(e) => SessionResponse::error(e.to_string()),
        }
    }
}

impl Default for RoofMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool(tool_box)]
impl RoofMcpServer {
    #[tool(description = "Load a map capture image from file path")]
    fn load_image(&self, #[tool(aggr)] LoadImageRequest { path }: LoadImageRequest) -> String {
        match self.session().load_image(&path) {
            Ok(()) => format!("Image loaded successfully from {}", path),
            Err(e) => format!("Failed to load image from {}: {}", path, e),
        }
    }

    #[tool(description = "Load a map capture image from base64 data")]
    fn load_image_base64(&self, #[tool(aggr)] LoadImageBase64Request { data }: LoadImageBase64Request) -> String {
        match self.session().load_image_base64(&data) {
            Ok(()) => "Image loaded successfully".to_string(),
            Err(e) => format!("Failed to load image: {}", e),
        }
    }

    #[tool(description = "Set the geographic bounding box of the loaded capture")]
    fn set_bounds(&self, #[tool(aggr)] request: SetBoundsRequest) -> String {
        let bounds = GeoBoundingBox::new(
            LatLng::new(request.ne_lat, request.ne_lng),
            LatLng::new(request.sw_lat, request.sw_lng),
        );
        match self.session().set_bounds(bounds) {
            Ok(()) => "Bounds set".to_string(),
            Err(e) => format!("Rejected bounds: {}", e),
        }
    }

    #[tool(description = "Detect roof sections in the loaded capture, replacing existing sections")]
    fn detect_roofs(&self) -> SessionResponse {
        self.run(RoofCommand::Detect)
    }

    #[tool(description = "Measure a polygon's area in square feet")]
    fn measure_polygon(&self, #[tool(aggr)] MeasureRequest { points }: MeasureRequest) -> String {
        let ring: Vec<LatLng> = points.into_iter().map(LatLng::from).collect();
        serde_json::json!({ "area_sqft": measurement::measure(&ring) }).to_string()
    }

    #[tool(description = "Add a vertex to the hand-drawn section in progress")]
    fn add_point(&self, #[tool(aggr)] PointParam { lat, lng }: PointParam) -> SessionResponse {
        self.run(RoofCommand::AddPoint { lat, lng })
    }

    #[tool(description = "Finish the hand-drawn section (needs at least 3 points)")]
    fn finish_section(&self) -> SessionResponse {
        self.run(RoofCommand::FinishSection)
    }

    #[tool(description = "Set the project address; required before building a report")]
    fn set_address(&self, #[tool(aggr)] SetAddressRequest { address }: SetAddressRequest) -> SessionResponse {
        self.run(RoofCommand::SetAddress { address })
    }

    #[tool(description = "Override the pitch label of a section")]
    fn set_pitch(&self, #[tool(aggr)] SetPitchRequest { index, label }: SetPitchRequest) -> SessionResponse {
        self.run(RoofCommand::SetPitch { index, label })
    }

    #[tool(description = "Remove all sections and the drawing in progress")]
    fn clear(&self) -> SessionResponse {
        self.run(RoofCommand::Clear)
    }

    #[tool(description = "Get the project report with per-section and total areas (needs an address)")]
    fn project_report(&self) -> String {
        match self.session().export_report() {
            Ok(report) => serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("Failed to serialize report: {}", e)),
            Err(e) => format!("Cannot build report: {}", e),
        }
    }

    #[tool(description = "Get the JSON schema for RoofCommand")]
    fn get_command_schema(&self) -> String {
        let schema = RoofCommand::schema();
        serde_json::to_string_pretty(&schema)
            .unwrap_or_else(|e| format!("Failed to serialize schema: {}", e))
    }
}

#[tool(tool_box)]
impl ServerHandler for RoofMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Roof Measurement Server - detect roof sections in calibrated map captures, draw sections by hand, and report areas and pitches.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
