use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoofError {
    #[error("Invalid bounding box: north-east must lie north of south-west and both spans must be non-zero")]
    InvalidBounds,

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Malformed polygon: {vertices} vertices, at least 3 required")]
    MalformedPolygon { vertices: usize },

    #[error("Section index {index} out of range ({len} sections)")]
    SectionIndex { index: usize, len: usize },

    #[error("Project address is required")]
    MissingAddress,

    #[error("Invalid detection config: {0}")]
    InvalidConfig(String),

    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("No bounding box set")]
    NoBoundsSet,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, RoofError>;
