use roof::{DetectionConfig, LatLng};

use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoofCliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// File formats understood for detection configs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RoofCliError> {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(RoofCliError::UnsupportedFileFormat),
        }
    }
}

/// Load a DetectionConfig from TOML string
pub fn config_from_toml(content: &str) -> Result<DetectionConfig, RoofCliError> {
    Ok(toml::from_str(content)?)
}

/// Load a DetectionConfig from JSON string
pub fn config_from_json(content: &str) -> Result<DetectionConfig, RoofCliError> {
    Ok(serde_json::from_str(content)?)
}

/// Auto-detect file format and load configuration
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DetectionConfig, RoofCliError> {
    let format = ConfigFormat::from_path(&path)?;
    let content = fs::read_to_string(path)?;
    match format {
        ConfigFormat::Toml => config_from_toml(&content),
        ConfigFormat::Json => config_from_json(&content),
    }
}

/// Serialize a DetectionConfig in the given format
pub fn config_to_string(config: &DetectionConfig, format: ConfigFormat) -> Result<String, RoofCliError> {
    Ok(match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
    })
}

/// Save configuration, choosing the format from the extension
pub fn save_config<P: AsRef<Path>>(config: &DetectionConfig, path: P) -> Result<(), RoofCliError> {
    let content = config_to_string(config, ConfigFormat::from_path(&path)?)?;
    fs::write(path, content)?;
    Ok(())
}

/// Parse a polygon given as `[{"lat": .., "lng": ..}, ...]`
pub fn polygon_from_json(content: &str) -> Result<Vec<LatLng>, RoofCliError> {
    Ok(serde_json::from_str(content)?)
}

pub fn load_polygon<P: AsRef<Path>>(path: P) -> Result<Vec<LatLng>, RoofCliError> {
    let content = fs::read_to_string(path)?;
    polygon_from_json(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ConfigFormat::from_path("a/b.toml").unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path("b.json").unwrap(), ConfigFormat::Json);
        assert!(matches!(ConfigFormat::from_path("b.yaml"), Err(RoofCliError::UnsupportedFileFormat)));
        assert!(ConfigFormat::from_path("noext").is_err());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = config_from_toml(
            r#"
            min_contour_area = 250.0

            [pitch]
            steep_below = 40.0
            "#,
        )
        .unwrap();

        assert_eq!(config.min_contour_area, 250.0);
        assert_eq!(config.pitch.steep_below, 40.0);
        assert_eq!(config.pitch.medium_below, 100.0);
        assert_eq!(config.color, DetectionConfig::default().color);
    }

    #[test]
    fn default_config_survives_both_formats() {
        let config = DetectionConfig::default();
        let toml = config_to_string(&config, ConfigFormat::Toml).unwrap();
        assert_eq!(config_from_toml(&toml).unwrap(), config);
        let json = config_to_string(&config, ConfigFormat::Json).unwrap();
        assert_eq!(config_from_json(&json).unwrap(), config);
    }

    #[test]
    fn polygon_json_parses_points() {
        let points = polygon_from_json(
            r#"[{"lat": 52.133, "lng": -106.67}, {"lat": 52.133, "lng": -106.6697}, {"lat": 52.1332, "lng": -106.6697}]"#,
        )
        .unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[2], LatLng::new(52.1332, -106.6697));
        assert!(polygon_from_json("[1, 2]").is_err());
    }
}
