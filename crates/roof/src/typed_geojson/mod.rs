use std::marker::PhantomData;
use serde::{Deserialize, Serialize};
use geojson::{Geometry, JsonObject};
use ts_rs::TS;
use schemars::JsonSchema;

use crate::types::SectionSource;

/// Properties for roof section features
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS, JsonSchema)]
#[ts(export)]
#[schemars(description = "Properties for roof section features")]
pub struct RoofSectionProperties {
    #[schemars(description = "Position of the section in the project, from 0")]
    pub id: u32,
    #[schemars(description = "Display label, e.g. \"Section 1\"")]
    pub section: String,
    #[schemars(description = "Planar area in whole square feet")]
    pub area_sqft: u64,
    #[schemars(description = "Pitch label, e.g. \"4/12\"")]
    pub pitch: String,
    #[schemars(description = "Whether the section was detected or drawn by hand")]
    #[serde(default)]
    pub source: SectionSource,
}

/// Type alias for roof section GeoJSON
pub type RoofGeoJson = TypedFeatureCollection<RoofSectionProperties>;

/// A typed GeoJSON Feature that is generic over its properties.
#[derive(Serialize, Deserialize, Debug)]
pub struct TypedFeature<P> {
    #[serde(flatten)]
    pub feature: geojson::Feature,
    #[serde(skip)]
    _properties: PhantomData<P>,
}

impl<P> TypedFeature<P>
where
    for<'de> P: Serialize + Deserialize<'de>,
{
    /// Creates a new TypedFeature.
    pub fn new(geometry: Option<Geometry>, properties: P) -> Self {
        let feature = geojson::Feature {
            bbox: None,
            geometry,
            id: None,
            properties: serde_json::to_value(properties).ok().and_then(|v| v.as_object().cloned()),
            foreign_members: None,
        };
        Self {
            feature,
            _properties: PhantomData,
        }
    }

    /// Wrap an untyped feature
    pub fn from_feature(feature: geojson::Feature) -> Self {
        Self {
            feature,
            _properties: PhantomData,
        }
    }

    /// Tries to access the typed properties of the feature.
    pub fn properties(&self) -> Option<P> {
        self.feature.properties.as_ref().and_then(|p| {
            serde_json::from_value(serde_json::Value::Object(p.clone())).ok()
        })
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TypedFeatureCollection<P> {
    pub bbox: Option<Vec<f64>>,
    pub features: Vec<TypedFeature<P>>,
    pub foreign_members: Option<JsonObject>,
}

impl<P> TypedFeatureCollection<P> {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[TypedFeature<P>] {
        &self.features
    }
}

impl RoofGeoJson {
    /// Sections carrying the given pitch label
    pub fn features_with_pitch(&self, pitch: &str) -> Vec<&TypedFeature<RoofSectionProperties>> {
        self.features
            .iter()
            .filter(|feature| {
                feature.properties()
                    .map(|props| props.pitch == pitch)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Project address from foreign members
    pub fn address(&self) -> Option<&str> {
        self.foreign_members.as_ref()?
            .get("address")?
            .as_str()
    }

    /// Total area from foreign members
    pub fn total_area_sqft(&self) -> Option<u64> {
        self.foreign_members.as_ref()?
            .get("total_area_sqft")?
            .as_u64()
    }
}
