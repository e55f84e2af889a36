use geojson::{FeatureCollection, Geometry, Value};
use crate::{
    error::Result,
    error::RoofError,
    project::{RoofProject, section_label},
    typed_geojson::{RoofGeoJson, RoofSectionProperties, TypedFeature, TypedFeatureCollection},
    types::{LatLng, Pitch, RoofSection, SectionSource},
};

/// GeoJSON ring in `[lng, lat]` order, closed by repeating the first vertex
fn section_ring(section: &RoofSection) -> Vec<Vec<f64>> {
    let mut ring: Vec<Vec<f64>> = section.vertices
        .iter()
        .map(|p| vec![p.lng, p.lat])
        .collect();
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }
    ring
}

impl RoofProject {
    fn foreign_members(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut foreign_members = serde_json::Map::new();
        foreign_members.insert("address".to_string(), serde_json::Value::String(self.address.clone()));
        foreign_members.insert("total_area_sqft".to_string(), serde_json::Value::from(self.total_area_sqft()));
        foreign_members.insert("section_count".to_string(), serde_json::Value::from(self.sections().len()));
        foreign_members
    }

    /// Export to typed GeoJSON format
    pub fn to_typed_geojson(&self) -> RoofGeoJson {
        let features = self.sections()
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let geometry = Geometry::new(Value::Polygon(vec![section_ring(section)]));
                let properties = RoofSectionProperties {
                    id: i as u32,
                    section: section_label(i),
                    area_sqft: section.area_sqft,
                    pitch: section.pitch.to_string(),
                    source: section.source,
                };
                TypedFeature::new(Some(geometry), properties)
            })
            .collect();

        TypedFeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(self.foreign_members()),
        }
    }

    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self.to_typed_geojson()
            .features
            .into_iter()
            .enumerate()
            .map(|(i, typed)| {
                let mut feature = typed.feature;
                feature.id = Some(geojson::feature::Id::Number(serde_json::Number::from(i)));
                feature
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(self.foreign_members()),
        }
    }

    /// Export to GeoJSON and serialize to JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_geojson())?)
    }

    /// Save GeoJSON to file
    pub fn save_geojson(&self, path: &str) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }

    /// Load a project from a GeoJSON file
    pub fn from_geojson_file(path: &str) -> Result<Self> {
        let geojson_str = std::fs::read_to_string(path)?;
        Self::from_geojson_str(&geojson_str)
    }

    /// Load a project from a GeoJSON string. Areas are re-measured from the
    /// geometry; pitch and source come from the feature properties.
    pub fn from_geojson_str(geojson_str: &str) -> Result<Self> {
        let geojson: FeatureCollection = geojson_str.parse()?;

        let address = geojson.foreign_members.as_ref()
            .and_then(|members| members.get("address"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let mut project = RoofProject::new(address);

        for feature in geojson.features {
            let typed = TypedFeature::<RoofSectionProperties>::from_feature(feature);
            let properties = typed.properties();

            let Some(geometry) = typed.feature.geometry else {
                continue;
            };
            let Value::Polygon(rings) = geometry.value else {
                continue;
            };
            let Some(exterior) = rings.first() else {
                continue;
            };

            let mut vertices: Vec<LatLng> = exterior.iter()
                .filter(|coord| coord.len() >= 2)
                .map(|coord| LatLng::new(coord[1], coord[0]))
                .collect();
            if vertices.len() > 1 && vertices.first() == vertices.last() {
                vertices.pop();
            }
            if vertices.len() < 3 {
                return Err(RoofError::MalformedPolygon { vertices: vertices.len() });
            }

            let (pitch, source) = match properties {
                Some(props) => (Pitch::from(props.pitch), props.source),
                None => (Pitch::ManualDefault, SectionSource::Manual),
            };
            project.add_section(RoofSection::new(vertices, pitch, source));
        }

        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> RoofProject {
        let mut project = RoofProject::new("221 Spadina Cres");
        project.add_section(RoofSection::new(
            vec![
                LatLng::new(52.1330, -106.6700),
                LatLng::new(52.1330, -106.6697),
                LatLng::new(52.1332, -106.6697),
                LatLng::new(52.1332, -106.6700),
            ],
            Pitch::Steep,
            SectionSource::Detected,
        ));
        project
    }

    #[test]
    fn export_closes_rings_in_lng_lat_order() {
        let collection = project().to_geojson();
        assert_eq!(collection.features.len(), 1);

        let Some(Value::Polygon(rings)) = collection.features[0].geometry.as_ref().map(|g| g.value.clone()) else {
            panic!("expected polygon");
        };
        assert_eq!(rings[0].len(), 5);
        assert_eq!(rings[0][0], vec![-106.6700, 52.1330]);
        assert_eq!(rings[0].first(), rings[0].last());

        let members = collection.foreign_members.unwrap();
        assert_eq!(members["address"], "221 Spadina Cres");
    }

    #[test]
    fn typed_export_carries_section_properties() {
        let typed = project().to_typed_geojson();
        let props = typed.features()[0].properties().unwrap();
        assert_eq!(props.section, "Section 1");
        assert_eq!(props.pitch, "6/12");
        assert_eq!(props.source, SectionSource::Detected);
        assert_eq!(typed.features_with_pitch("6/12").len(), 1);
        assert_eq!(typed.address(), Some("221 Spadina Cres"));
    }

    #[test]
    fn import_restores_sections() {
        let original = project();
        let text = original.to_geojson_string().unwrap();
        let restored = RoofProject::from_geojson_str(&text).unwrap();

        assert_eq!(restored.address, original.address);
        assert_eq!(restored.sections().len(), 1);
        let section = &restored.sections()[0];
        assert_eq!(section.vertices.len(), 4);
        assert_eq!(section.pitch, Pitch::Steep);
        assert_eq!(section.area_sqft, original.sections()[0].area_sqft);
    }

    #[test]
    fn import_rejects_degenerate_ring() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": null,
                "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]] }
            }]
        }"#;
        let err = RoofProject::from_geojson_str(text).unwrap_err();
        assert!(matches!(err, RoofError::MalformedPolygon { vertices: 2 }));
    }
}
