//! Project state: the ordered section list for one address, and the report
//! handed to persistence and PDF collaborators.

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use ts_rs::TS;

use crate::{
    error::{Result, RoofError},
    measurement,
    pipeline::Detection,
    types::{Pitch, RoofSection},
};

/// Area line for one section of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct SectionArea {
    /// 1-based label, e.g. "Section 2"
    pub section: String,
    pub area: u64,
    #[schemars(with = "String")]
    #[ts(type = "string")]
    pub pitch: Pitch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProjectReport {
    pub address: String,
    pub sections: Vec<SectionArea>,
    pub total_area: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoofProject {
    pub address: String,
    sections: Vec<RoofSection>,
}

pub fn section_label(index: usize) -> String {
    format!("Section {}", index + 1)
}

impl RoofProject {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            sections: Vec::new(),
        }
    }

    pub fn sections(&self) -> &[RoofSection] {
        &self.sections
    }

    pub fn add_section(&mut self, section: RoofSection) {
        self.sections.push(section);
    }

    /// Relabel one section's pitch; the only edit allowed after creation
    pub fn set_pitch(&mut self, index: usize, pitch: Pitch) -> Result<()> {
        let len = self.sections.len();
        let section = self.sections
            .get_mut(index)
            .ok_or(RoofError::SectionIndex { index, len })?;
        section.pitch = pitch;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    /// Replace every section with the result of a new detection run
    pub fn replace_with(&mut self, detection: Detection) {
        self.sections = detection.into_sections();
    }

    /// Sum of each section's rounded area
    pub fn total_area_sqft(&self) -> u64 {
        measurement::total_area_sqft(&self.sections)
    }

    pub fn section_summaries(&self) -> Vec<SectionArea> {
        self.sections
            .iter()
            .enumerate()
            .map(|(i, section)| SectionArea {
                section: section_label(i),
                area: section.area_sqft,
                pitch: section.pitch.clone(),
            })
            .collect()
    }

    pub fn report(&self) -> ProjectReport {
        ProjectReport {
            address: self.address.clone(),
            sections: self.section_summaries(),
            total_area: self.total_area_sqft(),
        }
    }

    /// Saving or reporting needs an address
    pub fn validate_for_export(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(RoofError::MissingAddress);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LatLng, SectionSource};

    fn section(area_sqft: u64) -> RoofSection {
        RoofSection {
            vertices: vec![LatLng::new(0.0, 0.0); 3],
            area_sqft,
            pitch: Pitch::ManualDefault,
            source: SectionSource::Manual,
        }
    }

    #[test]
    fn report_labels_sections_from_one() {
        let mut project = RoofProject::new("123 Main St");
        project.add_section(section(1200));
        project.add_section(section(830));

        let report = project.report();
        assert_eq!(report.sections[0].section, "Section 1");
        assert_eq!(report.sections[1].section, "Section 2");
        assert_eq!(report.sections[1].area, 830);
        assert_eq!(report.total_area, 2030);
    }

    #[test]
    fn set_pitch_checks_index() {
        let mut project = RoofProject::default();
        project.add_section(section(10));
        project.set_pitch(0, Pitch::Custom("5/12".to_string())).unwrap();
        assert_eq!(project.sections()[0].pitch.label(), "5/12");

        let err = project.set_pitch(3, Pitch::Steep).unwrap_err();
        assert!(matches!(err, RoofError::SectionIndex { index: 3, len: 1 }));
    }

    #[test]
    fn export_needs_an_address() {
        assert!(matches!(
            RoofProject::new("  ").validate_for_export(),
            Err(RoofError::MissingAddress)
        ));
        assert!(RoofProject::new("1 Elm").validate_for_export().is_ok());
    }

    #[test]
    fn report_uses_camel_case_total() {
        let mut project = RoofProject::new("1 Elm");
        project.add_section(section(5));
        let json = serde_json::to_value(project.report()).unwrap();
        assert_eq!(json["totalArea"], 5);
        assert_eq!(json["sections"][0]["pitch"], "3/12");
    }
}
