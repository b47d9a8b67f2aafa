//! The structured report returned by the report-generation service.
//!
//! Every field is optional on the wire; missing values deserialize to their defaults so a
//! partial report still renders.

use serde::{Deserialize, Serialize};

use crate::util;

/// Which tier of the report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Cover, introduction, and snapshot only.
    #[default]
    Free,
    /// The complete report.
    Premium,
}

impl Plan {
    pub fn is_premium(self) -> bool {
        matches!(self, Plan::Premium)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Summary {
    pub life_theme: String,
    pub lucky_elements: Vec<String>,
    pub key_advice: Vec<String>,
    pub favorable_numbers: Vec<u32>,
    pub favorable_days: Vec<String>,
    pub favorable_colors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YearPrediction {
    pub year: i32,
    pub theme: String,
    pub career: String,
    pub health: String,
    pub relationship: String,
    pub finance: String,
    pub remedy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Remedies {
    pub lal_kitab: Vec<String>,
    pub lifestyle: Vec<String>,
    pub crystals: String,
    pub yantra: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumerologyReport {
    pub generated_date: Option<String>,

    // Core numbers
    pub driver: u32,
    pub conductor: u32,
    pub summary: Summary,

    // Birth chart
    pub lo_shu_grid: Vec<u8>,
    pub birth_chart_analysis: String,
    pub driver_analysis: String,
    pub conductor_analysis: String,
    pub combination_analysis: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,

    pub missing_numbers: Vec<u8>,
    pub missing_number_analysis: String,
    pub missing_number_remedies: Vec<String>,

    // Name, mobile and vehicle
    pub name_analysis: String,
    pub name_correction: String,
    pub mobile_analysis: String,
    pub mobile_score: String,
    pub car_analysis: Option<String>,
    pub car_score: Option<String>,

    // Signature
    pub signature_analysis: String,
    pub signature_visual_analysis: Option<String>,
    /// Captured signature as a `data:image/png;base64,...` URL.
    pub user_signature_image: Option<String>,

    // Family
    pub spouse_analysis: Option<String>,
    pub child_analysis: Option<String>,

    pub health_analysis: String,
    pub health_remedies: Vec<String>,

    pub career_analysis: String,
    pub suitable_professions: Vec<String>,
    pub finance_analysis: String,
    pub wealth_mindset: String,

    pub relationship_analysis: String,
    pub family_dynamics: String,

    pub future_predictions: Vec<YearPrediction>,
    pub remedies: Remedies,

    pub action_plan: Vec<String>,
    pub golden_rules: Vec<String>,
}

impl NumerologyReport {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Generation date shown on the cover, falling back to today.
    pub fn generated_date_or_today(&self) -> String {
        match self.generated_date.as_deref().map(str::trim) {
            Some(date) if !date.is_empty() => date.to_string(),
            _ => chrono::Local::now().format("%d %B %Y").to_string(),
        }
    }

    /// Decoded PNG bytes of the captured signature, if one is attached and well-formed.
    pub fn signature_png(&self) -> Option<Vec<u8>> {
        let url = self.user_signature_image.as_deref()?;
        match util::decode_data_url(url) {
            Some(data) if data.mime_type == crate::signature::SIGNATURE_MIME_TYPE => {
                Some(data.bytes)
            }
            Some(data) => {
                log::warn!("Ignoring signature image with type {}", data.mime_type);
                None
            }
            None => {
                log::warn!("Ignoring malformed signature image");
                None
            }
        }
    }

    /// Attaches a captured signature (as delivered by the signature pad).
    pub fn with_signature(mut self, data_url: Option<String>) -> Self {
        if data_url.is_some() {
            self.user_signature_image = data_url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_fields_and_defaults() {
        let report = NumerologyReport::from_json(
            r#"{
                "driver": 7,
                "conductor": 3,
                "summary": { "lifeTheme": "Seeker of truth", "favorableNumbers": [1, 7] },
                "loShuGrid": [1, 3, 7, 9],
                "futurePredictions": [{ "year": 2026, "theme": "Growth" }],
                "remedies": { "lalKitab": ["Feed birds"] }
            }"#,
        )
        .unwrap();

        assert_eq!((report.driver, report.conductor), (7, 3));
        assert_eq!(report.summary.life_theme, "Seeker of truth");
        assert_eq!(report.summary.favorable_numbers, vec![1, 7]);
        assert_eq!(report.lo_shu_grid, vec![1, 3, 7, 9]);
        assert_eq!(report.future_predictions[0].year, 2026);
        assert_eq!(report.future_predictions[0].career, "");
        assert_eq!(report.remedies.lal_kitab, vec!["Feed birds"]);
        assert!(report.strengths.is_empty());
        assert_eq!(report.car_analysis, None);
    }

    #[test]
    fn plan_parses_lowercase() {
        let plan: Plan = serde_json::from_str("\"premium\"").unwrap();
        assert!(plan.is_premium());
        assert_eq!(Plan::default(), Plan::Free);
    }

    #[test]
    fn generated_date_falls_back_to_today() {
        let mut report = NumerologyReport::default();
        assert!(!report.generated_date_or_today().is_empty());
        report.generated_date = Some("14 March 2025".into());
        assert_eq!(report.generated_date_or_today(), "14 March 2025");
    }

    #[test]
    fn signature_png_requires_png_data_url() {
        let png = util::encode_data_url("image/png", &[137, 80, 78, 71]);
        let report = NumerologyReport::default().with_signature(Some(png));
        assert_eq!(report.signature_png(), Some(vec![137, 80, 78, 71]));

        let jpeg = util::encode_data_url("image/jpeg", &[1]);
        let report = NumerologyReport::default().with_signature(Some(jpeg));
        assert_eq!(report.signature_png(), None);

        let report = NumerologyReport::default().with_signature(None);
        assert_eq!(report.user_signature_image, None);
    }
}
