//! Door width accessibility check

use crate::checks::band::ToleranceBand;
use crate::checks::base::Check;
use crate::checks::indeterminate;
use crate::checks::measure::WIDTH_KEYS;
use crate::config::RuleConfiguration;
use crate::graph::{read_number, ElementCategory, ModelGraph, Reading};
use crate::models::{ComplianceCheckResult, ComplianceLevel};
use anyhow::Result;

/// Checks every door's clear width against the accessible minimum.
pub struct DoorWidthCheck;

impl Check<ComplianceCheckResult> for DoorWidthCheck {
    fn category(&self) -> &'static str {
        "door_width"
    }

    fn description(&self) -> &'static str {
        "Door widths against the accessible minimum"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Door]
    }

    fn scan(
        &self,
        model: &dyn ModelGraph,
        rules: &RuleConfiguration,
    ) -> Result<Vec<ComplianceCheckResult>> {
        let required = rules.pmr.door_width_min;
        let band = ToleranceBand::new(required, rules.pmr.door_width_tolerance);
        let mut results = Vec::new();

        for entity in model.entities_of_type(ElementCategory::Door) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            let width = match read_number(&model.property_sets(entity), WIDTH_KEYS) {
                Reading::Found(w) => w,
                // never assume a default that happens to pass
                Reading::NotFound | Reading::Faulted(_) => {
                    results.push(indeterminate(
                        self.category(),
                        &attrs,
                        "Door width",
                        "m",
                        "Article R111-19-2 du CCH",
                    ));
                    continue;
                }
            };

            let compliance = band.classify_minimum(width);
            let recommendation = match compliance {
                ComplianceLevel::Compliant => "Meets accessible width requirements".to_string(),
                ComplianceLevel::Attention => format!(
                    "Borderline width ({width:.2} m). Recommended: {required} m minimum"
                ),
                _ => format!("Widen to at least {required} m"),
            };

            let mut result = ComplianceCheckResult::new(
                self.category(),
                &attrs.id,
                &attrs.type_name,
                attrs.display_name(),
            );
            result.description = format!("Door width check: {width:.2} m");
            result.compliance = compliance;
            result.measured_value = Some(width);
            result.required_value = Some(required);
            result.unit = "m".to_string();
            result.recommendation = recommendation;
            result.regulation_reference = "Article R111-19-2 du CCH".to_string();
            results.push(result);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryModel;
    use serde_json::json;

    fn door_model(width: Option<f64>) -> MemoryModel {
        let mut builder = MemoryModel::builder();
        let door = builder.add("IfcDoor", Some("Door-01"));
        if let Some(w) = width {
            builder.set_property(door, "Pset_DoorCommon", "Width", json!(w));
        }
        builder.build()
    }

    fn classify(width: Option<f64>) -> ComplianceCheckResult {
        let results = DoorWidthCheck
            .scan(&door_model(width), &RuleConfiguration::default())
            .unwrap();
        results.into_iter().next().unwrap()
    }

    #[test]
    fn test_door_bands() {
        assert_eq!(classify(Some(0.90)).compliance, ComplianceLevel::Compliant);
        // 0.75 m against 0.80 m with a 0.10 m tolerance sits in the band
        assert_eq!(classify(Some(0.75)).compliance, ComplianceLevel::Attention);
        assert_eq!(
            classify(Some(0.60)).compliance,
            ComplianceLevel::NonCompliant
        );
    }

    #[test]
    fn test_overall_width_key_is_accepted() {
        let mut builder = MemoryModel::builder();
        let door = builder.add("IfcDoor", Some("Door-02"));
        builder.set_property(door, "Pset_DoorCommon", "OverallWidth", json!(0.85));
        let model = builder.build();
        let results = DoorWidthCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert_eq!(results[0].compliance, ComplianceLevel::Compliant);
    }

    #[test]
    fn test_missing_width_is_indeterminate() {
        let result = classify(None);
        assert_eq!(result.compliance, ComplianceLevel::NotApplicable);
        assert!(result.measured_value.is_none());
        assert!(result.recommendation.contains("unavailable"));
    }
}
