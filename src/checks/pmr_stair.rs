//! Stair width accessibility check

use crate::checks::band::ToleranceBand;
use crate::checks::base::Check;
use crate::checks::indeterminate;
use crate::checks::measure::WIDTH_KEYS;
use crate::config::RuleConfiguration;
use crate::graph::{read_number, ElementCategory, ModelGraph, Reading};
use crate::models::{ComplianceCheckResult, ComplianceLevel};
use anyhow::Result;

/// Checks stair flight widths against the accessible minimum.
pub struct StairWidthCheck;

impl Check<ComplianceCheckResult> for StairWidthCheck {
    fn category(&self) -> &'static str {
        "stair_width"
    }

    fn description(&self) -> &'static str {
        "Stair widths against the accessible minimum"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Stair]
    }

    fn scan(
        &self,
        model: &dyn ModelGraph,
        rules: &RuleConfiguration,
    ) -> Result<Vec<ComplianceCheckResult>> {
        let required = rules.pmr.stair_width_min;
        let band = ToleranceBand::new(required, rules.pmr.stair_width_tolerance)
            .with_floor(rules.pmr.passage_floor);
        let mut results = Vec::new();

        for entity in model.entities_of_type(ElementCategory::Stair) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            let width = match read_number(&model.property_sets(entity), WIDTH_KEYS) {
                Reading::Found(w) => w,
                Reading::NotFound | Reading::Faulted(_) => {
                    results.push(indeterminate(
                        self.category(),
                        &attrs,
                        "Stair width",
                        "m",
                        "Article R111-19-6 du CCH",
                    ));
                    continue;
                }
            };

            let compliance = band.classify_minimum(width);
            let recommendation = match compliance {
                ComplianceLevel::Compliant => "Width is compliant".to_string(),
                ComplianceLevel::Attention => format!(
                    "Borderline width ({width:.2} m). Recommended: {required} m minimum"
                ),
                ComplianceLevel::NotApplicable => {
                    "Stair too narrow to make accessible".to_string()
                }
                ComplianceLevel::NonCompliant => format!("Widen to at least {required} m"),
            };

            let mut result = ComplianceCheckResult::new(
                self.category(),
                &attrs.id,
                &attrs.type_name,
                attrs.display_name(),
            );
            result.description = format!("Stair width check: {width:.2} m");
            result.compliance = compliance;
            result.measured_value = Some(width);
            result.required_value = Some(required);
            result.unit = "m".to_string();
            result.recommendation = recommendation;
            result.regulation_reference = "Article R111-19-6 du CCH".to_string();
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

    fn run(width: Option<f64>) -> ComplianceCheckResult {
        let mut builder = MemoryModel::builder();
        let stair = builder.add("IfcStair", Some("Stair-01"));
        if let Some(w) = width {
            builder.set_property(stair, "Pset_StairCommon", "Width", json!(w));
        }
        StairWidthCheck
            .scan(&builder.build(), &RuleConfiguration::default())
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_stair_bands() {
        assert_eq!(run(Some(1.30)).compliance, ComplianceLevel::Compliant);
        assert_eq!(run(Some(1.15)).compliance, ComplianceLevel::Attention);
        assert_eq!(run(Some(1.00)).compliance, ComplianceLevel::NonCompliant);
        assert_eq!(run(Some(0.70)).compliance, ComplianceLevel::NotApplicable);
    }

    #[test]
    fn test_missing_width_is_indeterminate() {
        let result = run(None);
        assert_eq!(result.compliance, ComplianceLevel::NotApplicable);
        assert!(result.measured_value.is_none());
    }
}
