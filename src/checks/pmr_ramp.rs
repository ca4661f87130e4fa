//! Ramp slope accessibility check

use crate::checks::band::ToleranceBand;
use crate::checks::base::Check;
use crate::checks::indeterminate;
use crate::config::RuleConfiguration;
use crate::graph::{read_number, ElementCategory, ModelGraph, Reading};
use crate::models::{ComplianceCheckResult, ComplianceLevel};
use anyhow::Result;

/// Checks ramp slopes against the accessible maximum.
///
/// Short ramps may be steeper; the tolerance band sits above the maximum
/// since the measurement must stay under it.
pub struct RampSlopeCheck;

impl Check<ComplianceCheckResult> for RampSlopeCheck {
    fn category(&self) -> &'static str {
        "ramp_slope"
    }

    fn description(&self) -> &'static str {
        "Ramp slopes against the accessible maximum"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Ramp]
    }

    fn scan(
        &self,
        model: &dyn ModelGraph,
        rules: &RuleConfiguration,
    ) -> Result<Vec<ComplianceCheckResult>> {
        let mut results = Vec::new();
        for entity in model.entities_of_type(ElementCategory::Ramp) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            let psets = model.property_sets(entity);
            let slope = match read_number(&psets, &["Slope"]) {
                Reading::Found(s) => s,
                Reading::NotFound | Reading::Faulted(_) => {
                    results.push(indeterminate(
                        self.category(),
                        &attrs,
                        "Ramp slope",
                        "%",
                        "Article R111-19-5 du CCH",
                    ));
                    continue;
                }
            };
            let max_slope = match read_number(&psets, &["Length"]) {
                Reading::Found(length) if length < rules.pmr.ramp_short_length => {
                    rules.pmr.ramp_slope_short
                }
                _ => rules.pmr.ramp_slope_max,
            };
            let band = ToleranceBand::new(max_slope, rules.pmr.ramp_slope_tolerance);

            let compliance = band.classify_maximum(slope);
            let recommendation = match compliance {
                ComplianceLevel::Compliant => "Slope is compliant".to_string(),
                ComplianceLevel::Attention => format!(
                    "Borderline slope ({slope:.1} %). Recommended: {max_slope} % maximum"
                ),
                _ => format!("Reduce the slope to at most {max_slope} %"),
            };

            let mut result = ComplianceCheckResult::new(
                self.category(),
                &attrs.id,
                &attrs.type_name,
                attrs.display_name(),
            );
            result.description = format!("Ramp slope check: {slope:.1} %");
            result.compliance = compliance;
            result.measured_value = Some(slope);
            result.required_value = Some(max_slope);
            result.unit = "%".to_string();
            result.recommendation = recommendation;
            result.regulation_reference = "Article R111-19-5 du CCH".to_string();
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

    fn run(slope: Option<f64>, length: Option<f64>) -> ComplianceCheckResult {
        let mut builder = MemoryModel::builder();
        let ramp = builder.add("IfcRamp", Some("Ramp-01"));
        if let Some(s) = slope {
            builder.set_property(ramp, "Pset_RampCommon", "Slope", json!(s));
        }
        if let Some(l) = length {
            builder.set_property(ramp, "Pset_RampCommon", "Length", json!(l));
        }
        RampSlopeCheck
            .scan(&builder.build(), &RuleConfiguration::default())
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_slope_bands() {
        assert_eq!(
            run(Some(4.0), Some(5.0)).compliance,
            ComplianceLevel::Compliant
        );
        assert_eq!(
            run(Some(5.8), Some(5.0)).compliance,
            ComplianceLevel::Attention
        );
        assert_eq!(
            run(Some(7.5), Some(5.0)).compliance,
            ComplianceLevel::NonCompliant
        );
    }

    #[test]
    fn test_short_ramp_uses_relaxed_maximum() {
        let result = run(Some(7.5), Some(1.5));
        assert_eq!(result.compliance, ComplianceLevel::Compliant);
        assert_eq!(result.required_value, Some(8.0));
    }

    #[test]
    fn test_unknown_length_uses_strict_maximum() {
        assert_eq!(
            run(Some(7.5), None).compliance,
            ComplianceLevel::NonCompliant
        );
    }

    #[test]
    fn test_missing_slope_is_indeterminate() {
        let result = run(None, Some(5.0));
        assert_eq!(result.compliance, ComplianceLevel::NotApplicable);
        assert!(result.recommendation.contains("unavailable"));
    }
}
