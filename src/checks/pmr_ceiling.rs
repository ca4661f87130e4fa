//! Ceiling clearance check

use crate::checks::base::Check;
use crate::checks::indeterminate;
use crate::checks::measure::HEIGHT_KEYS;
use crate::config::RuleConfiguration;
use crate::graph::{read_number, ElementCategory, ModelGraph, Reading};
use crate::models::{ComplianceCheckResult, ComplianceLevel};
use anyhow::Result;

/// Advisory check on clear ceiling heights.
///
/// A low ceiling does not make a space inaccessible on its own, so the
/// verdict is two-way: compliant or attention.
pub struct CeilingHeightCheck;

impl Check<ComplianceCheckResult> for CeilingHeightCheck {
    fn category(&self) -> &'static str {
        "ceiling_height"
    }

    fn description(&self) -> &'static str {
        "Clear ceiling heights in spaces"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Space]
    }

    fn scan(
        &self,
        model: &dyn ModelGraph,
        rules: &RuleConfiguration,
    ) -> Result<Vec<ComplianceCheckResult>> {
        let required = rules.pmr.ceiling_height_min;
        let mut results = Vec::new();

        for entity in model.entities_of_type(ElementCategory::Space) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            let height = match read_number(&model.property_sets(entity), HEIGHT_KEYS) {
                Reading::Found(h) => h,
                Reading::NotFound | Reading::Faulted(_) => {
                    results.push(indeterminate(
                        self.category(),
                        &attrs,
                        "Ceiling height",
                        "m",
                        "Accessibility recommendation",
                    ));
                    continue;
                }
            };

            let compliance = if height >= required {
                ComplianceLevel::Compliant
            } else {
                ComplianceLevel::Attention
            };
            let recommendation = if compliance == ComplianceLevel::Compliant {
                "Height is compliant".to_string()
            } else {
                "Low clearance - review accessibility".to_string()
            };

            let mut result = ComplianceCheckResult::new(
                self.category(),
                &attrs.id,
                &attrs.type_name,
                attrs.display_name(),
            );
            result.description = format!("Ceiling height check: {height:.2} m");
            result.compliance = compliance;
            result.measured_value = Some(height);
            result.required_value = Some(required);
            result.unit = "m".to_string();
            result.recommendation = recommendation;
            result.regulation_reference = "Accessibility recommendation".to_string();
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

    fn run(height: Option<f64>) -> ComplianceCheckResult {
        let mut builder = MemoryModel::builder();
        let space = builder.add("IfcSpace", Some("Room"));
        if let Some(h) = height {
            builder.set_property(space, "Qto_SpaceBaseQuantities", "Height", json!(h));
        }
        CeilingHeightCheck
            .scan(&builder.build(), &RuleConfiguration::default())
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_ceiling_verdicts() {
        assert_eq!(run(Some(2.50)).compliance, ComplianceLevel::Compliant);
        assert_eq!(run(Some(1.95)).compliance, ComplianceLevel::Attention);
    }

    #[test]
    fn test_missing_height_is_indeterminate() {
        assert_eq!(run(None).compliance, ComplianceLevel::NotApplicable);
    }
}
