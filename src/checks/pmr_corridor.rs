//! Corridor width accessibility check

use crate::checks::band::ToleranceBand;
use crate::checks::base::Check;
use crate::checks::indeterminate;
use crate::checks::measure::{space_length_estimate, space_width_estimate};
use crate::config::RuleConfiguration;
use crate::graph::{ElementCategory, ModelGraph, Reading};
use crate::models::{ComplianceCheckResult, ComplianceLevel};
use anyhow::Result;

/// Checks the width of circulation spaces.
///
/// The required minimum relaxes for short corridors; a passage narrower than
/// the degeneracy floor cannot be made accessible at all.
pub struct CorridorWidthCheck;

impl Check<ComplianceCheckResult> for CorridorWidthCheck {
    fn category(&self) -> &'static str {
        "corridor_width"
    }

    fn description(&self) -> &'static str {
        "Circulation widths against the accessible minimum"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Space]
    }

    fn scan(
        &self,
        model: &dyn ModelGraph,
        rules: &RuleConfiguration,
    ) -> Result<Vec<ComplianceCheckResult>> {
        let mut results = Vec::new();
        for entity in model.entities_of_type(ElementCategory::Space) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            if !rules.naming.is_circulation(attrs.display_name()) {
                continue;
            }
            let psets = model.property_sets(entity);
            let width = match space_width_estimate(&psets) {
                Reading::Found(w) => w,
                Reading::NotFound | Reading::Faulted(_) => {
                    results.push(indeterminate(
                        self.category(),
                        &attrs,
                        "Circulation width",
                        "m",
                        "Article R111-19-3 du CCH",
                    ));
                    continue;
                }
            };
            // a short corridor may use the relaxed minimum
            let required = match space_length_estimate(&psets) {
                Reading::Found(length) if length < rules.pmr.corridor_short_length => {
                    rules.pmr.corridor_width_short
                }
                _ => rules.pmr.corridor_width_min,
            };
            let band = ToleranceBand::new(required, rules.pmr.corridor_width_tolerance)
                .with_floor(rules.pmr.passage_floor);

            let compliance = band.classify_minimum(width);
            let recommendation = match compliance {
                ComplianceLevel::Compliant => "Meets accessible width requirements".to_string(),
                ComplianceLevel::Attention => format!(
                    "Borderline width ({width:.2} m). Recommended: {required} m minimum"
                ),
                ComplianceLevel::NotApplicable => {
                    "Passage too narrow to make accessible".to_string()
                }
                ComplianceLevel::NonCompliant => format!("Widen to at least {required} m"),
            };

            let mut result = ComplianceCheckResult::new(
                self.category(),
                &attrs.id,
                &attrs.type_name,
                attrs.display_name(),
            );
            result.description = format!("Circulation width check: {width:.2} m");
            result.compliance = compliance;
            result.measured_value = Some(width);
            result.required_value = Some(required);
            result.unit = "m".to_string();
            result.recommendation = recommendation;
            result.regulation_reference = "Article R111-19-3 du CCH".to_string();
            results.push(result);
        }
        Ok(results)
    }
}
