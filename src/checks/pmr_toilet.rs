//! Accessible toilet dimension check

use crate::checks::base::Check;
use crate::checks::indeterminate;
use crate::checks::measure::{space_depth_estimate, space_width_estimate};
use crate::config::RuleConfiguration;
use crate::graph::{ElementCategory, ModelGraph, Reading};
use crate::models::{ComplianceCheckResult, ComplianceLevel};
use anyhow::Result;

/// Checks sanitary spaces for accessible width AND depth.
///
/// The two dimensions band jointly: both must meet the minimum, both must be
/// within tolerance for an attention verdict, and a room below the
/// degeneracy floor in either direction cannot be adapted at all.
pub struct ToiletAccessibilityCheck;

impl Check<ComplianceCheckResult> for ToiletAccessibilityCheck {
    fn category(&self) -> &'static str {
        "toilet_accessibility"
    }

    fn description(&self) -> &'static str {
        "Sanitary room dimensions against accessible minima"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Space]
    }

    fn scan(
        &self,
        model: &dyn ModelGraph,
        rules: &RuleConfiguration,
    ) -> Result<Vec<ComplianceCheckResult>> {
        let min_width = rules.pmr.toilet_width_min;
        let min_depth = rules.pmr.toilet_depth_min;
        let tolerance = rules.pmr.toilet_tolerance;
        let floor = rules.pmr.toilet_floor;
        let mut results = Vec::new();

        for entity in model.entities_of_type(ElementCategory::Space) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            if !rules.naming.is_toilet(attrs.display_name()) {
                continue;
            }
            let psets = model.property_sets(entity);
            let (width, depth) = match (
                space_width_estimate(&psets),
                space_depth_estimate(&psets),
            ) {
                (Reading::Found(w), Reading::Found(d)) => (w, d),
                _ => {
                    results.push(indeterminate(
                        self.category(),
                        &attrs,
                        "Sanitary room dimensions",
                        "m",
                        "Article R111-19-7 du CCH",
                    ));
                    continue;
                }
            };

            // degeneracy first: a closet-sized room cannot be retrofitted
            let compliance = if width < floor || depth < floor {
                ComplianceLevel::NotApplicable
            } else if width >= min_width && depth >= min_depth {
                ComplianceLevel::Compliant
            } else if width >= min_width - tolerance && depth >= min_depth - tolerance {
                ComplianceLevel::Attention
            } else {
                ComplianceLevel::NonCompliant
            };

            let recommendation = match compliance {
                ComplianceLevel::Compliant => "Sanitary room is accessible".to_string(),
                ComplianceLevel::Attention => format!(
                    "Borderline dimensions ({width:.2} m × {depth:.2} m). Review the layout"
                ),
                ComplianceLevel::NotApplicable => {
                    "Sanitary room too small to adapt".to_string()
                }
                ComplianceLevel::NonCompliant => {
                    let mut issues = Vec::new();
                    if width < min_width {
                        issues.push(format!("width insufficient ({width:.2} m < {min_width} m)"));
                    }
                    if depth < min_depth {
                        issues.push(format!("depth insufficient ({depth:.2} m < {min_depth} m)"));
                    }
                    format!("Correct: {}", issues.join(", "))
                }
            };

            let mut result = ComplianceCheckResult::new(
                self.category(),
                &attrs.id,
                &attrs.type_name,
                attrs.display_name(),
            );
            result.description =
                format!("Accessible sanitary check: {width:.2} m × {depth:.2} m");
            result.compliance = compliance;
            result.measured_value = Some(width.min(depth));
            result.required_value = Some(min_width);
            result.unit = "m".to_string();
            result.recommendation = recommendation;
            result.regulation_reference = "Article R111-19-7 du CCH".to_string();
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

    fn run(name: &str, area: Option<f64>) -> Vec<ComplianceCheckResult> {
        let mut builder = MemoryModel::builder();
        let space = builder.add("IfcSpace", Some(name));
        if let Some(a) = area {
            builder.set_property(space, "Qto_SpaceBaseQuantities", "Area", json!(a));
        }
        ToiletAccessibilityCheck
            .scan(&builder.build(), &RuleConfiguration::default())
            .unwrap()
    }

    #[test]
    fn test_non_toilet_spaces_are_skipped() {
        assert!(run("Meeting room", Some(12.0)).is_empty());
    }

    #[test]
    fn test_joint_bands() {
        // 2.56 m² -> 1.6 m square: compliant
        assert_eq!(
            run("WC PMR", Some(2.56))[0].compliance,
            ComplianceLevel::Compliant
        );
        // 2.10 m² -> ≈1.45 m: within the 0.10 m tolerance
        assert_eq!(
            run("WC 1", Some(2.10))[0].compliance,
            ComplianceLevel::Attention
        );
        // 1.44 m² -> 1.2 m: adaptable but non-compliant
        assert_eq!(
            run("WC 2", Some(1.44))[0].compliance,
            ComplianceLevel::NonCompliant
        );
        // 0.81 m² -> 0.9 m: below the 1.0 m floor
        assert_eq!(
            run("WC 3", Some(0.81))[0].compliance,
            ComplianceLevel::NotApplicable
        );
    }

    #[test]
    fn test_missing_dimensions_are_indeterminate() {
        let results = run("Sanitaire", None);
        assert_eq!(results[0].compliance, ComplianceLevel::NotApplicable);
        assert!(results[0].recommendation.contains("unavailable"));
    }
}
