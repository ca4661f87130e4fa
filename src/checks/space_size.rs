//! Space-sizing outlier checks

use crate::checks::base::Check;
use crate::checks::measure::space_area;
use crate::config::RuleConfiguration;
use crate::graph::{ElementCategory, ModelGraph, Reading};
use crate::models::{Anomaly, Severity};
use anyhow::Result;
use serde_json::json;

/// Flags spaces with implausibly small floor areas.
pub struct TinySpaceCheck;

impl Check<Anomaly> for TinySpaceCheck {
    fn category(&self) -> &'static str {
        "tiny_space"
    }

    fn description(&self) -> &'static str {
        "Spaces with implausibly small areas"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Space]
    }

    fn scan(&self, model: &dyn ModelGraph, rules: &RuleConfiguration) -> Result<Vec<Anomaly>> {
        let mut anomalies = Vec::new();
        for entity in model.entities_of_type(ElementCategory::Space) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            // no area, no finding; absence belongs to the missing-area check
            let Reading::Found(area) = space_area(&model.property_sets(entity)) else {
                continue;
            };
            if area < rules.spaces.tiny_area {
                anomalies.push(
                    Anomaly::new(
                        self.category(),
                        &attrs.id,
                        &attrs.type_name,
                        attrs.display_name(),
                    )
                    .severity(Severity::Medium)
                    .description(format!("Very small space: {area:.2} m²"))
                    .suggested_fix("Verify that this area is correct")
                    .with_data("area", json!(area)),
                );
            }
        }
        Ok(anomalies)
    }
}

/// Flags spaces large enough that they probably need subdividing.
pub struct HugeSpaceCheck;

impl Check<Anomaly> for HugeSpaceCheck {
    fn category(&self) -> &'static str {
        "huge_space"
    }

    fn description(&self) -> &'static str {
        "Spaces with implausibly large areas"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Space]
    }

    fn scan(&self, model: &dyn ModelGraph, rules: &RuleConfiguration) -> Result<Vec<Anomaly>> {
        let mut anomalies = Vec::new();
        for entity in model.entities_of_type(ElementCategory::Space) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            let Reading::Found(area) = space_area(&model.property_sets(entity)) else {
                continue;
            };
            if area > rules.spaces.huge_area {
                anomalies.push(
                    Anomaly::new(
                        self.category(),
                        &attrs.id,
                        &attrs.type_name,
                        attrs.display_name(),
                    )
                    .severity(Severity::Low)
                    .description(format!("Very large space: {area:.2} m²"))
                    .suggested_fix(
                        "Verify that this area is correct or subdivide the space",
                    )
                    .with_data("area", json!(area)),
                );
            }
        }
        Ok(anomalies)
    }
}
