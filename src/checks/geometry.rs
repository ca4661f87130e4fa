//! Geometric plausibility checks

use crate::checks::base::Check;
use crate::config::RuleConfiguration;
use crate::graph::{read_number, read_value, ElementCategory, ModelGraph, Reading};
use crate::models::{Anomaly, Severity};
use anyhow::Result;
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

static DIMENSION_MARKER: OnceLock<Regex> = OnceLock::new();

/// Dimension-ish property names scanned for non-positive values.
fn dimension_marker() -> &'static Regex {
    DIMENSION_MARKER.get_or_init(|| Regex::new(r"(?i)length|width|height|thickness").unwrap())
}

/// Flags structural elements whose dimension properties parse to zero or a
/// negative value.
pub struct InvalidDimensionCheck;

impl Check<Anomaly> for InvalidDimensionCheck {
    fn category(&self) -> &'static str {
        "invalid_dimension"
    }

    fn description(&self) -> &'static str {
        "Dimension properties with non-positive values"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        ElementCategory::STRUCTURAL
    }

    fn scan(&self, model: &dyn ModelGraph, _rules: &RuleConfiguration) -> Result<Vec<Anomaly>> {
        let mut anomalies = Vec::new();
        for entity in model.entities_of_types(ElementCategory::STRUCTURAL) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            for (_, pset) in model.property_sets(entity) {
                for (prop_name, prop_value) in &pset {
                    if !dimension_marker().is_match(prop_name) {
                        continue;
                    }
                    // Unparseable values are left alone; only a parsed
                    // non-positive number is a defect
                    if let Reading::Found(value) = read_value(prop_value) {
                        if value <= 0.0 {
                            anomalies.push(
                                Anomaly::new(
                                    self.category(),
                                    &attrs.id,
                                    &attrs.type_name,
                                    attrs.display_name(),
                                )
                                .with_id_key(&format!("{}#{}", attrs.id, prop_name))
                                .severity(Severity::High)
                                .description(format!("Invalid dimension: {prop_name} = {value}"))
                                .suggested_fix("Correct the dimension to a positive value")
                                .with_data("property", prop_name.as_str())
                                .with_data("value", json!(value)),
                            );
                        }
                    }
                }
            }
        }
        Ok(anomalies)
    }
}

/// Flags consecutive storeys whose elevation difference falls outside the
/// plausible band.
pub struct StoreyHeightCheck;

impl Check<Anomaly> for StoreyHeightCheck {
    fn category(&self) -> &'static str {
        "unusual_storey_height"
    }

    fn description(&self) -> &'static str {
        "Storey-to-storey heights outside the plausible range"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Storey]
    }

    fn scan(&self, model: &dyn ModelGraph, rules: &RuleConfiguration) -> Result<Vec<Anomaly>> {
        let mut storeys: Vec<_> = model
            .entities_of_type(ElementCategory::Storey)
            .into_iter()
            .filter_map(|entity| {
                let attrs = model.attributes(entity)?;
                let elevation = read_number(&model.property_sets(entity), &["Elevation"]).found()?;
                Some((attrs, elevation))
            })
            .collect();
        if storeys.len() < 2 {
            return Ok(Vec::new());
        }
        storeys.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut anomalies = Vec::new();
        for pair in storeys.windows(2) {
            let (lower, lower_elev) = &pair[0];
            let (_, upper_elev) = &pair[1];
            let height = upper_elev - lower_elev;
            if height < rules.geometry.storey_height_min || height > rules.geometry.storey_height_max
            {
                anomalies.push(
                    Anomaly::new(
                        self.category(),
                        &lower.id,
                        &lower.type_name,
                        lower.display_name(),
                    )
                    .severity(Severity::Medium)
                    .description(format!("Unusual storey height: {height:.2} m"))
                    .suggested_fix("Review the storey elevations")
                    .with_data("height", json!(height)),
                );
            }
        }
        Ok(anomalies)
    }
}
