//! Naming checks

use crate::checks::base::Check;
use crate::config::RuleConfiguration;
use crate::graph::{ElementAttributes, ElementCategory, ModelGraph};
use crate::models::{Anomaly, Severity};
use anyhow::Result;
use indexmap::IndexMap;
use serde_json::json;

/// Flags same-category elements sharing an identical non-empty name.
///
/// One multimap keyed by (category, trimmed name) is built per run; every
/// member of a colliding group gets its own anomaly.
pub struct DuplicateNameCheck;

impl Check<Anomaly> for DuplicateNameCheck {
    fn category(&self) -> &'static str {
        "duplicate_name"
    }

    fn description(&self) -> &'static str {
        "Elements of the same type sharing a name"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        ElementCategory::NAMED
    }

    fn scan(&self, model: &dyn ModelGraph, _rules: &RuleConfiguration) -> Result<Vec<Anomaly>> {
        let mut by_name: IndexMap<(ElementCategory, String), Vec<ElementAttributes>> =
            IndexMap::new();
        for category in ElementCategory::NAMED {
            for entity in model.entities_of_type(*category) {
                let Some(attrs) = model.attributes(entity) else {
                    continue;
                };
                let trimmed = match attrs.name.as_deref() {
                    Some(name) => name.trim().to_string(),
                    None => continue,
                };
                if trimmed.is_empty() {
                    continue;
                }
                by_name.entry((*category, trimmed)).or_default().push(attrs);
            }
        }

        let mut anomalies = Vec::new();
        for ((_, name), members) in by_name {
            if members.len() < 2 {
                continue;
            }
            for attrs in &members {
                anomalies.push(
                    Anomaly::new(
                        self.category(),
                        &attrs.id,
                        &attrs.type_name,
                        attrs.display_name(),
                    )
                    .severity(Severity::Low)
                    .description(format!("Duplicated name '{name}' for {}", attrs.type_name))
                    .suggested_fix("Use a unique name for each element")
                    .with_data("duplicate_count", json!(members.len())),
                );
            }
        }
        Ok(anomalies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryModel;

    #[test]
    fn test_three_walls_same_name() {
        let mut builder = MemoryModel::builder();
        builder.add("IfcWall", Some("Wall-01"));
        builder.add("IfcWall", Some("Wall-01"));
        builder.add("IfcWall", Some("Wall-01"));
        builder.add("IfcWall", Some("Wall-02"));
        let model = builder.build();

        let anomalies = DuplicateNameCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert_eq!(anomalies.len(), 3);
        assert!(anomalies.iter().all(|a| a.category == "duplicate_name"));
        assert!(anomalies.iter().all(|a| a.severity == Severity::Low));
        assert!(anomalies
            .iter()
            .all(|a| a.additional_data.get("duplicate_count").unwrap() == &json!(3)));
    }

    #[test]
    fn test_same_name_across_categories_is_fine() {
        let mut builder = MemoryModel::builder();
        builder.add("IfcWall", Some("Axis-A"));
        builder.add("IfcBeam", Some("Axis-A"));
        let model = builder.build();

        let anomalies = DuplicateNameCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_whitespace_variants_collide() {
        let mut builder = MemoryModel::builder();
        builder.add("IfcDoor", Some("D-1"));
        builder.add("IfcDoor", Some("  D-1  "));
        let model = builder.build();

        let anomalies = DuplicateNameCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert_eq!(anomalies.len(), 2);
    }
}
