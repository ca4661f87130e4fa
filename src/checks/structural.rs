//! Structural support checks

use crate::checks::base::Check;
use crate::config::RuleConfiguration;
use crate::graph::{ElementCategory, ModelGraph, RelationKind};
use crate::models::{Anomaly, Severity};
use anyhow::Result;

/// Flags beams with no structural connection to a column or a wall.
///
/// A floating beam is the most severe defect the catalog reports: without a
/// support path the model cannot be structurally coherent.
pub struct UnsupportedBeamCheck;

impl Check<Anomaly> for UnsupportedBeamCheck {
    fn category(&self) -> &'static str {
        "unsupported_beam"
    }

    fn description(&self) -> &'static str {
        "Beams without an apparent support"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Beam]
    }

    fn scan(&self, model: &dyn ModelGraph, _rules: &RuleConfiguration) -> Result<Vec<Anomaly>> {
        let mut anomalies = Vec::new();
        for entity in model.entities_of_type(ElementCategory::Beam) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            let has_support = model
                .related_entities(entity, RelationKind::StructuralConnection)
                .into_iter()
                .filter_map(|other| model.attributes(other))
                .any(|other| {
                    matches!(
                        other.category,
                        ElementCategory::Column | ElementCategory::Wall
                    )
                });
            if !has_support {
                let beam_name = match attrs.name.as_deref() {
                    Some(n) if !n.trim().is_empty() => n.to_string(),
                    _ => format!("Beam-{}", attrs.id.chars().take(8).collect::<String>()),
                };
                anomalies.push(
                    Anomaly::new(self.category(), &attrs.id, &attrs.type_name, &beam_name)
                        .severity(Severity::Critical)
                        .description(format!(
                            "Beam '{beam_name}' has no apparent support (column or wall)"
                        ))
                        .suggested_fix(format!(
                            "Review the structural connections of beam '{beam_name}'"
                        )),
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
    fn test_supported_beam_is_silent() {
        let mut builder = MemoryModel::builder();
        let beam = builder.add("IfcBeam", Some("B-01"));
        let column = builder.add("IfcColumn", Some("C-01"));
        builder.connect(beam, column);
        let model = builder.build();

        let anomalies = UnsupportedBeamCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_floating_beam_is_critical() {
        let mut builder = MemoryModel::builder();
        builder.add("IfcBeam", Some("B-02"));
        let model = builder.build();

        let anomalies = UnsupportedBeamCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].severity, Severity::Critical);
        assert!(anomalies[0].description.contains("B-02"));
    }

    #[test]
    fn test_beam_connected_to_another_beam_is_not_supported() {
        let mut builder = MemoryModel::builder();
        let a = builder.add("IfcBeam", Some("B-03"));
        let b = builder.add("IfcBeam", Some("B-04"));
        builder.connect(a, b);
        let model = builder.build();

        let anomalies = UnsupportedBeamCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert_eq!(anomalies.len(), 2);
    }

    #[test]
    fn test_unnamed_beam_gets_stable_label() {
        let mut builder = MemoryModel::builder();
        builder.add_with_id("3vB2Yd5zr0aQc1", "IfcBeam", None);
        let model = builder.build();

        let anomalies = UnsupportedBeamCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert_eq!(anomalies[0].element_name, "Beam-3vB2Yd5z");
    }
}
