//! Element classification checks

use crate::checks::base::Check;
use crate::config::RuleConfiguration;
use crate::graph::{ElementCategory, ModelGraph, RelationKind};
use crate::models::{Anomaly, Severity};
use anyhow::Result;

/// Flags elements carrying neither a classification reference nor an
/// object-type attribute.
pub struct UnclassifiedElementCheck;

impl Check<Anomaly> for UnclassifiedElementCheck {
    fn category(&self) -> &'static str {
        "unclassified_element"
    }

    fn description(&self) -> &'static str {
        "Elements without classification or object type"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        ElementCategory::BUILDING_ELEMENTS
    }

    fn scan(&self, model: &dyn ModelGraph, _rules: &RuleConfiguration) -> Result<Vec<Anomaly>> {
        let mut anomalies = Vec::new();
        for entity in model.entities_of_types(ElementCategory::BUILDING_ELEMENTS) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            let classified = !model
                .related_entities(entity, RelationKind::ClassificationAssociation)
                .is_empty()
                || attrs.object_type.is_some();
            if !classified {
                anomalies.push(
                    Anomaly::new(
                        self.category(),
                        &attrs.id,
                        &attrs.type_name,
                        attrs.display_name(),
                    )
                    .severity(Severity::Low)
                    .description("Element has neither a classification nor an object type")
                    .suggested_fix("Assign a classification or an appropriate object type"),
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
    fn test_unclassified_element_is_flagged() {
        let mut builder = MemoryModel::builder();
        builder.add("IfcWall", Some("Bare"));

        let typed = builder.add("IfcWall", Some("Typed"));
        builder.set_object_type(typed, "Basic Wall 200mm");

        let classified = builder.add("IfcWall", Some("Classified"));
        let reference = builder.add("IfcClassificationReference", Some("Uniclass EF_25_10"));
        builder.relate(
            classified,
            RelationKind::ClassificationAssociation,
            reference,
        );
        let model = builder.build();

        let anomalies = UnclassifiedElementCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        // the classification reference entity itself is Other and unclassified,
        // but only the bare wall among the walls
        let walls: Vec<_> = anomalies
            .iter()
            .filter(|a| a.element_type == "IfcWall")
            .collect();
        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].element_name, "Bare");
    }

    #[test]
    fn test_spaces_are_out_of_scope() {
        let mut builder = MemoryModel::builder();
        builder.add("IfcSpace", Some("Office"));
        let model = builder.build();

        let anomalies = UnclassifiedElementCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert!(anomalies.is_empty());
    }
}
