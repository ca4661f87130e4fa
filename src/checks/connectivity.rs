//! Connectivity checks: openings must fill a host, spaces must be bounded

use crate::checks::base::Check;
use crate::config::RuleConfiguration;
use crate::graph::{ElementCategory, ModelGraph, RelationKind};
use crate::models::{Anomaly, Severity};
use anyhow::Result;

/// Flags doors and windows with no filling relation to a host wall.
pub struct UnconnectedOpeningCheck;

impl Check<Anomaly> for UnconnectedOpeningCheck {
    fn category(&self) -> &'static str {
        "unconnected_opening"
    }

    fn description(&self) -> &'static str {
        "Doors and windows not hosted by any wall"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Door, ElementCategory::Window]
    }

    fn scan(&self, model: &dyn ModelGraph, _rules: &RuleConfiguration) -> Result<Vec<Anomaly>> {
        let mut anomalies = Vec::new();
        for entity in
            model.entities_of_types(&[ElementCategory::Door, ElementCategory::Window])
        {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            if model
                .related_entities(entity, RelationKind::FillsHost)
                .is_empty()
            {
                anomalies.push(
                    Anomaly::new(
                        self.category(),
                        &attrs.id,
                        &attrs.type_name,
                        attrs.display_name(),
                    )
                    .severity(Severity::High)
                    .description(format!("{} is not connected to a wall", attrs.type_name))
                    .suggested_fix("Connect the opening to an appropriate wall"),
                );
            }
        }
        Ok(anomalies)
    }
}

/// Flags spaces with no boundary elements at all.
pub struct UnboundedSpaceCheck;

impl Check<Anomaly> for UnboundedSpaceCheck {
    fn category(&self) -> &'static str {
        "unbounded_space"
    }

    fn description(&self) -> &'static str {
        "Spaces without boundary elements"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Space]
    }

    fn scan(&self, model: &dyn ModelGraph, _rules: &RuleConfiguration) -> Result<Vec<Anomaly>> {
        let mut anomalies = Vec::new();
        for entity in model.entities_of_type(ElementCategory::Space) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            if model
                .related_entities(entity, RelationKind::SpaceBoundary)
                .is_empty()
            {
                anomalies.push(
                    Anomaly::new(
                        self.category(),
                        &attrs.id,
                        &attrs.type_name,
                        attrs.display_name(),
                    )
                    .severity(Severity::Medium)
                    .description("Space has no defined boundary elements")
                    .suggested_fix("Define the elements that bound this space"),
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
    fn test_unconnected_door_is_flagged() {
        let mut builder = MemoryModel::builder();
        let wall = builder.add("IfcWall", Some("Wall-01"));
        let hosted = builder.add("IfcDoor", Some("Door-01"));
        builder.relate(hosted, RelationKind::FillsHost, wall);
        builder.add("IfcWindow", Some("Window-01"));
        let model = builder.build();

        let anomalies = UnconnectedOpeningCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].element_type, "IfcWindow");
        assert_eq!(anomalies[0].severity, Severity::High);
    }

    #[test]
    fn test_unbounded_space_is_flagged() {
        let mut builder = MemoryModel::builder();
        let wall = builder.add("IfcWall", Some("Wall-01"));
        let bounded = builder.add("IfcSpace", Some("Office"));
        builder.relate(bounded, RelationKind::SpaceBoundary, wall);
        builder.add("IfcSpace", Some("Void"));
        let model = builder.build();

        let anomalies = UnboundedSpaceCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].element_name, "Void");
    }
}
