//! Material naming and appropriateness checks

use crate::checks::base::Check;
use crate::config::RuleConfiguration;
use crate::graph::{ElementCategory, ModelGraph, RelationKind};
use crate::models::{Anomaly, Severity};
use anyhow::Result;

/// Flags materials whose name says nothing ("default", "mat", blank...).
pub struct GenericMaterialNameCheck;

impl Check<Anomaly> for GenericMaterialNameCheck {
    fn category(&self) -> &'static str {
        "generic_material_name"
    }

    fn description(&self) -> &'static str {
        "Materials with generic or empty names"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Material]
    }

    fn scan(&self, model: &dyn ModelGraph, rules: &RuleConfiguration) -> Result<Vec<Anomaly>> {
        let mut anomalies = Vec::new();
        for entity in model.entities_of_type(ElementCategory::Material) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            let generic = match attrs.name.as_deref() {
                Some(name) => rules.materials.is_generic(name),
                None => true,
            };
            if generic {
                anomalies.push(
                    Anomaly::new(
                        self.category(),
                        &attrs.id,
                        &attrs.type_name,
                        attrs.display_name(),
                    )
                    .severity(Severity::Low)
                    .description("Material has a generic or empty name")
                    .suggested_fix("Give the material a descriptive name"),
                );
            }
        }
        Ok(anomalies)
    }
}

/// Advisory check: the first material associated with a structural element
/// should match the allow-list for that element's category (walls expect
/// concrete/brick/block, frames expect concrete/steel/wood...).
pub struct MaterialAppropriatenessCheck;

impl Check<Anomaly> for MaterialAppropriatenessCheck {
    fn category(&self) -> &'static str {
        "inappropriate_material"
    }

    fn description(&self) -> &'static str {
        "Structural elements with unexpected materials"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        ElementCategory::STRUCTURAL
    }

    fn scan(&self, model: &dyn ModelGraph, rules: &RuleConfiguration) -> Result<Vec<Anomaly>> {
        let mut anomalies = Vec::new();
        for entity in model.entities_of_types(ElementCategory::STRUCTURAL) {
            let Some(attrs) = model.attributes(entity) else {
                continue;
            };
            let Some(allowed) = rules.materials.allowed_for(attrs.category) else {
                continue;
            };
            let materials = model.related_entities(entity, RelationKind::MaterialAssociation);
            // elements without materials are someone else's finding
            let Some(first) = materials.first() else {
                continue;
            };
            let material_name = model
                .attributes(*first)
                .and_then(|m| m.name)
                .unwrap_or_default()
                .to_lowercase();
            if material_name.is_empty() {
                continue;
            }
            let appropriate = allowed.iter().any(|a| material_name.contains(a.as_str()));
            if !appropriate {
                anomalies.push(
                    Anomaly::new(
                        self.category(),
                        &attrs.id,
                        &attrs.type_name,
                        attrs.display_name(),
                    )
                    .severity(Severity::Low)
                    .description(format!(
                        "Possibly inappropriate material for {}: {material_name}",
                        attrs.type_name
                    ))
                    .suggested_fix("Verify the material suits this element"),
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
    fn test_generic_material_names() {
        let mut builder = MemoryModel::builder();
        builder.add("IfcMaterial", Some("Default"));
        builder.add("IfcMaterial", Some("C30/37 Concrete"));
        builder.add("IfcMaterial", None);
        let model = builder.build();

        let anomalies = GenericMaterialNameCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert_eq!(anomalies.len(), 2);
    }

    #[test]
    fn test_wall_with_glass_is_flagged() {
        let mut builder = MemoryModel::builder();
        let wall = builder.add("IfcWall", Some("Wall-01"));
        let glass = builder.add("IfcMaterial", Some("Glass"));
        builder.relate(wall, RelationKind::MaterialAssociation, glass);

        let ok_wall = builder.add("IfcWall", Some("Wall-02"));
        let brick = builder.add("IfcMaterial", Some("Red Brick"));
        builder.relate(ok_wall, RelationKind::MaterialAssociation, brick);
        let model = builder.build();

        let anomalies = MaterialAppropriatenessCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].element_name, "Wall-01");
        assert_eq!(anomalies[0].severity, Severity::Low);
    }

    #[test]
    fn test_element_without_material_is_skipped() {
        let mut builder = MemoryModel::builder();
        builder.add("IfcWall", Some("Wall-01"));
        let model = builder.build();

        let anomalies = MaterialAppropriatenessCheck
            .scan(&model, &RuleConfiguration::default())
            .unwrap();
        assert!(anomalies.is_empty());
    }
}
