//! Missing-property checks
//!
//! Structural elements are expected to carry a material, every element a
//! non-empty name, and spaces an area and a volume. Absence of the data is
//! the finding here, so these checks never skip on missing measurements.

use crate::checks::base::Check;
use crate::checks::measure::{AREA_KEYS, VOLUME_KEYS};
use crate::config::RuleConfiguration;
use crate::graph::{has_property, ElementCategory, ModelGraph, RelationKind};
use crate::models::{Anomaly, Severity};
use anyhow::Result;

/// Flags walls, slabs, beams and columns with no associated material.
pub struct MissingMaterialCheck;

impl Check<Anomaly> for MissingMaterialCheck {
    fn category(&self) -> &'static str {
        "missing_material"
    }

    fn description(&self) -> &'static str {
        "Structural elements without an assigned material"
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
            if model
                .related_entities(entity, RelationKind::MaterialAssociation)
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
                    .description(format!("{} element has no material assigned", attrs.type_name))
                    .suggested_fix("Assign an appropriate material to this element"),
                );
            }
        }
        Ok(anomalies)
    }
}

/// Flags building elements whose name is absent or blank.
pub struct MissingNameCheck;

impl Check<Anomaly> for MissingNameCheck {
    fn category(&self) -> &'static str {
        "missing_name"
    }

    fn description(&self) -> &'static str {
        "Elements without a usable name"
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
            let blank = attrs
                .name
                .as_deref()
                .map(|n| n.trim().is_empty())
                .unwrap_or(true);
            if blank {
                anomalies.push(
                    Anomaly::new(
                        self.category(),
                        &attrs.id,
                        &attrs.type_name,
                        attrs.display_name(),
                    )
                    .severity(Severity::Low)
                    .description(format!("{} element has no name", attrs.type_name))
                    .suggested_fix("Give this element a descriptive name"),
                );
            }
        }
        Ok(anomalies)
    }
}

/// Flags spaces that carry no area quantity.
pub struct MissingAreaCheck;

impl Check<Anomaly> for MissingAreaCheck {
    fn category(&self) -> &'static str {
        "missing_area"
    }

    fn description(&self) -> &'static str {
        "Spaces without a defined area"
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
            if !has_property(&model.property_sets(entity), AREA_KEYS) {
                anomalies.push(
                    Anomaly::new(
                        self.category(),
                        &attrs.id,
                        &attrs.type_name,
                        attrs.display_name(),
                    )
                    .severity(Severity::Medium)
                    .description("Space has no defined area")
                    .suggested_fix("Compute and assign the space area"),
                );
            }
        }
        Ok(anomalies)
    }
}

/// Flags spaces that carry no volume quantity.
pub struct MissingVolumeCheck;

impl Check<Anomaly> for MissingVolumeCheck {
    fn category(&self) -> &'static str {
        "missing_volume"
    }

    fn description(&self) -> &'static str {
        "Spaces without a defined volume"
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
            if !has_property(&model.property_sets(entity), VOLUME_KEYS) {
                anomalies.push(
                    Anomaly::new(
                        self.category(),
                        &attrs.id,
                        &attrs.type_name,
                        attrs.display_name(),
                    )
                    .severity(Severity::Medium)
                    .description("Space has no defined volume")
                    .suggested_fix("Compute and assign the space volume"),
                );
            }
        }
        Ok(anomalies)
    }
}
