//! Element identities, categories, and relationship kinds

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque handle to an entity inside one loaded model.
///
/// Refs are only meaningful against the model that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef(pub u32);

/// Property values as they come out of the model graph.
///
/// BTreeMap keeps lookup iteration deterministic across runs.
pub type PropertySet = BTreeMap<String, serde_json::Value>;

/// Named property sets attached to one element.
pub type PropertySets = BTreeMap<String, PropertySet>;

/// Typed element category, resolved once from the raw type name when the
/// model is loaded. Checks match on this instead of re-parsing type strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementCategory {
    Wall,
    Slab,
    Beam,
    Column,
    Door,
    Window,
    Space,
    Storey,
    Stair,
    Ramp,
    Roof,
    TransportElement,
    Railing,
    Material,
    Other,
}

impl ElementCategory {
    /// Resolve a category from a raw schema type name.
    ///
    /// Accepts subtype names ("IfcWallStandardCase" is still a wall).
    pub fn from_type_name(type_name: &str) -> Self {
        let lower = type_name.to_ascii_lowercase();
        let lower = lower.strip_prefix("ifc").unwrap_or(&lower);
        if lower.starts_with("wall") {
            ElementCategory::Wall
        } else if lower.starts_with("slab") {
            ElementCategory::Slab
        } else if lower.starts_with("beam") {
            ElementCategory::Beam
        } else if lower.starts_with("column") {
            ElementCategory::Column
        } else if lower.starts_with("door") {
            ElementCategory::Door
        } else if lower.starts_with("window") {
            ElementCategory::Window
        } else if lower.starts_with("space") {
            ElementCategory::Space
        } else if lower.starts_with("buildingstorey") {
            ElementCategory::Storey
        } else if lower.starts_with("stair") {
            ElementCategory::Stair
        } else if lower.starts_with("ramp") {
            ElementCategory::Ramp
        } else if lower.starts_with("roof") {
            ElementCategory::Roof
        } else if lower.starts_with("transportelement") {
            ElementCategory::TransportElement
        } else if lower.starts_with("railing") {
            ElementCategory::Railing
        } else if lower.starts_with("material") {
            ElementCategory::Material
        } else {
            ElementCategory::Other
        }
    }

    /// Default schema type name for this category.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementCategory::Wall => "IfcWall",
            ElementCategory::Slab => "IfcSlab",
            ElementCategory::Beam => "IfcBeam",
            ElementCategory::Column => "IfcColumn",
            ElementCategory::Door => "IfcDoor",
            ElementCategory::Window => "IfcWindow",
            ElementCategory::Space => "IfcSpace",
            ElementCategory::Storey => "IfcBuildingStorey",
            ElementCategory::Stair => "IfcStair",
            ElementCategory::Ramp => "IfcRamp",
            ElementCategory::Roof => "IfcRoof",
            ElementCategory::TransportElement => "IfcTransportElement",
            ElementCategory::Railing => "IfcRailing",
            ElementCategory::Material => "IfcMaterial",
            ElementCategory::Other => "IfcBuildingElementProxy",
        }
    }

    /// Categories that must carry a material and valid dimensions.
    pub const STRUCTURAL: &'static [ElementCategory] = &[
        ElementCategory::Wall,
        ElementCategory::Slab,
        ElementCategory::Beam,
        ElementCategory::Column,
    ];

    /// Categories scanned for duplicate names.
    pub const NAMED: &'static [ElementCategory] = &[
        ElementCategory::Wall,
        ElementCategory::Slab,
        ElementCategory::Beam,
        ElementCategory::Column,
        ElementCategory::Space,
        ElementCategory::Door,
        ElementCategory::Window,
    ];

    /// Physical building elements (everything except spaces, storeys, and
    /// materials), the scope of name/classification scans.
    pub const BUILDING_ELEMENTS: &'static [ElementCategory] = &[
        ElementCategory::Wall,
        ElementCategory::Slab,
        ElementCategory::Beam,
        ElementCategory::Column,
        ElementCategory::Door,
        ElementCategory::Window,
        ElementCategory::Stair,
        ElementCategory::Ramp,
        ElementCategory::Roof,
        ElementCategory::TransportElement,
        ElementCategory::Railing,
        ElementCategory::Other,
    ];
}

/// Kinds of typed relationships the engine follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Element-to-material association
    MaterialAssociation,
    /// Opening (door/window) filling a host wall
    FillsHost,
    /// Space to its bounding elements
    SpaceBoundary,
    /// Element-to-element structural connection
    StructuralConnection,
    /// Element to a classification reference
    ClassificationAssociation,
}

/// Core attributes of one element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementAttributes {
    /// Stable global identifier from the source model
    pub id: String,
    pub name: Option<String>,
    /// Raw type name as authored (e.g. "IfcWallStandardCase")
    pub type_name: String,
    pub category: ElementCategory,
    /// Optional object-type attribute, used by classification checks
    pub object_type: Option<String>,
}

impl ElementAttributes {
    /// Element name, falling back to the unnamed sentinel.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(n) if !n.trim().is_empty() => n,
            _ => crate::models::UNNAMED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_type_name() {
        assert_eq!(
            ElementCategory::from_type_name("IfcWall"),
            ElementCategory::Wall
        );
        assert_eq!(
            ElementCategory::from_type_name("IfcWallStandardCase"),
            ElementCategory::Wall
        );
        assert_eq!(
            ElementCategory::from_type_name("IfcBuildingStorey"),
            ElementCategory::Storey
        );
        assert_eq!(
            ElementCategory::from_type_name("IfcFlowTerminal"),
            ElementCategory::Other
        );
    }

    #[test]
    fn test_display_name_fallback() {
        let attrs = ElementAttributes {
            id: "x".into(),
            name: Some("  ".into()),
            type_name: "IfcWall".into(),
            category: ElementCategory::Wall,
            object_type: None,
        };
        assert_eq!(attrs.display_name(), crate::models::UNNAMED);
    }
}
