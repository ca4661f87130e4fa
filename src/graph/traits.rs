//! Model graph trait consumed by the check catalog

use super::element::{ElementAttributes, ElementCategory, EntityRef, PropertySets, RelationKind};

/// Read-only query surface over one loaded building model.
///
/// The engine never mutates the graph; implementations must tolerate
/// concurrent reads (checks fan out over a thread pool).
pub trait ModelGraph: Send + Sync {
    /// All entities of the given category, in model order.
    fn entities_of_type(&self, category: ElementCategory) -> Vec<EntityRef>;

    /// Core attributes of an entity, or None for a stale ref.
    fn attributes(&self, entity: EntityRef) -> Option<ElementAttributes>;

    /// Named property sets attached to an entity.
    fn property_sets(&self, entity: EntityRef) -> PropertySets;

    /// Entities related to this one through the given relationship kind.
    fn related_entities(&self, entity: EntityRef, kind: RelationKind) -> Vec<EntityRef>;

    /// Convenience: entities of several categories concatenated.
    fn entities_of_types(&self, categories: &[ElementCategory]) -> Vec<EntityRef> {
        categories
            .iter()
            .flat_map(|c| self.entities_of_type(*c))
            .collect()
    }

    /// Convenience: count of entities of one category.
    fn count_of_type(&self, category: ElementCategory) -> usize {
        self.entities_of_type(category).len()
    }
}
