//! In-memory model graph
//!
//! Backs tests and serialized snapshots. The production parser adapter
//! implements [`ModelGraph`] elsewhere; this implementation keeps the whole
//! entity table in memory and answers queries without I/O.

use super::element::{
    ElementAttributes, ElementCategory, EntityRef, PropertySets, RelationKind,
};
use super::traits::ModelGraph;
use super::ModelError;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredEntity {
    attrs: ElementAttributes,
    psets: PropertySets,
}

/// Complete in-memory [`ModelGraph`] implementation.
#[derive(Debug, Default, Clone)]
pub struct MemoryModel {
    entities: Vec<StoredEntity>,
    by_category: HashMap<ElementCategory, Vec<EntityRef>>,
    relations: HashMap<(EntityRef, RelationKind), Vec<EntityRef>>,
}

impl MemoryModel {
    pub fn builder() -> MemoryModelBuilder {
        MemoryModelBuilder::default()
    }

    /// Load a model from a serialized JSON snapshot.
    ///
    /// This is the one fatal failure path in the engine: a snapshot that
    /// cannot produce a handle surfaces [`ModelError`] to the caller instead
    /// of a report.
    pub fn from_json(snapshot: &str) -> Result<Self, ModelError> {
        let snapshot: Snapshot =
            serde_json::from_str(snapshot).map_err(|e| ModelError::Corrupted(e.to_string()))?;
        if snapshot.entities.is_empty() {
            return Err(ModelError::Empty);
        }

        let mut builder = MemoryModel::builder();
        let mut refs: HashMap<String, EntityRef> = HashMap::new();
        for entity in &snapshot.entities {
            if refs.contains_key(&entity.id) {
                return Err(ModelError::Corrupted(format!(
                    "duplicate entity id {:?}",
                    entity.id
                )));
            }
            let entity_ref =
                builder.add_with_id(&entity.id, &entity.entity_type, entity.name.as_deref());
            if let Some(object_type) = &entity.object_type {
                builder.set_object_type(entity_ref, object_type);
            }
            for (pset_name, pset) in &entity.property_sets {
                for (key, value) in pset {
                    builder.set_property(entity_ref, pset_name, key, value.clone());
                }
            }
            refs.insert(entity.id.clone(), entity_ref);
        }

        for relation in &snapshot.relations {
            let from = *refs.get(&relation.from).ok_or_else(|| {
                ModelError::Corrupted(format!("relation references unknown id {:?}", relation.from))
            })?;
            let to = *refs.get(&relation.to).ok_or_else(|| {
                ModelError::Corrupted(format!("relation references unknown id {:?}", relation.to))
            })?;
            match relation.kind {
                // Structural connections have no inherent direction
                RelationKind::StructuralConnection => builder.connect(from, to),
                kind => builder.relate(from, kind, to),
            }
        }

        let model = builder.build();
        debug!(
            entities = model.entities.len(),
            relations = model.relations.len(),
            "loaded model snapshot"
        );
        Ok(model)
    }

    fn get(&self, entity: EntityRef) -> Option<&StoredEntity> {
        self.entities.get(entity.0 as usize)
    }
}

impl ModelGraph for MemoryModel {
    fn entities_of_type(&self, category: ElementCategory) -> Vec<EntityRef> {
        self.by_category.get(&category).cloned().unwrap_or_default()
    }

    fn attributes(&self, entity: EntityRef) -> Option<ElementAttributes> {
        self.get(entity).map(|e| e.attrs.clone())
    }

    fn property_sets(&self, entity: EntityRef) -> PropertySets {
        self.get(entity).map(|e| e.psets.clone()).unwrap_or_default()
    }

    fn related_entities(&self, entity: EntityRef, kind: RelationKind) -> Vec<EntityRef> {
        self.relations
            .get(&(entity, kind))
            .cloned()
            .unwrap_or_default()
    }
}

/// Builder for assembling a [`MemoryModel`] entity by entity.
#[derive(Debug, Default)]
pub struct MemoryModelBuilder {
    model: MemoryModel,
}

impl MemoryModelBuilder {
    /// Add an entity with a generated global ID.
    pub fn add(&mut self, type_name: &str, name: Option<&str>) -> EntityRef {
        let id = format!("{}-{}", type_name, self.model.entities.len());
        self.add_with_id(&id, type_name, name)
    }

    /// Add an entity with an explicit global ID.
    pub fn add_with_id(&mut self, id: &str, type_name: &str, name: Option<&str>) -> EntityRef {
        let category = ElementCategory::from_type_name(type_name);
        let entity_ref = EntityRef(self.model.entities.len() as u32);
        self.model.entities.push(StoredEntity {
            attrs: ElementAttributes {
                id: id.to_string(),
                name: name.map(str::to_string),
                type_name: type_name.to_string(),
                category,
                object_type: None,
            },
            psets: PropertySets::new(),
        });
        self.model
            .by_category
            .entry(category)
            .or_default()
            .push(entity_ref);
        entity_ref
    }

    pub fn set_object_type(&mut self, entity: EntityRef, object_type: &str) {
        if let Some(stored) = self.model.entities.get_mut(entity.0 as usize) {
            stored.attrs.object_type = Some(object_type.to_string());
        }
    }

    pub fn set_property(
        &mut self,
        entity: EntityRef,
        pset: &str,
        key: &str,
        value: impl Into<serde_json::Value>,
    ) {
        if let Some(stored) = self.model.entities.get_mut(entity.0 as usize) {
            stored
                .psets
                .entry(pset.to_string())
                .or_default()
                .insert(key.to_string(), value.into());
        }
    }

    /// Record a directed relationship.
    pub fn relate(&mut self, from: EntityRef, kind: RelationKind, to: EntityRef) {
        self.model
            .relations
            .entry((from, kind))
            .or_default()
            .push(to);
    }

    /// Record a structural connection, visible from both ends.
    pub fn connect(&mut self, a: EntityRef, b: EntityRef) {
        self.relate(a, RelationKind::StructuralConnection, b);
        self.relate(b, RelationKind::StructuralConnection, a);
    }

    pub fn build(self) -> MemoryModel {
        self.model
    }
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    entities: Vec<SnapshotEntity>,
    #[serde(default)]
    relations: Vec<SnapshotRelation>,
}

#[derive(Debug, Deserialize)]
struct SnapshotEntity {
    id: String,
    #[serde(rename = "type")]
    entity_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    object_type: Option<String>,
    #[serde(default)]
    property_sets: PropertySets,
}

#[derive(Debug, Deserialize)]
struct SnapshotRelation {
    from: String,
    kind: RelationKind,
    to: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_and_queries() {
        let mut builder = MemoryModel::builder();
        let wall = builder.add("IfcWall", Some("Wall-01"));
        let door = builder.add("IfcDoor", Some("Door-01"));
        builder.set_property(door, "Pset_DoorCommon", "Width", json!(0.9));
        builder.relate(door, RelationKind::FillsHost, wall);
        let model = builder.build();

        assert_eq!(model.entities_of_type(ElementCategory::Wall), vec![wall]);
        assert_eq!(
            model.attributes(door).unwrap().name.as_deref(),
            Some("Door-01")
        );
        assert_eq!(
            model.related_entities(door, RelationKind::FillsHost),
            vec![wall]
        );
        assert!(model
            .related_entities(wall, RelationKind::FillsHost)
            .is_empty());
    }

    #[test]
    fn test_connect_is_symmetric() {
        let mut builder = MemoryModel::builder();
        let beam = builder.add("IfcBeam", None);
        let column = builder.add("IfcColumn", None);
        builder.connect(beam, column);
        let model = builder.build();

        assert_eq!(
            model.related_entities(beam, RelationKind::StructuralConnection),
            vec![column]
        );
        assert_eq!(
            model.related_entities(column, RelationKind::StructuralConnection),
            vec![beam]
        );
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let snapshot = r#"{
            "entities": [
                {"id": "w1", "type": "IfcWall", "name": "Wall-01",
                 "property_sets": {"Pset_WallCommon": {"Width": 0.2}}},
                {"id": "d1", "type": "IfcDoor", "name": "Door-01"}
            ],
            "relations": [
                {"from": "d1", "kind": "fills_host", "to": "w1"}
            ]
        }"#;
        let model = MemoryModel::from_json(snapshot).unwrap();
        assert_eq!(model.count_of_type(ElementCategory::Wall), 1);
        let door = model.entities_of_type(ElementCategory::Door)[0];
        assert_eq!(
            model.related_entities(door, RelationKind::FillsHost).len(),
            1
        );
    }

    #[test]
    fn test_corrupted_snapshot_is_fatal() {
        assert!(matches!(
            MemoryModel::from_json("{ not json"),
            Err(ModelError::Corrupted(_))
        ));
        assert!(matches!(
            MemoryModel::from_json(r#"{"entities": []}"#),
            Err(ModelError::Empty)
        ));
        let unknown_ref = r#"{
            "entities": [{"id": "a", "type": "IfcWall"}],
            "relations": [{"from": "a", "kind": "fills_host", "to": "ghost"}]
        }"#;
        assert!(matches!(
            MemoryModel::from_json(unknown_ref),
            Err(ModelError::Corrupted(_))
        ));
    }
}
