//! Model graph adapter: the query surface the check catalog consumes
//!
//! The real model parser lives outside this crate; the engine only depends
//! on the [`ModelGraph`] trait. [`MemoryModel`] is a complete in-memory
//! implementation used for fixtures and for loading serialized snapshots.

mod element;
mod memory;
mod traits;

pub use element::{
    ElementAttributes, ElementCategory, EntityRef, PropertySet, PropertySets, RelationKind,
};
pub use memory::{MemoryModel, MemoryModelBuilder};
pub use traits::ModelGraph;

use thiserror::Error;

/// Failures while producing a model handle.
///
/// These are the only errors the engine surfaces to callers directly; once a
/// handle exists, analysis always completes with a report.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model snapshot is corrupted or malformed: {0}")]
    Corrupted(String),
    #[error("model snapshot has no entities")]
    Empty,
}

/// Outcome of looking up one measurement in the graph.
///
/// Checks branch on this instead of treating absent data as an error:
/// `NotFound` and `Faulted` never propagate as failures.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading<T> {
    /// The value was present and parsed
    Found(T),
    /// No property carried the value
    NotFound,
    /// A property carried the value but it could not be interpreted
    Faulted(String),
}

impl<T> Reading<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Reading::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Reading::Found(_))
    }
}

/// Search every property set for the first of `keys`, in deterministic
/// order, and parse it as a number. Numeric strings are accepted the way
/// authoring tools export them.
pub fn read_number(psets: &PropertySets, keys: &[&str]) -> Reading<f64> {
    for key in keys {
        for pset in psets.values() {
            if let Some(value) = pset.get(*key) {
                return read_value(value);
            }
        }
    }
    Reading::NotFound
}

/// True when any property set contains any of `keys`.
pub fn has_property(psets: &PropertySets, keys: &[&str]) -> bool {
    keys.iter()
        .any(|key| psets.values().any(|pset| pset.contains_key(*key)))
}

/// Parse one property value as a number.
pub fn read_value(value: &serde_json::Value) -> Reading<f64> {
    match value {
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(v) => Reading::Found(v),
            None => Reading::Faulted(format!("non-finite number: {n}")),
        },
        serde_json::Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) => Reading::Found(v),
            Err(_) => Reading::Faulted(format!("not a number: {s:?}")),
        },
        other => Reading::Faulted(format!("unsupported value: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn psets() -> PropertySets {
        let mut dims = PropertySet::new();
        dims.insert("Width".to_string(), json!(0.9));
        dims.insert("Height".to_string(), json!("2.10"));
        dims.insert("Label".to_string(), json!("door"));
        let mut out = PropertySets::new();
        out.insert("Pset_DoorCommon".to_string(), dims);
        out
    }

    #[test]
    fn test_read_number_from_number_and_string() {
        assert_eq!(read_number(&psets(), &["Width"]), Reading::Found(0.9));
        assert_eq!(read_number(&psets(), &["Height"]), Reading::Found(2.10));
    }

    #[test]
    fn test_read_number_missing_and_faulted() {
        assert_eq!(read_number(&psets(), &["Depth"]), Reading::NotFound);
        assert!(matches!(
            read_number(&psets(), &["Label"]),
            Reading::Faulted(_)
        ));
    }

    #[test]
    fn test_first_key_wins() {
        // "Width" is tried before "Height" regardless of map order
        assert_eq!(
            read_number(&psets(), &["Width", "Height"]),
            Reading::Found(0.9)
        );
    }
}
