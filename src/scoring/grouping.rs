//! Category grouping for display
//!
//! Collapses repetitive per-element diagnostics into one entry per category
//! with a synthesized generic description. Display-only: scoring always runs
//! on the flat list.

use crate::models::{Anomaly, Severity};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One element inside a grouped entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub name: String,
    pub id: String,
    pub element_type: String,
}

/// All diagnostics of one category, with generic wording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedAnomalies {
    pub category: String,
    pub severity: Severity,
    pub count: usize,
    pub description: String,
    pub suggested_fix: String,
    pub elements: Vec<GroupMember>,
}

/// Group anomalies by category, in first-encounter order.
///
/// The generic text comes from the first member with any quoted element name
/// stripped, so the same input list always produces byte-identical output.
pub fn group_anomalies(anomalies: &[Anomaly]) -> IndexMap<String, GroupedAnomalies> {
    let mut grouped: IndexMap<String, GroupedAnomalies> = IndexMap::new();

    for anomaly in anomalies {
        let entry = grouped
            .entry(anomaly.category.clone())
            .or_insert_with(|| GroupedAnomalies {
                category: anomaly.category.clone(),
                severity: anomaly.severity,
                count: 0,
                description: strip_quoted(&anomaly.description, "(multiple elements)"),
                suggested_fix: strip_quoted(&anomaly.suggested_fix, "for each affected element"),
                elements: Vec::new(),
            });
        entry.count += 1;
        entry.elements.push(GroupMember {
            name: anomaly.element_name.clone(),
            id: anomaly.element_id.clone(),
            element_type: anomaly.element_type.clone(),
        });
    }

    grouped
}

/// Drop everything from the first single quote on and append a generic
/// suffix; text without quotes passes through untouched.
fn strip_quoted(text: &str, suffix: &str) -> String {
    match text.find('\'') {
        Some(pos) => format!("{} {}", text[..pos].trim_end(), suffix),
        None => text.to_string(),
    }
}
