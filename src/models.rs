//! Core data models for bimcheck
//!
//! These models are used throughout the codebase for representing
//! detected anomalies, compliance check results, and analysis summaries.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Name used when an element carries no usable name.
pub const UNNAMED: &str = "unnamed";

/// Generate a deterministic diagnostic ID based on content hash.
///
/// This ensures diagnostics have stable IDs across runs, enabling:
/// - Comparing reports over time (fixed vs new vs recurring)
/// - Reliable deduplication
///
/// The ID is a 16-character hex string derived from hashing the check
/// category and the inspected element's ID, so the same model and rule set
/// always yield the same ID set.
pub fn diagnostic_id(category: &str, element_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(category.as_bytes());
    hasher.update(b"\n");
    hasher.update(element_id.as_bytes());
    let digest = hasher.finalize();
    digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
}

/// Severity levels for anomalies, ordered from least to most severe
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Compliance classification for regulatory checks.
///
/// Unlike [`Severity`] this is a flat lattice, not a scale: `NotApplicable`
/// is neither better nor worse than `NonCompliant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    Compliant,
    Attention,
    NonCompliant,
    NotApplicable,
}

impl std::fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceLevel::Compliant => write!(f, "compliant"),
            ComplianceLevel::Attention => write!(f, "attention"),
            ComplianceLevel::NonCompliant => write!(f, "non_compliant"),
            ComplianceLevel::NotApplicable => write!(f, "not_applicable"),
        }
    }
}

/// A defect found in the model: missing data, geometric inconsistency,
/// connectivity gap, naming problem, and so on.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Anomaly {
    #[serde(default)]
    pub id: String,
    /// Global ID of the inspected element
    #[serde(default)]
    pub element_id: String,
    /// Raw type name of the element (e.g. "IfcWall")
    #[serde(default)]
    pub element_type: String,
    #[serde(default)]
    pub element_name: String,
    /// Check identifier (e.g. "missing_material", "duplicate_name")
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub suggested_fix: String,
    /// Check-specific extras (measured values, counts)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_data: BTreeMap<String, serde_json::Value>,
}

impl Anomaly {
    /// Build an anomaly with its deterministic ID filled in.
    pub fn new(
        category: &str,
        element_id: impl Into<String>,
        element_type: impl Into<String>,
        element_name: impl Into<String>,
    ) -> Self {
        let element_id = element_id.into();
        Self {
            id: diagnostic_id(category, &element_id),
            element_id,
            element_type: element_type.into(),
            element_name: element_name.into(),
            category: category.to_string(),
            ..Default::default()
        }
    }

    /// Re-derive the ID from a composite key, for checks that can fire more
    /// than once on the same element.
    pub fn with_id_key(mut self, key: &str) -> Self {
        self.id = diagnostic_id(&self.category, key);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn suggested_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = fix.into();
        self
    }

    pub fn with_data(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.additional_data.insert(key.to_string(), value.into());
        self
    }
}

/// Result of one regulatory accessibility check against one element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceCheckResult {
    pub id: String,
    pub element_id: String,
    pub element_type: String,
    pub element_name: String,
    /// Check identifier (e.g. "door_width", "ramp_slope")
    pub category: String,
    pub description: String,
    pub compliance: ComplianceLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_value: Option<f64>,
    pub unit: String,
    pub recommendation: String,
    pub regulation_reference: String,
}

impl ComplianceCheckResult {
    /// Build a result with its deterministic ID filled in.
    pub fn new(
        category: &str,
        element_id: impl Into<String>,
        element_type: impl Into<String>,
        element_name: impl Into<String>,
    ) -> Self {
        let element_id = element_id.into();
        Self {
            id: diagnostic_id(category, &element_id),
            element_id,
            element_type: element_type.into(),
            element_name: element_name.into(),
            category: category.to_string(),
            description: String::new(),
            compliance: ComplianceLevel::NotApplicable,
            measured_value: None,
            required_value: None,
            unit: String::new(),
            recommendation: String::new(),
            regulation_reference: String::new(),
        }
    }
}

/// Counts of anomalies per severity bucket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total: usize,
}

impl SeverityCounts {
    pub fn from_anomalies(anomalies: &[Anomaly]) -> Self {
        let mut counts = Self::default();
        for a in anomalies {
            match a.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
            counts.total += 1;
        }
        counts
    }
}

/// Counts of compliance results per classification bucket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceCounts {
    pub compliant: usize,
    pub attention: usize,
    pub non_compliant: usize,
    pub not_applicable: usize,
    pub total: usize,
}

impl ComplianceCounts {
    pub fn from_results(results: &[ComplianceCheckResult]) -> Self {
        let mut counts = Self::default();
        for r in results {
            match r.compliance {
                ComplianceLevel::Compliant => counts.compliant += 1,
                ComplianceLevel::Attention => counts.attention += 1,
                ComplianceLevel::NonCompliant => counts.non_compliant += 1,
                ComplianceLevel::NotApplicable => counts.not_applicable += 1,
            }
            counts.total += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_id_deterministic() {
        let a = diagnostic_id("door_width", "2O2Fr$t4X7Zf8NOew3FNr2");
        let b = diagnostic_id("door_width", "2O2Fr$t4X7Zf8NOew3FNr2");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn test_diagnostic_id_distinguishes_inputs() {
        assert_ne!(
            diagnostic_id("door_width", "abc"),
            diagnostic_id("stair_width", "abc")
        );
        assert_ne!(
            diagnostic_id("door_width", "abc"),
            diagnostic_id("door_width", "abd")
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_enum_string_rendering() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(
            serde_json::to_string(&ComplianceLevel::NonCompliant).unwrap(),
            "\"non_compliant\""
        );
    }

    #[test]
    fn test_severity_counts() {
        let anomalies = vec![
            Anomaly::new("a", "1", "IfcWall", "W1").severity(Severity::High),
            Anomaly::new("b", "2", "IfcWall", "W2").severity(Severity::High),
            Anomaly::new("c", "3", "IfcBeam", "B1").severity(Severity::Critical),
        ];
        let counts = SeverityCounts::from_anomalies(&anomalies);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.total, 3);
    }
}
