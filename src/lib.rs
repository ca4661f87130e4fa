//! bimcheck - rule-based diagnostics and compliance scoring for BIM models
//!
//! A fast, local-first analysis engine that inspects a parsed building-model
//! graph and emits structured findings: missing or invalid properties,
//! geometric inconsistencies, material mismatches, connectivity gaps, naming
//! issues, structural-support gaps, space-sizing outliers, and accessibility
//! non-conformities.
//!
//! The engine consumes any [`graph::ModelGraph`] implementation; the actual
//! model parser lives outside this crate. One orchestrated run produces one
//! [`analysis::ComprehensiveReport`], fully serializable to JSON.
//!
//! ```
//! use bimcheck::config::RuleConfiguration;
//! use bimcheck::graph::MemoryModel;
//!
//! let mut builder = MemoryModel::builder();
//! let door = builder.add("IfcDoor", Some("Entrance"));
//! builder.set_property(door, "Pset_DoorCommon", "Width", 0.75);
//! let model = builder.build();
//!
//! let report = bimcheck::run_comprehensive_analysis(&model, &RuleConfiguration::default());
//! assert_eq!(report.modules.len(), 4);
//! ```

pub mod analysis;
pub mod checks;
pub mod config;
pub mod graph;
pub mod models;
pub mod scoring;

pub use analysis::{AnalysisOrchestrator, AnomalyReport, ComplianceReport, ComprehensiveReport};
pub use config::RuleConfiguration;
pub use graph::{ModelError, ModelGraph};
pub use models::{Anomaly, ComplianceCheckResult, ComplianceLevel, Severity};
pub use scoring::group_anomalies;

use anyhow::Result;

/// Run every analysis module against one model and assemble one report.
///
/// Module failures are isolated and recorded inside the report; this call
/// itself never fails.
pub fn run_comprehensive_analysis(
    model: &dyn ModelGraph,
    rules: &RuleConfiguration,
) -> ComprehensiveReport {
    AnalysisOrchestrator::new(rules.clone()).run_comprehensive_analysis(model)
}

/// Run only the anomaly catalog, severity-descending, with its summary.
pub fn run_anomaly_detection(
    model: &dyn ModelGraph,
    rules: &RuleConfiguration,
) -> Result<AnomalyReport> {
    AnalysisOrchestrator::new(rules.clone()).run_anomaly_detection(model)
}

/// Run only the accessibility catalog with its summary.
pub fn run_pmr_compliance(
    model: &dyn ModelGraph,
    rules: &RuleConfiguration,
) -> Result<ComplianceReport> {
    AnalysisOrchestrator::new(rules.clone()).run_pmr_compliance(model)
}
