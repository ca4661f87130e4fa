//! Analysis orchestration
//!
//! Runs the four analysis modules (metrics, anomalies, classification,
//! accessibility) against one model snapshot and assembles one report.
//! Modules execute sequentially but independently: a failing module is
//! recorded and the run always reaches the summary. Only a model that never
//! produced a handle fails the caller (see [`crate::graph::ModelError`]).

mod classify;
mod metrics;

pub use classify::{classify_building, ClassificationIndicators, ClassificationResult};
pub use metrics::{
    collect_metrics, BuildingMetrics, OpeningMetrics, SpaceInfo, SpaceMetrics, StoreyInfo,
    StoreyMetrics, SurfaceMetrics, VolumeMetrics,
};

use crate::checks::{anomaly_catalog, pmr_catalog, CheckEngine};
use crate::config::RuleConfiguration;
use crate::graph::ModelGraph;
use crate::models::{Anomaly, ComplianceCheckResult};
use crate::scoring::{
    summarize_anomalies, summarize_compliance, AnomalySummary, ComplianceSummary,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Execution status of one analysis module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    Success,
    Error,
    Warning,
}

/// Result of one analysis module, fresh per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleResult {
    pub status: ModuleStatus,
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Overall report verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GlobalStatus {
    Excellent,
    GoodWithReservations,
    IssuesDetected,
}

/// Cross-module summary of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_modules: usize,
    pub successful_modules: usize,
    pub failed_modules: usize,
    pub warning_modules: usize,
    /// Share of modules that succeeded, 0..=100
    pub quality_score: f64,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub main_recommendations: Vec<String>,
    pub analysis_completeness: String,
}

impl ReportSummary {
    /// Minimal summary used when summarization itself fails.
    fn fallback(total_modules: usize) -> Self {
        Self {
            total_modules,
            successful_modules: 0,
            failed_modules: 0,
            warning_modules: 0,
            quality_score: 0.0,
            total_errors: 0,
            total_warnings: 0,
            main_recommendations: vec![
                "Summary generation failed - module results are reported as-is".to_string(),
            ],
            analysis_completeness: String::new(),
        }
    }
}

/// The complete output of one orchestrated run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveReport {
    pub modules: IndexMap<String, ModuleResult>,
    pub summary: ReportSummary,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub global_status: GlobalStatus,
}

/// Anomaly module payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub anomalies: Vec<Anomaly>,
    pub summary: AnomalySummary,
}

/// Accessibility module payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub checks: Vec<ComplianceCheckResult>,
    pub summary: ComplianceSummary,
}

/// What a module hands back to the orchestrator.
struct ModuleOutcome {
    data: serde_json::Value,
    /// Partial degradation worth surfacing without failing the module
    warning: Option<String>,
}

/// Orchestrates the analysis modules over one model snapshot.
pub struct AnalysisOrchestrator {
    rules: RuleConfiguration,
    workers: usize,
}

impl AnalysisOrchestrator {
    pub fn new(rules: RuleConfiguration) -> Self {
        Self { rules, workers: 0 }
    }

    /// Set the worker count for the check fan-out (0 = auto-detect).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn rules(&self) -> &RuleConfiguration {
        &self.rules
    }

    /// Run every analysis module and assemble one report.
    ///
    /// Never fails: module errors are recorded in the report and the
    /// remaining modules still run.
    pub fn run_comprehensive_analysis(&self, model: &dyn ModelGraph) -> ComprehensiveReport {
        info!("starting comprehensive analysis");
        let mut modules: IndexMap<String, ModuleResult> = IndexMap::new();
        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut anomaly_total: Option<usize> = None;
        let mut priority_issues: Option<usize> = None;

        self.run_module("metrics", &mut modules, &mut errors, &mut warnings, || {
            let metrics = collect_metrics(model, &self.rules);
            Ok(ModuleOutcome {
                data: serde_json::to_value(&metrics)?,
                warning: None,
            })
        });

        self.run_module("anomalies", &mut modules, &mut errors, &mut warnings, || {
            let mut engine: CheckEngine<Anomaly> = CheckEngine::new(self.workers);
            engine.register_all(anomaly_catalog());
            let (results, run_summary) = engine.run_detailed(model, &self.rules)?;
            let mut anomalies: Vec<Anomaly> = results
                .into_iter()
                .filter(|r| r.success)
                .flat_map(|r| r.diagnostics)
                .collect();
            anomalies.sort_by(|a, b| b.severity.cmp(&a.severity));
            let summary = summarize_anomalies(&anomalies, &self.rules.summary);
            anomaly_total = Some(anomalies.len());
            let report = AnomalyReport { anomalies, summary };
            Ok(ModuleOutcome {
                data: serde_json::to_value(&report)?,
                warning: check_failure_warning(&run_summary),
            })
        });

        self.run_module(
            "classification",
            &mut modules,
            &mut errors,
            &mut warnings,
            || {
                let metrics = collect_metrics(model, &self.rules);
                let classification = classify::classify_building(&metrics);
                Ok(ModuleOutcome {
                    data: serde_json::to_value(&classification)?,
                    warning: None,
                })
            },
        );

        self.run_module("pmr", &mut modules, &mut errors, &mut warnings, || {
            let mut engine: CheckEngine<ComplianceCheckResult> = CheckEngine::new(self.workers);
            engine.register_all(pmr_catalog());
            let (results, run_summary) = engine.run_detailed(model, &self.rules)?;
            let checks: Vec<ComplianceCheckResult> = results
                .into_iter()
                .filter(|r| r.success)
                .flat_map(|r| r.diagnostics)
                .collect();
            let summary = summarize_compliance(&checks, &self.rules.summary);
            priority_issues = Some(summary.priority_issues_count);
            let report = ComplianceReport { checks, summary };
            Ok(ModuleOutcome {
                data: serde_json::to_value(&report)?,
                warning: check_failure_warning(&run_summary),
            })
        });

        // summarization is recovered too: callers always get a full report
        let summary_attempt = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            build_summary(&modules, &errors, &warnings, anomaly_total, priority_issues)
        }));
        let summary = match summary_attempt {
            Ok(summary) => summary,
            Err(_) => {
                error!("summary generation panicked");
                errors.push("summary generation failed".to_string());
                ReportSummary::fallback(modules.len())
            }
        };

        let global_status = if summary.failed_modules > 0 {
            GlobalStatus::IssuesDetected
        } else if summary.warning_modules > 0 {
            GlobalStatus::GoodWithReservations
        } else {
            GlobalStatus::Excellent
        };

        info!(
            modules = modules.len(),
            errors = errors.len(),
            ?global_status,
            "comprehensive analysis finished"
        );

        ComprehensiveReport {
            modules,
            summary,
            errors,
            warnings,
            global_status,
        }
    }

    /// Run the anomaly catalog and summarize, severity-descending.
    pub fn run_anomaly_detection(&self, model: &dyn ModelGraph) -> Result<AnomalyReport> {
        let mut engine: CheckEngine<Anomaly> = CheckEngine::new(self.workers);
        engine.register_all(anomaly_catalog());
        let mut anomalies = engine.run(model, &self.rules)?;
        anomalies.sort_by(|a, b| b.severity.cmp(&a.severity));
        let summary = summarize_anomalies(&anomalies, &self.rules.summary);
        Ok(AnomalyReport { anomalies, summary })
    }

    /// Run the accessibility catalog and summarize.
    pub fn run_pmr_compliance(&self, model: &dyn ModelGraph) -> Result<ComplianceReport> {
        let mut engine: CheckEngine<ComplianceCheckResult> = CheckEngine::new(self.workers);
        engine.register_all(pmr_catalog());
        let checks = engine.run(model, &self.rules)?;
        let summary = summarize_compliance(&checks, &self.rules.summary);
        Ok(ComplianceReport { checks, summary })
    }

    /// Run one module with error and panic isolation.
    fn run_module(
        &self,
        name: &str,
        modules: &mut IndexMap<String, ModuleResult>,
        errors: &mut Vec<String>,
        warnings: &mut Vec<String>,
        body: impl FnOnce() -> Result<ModuleOutcome>,
    ) {
        info!(module = name, "running analysis module");
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(body));
        let result = match outcome {
            Ok(Ok(ModuleOutcome { data, warning })) => match warning {
                None => ModuleResult {
                    status: ModuleStatus::Success,
                    data,
                    error_message: None,
                    timestamp: Utc::now(),
                },
                Some(message) => {
                    warn!(module = name, "{message}");
                    warnings.push(format!("{name}: {message}"));
                    ModuleResult {
                        status: ModuleStatus::Warning,
                        data,
                        error_message: None,
                        timestamp: Utc::now(),
                    }
                }
            },
            Ok(Err(e)) => {
                error!(module = name, "module failed: {e}");
                errors.push(format!("{name}: {e}"));
                ModuleResult {
                    status: ModuleStatus::Error,
                    data: serde_json::Value::Null,
                    error_message: Some(e.to_string()),
                    timestamp: Utc::now(),
                }
            }
            Err(panic_info) => {
                let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                error!(module = name, "module panicked: {message}");
                errors.push(format!("{name}: panic: {message}"));
                ModuleResult {
                    status: ModuleStatus::Error,
                    data: serde_json::Value::Null,
                    error_message: Some(format!("Panic: {message}")),
                    timestamp: Utc::now(),
                }
            }
        };
        modules.insert(name.to_string(), result);
    }
}

/// A module whose checks partially failed still reports its diagnostics,
/// downgraded to a warning.
fn check_failure_warning(summary: &crate::checks::RunSummary) -> Option<String> {
    if summary.checks_failed > 0 {
        Some(format!(
            "{} of {} checks failed",
            summary.checks_failed, summary.checks_run
        ))
    } else {
        None
    }
}

fn build_summary(
    modules: &IndexMap<String, ModuleResult>,
    errors: &[String],
    warnings: &[String],
    anomaly_total: Option<usize>,
    priority_issues: Option<usize>,
) -> ReportSummary {
    let total_modules = modules.len();
    let successful_modules = modules
        .values()
        .filter(|m| m.status == ModuleStatus::Success)
        .count();
    let failed_modules = modules
        .values()
        .filter(|m| m.status == ModuleStatus::Error)
        .count();
    let warning_modules = modules
        .values()
        .filter(|m| m.status == ModuleStatus::Warning)
        .count();

    let quality_score = if total_modules > 0 {
        (successful_modules as f64 / total_modules as f64 * 100.0 * 10.0).round() / 10.0
    } else {
        0.0
    };

    let mut main_recommendations = Vec::new();
    if !errors.is_empty() {
        main_recommendations.push(format!("Resolve {} analysis error(s)", errors.len()));
    }
    if let Some(count) = anomaly_total {
        if count > 0 {
            main_recommendations.push(format!("Address {count} detected anomaly(ies)"));
        }
    }
    if let Some(count) = priority_issues {
        if count > 0 {
            main_recommendations.push(format!(
                "Correct {count} priority accessibility non-conformity(ies)"
            ));
        }
    }
    if main_recommendations.is_empty() {
        main_recommendations.push("The model shows good overall quality".to_string());
    }

    ReportSummary {
        total_modules,
        successful_modules,
        failed_modules,
        warning_modules,
        quality_score,
        total_errors: errors.len(),
        total_warnings: warnings.len(),
        main_recommendations,
        analysis_completeness: format!(
            "{successful_modules}/{total_modules} modules analyzed successfully"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryModel;

    #[test]
    fn test_empty_model_runs_all_modules() {
        let orchestrator = AnalysisOrchestrator::new(RuleConfiguration::default());
        let report = orchestrator.run_comprehensive_analysis(&MemoryModel::builder().build());
        assert_eq!(report.modules.len(), 4);
        assert_eq!(
            report.modules.keys().collect::<Vec<_>>(),
            vec!["metrics", "anomalies", "classification", "pmr"]
        );
        assert!(report
            .modules
            .values()
            .all(|m| m.status == ModuleStatus::Success));
        assert_eq!(report.global_status, GlobalStatus::Excellent);
        assert_eq!(report.summary.quality_score, 100.0);
    }

    #[test]
    fn test_quality_score_bounds() {
        let orchestrator = AnalysisOrchestrator::new(RuleConfiguration::default());
        let report = orchestrator.run_comprehensive_analysis(&MemoryModel::builder().build());
        assert!((0.0..=100.0).contains(&report.summary.quality_score));
    }

    #[test]
    fn test_report_serializes_to_plain_json() {
        let orchestrator = AnalysisOrchestrator::new(RuleConfiguration::default());
        let report = orchestrator.run_comprehensive_analysis(&MemoryModel::builder().build());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["global_status"], "EXCELLENT");
        assert_eq!(json["modules"]["metrics"]["status"], "success");
    }
}
