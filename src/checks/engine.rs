//! Check execution engine with parallel support
//!
//! The CheckEngine fans the registered checks out over a rayon pool and
//! collects their diagnostics. Every check is individually isolated: an
//! `Err` or a panic is recorded as a failed `CheckRunResult` and the run
//! continues. Result order is the registration order, so output is
//! deterministic regardless of scheduling.

use crate::checks::base::{Check, CheckRunResult, RunSummary};
use crate::config::RuleConfiguration;
use crate::graph::ModelGraph;
use anyhow::Result;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Maximum diagnostics to keep to prevent memory exhaustion on
/// pathological models
const MAX_DIAGNOSTICS_LIMIT: usize = 10_000;

/// Runs a catalog of checks against one model snapshot
pub struct CheckEngine<D> {
    /// Registered checks
    checks: Vec<Arc<dyn Check<D>>>,
    /// Number of worker threads for parallel execution
    workers: usize,
    /// Maximum diagnostics to return
    max_diagnostics: usize,
}

impl<D: Send + 'static> CheckEngine<D> {
    /// Create a new engine
    ///
    /// # Arguments
    /// * `workers` - Number of worker threads (0 = auto-detect)
    pub fn new(workers: usize) -> Self {
        let actual_workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(16)
        } else {
            workers
        };

        Self {
            checks: Vec::new(),
            workers: actual_workers,
            max_diagnostics: MAX_DIAGNOSTICS_LIMIT,
        }
    }

    /// Set the maximum number of diagnostics to return
    pub fn with_max_diagnostics(mut self, max: usize) -> Self {
        self.max_diagnostics = max;
        self
    }

    /// Register a check
    pub fn register(&mut self, check: Arc<dyn Check<D>>) {
        debug!("Registering check: {}", check.category());
        self.checks.push(check);
    }

    /// Register multiple checks at once
    pub fn register_all(&mut self, checks: impl IntoIterator<Item = Arc<dyn Check<D>>>) {
        for check in checks {
            self.register(check);
        }
    }

    /// Get the number of registered checks
    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    /// Get categories of all registered checks
    pub fn categories(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.category()).collect()
    }

    /// Run all checks and collect diagnostics.
    ///
    /// Failed checks are logged and skipped; the concatenated diagnostics of
    /// the successful ones come back in registration order.
    pub fn run(
        &self,
        model: &dyn ModelGraph,
        rules: &RuleConfiguration,
    ) -> Result<Vec<D>> {
        let (results, summary) = self.run_detailed(model, rules)?;

        let mut diagnostics: Vec<D> = Vec::new();
        for result in results {
            if result.success {
                diagnostics.extend(result.diagnostics);
            } else if let Some(err) = &result.error {
                warn!("Check {} failed: {}", result.category, err);
            }
        }

        if diagnostics.len() > self.max_diagnostics {
            warn!(
                "Truncating diagnostics from {} to {} (max limit)",
                diagnostics.len(),
                self.max_diagnostics
            );
            diagnostics.truncate(self.max_diagnostics);
        }

        info!(
            "Catalog complete: {} diagnostics from {}/{} checks in {}ms",
            diagnostics.len(),
            summary.checks_succeeded,
            summary.checks_run,
            summary.total_duration_ms
        );

        Ok(diagnostics)
    }

    /// Run all checks and return individual results per check,
    /// useful for debugging and detailed reporting.
    pub fn run_detailed(
        &self,
        model: &dyn ModelGraph,
        rules: &RuleConfiguration,
    ) -> Result<(Vec<CheckRunResult<D>>, RunSummary)> {
        let start = Instant::now();
        debug!(
            "Starting catalog of {} checks on {} workers",
            self.checks.len(),
            self.workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;

        let results: Vec<CheckRunResult<D>> = pool.install(|| {
            self.checks
                .par_iter()
                .map(|check| run_single_check(check, model, rules))
                .collect()
        });

        let mut summary = RunSummary::default();
        for result in &results {
            summary.add_result(result);
        }
        summary.total_duration_ms = start.elapsed().as_millis() as u64;

        Ok((results, summary))
    }
}

/// Run a single check with error handling and timing
fn run_single_check<D>(
    check: &Arc<dyn Check<D>>,
    model: &dyn ModelGraph,
    rules: &RuleConfiguration,
) -> CheckRunResult<D> {
    let category = check.category().to_string();
    let start = Instant::now();

    debug!(
        "Running check: {} over {:?}",
        category,
        check.scanned_categories()
    );

    // Wrap in catch_unwind so a panicking check cannot take down the run
    let scan_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        check.scan(model, rules)
    }));

    let duration = start.elapsed().as_millis() as u64;
    match scan_result {
        Ok(Ok(diagnostics)) => {
            debug!(
                "Check {} found {} diagnostics in {}ms",
                category,
                diagnostics.len(),
                duration
            );
            CheckRunResult::success(category, diagnostics, duration)
        }
        Ok(Err(e)) => {
            warn!("Check {} failed: {}", category, e);
            CheckRunResult::failure(category, e.to_string(), duration)
        }
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            error!("Check {} panicked: {}", category, panic_msg);
            CheckRunResult::failure(category, format!("Panic: {panic_msg}"), duration)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryModel;
    use crate::models::{Anomaly, Severity};

    // Mock check for testing
    struct MockCheck {
        category: &'static str,
        count: usize,
    }

    impl Check<Anomaly> for MockCheck {
        fn category(&self) -> &'static str {
            self.category
        }

        fn description(&self) -> &'static str {
            "Mock check for testing"
        }

        fn scan(
            &self,
            _model: &dyn ModelGraph,
            _rules: &RuleConfiguration,
        ) -> Result<Vec<Anomaly>> {
            Ok((0..self.count)
                .map(|i| {
                    Anomaly::new(self.category, format!("e{i}"), "IfcWall", "W")
                        .severity(Severity::Medium)
                })
                .collect())
        }
    }

    struct FailingCheck;

    impl Check<Anomaly> for FailingCheck {
        fn category(&self) -> &'static str {
            "failing"
        }

        fn description(&self) -> &'static str {
            "Always fails"
        }

        fn scan(
            &self,
            _model: &dyn ModelGraph,
            _rules: &RuleConfiguration,
        ) -> Result<Vec<Anomaly>> {
            anyhow::bail!("query error")
        }
    }

    struct PanickingCheck;

    impl Check<Anomaly> for PanickingCheck {
        fn category(&self) -> &'static str {
            "panicking"
        }

        fn description(&self) -> &'static str {
            "Always panics"
        }

        fn scan(
            &self,
            _model: &dyn ModelGraph,
            _rules: &RuleConfiguration,
        ) -> Result<Vec<Anomaly>> {
            panic!("boom")
        }
    }

    #[test]
    fn test_engine_default_workers() {
        let engine: CheckEngine<Anomaly> = CheckEngine::new(0);
        assert!(engine.workers > 0);
        assert!(engine.workers <= 16);
    }

    #[test]
    fn test_register_and_run() {
        let mut engine: CheckEngine<Anomaly> = CheckEngine::new(2);
        engine.register(Arc::new(MockCheck {
            category: "check_a",
            count: 2,
        }));
        engine.register(Arc::new(MockCheck {
            category: "check_b",
            count: 1,
        }));
        assert_eq!(engine.check_count(), 2);
        assert_eq!(engine.categories(), vec!["check_a", "check_b"]);

        let model = MemoryModel::builder().build();
        let rules = RuleConfiguration::default();
        let diagnostics = engine.run(&model, &rules).unwrap();
        assert_eq!(diagnostics.len(), 3);
        // registration order is preserved
        assert_eq!(diagnostics[0].category, "check_a");
        assert_eq!(diagnostics[2].category, "check_b");
    }

    #[test]
    fn test_failed_check_is_isolated() {
        let mut engine: CheckEngine<Anomaly> = CheckEngine::new(2);
        engine.register(Arc::new(FailingCheck));
        engine.register(Arc::new(MockCheck {
            category: "survivor",
            count: 1,
        }));

        let model = MemoryModel::builder().build();
        let rules = RuleConfiguration::default();
        let (results, summary) = engine.run_detailed(&model, &rules).unwrap();
        assert_eq!(summary.checks_failed, 1);
        assert_eq!(summary.checks_succeeded, 1);
        assert!(!results[0].success);
        assert!(results[1].success);
    }

    #[test]
    fn test_panicking_check_is_isolated() {
        let mut engine: CheckEngine<Anomaly> = CheckEngine::new(2);
        engine.register(Arc::new(PanickingCheck));
        engine.register(Arc::new(MockCheck {
            category: "survivor",
            count: 2,
        }));

        let model = MemoryModel::builder().build();
        let rules = RuleConfiguration::default();
        let diagnostics = engine.run(&model, &rules).unwrap();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.category == "survivor"));
    }

    #[test]
    fn test_max_diagnostics_truncation() {
        let mut engine: CheckEngine<Anomaly> =
            CheckEngine::new(1).with_max_diagnostics(3);
        engine.register(Arc::new(MockCheck {
            category: "noisy",
            count: 10,
        }));

        let model = MemoryModel::builder().build();
        let rules = RuleConfiguration::default();
        let diagnostics = engine.run(&model, &rules).unwrap();
        assert_eq!(diagnostics.len(), 3);
    }
}
