//! Base check trait and types
//!
//! This module defines the core abstractions of the check catalog:
//! - `Check` trait that all checks implement
//! - `CheckRunResult` for capturing execution results
//! - `RunSummary` aggregated over one engine run
//!
//! A check is a pure rule over the model graph. It is generic in its
//! diagnostic type because the catalog produces two shapes: anomalies
//! (severity-scaled defects) and compliance results (regulatory status).

use crate::config::RuleConfiguration;
use crate::graph::{ElementCategory, ModelGraph};
use anyhow::Result;

/// Trait for all model checks.
///
/// Implementations must be pure with respect to the graph: read-only, no
/// caching across runs, no dependence on any other check's output. The
/// engine runs them concurrently on that basis.
///
/// A check never fails for absent data — a missing measurement is either no
/// finding or an explicit indeterminate result, per check. `Err` is reserved
/// for real faults.
pub trait Check<D>: Send + Sync {
    /// Unique category identifier, also stamped on every diagnostic
    /// (e.g. "missing_material", "door_width")
    fn category(&self) -> &'static str;

    /// Human-readable description of what this check finds
    fn description(&self) -> &'static str;

    /// Entity categories this check scans; empty means building-wide
    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[]
    }

    /// Scan the model and return diagnostics
    fn scan(&self, model: &dyn ModelGraph, rules: &RuleConfiguration) -> Result<Vec<D>>;
}

/// Result from running a single check
#[derive(Debug, Clone)]
pub struct CheckRunResult<D> {
    /// Category of the check that produced these results
    pub category: String,
    /// Diagnostics produced by the check
    pub diagnostics: Vec<D>,
    /// Execution time in milliseconds
    pub duration_ms: u64,
    /// Whether the check completed successfully
    pub success: bool,
    /// Error message if the check failed
    pub error: Option<String>,
}

impl<D> CheckRunResult<D> {
    /// Create a successful result
    pub fn success(category: String, diagnostics: Vec<D>, duration_ms: u64) -> Self {
        Self {
            category,
            diagnostics,
            duration_ms,
            success: true,
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(category: String, error: String, duration_ms: u64) -> Self {
        Self {
            category,
            diagnostics: Vec::new(),
            duration_ms,
            success: false,
            error: Some(error),
        }
    }
}

/// Summary statistics from running a catalog
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Total number of checks run
    pub checks_run: usize,
    /// Number of checks that succeeded
    pub checks_succeeded: usize,
    /// Number of checks that failed
    pub checks_failed: usize,
    /// Total diagnostics across all checks
    pub total_diagnostics: usize,
    /// Total execution time in milliseconds
    pub total_duration_ms: u64,
}

impl RunSummary {
    /// Update summary with a check result
    pub fn add_result<D>(&mut self, result: &CheckRunResult<D>) {
        self.checks_run += 1;
        self.total_duration_ms += result.duration_ms;
        if result.success {
            self.checks_succeeded += 1;
            self.total_diagnostics += result.diagnostics.len();
        } else {
            self.checks_failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_run_result_success() {
        let result: CheckRunResult<()> = CheckRunResult::success("test".to_string(), vec![], 100);
        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.duration_ms, 100);
    }

    #[test]
    fn test_check_run_result_failure() {
        let result: CheckRunResult<()> =
            CheckRunResult::failure("test".to_string(), "oops".to_string(), 50);
        assert!(!result.success);
        assert_eq!(result.error, Some("oops".to_string()));
    }

    #[test]
    fn test_run_summary() {
        let mut summary = RunSummary::default();
        let ok: CheckRunResult<u8> = CheckRunResult::success("a".to_string(), vec![1, 2], 100);
        let bad: CheckRunResult<u8> = CheckRunResult::failure("b".to_string(), "err".into(), 50);
        summary.add_result(&ok);
        summary.add_result(&bad);
        assert_eq!(summary.checks_run, 2);
        assert_eq!(summary.checks_succeeded, 1);
        assert_eq!(summary.checks_failed, 1);
        assert_eq!(summary.total_diagnostics, 2);
        assert_eq!(summary.total_duration_ms, 150);
    }
}
