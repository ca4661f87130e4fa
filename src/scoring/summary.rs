//! Summaries, issue ranking, and recommendation templates

use crate::config::SummaryRules;
use crate::models::{
    Anomaly, ComplianceCheckResult, ComplianceCounts, ComplianceLevel, Severity, SeverityCounts,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Overall verdict over one compliance run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GlobalCompliance {
    Compliant,
    CompliantWithReservations,
    NonCompliant,
}

/// Aggregated view over one anomaly run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalySummary {
    pub total_anomalies: usize,
    pub by_severity: SeverityCounts,
    pub by_category: IndexMap<String, usize>,
    /// Most frequent high-severity issues, descending, top N
    pub most_common_issues: Vec<(String, usize)>,
    pub recommendations: Vec<String>,
}

/// Aggregated view over one compliance run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub total_checks: usize,
    pub counts: ComplianceCounts,
    /// Share of compliant checks, 0..=100
    pub conformity_score: f64,
    pub global_compliance: GlobalCompliance,
    pub priority_issues_count: usize,
    /// Most frequent non-compliant issues, descending, top N
    pub most_common_issues: Vec<(String, usize)>,
    pub recommendations: Vec<String>,
}

/// Count categories and rank them descending.
///
/// Ties keep first-encounter order: the count map preserves insertion order
/// and the sort is stable.
pub fn most_common<'a>(
    categories: impl Iterator<Item = &'a str>,
    top: usize,
) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for category in categories {
        *counts.entry(category.to_string()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top);
    ranked
}

/// Summarize one module's anomalies.
pub fn summarize_anomalies(anomalies: &[Anomaly], rules: &SummaryRules) -> AnomalySummary {
    let by_severity = SeverityCounts::from_anomalies(anomalies);

    let mut by_category: IndexMap<String, usize> = IndexMap::new();
    for anomaly in anomalies {
        *by_category.entry(anomaly.category.clone()).or_insert(0) += 1;
    }

    // frequency ranking only considers the serious findings
    let most_common_issues = most_common(
        anomalies
            .iter()
            .filter(|a| a.severity >= Severity::High)
            .map(|a| a.category.as_str()),
        rules.top_issues,
    );

    let mut recommendations: Vec<String> = by_category
        .iter()
        .map(|(category, count)| anomaly_recommendation(category, *count))
        .take(rules.max_recommendations)
        .collect();
    if recommendations.is_empty() {
        recommendations.push("No significant anomalies detected".to_string());
    }

    AnomalySummary {
        total_anomalies: anomalies.len(),
        by_severity,
        by_category,
        most_common_issues,
        recommendations,
    }
}

/// Summarize one module's compliance results.
pub fn summarize_compliance(
    results: &[ComplianceCheckResult],
    rules: &SummaryRules,
) -> ComplianceSummary {
    let counts = ComplianceCounts::from_results(results);
    let conformity_score = if counts.total > 0 {
        (counts.compliant as f64 / counts.total as f64 * 100.0 * 10.0).round() / 10.0
    } else {
        0.0
    };

    let global_compliance = if counts.non_compliant == 0 {
        if counts.attention == 0 {
            GlobalCompliance::Compliant
        } else {
            GlobalCompliance::CompliantWithReservations
        }
    } else {
        GlobalCompliance::NonCompliant
    };

    let non_compliant: Vec<&ComplianceCheckResult> = results
        .iter()
        .filter(|r| r.compliance == ComplianceLevel::NonCompliant)
        .collect();

    let most_common_issues = most_common(
        non_compliant.iter().map(|r| r.category.as_str()),
        rules.top_issues,
    );

    let mut recommendations = Vec::new();
    if non_compliant.is_empty() {
        recommendations.push("The building meets the main accessibility requirements".to_string());
    } else {
        recommendations.push(format!(
            "Correct {} non-compliant accessibility check(s)",
            non_compliant.len()
        ));
        for (category, count) in most_common(
            non_compliant.iter().map(|r| r.category.as_str()),
            usize::MAX,
        ) {
            recommendations.push(compliance_recommendation(&category, count));
        }
        recommendations.truncate(rules.max_recommendations);
    }

    ComplianceSummary {
        total_checks: results.len(),
        counts,
        conformity_score,
        global_compliance,
        priority_issues_count: non_compliant.len(),
        most_common_issues,
        recommendations,
    }
}

fn anomaly_recommendation(category: &str, count: usize) -> String {
    match category {
        "missing_material" => format!("Assign materials to {count} element(s)"),
        "missing_name" => format!("Name {count} unnamed element(s)"),
        "missing_area" => format!("Assign areas to {count} space(s)"),
        "missing_volume" => format!("Assign volumes to {count} space(s)"),
        "invalid_dimension" => format!("Correct {count} invalid dimension(s)"),
        "unusual_storey_height" => format!("Review storey elevations ({count} finding(s))"),
        "generic_material_name" => format!("Rename {count} generic material(s)"),
        "inappropriate_material" => format!("Verify the material of {count} element(s)"),
        "unconnected_opening" => format!("Attach {count} opening(s) to their host walls"),
        "unbounded_space" => format!("Define boundaries for {count} space(s)"),
        "unsupported_beam" => format!("Review structural support for {count} beam(s)"),
        "duplicate_name" => format!("Rename {count} element(s) with duplicated names"),
        "unclassified_element" => format!("Classify {count} element(s)"),
        "tiny_space" | "huge_space" => format!("Review the area of {count} space(s)"),
        other => format!("Address {count} {other} finding(s)"),
    }
}

fn compliance_recommendation(category: &str, count: usize) -> String {
    match category {
        "door_width" => format!("Widen {count} door(s) to the accessible minimum"),
        "corridor_width" => format!("Widen {count} circulation route(s)"),
        "stair_width" => format!("Widen {count} stair(s)"),
        "ramp_slope" => format!("Reduce the slope of {count} ramp(s)"),
        "toilet_accessibility" => format!("Enlarge {count} sanitary room(s)"),
        "elevator_presence" => "Install an elevator for vertical accessibility".to_string(),
        "level_changes" => "Provide an elevator or an access ramp".to_string(),
        other => format!("Correct {count} {other} issue(s)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn anomaly(category: &str, id: &str, severity: Severity) -> Anomaly {
        Anomaly::new(category, id, "IfcWall", "W").severity(severity)
    }

    fn check(category: &str, id: &str, level: ComplianceLevel) -> ComplianceCheckResult {
        let mut result = ComplianceCheckResult::new(category, id, "IfcDoor", "D");
        result.compliance = level;
        result
    }

    #[test]
    fn test_most_common_orders_descending() {
        let anomalies: Vec<Anomaly> = (0..5)
            .map(|i| anomaly("a", &format!("a{i}"), Severity::High))
            .chain((0..3).map(|i| anomaly("b", &format!("b{i}"), Severity::High)))
            .collect();
        let summary = summarize_anomalies(&anomalies, &SummaryRules::default());
        assert_eq!(
            summary.most_common_issues,
            vec![("a".to_string(), 5), ("b".to_string(), 3)]
        );
    }

    #[test]
    fn test_most_common_tie_keeps_first_encountered() {
        let ranked = most_common(["x", "y", "y", "x", "z"].into_iter(), 5);
        assert_eq!(
            ranked,
            vec![
                ("x".to_string(), 2),
                ("y".to_string(), 2),
                ("z".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_low_severity_does_not_rank() {
        let anomalies = vec![
            anomaly("quiet", "1", Severity::Low),
            anomaly("loud", "2", Severity::Critical),
        ];
        let summary = summarize_anomalies(&anomalies, &SummaryRules::default());
        assert_eq!(summary.most_common_issues, vec![("loud".to_string(), 1)]);
        // but category counts still cover everything
        assert_eq!(summary.by_category.len(), 2);
    }

    #[test]
    fn test_conformity_score_bounds() {
        let rules = SummaryRules::default();
        let empty = summarize_compliance(&[], &rules);
        assert_eq!(empty.conformity_score, 0.0);

        let all_pass = vec![
            check("door_width", "1", ComplianceLevel::Compliant),
            check("door_width", "2", ComplianceLevel::Compliant),
        ];
        let summary = summarize_compliance(&all_pass, &rules);
        assert_eq!(summary.conformity_score, 100.0);
        assert_eq!(summary.global_compliance, GlobalCompliance::Compliant);
    }

    #[test]
    fn test_global_compliance_lattice() {
        let rules = SummaryRules::default();
        let with_attention = vec![
            check("door_width", "1", ComplianceLevel::Compliant),
            check("door_width", "2", ComplianceLevel::Attention),
        ];
        assert_eq!(
            summarize_compliance(&with_attention, &rules).global_compliance,
            GlobalCompliance::CompliantWithReservations
        );

        let with_failure = vec![
            check("door_width", "1", ComplianceLevel::Attention),
            check("door_width", "2", ComplianceLevel::NonCompliant),
        ];
        let summary = summarize_compliance(&with_failure, &rules);
        assert_eq!(summary.global_compliance, GlobalCompliance::NonCompliant);
        assert_eq!(summary.priority_issues_count, 1);
        assert!(summary.recommendations[0].contains('1'));
    }

    #[test]
    fn test_recommendations_are_capped() {
        let rules = SummaryRules {
            max_recommendations: 3,
            top_issues: 5,
        };
        let results: Vec<ComplianceCheckResult> = [
            "door_width",
            "corridor_width",
            "stair_width",
            "ramp_slope",
            "toilet_accessibility",
        ]
        .iter()
        .enumerate()
        .map(|(i, cat)| check(cat, &format!("e{i}"), ComplianceLevel::NonCompliant))
        .collect();
        let summary = summarize_compliance(&results, &rules);
        assert_eq!(summary.recommendations.len(), 3);
    }

    #[test]
    fn test_not_applicable_does_not_hurt_compliance() {
        let rules = SummaryRules::default();
        let results = vec![
            check("door_width", "1", ComplianceLevel::Compliant),
            check("elevator_presence", "building", ComplianceLevel::NotApplicable),
        ];
        let summary = summarize_compliance(&results, &rules);
        assert_eq!(summary.global_compliance, GlobalCompliance::Compliant);
        assert_eq!(summary.conformity_score, 50.0);
    }
}
