//! Vertical circulation accessibility checks
//!
//! These checks look at the building as a whole, so they emit a single
//! result against a synthetic building-scope element.

use crate::checks::base::Check;
use crate::config::RuleConfiguration;
use crate::graph::{ElementCategory, ModelGraph};
use crate::models::{ComplianceCheckResult, ComplianceLevel};
use anyhow::Result;

/// Element identity used for building-scope results.
const BUILDING_ID: &str = "building";
const BUILDING_TYPE: &str = "Building";
const BUILDING_NAME: &str = "Building";

fn count_elevators(model: &dyn ModelGraph, rules: &RuleConfiguration) -> usize {
    model
        .entities_of_type(ElementCategory::TransportElement)
        .into_iter()
        .filter_map(|entity| model.attributes(entity))
        .filter(|attrs| {
            attrs
                .name
                .as_deref()
                .map(|name| rules.naming.is_elevator(name))
                .unwrap_or(false)
        })
        .count()
}

/// Checks that a multi-storey building has at least one elevator.
pub struct ElevatorPresenceCheck;

impl Check<ComplianceCheckResult> for ElevatorPresenceCheck {
    fn category(&self) -> &'static str {
        "elevator_presence"
    }

    fn description(&self) -> &'static str {
        "Elevator presence for multi-storey buildings"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[ElementCategory::Storey, ElementCategory::TransportElement]
    }

    fn scan(
        &self,
        model: &dyn ModelGraph,
        rules: &RuleConfiguration,
    ) -> Result<Vec<ComplianceCheckResult>> {
        let storeys = model.count_of_type(ElementCategory::Storey);
        let elevators = count_elevators(model, rules);

        let (compliance, recommendation) = if storeys > 1 {
            if elevators > 0 {
                (
                    ComplianceLevel::Compliant,
                    "Elevator present".to_string(),
                )
            } else {
                (
                    ComplianceLevel::NonCompliant,
                    "Install an elevator for vertical accessibility".to_string(),
                )
            }
        } else {
            (
                ComplianceLevel::NotApplicable,
                "Single-storey building - no elevator required".to_string(),
            )
        };

        let mut result =
            ComplianceCheckResult::new(self.category(), BUILDING_ID, BUILDING_TYPE, BUILDING_NAME);
        result.description = format!(
            "Elevator presence check ({storeys} storey(s), {elevators} elevator(s))"
        );
        result.compliance = compliance;
        result.measured_value = Some(elevators as f64);
        result.required_value = Some(if storeys > 1 { 1.0 } else { 0.0 });
        result.unit = "count".to_string();
        result.recommendation = recommendation;
        result.regulation_reference = "Article R111-19-4 du CCH".to_string();
        Ok(vec![result])
    }
}

/// Checks that level changes are served by some vertical circulation.
///
/// Having both an elevator and a ramp is compliant; a single kind earns an
/// attention verdict; neither is non-compliant.
pub struct LevelChangeCheck;

impl Check<ComplianceCheckResult> for LevelChangeCheck {
    fn category(&self) -> &'static str {
        "level_changes"
    }

    fn description(&self) -> &'static str {
        "Vertical circulation between storeys"
    }

    fn scanned_categories(&self) -> &'static [ElementCategory] {
        &[
            ElementCategory::Storey,
            ElementCategory::TransportElement,
            ElementCategory::Ramp,
        ]
    }

    fn scan(
        &self,
        model: &dyn ModelGraph,
        rules: &RuleConfiguration,
    ) -> Result<Vec<ComplianceCheckResult>> {
        let storeys = model.count_of_type(ElementCategory::Storey);
        let elevators = count_elevators(model, rules);
        let ramps = model.count_of_type(ElementCategory::Ramp);

        let (compliance, recommendation) = if storeys > 1 {
            if elevators > 0 && ramps > 0 {
                (
                    ComplianceLevel::Compliant,
                    "Multiple vertical access types available (elevator + ramp)".to_string(),
                )
            } else if elevators > 0 || ramps > 0 {
                (
                    ComplianceLevel::Attention,
                    "Single vertical access type - consider diversifying access".to_string(),
                )
            } else {
                (
                    ComplianceLevel::NonCompliant,
                    "Provide an elevator or an access ramp".to_string(),
                )
            }
        } else {
            (
                ComplianceLevel::NotApplicable,
                "Single-storey building - no level changes".to_string(),
            )
        };

        let mut result =
            ComplianceCheckResult::new(self.category(), BUILDING_ID, BUILDING_TYPE, BUILDING_NAME);
        result.description = format!("Level access check ({storeys} storey(s))");
        result.compliance = compliance;
        result.measured_value = Some((elevators + ramps) as f64);
        result.required_value = Some(1.0);
        result.unit = "count".to_string();
        result.recommendation = recommendation;
        result.regulation_reference = "Article R111-19 du CCH".to_string();
        Ok(vec![result])
    }
}
