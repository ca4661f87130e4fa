//! Model checks
//!
//! This module provides the check framework and the rule implementations
//! for finding defects and accessibility issues in the model graph.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      CheckEngine                        │
//! │  - Registers checks                                     │
//! │  - Runs checks in parallel (rayon)                      │
//! │  - Isolates failures per check (error or panic)         │
//! │  - Collects diagnostics in registration order           │
//! └─────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Check trait                        │
//! │  - category(): unique identifier                        │
//! │  - description(): human-readable description            │
//! │  - scan(model, rules): run the rule, return diagnostics │
//! └─────────────────────────────────────────────────────────┘
//!                            │
//!             ┌──────────────┴──────────────┐
//!             ▼                             ▼
//! ┌──────────────────────┐      ┌───────────────────────────┐
//! │ Anomaly checks       │      │ Compliance checks         │
//! │ (missing data,       │      │ (banded width/slope/      │
//! │  geometry, naming,   │      │  dimension decisions,     │
//! │  connectivity...)    │      │  vertical circulation)    │
//! └──────────────────────┘      └───────────────────────────┘
//! ```
//!
//! Checks never depend on each other's output and never mutate the graph,
//! which is what makes the parallel fan-out safe.

mod band;
mod base;
mod engine;
pub(crate) mod measure;

// Anomaly checks
mod classification;
mod connectivity;
mod geometry;
mod material;
mod missing_property;
mod naming;
mod space_size;
mod structural;

// Accessibility compliance checks
mod pmr_ceiling;
mod pmr_corridor;
mod pmr_door;
mod pmr_ramp;
mod pmr_stair;
mod pmr_toilet;
mod pmr_vertical;

pub use band::ToleranceBand;
pub use base::{Check, CheckRunResult, RunSummary};
pub use engine::CheckEngine;

pub use classification::UnclassifiedElementCheck;
pub use connectivity::{UnboundedSpaceCheck, UnconnectedOpeningCheck};
pub use geometry::{InvalidDimensionCheck, StoreyHeightCheck};
pub use material::{GenericMaterialNameCheck, MaterialAppropriatenessCheck};
pub use missing_property::{
    MissingAreaCheck, MissingMaterialCheck, MissingNameCheck, MissingVolumeCheck,
};
pub use naming::DuplicateNameCheck;
pub use pmr_ceiling::CeilingHeightCheck;
pub use pmr_corridor::CorridorWidthCheck;
pub use pmr_door::DoorWidthCheck;
pub use pmr_ramp::RampSlopeCheck;
pub use pmr_stair::StairWidthCheck;
pub use pmr_toilet::ToiletAccessibilityCheck;
pub use pmr_vertical::{ElevatorPresenceCheck, LevelChangeCheck};
pub use space_size::{HugeSpaceCheck, TinySpaceCheck};
pub use structural::UnsupportedBeamCheck;

use crate::graph::ElementAttributes;
use crate::models::{Anomaly, ComplianceCheckResult, ComplianceLevel};
use std::sync::Arc;

/// The full anomaly catalog, in reporting order.
pub fn anomaly_catalog() -> Vec<Arc<dyn Check<Anomaly>>> {
    vec![
        Arc::new(MissingMaterialCheck),
        Arc::new(MissingNameCheck),
        Arc::new(MissingAreaCheck),
        Arc::new(MissingVolumeCheck),
        Arc::new(InvalidDimensionCheck),
        Arc::new(StoreyHeightCheck),
        Arc::new(GenericMaterialNameCheck),
        Arc::new(MaterialAppropriatenessCheck),
        Arc::new(UnconnectedOpeningCheck),
        Arc::new(UnboundedSpaceCheck),
        Arc::new(UnsupportedBeamCheck),
        Arc::new(DuplicateNameCheck),
        Arc::new(UnclassifiedElementCheck),
        Arc::new(TinySpaceCheck),
        Arc::new(HugeSpaceCheck),
    ]
}

/// The full accessibility catalog, in reporting order.
pub fn pmr_catalog() -> Vec<Arc<dyn Check<ComplianceCheckResult>>> {
    vec![
        Arc::new(DoorWidthCheck),
        Arc::new(CorridorWidthCheck),
        Arc::new(ElevatorPresenceCheck),
        Arc::new(RampSlopeCheck),
        Arc::new(StairWidthCheck),
        Arc::new(ToiletAccessibilityCheck),
        Arc::new(CeilingHeightCheck),
        Arc::new(LevelChangeCheck),
    ]
}

/// Compliance result for an element whose measurement is unavailable.
///
/// Absent data never defaults to a value that would pass the rule; it is
/// reported as indeterminate instead.
pub(crate) fn indeterminate(
    category: &str,
    attrs: &ElementAttributes,
    what: &str,
    unit: &str,
    regulation_reference: &str,
) -> ComplianceCheckResult {
    let mut result = ComplianceCheckResult::new(
        category,
        &attrs.id,
        &attrs.type_name,
        attrs.display_name(),
    );
    result.description = format!("{what} check: measurement unavailable");
    result.compliance = ComplianceLevel::NotApplicable;
    result.unit = unit.to_string();
    result.recommendation = format!("{what} measurement unavailable - unable to evaluate");
    result.regulation_reference = regulation_reference.to_string();
    result
}
