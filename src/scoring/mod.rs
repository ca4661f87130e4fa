//! Aggregation and scoring
//!
//! Post-processes the flat diagnostic lists one module produced into:
//! counts per classification bucket, a conformity score, a ranked
//! most-frequent-issue list, templated recommendations, and an optional
//! grouped view for display.
//!
//! Everything here is a pure function of its input list: summarizing or
//! grouping the same diagnostics twice yields identical output.

mod grouping;
mod summary;

pub use grouping::{group_anomalies, GroupMember, GroupedAnomalies};
pub use summary::{
    most_common, summarize_anomalies, summarize_compliance, AnomalySummary, ComplianceSummary,
    GlobalCompliance,
};
