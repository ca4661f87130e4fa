//! Rule configuration support
//!
//! All thresholds, tolerances, allow-lists and keyword tables live in one
//! injectable [`RuleConfiguration`] value, loadable from a TOML file. Checks
//! receive it at run time; nothing regulatory is baked into check logic.

mod rules;

pub use rules::{
    GeometryRules, MaterialRules, NamingRules, PmrRules, RuleConfiguration, SpaceRules,
    SummaryRules,
};
