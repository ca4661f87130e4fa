//! Rule tables for the check catalog
//!
//! Defaults follow the French accessibility regulation values the engine
//! ships with; a project can override any subset from `bimcheck.toml`:
//!
//! ```toml
//! [pmr]
//! door_width_min = 0.90
//! door_width_tolerance = 0.05
//!
//! [spaces]
//! huge_area = 2000.0
//!
//! [materials.allowed]
//! wall = ["concrete", "brick"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::graph::ElementCategory;

/// Every tunable the check catalog reads, as one explicit value object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfiguration {
    pub pmr: PmrRules,
    pub geometry: GeometryRules,
    pub spaces: SpaceRules,
    pub materials: MaterialRules,
    pub naming: NamingRules,
    pub summary: SummaryRules,
}

impl RuleConfiguration {
    /// Load overrides from a TOML file on top of the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading rule configuration {}", path.display()))?;
        let config: RuleConfiguration = toml::from_str(&content)
            .with_context(|| format!("parsing rule configuration {}", path.display()))?;
        debug!(path = %path.display(), "loaded rule configuration");
        Ok(config)
    }
}

/// Accessibility thresholds: minima, maxima, tolerances, degeneracy floors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PmrRules {
    /// Minimum door width (m)
    pub door_width_min: f64,
    pub door_width_tolerance: f64,
    /// Minimum corridor width (m)
    pub corridor_width_min: f64,
    /// Relaxed corridor minimum when the corridor is short (m)
    pub corridor_width_short: f64,
    /// Corridor length below which the relaxed minimum applies (m)
    pub corridor_short_length: f64,
    pub corridor_width_tolerance: f64,
    /// Width below which a passage cannot be adapted at all (m)
    pub passage_floor: f64,
    /// Minimum stair width (m)
    pub stair_width_min: f64,
    pub stair_width_tolerance: f64,
    /// Maximum ramp slope (%)
    pub ramp_slope_max: f64,
    /// Relaxed slope maximum for short ramps (%)
    pub ramp_slope_short: f64,
    /// Ramp length below which the relaxed maximum applies (m)
    pub ramp_short_length: f64,
    /// Slope tolerance (percentage points)
    pub ramp_slope_tolerance: f64,
    /// Minimum accessible toilet width (m)
    pub toilet_width_min: f64,
    /// Minimum accessible toilet depth (m)
    pub toilet_depth_min: f64,
    pub toilet_tolerance: f64,
    /// Dimension below which a toilet cannot be adapted (m)
    pub toilet_floor: f64,
    /// Minimum ceiling clearance (m)
    pub ceiling_height_min: f64,
}

impl Default for PmrRules {
    fn default() -> Self {
        Self {
            door_width_min: 0.80,
            door_width_tolerance: 0.10,
            corridor_width_min: 1.40,
            corridor_width_short: 1.20,
            corridor_short_length: 10.0,
            corridor_width_tolerance: 0.15,
            passage_floor: 0.80,
            stair_width_min: 1.20,
            stair_width_tolerance: 0.10,
            ramp_slope_max: 5.0,
            ramp_slope_short: 8.0,
            ramp_short_length: 2.0,
            ramp_slope_tolerance: 1.0,
            toilet_width_min: 1.50,
            toilet_depth_min: 1.50,
            toilet_tolerance: 0.10,
            toilet_floor: 1.00,
            ceiling_height_min: 2.05,
        }
    }
}

/// Geometric plausibility thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryRules {
    /// Storey-to-storey height below this is flagged (m)
    pub storey_height_min: f64,
    /// Storey-to-storey height above this is flagged (m)
    pub storey_height_max: f64,
}

impl Default for GeometryRules {
    fn default() -> Self {
        Self {
            storey_height_min: 2.0,
            storey_height_max: 6.0,
        }
    }
}

/// Space-sizing outlier thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceRules {
    /// Area below this is a suspicious sliver (m²)
    pub tiny_area: f64,
    /// Area above this probably needs subdividing (m²)
    pub huge_area: f64,
    /// Assumed ceiling height when estimating volume from area (m)
    pub default_height: f64,
}

impl Default for SpaceRules {
    fn default() -> Self {
        Self {
            tiny_area: 1.0,
            huge_area: 1000.0,
            default_height: 2.5,
        }
    }
}

/// Material naming and appropriateness tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialRules {
    /// Names that say nothing about the material
    pub generic_names: Vec<String>,
    /// Substrings accepted in a material name, per element category
    pub allowed: BTreeMap<String, Vec<String>>,
}

impl MaterialRules {
    /// Allow-list for a category, if one is configured.
    pub fn allowed_for(&self, category: ElementCategory) -> Option<&[String]> {
        let key = match category {
            ElementCategory::Wall => "wall",
            ElementCategory::Slab => "slab",
            ElementCategory::Beam => "beam",
            ElementCategory::Column => "column",
            _ => return None,
        };
        self.allowed.get(key).map(Vec::as_slice)
    }

    pub fn is_generic(&self, name: &str) -> bool {
        let trimmed = name.trim().to_lowercase();
        trimmed.is_empty() || self.generic_names.iter().any(|g| g == &trimmed)
    }
}

impl Default for MaterialRules {
    fn default() -> Self {
        let mut allowed = BTreeMap::new();
        allowed.insert(
            "wall".to_string(),
            vec!["concrete", "brick", "block", "béton", "brique"]
                .into_iter()
                .map(String::from)
                .collect(),
        );
        allowed.insert(
            "slab".to_string(),
            vec!["concrete", "steel", "béton", "acier"]
                .into_iter()
                .map(String::from)
                .collect(),
        );
        let frame: Vec<String> = vec!["concrete", "steel", "wood", "béton", "acier", "bois"]
            .into_iter()
            .map(String::from)
            .collect();
        allowed.insert("beam".to_string(), frame.clone());
        allowed.insert("column".to_string(), frame);

        Self {
            generic_names: vec!["material", "mat", "default", "unnamed", "sans nom"]
                .into_iter()
                .map(String::from)
                .collect(),
            allowed,
        }
    }
}

/// Keyword tables for recognizing spaces and circulation elements by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingRules {
    pub circulation_keywords: Vec<String>,
    pub toilet_keywords: Vec<String>,
    pub elevator_keywords: Vec<String>,
}

impl NamingRules {
    pub fn is_circulation(&self, name: &str) -> bool {
        contains_keyword(name, &self.circulation_keywords)
    }

    pub fn is_toilet(&self, name: &str) -> bool {
        contains_keyword(name, &self.toilet_keywords)
    }

    pub fn is_elevator(&self, name: &str) -> bool {
        contains_keyword(name, &self.elevator_keywords)
    }
}

fn contains_keyword(name: &str, keywords: &[String]) -> bool {
    let lower = name.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            circulation_keywords: vec![
                "couloir",
                "corridor",
                "circulation",
                "hall",
                "entrée",
                "entry",
                "passage",
                "dégagement",
                "vestibule",
                "palier",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            toilet_keywords: vec![
                "wc",
                "toilette",
                "sanitaire",
                "bathroom",
                "restroom",
                "salle de bain",
                "cabinet",
                "lavabo",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            elevator_keywords: vec!["ascenseur", "elevator", "lift"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Summary/report shaping knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryRules {
    /// Cap on generated recommendations, to keep output scannable
    pub max_recommendations: usize,
    /// How many entries the most-frequent-issue ranking keeps
    pub top_issues: usize,
}

impl Default for SummaryRules {
    fn default() -> Self {
        Self {
            max_recommendations: 8,
            top_issues: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_carry_regulation_values() {
        let rules = RuleConfiguration::default();
        assert_eq!(rules.pmr.door_width_min, 0.80);
        assert_eq!(rules.pmr.corridor_width_min, 1.40);
        assert_eq!(rules.pmr.ramp_slope_max, 5.0);
        assert_eq!(rules.summary.max_recommendations, 8);
    }

    #[test]
    fn test_partial_toml_override() {
        let config: RuleConfiguration = toml::from_str(
            r#"
            [pmr]
            door_width_min = 0.90

            [spaces]
            huge_area = 2000.0
            "#,
        )
        .unwrap();
        assert_eq!(config.pmr.door_width_min, 0.90);
        // untouched sections keep their defaults
        assert_eq!(config.pmr.corridor_width_min, 1.40);
        assert_eq!(config.spaces.huge_area, 2000.0);
        assert_eq!(config.spaces.tiny_area, 1.0);
    }

    #[test]
    fn test_material_tables() {
        let rules = MaterialRules::default();
        assert!(rules.is_generic("  Default "));
        assert!(!rules.is_generic("C30/37 concrete"));
        assert!(rules.allowed_for(ElementCategory::Wall).is_some());
        assert!(rules.allowed_for(ElementCategory::Door).is_none());
    }

    #[test]
    fn test_naming_keywords() {
        let rules = NamingRules::default();
        assert!(rules.is_circulation("Couloir RDC"));
        assert!(rules.is_toilet("WC PMR"));
        assert!(rules.is_elevator("Elevator-2"));
        assert!(!rules.is_circulation("Bureau 12"));
    }
}
