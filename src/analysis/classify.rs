//! Rule-based building-type classification
//!
//! Scores the collected metrics against a small knowledge base of building
//! archetypes: range patterns on storey count, footprint and spatial density
//! plus name keywords, with the best-scoring type winning.

use crate::analysis::metrics::BuildingMetrics;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive range pattern.
type Range = (f64, f64);

/// One building archetype in the knowledge base.
#[derive(Debug, Clone)]
struct Archetype {
    name: &'static str,
    storeys: Range,
    area_per_storey: Range,
    spaces_per_storey: Range,
    window_wall_ratio: Range,
    space_keywords: &'static [&'static str],
    confidence_boost: f64,
}

const ARCHETYPES: &[Archetype] = &[
    Archetype {
        name: "residential",
        storeys: (1.0, 25.0),
        area_per_storey: (50.0, 2000.0),
        spaces_per_storey: (1.0, 20.0),
        window_wall_ratio: (0.15, 0.40),
        space_keywords: &["bedroom", "living", "kitchen", "bathroom", "chambre", "séjour"],
        confidence_boost: 0.20,
    },
    Archetype {
        name: "office",
        storeys: (1.0, 50.0),
        area_per_storey: (200.0, 5000.0),
        spaces_per_storey: (5.0, 100.0),
        window_wall_ratio: (0.30, 0.70),
        space_keywords: &["office", "meeting", "conference", "reception", "bureau"],
        confidence_boost: 0.15,
    },
    Archetype {
        name: "commercial",
        storeys: (1.0, 10.0),
        area_per_storey: (100.0, 10000.0),
        spaces_per_storey: (2.0, 50.0),
        window_wall_ratio: (0.20, 0.60),
        space_keywords: &["retail", "shop", "store", "mall", "commerce"],
        confidence_boost: 0.18,
    },
    Archetype {
        name: "industrial",
        storeys: (1.0, 5.0),
        area_per_storey: (500.0, 50000.0),
        spaces_per_storey: (1.0, 20.0),
        window_wall_ratio: (0.02, 0.20),
        space_keywords: &["warehouse", "production", "storage", "atelier", "stockage"],
        confidence_boost: 0.12,
    },
    Archetype {
        name: "educational",
        storeys: (1.0, 8.0),
        area_per_storey: (300.0, 8000.0),
        spaces_per_storey: (5.0, 60.0),
        window_wall_ratio: (0.20, 0.50),
        space_keywords: &["classroom", "laboratory", "library", "salle de classe"],
        confidence_boost: 0.15,
    },
];

/// Classification outcome with per-type scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub building_type: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub scores: IndexMap<String, f64>,
    pub indicators: ClassificationIndicators,
}

/// The metrics the verdict was based on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationIndicators {
    pub total_area: f64,
    pub storeys: usize,
    pub area_per_storey: f64,
    pub spaces_per_storey: f64,
    pub window_wall_ratio: Option<f64>,
    /// Spaces per 1000 m²
    pub space_density: f64,
}

/// Classify a building from its metrics.
pub fn classify_building(metrics: &BuildingMetrics) -> ClassificationResult {
    let indicators = extract_indicators(metrics);

    let mut scores: IndexMap<String, f64> = IndexMap::new();
    for archetype in ARCHETYPES {
        scores.insert(
            archetype.name.to_string(),
            score_archetype(archetype, metrics, &indicators),
        );
    }

    let (best_type, best_score) = scores
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(name, score)| (name.clone(), *score))
        .unwrap_or_else(|| ("unclassified".to_string(), 0.0));

    let confidence = (best_score + density_boost(&best_type, &indicators)).min(0.95);

    debug!(building_type = %best_type, confidence, "building classified");

    ClassificationResult {
        building_type: best_type,
        confidence,
        scores,
        indicators,
    }
}

fn extract_indicators(metrics: &BuildingMetrics) -> ClassificationIndicators {
    let total_area = metrics.surfaces.total_building_area;
    let storeys = metrics.storeys.total_storeys.max(1);
    let total_spaces = metrics.spaces.total_spaces;
    ClassificationIndicators {
        total_area,
        storeys: metrics.storeys.total_storeys,
        area_per_storey: total_area / storeys as f64,
        spaces_per_storey: total_spaces as f64 / storeys as f64,
        window_wall_ratio: metrics.openings.window_wall_ratio,
        space_density: total_spaces as f64 / (total_area / 1000.0).max(1.0),
    }
}

fn in_range(value: f64, (min, max): Range) -> bool {
    value >= min && value <= max
}

/// Weighted multi-criteria score, normalized to the weights that could
/// apply, then boosted per archetype and clamped.
fn score_archetype(
    archetype: &Archetype,
    metrics: &BuildingMetrics,
    indicators: &ClassificationIndicators,
) -> f64 {
    let mut score = 0.0;
    let mut max_score = 0.0;

    max_score += 0.25;
    if in_range(indicators.storeys.max(1) as f64, archetype.storeys) {
        score += 0.25;
    }

    max_score += 0.20;
    if in_range(indicators.area_per_storey, archetype.area_per_storey) {
        score += 0.20;
    }

    max_score += 0.20;
    if in_range(indicators.spaces_per_storey, archetype.spaces_per_storey) {
        score += 0.20;
    }

    if let Some(ratio) = indicators.window_wall_ratio {
        max_score += 0.15;
        if in_range(ratio, archetype.window_wall_ratio) {
            score += 0.15;
        }
    }

    if !metrics.spaces.space_details.is_empty() {
        max_score += 0.20;
        let matches = metrics
            .spaces
            .space_details
            .iter()
            .filter(|space| {
                let haystack =
                    format!("{} {}", space.name, space.space_type).to_lowercase();
                archetype
                    .space_keywords
                    .iter()
                    .any(|keyword| haystack.contains(keyword))
            })
            .count();
        if matches > 0 {
            score += 0.20 * matches as f64 / metrics.spaces.space_details.len() as f64;
        }
    }

    let normalized = if max_score > 0.0 { score / max_score } else { 0.0 };
    (normalized + archetype.confidence_boost).min(0.95)
}

/// Spatial-density signal on top of the archetype score.
fn density_boost(building_type: &str, indicators: &ClassificationIndicators) -> f64 {
    let mut boost: f64 = 0.0;
    if indicators.storeys >= 10 && building_type == "office" {
        boost += 0.10;
    }
    if indicators.space_density < 5.0 && matches!(building_type, "industrial" | "commercial") {
        boost += 0.10;
    }
    if indicators.space_density > 50.0 && matches!(building_type, "office" | "residential") {
        boost += 0.10;
    }
    boost.min(0.20)
}
