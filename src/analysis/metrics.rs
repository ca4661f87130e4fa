//! Building metrics extraction
//!
//! Pure reads over the model graph: inventories, storey layout, space
//! areas and volumes, opening counts, summed surfaces. The classification
//! module consumes these numbers, and callers get them verbatim in the
//! metrics module payload.

use crate::checks::measure::{AREA_KEYS, VOLUME_KEYS};
use crate::config::RuleConfiguration;
use crate::graph::{read_number, ElementCategory, ModelGraph, PropertySets, Reading};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Categories included in the element inventory.
const INVENTORY: &[ElementCategory] = &[
    ElementCategory::Wall,
    ElementCategory::Slab,
    ElementCategory::Beam,
    ElementCategory::Column,
    ElementCategory::Door,
    ElementCategory::Window,
    ElementCategory::Space,
    ElementCategory::Storey,
    ElementCategory::Stair,
    ElementCategory::Ramp,
    ElementCategory::Roof,
    ElementCategory::TransportElement,
    ElementCategory::Railing,
    ElementCategory::Material,
];

/// Complete metrics payload for one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingMetrics {
    pub element_counts: IndexMap<String, usize>,
    pub storeys: StoreyMetrics,
    pub spaces: SpaceMetrics,
    pub openings: OpeningMetrics,
    pub surfaces: SurfaceMetrics,
    pub volumes: VolumeMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreyInfo {
    pub name: String,
    pub elevation: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreyMetrics {
    pub total_storeys: usize,
    /// Storeys sorted by elevation, unknown elevations last
    pub storey_details: Vec<StoreyInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceInfo {
    pub name: String,
    pub space_type: String,
    pub area: Option<f64>,
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceMetrics {
    pub total_spaces: usize,
    pub total_area: f64,
    pub total_volume: f64,
    pub space_types: IndexMap<String, usize>,
    pub space_details: Vec<SpaceInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningMetrics {
    pub total_doors: usize,
    pub total_windows: usize,
    /// Window area over wall area, when both are known
    pub window_wall_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SurfaceMetrics {
    pub total_floor_area: f64,
    pub total_wall_area: f64,
    pub total_roof_area: f64,
    pub total_window_area: f64,
    pub total_door_area: f64,
    /// Floor area, or summed space areas when no slabs carry quantities
    pub total_building_area: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VolumeMetrics {
    pub total_space_volume: f64,
    pub structural_volume: f64,
    pub total_building_volume: f64,
}

/// Collect all metrics for one model.
pub fn collect_metrics(model: &dyn ModelGraph, rules: &RuleConfiguration) -> BuildingMetrics {
    let element_counts = INVENTORY
        .iter()
        .map(|category| (category.type_name().to_string(), model.count_of_type(*category)))
        .collect();

    let storeys = collect_storeys(model);
    let spaces = collect_spaces(model, rules);
    let surfaces = collect_surfaces(model, &spaces);
    let volumes = collect_volumes(model, &spaces);

    let total_doors = model.count_of_type(ElementCategory::Door);
    let total_windows = model.count_of_type(ElementCategory::Window);
    let window_wall_ratio = if surfaces.total_wall_area > 0.0 {
        Some(surfaces.total_window_area / surfaces.total_wall_area)
    } else {
        None
    };

    debug!(
        storeys = storeys.total_storeys,
        spaces = spaces.total_spaces,
        doors = total_doors,
        "metrics collected"
    );

    BuildingMetrics {
        element_counts,
        storeys,
        spaces,
        openings: OpeningMetrics {
            total_doors,
            total_windows,
            window_wall_ratio,
        },
        surfaces,
        volumes,
    }
}

fn collect_storeys(model: &dyn ModelGraph) -> StoreyMetrics {
    let mut storey_details: Vec<StoreyInfo> = model
        .entities_of_type(ElementCategory::Storey)
        .into_iter()
        .filter_map(|entity| {
            let attrs = model.attributes(entity)?;
            let elevation = read_number(&model.property_sets(entity), &["Elevation"]).found();
            Some(StoreyInfo {
                name: attrs.display_name().to_string(),
                elevation,
            })
        })
        .collect();
    storey_details.sort_by(|a, b| {
        a.elevation
            .unwrap_or(f64::MAX)
            .total_cmp(&b.elevation.unwrap_or(f64::MAX))
    });
    StoreyMetrics {
        total_storeys: storey_details.len(),
        storey_details,
    }
}

fn collect_spaces(model: &dyn ModelGraph, rules: &RuleConfiguration) -> SpaceMetrics {
    let mut space_types: IndexMap<String, usize> = IndexMap::new();
    let mut space_details = Vec::new();
    let mut total_area = 0.0;
    let mut total_volume = 0.0;

    for entity in model.entities_of_type(ElementCategory::Space) {
        let Some(attrs) = model.attributes(entity) else {
            continue;
        };
        let psets = model.property_sets(entity);
        let area = read_number(&psets, AREA_KEYS).found();
        // estimate a missing volume from the area and a nominal height
        let volume = read_number(&psets, VOLUME_KEYS)
            .found()
            .or_else(|| area.map(|a| a * rules.spaces.default_height));
        let space_type = attrs
            .object_type
            .clone()
            .unwrap_or_else(|| "undefined".to_string());

        total_area += area.unwrap_or(0.0);
        total_volume += volume.unwrap_or(0.0);
        *space_types.entry(space_type.clone()).or_insert(0) += 1;
        space_details.push(SpaceInfo {
            name: attrs.display_name().to_string(),
            space_type,
            area,
            volume,
        });
    }

    SpaceMetrics {
        total_spaces: space_details.len(),
        total_area,
        total_volume,
        space_types,
        space_details,
    }
}

fn element_area(psets: &PropertySets) -> Option<f64> {
    if let Reading::Found(area) = read_number(psets, AREA_KEYS) {
        return Some(area);
    }
    // openings often carry dimensions instead of quantities
    let width = read_number(psets, &["Width", "OverallWidth"]).found()?;
    let height = read_number(psets, &["Height", "OverallHeight"]).found()?;
    Some(width * height)
}

fn summed_area(model: &dyn ModelGraph, category: ElementCategory) -> f64 {
    model
        .entities_of_type(category)
        .into_iter()
        .filter_map(|entity| element_area(&model.property_sets(entity)))
        .sum()
}

fn collect_surfaces(model: &dyn ModelGraph, spaces: &SpaceMetrics) -> SurfaceMetrics {
    let total_floor_area = summed_area(model, ElementCategory::Slab);
    let mut surfaces = SurfaceMetrics {
        total_floor_area,
        total_wall_area: summed_area(model, ElementCategory::Wall),
        total_roof_area: summed_area(model, ElementCategory::Roof),
        total_window_area: summed_area(model, ElementCategory::Window),
        total_door_area: summed_area(model, ElementCategory::Door),
        total_building_area: total_floor_area,
    };
    if surfaces.total_building_area == 0.0 {
        surfaces.total_building_area = spaces.total_area;
    }
    surfaces
}

fn collect_volumes(model: &dyn ModelGraph, spaces: &SpaceMetrics) -> VolumeMetrics {
    let structural_volume: f64 = ElementCategory::STRUCTURAL
        .iter()
        .flat_map(|category| model.entities_of_type(*category))
        .filter_map(|entity| read_number(&model.property_sets(entity), VOLUME_KEYS).found())
        .sum();
    VolumeMetrics {
        total_space_volume: spaces.total_volume,
        structural_volume,
        total_building_volume: spaces.total_volume + structural_volume,
    }
}
