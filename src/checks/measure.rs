//! Shared measurement lookups over property sets

use crate::graph::{read_number, PropertySets, Reading};

/// Property keys that carry a floor area, in lookup order.
pub const AREA_KEYS: &[&str] = &["Area", "NetArea", "GrossArea", "FloorArea", "NetFloorArea"];

/// Property keys that carry a volume, in lookup order.
pub const VOLUME_KEYS: &[&str] = &["Volume", "NetVolume", "GrossVolume"];

/// Property keys that carry a width.
pub const WIDTH_KEYS: &[&str] = &["Width", "OverallWidth"];

/// Property keys that carry a clear height.
pub const HEIGHT_KEYS: &[&str] = &["Height", "CeilingHeight", "ClearHeight"];

/// Floor area of a space.
pub fn space_area(psets: &PropertySets) -> Reading<f64> {
    read_number(psets, AREA_KEYS)
}

/// Volume of a space.
pub fn space_volume(psets: &PropertySets) -> Reading<f64> {
    read_number(psets, VOLUME_KEYS)
}

/// Estimated width of a space.
///
/// Spaces rarely carry explicit plan dimensions, so this falls back to the
/// square-room approximation `sqrt(area)`. Good enough to band corridors and
/// sanitary rooms; not a substitute for real geometry.
pub fn space_width_estimate(psets: &PropertySets) -> Reading<f64> {
    match space_area(psets) {
        Reading::Found(area) if area > 0.0 => Reading::Found(area.sqrt()),
        Reading::Found(_) => Reading::NotFound,
        other => other,
    }
}

/// Estimated length of a space, same approximation as the width.
pub fn space_length_estimate(psets: &PropertySets) -> Reading<f64> {
    space_width_estimate(psets)
}

/// Estimated depth of a space, same approximation as the width.
pub fn space_depth_estimate(psets: &PropertySets) -> Reading<f64> {
    space_width_estimate(psets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{PropertySet, PropertySets};
    use serde_json::json;

    fn space_psets(area: f64) -> PropertySets {
        let mut pset = PropertySet::new();
        pset.insert("Area".to_string(), json!(area));
        let mut psets = PropertySets::new();
        psets.insert("Qto_SpaceBaseQuantities".to_string(), pset);
        psets
    }

    #[test]
    fn test_width_estimate_from_area() {
        assert_eq!(
            space_width_estimate(&space_psets(16.0)),
            Reading::Found(4.0)
        );
    }

    #[test]
    fn test_width_estimate_rejects_degenerate_area() {
        assert_eq!(space_width_estimate(&space_psets(0.0)), Reading::NotFound);
        assert_eq!(
            space_width_estimate(&PropertySets::new()),
            Reading::NotFound
        );
    }
}
