//! Wire representation of a single region.
//!
//! A region is stored as its category/label tags plus the four rectangle
//! corners, clockwise from the top-left:
//!
//! ```json
//! { "category_id": 1, "label": 3, "order": 0,
//!   "points": [{"x": 0.1, "y": 0.1}, {"x": 0.4, "y": 0.1},
//!              {"x": 0.4, "y": 0.4}, {"x": 0.1, "y": 0.4}] }
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::ORDER_UNIT;
use crate::format::FormatError;
use crate::model::{Point, Rectangle, Region, RegionId, UNASSIGNED_ID};

/// Serialized region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRegion {
    /// Remote identifier; absent for regions never persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RegionId>,
    pub category_id: i64,
    pub label: u32,
    /// Sort key, spaced by [`ORDER_UNIT`] so entries can be inserted between
    #[serde(default)]
    pub order: i64,
    pub points: Vec<Point>,
}

impl PathRegion {
    /// Serialize a region at list position `index`.
    pub fn from_region(region: &Region, index: usize) -> Self {
        let order = i64::try_from(index)
            .unwrap_or(i64::MAX)
            .saturating_mul(ORDER_UNIT);
        Self {
            id: (region.id != UNASSIGNED_ID).then_some(region.id),
            category_id: region.category_id,
            label: region.label,
            order,
            points: region.rectangle.to_points().to_vec(),
        }
    }

    /// Rebuild the region as the bounding box of its points.
    ///
    /// `order` plays no part in the geometry.
    pub fn to_region(&self) -> Result<Region, FormatError> {
        if let Some(p) = self.points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(FormatError::invalid_coordinates(format!(
                "non-finite point ({}, {})",
                p.x, p.y
            )));
        }
        let rectangle = Rectangle::bounding(&self.points)
            .ok_or_else(|| FormatError::invalid_format("region has no points"))?;

        Ok(Region::with_id(
            self.id.unwrap_or(UNASSIGNED_ID),
            self.category_id,
            self.label,
            rectangle,
        ))
    }
}

/// Serialize a region list, assigning `order = index * ORDER_UNIT`.
pub fn convert_regions_to_path_regions(regions: &[Region]) -> Vec<PathRegion> {
    regions
        .iter()
        .enumerate()
        .map(|(index, region)| PathRegion::from_region(region, index))
        .collect()
}

/// Rebuild a region list. Fails on the first malformed entry, so a caller
/// never sees a partially converted list.
pub fn convert_points_to_regions(path_regions: &[PathRegion]) -> Result<Vec<Region>, FormatError> {
    path_regions
        .iter()
        .enumerate()
        .map(|(index, path_region)| {
            path_region.to_region().map_err(|e| {
                FormatError::invalid_format(format!("region {}: {}", index, e))
            })
        })
        .collect()
}
