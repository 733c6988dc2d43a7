//! Labeled rectangular region of interest.

use super::Rectangle;

/// Server-side identifier of a region, `-1` while unassigned.
pub type RegionId = i64;

/// Identifier value for regions that have never been persisted remotely.
pub const UNASSIGNED_ID: RegionId = -1;

/// Stable in-session identity of a region.
///
/// Assigned by the controller, survives copy-on-write replacement and undo,
/// and is never serialized. Selection and focus are tracked by handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RegionHandle(pub(crate) u64);

impl RegionHandle {
    /// Handle of a region not yet adopted by a controller.
    pub const UNSET: RegionHandle = RegionHandle(0);

    pub fn is_set(&self) -> bool {
        *self != Self::UNSET
    }

    /// Raw numeric value, for logging.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// A labeled rectangle with identity and category/label tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// In-session identity (see [`RegionHandle`]).
    pub handle: RegionHandle,
    /// Remote identifier, [`UNASSIGNED_ID`] until persisted.
    pub id: RegionId,
    /// Category this region belongs to.
    pub category_id: i64,
    /// Label code within the category.
    pub label: u32,
    /// Geometry in normalized image space.
    pub rectangle: Rectangle,
}

impl Region {
    /// Create an unpersisted region.
    pub fn new(category_id: i64, label: u32, rectangle: Rectangle) -> Self {
        Self::with_id(UNASSIGNED_ID, category_id, label, rectangle)
    }

    pub fn with_id(id: RegionId, category_id: i64, label: u32, rectangle: Rectangle) -> Self {
        Self {
            handle: RegionHandle::UNSET,
            id,
            category_id,
            label,
            rectangle,
        }
    }

    /// Inclusive bounds test in normalized space.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let r = &self.rectangle;
        x >= r.left() && x <= r.right() && y >= r.top() && y <= r.bottom()
    }

    /// Smallest distance from `(x, y)` to any of the four edge lines.
    ///
    /// Measured against the infinite line through each edge, not the edge
    /// segment. Only meaningful for ranking regions that contain the point.
    pub fn neighbor_score(&self, x: f64, y: f64) -> f64 {
        let r = &self.rectangle;
        let l = (r.left() - x).abs();
        let rt = (r.right() - x).abs();
        let t = (r.top() - y).abs();
        let b = (r.bottom() - y).abs();
        l.min(t).min(rt).min(b)
    }

    /// Copy with a different label.
    pub fn with_label(&self, label: u32) -> Self {
        Self {
            label,
            ..self.clone()
        }
    }

    /// Copy with different geometry.
    pub fn with_rectangle(&self, rectangle: Rectangle) -> Self {
        Self {
            rectangle,
            ..self.clone()
        }
    }
}
