//! Global constants for the region editor.

/// Smallest edit step in normalized image space.
///
/// Arrow keys move/resize by one tick (a tenth of a tick with shift held), and a
/// freshly drawn region smaller than a tick in both dimensions is discarded.
pub const TICK: f64 = 0.01;

/// Multiplier applied to [`TICK`] when the fine-adjust modifier (shift) is held.
pub const FINE_TICK_FACTOR: f64 = 0.1;

/// Maximum neighbor score for a region to be considered "hit" by a pointer.
pub const NEIGHBOR_THRESHOLD: f64 = 0.005;

/// Length in surface pixels of the expand/shrink markers around the selection.
pub const MARKER_LENGTH: f64 = 8.0;

/// Thickness in surface pixels of the expand/shrink markers.
pub const MARKER_THICKNESS: f64 = 1.0;

/// Gap between consecutive `order` values on export.
pub const ORDER_UNIT: i64 = 5;

/// Default minimum margin (pixels) kept around the letterboxed image.
pub const DEFAULT_MARGIN: f64 = 16.0;

/// Label assigned to freshly drawn regions.
pub const DEFAULT_LABEL: u32 = 0;

/// Default surface size for the headless renderer.
pub const DEFAULT_SURFACE_WIDTH: u32 = 1024;

/// Default surface size for the headless renderer.
pub const DEFAULT_SURFACE_HEIGHT: u32 = 768;
