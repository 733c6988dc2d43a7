//! Data models for the region editor.

mod category;
mod rectangle;
mod region;

pub use category::{Category, Label, label_name};
pub use rectangle::{Point, Rectangle};
pub use region::{Region, RegionHandle, RegionId, UNASSIGNED_ID};
