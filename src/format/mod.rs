//! Region import/export.
//!
//! Regions are exchanged as JSON: each region becomes a [`PathRegion`]
//! (category, label, order and four corner points), and an export wraps the
//! list in a [`RegionDocument`] together with the image name and, when
//! known, its perceptual hashes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use region_editor::format::RegionDocument;
//!
//! let doc = RegionDocument::new("page.png", &regions);
//! doc.write(Path::new(&RegionDocument::default_file_name("page.png")))?;
//!
//! let regions = RegionDocument::read(path)?.to_regions()?;
//! ```

mod document;
mod error;
mod path_region;

pub use document::{ImageIds, RegionDocument};
pub use error::FormatError;
pub use path_region::{PathRegion, convert_points_to_regions, convert_regions_to_path_regions};
