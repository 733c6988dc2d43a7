//! Export document: the regions of one image plus its identifiers.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::FormatError;
use crate::format::path_region::{
    PathRegion, convert_points_to_regions, convert_regions_to_path_regions,
};
use crate::model::Region;

/// Perceptual hashes identifying the source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageIds {
    pub dhash8: String,
    pub dhash12: String,
    pub dhash16: String,
}

/// A region file as written by export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDocument {
    /// Name of the image the regions belong to
    pub file: String,
    pub regions: Vec<PathRegion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ids: Option<ImageIds>,
}

impl RegionDocument {
    pub fn new(file: impl Into<String>, regions: &[Region]) -> Self {
        Self {
            file: file.into(),
            regions: convert_regions_to_path_regions(regions),
            image_ids: None,
        }
    }

    pub fn with_image_ids(mut self, image_ids: ImageIds) -> Self {
        self.image_ids = Some(image_ids);
        self
    }

    /// File name an export of `image_name` is saved under.
    pub fn default_file_name(image_name: &str) -> String {
        format!("{}.json", image_name)
    }

    /// Parse an export document, or a bare array of regions.
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Array(items) => Ok(Self {
                file: String::new(),
                regions: serde_json::from_value(Value::Array(items))?,
                image_ids: None,
            }),
            Value::Object(mut map) => {
                if !map.contains_key("regions") {
                    return Err(FormatError::missing_field("regions"));
                }
                map.entry("file")
                    .or_insert_with(|| Value::String(String::new()));
                Ok(serde_json::from_value(Value::Object(map))?)
            }
            other => Err(FormatError::invalid_format(format!(
                "expected an object or array, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rebuild the region list. All-or-nothing.
    pub fn to_regions(&self) -> Result<Vec<Region>, FormatError> {
        convert_points_to_regions(&self.regions)
    }

    pub fn read(path: &Path) -> Result<Self, FormatError> {
        log::info!("Importing regions from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        let document = Self::from_json(&json)?;
        log::info!("Read {} regions", document.regions.len());
        Ok(document)
    }

    pub fn write(&self, path: &Path) -> Result<(), FormatError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Exported {} regions to {:?}", self.regions.len(), path);
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rectangle;

    fn sample() -> Vec<Region> {
        vec![
            Region::new(1, 2, Rectangle::new(0.1, 0.1, 0.4, 0.4)),
            Region::new(1, 3, Rectangle::new(0.5, 0.5, 0.9, 0.7)),
        ]
    }

    #[test]
    fn test_document_shape() {
        let doc = RegionDocument::new("page.png", &sample()).with_image_ids(ImageIds {
            dhash8: "a".into(),
            dhash12: "b".into(),
            dhash16: "c".into(),
        });
        let value: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

        assert_eq!(value["file"], "page.png");
        assert_eq!(value["regions"].as_array().unwrap().len(), 2);
        assert_eq!(value["regions"][1]["order"], 5);
        assert_eq!(value["image_ids"]["dhash12"], "b");
    }

    #[test]
    fn test_image_ids_omitted_when_absent() {
        let json = RegionDocument::new("page.png", &sample()).to_json().unwrap();
        assert!(!json.contains("image_ids"));
    }

    #[test]
    fn test_parse_roundtrip() {
        let doc = RegionDocument::new("page.png", &sample());
        let parsed = RegionDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(parsed.file, "page.png");

        let regions = parsed.to_regions().unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].label, 3);
        assert!((regions[1].rectangle.bottom() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_parse_bare_array() {
        let json = r#"[{"category_id": 0, "label": 1,
            "points": [{"x": 0.1, "y": 0.1}, {"x": 0.2, "y": 0.2}]}]"#;
        let doc = RegionDocument::from_json(json).unwrap();
        assert_eq!(doc.file, "");
        assert_eq!(doc.to_regions().unwrap()[0].label, 1);
    }

    #[test]
    fn test_missing_regions_field() {
        assert!(matches!(
            RegionDocument::from_json(r#"{"file": "x.png"}"#),
            Err(FormatError::MissingField { .. })
        ));
    }

    #[test]
    fn test_scalar_document_rejected() {
        assert!(matches!(
            RegionDocument::from_json("42"),
            Err(FormatError::InvalidFormat { .. })
        ));
        assert!(matches!(
            RegionDocument::from_json("{not json"),
            Err(FormatError::Json(_))
        ));
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(RegionDocument::default_file_name("scan.jpg"), "scan.jpg.json");
    }

    #[test]
    fn test_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.json");
        let doc = RegionDocument::new("scan.jpg", &sample());

        doc.write(&path).unwrap();
        let read = RegionDocument::read(&path).unwrap();
        assert_eq!(read.file, doc.file);
        assert_eq!(read.regions.len(), doc.regions.len());
    }
}
