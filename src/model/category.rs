//! Category and label definitions supplied by the host.

use serde::{Deserialize, Serialize};

/// A region category (e.g. "frame", "balloon").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier for the category
    pub id: i64,
    /// Display name of the category
    pub name: String,
    /// Sort position in category pickers
    #[serde(default)]
    pub order: i64,
}

impl Category {
    /// Create a new category with the given ID, name, and order.
    pub fn new(id: i64, name: &str, order: i64) -> Self {
        Self {
            id,
            name: name.to_string(),
            order,
        }
    }

    /// Placeholder category used until the host selects a real one.
    pub fn unknown() -> Self {
        Self::new(0, "Unknown", 0)
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::unknown()
    }
}

/// A named label code within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Category this label belongs to
    pub category_id: i64,
    /// Label code (what regions store in their `label` field)
    pub label: u32,
    /// Display name
    pub name: String,
    /// Sort position
    #[serde(default)]
    pub order: i64,
}

impl Label {
    pub fn new(category_id: i64, label: u32, name: &str, order: i64) -> Self {
        Self {
            category_id,
            label,
            name: name.to_string(),
            order,
        }
    }
}

/// Find the display name for a label code within a category.
pub fn label_name(labels: &[Label], category_id: i64, label: u32) -> Option<&str> {
    labels
        .iter()
        .find(|l| l.category_id == category_id && l.label == label)
        .map(|l| l.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_category_is_unknown() {
        let category = Category::default();
        assert_eq!(category.id, 0);
        assert_eq!(category.name, "Unknown");
    }

    #[test]
    fn test_label_name_lookup() {
        let labels = vec![
            Label::new(1, 0, "none", 0),
            Label::new(1, 1, "speech", 1),
            Label::new(2, 1, "panel", 1),
        ];
        assert_eq!(label_name(&labels, 1, 1), Some("speech"));
        assert_eq!(label_name(&labels, 2, 1), Some("panel"));
        assert_eq!(label_name(&labels, 3, 1), None);
    }

    #[test]
    fn test_category_deserializes_without_order() {
        let category: Category = serde_json::from_str(r#"{"id": 4, "name": "face"}"#).unwrap();
        assert_eq!(category, Category::new(4, "face", 0));
    }
}
