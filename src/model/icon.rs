//! Icon records shared by the catalog, the model and diagram documents

use serde::{Deserialize, Serialize};

/// Smallest scale factor an icon may carry
pub const MIN_ICON_SCALE: f64 = 0.1;

/// Largest scale factor an icon may carry
pub const MAX_ICON_SCALE: f64 = 3.0;

/// Collection tag of icons brought in by the user rather than an icon pack
pub const IMPORTED_COLLECTION: &str = "imported";

/// A renderable icon: an identity plus the visual fields the renderer needs.
///
/// The same record serves as an icon-pack entry, a resolved catalog icon
/// and an entry in a diagram's icon list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    pub id: String,
    pub name: String,
    pub url: String,
    /// Semantic collection (icon pack) the visuals come from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_isometric: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_x: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_y: Option<bool>,
    /// Menu grouping assigned by the catalog configuration (a category's
    /// display name). Independent of `collection`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_group: Option<String>,
}

impl Icon {
    /// Create an icon with only the required fields set
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            collection: None,
            is_isometric: None,
            scale: None,
            flip_x: None,
            flip_y: None,
            display_group: None,
        }
    }

    /// Set the collection tag
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Set the scale factor
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Mark the icon as isometric or flat
    pub fn with_isometric(mut self, isometric: bool) -> Self {
        self.is_isometric = Some(isometric);
        self
    }

    /// Set the flip flags
    pub fn with_flip(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = Some(flip_x);
        self.flip_y = Some(flip_y);
        self
    }

    /// Whether this icon was imported by the user
    pub fn is_imported(&self) -> bool {
        self.collection.as_deref() == Some(IMPORTED_COLLECTION)
    }

    /// Icons are drawn isometrically unless explicitly marked flat
    pub fn renders_isometric(&self) -> bool {
        self.is_isometric.unwrap_or(true)
    }

    /// Scale factor with the default of 1 applied
    pub fn effective_scale(&self) -> f64 {
        self.scale.unwrap_or(1.0)
    }

    /// Whether the scale, when present, lies within the allowed range
    pub fn has_valid_scale(&self) -> bool {
        self.scale.map_or(true, is_valid_scale)
    }

    /// Group used for menu display: the configured display group, or the
    /// semantic collection for icons that never went through the catalog.
    pub fn menu_group(&self) -> Option<&str> {
        self.display_group
            .as_deref()
            .or(self.collection.as_deref())
    }
}

/// Check a scale factor against the allowed icon scale range
pub fn is_valid_scale(scale: f64) -> bool {
    (MIN_ICON_SCALE..=MAX_ICON_SCALE).contains(&scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_range() {
        assert!(is_valid_scale(0.1));
        assert!(is_valid_scale(3.0));
        assert!(!is_valid_scale(0.05));
        assert!(!is_valid_scale(3.5));
        assert!(Icon::new("a", "A", "u").has_valid_scale());
        assert!(!Icon::new("a", "A", "u").with_scale(4.0).has_valid_scale());
    }

    #[test]
    fn test_menu_group_prefers_display_group() {
        let mut icon = Icon::new("a", "A", "u").with_collection("AWS");
        assert_eq!(icon.menu_group(), Some("AWS"));
        icon.display_group = Some("Compute".to_string());
        assert_eq!(icon.menu_group(), Some("Compute"));
    }

    #[test]
    fn test_deserialize_camel_case() {
        let icon: Icon = serde_json::from_str(
            r#"{"id":"x","name":"X","url":"u","collection":"imported","isIsometric":false,"flipX":true}"#,
        )
        .expect("Should parse");
        assert!(icon.is_imported());
        assert!(!icon.renders_isometric());
        assert_eq!(icon.flip_x, Some(true));
        assert_eq!(icon.effective_scale(), 1.0);
    }
}
