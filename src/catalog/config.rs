//! Declarative icon menu configuration
//!
//! The configuration lists categories of icon references. Each reference
//! names the icon it wants to appear as (`id`, `name`) and how to find its
//! visuals: an existing catalog icon, a fallback catalog icon, or an inline
//! custom asset.
//!
//! # Example
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "categories": [
//!     {
//!       "id": "compute",
//!       "name": "Compute",
//!       "order": 1,
//!       "icons": [
//!         { "id": "vm", "name": "Virtual Machine", "collection": "AWS",
//!           "existingIconId": "aws-ec2", "fallbackIcon": "server" }
//!       ]
//!     }
//!   ],
//!   "settings": { "enableSearch": true, "defaultExpanded": ["compute"] }
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::icon::is_valid_scale;

/// Root of the icon menu configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IconMenuConfig {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub settings: MenuSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ConfigMetadata>,
}

/// A configured category of icon references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryConfig {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expanded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    pub icons: Vec<IconConfig>,
}

/// A desired catalog entry plus its resolution hints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IconConfig {
    pub id: String,
    pub name: String,
    pub collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_icon_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_icon: Option<CustomIcon>,
}

/// Inline icon asset carried directly by a reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomIcon {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_isometric: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_x: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_y: Option<bool>,
}

/// Menu-wide policies
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MenuSettings {
    /// Category ids expanded when the category does not say otherwise
    #[serde(default)]
    pub default_expanded: Vec<String>,
    #[serde(default)]
    pub show_empty_categories: bool,
    #[serde(default)]
    pub enable_search: bool,
    #[serde(default)]
    pub enable_filtering: bool,
    /// Prefix limit per category; zero means unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_icons_per_category: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_size: Option<IconSizes>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IconSizes {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl IconMenuConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: IconMenuConfig = serde_json::from_str(content)?;
        config.validate_schema()?;
        Ok(config)
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: IconMenuConfig = toml::from_str(content)?;
        config.validate_schema()?;
        Ok(config)
    }

    /// Load a configuration file; `.toml` files are read as TOML, anything
    /// else as JSON
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Semantic checks serde cannot express.
    ///
    /// Returns the first violation found, in document order.
    pub fn validate_schema(&self) -> Result<(), ConfigError> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::schema("version", "must not be empty"));
        }

        let mut category_ids = HashSet::new();
        for (c_idx, category) in self.categories.iter().enumerate() {
            let path = format!("categories[{c_idx}]");
            if category.id.is_empty() {
                return Err(ConfigError::schema(format!("{path}.id"), "must not be empty"));
            }
            if !category_ids.insert(category.id.as_str()) {
                return Err(ConfigError::schema(
                    format!("{path}.id"),
                    format!("duplicate category id '{}'", category.id),
                ));
            }
            if category.name.is_empty() {
                return Err(ConfigError::schema(format!("{path}.name"), "must not be empty"));
            }

            for (i_idx, icon) in category.icons.iter().enumerate() {
                icon.validate(&format!("{path}.icons[{i_idx}]"))?;
            }
        }

        for id in &self.settings.default_expanded {
            if !category_ids.contains(id.as_str()) {
                tracing::warn!(category = %id, "defaultExpanded names an unknown category");
            }
        }

        Ok(())
    }
}

impl IconConfig {
    /// Create a reference with no resolution hints
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            collection: collection.into(),
            existing_icon_id: None,
            fallback_icon: None,
            description: None,
            custom_icon: None,
        }
    }

    /// Point the reference at an existing catalog icon
    pub fn with_existing(mut self, icon_id: impl Into<String>) -> Self {
        self.existing_icon_id = Some(icon_id.into());
        self
    }

    /// Set the fallback catalog icon
    pub fn with_fallback(mut self, icon_id: impl Into<String>) -> Self {
        self.fallback_icon = Some(icon_id.into());
        self
    }

    /// Attach an inline custom asset
    pub fn with_custom(mut self, custom: CustomIcon) -> Self {
        self.custom_icon = Some(custom);
        self
    }

    fn validate(&self, path: &str) -> Result<(), ConfigError> {
        if self.id.is_empty() {
            return Err(ConfigError::schema(format!("{path}.id"), "must not be empty"));
        }
        if self.name.is_empty() {
            return Err(ConfigError::schema(format!("{path}.name"), "must not be empty"));
        }
        if let Some(custom) = &self.custom_icon {
            if custom.url.is_empty() {
                return Err(ConfigError::schema(
                    format!("{path}.customIcon.url"),
                    "must not be empty",
                ));
            }
            if let Some(scale) = custom.scale {
                if !is_valid_scale(scale) {
                    return Err(ConfigError::schema(
                        format!("{path}.customIcon.scale"),
                        format!("{scale} is outside the range 0.1..=3"),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl CustomIcon {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_isometric: None,
            scale: None,
            flip_x: None,
            flip_y: None,
        }
    }
}

impl CategoryConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            color: None,
            is_expanded: None,
            order: None,
            icons: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_icon(mut self, icon: IconConfig) -> Self {
        self.icons.push(icon);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "version": "1.0",
        "categories": [
            {
                "id": "compute",
                "name": "Compute",
                "order": 2,
                "icons": [
                    { "id": "vm", "name": "VM", "collection": "AWS", "existingIconId": "aws-ec2" }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_minimal_json() {
        let config = IconMenuConfig::from_json(MINIMAL).expect("Should parse");
        assert_eq!(config.version, "1.0");
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.categories[0].order, Some(2));
        assert_eq!(
            config.categories[0].icons[0].existing_icon_id.as_deref(),
            Some("aws-ec2")
        );
        assert_eq!(config.settings, MenuSettings::default());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
version = "2"

[settings]
enableSearch = true
maxIconsPerCategory = 5

[[categories]]
id = "network"
name = "Network"

[[categories.icons]]
id = "router"
name = "Router"
collection = "ISOFLOW"
fallbackIcon = "switch"
"#;
        let config = IconMenuConfig::from_toml(toml_str).expect("Should parse");
        assert!(config.settings.enable_search);
        assert_eq!(config.settings.max_icons_per_category, Some(5));
        assert_eq!(config.categories[0].icons[0].fallback_icon.as_deref(), Some("switch"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let src = r#"{"version":"1","categories":[],"colour":"red"}"#;
        assert!(matches!(
            IconMenuConfig::from_json(src),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn test_missing_icons_is_rejected() {
        let src = r#"{"version":"1","categories":[{"id":"a","name":"A"}]}"#;
        assert!(IconMenuConfig::from_json(src).is_err());
    }

    #[test]
    fn test_duplicate_category_is_rejected() {
        let src = r#"{"version":"1","categories":[
            {"id":"a","name":"A","icons":[]},
            {"id":"a","name":"Again","icons":[]}
        ]}"#;
        let err = IconMenuConfig::from_json(src).unwrap_err();
        assert!(err.to_string().contains("categories[1].id"));
    }

    #[test]
    fn test_custom_scale_out_of_range() {
        let src = r#"{"version":"1","categories":[{"id":"a","name":"A","icons":[
            {"id":"x","name":"X","collection":"C","customIcon":{"url":"u","scale":0.01}}
        ]}]}"#;
        let err = IconMenuConfig::from_json(src).unwrap_err();
        assert!(matches!(err, ConfigError::Schema { ref path, .. } if path == "categories[0].icons[0].customIcon.scale"));
    }

    #[test]
    fn test_empty_version_is_rejected() {
        let src = r#"{"version":" ","categories":[]}"#;
        assert!(matches!(
            IconMenuConfig::from_json(src),
            Err(ConfigError::Schema { .. })
        ));
    }
}
