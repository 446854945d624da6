//! Editor configuration
//!
//! Grid geometry, placement search bounds and document defaults. Every value
//! has a built-in default; a TOML file may override any subset of them.
//!
//! ```toml
//! [grid]
//! tile_width = 141.5
//! tile_height = 81.9
//! search_radius = 10
//! route_budget = 20000
//!
//! [items]
//! label_height = 80
//! untitled_name = "Untitled"
//!
//! [[colors]]
//! id = "blue"
//! value = "#0066cc"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::{Color, DEFAULT_LABEL_HEIGHT};
use crate::scene::RouteLimits;

/// Projected size of one tile in screen units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSize {
    pub width: f64,
    pub height: f64,
}

/// Configuration options for an editing session
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Projected tile size used for scene geometry
    pub tile_size: TileSize,

    /// Ring radius searched for a free tile when placing
    pub search_radius: u32,

    /// Extra tiles around a connector's endpoints available for routing
    pub connector_padding: i32,

    /// Tiles a connector route search may expand before it gives up
    pub route_budget: usize,

    /// Label height given to newly placed view items
    pub label_height: u32,

    /// Name given to an item whose icon is not in the model
    pub untitled_item_name: String,

    /// Title of a new or title-less diagram
    pub untitled_diagram_title: String,

    /// Title used on export when the model has none
    pub export_title: String,

    /// Name of the view created when a diagram has none
    pub default_view_name: String,

    /// Palette used when a diagram carries no colors
    pub default_colors: Vec<Color>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tile_size: TileSize {
                width: 141.5,
                height: 81.9,
            },
            search_radius: 10,
            connector_padding: 2,
            route_budget: 20_000,
            label_height: DEFAULT_LABEL_HEIGHT,
            untitled_item_name: "Untitled".to_string(),
            untitled_diagram_title: "Untitled Diagram".to_string(),
            export_title: "Exported Diagram".to_string(),
            default_view_name: "Untitled view".to_string(),
            default_colors: default_colors(),
        }
    }
}

/// Connector palette used when a diagram carries no colors
pub fn default_colors() -> Vec<Color> {
    [
        ("blue", "#0066cc"),
        ("green", "#00aa00"),
        ("red", "#cc0000"),
        ("orange", "#ff9900"),
        ("purple", "#9900cc"),
        ("black", "#000000"),
        ("gray", "#666666"),
    ]
    .into_iter()
    .map(|(id, value)| Color::new(id, value))
    .collect()
}

/// TOML structure for deserializing editor configuration
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlEditorConfig {
    grid: Option<TomlGrid>,
    items: Option<TomlItems>,
    document: Option<TomlDocument>,
    colors: Option<Vec<TomlColor>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlGrid {
    tile_width: Option<f64>,
    tile_height: Option<f64>,
    search_radius: Option<u32>,
    connector_padding: Option<i32>,
    route_budget: Option<usize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlItems {
    label_height: Option<u32>,
    untitled_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlDocument {
    untitled_title: Option<String>,
    export_title: Option<String>,
    default_view_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlColor {
    id: String,
    value: String,
}

impl EditorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration overrides from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Load configuration overrides from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlEditorConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(grid) = parsed.grid {
            if let Some(width) = grid.tile_width {
                config.tile_size.width = width;
            }
            if let Some(height) = grid.tile_height {
                config.tile_size.height = height;
            }
            if let Some(radius) = grid.search_radius {
                config.search_radius = radius;
            }
            if let Some(padding) = grid.connector_padding {
                config.connector_padding = padding;
            }
            if let Some(budget) = grid.route_budget {
                config.route_budget = budget;
            }
        }
        if let Some(items) = parsed.items {
            if let Some(height) = items.label_height {
                config.label_height = height;
            }
            if let Some(name) = items.untitled_name {
                config.untitled_item_name = name;
            }
        }
        if let Some(document) = parsed.document {
            if let Some(title) = document.untitled_title {
                config.untitled_diagram_title = title;
            }
            if let Some(title) = document.export_title {
                config.export_title = title;
            }
            if let Some(name) = document.default_view_name {
                config.default_view_name = name;
            }
        }
        if let Some(colors) = parsed.colors {
            config.default_colors = colors
                .into_iter()
                .map(|c| Color::new(c.id, c.value))
                .collect();
        }

        if config.tile_size.width <= 0.0 || config.tile_size.height <= 0.0 {
            return Err(ConfigError::schema("grid", "tile size must be positive"));
        }
        if config.connector_padding < 0 {
            return Err(ConfigError::schema(
                "grid.connector_padding",
                "must not be negative",
            ));
        }

        Ok(config)
    }

    /// Set the projected tile size
    pub fn with_tile_size(mut self, width: f64, height: f64) -> Self {
        self.tile_size = TileSize { width, height };
        self
    }

    /// Set the free-tile search radius
    pub fn with_search_radius(mut self, radius: u32) -> Self {
        self.search_radius = radius;
        self
    }

    /// Set the routing padding around connectors
    pub fn with_connector_padding(mut self, padding: i32) -> Self {
        self.connector_padding = padding.max(0);
        self
    }

    /// Set how many tiles a connector route search may expand
    pub fn with_route_budget(mut self, budget: usize) -> Self {
        self.route_budget = budget;
        self
    }

    /// Route search limits for connectors
    pub fn route_limits(&self) -> RouteLimits {
        RouteLimits {
            padding: self.connector_padding,
            max_expanded: self.route_budget,
        }
    }

    /// Set the label height of new view items
    pub fn with_label_height(mut self, height: u32) -> Self {
        self.label_height = height;
        self
    }

    /// Set the fallback palette
    pub fn with_default_colors(mut self, colors: Vec<Color>) -> Self {
        self.default_colors = colors;
        self
    }
}
