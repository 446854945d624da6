//! Iso Diagram - the core of an isometric diagram editor
//!
//! This library resolves a declarative icon-menu configuration against the
//! icon packs available at runtime, and maintains a tile-based diagram model
//! with per-view scenes and icon placement.
//!
//! # Example
//!
//! ```rust
//! use iso_diagram::catalog::{CatalogEngine, CatalogIndex, IconMenuConfig};
//! use iso_diagram::model::Icon;
//!
//! let config = IconMenuConfig::from_json(r#"{
//!     "version": "1.0",
//!     "categories": [{
//!         "id": "compute",
//!         "name": "Compute",
//!         "order": 1,
//!         "icons": [{ "id": "vm", "name": "VM", "collection": "AWS", "existingIconId": "aws-ec2" }]
//!     }]
//! }"#).unwrap();
//! let index = CatalogIndex::from_icons([Icon::new("aws-ec2", "EC2", "ec2.svg")]);
//!
//! let engine = CatalogEngine::new(config, index).unwrap();
//! assert!(engine.validate().is_valid);
//! assert_eq!(engine.icons_by_category("compute")[0].url, "ec2.svg");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod interaction;
pub mod model;
pub mod scene;
pub mod session;

pub use catalog::{CatalogEngine, CatalogIndex, IconMenuConfig};
pub use config::EditorConfig;
pub use error::ConfigError;
pub use interaction::{PlacementOutcome, PointerEvent};
pub use model::{DiagramDocument, DocumentError, Model, ModelError, Tile};
pub use scene::{sync, Scene};
pub use session::Editor;

use std::path::Path;

use thiserror::Error;

/// Errors that can occur anywhere between loading inputs and editing
#[derive(Debug, Error)]
pub enum EditorError {
    /// Catalog or editor configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Diagram document could not be read or written
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// A model mutation was rejected
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

/// A fresh diagram carrying the catalog's icons and the default palette
pub fn new_diagram(catalog: &CatalogEngine, config: &EditorConfig) -> Model {
    Model {
        colors: config.default_colors.clone(),
        ..Model::new(config.untitled_diagram_title.clone())
    }
    .with_icons(catalog.flattened_icons().to_vec())
}

/// Load a diagram document against the current catalog
pub fn open_diagram(
    path: &Path,
    catalog: &CatalogEngine,
    config: &EditorConfig,
) -> Result<Model, EditorError> {
    let document = DiagramDocument::from_file(path)?;
    Ok(document.into_model(catalog.flattened_icons(), config))
}
