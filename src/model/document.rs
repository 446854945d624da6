//! Diagram documents: the JSON wire form of a model
//!
//! Three shapes of document leave or enter the core:
//!
//! - [`DiagramDocument::export`] carries every icon the model uses, for
//!   portability between installations
//! - [`DiagramDocument::save`] carries only user-imported icons; catalog icons
//!   are re-resolved when the document is loaded
//! - [`DiagramDocument::into_model`] turns either form back into a model
//!   against the catalog available at load time

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Color, Icon, Model, ModelItem, View};
use crate::catalog::{merge_icons, MergePolicy};
use crate::config::EditorConfig;

/// Errors reading or writing diagram documents
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid diagram document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Serialized diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icons: Vec<Icon>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub items: Vec<ModelItem>,
    #[serde(default)]
    pub views: Vec<View>,
    #[serde(default = "default_fit_to_screen")]
    pub fit_to_screen: bool,
}

fn default_fit_to_screen() -> bool {
    true
}

impl DiagramDocument {
    /// Full export: every model icon plus any extra imported icons the model
    /// lost track of, deduplicated by id with the model's copy winning
    pub fn export(model: &Model, extra_imported: &[Icon], config: &EditorConfig) -> Self {
        let extra: Vec<Icon> = extra_imported
            .iter()
            .filter(|icon| icon.is_imported())
            .cloned()
            .collect();

        Self {
            title: non_empty_or(&model.title, &config.export_title),
            icons: merge_icons(&model.icons, &extra, MergePolicy::PreferPrimary),
            colors: model.colors.clone(),
            items: model.items.clone(),
            views: model.views.clone(),
            fit_to_screen: true,
        }
    }

    /// Session save: only imported icons travel with the document
    pub fn save(model: &Model) -> Self {
        Self {
            title: model.title.clone(),
            icons: model
                .icons
                .iter()
                .filter(|icon| icon.is_imported())
                .cloned()
                .collect(),
            colors: model.colors.clone(),
            items: model.items.clone(),
            views: model.views.clone(),
            fit_to_screen: true,
        }
    }

    /// Rebuild a model against the catalog available now.
    ///
    /// A document that already carries every catalog icon is taken as-is.
    /// Otherwise the catalog icons are used, followed by the document's
    /// imported icons. Items and views are kept unchanged either way, so an
    /// item whose icon disappeared from the catalog shows as unresolved.
    pub fn into_model(self, catalog: &[Icon], config: &EditorConfig) -> Model {
        let carries_catalog = catalog
            .iter()
            .all(|icon| self.icons.iter().any(|own| own.id == icon.id));

        let icons = if carries_catalog {
            self.icons
        } else {
            let imported: Vec<Icon> = self
                .icons
                .into_iter()
                .filter(Icon::is_imported)
                .collect();
            merge_icons(catalog, &imported, MergePolicy::PreferIncoming)
        };

        let colors = if self.colors.is_empty() {
            config.default_colors.clone()
        } else {
            self.colors
        };

        Model {
            title: non_empty_or(&self.title, &config.untitled_diagram_title),
            icons,
            colors,
            items: self.items,
            views: self.views,
        }
    }

    pub fn from_json(content: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn write_file(&self, path: &Path) -> Result<(), DocumentError> {
        let content = self.to_json_pretty()?;
        std::fs::write(path, content).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
