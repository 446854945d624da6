//! Catalog resolution over a whole menu configuration

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::category::{process_category, ProcessedCategory};
use super::config::{IconMenuConfig, MenuSettings};
use super::index::CatalogIndex;
use super::resolver::resolve_icon;
use crate::error::ConfigError;
use crate::model::Icon;

/// Outcome of checking every configured reference against the catalog
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Everything produced by one resolution pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCatalog {
    /// Non-empty (unless configured otherwise) categories in display order
    pub categories: Vec<ProcessedCategory>,
    /// Every resolved icon, tagged with its category's display name
    pub flattened_icons: Vec<Icon>,
    pub validation: ValidationReport,
}

/// Expand/collapse state of one menu category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionState {
    pub id: String,
    pub is_expanded: bool,
}

/// Which side wins when two icon lists carry the same id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep the entry from the primary list
    PreferPrimary,
    /// Replace the primary entry with the incoming one
    PreferIncoming,
}

/// Resolve a configuration against a catalog index.
///
/// Pure: the same configuration, index and settings always produce the same
/// result.
pub fn resolve_all(
    config: &IconMenuConfig,
    index: &CatalogIndex,
    settings: &MenuSettings,
) -> ResolvedCatalog {
    let processed: Vec<ProcessedCategory> = config
        .categories
        .iter()
        .map(|category| {
            let processed = process_category(category, index, settings);
            debug!(
                category = %category.name,
                configured = category.icons.len(),
                resolved = processed.icons.len(),
                "processed category"
            );
            processed
        })
        .collect();

    let flattened_icons = flatten(&processed);

    let mut categories: Vec<ProcessedCategory> = processed
        .into_iter()
        .filter(|c| settings.show_empty_categories || !c.icons.is_empty())
        .collect();
    // Stable sort keeps declaration order among equal orders
    categories.sort_by_key(|c| c.order);

    let validation = validate(config, index);
    info!(
        categories = categories.len(),
        icons = flattened_icons.len(),
        errors = validation.errors.len(),
        "catalog resolved"
    );

    ResolvedCatalog {
        categories,
        flattened_icons,
        validation,
    }
}

/// Tag every resolved icon with its category's display name, in declaration
/// order. A reference id repeated across categories keeps its first
/// occurrence.
fn flatten(categories: &[ProcessedCategory]) -> Vec<Icon> {
    let mut seen = HashSet::new();
    let mut flattened = Vec::new();
    for category in categories {
        for icon in &category.icons {
            if !seen.insert(icon.id.clone()) {
                warn!(id = %icon.id, category = %category.name, "icon id configured twice");
                continue;
            }
            flattened.push(Icon {
                display_group: Some(category.name.clone()),
                ..icon.clone()
            });
        }
    }
    flattened
}

/// Check every configured reference, ignoring truncation and empty-category
/// filtering
pub fn validate(config: &IconMenuConfig, index: &CatalogIndex) -> ValidationReport {
    let mut errors = Vec::new();
    for category in &config.categories {
        for reference in &category.icons {
            if let Err(failure) = resolve_icon(reference, index) {
                let message = format!(
                    "Cannot resolve icon \"{}\" in category \"{}\" ({})",
                    failure.ref_id,
                    category.name,
                    failure.attempted_chain()
                );
                warn!("{message}");
                errors.push(message);
            }
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Merge two icon lists by id.
///
/// The result keeps the primary list's order, with incoming icons that are
/// new appended in their own order.
pub fn merge_icons(primary: &[Icon], incoming: &[Icon], policy: MergePolicy) -> Vec<Icon> {
    let mut merged: Vec<Icon> = Vec::with_capacity(primary.len() + incoming.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for icon in primary {
        if positions.contains_key(&icon.id) {
            continue;
        }
        positions.insert(icon.id.clone(), merged.len());
        merged.push(icon.clone());
    }

    for icon in incoming {
        match positions.get(&icon.id) {
            Some(&pos) => {
                if policy == MergePolicy::PreferIncoming {
                    merged[pos] = icon.clone();
                }
            }
            None => {
                positions.insert(icon.id.clone(), merged.len());
                merged.push(icon.clone());
            }
        }
    }

    merged
}

/// Query facade over a configuration and the icons currently available.
///
/// Resolution runs eagerly whenever the configuration or the catalog
/// changes, so queries never observe a half-resolved catalog.
#[derive(Debug, Clone)]
pub struct CatalogEngine {
    config: IconMenuConfig,
    index: CatalogIndex,
    resolved: ResolvedCatalog,
}

impl CatalogEngine {
    /// Resolve a configuration against a catalog index.
    ///
    /// A configuration that fails its schema check is refused.
    pub fn new(config: IconMenuConfig, index: CatalogIndex) -> Result<Self, ConfigError> {
        config.validate_schema()?;
        info!(
            total = index.len(),
            collections = ?index.collections(),
            "available icons set"
        );
        let resolved = resolve_all(&config, &index, &config.settings);
        Ok(Self {
            config,
            index,
            resolved,
        })
    }

    /// Swap in a new configuration (hot reload) and re-resolve. A rejected
    /// configuration leaves the engine as it was.
    pub fn reload(&mut self, config: IconMenuConfig) -> Result<(), ConfigError> {
        config.validate_schema()?;
        self.resolved = resolve_all(&config, &self.index, &config.settings);
        self.config = config;
        Ok(())
    }

    /// Swap in a new set of available icons and re-resolve
    pub fn set_available_icons(&mut self, index: CatalogIndex) {
        self.resolved = resolve_all(&self.config, &index, &self.config.settings);
        self.index = index;
    }

    pub fn config(&self) -> &IconMenuConfig {
        &self.config
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn resolved(&self) -> &ResolvedCatalog {
        &self.resolved
    }

    /// Categories in display order
    pub fn categories(&self) -> &[ProcessedCategory] {
        &self.resolved.categories
    }

    /// Icons of one displayed category; empty when the id is unknown
    pub fn icons_by_category(&self, category_id: &str) -> &[Icon] {
        self.resolved
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.icons.as_slice())
            .unwrap_or(&[])
    }

    /// Case-insensitive substring search over id, name and collection.
    ///
    /// Always empty when search is disabled in the settings.
    pub fn search(&self, query: &str) -> Vec<Icon> {
        if !self.config.settings.enable_search {
            return Vec::new();
        }

        let query = query.to_lowercase();
        self.resolved
            .categories
            .iter()
            .flat_map(|c| c.icons.iter())
            .filter(|icon| {
                icon.name.to_lowercase().contains(&query)
                    || icon.id.to_lowercase().contains(&query)
                    || icon
                        .collection
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&query))
            })
            .cloned()
            .collect()
    }

    pub fn validate(&self) -> &ValidationReport {
        &self.resolved.validation
    }

    pub fn settings(&self) -> &MenuSettings {
        &self.config.settings
    }

    /// Flattened icons with their category display group
    pub fn flattened_icons(&self) -> &[Icon] {
        &self.resolved.flattened_icons
    }

    /// Flattened icons with `collection` replaced by the display group, for
    /// consumers that group menus by collection
    pub fn menu_icons(&self) -> Vec<Icon> {
        self.resolved
            .flattened_icons
            .iter()
            .map(|icon| Icon {
                collection: icon.display_group.clone().or_else(|| icon.collection.clone()),
                ..icon.clone()
            })
            .collect()
    }

    /// Expand/collapse state for each displayed category
    pub fn collection_states(&self) -> Vec<CollectionState> {
        self.resolved
            .categories
            .iter()
            .map(|c| CollectionState {
                id: c.id.clone(),
                is_expanded: c.is_expanded,
            })
            .collect()
    }
}
