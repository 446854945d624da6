//! Per-category resolution and menu policies

use serde::Serialize;

use super::config::{CategoryConfig, MenuSettings};
use super::index::CatalogIndex;
use super::resolver::resolve_icon;
use crate::model::Icon;

/// Order assigned to categories that do not configure one, so they sort last
pub const DEFAULT_CATEGORY_ORDER: i64 = 999;

/// A category with its references resolved into icons
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedCategory {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub is_expanded: bool,
    pub order: i64,
    pub icons: Vec<Icon>,
}

/// Resolve every reference of a category in declaration order.
///
/// Unresolved references are skipped here; the validation report lists them.
pub fn process_category(
    category: &CategoryConfig,
    index: &CatalogIndex,
    settings: &MenuSettings,
) -> ProcessedCategory {
    let resolved: Vec<Icon> = category
        .icons
        .iter()
        .filter_map(|reference| resolve_icon(reference, index).ok())
        .collect();

    ProcessedCategory {
        id: category.id.clone(),
        name: category.name.clone(),
        description: category.description.clone(),
        color: category.color.clone(),
        is_expanded: is_expanded(category, settings),
        order: category.order.unwrap_or(DEFAULT_CATEGORY_ORDER),
        icons: truncate_icons(resolved, settings.max_icons_per_category),
    }
}

/// Expansion policy: the category's own flag, else membership in the
/// default-expanded list, else collapsed
pub fn is_expanded(category: &CategoryConfig, settings: &MenuSettings) -> bool {
    category
        .is_expanded
        .unwrap_or_else(|| settings.default_expanded.iter().any(|id| *id == category.id))
}

/// Keep the first `limit` icons; a missing or zero limit keeps all
pub fn truncate_icons(mut icons: Vec<Icon>, limit: Option<usize>) -> Vec<Icon> {
    if let Some(limit) = limit.filter(|&l| l > 0) {
        icons.truncate(limit);
    }
    icons
}
