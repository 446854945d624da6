//! Catalog index: icon packs merged into a lookup by icon id

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::model::Icon;

/// In-memory lookup from icon id to icon record.
///
/// Packs are merged in the order they are added. When two packs carry the
/// same id the first occurrence wins and later ones are skipped.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    icons: Vec<Icon>,
    lookup: HashMap<String, usize>,
}

impl CatalogIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a single list of icons
    pub fn from_icons(icons: impl IntoIterator<Item = Icon>) -> Self {
        let mut index = Self::new();
        index.add_pack(icons);
        index
    }

    /// Merge an icon pack into the index, returning how many icons were added.
    /// Icons with a scale outside the allowed range are skipped.
    pub fn add_pack(&mut self, icons: impl IntoIterator<Item = Icon>) -> usize {
        let mut added = 0;
        for icon in icons {
            if !icon.has_valid_scale() {
                warn!(id = %icon.id, scale = ?icon.scale, "icon scale out of range, skipping");
                continue;
            }
            if self.lookup.contains_key(&icon.id) {
                debug!(id = %icon.id, "duplicate icon id in pack, keeping first occurrence");
                continue;
            }
            self.lookup.insert(icon.id.clone(), self.icons.len());
            self.icons.push(icon);
            added += 1;
        }
        added
    }

    /// Look up an icon by id
    pub fn get(&self, id: &str) -> Option<&Icon> {
        self.lookup.get(id).map(|&idx| &self.icons[idx])
    }

    /// Check if an icon id is present
    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains_key(id)
    }

    /// All icons in insertion order
    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Distinct collection tags, in first-seen order
    pub fn collections(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for collection in self.icons.iter().filter_map(|i| i.collection.as_deref()) {
            if !seen.contains(&collection) {
                seen.push(collection);
            }
        }
        seen
    }
}

/// Parse an icon pack from its JSON array form.
///
/// Every entry must carry `id`, `name` and `url`; a scale outside the
/// allowed range rejects the whole pack.
pub fn parse_pack(source: &str) -> Result<Vec<Icon>, ConfigError> {
    let icons: Vec<Icon> = serde_json::from_str(source)?;
    for (idx, icon) in icons.iter().enumerate() {
        if icon.id.is_empty() {
            return Err(ConfigError::schema(format!("[{idx}].id"), "must not be empty"));
        }
        if !icon.has_valid_scale() {
            return Err(ConfigError::schema(
                format!("[{idx}].scale"),
                format!("{} is outside the range 0.1..=3", icon.scale.unwrap_or_default()),
            ));
        }
    }
    Ok(icons)
}

/// Read and parse an icon pack file
pub fn load_pack(path: &Path) -> Result<Vec<Icon>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    parse_pack(&content)
}
