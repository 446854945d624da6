//! The shared diagram model
//!
//! The [`Model`] is the single writable source of truth of an editing
//! session. It is never patched in place by the editor: every mutation builds
//! a new snapshot which then replaces the old one as a whole.

pub mod document;
pub mod icon;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use document::{DiagramDocument, DocumentError};
pub use icon::Icon;

/// Default label height of a freshly placed view item
pub const DEFAULT_LABEL_HEIGHT: u32 = 80;

/// Errors raised by structural model mutations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("view '{id}' does not exist")]
    UnknownView { id: String },

    #[error("item '{id}' already exists")]
    DuplicateItem { id: String },

    #[error("view '{id}' already exists")]
    DuplicateView { id: String },
}

/// An integer coordinate on the isometric grid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring tile, or `None` when it falls off the `i32` lattice
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// Ring index of `other` around `self` (max of the axis distances)
    pub fn chebyshev_distance(self, other: Tile) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn manhattan_distance(self, other: Tile) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// A named palette entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub id: String,
    pub value: String,
}

impl Color {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// A logical placement referencing an icon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Where a model item sits in one view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewItem {
    pub id: String,
    pub tile: Tile,
    #[serde(default = "default_label_height")]
    pub label_height: u32,
}

fn default_label_height() -> u32 {
    DEFAULT_LABEL_HEIGHT
}

/// Line style of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
}

/// What a connector anchor is attached to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnchorRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile: Option<Tile>,
    /// Another anchor of the same view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorAnchor {
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: AnchorRef,
}

/// A line between anchors of one view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default)]
    pub style: ConnectorStyle,
    pub anchors: Vec<ConnectorAnchor>,
}

/// A named arrangement of model items on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<ViewItem>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

impl View {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            items: Vec::new(),
            connectors: Vec::new(),
        }
    }
}

/// The shared diagram document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub title: String,
    #[serde(default)]
    pub icons: Vec<Icon>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub items: Vec<ModelItem>,
    #[serde(default)]
    pub views: Vec<View>,
}

impl Model {
    /// Create an empty model with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn icon(&self, id: &str) -> Option<&Icon> {
        self.icons.iter().find(|icon| icon.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&ModelItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn view(&self, id: &str) -> Option<&View> {
        self.views.iter().find(|view| view.id == id)
    }

    /// A new snapshot with one item placed into a view.
    ///
    /// Tile occupancy is not checked here; callers that must keep tiles
    /// unique consult the scene first.
    pub fn with_placement(
        &self,
        view_id: &str,
        item: ModelItem,
        view_item: ViewItem,
    ) -> Result<Model, ModelError> {
        if self.item(&item.id).is_some() {
            return Err(ModelError::DuplicateItem { id: item.id });
        }
        let Some(view_idx) = self.views.iter().position(|v| v.id == view_id) else {
            return Err(ModelError::UnknownView {
                id: view_id.to_string(),
            });
        };

        let mut next = self.clone();
        next.items.push(item);
        next.views[view_idx].items.push(view_item);
        Ok(next)
    }

    /// A new snapshot with an additional view
    pub fn with_view(&self, view: View) -> Result<Model, ModelError> {
        if self.view(&view.id).is_some() {
            return Err(ModelError::DuplicateView { id: view.id });
        }
        let mut next = self.clone();
        next.views.push(view);
        Ok(next)
    }

    /// A new snapshot with the icon list replaced, as after a catalog reload
    pub fn with_icons(&self, icons: Vec<Icon>) -> Model {
        Model {
            icons,
            ..self.clone()
        }
    }

    /// Items whose icon is not in the icon list.
    ///
    /// These render as display errors; the model itself stays valid.
    pub fn unresolved_icons(&self) -> Vec<&ModelItem> {
        self.items
            .iter()
            .filter(|item| item.icon.as_deref().is_some_and(|id| self.icon(id).is_none()))
            .collect()
    }

    /// Tiles of a view that hold more than one item, with the item ids in
    /// declaration order. Empty for an unknown view.
    pub fn tile_conflicts(&self, view_id: &str) -> Vec<(Tile, Vec<String>)> {
        let Some(view) = self.view(view_id) else {
            return Vec::new();
        };

        let mut by_tile: BTreeMap<Tile, Vec<String>> = BTreeMap::new();
        for item in &view.items {
            by_tile.entry(item.tile).or_default().push(item.id.clone());
        }
        by_tile.into_iter().filter(|(_, ids)| ids.len() > 1).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        let mut model = Model::new("Test");
        model.icons.push(Icon::new("server", "Server", "u"));
        model.views.push(View::new("v1", "Main"));
        model
    }

    fn placed(id: &str, icon: &str, tile: Tile) -> (ModelItem, ViewItem) {
        (
            ModelItem {
                id: id.to_string(),
                name: id.to_string(),
                description: None,
                icon: Some(icon.to_string()),
            },
            ViewItem {
                id: id.to_string(),
                tile,
                label_height: DEFAULT_LABEL_HEIGHT,
            },
        )
    }

    #[test]
    fn test_with_placement_leaves_snapshot_untouched() {
        let before = model();
        let (item, view_item) = placed("a", "server", Tile::new(0, 0));
        let after = before.with_placement("v1", item, view_item).expect("Should place");

        assert!(before.items.is_empty());
        assert_eq!(after.items.len(), 1);
        assert_eq!(after.view("v1").map(|v| v.items.len()), Some(1));
    }

    #[test]
    fn test_with_placement_errors() {
        let (item, view_item) = placed("a", "server", Tile::new(0, 0));
        let err = model()
            .with_placement("nope", item.clone(), view_item.clone())
            .unwrap_err();
        assert_eq!(err, ModelError::UnknownView { id: "nope".to_string() });

        let once = model().with_placement("v1", item.clone(), view_item.clone()).unwrap();
        let err = once.with_placement("v1", item, view_item).unwrap_err();
        assert_eq!(err, ModelError::DuplicateItem { id: "a".to_string() });
    }

    #[test]
    fn test_unresolved_icons() {
        let (a, va) = placed("a", "server", Tile::new(0, 0));
        let (b, vb) = placed("b", "missing", Tile::new(1, 0));
        let m = model()
            .with_placement("v1", a, va)
            .and_then(|m| m.with_placement("v1", b, vb))
            .unwrap();
        let unresolved: Vec<&str> = m.unresolved_icons().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(unresolved, vec!["b"]);
    }

    #[test]
    fn test_tile_conflicts() {
        let (a, va) = placed("a", "server", Tile::new(2, 2));
        let (b, vb) = placed("b", "server", Tile::new(2, 2));
        let m = model()
            .with_placement("v1", a, va)
            .and_then(|m| m.with_placement("v1", b, vb))
            .unwrap();
        assert_eq!(
            m.tile_conflicts("v1"),
            vec![(Tile::new(2, 2), vec!["a".to_string(), "b".to_string()])]
        );
        assert!(m.tile_conflicts("other").is_empty());
    }

    #[test]
    fn test_tile_distances() {
        let t = Tile::new(0, 0);
        assert_eq!(t.chebyshev_distance(Tile::new(2, -1)), 2);
        assert_eq!(t.manhattan_distance(Tile::new(2, -1)), 3);
        assert_eq!(t.offset(1, -1), Some(Tile::new(1, -1)));
        assert_eq!(Tile::new(i32::MAX, 0).offset(1, 0), None);
        assert_eq!(Tile::new(0, i32::MIN).offset(0, -1), None);
    }

    #[test]
    fn test_view_item_label_height_default() {
        let item: ViewItem =
            serde_json::from_str(r#"{"id":"a","tile":{"x":1,"y":2}}"#).expect("Should parse");
        assert_eq!(item.label_height, DEFAULT_LABEL_HEIGHT);
        assert_eq!(item.tile, Tile::new(1, 2));
    }
}
