//! Per-view derived scene state
//!
//! A [`Scene`] is pure derived state: node geometry, connector routes and the
//! occupancy index of one view. It has no identity of its own and is never
//! persisted. [`sync`] rebuilds it from scratch whenever the model or the
//! active view changes.

pub mod occupancy;
pub mod routing;
mod sync;

pub use occupancy::{ring, OccupancyIndex};
pub use routing::{route_through, route_tiles, RouteFailure, RouteLimits, TileBounds};
pub use sync::sync;

use crate::config::TileSize;
use crate::model::{ConnectorStyle, Tile};

/// A point in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen position of a tile's center under the isometric projection
pub fn tile_position(tile: Tile, size: TileSize) -> Point {
    let (x, y) = (f64::from(tile.x), f64::from(tile.y));
    Point::new((x - y) * size.width / 2.0, (x + y) * size.height / 2.0)
}

/// How an icon image is laid onto the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Artwork already drawn isometrically, stood upright on the tile
    Isometric,
    /// Flat artwork, projected onto the tile's plane
    Flat,
}

/// Drawing parameters of a node's icon
#[derive(Debug, Clone, PartialEq)]
pub struct IconGeometry {
    pub icon_id: String,
    pub url: String,
    pub projection: Projection,
    /// Rendered image width in screen units
    pub width: f64,
    /// -1 when mirrored horizontally, 1 otherwise
    pub scale_x: f64,
    /// -1 when mirrored vertically, 1 otherwise
    pub scale_y: f64,
}

/// A node's icon as the renderer should treat it
#[derive(Debug, Clone, PartialEq)]
pub enum NodeIcon {
    Resolved(IconGeometry),
    /// The item names an icon the model does not have (or none at all)
    Missing { icon_id: Option<String> },
}

/// One placed item of the view
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub item_id: String,
    pub name: String,
    pub tile: Tile,
    pub position: Point,
    pub label_height: u32,
    pub icon: NodeIcon,
}

/// A routed connector
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConnector {
    pub id: String,
    pub color: Option<String>,
    pub style: ConnectorStyle,
    pub tiles: Vec<Tile>,
    pub points: Vec<Point>,
}

/// Why a connector could not be routed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnroutableReason {
    /// Fewer than two anchors resolve to a tile
    TooFewAnchors,
    /// An anchor references an item, tile or anchor that cannot be found
    DanglingAnchor { anchor_id: String },
    /// Obstacles leave no path within the routing bounds
    Blocked,
    /// The route search gave up after expanding its budget of tiles
    BudgetExceeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnroutableConnector {
    pub id: String,
    pub reason: UnroutableReason,
}

/// Derived state of one view
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub view_id: String,
    pub nodes: Vec<SceneNode>,
    pub connectors: Vec<SceneConnector>,
    pub unroutable: Vec<UnroutableConnector>,
    pub occupancy: OccupancyIndex,
    /// Default radius for free-tile searches in this scene
    pub search_radius: u32,
}

impl Scene {
    /// A scene with nothing in it
    pub fn empty(view_id: impl Into<String>, search_radius: u32) -> Self {
        Self {
            view_id: view_id.into(),
            nodes: Vec::new(),
            connectors: Vec::new(),
            unroutable: Vec::new(),
            occupancy: OccupancyIndex::new(),
            search_radius,
        }
    }

    pub fn is_occupied(&self, tile: Tile) -> bool {
        self.occupancy.is_occupied(tile)
    }

    /// Id of the item on a tile
    pub fn item_at(&self, tile: Tile) -> Option<&str> {
        self.occupancy.item_at(tile)
    }

    /// Closest free tile to `tile`; without an explicit radius the scene's
    /// search radius bounds the search
    pub fn nearest_unoccupied(&self, tile: Tile, max_radius: Option<u32>) -> Option<Tile> {
        self.occupancy
            .nearest_unoccupied(tile, max_radius.unwrap_or(self.search_radius))
    }

    pub fn node(&self, item_id: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.item_id == item_id)
    }
}
