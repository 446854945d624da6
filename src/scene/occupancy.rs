//! Tile occupancy and free-tile search

use std::collections::BTreeMap;

use crate::model::{Tile, ViewItem};

/// Snapshot of which item sits on which tile of one view.
///
/// Built fresh for every scene. When imported data puts several items on the
/// same tile, the first one in view order owns the tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyIndex {
    tiles: BTreeMap<Tile, String>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the tiles of a view's items
    pub fn from_view_items(items: &[ViewItem]) -> Self {
        let mut index = Self::new();
        for item in items {
            index.insert(item.tile, &item.id);
        }
        index
    }

    /// Claim a tile for an item; returns false if the tile was already taken
    pub fn insert(&mut self, tile: Tile, item_id: &str) -> bool {
        if self.tiles.contains_key(&tile) {
            return false;
        }
        self.tiles.insert(tile, item_id.to_string());
        true
    }

    pub fn is_occupied(&self, tile: Tile) -> bool {
        self.tiles.contains_key(&tile)
    }

    /// Id of the item owning a tile
    pub fn item_at(&self, tile: Tile) -> Option<&str> {
        self.tiles.get(&tile).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Occupied tiles in ascending tile order
    pub fn iter(&self) -> impl Iterator<Item = (Tile, &str)> {
        self.tiles.iter().map(|(tile, id)| (*tile, id.as_str()))
    }

    /// Closest free tile to `origin`, searching ring by ring up to
    /// `max_radius`. Ring 0 is the origin itself.
    pub fn nearest_unoccupied(&self, origin: Tile, max_radius: u32) -> Option<Tile> {
        (0..=max_radius)
            .flat_map(|radius| ring(origin, radius))
            .find(|tile| !self.is_occupied(*tile))
    }
}

/// Tiles at exactly `radius` (Chebyshev distance) from `center`.
///
/// Order is fixed: rows from top (`y - radius`) to bottom, each row scanned
/// left to right. Tiles beyond the `i32` lattice are skipped.
pub fn ring(center: Tile, radius: u32) -> impl Iterator<Item = Tile> {
    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    (-r..=r).flat_map(move |dy| {
        // Inner rows only touch the ring at their two ends
        let step = if dy.abs() == r || r == 0 {
            1
        } else {
            2 * r.unsigned_abs() as usize
        };
        (-r..=r)
            .step_by(step)
            .filter_map(move |dx| center.offset(dx, dy))
    })
}
