//! Connector routing across the tile grid

use pathfinding::prelude::astar;

use super::occupancy::OccupancyIndex;
use crate::model::Tile;

/// Inclusive rectangle of tiles a route may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBounds {
    pub min: Tile,
    pub max: Tile,
}

impl TileBounds {
    /// Smallest bounds containing both tiles, grown by `padding` on each side
    /// and clamped to the `i32` lattice
    pub fn around(a: Tile, b: Tile, padding: i32) -> Self {
        Self {
            min: Tile::new(
                a.x.min(b.x).saturating_sub(padding),
                a.y.min(b.y).saturating_sub(padding),
            ),
            max: Tile::new(
                a.x.max(b.x).saturating_add(padding),
                a.y.max(b.y).saturating_add(padding),
            ),
        }
    }

    pub fn contains(&self, tile: Tile) -> bool {
        tile.x >= self.min.x && tile.x <= self.max.x && tile.y >= self.min.y && tile.y <= self.max.y
    }
}

/// How far a route search may go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteLimits {
    /// Extra tiles around the endpoints' bounding box
    pub padding: i32,
    /// Tiles the search may expand before giving up
    pub max_expanded: usize,
}

/// Why no route was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteFailure {
    /// Obstacles leave no path within the bounds
    Blocked,
    /// The search hit its expansion budget first
    BudgetExceeded,
}

/// Shortest 4-neighbour tile path from `from` to `to`.
///
/// Tiles owned by items are obstacles, except the two endpoints themselves.
/// The search stays inside the padded bounding box of the endpoints and
/// expands at most `limits.max_expanded` tiles.
pub fn route_tiles(
    from: Tile,
    to: Tile,
    occupancy: &OccupancyIndex,
    limits: RouteLimits,
) -> Result<Vec<Tile>, RouteFailure> {
    if from == to {
        return Ok(vec![from]);
    }

    let bounds = TileBounds::around(from, to, limits.padding);
    let passable = |tile: Tile| tile == to || !occupancy.is_occupied(tile);
    let mut expanded = 0usize;

    let found = astar(
        &from,
        |tile| {
            expanded += 1;
            if expanded > limits.max_expanded {
                return Vec::new();
            }
            [(1, 0), (0, 1), (-1, 0), (0, -1)]
                .into_iter()
                .filter_map(|(dx, dy)| tile.offset(dx, dy))
                .filter(|next| bounds.contains(*next) && passable(*next))
                .map(|next| (next, 1u32))
                .collect::<Vec<_>>()
        },
        |tile| tile.manhattan_distance(to),
        |tile| *tile == to,
    );

    match found {
        Some((path, _cost)) => Ok(path),
        None if expanded > limits.max_expanded => Err(RouteFailure::BudgetExceeded),
        None => Err(RouteFailure::Blocked),
    }
}

/// Route through a sequence of waypoints, joining the legs without
/// repeating the shared waypoint tiles. Each leg gets the full budget.
pub fn route_through(
    waypoints: &[Tile],
    occupancy: &OccupancyIndex,
    limits: RouteLimits,
) -> Result<Vec<Tile>, RouteFailure> {
    let mut path: Vec<Tile> = Vec::new();
    for pair in waypoints.windows(2) {
        let leg = route_tiles(pair[0], pair[1], occupancy, limits)?;
        let skip = usize::from(!path.is_empty());
        path.extend(leg.into_iter().skip(skip));
    }
    if path.is_empty() {
        path.extend(waypoints.first().copied());
    }
    Ok(path)
}
