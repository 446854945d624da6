//! Scene derivation from the model

use std::collections::HashMap;

use tracing::{debug, warn};

use super::{
    route_through, tile_position, IconGeometry, NodeIcon, OccupancyIndex, Projection, RouteFailure,
    Scene, SceneConnector, SceneNode, UnroutableConnector, UnroutableReason,
};
use crate::config::EditorConfig;
use crate::model::{AnchorRef, Connector, Icon, Model, Tile, View};

/// Share of the tile width an isometric icon spans at scale 1
const ISOMETRIC_ICON_WIDTH: f64 = 0.8;

/// Share of the tile width a flat icon spans at scale 1
const FLAT_ICON_WIDTH: f64 = 0.7;

/// Rebuild the scene of one view.
///
/// Pure and total: the same model and view id always produce the same scene,
/// and an unknown view produces an empty one.
pub fn sync(view_id: &str, model: &Model, config: &EditorConfig) -> Scene {
    let Some(view) = model.view(view_id) else {
        debug!(view = view_id, "View not found, scene is empty");
        return Scene::empty(view_id, config.search_radius);
    };

    let occupancy = OccupancyIndex::from_view_items(&view.items);
    if occupancy.len() < view.items.len() {
        warn!(
            view = view_id,
            items = view.items.len(),
            tiles = occupancy.len(),
            "View has items sharing a tile"
        );
    }

    let nodes: Vec<SceneNode> = view
        .items
        .iter()
        .map(|view_item| {
            let item = model.item(&view_item.id);
            let icon_id = item.and_then(|item| item.icon.clone());
            let icon = match icon_id.as_deref().and_then(|id| model.icon(id)) {
                Some(icon) => NodeIcon::Resolved(icon_geometry(icon, config)),
                None => NodeIcon::Missing { icon_id },
            };
            SceneNode {
                item_id: view_item.id.clone(),
                name: item.map(|i| i.name.clone()).unwrap_or_default(),
                tile: view_item.tile,
                position: tile_position(view_item.tile, config.tile_size),
                label_height: view_item.label_height,
                icon,
            }
        })
        .collect();

    let mut connectors = Vec::new();
    let mut unroutable = Vec::new();
    for connector in &view.connectors {
        match route_connector(connector, view, &occupancy, config) {
            Ok(routed) => connectors.push(routed),
            Err(reason) => {
                debug!(connector = %connector.id, ?reason, "Connector not routed");
                unroutable.push(UnroutableConnector {
                    id: connector.id.clone(),
                    reason,
                });
            }
        }
    }

    Scene {
        view_id: view_id.to_string(),
        nodes,
        connectors,
        unroutable,
        occupancy,
        search_radius: config.search_radius,
    }
}

fn icon_geometry(icon: &Icon, config: &EditorConfig) -> IconGeometry {
    let (projection, share) = if icon.renders_isometric() {
        (Projection::Isometric, ISOMETRIC_ICON_WIDTH)
    } else {
        (Projection::Flat, FLAT_ICON_WIDTH)
    };
    let axis = |flipped: Option<bool>| if flipped.unwrap_or(false) { -1.0 } else { 1.0 };

    IconGeometry {
        icon_id: icon.id.clone(),
        url: icon.url.clone(),
        projection,
        width: config.tile_size.width * share * icon.effective_scale(),
        scale_x: axis(icon.flip_x),
        scale_y: axis(icon.flip_y),
    }
}

fn route_connector(
    connector: &Connector,
    view: &View,
    occupancy: &OccupancyIndex,
    config: &EditorConfig,
) -> Result<SceneConnector, UnroutableReason> {
    // Anchor ids across the whole view, for anchor-to-anchor references
    let anchors: HashMap<&str, &AnchorRef> = view
        .connectors
        .iter()
        .flat_map(|c| c.anchors.iter())
        .map(|a| (a.id.as_str(), &a.reference))
        .collect();

    let waypoints = connector
        .anchors
        .iter()
        .map(|anchor| {
            anchor_tile(&anchor.reference, view, &anchors).ok_or_else(|| {
                UnroutableReason::DanglingAnchor {
                    anchor_id: anchor.id.clone(),
                }
            })
        })
        .collect::<Result<Vec<Tile>, _>>()?;

    if waypoints.len() < 2 {
        return Err(UnroutableReason::TooFewAnchors);
    }

    let tiles =
        route_through(&waypoints, occupancy, config.route_limits()).map_err(|failure| match failure {
            RouteFailure::Blocked => UnroutableReason::Blocked,
            RouteFailure::BudgetExceeded => UnroutableReason::BudgetExceeded,
        })?;
    let points = tiles
        .iter()
        .map(|tile| tile_position(*tile, config.tile_size))
        .collect();

    Ok(SceneConnector {
        id: connector.id.clone(),
        color: connector.color.clone(),
        style: connector.style,
        tiles,
        points,
    })
}

/// Tile an anchor points at. Anchor-to-anchor references follow one hop.
fn anchor_tile(
    reference: &AnchorRef,
    view: &View,
    anchors: &HashMap<&str, &AnchorRef>,
) -> Option<Tile> {
    direct_tile(reference, view).or_else(|| {
        let target = anchors.get(reference.anchor.as_deref()?)?;
        direct_tile(target, view)
    })
}

fn direct_tile(reference: &AnchorRef, view: &View) -> Option<Tile> {
    if let Some(item_id) = reference.item.as_deref() {
        return view
            .items
            .iter()
            .find(|item| item.id == item_id)
            .map(|item| item.tile);
    }
    reference.tile
}
