//! Icon placement mode
//!
//! `choose_icon` arms an icon. Releasing drops the armed icon on the nearest
//! free tile to the pointer; pressing once the icon is spent switches to
//! cursor mode and closes any open item controls. This is the only way new items enter the model, and it never
//! places onto an occupied tile.

use tracing::{debug, info};

use super::{IdGenerator, Mode, PlacementOutcome, PointerEvent, PointerKind, Transition, UiState};
use crate::config::EditorConfig;
use crate::model::{Model, ModelError, ModelItem, Tile, ViewItem};
use crate::scene::Scene;

/// Everything a placement step reads
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    pub model: &'a Model,
    pub scene: &'a Scene,
    pub view_id: &'a str,
    pub config: &'a EditorConfig,
}

/// Arm an icon for placement, whatever the current mode
pub fn choose_icon(ui: &UiState, icon_id: &str) -> UiState {
    UiState {
        mode: Mode::IconPending {
            icon_id: Some(icon_id.to_string()),
        },
        item_controls: ui.item_controls.clone(),
    }
}

/// Leave the current mode without side effects
pub fn cancel(ui: &UiState) -> UiState {
    UiState {
        mode: Mode::Idle,
        item_controls: ui.item_controls.clone(),
    }
}

/// Spend the armed icon, keeping placement mode
pub fn disarm(ui: &UiState) -> UiState {
    UiState {
        mode: Mode::IconPending { icon_id: None },
        item_controls: ui.item_controls.clone(),
    }
}

/// Dispatch a pointer event to the current mode
pub fn handle(
    ui: &UiState,
    event: PointerEvent,
    ctx: PlacementContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<Transition, ModelError> {
    match event.kind {
        PointerKind::Down => Ok(Transition::ui_only(pointer_down(ui, event, ctx.scene))),
        PointerKind::Up => pointer_up(ui, event, ctx, ids),
        PointerKind::Move => Ok(Transition::ui_only(ui.clone())),
    }
}

pub fn pointer_down(ui: &UiState, event: PointerEvent, scene: &Scene) -> UiState {
    let Mode::IconPending { icon_id } = &ui.mode else {
        return ui.clone();
    };
    if !event.on_renderer {
        return ui.clone();
    }

    if icon_id.is_some() {
        return ui.clone();
    }
    UiState {
        mode: Mode::Cursor {
            mousedown_item: scene.item_at(event.tile).map(str::to_string),
        },
        item_controls: None,
    }
}

pub fn pointer_up(
    ui: &UiState,
    event: PointerEvent,
    ctx: PlacementContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Result<Transition, ModelError> {
    let Some(icon_id) = ui.armed_icon() else {
        return Ok(Transition::ui_only(ui.clone()));
    };

    let disarmed = disarm(ui);

    let Some(tile) = ctx.scene.nearest_unoccupied(event.tile, None) else {
        info!(
            icon = icon_id,
            x = event.tile.x,
            y = event.tile.y,
            radius = ctx.scene.search_radius,
            "No free tile near pointer, icon not placed"
        );
        return Ok(Transition {
            ui: disarmed,
            model: None,
            outcome: PlacementOutcome::GridExhausted,
        });
    };

    let item_id = fresh_id(ctx.model, ids);
    let model = place(ctx, icon_id, &item_id, tile)?;
    debug!(icon = icon_id, item = %item_id, x = tile.x, y = tile.y, "Placed icon");

    Ok(Transition {
        ui: disarmed,
        model: Some(model),
        outcome: PlacementOutcome::Placed { item_id, tile },
    })
}

fn place(
    ctx: PlacementContext<'_>,
    icon_id: &str,
    item_id: &str,
    tile: Tile,
) -> Result<Model, ModelError> {
    let name = ctx
        .model
        .icon(icon_id)
        .map(|icon| icon.name.clone())
        .unwrap_or_else(|| ctx.config.untitled_item_name.clone());

    ctx.model.with_placement(
        ctx.view_id,
        ModelItem {
            id: item_id.to_string(),
            name,
            description: None,
            icon: Some(icon_id.to_string()),
        },
        ViewItem {
            id: item_id.to_string(),
            tile,
            label_height: ctx.config.label_height,
        },
    )
}

/// Draw ids until one is unused. A generator of distinct ids needs at most
/// one draw more than the model has items; one that repeats itself gets its
/// last draw back, which placement then rejects as a duplicate.
fn fresh_id(model: &Model, ids: &mut dyn IdGenerator) -> String {
    let mut id = ids.next_id();
    for _ in 0..model.items.len() {
        if model.item(&id).is_none() {
            break;
        }
        id = ids.next_id();
    }
    id
}
