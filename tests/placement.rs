//! Integration tests for placement, occupancy and scene sync

use std::collections::HashSet;

use iso_diagram::interaction::{Mode, PointerEvent, SequentialIds};
use iso_diagram::model::{Icon, Model, ModelItem, Tile, View, ViewItem};
use iso_diagram::scene::{ring, sync};
use iso_diagram::{Editor, EditorConfig, PlacementOutcome};
use pretty_assertions::assert_eq;

fn model() -> Model {
    let mut model = Model::new("Placement");
    model.icons.push(Icon::new("server", "Server", "server.svg"));
    model.views.push(View::new("main", "Main"));
    model
}

fn editor(model: Model, config: EditorConfig) -> Editor {
    Editor::with_ids(model, config, Box::new(SequentialIds::new("node")))
}

fn placed_tile(outcome: PlacementOutcome) -> Tile {
    match outcome {
        PlacementOutcome::Placed { tile, .. } => tile,
        other => panic!("expected a placement, got {other:?}"),
    }
}

#[test]
fn test_drop_on_occupied_tile_moves_to_nearest_free() {
    let mut editor = editor(model(), EditorConfig::default());
    assert_eq!(placed_tile(editor.place_at("server", Tile::new(0, 0)).unwrap()), Tile::new(0, 0));

    // First tile of ring 1 in scan order
    assert_eq!(placed_tile(editor.place_at("server", Tile::new(0, 0)).unwrap()), Tile::new(-1, -1));
    assert_eq!(placed_tile(editor.place_at("server", Tile::new(0, 0)).unwrap()), Tile::new(0, -1));
}

#[test]
fn test_no_two_items_share_a_tile() {
    let mut editor = editor(model(), EditorConfig::default());
    for _ in 0..30 {
        editor.place_at("server", Tile::new(2, 2)).unwrap();
    }

    let model = editor.model();
    let view = model.view("main").expect("view exists");
    let tiles: HashSet<Tile> = view.items.iter().map(|i| i.tile).collect();
    assert_eq!(view.items.len(), 30);
    assert_eq!(tiles.len(), 30);
    assert!(model.tile_conflicts("main").is_empty());

    // 1 + 8 + 16 tiles fill rings 0..=2; the rest spill into ring 3
    let center = Tile::new(2, 2);
    let max_ring = tiles.iter().map(|t| center.chebyshev_distance(*t)).max();
    assert_eq!(max_ring, Some(3));
}

#[test]
fn test_grid_exhausted_is_a_no_op() {
    let config = EditorConfig::default().with_search_radius(1);
    let mut editor = editor(model(), config);
    for _ in 0..9 {
        editor.place_at("server", Tile::new(0, 0)).unwrap();
    }
    let before = editor.model();

    let outcome = editor.place_at("server", Tile::new(0, 0)).unwrap();
    assert_eq!(outcome, PlacementOutcome::GridExhausted);
    assert_eq!(*editor.model(), *before);
    assert_eq!(editor.ui().mode, Mode::IconPending { icon_id: None });
}

#[test]
fn test_unknown_icon_gets_untitled_name() {
    let mut editor = editor(model(), EditorConfig::default());
    editor.place_at("not-in-model", Tile::new(4, 4)).unwrap();

    let model = editor.model();
    assert_eq!(model.items[0].name, "Untitled");
    assert_eq!(model.unresolved_icons().len(), 1);
}

#[test]
fn test_pointer_flow_and_cancel() {
    let mut editor = editor(model(), EditorConfig::default());

    editor.choose_icon("server");
    editor.handle(PointerEvent::down(Tile::new(1, 1))).unwrap();
    assert_eq!(editor.ui().armed_icon(), Some("server"));
    let outcome = editor.handle(PointerEvent::up(Tile::new(1, 1))).unwrap();
    assert_eq!(
        outcome,
        PlacementOutcome::Placed {
            item_id: "node-1".to_string(),
            tile: Tile::new(1, 1)
        }
    );

    // Disarmed: a second release places nothing
    let outcome = editor.handle(PointerEvent::up(Tile::new(1, 1))).unwrap();
    assert_eq!(outcome, PlacementOutcome::Ignored);

    // Pressing now switches to cursor mode over the placed item
    editor.handle(PointerEvent::down(Tile::new(1, 1))).unwrap();
    assert_eq!(
        editor.ui().mode,
        Mode::Cursor {
            mousedown_item: Some("node-1".to_string())
        }
    );

    editor.choose_icon("server");
    editor.cancel();
    assert_eq!(editor.ui().mode, Mode::Idle);
    let outcome = editor.handle(PointerEvent::up(Tile::new(5, 5))).unwrap();
    assert_eq!(outcome, PlacementOutcome::Ignored);
    assert_eq!(editor.model().items.len(), 1);
}

#[test]
fn test_scene_occupancy_matches_view() {
    let mut model = model();
    for (n, tile) in ring(Tile::new(0, 0), 1).enumerate() {
        let id = format!("r{n}");
        model.items.push(ModelItem {
            id: id.clone(),
            name: id.clone(),
            description: None,
            icon: Some("server".to_string()),
        });
        model.views[0].items.push(ViewItem {
            id,
            tile,
            label_height: 80,
        });
    }

    let scene = sync("main", &model, &EditorConfig::default());
    assert_eq!(scene.occupancy.len(), 8);
    assert!(!scene.is_occupied(Tile::new(0, 0)));
    assert_eq!(scene.nearest_unoccupied(Tile::new(0, 0), None), Some(Tile::new(0, 0)));
    assert_eq!(
        scene.nearest_unoccupied(Tile::new(1, 1), Some(0)),
        None
    );
    assert_eq!(scene, sync("main", &model, &EditorConfig::default()));
}
