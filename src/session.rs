//! A single editing session
//!
//! [`Editor`] owns the current model snapshot, the scene of the active view
//! and the interaction state. Model mutations build a complete new snapshot
//! which is swapped in whole, after which the scene is re-synced; readers
//! holding an earlier `Arc<Model>` keep seeing the old snapshot.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::interaction::{
    self, IdGenerator, PlacementContext, PlacementOutcome, PointerEvent, UiState, UuidGenerator,
};
use crate::model::{Icon, Model, ModelError, Tile, View};
use crate::scene::{self, Scene};

pub struct Editor {
    model: Arc<Model>,
    scene: Scene,
    ui: UiState,
    view_id: String,
    config: EditorConfig,
    ids: Box<dyn IdGenerator>,
}

impl Editor {
    /// Open a session on a model, showing its first view. A model without
    /// views gets a default one.
    pub fn new(model: Model, config: EditorConfig) -> Self {
        Self::with_ids(model, config, Box::new(UuidGenerator))
    }

    pub fn with_ids(mut model: Model, config: EditorConfig, mut ids: Box<dyn IdGenerator>) -> Self {
        if model.views.is_empty() {
            model
                .views
                .push(View::new(ids.next_id(), config.default_view_name.clone()));
        }
        let view_id = model
            .views
            .first()
            .map(|view| view.id.clone())
            .unwrap_or_default();
        let scene = scene::sync(&view_id, &model, &config);

        Self {
            model: Arc::new(model),
            scene,
            ui: UiState::default(),
            view_id,
            config,
            ids,
        }
    }

    /// Current model snapshot
    pub fn model(&self) -> Arc<Model> {
        Arc::clone(&self.model)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn active_view(&self) -> &str {
        &self.view_id
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Switch the active view and rebuild its scene
    pub fn change_view(&mut self, view_id: &str) -> Result<(), ModelError> {
        if self.model.view(view_id).is_none() {
            return Err(ModelError::UnknownView {
                id: view_id.to_string(),
            });
        }
        self.view_id = view_id.to_string();
        self.resync();
        Ok(())
    }

    pub fn choose_icon(&mut self, icon_id: &str) {
        self.ui = interaction::choose_icon(&self.ui, icon_id);
    }

    pub fn cancel(&mut self) {
        self.ui = interaction::cancel(&self.ui);
    }

    /// Feed one pointer event through the interaction state machine. A failed
    /// placement still spends the armed icon.
    pub fn handle(&mut self, event: PointerEvent) -> Result<PlacementOutcome, ModelError> {
        let model = Arc::clone(&self.model);
        let step = interaction::handle(
            &self.ui,
            event,
            PlacementContext {
                model: &model,
                scene: &self.scene,
                view_id: &self.view_id,
                config: &self.config,
            },
            self.ids.as_mut(),
        );
        let step = match step {
            Ok(step) => step,
            Err(err) => {
                warn!(error = %err, "Placement failed");
                self.ui = interaction::disarm(&self.ui);
                return Err(err);
            }
        };

        self.ui = step.ui;
        if let Some(next) = step.model {
            self.replace_model(next);
        }
        Ok(step.outcome)
    }

    /// Arm an icon and drop it at `tile` in one go
    pub fn place_at(&mut self, icon_id: &str, tile: Tile) -> Result<PlacementOutcome, ModelError> {
        self.choose_icon(icon_id);
        self.handle(PointerEvent::down(tile))?;
        self.handle(PointerEvent::up(tile))
    }

    /// Swap in a new icon list, as after a catalog reload
    pub fn replace_icons(&mut self, icons: Vec<Icon>) {
        info!(count = icons.len(), "Replacing model icons");
        let next = self.model.with_icons(icons);
        self.replace_model(next);
    }

    fn replace_model(&mut self, next: Model) {
        self.model = Arc::new(next);
        self.resync();
    }

    fn resync(&mut self) {
        self.scene = scene::sync(&self.view_id, &self.model, &self.config);
        debug!(
            view = %self.view_id,
            nodes = self.scene.nodes.len(),
            "Scene synced"
        );
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("view_id", &self.view_id)
            .field("ui", &self.ui)
            .field("items", &self.model.items.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{Mode, SequentialIds};

    fn editor(model: Model) -> Editor {
        Editor::with_ids(model, EditorConfig::default(), Box::new(SequentialIds::default()))
    }

    fn model() -> Model {
        let mut model = Model::new("Test");
        model.icons.push(Icon::new("server", "Server", "s.svg"));
        model.views.push(View::new("v1", "Main"));
        model.views.push(View::new("v2", "Other"));
        model
    }

    #[test]
    fn test_default_view_created() {
        let editor = editor(Model::new("Empty"));
        assert_eq!(editor.model().views.len(), 1);
        assert_eq!(editor.active_view(), "item-1");
        assert_eq!(editor.model().views[0].name, "Untitled view");
    }

    #[test]
    fn test_place_swaps_snapshot() {
        let mut editor = editor(model());
        let before = editor.model();

        let outcome = editor.place_at("server", Tile::new(0, 0)).unwrap();
        assert!(matches!(outcome, PlacementOutcome::Placed { .. }));
        assert!(before.items.is_empty());
        assert_eq!(editor.model().items.len(), 1);
        assert!(editor.scene().is_occupied(Tile::new(0, 0)));
        assert_eq!(editor.ui().mode, Mode::IconPending { icon_id: None });
    }

    /// Hands out the same id every time
    struct RepeatingIds;

    impl IdGenerator for RepeatingIds {
        fn next_id(&mut self) -> String {
            "item-1".to_string()
        }
    }

    #[test]
    fn test_failed_placement_disarms() {
        let mut editor = Editor::with_ids(model(), EditorConfig::default(), Box::new(RepeatingIds));
        editor.place_at("server", Tile::new(0, 0)).unwrap();

        let err = editor.place_at("server", Tile::new(3, 3)).unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateItem {
                id: "item-1".to_string()
            }
        );
        assert_eq!(editor.ui().mode, Mode::IconPending { icon_id: None });
        assert_eq!(editor.model().items.len(), 1);
    }

    #[test]
    fn test_change_view_resyncs() {
        let mut editor = editor(model());
        editor.place_at("server", Tile::new(0, 0)).unwrap();
        editor.change_view("v2").unwrap();
        assert_eq!(editor.active_view(), "v2");
        assert!(editor.scene().nodes.is_empty());

        assert!(editor.change_view("missing").is_err());
        assert_eq!(editor.active_view(), "v2");
    }

    #[test]
    fn test_replace_icons_marks_missing() {
        let mut editor = editor(model());
        editor.place_at("server", Tile::new(0, 0)).unwrap();
        editor.replace_icons(Vec::new());
        assert_eq!(editor.model().unresolved_icons().len(), 1);
        assert!(matches!(
            editor.scene().nodes[0].icon,
            crate::scene::NodeIcon::Missing { .. }
        ));
    }
}
