//! Editor interaction state
//!
//! The editor's UI state is an explicit value: every pointer event is a pure
//! transition from one [`UiState`] (plus the current model and scene) to the
//! next, optionally carrying a new model snapshot.

mod place_icon;

pub use place_icon::{
    cancel, choose_icon, disarm, handle, pointer_down, pointer_up, PlacementContext,
};

use uuid::Uuid;

use crate::model::{Model, Tile};

/// Interaction mode of the editor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// An icon chosen from the menu, waiting to be dropped onto the grid.
    /// `None` once the icon has been placed.
    IconPending { icon_id: Option<String> },
    /// Plain pointer mode, remembering the item pressed on (if any)
    Cursor { mousedown_item: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Up,
    Move,
}

/// A pointer event already mapped onto the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub tile: Tile,
    /// Whether the event happened over the diagram surface rather than a
    /// menu or other overlay
    pub on_renderer: bool,
}

impl PointerEvent {
    pub fn down(tile: Tile) -> Self {
        Self {
            kind: PointerKind::Down,
            tile,
            on_renderer: true,
        }
    }

    pub fn up(tile: Tile) -> Self {
        Self {
            kind: PointerKind::Up,
            tile,
            on_renderer: true,
        }
    }

    pub fn moved(tile: Tile) -> Self {
        Self {
            kind: PointerKind::Move,
            tile,
            on_renderer: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    pub mode: Mode,
    /// Item whose context controls are open
    pub item_controls: Option<String>,
}

impl UiState {
    /// Icon currently armed for placement
    pub fn armed_icon(&self) -> Option<&str> {
        match &self.mode {
            Mode::IconPending { icon_id } => icon_id.as_deref(),
            _ => None,
        }
    }
}

/// Observable result of an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed { item_id: String, tile: Tile },
    /// No free tile within the search radius; nothing was placed
    GridExhausted,
    /// The event did not lead to a placement attempt
    Ignored,
}

/// Result of one interaction step
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub ui: UiState,
    /// Replacement model snapshot, when the step mutated the model
    pub model: Option<Model>,
    pub outcome: PlacementOutcome,
}

impl Transition {
    /// A step that only changes (or keeps) the UI state
    pub fn ui_only(ui: UiState) -> Self {
        Self {
            ui,
            model: None,
            outcome: PlacementOutcome::Ignored,
        }
    }
}

/// Source of fresh item ids
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Predictable ids (`item-1`, `item-2`, ...), for tests and scripted runs
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("item")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::default();
        assert_eq!(ids.next_id(), "item-1");
        assert_eq!(ids.next_id(), "item-2");
    }

    #[test]
    fn test_uuid_ids_are_distinct() {
        let mut ids = UuidGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn test_armed_icon() {
        let ui = UiState {
            mode: Mode::IconPending {
                icon_id: Some("server".to_string()),
            },
            item_controls: None,
        };
        assert_eq!(ui.armed_icon(), Some("server"));
        assert_eq!(UiState::default().armed_icon(), None);
    }
}
