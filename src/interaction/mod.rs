mod arbiter;
mod drag;
mod draft;

pub use arbiter::{ArbiterContext, ArbiterDecision, ArbiterHit, ArbiterRoute, decide};
pub use drag::{DragController, DragOutcome};
pub use draft::{DraftOutcome, begin_draft, cancel_draft, finish_draft, update_draft};

use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationId, AnnotationKind, AnnotationStore, HitTarget};
use crate::core::ScreenPoint;

/// Active annotation tool. `None` at the engine level means plain
/// select/drag mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    HorizontalLine,
    TrendLine,
    Rectangle,
    Eraser,
}

impl Tool {
    /// Annotation kind created by this tool; `None` for the eraser.
    #[must_use]
    pub const fn annotation_kind(self) -> Option<AnnotationKind> {
        match self {
            Self::HorizontalLine => Some(AnnotationKind::HorizontalLine),
            Self::TrendLine => Some(AnnotationKind::TrendLine),
            Self::Rectangle => Some(AnnotationKind::Rectangle),
            Self::Eraser => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    /// Pointer cancel or loss of pointer capture.
    Cancel,
    Leave,
}

/// Pointer event in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self { kind, x, y }
    }

    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down, x, y)
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Up, x, y)
    }

    #[must_use]
    pub const fn cancel() -> Self {
        Self::new(PointerEventKind::Cancel, 0.0, 0.0)
    }

    #[must_use]
    pub const fn leave() -> Self {
        Self::new(PointerEventKind::Leave, 0.0, 0.0)
    }

    #[must_use]
    pub const fn position(self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }
}

/// Gesture currently owning the pointer stream. At most one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GestureState {
    #[default]
    Idle,
    Drafting,
    Dragging,
}

impl GestureState {
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Tool, selection, hover and cursor state shared by every gesture.
///
/// Hover is recomputed lazily: pointer moves only record the latest cursor
/// and mark hover stale; the next frame resolves it once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    tool: Option<Tool>,
    selected: Option<AnnotationId>,
    hovered: Option<HitTarget>,
    cursor: Option<ScreenPoint>,
    hover_stale: bool,
}

impl InteractionState {
    #[must_use]
    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Option<Tool>) {
        self.tool = tool;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&AnnotationId> {
        self.selected.as_ref()
    }

    /// Returns `true` when the selection changed.
    pub fn select(&mut self, id: AnnotationId) -> bool {
        if self.selected.as_ref() == Some(&id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selected.take().is_some()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&HitTarget> {
        self.hovered.as_ref()
    }

    /// Returns `true` when the hover target changed.
    pub fn set_hovered(&mut self, hovered: Option<HitTarget>) -> bool {
        if self.hovered == hovered {
            return false;
        }
        self.hovered = hovered;
        true
    }

    #[must_use]
    pub fn cursor(&self) -> Option<ScreenPoint> {
        self.cursor
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.cursor = Some(ScreenPoint::new(x, y));
        self.hover_stale = true;
    }

    /// Forgets the cursor and hover. Returns `true` when something was
    /// hovered.
    pub fn on_pointer_leave(&mut self) -> bool {
        self.cursor = None;
        self.hover_stale = false;
        self.hovered.take().is_some()
    }

    /// Latest cursor when hover needs recomputing; clears the stale flag.
    pub fn take_stale_cursor(&mut self) -> Option<ScreenPoint> {
        if !std::mem::take(&mut self.hover_stale) {
            return None;
        }
        self.cursor
    }

    pub fn mark_hover_stale(&mut self) {
        self.hover_stale = self.cursor.is_some();
    }

    /// Drops selection and hover that point at annotations no longer in
    /// `store`. Returns `true` when anything was cleared.
    pub fn retain_existing(&mut self, store: &AnnotationStore) -> bool {
        let mut changed = false;
        if self.selected.as_ref().is_some_and(|id| !store.contains(id)) {
            self.selected = None;
            changed = true;
        }
        if self.hovered.as_ref().is_some_and(|hover| !store.contains(&hover.id)) {
            self.hovered = None;
            changed = true;
        }
        changed
    }
}
