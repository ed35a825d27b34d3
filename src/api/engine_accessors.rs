use tracing::debug;

use crate::annotation::{
    ActionSink, Annotation, AnnotationId, AnnotationStore, CommandStack, CoordinateMapper,
    HitTarget, SnapConfig, hit_test,
};
use crate::core::{ChartAxes, ScreenPoint};
use crate::error::AnnotationResult;
use crate::interaction::{DraftOutcome, GestureState, Tool, cancel_draft};
use crate::render::{RedrawReason, Renderer};
use crate::telemetry::Diagnostics;

use super::{AnnotationEngine, AnnotationEngineConfig};

impl<R: Renderer, A: ChartAxes, S: ActionSink> AnnotationEngine<R, A, S> {
    #[must_use]
    pub fn config(&self) -> &AnnotationEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    #[must_use]
    pub fn annotations(&self) -> Vec<Annotation> {
        self.store.to_vec()
    }

    #[must_use]
    pub fn history(&self) -> &CommandStack {
        &self.history
    }

    #[must_use]
    pub fn axes(&self) -> &A {
        &self.axes
    }

    /// Mutates the host axes and invalidates everything derived from them.
    pub fn update_axes<T>(&mut self, update: impl FnOnce(&mut A) -> T) -> T {
        let result = update(&mut self.axes);
        self.on_visible_range_changed();
        result
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    #[must_use]
    pub fn gesture(&self) -> GestureState {
        if self.store.draft().is_some() {
            GestureState::Drafting
        } else if self.drag.is_active() {
            GestureState::Dragging
        } else {
            GestureState::Idle
        }
    }

    #[must_use]
    pub fn draft(&self) -> Option<&Annotation> {
        self.store.draft()
    }

    /// Uncommitted geometry of the annotation being dragged.
    #[must_use]
    pub fn drag_preview(&self) -> Option<&Annotation> {
        self.drag.live()
    }

    #[must_use]
    pub fn tool(&self) -> Option<Tool> {
        self.interaction.tool()
    }

    /// Switches tools, cancelling any gesture in progress.
    pub fn set_tool(&mut self, tool: Option<Tool>) {
        if self.interaction.tool() == tool {
            return;
        }
        self.cancel_gesture();
        debug!(?tool, "tool changed");
        self.interaction.set_tool(tool);
    }

    #[must_use]
    pub fn snap_config(&self) -> SnapConfig {
        self.config.snap
    }

    pub fn set_snap_config(&mut self, snap: SnapConfig) -> AnnotationResult<()> {
        self.config.snap = snap.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn selected(&self) -> Option<&AnnotationId> {
        self.interaction.selected()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&HitTarget> {
        self.interaction.hovered()
    }

    /// Selects a stored annotation. Unknown ids are ignored.
    pub fn select(&mut self, id: &AnnotationId) -> bool {
        if !self.store.contains(id) {
            return false;
        }
        let changed = self.interaction.select(id.clone());
        if changed {
            self.request_redraw(RedrawReason::Selection);
        }
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.interaction.clear_selection();
        if changed {
            self.request_redraw(RedrawReason::Selection);
        }
        changed
    }

    /// Hit test at `point` against the current frame's geometry.
    pub fn hit_test_at(&mut self, point: ScreenPoint) -> Option<HitTarget> {
        self.ensure_screen_cache();
        let mapper = CoordinateMapper::new(&self.axes, self.config.snap);
        hit_test(
            point,
            &self.store,
            self.interaction.selected(),
            &mapper,
            &self.cache,
            self.config.hit_tolerance_px,
        )
    }

    pub(super) fn ensure_screen_cache(&mut self) {
        if !self.cache.is_valid() {
            let mapper = CoordinateMapper::new(&self.axes, self.config.snap);
            self.cache.rebuild(&self.store, &mapper);
        }
    }

    /// Drops any draft or drag without emitting a command.
    pub(super) fn cancel_gesture(&mut self) -> bool {
        let cancelled_draft = cancel_draft(&mut self.store) == DraftOutcome::Discarded;
        let cancelled_drag = self.drag.cancel();
        if cancelled_draft || cancelled_drag {
            debug!(cancelled_draft, cancelled_drag, "gesture cancelled");
            self.request_redraw(RedrawReason::Gesture);
            return true;
        }
        false
    }
}
