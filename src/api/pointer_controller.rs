use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::annotation::{ActionSink, ApplyOutcome, Command, CoordinateMapper, HitTarget};
use crate::core::{ChartAxes, ScreenPoint};
use crate::interaction::{
    ArbiterContext, ArbiterHit, ArbiterRoute, DragOutcome, DraftOutcome, PointerEvent,
    PointerEventKind, Tool, begin_draft, decide, finish_draft, update_draft,
};
use crate::render::{RedrawReason, Renderer};
use crate::telemetry::WarningCode;

use super::AnnotationEngine;

/// What the host must do with a pointer event after the engine saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerResponse {
    /// Stop propagation: the host chart must not see this event.
    pub consumed: bool,
    /// A new animation frame must be requested.
    pub frame_requested: bool,
}

impl<R: Renderer, A: ChartAxes, S: ActionSink> AnnotationEngine<R, A, S> {
    /// Routes one pointer event through the arbiter and applies the result.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> PointerResponse {
        let was_pending = self.scheduler.is_pending();
        if event.kind == PointerEventKind::Move {
            self.interaction.on_pointer_move(event.x, event.y);
        }

        let gesture = self.gesture();
        let tool = self.interaction.tool();
        let needs_hit = event.kind == PointerEventKind::Down
            && !gesture.is_active()
            && tool.is_none_or(|tool| tool == Tool::Eraser);
        let hit = if needs_hit {
            self.arbiter_hit(event.position())
        } else {
            None
        };
        let ctx = ArbiterContext {
            gesture,
            tool,
            hit,
            has_selection: self.interaction.selected().is_some(),
        };
        let decision = decide(&event, &ctx);
        trace!(kind = ?event.kind, route = ?decision.route, consumed = decision.consumed, "pointer event");

        self.apply_route(decision.route, event.position());

        PointerResponse {
            consumed: decision.consumed,
            frame_requested: !was_pending && self.scheduler.is_pending(),
        }
    }

    fn arbiter_hit(&mut self, position: ScreenPoint) -> Option<ArbiterHit> {
        let target = self.hit_test_at(position)?;
        let locked = self.store.get(&target.id)?.is_locked();
        Some(ArbiterHit { target, locked })
    }

    fn apply_route(&mut self, route: ArbiterRoute, position: ScreenPoint) {
        match route {
            ArbiterRoute::StartDraft(kind) => {
                let mapper = CoordinateMapper::new(&self.axes, self.config.snap);
                let point = mapper.from_screen(position, true);
                match begin_draft(&mut self.store, kind, point, self.config.default_style) {
                    DraftOutcome::Commit(command) => self.push_command(command),
                    DraftOutcome::Skipped => self.warn_draft_unmappable(position),
                    _ => {
                        self.request_redraw(RedrawReason::Gesture);
                    }
                }
            }
            ArbiterRoute::ContinueDraft => {
                let mapper = CoordinateMapper::new(&self.axes, self.config.snap);
                let point = mapper.from_screen(position, true);
                match update_draft(&mut self.store, point) {
                    DraftOutcome::Updated => {
                        self.request_redraw(RedrawReason::Gesture);
                    }
                    DraftOutcome::Skipped => self.warn_draft_unmappable(position),
                    _ => {}
                }
            }
            ArbiterRoute::CommitDraft => match finish_draft(&mut self.store) {
                DraftOutcome::Commit(command) => self.push_command(command),
                DraftOutcome::Discarded => {
                    self.request_redraw(RedrawReason::Gesture);
                }
                _ => {}
            },
            ArbiterRoute::StartDrag(target) => self.start_drag(target, position),
            ArbiterRoute::ContinueDrag => {
                let mapper = CoordinateMapper::new(&self.axes, self.config.snap);
                match self.drag.move_to(position, &mapper) {
                    DragOutcome::Moved => {
                        self.request_redraw(RedrawReason::Gesture);
                    }
                    DragOutcome::Skipped => {
                        let identity = self
                            .drag
                            .target_id()
                            .map(ToString::to_string)
                            .unwrap_or_default();
                        self.diagnostics.warn(
                            WarningCode::DragPointUnmappable,
                            &identity,
                            format!("drag position ({:.1}, {:.1}) cannot be mapped", position.x, position.y),
                        );
                    }
                    DragOutcome::Inactive => {}
                }
            }
            ArbiterRoute::CommitDrag => match self.drag.finish() {
                Some(command) => self.push_command(command),
                None => {
                    self.request_redraw(RedrawReason::Gesture);
                }
            },
            ArbiterRoute::Abort => {
                self.cancel_gesture();
            }
            ArbiterRoute::Erase(id) => {
                if let Some(annotation) = self.store.get(&id).cloned() {
                    self.push_command(Command::Delete(annotation));
                }
            }
            ArbiterRoute::Select(id) => {
                self.select(&id);
            }
            ArbiterRoute::ClearSelection => {
                self.clear_selection();
            }
            ArbiterRoute::Hover => {
                self.request_redraw(RedrawReason::Hover);
            }
            ArbiterRoute::ClearHover => {
                if self.interaction.on_pointer_leave() {
                    self.request_redraw(RedrawReason::Hover);
                }
            }
            ArbiterRoute::Ignore | ArbiterRoute::PassThrough => {}
        }
    }

    fn start_drag(&mut self, target: HitTarget, position: ScreenPoint) {
        self.select(&target.id);
        let Some(annotation) = self.store.get(&target.id) else {
            return;
        };
        if self.drag.begin(annotation, target.handle, position) {
            self.request_redraw(RedrawReason::Gesture);
        }
    }

    fn warn_draft_unmappable(&mut self, position: ScreenPoint) {
        let identity = self
            .store
            .draft()
            .map(|draft| draft.id().to_string())
            .unwrap_or_else(|| "pointer-down".to_owned());
        self.diagnostics.warn(
            WarningCode::DraftPointUnmappable,
            &identity,
            format!("draft position ({:.1}, {:.1}) cannot be mapped", position.x, position.y),
        );
    }

    /// Pushes `command` through the history, mirrors it to the sink and
    /// prunes interaction state that referenced removed annotations.
    pub(super) fn push_command(&mut self, command: Command) {
        let outcome = self.history.push(command, &mut self.store, &mut self.sink);
        self.after_command(outcome);
    }

    pub(super) fn after_command(&mut self, outcome: ApplyOutcome) {
        if let ApplyOutcome::RecoveredMissingTarget(id) = outcome {
            self.diagnostics.warn(
                WarningCode::UpdateTargetMissing,
                id.as_str(),
                "update target missing from store, appended as new",
            );
        }
        self.interaction.retain_existing(&self.store);
        self.interaction.mark_hover_stale();
        self.cache.invalidate();
        self.request_redraw(RedrawReason::Annotations);
    }
}
