use smallvec::SmallVec;
use tracing::trace;

use crate::annotation::{AnchorPoint, Annotation, AnnotationId, Command, CoordinateMapper};
use crate::core::{ChartAxes, ScreenPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Moved,
    /// A required mapping failed; the live geometry is unchanged.
    Skipped,
    Inactive,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    snapshot: Annotation,
    live: Annotation,
    handle: Option<usize>,
    origin: ScreenPoint,
}

/// Modification flow for an existing annotation.
///
/// The store is never touched while dragging: live geometry stays here and is
/// painted as an overlay. Finishing yields an `Update` command when geometry
/// changed; cancelling drops the live copy, so the store keeps the snapshot.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    active: Option<ActiveDrag>,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Live geometry of the dragged annotation.
    #[must_use]
    pub fn live(&self) -> Option<&Annotation> {
        self.active.as_ref().map(|drag| &drag.live)
    }

    #[must_use]
    pub fn target_id(&self) -> Option<&AnnotationId> {
        self.active.as_ref().map(|drag| drag.snapshot.id())
    }

    /// Handle being dragged, `None` for a body drag or when idle.
    #[must_use]
    pub fn handle(&self) -> Option<usize> {
        self.active.as_ref().and_then(|drag| drag.handle)
    }

    /// Starts dragging `annotation` from `origin`. Locked annotations and
    /// out-of-range handles are refused.
    pub fn begin(&mut self, annotation: &Annotation, handle: Option<usize>, origin: ScreenPoint) -> bool {
        if annotation.is_locked() {
            return false;
        }
        if handle.is_some_and(|index| index >= annotation.points().len()) {
            return false;
        }
        trace!(id = %annotation.id(), ?handle, "drag started");
        self.active = Some(ActiveDrag {
            snapshot: annotation.clone(),
            live: annotation.clone(),
            handle,
            origin,
        });
        true
    }

    pub fn move_to<A: ChartAxes + ?Sized>(
        &mut self,
        cursor: ScreenPoint,
        mapper: &CoordinateMapper<'_, A>,
    ) -> DragOutcome {
        let Some(drag) = self.active.as_mut() else {
            return DragOutcome::Inactive;
        };

        match drag.handle {
            Some(index) => {
                let Some(point) = mapper.from_screen(cursor, true) else {
                    return DragOutcome::Skipped;
                };
                drag.live.set_point(index, point);
            }
            None => {
                let dx = cursor.x - drag.origin.x;
                let dy = cursor.y - drag.origin.y;
                let moved: Option<SmallVec<[AnchorPoint; 2]>> = drag
                    .snapshot
                    .points()
                    .iter()
                    .map(|point| {
                        let start = mapper.to_screen(*point)?;
                        mapper.from_screen(start.offset(dx, dy), false)
                    })
                    .collect();
                let Some(moved) = moved else {
                    return DragOutcome::Skipped;
                };
                drag.live.set_points(&moved);
            }
        }
        DragOutcome::Moved
    }

    /// Ends the drag, returning an `Update` when any anchor moved.
    pub fn finish(&mut self) -> Option<Command> {
        let drag = self.active.take()?;
        if drag.live.same_geometry(&drag.snapshot) {
            trace!(id = %drag.snapshot.id(), "drag ended without change");
            return None;
        }
        Some(Command::Update {
            prev: drag.snapshot,
            next: drag.live,
        })
    }

    /// Drops the live geometry. Returns whether a drag was active.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }
}
