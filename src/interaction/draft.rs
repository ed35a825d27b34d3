//! Creation flow for tool-driven drafts.
//!
//! The draft lives in the store's draft slot and is never part of the
//! committed annotation list. Callers map pointer positions first and pass
//! `None` when the mapping failed; the step is then skipped without
//! disturbing the draft.

use tracing::trace;

use crate::annotation::{AnchorPoint, Annotation, AnnotationId, AnnotationKind, AnnotationStore, AnnotationStyle, Command};

#[derive(Debug, Clone, PartialEq)]
pub enum DraftOutcome {
    /// A two-point draft now occupies the draft slot.
    Started,
    Updated,
    /// Mapping failed; nothing changed.
    Skipped,
    /// The gesture produced an annotation to push as an `Add` command.
    Commit(Command),
    /// The draft was dropped without a command.
    Discarded,
    /// No draft was in progress.
    Inactive,
}

/// Starts a draft of `kind` at `point`. Horizontal lines commit immediately.
pub fn begin_draft(
    store: &mut AnnotationStore,
    kind: AnnotationKind,
    point: Option<AnchorPoint>,
    style: AnnotationStyle,
) -> DraftOutcome {
    let Some(point) = point else {
        return DraftOutcome::Skipped;
    };
    let points = std::iter::repeat_n(point, kind.point_count());
    let Ok(annotation) = Annotation::new(AnnotationId::generate(), kind, points) else {
        return DraftOutcome::Skipped;
    };
    let annotation = annotation.with_style(style);

    if kind == AnnotationKind::HorizontalLine {
        trace!(id = %annotation.id(), "horizontal line placed");
        return DraftOutcome::Commit(Command::Add(annotation));
    }
    trace!(id = %annotation.id(), ?kind, "draft started");
    store.set_draft(annotation);
    DraftOutcome::Started
}

/// Moves the trailing anchor of the draft to `point`.
pub fn update_draft(store: &mut AnnotationStore, point: Option<AnchorPoint>) -> DraftOutcome {
    let Some(draft) = store.draft_mut() else {
        return DraftOutcome::Inactive;
    };
    let Some(point) = point else {
        return DraftOutcome::Skipped;
    };
    let last = draft.points().len() - 1;
    draft.set_point(last, point);
    DraftOutcome::Updated
}

/// Ends the gesture. Degenerate drafts are discarded.
pub fn finish_draft(store: &mut AnnotationStore) -> DraftOutcome {
    match store.take_draft() {
        None => DraftOutcome::Inactive,
        Some(draft) if draft.is_degenerate() => {
            trace!(id = %draft.id(), "degenerate draft discarded");
            DraftOutcome::Discarded
        }
        Some(draft) => DraftOutcome::Commit(Command::Add(draft)),
    }
}

pub fn cancel_draft(store: &mut AnnotationStore) -> DraftOutcome {
    match store.take_draft() {
        Some(_) => DraftOutcome::Discarded,
        None => DraftOutcome::Inactive,
    }
}
