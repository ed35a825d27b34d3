use tracing::debug;

use crate::annotation::{ActionSink, Annotation, RemoteFrame};
use crate::core::ChartAxes;
use crate::error::AnnotationResult;
use crate::render::{RedrawReason, Renderer};

use super::AnnotationEngine;

impl<R: Renderer, A: ChartAxes, S: ActionSink> AnnotationEngine<R, A, S> {
    /// Replaces the whole store with the authoritative set.
    ///
    /// Selection and hover pointing at removed ids are cleared, and a drag
    /// on a removed annotation is cancelled. History is kept; undoing an
    /// update whose target vanished re-adds it with a warning.
    pub fn set_all(&mut self, annotations: Vec<Annotation>) -> AnnotationResult<()> {
        for annotation in &annotations {
            annotation.validate()?;
        }
        debug!(count = annotations.len(), "remote set-all");
        self.store.set_all(annotations);
        if self
            .drag
            .target_id()
            .is_some_and(|id| !self.store.contains(id))
        {
            self.drag.cancel();
        }
        self.interaction.retain_existing(&self.store);
        self.interaction.mark_hover_stale();
        self.after_reconcile();
        Ok(())
    }

    /// Upserts one annotation by id, last write wins. Selection and hover are
    /// left untouched.
    pub fn confirm(&mut self, annotation: Annotation) -> AnnotationResult<()> {
        annotation.validate()?;
        debug!(id = %annotation.id(), known = self.store.contains(annotation.id()), "remote confirm");
        self.store.insert(annotation);
        self.after_reconcile();
        Ok(())
    }

    pub fn apply_remote_frame(&mut self, frame: RemoteFrame) -> AnnotationResult<()> {
        match frame {
            RemoteFrame::SetAll { annotations } => self.set_all(annotations),
            RemoteFrame::Confirm { annotation } => self.confirm(annotation),
        }
    }

    /// Parses and applies one inbound JSON frame.
    pub fn apply_remote_json(&mut self, text: &str) -> AnnotationResult<()> {
        let frame = RemoteFrame::from_json(text)?;
        self.apply_remote_frame(frame)
    }

    fn after_reconcile(&mut self) {
        self.cache.invalidate();
        self.request_redraw(RedrawReason::Annotations);
    }
}
