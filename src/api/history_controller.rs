use tracing::debug;

use crate::annotation::{ActionSink, AnnotationStyle, Command};
use crate::core::ChartAxes;
use crate::error::AnnotationResult;
use crate::render::Renderer;

use super::AnnotationEngine;

impl<R: Renderer, A: ChartAxes, S: ActionSink> AnnotationEngine<R, A, S> {
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Reverts the last applied command. Any gesture in progress is
    /// cancelled first. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(outcome) = self.history.undo(&mut self.store, &mut self.sink) else {
            return false;
        };
        self.after_command(outcome);
        true
    }

    /// Re-applies the next command of the redo branch. Any gesture in
    /// progress is cancelled first.
    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(outcome) = self.history.redo(&mut self.store, &mut self.sink) else {
            return false;
        };
        self.after_command(outcome);
        true
    }

    /// Deletes the selected annotation through the history. Locked
    /// annotations are kept.
    pub fn delete_selected(&mut self) -> bool {
        let Some(annotation) = self
            .interaction
            .selected()
            .and_then(|id| self.store.get(id))
            .filter(|annotation| !annotation.is_locked())
            .cloned()
        else {
            return false;
        };
        self.cancel_gesture();
        debug!(id = %annotation.id(), "delete selected annotation");
        self.push_command(Command::Delete(annotation));
        true
    }

    /// Replaces the style of the selected annotation as an undoable update.
    /// Returns `Ok(false)` when nothing is selected or the style is unchanged.
    pub fn set_selected_style(&mut self, style: AnnotationStyle) -> AnnotationResult<bool> {
        style.validate()?;
        let Some(prev) = self
            .interaction
            .selected()
            .and_then(|id| self.store.get(id))
            .cloned()
        else {
            return Ok(false);
        };
        if prev.style == style {
            return Ok(false);
        }
        self.cancel_gesture();
        let next = prev.clone().with_style(style);
        self.push_command(Command::update(prev, next)?);
        Ok(true)
    }
}
