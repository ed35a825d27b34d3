use tracing::debug;

use crate::annotation::{ActionSink, Annotation, AnnotationId, AnnotationStore, ReplaceOutcome, WireAction};
use crate::error::{AnnotationError, AnnotationResult};

/// Default number of commands kept in history.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Undoable operation on the annotation store.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(Annotation),
    Delete(Annotation),
    /// `prev` and `next` always share the same id.
    Update { prev: Annotation, next: Annotation },
}

impl Command {
    pub fn update(prev: Annotation, next: Annotation) -> AnnotationResult<Self> {
        if prev.id() != next.id() {
            return Err(AnnotationError::InvalidAnnotation {
                id: next.id().to_string(),
                reason: format!("update target mismatch: previous id is `{}`", prev.id()),
            });
        }
        Ok(Self::Update { prev, next })
    }

    #[must_use]
    pub fn id(&self) -> &AnnotationId {
        match self {
            Self::Add(annotation) | Self::Delete(annotation) => annotation.id(),
            Self::Update { next, .. } => next.id(),
        }
    }

    #[must_use]
    pub fn forward_action(&self) -> WireAction {
        match self {
            Self::Add(annotation) => WireAction::Add {
                annotation: annotation.clone(),
            },
            Self::Delete(annotation) => WireAction::Remove {
                id: annotation.id().clone(),
            },
            Self::Update { next, .. } => WireAction::Update {
                annotation: next.clone(),
            },
        }
    }

    #[must_use]
    pub fn inverse_action(&self) -> WireAction {
        match self {
            Self::Add(annotation) => WireAction::Remove {
                id: annotation.id().clone(),
            },
            Self::Delete(annotation) => WireAction::Add {
                annotation: annotation.clone(),
            },
            Self::Update { prev, .. } => WireAction::Update {
                annotation: prev.clone(),
            },
        }
    }

    /// Applies the command, returning the draw-order index a deleted
    /// annotation held so undo can restore it there.
    fn apply_forward(&self, store: &mut AnnotationStore) -> (ApplyOutcome, Option<usize>) {
        match self {
            Self::Add(annotation) => {
                store.insert(annotation.clone());
                (ApplyOutcome::Applied, None)
            }
            Self::Delete(annotation) => {
                let position = store.remove_full(annotation.id()).map(|(index, _)| index);
                (ApplyOutcome::Applied, position)
            }
            Self::Update { next, .. } => (replace_or_recover(store, next), None),
        }
    }

    fn apply_inverse(&self, store: &mut AnnotationStore, position: Option<usize>) -> ApplyOutcome {
        match self {
            Self::Add(annotation) => {
                store.remove(annotation.id());
                ApplyOutcome::Applied
            }
            Self::Delete(annotation) => {
                match position {
                    Some(index) => store.insert_at(index, annotation.clone()),
                    None => {
                        store.insert(annotation.clone());
                    }
                }
                ApplyOutcome::Applied
            }
            Self::Update { prev, .. } => replace_or_recover(store, prev),
        }
    }
}

fn replace_or_recover(store: &mut AnnotationStore, annotation: &Annotation) -> ApplyOutcome {
    match store.replace(annotation.clone()) {
        ReplaceOutcome::Replaced => ApplyOutcome::Applied,
        ReplaceOutcome::Appended => {
            debug!(id = %annotation.id(), "update target missing, appended");
            ApplyOutcome::RecoveredMissingTarget(annotation.id().clone())
        }
    }
}

/// How a command landed in the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// An update targeted an unknown id and was appended instead.
    RecoveredMissingTarget(AnnotationId),
}

/// Undo/redo history with a cursor over a contiguous command arena.
///
/// Commands `[0, applied)` are applied; `[applied, len)` form the redo branch.
/// `positions` runs parallel to `commands` and holds the draw-order index a
/// delete removed its target from, refreshed on every forward application.
/// Every operation mutates the local store synchronously and mirrors the
/// change to the sink without waiting for an acknowledgement.
#[derive(Debug, Clone)]
pub struct CommandStack {
    commands: Vec<Command>,
    positions: Vec<Option<usize>>,
    applied: usize,
    limit: usize,
}

impl Default for CommandStack {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `limit` commands (at least one).
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            commands: Vec::new(),
            positions: Vec::new(),
            applied: 0,
            limit: limit.max(1),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Index of the last applied command, `None` when nothing is applied.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.applied < self.commands.len()
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.positions.clear();
        self.applied = 0;
    }

    /// Drops the redo branch, records `command`, applies it and sends the
    /// forward action.
    pub fn push(
        &mut self,
        command: Command,
        store: &mut AnnotationStore,
        sink: &mut dyn ActionSink,
    ) -> ApplyOutcome {
        self.commands.truncate(self.applied);
        self.positions.truncate(self.applied);
        self.commands.push(command);
        self.positions.push(None);
        if self.commands.len() > self.limit {
            let excess = self.commands.len() - self.limit;
            self.commands.drain(..excess);
            self.positions.drain(..excess);
        }
        self.applied = self.commands.len();

        let index = self.applied - 1;
        let command = &self.commands[index];
        debug!(id = %command.id(), history = self.applied, "push command");
        let (outcome, position) = command.apply_forward(store);
        self.positions[index] = position;
        sink.send(command.forward_action());
        outcome
    }

    /// Reverts the command at the cursor. Returns `None` when nothing is
    /// applied.
    pub fn undo(
        &mut self,
        store: &mut AnnotationStore,
        sink: &mut dyn ActionSink,
    ) -> Option<ApplyOutcome> {
        let index = self.cursor()?;
        let command = &self.commands[index];
        debug!(id = %command.id(), cursor = index, "undo command");
        let outcome = command.apply_inverse(store, self.positions[index]);
        sink.send(command.inverse_action());
        self.applied = index;
        Some(outcome)
    }

    /// Re-applies the first command of the redo branch. Returns `None` when
    /// the branch is empty.
    pub fn redo(
        &mut self,
        store: &mut AnnotationStore,
        sink: &mut dyn ActionSink,
    ) -> Option<ApplyOutcome> {
        let index = self.applied;
        let command = self.commands.get(index)?;
        debug!(id = %command.id(), cursor = index, "redo command");
        let (outcome, position) = command.apply_forward(store);
        self.positions[index] = position;
        sink.send(command.forward_action());
        self.applied += 1;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, CommandStack};
    use crate::annotation::{ActionBuffer, AnchorPoint, Annotation, AnnotationId, AnnotationStore};

    fn line(id: &str, price: f64) -> Annotation {
        Annotation::horizontal_line(AnnotationId::new(id), AnchorPoint::new(0.0, price))
            .expect("line")
    }

    #[test]
    fn history_limit_drops_oldest_commands() {
        let mut stack = CommandStack::with_limit(2);
        let mut store = AnnotationStore::new();
        let mut sink = ActionBuffer::new();

        for (i, id) in ["a", "b", "c"].into_iter().enumerate() {
            stack.push(Command::Add(line(id, i as f64)), &mut store, &mut sink);
        }

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.cursor(), Some(1));
        assert!(stack.undo(&mut store, &mut sink).is_some());
        assert!(stack.undo(&mut store, &mut sink).is_some());
        assert!(stack.undo(&mut store, &mut sink).is_none());
        // "a" is no longer undoable
        assert_eq!(store.len(), 1);
        assert!(store.contains(&AnnotationId::new("a")));
    }

    #[test]
    fn update_requires_matching_ids() {
        assert!(Command::update(line("a", 1.0), line("b", 1.0)).is_err());
        assert!(Command::update(line("a", 1.0), line("a", 2.0)).is_ok());
    }
}
