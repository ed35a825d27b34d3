use indexmap::IndexMap;

use crate::annotation::{Annotation, AnnotationId};

/// Outcome of a by-id replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced,
    /// The id was unknown; the annotation was appended on top.
    Appended,
}

/// Ordered annotation list (draw order, last = topmost) plus at most one draft.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    annotations: IndexMap<AnnotationId, Annotation>,
    draft: Option<Annotation>,
}

impl AnnotationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_annotations(annotations: Vec<Annotation>) -> Self {
        let mut store = Self::default();
        store.set_all(annotations);
        store
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.annotations.contains_key(id)
    }

    /// Annotations in draw order (bottom first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Annotation> + ExactSizeIterator {
        self.annotations.values()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Annotation> {
        self.annotations.values().cloned().collect()
    }

    /// Upsert: replaces a known id in place, otherwise appends on top.
    pub fn insert(&mut self, annotation: Annotation) -> Option<Annotation> {
        self.annotations.insert(annotation.id().clone(), annotation)
    }

    /// Removes by id, preserving the order of the remaining annotations.
    pub fn remove(&mut self, id: &AnnotationId) -> Option<Annotation> {
        self.annotations.shift_remove(id)
    }

    /// Removes by id, returning the draw-order index it held.
    pub fn remove_full(&mut self, id: &AnnotationId) -> Option<(usize, Annotation)> {
        self.annotations
            .shift_remove_full(id)
            .map(|(index, _, annotation)| (index, annotation))
    }

    /// Puts `annotation` back at draw-order `index`, clamped to the list
    /// length. A known id is replaced in place.
    pub fn insert_at(&mut self, index: usize, annotation: Annotation) {
        if let Some(slot) = self.annotations.get_mut(annotation.id()) {
            *slot = annotation;
            return;
        }
        let index = index.min(self.annotations.len());
        self.annotations
            .shift_insert(index, annotation.id().clone(), annotation);
    }

    pub fn replace(&mut self, annotation: Annotation) -> ReplaceOutcome {
        match self.insert(annotation) {
            Some(_) => ReplaceOutcome::Replaced,
            None => ReplaceOutcome::Appended,
        }
    }

    /// Replaces the whole list. Duplicate ids keep the last value at the
    /// position of the first occurrence.
    pub fn set_all(&mut self, annotations: Vec<Annotation>) {
        self.annotations.clear();
        for annotation in annotations {
            self.insert(annotation);
        }
    }

    #[must_use]
    pub fn draft(&self) -> Option<&Annotation> {
        self.draft.as_ref()
    }

    pub(crate) fn draft_mut(&mut self) -> Option<&mut Annotation> {
        self.draft.as_mut()
    }

    pub(crate) fn set_draft(&mut self, draft: Annotation) {
        self.draft = Some(draft);
    }

    pub(crate) fn take_draft(&mut self) -> Option<Annotation> {
        self.draft.take()
    }
}
