//! The selected-note set and the box-selection preview.
//!
//! A selection is a set of [`NoteId`]s that must stay a subset of the active
//! part's notes. Box selection first builds a temporary preview set that only
//! becomes the real selection when the gesture is committed.

use crate::model::{NoteId, Part};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Committed selection.
    selected: HashSet<NoteId>,
    /// Box-selection preview, not yet committed.
    preview: HashSet<NoteId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed selection.
    pub fn ids(&self) -> &HashSet<NoteId> {
        &self.selected
    }

    /// The box-selection preview.
    pub fn preview(&self) -> &HashSet<NoteId> {
        &self.preview
    }

    /// True if `id` is in the committed selection.
    pub fn contains(&self, id: NoteId) -> bool {
        self.selected.contains(&id)
    }

    /// True if `id` should be drawn as selected (committed or previewed).
    pub fn is_highlighted(&self, id: NoteId) -> bool {
        self.selected.contains(&id) || self.preview.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selects every note of the part.
    pub fn select_all(&mut self, part: &Part) {
        self.preview.clear();
        self.selected = part.ids().collect();
    }

    /// Clears the selection and any preview. Returns true if anything changed.
    pub fn deselect_all(&mut self) -> bool {
        let changed = !self.selected.is_empty() || !self.preview.is_empty();
        self.selected.clear();
        self.preview.clear();
        changed
    }

    /// Adds `id` if absent, removes it if present.
    pub fn toggle(&mut self, id: NoteId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Makes `id` the only selected note.
    pub fn replace_with(&mut self, id: NoteId) {
        self.selected.clear();
        self.selected.insert(id);
    }

    /// Drops `id` from the selection and the preview.
    pub fn remove(&mut self, id: NoteId) -> bool {
        let in_preview = self.preview.remove(&id);
        self.selected.remove(&id) || in_preview
    }

    /// Drops IDs of notes that are no longer in `part`.
    pub fn retain_existing(&mut self, part: &Part) {
        self.selected.retain(|id| part.contains(*id));
        self.preview.retain(|id| part.contains(*id));
    }

    /// Recomputes the preview as every note touching the box spanned by the
    /// two corners (in any order). Returns true if the preview changed.
    pub fn set_temp_box(
        &mut self,
        part: &Part,
        origin_tick: i64,
        origin_pitch: i32,
        current_tick: i64,
        current_pitch: i32,
    ) -> bool {
        let preview: HashSet<NoteId> = part
            .notes_in_box(
                origin_tick.min(current_tick),
                origin_tick.max(current_tick),
                origin_pitch.min(current_pitch),
                origin_pitch.max(current_pitch),
            )
            .map(|n| n.id)
            .collect();
        if preview == self.preview {
            return false;
        }
        self.preview = preview;
        true
    }

    /// Turns the preview into the selection. With `additive` the preview is
    /// merged into the current selection, otherwise it replaces it.
    pub fn commit_temp(&mut self, additive: bool) {
        let preview = std::mem::take(&mut self.preview);
        if additive {
            self.selected.extend(preview);
        } else {
            self.selected = preview;
        }
    }
}
