//! The note collection of a part.
//!
//! Notes are kept in insertion order. The order carries no musical meaning; it
//! is the z-order used for drawing and for picking the topmost note under the
//! pointer.

use super::note::{Note, NoteId};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Bounding extremes of a group of notes, captured before a batch edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupBounds {
    /// Smallest start position in the group.
    pub leftmost: i64,
    /// Largest end tick in the group.
    pub rightmost_end: i64,
    /// Lowest note number in the group.
    pub min_pitch: i32,
    /// Highest note number in the group.
    pub max_pitch: i32,
    /// Shortest duration in the group.
    pub shortest_duration: i64,
}

impl GroupBounds {
    /// Follows a tick shift applied to every note of the group.
    pub fn shift_ticks(&mut self, delta: i64) {
        self.leftmost += delta;
        self.rightmost_end += delta;
    }

    /// Follows a pitch shift applied to every note of the group.
    pub fn shift_pitch(&mut self, delta: i32) {
        self.min_pitch += delta;
        self.max_pitch += delta;
    }

    /// Follows a duration change applied to every note of the group.
    pub fn stretch(&mut self, delta: i64) {
        self.shortest_duration += delta;
        self.rightmost_end += delta;
    }
}

/// An ordered collection of notes with a fixed total length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Display name.
    pub name: String,

    /// Total length of the part in ticks. Moves keep notes inside it.
    pub length_ticks: u32,

    /// Notes in insertion (z) order.
    notes: Vec<Note>,
}

impl Part {
    /// Creates an empty part.
    pub fn new(name: impl Into<String>, length_ticks: u32) -> Self {
        Self {
            name: name.into(),
            length_ticks,
            notes: Vec::new(),
        }
    }

    /// Adds a note on top of the z-order.
    ///
    /// # Errors
    ///
    /// [`crate::EditorError::InvalidNote`] if the note has a zero duration or
    /// an out-of-range note number.
    pub fn add(&mut self, note: Note) -> Result<NoteId> {
        note.validate()?;
        let id = note.id;
        self.notes.push(note);
        Ok(id)
    }

    /// Removes a note by ID. Its lifetime ends here.
    pub fn remove(&mut self, id: NoteId) -> Option<Note> {
        let pos = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(pos))
    }

    /// Removes every note whose ID is in `ids`, returning them in z-order.
    pub fn remove_many(&mut self, ids: &HashSet<NoteId>) -> Vec<Note> {
        let (removed, kept): (Vec<Note>, Vec<Note>) = std::mem::take(&mut self.notes)
            .into_iter()
            .partition(|n| ids.contains(&n.id));
        self.notes = kept;
        removed
    }

    pub fn get_note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn get_note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.notes.iter().any(|n| n.id == id)
    }

    /// All notes in z-order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// All notes in z-order, for batch edits that keep the collection intact.
    pub fn notes_mut(&mut self) -> &mut [Note] {
        &mut self.notes
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Iterates the IDs of all notes in z-order.
    pub fn ids(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.notes.iter().map(|n| n.id)
    }

    /// Notes that overlap the half-open tick range `[start, end)`, in z-order.
    pub fn notes_overlapping(&self, start: u32, end: u32) -> impl Iterator<Item = &Note> {
        self.notes
            .iter()
            .filter(move |n| n.overlaps_range(start, end))
    }

    /// Notes whose rectangle touches the closed box
    /// `[min_tick, max_tick] x [min_pitch, max_pitch]`.
    pub fn notes_in_box(
        &self,
        min_tick: i64,
        max_tick: i64,
        min_pitch: i32,
        max_pitch: i32,
    ) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(move |n| {
            let pitch = n.note_number as i32;
            n.position_ticks as i64 <= max_tick
                && n.end_ticks() as i64 >= min_tick
                && pitch >= min_pitch
                && pitch <= max_pitch
        })
    }

    /// Computes the extremes of the notes in `ids`. IDs that are not in this
    /// part are ignored; returns `None` if none of them are.
    pub fn bounds_of(&self, ids: &HashSet<NoteId>) -> Option<GroupBounds> {
        self.notes
            .iter()
            .filter(|n| ids.contains(&n.id))
            .fold(None, |acc: Option<GroupBounds>, n| {
                let pitch = n.note_number as i32;
                let start = n.position_ticks as i64;
                let end = n.end_ticks() as i64;
                let duration = n.duration_ticks as i64;
                Some(match acc {
                    None => GroupBounds {
                        leftmost: start,
                        rightmost_end: end,
                        min_pitch: pitch,
                        max_pitch: pitch,
                        shortest_duration: duration,
                    },
                    Some(b) => GroupBounds {
                        leftmost: b.leftmost.min(start),
                        rightmost_end: b.rightmost_end.max(end),
                        min_pitch: b.min_pitch.min(pitch),
                        max_pitch: b.max_pitch.max(pitch),
                        shortest_duration: b.shortest_duration.min(duration),
                    },
                })
            })
    }
}

impl Default for Part {
    fn default() -> Self {
        Self::new("Part 1", super::DEFAULT_RESOLUTION * 64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;

    fn part_with(notes: &[(u8, u32, u32)]) -> (Part, Vec<NoteId>) {
        let mut part = Part::new("Test", 480 * 16);
        let ids = notes
            .iter()
            .map(|&(pitch, pos, dur)| part.add(Note::new("a", pitch, pos, dur)).unwrap())
            .collect();
        (part, ids)
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let (part, ids) = part_with(&[(60, 480, 240), (62, 0, 240), (64, 960, 240)]);
        let order: Vec<_> = part.ids().collect();
        assert_eq!(order, ids);
        assert_eq!(part.notes()[1].position_ticks, 0);
    }

    #[test]
    fn test_add_rejects_invalid() {
        let mut part = Part::new("Test", 1920);
        let err = part.add(Note::new("a", 60, 0, 0)).unwrap_err();
        assert!(matches!(err, EditorError::InvalidNote { .. }));
        assert!(part.add(Note::new("a", 200, 0, 480)).is_err());
        assert_eq!(part.note_count(), 0);
    }

    #[test]
    fn test_remove() {
        let (mut part, ids) = part_with(&[(60, 0, 480), (62, 480, 480)]);
        let removed = part.remove(ids[0]).unwrap();
        assert_eq!(removed.note_number, 60);
        assert!(!part.contains(ids[0]));
        assert!(part.remove(ids[0]).is_none());
        assert_eq!(part.note_count(), 1);
    }

    #[test]
    fn test_remove_many() {
        let (mut part, ids) = part_with(&[(60, 0, 480), (62, 480, 480), (64, 960, 480)]);
        let doomed: HashSet<_> = [ids[0], ids[2]].into_iter().collect();
        let removed = part.remove_many(&doomed);
        assert_eq!(removed.len(), 2);
        assert_eq!(part.ids().collect::<Vec<_>>(), vec![ids[1]]);
    }

    #[test]
    fn test_notes_overlapping() {
        let (part, _) = part_with(&[(60, 0, 480), (62, 480, 480), (64, 960, 480)]);
        let hits: Vec<_> = part.notes_overlapping(240, 720).collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(part.notes_overlapping(1440, 2000).count(), 0);
    }

    #[test]
    fn test_notes_in_box_is_closed() {
        // Touching the box edge counts as intersecting.
        let (part, ids) = part_with(&[(60, 10, 100), (66, 0, 5), (59, 0, 5), (65, 0, 10)]);
        let hits: Vec<_> = part.notes_in_box(0, 10, 60, 65).map(|n| n.id).collect();
        assert_eq!(hits, vec![ids[0], ids[3]]);
    }

    #[test]
    fn test_bounds_of() {
        let (part, ids) = part_with(&[(60, 480, 240), (72, 0, 960), (55, 1920, 120)]);
        let set: HashSet<_> = ids.iter().copied().collect();
        let bounds = part.bounds_of(&set).unwrap();
        assert_eq!(bounds.leftmost, 0);
        assert_eq!(bounds.rightmost_end, 2040);
        assert_eq!(bounds.min_pitch, 55);
        assert_eq!(bounds.max_pitch, 72);
        assert_eq!(bounds.shortest_duration, 120);

        assert!(part.bounds_of(&HashSet::new()).is_none());
    }

    #[test]
    fn test_bounds_follow_shifts() {
        let (part, ids) = part_with(&[(60, 480, 240), (62, 960, 480)]);
        let mut bounds = part.bounds_of(&ids.iter().copied().collect()).unwrap();
        bounds.shift_ticks(-480);
        bounds.shift_pitch(3);
        bounds.stretch(120);
        assert_eq!(bounds.leftmost, 0);
        assert_eq!(bounds.rightmost_end, 1080);
        assert_eq!((bounds.min_pitch, bounds.max_pitch), (63, 65));
        assert_eq!(bounds.shortest_duration, 360);
    }
}
