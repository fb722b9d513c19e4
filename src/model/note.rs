//! A single editable note.

use super::MAX_NOTE_NUMBER;
use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for note IDs.
static NOTE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies a note for as long as it lives in its part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(u64);

impl NoteId {
    /// Allocates a fresh ID.
    pub fn new() -> Self {
        Self(NOTE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

/// A note on the time/pitch grid.
///
/// Fields are public so that the drag controller can move notes in place.
/// Validity is checked when a note enters a [`super::Part`]; drags keep every
/// value inside its range by clamping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier for this note instance.
    pub id: NoteId,

    /// Lyric attached to the note. Opaque to the editor.
    pub lyric: String,

    /// Note number (0-127). 60 = C4.
    pub note_number: u8,

    /// Start position in ticks from the beginning of the part.
    pub position_ticks: u32,

    /// Length in ticks. Always > 0.
    pub duration_ticks: u32,
}

impl Note {
    /// Creates a note with a fresh ID. Nothing is validated here; see
    /// [`Note::validate`].
    ///
    /// # Examples
    ///
    /// ```
    /// use noteroll::model::Note;
    ///
    /// let note = Note::new("a", 60, 0, 480);
    /// assert_eq!(note.end_ticks(), 480);
    /// ```
    pub fn new(
        lyric: impl Into<String>,
        note_number: u8,
        position_ticks: u32,
        duration_ticks: u32,
    ) -> Self {
        Self {
            id: NoteId::new(),
            lyric: lyric.into(),
            note_number,
            position_ticks,
            duration_ticks,
        }
    }

    /// Tick at which the note ends (exclusive).
    pub fn end_ticks(&self) -> u32 {
        self.position_ticks.saturating_add(self.duration_ticks)
    }

    /// True if any part of the note lies in `[start, end)`.
    pub fn overlaps_range(&self, start: u32, end: u32) -> bool {
        self.position_ticks < end && self.end_ticks() > start
    }

    /// Checks the invariants a note must hold to be stored in a part.
    ///
    /// # Errors
    ///
    /// [`EditorError::InvalidNote`] for a zero duration or a note number
    /// above 127.
    pub fn validate(&self) -> Result<()> {
        let reason = if self.duration_ticks == 0 {
            "duration must be positive"
        } else if self.note_number > MAX_NOTE_NUMBER {
            "note number out of range"
        } else {
            return Ok(());
        };
        Err(EditorError::InvalidNote {
            reason,
            note_number: self.note_number,
            duration_ticks: self.duration_ticks,
        })
    }
}
