//! Note data owned by the editor.
//!
//! A [`Part`] owns an ordered collection of [`Note`]s. Notes are referenced from
//! selections and drag sessions through their [`NoteId`], never by index, so a
//! reference stays valid while other notes are added or removed.

mod note;
mod part;

pub use note::{Note, NoteId};
pub use part::{GroupBounds, Part};

/// Highest valid note number. Note numbers run 0..=127 in piano-key order.
pub const MAX_NOTE_NUMBER: u8 = 127;

/// Default resolution in ticks per quarter note.
pub const DEFAULT_RESOLUTION: u32 = 480;

/// Pitch class names used for key labels.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Converts a note number to a name with octave, e.g. `60` -> `"C4"`.
///
/// # Examples
///
/// ```
/// use noteroll::model::note_to_name;
///
/// assert_eq!(note_to_name(60), "C4");
/// ```
pub fn note_to_name(note_number: u8) -> String {
    let octave = (note_number / 12) as i8 - 1;
    let index = (note_number % 12) as usize;
    format!("{}{}", NOTE_NAMES[index], octave)
}

/// Returns true for the pitch classes drawn as black keys.
pub fn is_black_key(note_number: u8) -> bool {
    matches!(note_number % 12, 1 | 3 | 6 | 8 | 10)
}
