//! Error types for the note editor.

use thiserror::Error;

/// Errors raised by the editing engine.
///
/// Pointer gestures never produce these: every value computed during a drag is
/// clamped before it touches a note. Errors only surface from explicit
/// construction and mutation APIs.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A view or snap setting that would make the coordinate math meaningless
    /// (zero resolution, non-positive snap unit or pixel scale).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A note that violates the collection invariants.
    #[error("invalid note: {reason} (pitch {note_number}, duration {duration_ticks})")]
    InvalidNote {
        reason: &'static str,
        note_number: u8,
        duration_ticks: u32,
    },

    /// The config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for [`crate::config::EditorConfig`].
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EditorError>;
