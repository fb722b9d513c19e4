//! noteroll - the interaction engine of a piano-roll note editor.
//!
//! This library turns pointer, wheel and keyboard input into edits of a
//! part's notes: coordinate transforms, grid snapping, hit testing, selection
//! and the drag state machine. Rendering is left to the host; the bundled
//! binary draws the part in a terminal.

pub mod config;
pub mod drag;
pub mod error;
pub mod model;
pub mod selection;
pub mod session;
pub mod ui;
pub mod view;

// Re-export commonly used types
pub use config::EditorConfig;
pub use drag::{DragMode, DragSession};
pub use error::{EditorError, Result};
pub use hit_test::{hit_test, HitTarget};
pub use model::{GroupBounds, Note, NoteId, Part};
pub use selection::Selection;
pub use session::{EditorEvent, EditorSession, Modifiers, PointerButton};
pub use view::{SnapUnit, ViewState};
