//! The editor session: all state of one open piano-roll editor.
//!
//! [`EditorSession`] owns the part being edited, the selection, the view and
//! the in-progress pointer gesture. Every input event goes through one of its
//! methods; rendering and history collaborators read snapshots through the
//! accessors and react to the [`EditorEvent`]s drained with
//! [`EditorSession::take_events`].

use crate::config::EditorConfig;
use crate::drag::{DragMode, DragSession};
use crate::error::Result;
use crate::hit_test::{hit_test, HitTarget};
use crate::model::{Note, NoteId, Part};
use crate::selection::Selection;
use crate::view::ViewState;
use std::collections::HashSet;
use tracing::debug;

/// Edge scrolling moves this fraction of the viewport per millisecond, scaled
/// by [`EditorConfig::edge_scroll_speed`].
const EDGE_SCROLL_FACTOR: f64 = 0.001;

/// Wheel panning moves this fraction of the viewport per wheel delta unit.
const WHEEL_PAN_FACTOR: f64 = 0.001;

/// Notifications for the collaborators around the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// Notes, selection or view changed; the view should be redrawn.
    ViewChanged,
    /// A gesture finished (or notes were deleted). History and thumbnail
    /// collaborators snapshot the part here.
    GestureCommitted,
}

/// Which pointer button started a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Create, move, resize and box-select.
    Primary,
    /// Erase notes.
    Secondary,
}

/// Keyboard modifiers held during a pointer or wheel event.
///
/// For pointer-down, `ctrl` starts a box selection and `shift` makes it
/// additive. For the wheel, `ctrl` zooms and `shift` pans horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

/// One open note editor.
#[derive(Debug)]
pub struct EditorSession {
    pub(crate) part: Part,
    pub(crate) selection: Selection,
    pub(crate) view: ViewState,
    pub(crate) drag: DragSession,
    pub(crate) config: EditorConfig,
    /// Sticky length for newly created notes.
    pub(crate) last_note_length: u32,
    /// Note whose lyric box is open, owned by the text-edit collaborator.
    pub(crate) lyric_editing: Option<NoteId>,
    /// Last pointer position seen during a gesture, for edge scrolling.
    pub(crate) last_pointer: Option<(f64, f64)>,
    /// Notes edited by the current multi-note move or resize.
    pub(crate) batch: HashSet<NoteId>,
    events: Vec<EditorEvent>,
}

impl EditorSession {
    /// Creates a session with an empty part sized from the config.
    ///
    /// # Errors
    ///
    /// [`crate::EditorError::Configuration`] if the view settings are invalid.
    pub fn new(config: EditorConfig) -> Result<Self> {
        let part = Part::new("Part 1", config.part_length_ticks());
        Self::with_part(config, part)
    }

    /// Creates a session editing an existing part.
    ///
    /// # Errors
    ///
    /// [`crate::EditorError::Configuration`] if the view settings are invalid.
    pub fn with_part(config: EditorConfig, part: Part) -> Result<Self> {
        let view = ViewState::from_config(&config)?;
        Ok(Self {
            part,
            selection: Selection::new(),
            view,
            drag: DragSession::Idle,
            last_note_length: config.default_note_length.max(1),
            config,
            lyric_editing: None,
            last_pointer: None,
            batch: HashSet::new(),
            events: Vec::new(),
        })
    }

    pub fn part(&self) -> &Part {
        &self.part
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The current gesture state.
    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag.mode()
    }

    /// Length given to the next note created by clicking empty space.
    pub fn last_note_length(&self) -> u32 {
        self.last_note_length
    }

    /// Length of the part in quarters.
    pub fn content_quarters(&self) -> f64 {
        self.view.ticks_to_quarter(self.part.length_ticks as i64)
    }

    /// Drains pending notifications.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queues a redraw request. At most one is pending at a time.
    pub(crate) fn mark_view_changed(&mut self) {
        if !self.events.contains(&EditorEvent::ViewChanged) {
            self.events.push(EditorEvent::ViewChanged);
        }
    }

    pub(crate) fn mark_committed(&mut self) {
        self.events.push(EditorEvent::GestureCommitted);
    }

    /// What lies under a viewport position.
    pub fn hit_test(&self, x: f64, y: f64) -> HitTarget {
        hit_test(
            &self.part,
            &self.view,
            x,
            y,
            self.config.resize_margin,
            self.lyric_editing,
        )
    }

    // Pointer input

    /// Starts a gesture. A gesture still in progress is ended first, as if
    /// its pointer-up had been received.
    pub fn pointer_down(&mut self, x: f64, y: f64, button: PointerButton, modifiers: Modifiers) {
        if self.drag.is_active() {
            debug!("pointer-down during {:?}, ending it first", self.drag.mode());
            self.end_gesture();
        }
        self.last_pointer = Some((x, y));
        match button {
            PointerButton::Primary => self.begin_primary(x, y, modifiers),
            PointerButton::Secondary => self.begin_erase(x, y),
        }
    }

    /// Continues the current gesture. A no-op while idle.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.drag.is_active() {
            return;
        }
        self.last_pointer = Some((x, y));
        if self.drag_to(x, y) {
            self.mark_view_changed();
        }
    }

    /// Ends the current gesture.
    pub fn pointer_up(&mut self) {
        self.end_gesture();
    }

    /// Pointer capture was lost (focus change, window switch). Ends the
    /// gesture exactly like a pointer-up.
    pub fn capture_lost(&mut self) {
        if self.drag.is_active() {
            debug!("pointer capture lost during {:?}", self.drag.mode());
        }
        self.end_gesture();
    }

    /// Per-frame tick. While a gesture is held with the pointer outside the
    /// viewport, scrolls toward it and replays the last pointer position
    /// through the normal move logic. Returns true if anything changed.
    pub fn on_frame(&mut self, elapsed_ms: f64) -> bool {
        if !self.drag.is_active() || elapsed_ms <= 0.0 {
            return false;
        }
        let Some((x, y)) = self.last_pointer else {
            return false;
        };
        if self.view.contains_point(x, y) {
            return false;
        }

        let speed = self.config.edge_scroll_speed * EDGE_SCROLL_FACTOR * elapsed_ms;
        let dx = if x < 0.0 {
            -self.view.view_width * speed
        } else if x >= self.view.view_width {
            self.view.view_width * speed
        } else {
            0.0
        };
        let dy = if y < 0.0 {
            -self.view.view_height * speed
        } else if y >= self.view.view_height {
            self.view.view_height * speed
        } else {
            0.0
        };
        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        let before = (self.view.offset_x, self.view.offset_y);
        self.view.scroll_by(dx, dy, self.content_quarters());
        let scrolled = before != (self.view.offset_x, self.view.offset_y);
        let moved = self.drag_to(x, y);
        if scrolled || moved {
            self.mark_view_changed();
        }
        scrolled || moved
    }

    // Keyboard commands

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.part);
        self.mark_view_changed();
    }

    pub fn deselect_all(&mut self) {
        if self.selection.deselect_all() {
            self.mark_view_changed();
        }
    }

    /// Adds a note to the selection or removes it. Unknown IDs are ignored.
    pub fn toggle_note_selection(&mut self, id: NoteId) {
        if self.part.contains(id) {
            self.selection.toggle(id);
            self.mark_view_changed();
        }
    }

    /// Removes every selected note from the part and returns them.
    pub fn delete_selected(&mut self) -> Vec<Note> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let removed = self.part.remove_many(self.selection.ids());
        self.selection.deselect_all();
        if self
            .lyric_editing
            .is_some_and(|id| removed.iter().any(|n| n.id == id))
        {
            self.lyric_editing = None;
        }
        debug!("deleted {} selected notes", removed.len());
        self.mark_view_changed();
        self.mark_committed();
        removed
    }

    // Direct note edits

    /// Adds a note to the part.
    ///
    /// # Errors
    ///
    /// [`crate::EditorError::InvalidNote`] if the note breaks the part
    /// invariants.
    pub fn add_note(&mut self, note: Note) -> Result<NoteId> {
        let id = self.part.add(note)?;
        self.mark_view_changed();
        Ok(id)
    }

    /// Removes a note from the part and from the selection.
    pub fn remove_note(&mut self, id: NoteId) -> Option<Note> {
        let note = self.part.remove(id)?;
        self.selection.remove(id);
        if self.lyric_editing == Some(id) {
            self.lyric_editing = None;
        }
        self.mark_view_changed();
        Some(note)
    }

    /// Marks the note whose lyric box is open. Its right edge then stops
    /// acting as a resize handle.
    pub fn set_lyric_editing(&mut self, id: Option<NoteId>) {
        self.lyric_editing = id.filter(|id| self.part.contains(*id));
    }

    pub fn lyric_editing(&self) -> Option<NoteId> {
        self.lyric_editing
    }

    /// Replaces the lyric of a note. Returns false for unknown IDs.
    pub fn set_lyric(&mut self, id: NoteId, lyric: impl Into<String>) -> bool {
        let Some(note) = self.part.get_note_mut(id) else {
            return false;
        };
        note.lyric = lyric.into();
        self.mark_view_changed();
        true
    }

    // View commands

    /// Wheel input: ctrl zooms horizontally around `x`, shift pans
    /// horizontally, otherwise pans vertically.
    pub fn wheel(&mut self, x: f64, delta: f64, modifiers: Modifiers) {
        let content = self.content_quarters();
        if modifiers.ctrl {
            self.view.zoom_horizontal(delta, x, content);
        } else if modifiers.shift {
            let dx = -self.view.view_width * WHEEL_PAN_FACTOR * delta;
            self.view.scroll_by(dx, 0.0, content);
        } else {
            let dy = -self.view.view_height * WHEEL_PAN_FACTOR * delta;
            self.view.scroll_by(0.0, dy, content);
        }
        self.mark_view_changed();
    }

    /// Scrolls the view by a pixel amount.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        let content = self.content_quarters();
        self.view.scroll_by(dx, dy, content);
        self.mark_view_changed();
    }

    /// Vertical zoom: sets the note row height.
    pub fn set_note_height(&mut self, height: f64) {
        self.view.set_pixels_per_note(height);
        self.mark_view_changed();
    }

    /// Changes the snap subdivision.
    ///
    /// # Errors
    ///
    /// [`crate::EditorError::Configuration`] for a non-positive unit.
    pub fn set_snap_unit(&mut self, quarters: f64) -> Result<()> {
        self.view.set_snap_unit(quarters).inspect_err(|e| {
            tracing::warn!("rejected snap unit {quarters}: {e}");
        })?;
        self.mark_view_changed();
        Ok(())
    }

    /// The viewport was resized.
    pub fn resize_view(&mut self, width: f64, height: f64) {
        self.view.resize(width, height);
        let content = self.content_quarters();
        self.view.scroll_by(0.0, 0.0, content);
        self.mark_view_changed();
    }
}
