//! Pointer gesture state machine.
//!
//! A gesture starts on pointer-down, mutates the part or the selection on
//! every pointer-move and ends on pointer-up or when pointer capture is lost.
//! Mutations are applied immediately and are final; history collaborators
//! snapshot the part when [`crate::EditorEvent::GestureCommitted`] fires.

use crate::hit_test::HitTarget;
use crate::model::{GroupBounds, Note, NoteId, MAX_NOTE_NUMBER};
use crate::session::{EditorSession, Modifiers};
use tracing::{debug, trace, warn};

/// The kind of gesture in progress, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Idle,
    BoxSelect,
    MoveSingle,
    MoveMulti,
    ResizeSingle,
    ResizeMulti,
    Erase,
}

/// The gesture in progress and the data captured when it started.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragSession {
    #[default]
    Idle,
    /// Rubber-band selection from `origin`.
    BoxSelect {
        origin_quarter: f64,
        origin_pitch: i32,
        /// Merge into the existing selection instead of replacing it.
        additive: bool,
    },
    /// Dragging one note. `relative_tick` is the grab offset from its start.
    MoveSingle { anchor: NoteId, relative_tick: i64 },
    /// Dragging the whole selection by the grabbed note.
    MoveMulti {
        anchor: NoteId,
        relative_tick: i64,
        group: GroupBounds,
    },
    /// Dragging the right edge of one note.
    ResizeSingle { anchor: NoteId },
    /// Dragging the right edges of the whole selection.
    ResizeMulti { anchor: NoteId, group: GroupBounds },
    /// Removing notes under the pointer.
    Erase,
}

impl DragSession {
    pub fn mode(&self) -> DragMode {
        match self {
            DragSession::Idle => DragMode::Idle,
            DragSession::BoxSelect { .. } => DragMode::BoxSelect,
            DragSession::MoveSingle { .. } => DragMode::MoveSingle,
            DragSession::MoveMulti { .. } => DragMode::MoveMulti,
            DragSession::ResizeSingle { .. } => DragMode::ResizeSingle,
            DragSession::ResizeMulti { .. } => DragMode::ResizeMulti,
            DragSession::Erase => DragMode::Erase,
        }
    }

    /// The note the pointer grabbed, for move and resize gestures.
    pub fn anchor(&self) -> Option<NoteId> {
        match *self {
            DragSession::MoveSingle { anchor, .. }
            | DragSession::MoveMulti { anchor, .. }
            | DragSession::ResizeSingle { anchor }
            | DragSession::ResizeMulti { anchor, .. } => Some(anchor),
            DragSession::Idle | DragSession::BoxSelect { .. } | DragSession::Erase => None,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, DragSession::Idle)
    }
}

fn clamp_pitch(note_number: i32) -> u8 {
    note_number.clamp(0, MAX_NOTE_NUMBER as i32) as u8
}

impl EditorSession {
    /// Primary-button pointer-down: box select, grab a note or create one.
    pub(crate) fn begin_primary(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        if modifiers.ctrl {
            if !modifiers.shift {
                self.selection.deselect_all();
            }
            self.drag = DragSession::BoxSelect {
                origin_quarter: self.view.pixel_x_to_quarter(x),
                origin_pitch: self.view.pixel_y_to_note_number(y),
                additive: modifiers.shift,
            };
            debug!("box select started (additive: {})", modifiers.shift);
            self.mark_view_changed();
            return;
        }

        match self.hit_test(x, y) {
            HitTarget::NoteBody(id) => self.begin_move(id, x),
            HitTarget::NoteResizeEdge(id) => self.begin_resize(id),
            HitTarget::NoHit => self.begin_create(x, y),
        }
    }

    /// Grabbing a note that is not selected makes it the only selected note.
    fn grab(&mut self, id: NoteId) {
        if !self.selection.contains(id) {
            self.selection.replace_with(id);
            self.mark_view_changed();
        }
    }

    fn begin_move(&mut self, id: NoteId, x: f64) {
        self.grab(id);
        let Some(note) = self.part.get_note(id) else {
            return;
        };
        let relative_tick = self.view.snapped_tick(x) - note.position_ticks as i64;
        self.last_note_length = note.duration_ticks;

        self.drag = if self.selection.len() > 1 {
            match self.freeze_batch() {
                Some(group) => DragSession::MoveMulti {
                    anchor: id,
                    relative_tick,
                    group,
                },
                None => DragSession::MoveSingle {
                    anchor: id,
                    relative_tick,
                },
            }
        } else {
            DragSession::MoveSingle {
                anchor: id,
                relative_tick,
            }
        };
        debug!("{:?} started on note {:?}", self.drag.mode(), id);
    }

    /// Fixes the notes a multi-note gesture edits to the current selection.
    /// Later selection changes do not join or leave the gesture.
    fn freeze_batch(&mut self) -> Option<GroupBounds> {
        self.batch = self.selection.ids().clone();
        self.part.bounds_of(&self.batch)
    }

    fn begin_resize(&mut self, id: NoteId) {
        self.grab(id);
        self.drag = if self.selection.len() > 1 {
            match self.freeze_batch() {
                Some(group) => DragSession::ResizeMulti { anchor: id, group },
                None => DragSession::ResizeSingle { anchor: id },
            }
        } else {
            DragSession::ResizeSingle { anchor: id }
        };
        debug!("{:?} started on note {:?}", self.drag.mode(), id);
    }

    /// Creates a note of the sticky length under the pointer and starts
    /// moving it.
    fn begin_create(&mut self, x: f64, y: f64) {
        let duration = self.last_note_length.max(1);
        let latest_start = self.part.length_ticks.saturating_sub(duration) as i64;
        let position = self.view.snapped_tick(x).min(latest_start).max(0) as u32;
        let pitch = clamp_pitch(self.view.pixel_y_to_note_number(y));
        let note = Note::new(self.config.default_lyric.clone(), pitch, position, duration);

        match self.part.add(note) {
            Ok(id) => {
                self.selection.deselect_all();
                self.drag = DragSession::MoveSingle {
                    anchor: id,
                    relative_tick: 0,
                };
                debug!("created note {:?} at tick {} pitch {}", id, position, pitch);
                self.mark_view_changed();
            }
            Err(e) => warn!("could not create note: {e}"),
        }
    }

    /// Secondary-button pointer-down: erase the note under the pointer, or
    /// clear the selection on empty space.
    pub(crate) fn begin_erase(&mut self, x: f64, y: f64) {
        self.drag = DragSession::Erase;
        if !self.erase_at(x, y) && self.selection.deselect_all() {
            self.mark_view_changed();
        }
    }

    fn erase_at(&mut self, x: f64, y: f64) -> bool {
        let Some(id) = self.hit_test(x, y).note() else {
            return false;
        };
        self.part.remove(id);
        self.selection.remove(id);
        if self.lyric_editing == Some(id) {
            self.lyric_editing = None;
        }
        debug!("erased note {:?}", id);
        self.mark_view_changed();
        true
    }

    /// Applies the current gesture for a pointer at `(x, y)`. Returns true if
    /// the part or the selection changed.
    pub(crate) fn drag_to(&mut self, x: f64, y: f64) -> bool {
        match self.drag {
            DragSession::Idle => false,
            DragSession::BoxSelect {
                origin_quarter,
                origin_pitch,
                ..
            } => {
                let origin_tick = self.view.quarter_to_ticks(origin_quarter);
                let current_tick = self.view.quarter_to_ticks(self.view.pixel_x_to_quarter(x));
                let current_pitch = self.view.pixel_y_to_note_number(y);
                self.selection.set_temp_box(
                    &self.part,
                    origin_tick,
                    origin_pitch,
                    current_tick,
                    current_pitch,
                )
            }
            DragSession::MoveSingle {
                anchor,
                relative_tick,
            } => self.move_single(anchor, relative_tick, x, y),
            DragSession::MoveMulti {
                anchor,
                relative_tick,
                group,
            } => self.move_multi(anchor, relative_tick, group, x, y),
            DragSession::ResizeSingle { anchor } => self.resize_single(anchor, x),
            DragSession::ResizeMulti { anchor, group } => self.resize_multi(anchor, group, x),
            DragSession::Erase => self.erase_at(x, y),
        }
    }

    fn move_single(&mut self, anchor: NoteId, relative_tick: i64, x: f64, y: f64) -> bool {
        let target = self.view.snapped_tick(x) - relative_tick;
        let pitch = clamp_pitch(self.view.pixel_y_to_note_number(y));
        let length = self.part.length_ticks;
        let Some(note) = self.part.get_note_mut(anchor) else {
            return false;
        };
        let latest_start = length.saturating_sub(note.duration_ticks) as i64;
        let position = target.min(latest_start).max(0) as u32;
        if note.position_ticks == position && note.note_number == pitch {
            return false;
        }
        note.position_ticks = position;
        note.note_number = pitch;
        trace!("moved note {:?} to tick {} pitch {}", anchor, position, pitch);
        true
    }

    /// Moves the batch by whole deltas. Each axis is applied only if the
    /// whole group stays in range on that axis.
    fn move_multi(
        &mut self,
        anchor: NoteId,
        relative_tick: i64,
        mut group: GroupBounds,
        x: f64,
        y: f64,
    ) -> bool {
        let Some(anchor_note) = self.part.get_note(anchor) else {
            return false;
        };
        let mut delta_pitch = self.view.pixel_y_to_note_number(y) - anchor_note.note_number as i32;
        let mut delta_tick =
            self.view.snapped_tick(x) - relative_tick - anchor_note.position_ticks as i64;

        if group.min_pitch + delta_pitch < 0
            || group.max_pitch + delta_pitch > MAX_NOTE_NUMBER as i32
        {
            delta_pitch = 0;
        }
        if group.leftmost + delta_tick < 0
            || group.rightmost_end + delta_tick > self.part.length_ticks as i64
        {
            delta_tick = 0;
        }
        if delta_pitch == 0 && delta_tick == 0 {
            return false;
        }

        let batch = &self.batch;
        for note in self
            .part
            .notes_mut()
            .iter_mut()
            .filter(|n| batch.contains(&n.id))
        {
            note.note_number = clamp_pitch(note.note_number as i32 + delta_pitch);
            note.position_ticks = (note.position_ticks as i64 + delta_tick) as u32;
        }
        group.shift_pitch(delta_pitch);
        group.shift_ticks(delta_tick);
        self.drag = DragSession::MoveMulti {
            anchor,
            relative_tick,
            group,
        };
        trace!("moved selection by {} ticks, {} semitones", delta_tick, delta_pitch);
        true
    }

    fn resize_single(&mut self, anchor: NoteId, x: f64) -> bool {
        // An end tick past the tick range cannot be stored.
        let Ok(end) = u32::try_from(self.view.rounded_tick(x)) else {
            return false;
        };
        let min_duration = self.view.snap_unit_ticks();
        let Some(note) = self.part.get_note_mut(anchor) else {
            return false;
        };
        let duration = end as i64 - note.position_ticks as i64;
        if duration < min_duration || duration == note.duration_ticks as i64 {
            return false;
        }
        note.duration_ticks = end - note.position_ticks;
        self.last_note_length = note.duration_ticks;
        trace!("resized note {:?} to {} ticks", anchor, duration);
        true
    }

    /// Stretches every note of the batch by the same delta while the shortest
    /// one stays longer than one snap unit and every end fits in a tick.
    fn resize_multi(&mut self, anchor: NoteId, mut group: GroupBounds, x: f64) -> bool {
        let Some(anchor_note) = self.part.get_note(anchor) else {
            return false;
        };
        let delta = self.view.rounded_tick(x) - anchor_note.end_ticks() as i64;
        if delta == 0
            || group.shortest_duration + delta <= self.view.snap_unit_ticks()
            || group.rightmost_end + delta > u32::MAX as i64
        {
            return false;
        }

        let batch = &self.batch;
        for note in self
            .part
            .notes_mut()
            .iter_mut()
            .filter(|n| batch.contains(&n.id))
        {
            note.duration_ticks = (note.duration_ticks as i64 + delta) as u32;
        }
        group.stretch(delta);
        self.drag = DragSession::ResizeMulti { anchor, group };
        trace!("stretched selection by {} ticks", delta);
        true
    }

    /// Ends the gesture. A box selection commits its preview.
    pub(crate) fn end_gesture(&mut self) {
        let finished = std::mem::take(&mut self.drag);
        self.last_pointer = None;
        self.batch.clear();
        if !finished.is_active() {
            return;
        }
        if let DragSession::BoxSelect { additive, .. } = finished {
            self.selection.commit_temp(additive);
        }
        debug!("{:?} finished", finished.mode());
        self.mark_view_changed();
        self.mark_committed();
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EditorConfig;
    use crate::drag::{DragMode, DragSession};
    use crate::model::{Note, NoteId};
    use crate::session::{EditorEvent, EditorSession, Modifiers, PointerButton};

    const PRIMARY: PointerButton = PointerButton::Primary;
    const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
    };
    const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
    };
    const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
    };

    fn session() -> EditorSession {
        EditorSession::new(EditorConfig::default()).unwrap()
    }

    /// Middle of the row of `pitch` at the current scroll.
    fn row(s: &EditorSession, pitch: i32) -> f64 {
        s.view().note_number_to_pixel_y(pitch) + s.view().pixels_per_note() / 2.0
    }

    fn note(s: &EditorSession, id: NoteId) -> (u8, u32, u32) {
        let n = s.part().get_note(id).unwrap();
        (n.note_number, n.position_ticks, n.duration_ticks)
    }

    #[test]
    fn test_create_then_move() {
        let mut s = session();
        let y = row(&s, 110);
        s.pointer_down(100.0, y, PRIMARY, NONE);
        assert_eq!(s.drag_mode(), DragMode::MoveSingle);
        let id = s.drag().anchor().unwrap();
        assert_eq!(note(&s, id), (110, 1200, 480));
        assert_eq!(s.part().get_note(id).unwrap().lyric, "a");
        assert!(s.selection().is_empty());

        // 10 px is one sixteenth at 40 px per quarter.
        s.pointer_move(110.0, y);
        assert_eq!(note(&s, id).1, 1320);
        s.pointer_move(140.0, y);
        assert_eq!(note(&s, id).1, 1680);
        s.pointer_up();
        assert_eq!(s.drag_mode(), DragMode::Idle);
        assert_eq!(s.part().note_count(), 1);
    }

    #[test]
    fn test_identical_moves_are_idempotent() {
        let mut s = session();
        let y = row(&s, 110);
        s.pointer_down(100.0, y, PRIMARY, NONE);
        let id = s.drag().anchor().unwrap();
        s.pointer_move(137.0, row(&s, 108));
        let after_first = note(&s, id);
        s.take_events();
        s.pointer_move(137.0, row(&s, 108));
        assert_eq!(note(&s, id), after_first);
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn test_move_single_stays_in_part_and_range() {
        let mut s = session();
        let y = row(&s, 110);
        s.pointer_down(100.0, y, PRIMARY, NONE);
        let id = s.drag().anchor().unwrap();

        s.pointer_move(-400.0, y);
        assert_eq!(note(&s, id).1, 0);

        // Past the end: the note is pushed back inside the part.
        s.pointer_move(100_000.0, y);
        let length = s.part().length_ticks;
        assert_eq!(note(&s, id).1, length - 480);

        s.pointer_move(100.0, -500.0);
        assert_eq!(note(&s, id).0, 127);
        s.pointer_move(100.0, 100_000.0);
        assert_eq!(note(&s, id).0, 0);
    }

    #[test]
    fn test_create_near_part_end_clamps_start() {
        let mut s = session();
        let view_end = s.content_quarters() * s.view().pixels_per_quarter();
        s.scroll_by(view_end, 0.0);
        let x = s.view().view_width - 1.0;
        s.pointer_down(x, row(&s, 110), PRIMARY, NONE);
        let id = s.drag().anchor().unwrap();
        assert_eq!(note(&s, id).1, s.part().length_ticks - 480);
    }

    #[test]
    fn test_grab_keeps_relative_offset() {
        let mut s = session();
        let id = s.add_note(Note::new("a", 110, 480, 960)).unwrap();
        let y = row(&s, 110);
        // Grab half a quarter into the note.
        s.pointer_down(60.0, y, PRIMARY, NONE);
        assert_eq!(s.drag_mode(), DragMode::MoveSingle);
        assert!(s.selection().contains(id));
        assert_eq!(s.last_note_length(), 960);

        s.pointer_move(100.0, y);
        assert_eq!(note(&s, id).1, 960);
    }

    #[test]
    fn test_multi_move_shifts_group() {
        let mut s = session();
        let a = s.add_note(Note::new("a", 110, 0, 480)).unwrap();
        let b = s.add_note(Note::new("a", 112, 960, 480)).unwrap();
        s.select_all();
        s.pointer_down(5.0, row(&s, 110), PRIMARY, NONE);
        assert_eq!(s.drag_mode(), DragMode::MoveMulti);

        s.pointer_move(45.0, row(&s, 111));
        assert_eq!(note(&s, a), (111, 480, 480));
        assert_eq!(note(&s, b), (113, 1440, 480));
        assert_eq!(s.selection().len(), 2);
    }

    #[test]
    fn test_multi_move_axes_gated_independently() {
        let mut s = session();
        let a = s.add_note(Note::new("a", 126, 480, 480)).unwrap();
        let b = s.add_note(Note::new("a", 120, 960, 480)).unwrap();
        s.select_all();
        s.pointer_down(45.0, row(&s, 126), PRIMARY, NONE);

        // Above the top row `a` would pass 127: pitch is rejected but the
        // horizontal move still applies.
        s.pointer_move(85.0, -30.0);
        assert_eq!(note(&s, a), (126, 960, 480));
        assert_eq!(note(&s, b), (120, 1440, 480));

        // Left past zero: time is rejected for the whole group, pitch applies.
        s.pointer_move(-200.0, row(&s, 124));
        assert_eq!(note(&s, a), (124, 960, 480));
        assert_eq!(note(&s, b), (118, 1440, 480));
    }

    #[test]
    fn test_multi_move_group_bounds_follow_moves() {
        let mut s = session();
        let a = s.add_note(Note::new("a", 110, 0, 480)).unwrap();
        s.add_note(Note::new("a", 110, 960, 480)).unwrap();
        s.select_all();
        s.pointer_down(5.0, row(&s, 110), PRIMARY, NONE);

        s.pointer_move(85.0, row(&s, 110));
        assert_eq!(note(&s, a).1, 960);
        // The group now starts at 960, so moving back to tick 0 is allowed
        // but going further left is not.
        s.pointer_move(5.0, row(&s, 110));
        assert_eq!(note(&s, a).1, 0);
        match s.drag() {
            DragSession::MoveMulti { group, .. } => assert_eq!(group.leftmost, 0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_multi_move_ignores_notes_selected_mid_gesture() {
        let mut s = session();
        let a = s.add_note(Note::new("a", 110, 0, 480)).unwrap();
        let b = s.add_note(Note::new("a", 112, 960, 480)).unwrap();
        s.select_all();
        s.pointer_down(5.0, row(&s, 110), PRIMARY, NONE);
        assert_eq!(s.drag_mode(), DragMode::MoveMulti);

        let top = s.add_note(Note::new("a", 127, 2400, 480)).unwrap();
        s.toggle_note_selection(top);
        s.pointer_move(5.0, row(&s, 111));
        assert_eq!(note(&s, a).0, 111);
        assert_eq!(note(&s, b).0, 113);
        assert_eq!(note(&s, top), (127, 2400, 480));

        // Select-all mid drag does not pull the top note in either.
        s.select_all();
        s.pointer_move(45.0, row(&s, 112));
        assert_eq!(note(&s, a), (112, 480, 480));
        assert_eq!(note(&s, top), (127, 2400, 480));
        s.pointer_up();
        assert!(s.part().notes().iter().all(|n| n.note_number <= 127));
    }

    #[test]
    fn test_multi_move_skips_notes_deselected_mid_gesture() {
        let mut s = session();
        let a = s.add_note(Note::new("a", 110, 0, 480)).unwrap();
        let b = s.add_note(Note::new("a", 112, 960, 480)).unwrap();
        s.select_all();
        s.pointer_down(5.0, row(&s, 110), PRIMARY, NONE);
        s.toggle_note_selection(b);
        s.pointer_move(5.0, row(&s, 109));
        // The gesture still moves the notes it started with.
        assert_eq!(note(&s, a).0, 109);
        assert_eq!(note(&s, b).0, 111);
    }

    #[test]
    fn test_resize_single_rejects_end_past_tick_range() {
        let mut s = session();
        let id = s.add_note(Note::new("a", 110, 0, 480)).unwrap();
        let y = row(&s, 110);
        s.pointer_down(38.0, y, PRIMARY, NONE);
        s.pointer_move(81.0, y);
        assert_eq!(note(&s, id).2, 960);

        // Far enough right that the end tick exceeds u32::MAX.
        s.pointer_move(357_913_950.0, y);
        assert_eq!(note(&s, id).2, 960);
        assert!(note(&s, id).2 as i64 >= s.view().snap_unit_ticks());
    }

    #[test]
    fn test_resize_multi_rejects_end_past_tick_range() {
        let mut s = session();
        let a = s.add_note(Note::new("a", 110, 0, 480)).unwrap();
        let b = s.add_note(Note::new("a", 112, 960, 240)).unwrap();
        s.select_all();
        let y = row(&s, 110);
        s.pointer_down(38.0, y, PRIMARY, NONE);
        assert_eq!(s.drag_mode(), DragMode::ResizeMulti);

        s.pointer_move(357_913_950.0, y);
        assert_eq!(note(&s, a).2, 480);
        assert_eq!(note(&s, b).2, 240);
    }

    #[test]
    fn test_resize_single_has_floor() {
        let mut s = session();
        let id = s.add_note(Note::new("a", 110, 0, 480)).unwrap();
        let y = row(&s, 110);
        s.pointer_down(38.0, y, PRIMARY, NONE);
        assert_eq!(s.drag_mode(), DragMode::ResizeSingle);

        s.pointer_move(81.0, y);
        assert_eq!(note(&s, id).2, 960);
        assert_eq!(s.last_note_length(), 960);

        // Shorter than one snap unit is rejected.
        s.pointer_move(1.0, y);
        assert_eq!(note(&s, id).2, 960);
        s.pointer_move(10.0, y);
        assert_eq!(note(&s, id).2, 120);
    }

    #[test]
    fn test_resize_multi_stretches_all() {
        let mut s = session();
        let a = s.add_note(Note::new("a", 110, 0, 480)).unwrap();
        let b = s.add_note(Note::new("a", 112, 960, 240)).unwrap();
        s.select_all();
        let y = row(&s, 110);
        s.pointer_down(38.0, y, PRIMARY, NONE);
        assert_eq!(s.drag_mode(), DragMode::ResizeMulti);

        s.pointer_move(60.0, y);
        assert_eq!(note(&s, a).2, 720);
        assert_eq!(note(&s, b).2, 480);

        // Shortest would drop to 120 ticks, which is not above one snap unit.
        s.pointer_move(30.0, y);
        assert_eq!(note(&s, a).2, 720);
        assert_eq!(note(&s, b).2, 480);
    }

    #[test]
    fn test_box_select_replaces_selection() {
        let mut s = session();
        let a = s.add_note(Note::new("a", 120, 0, 480)).unwrap();
        let b = s.add_note(Note::new("a", 118, 480, 480)).unwrap();
        let far = s.add_note(Note::new("a", 100, 4800, 480)).unwrap();
        s.toggle_note_selection(far);

        s.pointer_down(0.0, row(&s, 121), PRIMARY, CTRL);
        assert_eq!(s.drag_mode(), DragMode::BoxSelect);
        assert!(s.selection().is_empty());

        s.pointer_move(50.0, row(&s, 118));
        assert!(s.selection().is_highlighted(a));
        assert!(s.selection().is_highlighted(b));
        assert!(!s.selection().contains(a));

        s.pointer_up();
        assert!(s.selection().contains(a) && s.selection().contains(b));
        assert!(!s.selection().contains(far));
        assert!(s.selection().preview().is_empty());
    }

    #[test]
    fn test_box_select_additive() {
        let mut s = session();
        let a = s.add_note(Note::new("a", 120, 0, 480)).unwrap();
        let far = s.add_note(Note::new("a", 100, 4800, 480)).unwrap();
        s.toggle_note_selection(far);

        s.pointer_down(0.0, row(&s, 121), PRIMARY, CTRL_SHIFT);
        s.pointer_move(20.0, row(&s, 119));
        s.pointer_up();
        assert!(s.selection().contains(a));
        assert!(s.selection().contains(far));
    }

    #[test]
    fn test_box_select_leaves_notes_alone() {
        let mut s = session();
        let a = s.add_note(Note::new("a", 120, 0, 480)).unwrap();
        s.pointer_down(0.0, row(&s, 121), PRIMARY, CTRL);
        s.pointer_move(300.0, row(&s, 100));
        s.pointer_up();
        assert_eq!(note(&s, a), (120, 0, 480));
        assert_eq!(s.part().note_count(), 1);
    }

    #[test]
    fn test_erase_removes_notes_under_pointer() {
        let mut s = session();
        let a = s.add_note(Note::new("a", 120, 0, 480)).unwrap();
        let b = s.add_note(Note::new("a", 120, 960, 480)).unwrap();
        s.select_all();
        let y = row(&s, 120);

        s.pointer_down(10.0, y, PointerButton::Secondary, NONE);
        assert_eq!(s.drag_mode(), DragMode::Erase);
        assert!(s.part().get_note(a).is_none());
        assert!(!s.selection().contains(a));

        s.pointer_move(50.0, y);
        assert!(s.part().get_note(b).is_some());
        s.pointer_move(50.0, y);
        s.pointer_move(30.0, y);
        s.pointer_move(90.0, y);
        assert!(s.part().get_note(b).is_none());
        s.pointer_up();
        assert!(s.take_events().contains(&EditorEvent::GestureCommitted));
    }

    #[test]
    fn test_erase_on_empty_space_deselects() {
        let mut s = session();
        let a = s.add_note(Note::new("a", 120, 0, 480)).unwrap();
        s.select_all();
        s.pointer_down(400.0, row(&s, 110), PointerButton::Secondary, NONE);
        assert!(s.selection().is_empty());
        assert!(s.part().get_note(a).is_some());
    }

    #[test]
    fn test_new_pointer_down_ends_previous_gesture() {
        let mut s = session();
        s.add_note(Note::new("a", 120, 0, 480)).unwrap();
        s.pointer_down(0.0, row(&s, 121), PRIMARY, CTRL);
        s.pointer_move(20.0, row(&s, 119));
        s.take_events();
        s.pointer_down(400.0, row(&s, 110), PRIMARY, NONE);
        assert!(s.take_events().contains(&EditorEvent::GestureCommitted));
        // The committed box selection was then cleared by creating a note.
        assert_eq!(s.drag_mode(), DragMode::MoveSingle);
        assert_eq!(s.part().note_count(), 2);
    }

    #[test]
    fn test_sticky_length_used_for_new_notes() {
        let mut s = session();
        let id = s.add_note(Note::new("a", 120, 0, 480)).unwrap();
        let y = row(&s, 120);
        s.pointer_down(38.0, y, PRIMARY, NONE);
        s.pointer_move(60.0, y);
        s.pointer_up();
        assert_eq!(note(&s, id).2, 720);

        s.pointer_down(400.0, row(&s, 110), PRIMARY, NONE);
        let created = s.drag().anchor().unwrap();
        assert_eq!(note(&s, created).2, 720);
    }

    #[test]
    fn test_lyric_edited_note_moves_instead_of_resizing() {
        let mut s = session();
        let id = s.add_note(Note::new("a", 120, 0, 480)).unwrap();
        s.set_lyric_editing(Some(id));
        s.pointer_down(38.0, row(&s, 120), PRIMARY, NONE);
        assert_eq!(s.drag_mode(), DragMode::MoveSingle);
    }
}
