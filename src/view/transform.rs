//! Conversions between viewport pixels and musical coordinates.
//!
//! Pure functions of the current view. Nothing is clamped here: callers clamp
//! to the note and part ranges they care about.

use super::ViewState;
use crate::model::MAX_NOTE_NUMBER;

impl ViewState {
    /// Quarter position under a viewport x coordinate.
    pub fn pixel_x_to_quarter(&self, x: f64) -> f64 {
        (self.offset_x + x) / self.pixels_per_quarter
    }

    /// Viewport x coordinate of a quarter position.
    pub fn quarter_to_pixel_x(&self, quarter: f64) -> f64 {
        quarter * self.pixels_per_quarter - self.offset_x
    }

    /// Note number of the row under a viewport y coordinate. Row 0 at the top
    /// of the content is the highest note. May fall outside 0..=127.
    pub fn pixel_y_to_note_number(&self, y: f64) -> i32 {
        MAX_NOTE_NUMBER as i32 - ((self.offset_y + y) / self.pixels_per_note).floor() as i32
    }

    /// Viewport y coordinate of the top edge of a note row.
    pub fn note_number_to_pixel_y(&self, note_number: i32) -> f64 {
        (MAX_NOTE_NUMBER as i32 - note_number) as f64 * self.pixels_per_note - self.offset_y
    }

    /// Converts quarters to ticks, rounding to the nearest tick.
    pub fn quarter_to_ticks(&self, quarter: f64) -> i64 {
        (quarter * self.resolution as f64).round() as i64
    }

    pub fn ticks_to_quarter(&self, ticks: i64) -> f64 {
        ticks as f64 / self.resolution as f64
    }

    /// Viewport x coordinate of a tick position.
    pub fn tick_to_pixel_x(&self, ticks: i64) -> f64 {
        self.quarter_to_pixel_x(self.ticks_to_quarter(ticks))
    }

    /// Tick under a viewport x coordinate, without snapping (floored).
    pub fn pixel_x_to_tick(&self, x: f64) -> i64 {
        (self.pixel_x_to_quarter(x) * self.resolution as f64).floor() as i64
    }

    /// Tick of the start of the snap cell under `x`. Used by moves and note
    /// creation.
    pub fn snapped_tick(&self, x: f64) -> i64 {
        self.quarter_to_ticks(self.snap_unit.floor(self.pixel_x_to_quarter(x)))
    }

    /// Tick of the snap line nearest to `x`. Used by resize edges.
    pub fn rounded_tick(&self, x: f64) -> i64 {
        self.quarter_to_ticks(self.snap_unit.round(self.pixel_x_to_quarter(x)))
    }

    /// Length of one snap cell in ticks. At least one tick.
    pub fn snap_unit_ticks(&self) -> i64 {
        self.quarter_to_ticks(self.snap_unit.quarters()).max(1)
    }
}
