//! View state: scroll offsets, zoom and snap settings.
//!
//! The view is what every coordinate transform reads. It is changed by zoom,
//! scroll, viewport resizes and snap setting changes, never by note edits.

mod snap;
mod transform;

pub use snap::{snap_quarter, snap_quarter_round, SnapUnit};

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::model::MAX_NOTE_NUMBER;

/// Horizontal zoom change per wheel delta unit.
const ZOOM_SPEED: f64 = 0.0012;

/// Pointer positions left of this (in pixels) zoom around the part start
/// while the view is scrolled fully left.
const ZOOM_PIN_WIDTH: f64 = 128.0;

/// Number of note rows on the vertical axis.
const NOTE_ROWS: f64 = MAX_NOTE_NUMBER as f64 + 1.0;

/// Viewport geometry and grid settings of one editor instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Horizontal scroll offset in pixels.
    pub offset_x: f64,
    /// Vertical scroll offset in pixels. 0 shows the highest note at the top.
    pub offset_y: f64,
    /// Viewport width in pixels.
    pub view_width: f64,
    /// Viewport height in pixels.
    pub view_height: f64,

    pixels_per_quarter: f64,
    pixels_per_note: f64,
    min_pixels_per_quarter: f64,
    max_pixels_per_quarter: f64,
    min_pixels_per_note: f64,
    max_pixels_per_note: f64,
    resolution: u32,
    snap_unit: SnapUnit,
}

impl ViewState {
    /// Builds a view from a config, scrolled to the top-left.
    ///
    /// # Errors
    ///
    /// [`EditorError::Configuration`] for a zero resolution, a non-positive
    /// snap unit or a non-positive zoom setting.
    pub fn from_config(config: &EditorConfig) -> Result<Self> {
        if config.resolution == 0 {
            return Err(EditorError::Configuration(
                "resolution must be > 0 ticks per quarter".to_string(),
            ));
        }
        let snap_unit = SnapUnit::new(config.snap_unit)?;
        for (name, value) in [
            ("pixels_per_quarter", config.pixels_per_quarter),
            ("pixels_per_note", config.pixels_per_note),
            ("min_pixels_per_quarter", config.min_pixels_per_quarter),
            ("min_pixels_per_note", config.min_pixels_per_note),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(EditorError::Configuration(format!(
                    "{name} must be > 0, got {value}"
                )));
            }
        }
        if config.max_pixels_per_quarter < config.min_pixels_per_quarter
            || config.max_pixels_per_note < config.min_pixels_per_note
        {
            return Err(EditorError::Configuration(
                "zoom maximum is below zoom minimum".to_string(),
            ));
        }

        Ok(Self {
            offset_x: 0.0,
            offset_y: 0.0,
            view_width: config.view_width.max(0.0),
            view_height: config.view_height.max(0.0),
            pixels_per_quarter: config.pixels_per_quarter,
            pixels_per_note: config.pixels_per_note,
            min_pixels_per_quarter: config.min_pixels_per_quarter,
            max_pixels_per_quarter: config.max_pixels_per_quarter,
            min_pixels_per_note: config.min_pixels_per_note,
            max_pixels_per_note: config.max_pixels_per_note,
            resolution: config.resolution,
            snap_unit,
        })
    }

    pub fn pixels_per_quarter(&self) -> f64 {
        self.pixels_per_quarter
    }

    pub fn pixels_per_note(&self) -> f64 {
        self.pixels_per_note
    }

    /// Ticks per quarter note.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn snap_unit(&self) -> SnapUnit {
        self.snap_unit
    }

    /// Changes the snap subdivision.
    ///
    /// # Errors
    ///
    /// [`EditorError::Configuration`] for a non-positive unit; the old unit
    /// stays in effect.
    pub fn set_snap_unit(&mut self, quarters: f64) -> Result<()> {
        self.snap_unit = SnapUnit::new(quarters)?;
        Ok(())
    }

    /// Resizes the viewport.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.view_width = width.max(0.0);
        self.view_height = height.max(0.0);
    }

    /// True if the pixel lies inside the viewport.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x < self.view_width && y >= 0.0 && y < self.view_height
    }

    /// Largest horizontal offset that still shows content.
    pub fn max_offset_x(&self, content_quarters: f64) -> f64 {
        (content_quarters * self.pixels_per_quarter - self.view_width).max(0.0)
    }

    /// Largest vertical offset that still shows content.
    pub fn max_offset_y(&self) -> f64 {
        (NOTE_ROWS * self.pixels_per_note - self.view_height).max(0.0)
    }

    /// Scrolls by a pixel amount, staying inside the content.
    pub fn scroll_by(&mut self, dx: f64, dy: f64, content_quarters: f64) {
        self.offset_x = (self.offset_x + dx).clamp(0.0, self.max_offset_x(content_quarters));
        self.offset_y = (self.offset_y + dy).clamp(0.0, self.max_offset_y());
    }

    /// Zooms horizontally by a wheel delta, keeping the quarter under
    /// `anchor_x` in place.
    pub fn zoom_horizontal(&mut self, wheel_delta: f64, anchor_x: f64, content_quarters: f64) {
        let center = if self.offset_x == 0.0 && anchor_x < ZOOM_PIN_WIDTH {
            0.0
        } else {
            (self.offset_x + anchor_x) / self.pixels_per_quarter
        };
        self.pixels_per_quarter = (self.pixels_per_quarter * (1.0 + wheel_delta * ZOOM_SPEED))
            .clamp(self.min_pixels_per_quarter, self.max_pixels_per_quarter);
        self.offset_x = (center * self.pixels_per_quarter - anchor_x)
            .clamp(0.0, self.max_offset_x(content_quarters));
    }

    /// Sets the note row height, keeping the pitch at the view center in place.
    pub fn set_pixels_per_note(&mut self, height: f64) {
        if !height.is_finite() {
            return;
        }
        let center = (self.offset_y + self.view_height / 2.0) / self.pixels_per_note;
        self.pixels_per_note = height.clamp(self.min_pixels_per_note, self.max_pixels_per_note);
        self.offset_y =
            (self.pixels_per_note * center - self.view_height / 2.0).clamp(0.0, self.max_offset_y());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_defaults() {
        let view = ViewState::from_config(&EditorConfig::default()).unwrap();
        assert_eq!(view.resolution(), 480);
        assert_eq!(view.snap_unit().quarters(), 0.25);
        assert_eq!(view.offset_x, 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let zero_res = EditorConfig {
            resolution: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(
            ViewState::from_config(&zero_res),
            Err(EditorError::Configuration(_))
        ));

        let zero_snap = EditorConfig {
            snap_unit: 0.0,
            ..EditorConfig::default()
        };
        assert!(ViewState::from_config(&zero_snap).is_err());

        let flat = EditorConfig {
            pixels_per_note: 0.0,
            ..EditorConfig::default()
        };
        assert!(ViewState::from_config(&flat).is_err());
    }

    #[test]
    fn test_set_snap_unit_keeps_old_on_error() {
        let mut view = ViewState::from_config(&EditorConfig::default()).unwrap();
        assert!(view.set_snap_unit(0.0).is_err());
        assert_eq!(view.snap_unit().quarters(), 0.25);
        view.set_snap_unit(0.5).unwrap();
        assert_eq!(view.snap_unit().quarters(), 0.5);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut view = ViewState::from_config(&EditorConfig::default()).unwrap();
        // 64 quarters * 40 px = 2560 px of content, 800 px visible.
        view.scroll_by(-50.0, -50.0, 64.0);
        assert_eq!((view.offset_x, view.offset_y), (0.0, 0.0));
        view.scroll_by(10_000.0, 10_000.0, 64.0);
        assert_eq!(view.offset_x, 1760.0);
        assert_eq!(view.offset_y, 128.0 * 22.0 - 600.0);
    }

    #[test]
    fn test_zoom_keeps_anchor_quarter() {
        let mut view = ViewState::from_config(&EditorConfig::default()).unwrap();
        view.offset_x = 400.0;
        let before = view.pixel_x_to_quarter(300.0);
        view.zoom_horizontal(100.0, 300.0, 64.0);
        assert!(view.pixels_per_quarter() > 40.0);
        assert!((view.pixel_x_to_quarter(300.0) - before).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_pins_part_start() {
        let mut view = ViewState::from_config(&EditorConfig::default()).unwrap();
        view.zoom_horizontal(200.0, 50.0, 64.0);
        assert_eq!(view.offset_x, 0.0);
    }

    #[test]
    fn test_zoom_limits() {
        let mut view = ViewState::from_config(&EditorConfig::default()).unwrap();
        view.zoom_horizontal(-10_000.0, 0.0, 64.0);
        assert_eq!(view.pixels_per_quarter(), 4.0);
        view.set_pixels_per_note(1000.0);
        assert_eq!(view.pixels_per_note(), 128.0);
    }

    #[test]
    fn test_vertical_zoom_keeps_center() {
        let mut view = ViewState::from_config(&EditorConfig::default()).unwrap();
        view.offset_y = 1000.0;
        let center = view.pixel_y_to_note_number(300.0);
        view.set_pixels_per_note(30.0);
        assert_eq!(view.pixel_y_to_note_number(300.0), center);
    }
}
