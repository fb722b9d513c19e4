//! Editor configuration.
//!
//! Every field has a default, so a config file only needs the values it wants
//! to change. Validation of the numeric settings happens when the
//! [`crate::view::ViewState`] is built from the config.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::DEFAULT_RESOLUTION;

/// Tunable settings for one editor instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Ticks per quarter note.
    pub resolution: u32,

    /// Snap subdivision in quarters (0.25 = sixteenth notes).
    pub snap_unit: f64,

    /// Horizontal zoom: pixels per quarter note.
    pub pixels_per_quarter: f64,

    /// Vertical zoom: pixels per note row.
    pub pixels_per_note: f64,

    /// Limits for horizontal zoom.
    pub min_pixels_per_quarter: f64,
    pub max_pixels_per_quarter: f64,

    /// Limits for vertical zoom.
    pub min_pixels_per_note: f64,
    pub max_pixels_per_note: f64,

    /// Initial viewport size in pixels.
    pub view_width: f64,
    pub view_height: f64,

    /// Length of a new part, in quarters.
    pub part_quarters: u32,

    /// Width in pixels of the grab zone at a note's right edge.
    pub resize_margin: f64,

    /// Lyric given to notes created by clicking on empty space.
    pub default_lyric: String,

    /// Length of the first note created before any note was grabbed or resized.
    pub default_note_length: u32,

    /// Edge-scroll speed factor while a drag is held outside the viewport.
    pub edge_scroll_speed: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            snap_unit: 0.25,
            pixels_per_quarter: 40.0,
            pixels_per_note: 22.0,
            min_pixels_per_quarter: 4.0,
            max_pixels_per_quarter: 320.0,
            min_pixels_per_note: 8.0,
            max_pixels_per_note: 128.0,
            view_width: 800.0,
            view_height: 600.0,
            part_quarters: 64,
            resize_margin: 8.0,
            default_lyric: "a".to_string(),
            default_note_length: DEFAULT_RESOLUTION,
            edge_scroll_speed: 2.5,
        }
    }
}

impl EditorConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Total length of a new part in ticks.
    pub fn part_length_ticks(&self) -> u32 {
        self.part_quarters.saturating_mul(self.resolution)
    }
}
