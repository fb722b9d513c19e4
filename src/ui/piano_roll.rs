//! Piano roll rendering.
//!
//! Draws the part's notes on the grid with pitch on the Y-axis and time on the
//! X-axis, a key label column on the left and a time ruler on top. The title
//! shows which edges have notes scrolled off-screen.

use crate::model::{is_black_key, note_to_name, Note, MAX_NOTE_NUMBER};
use crate::session::EditorSession;
use crate::view::ViewState;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::{contains_multiple, QUARTERS_PER_MEASURE};

/// Width of the key label column in cells.
pub const KEY_LABEL_WIDTH: u16 = 5;

/// Which edges of the viewport have notes beyond them.
#[derive(Debug, Default, Clone, Copy)]
struct OffScreenIndicators {
    above: bool,
    below: bool,
    left: bool,
    right: bool,
}

impl OffScreenIndicators {
    /// Scans `notes` against the visible pitch and tick range of `view`.
    fn calculate(notes: &[Note], view: &ViewState) -> Self {
        let mut indicators = Self::default();
        let top_pitch = view.pixel_y_to_note_number(0.0);
        let bottom_pitch = view.pixel_y_to_note_number(view.view_height - 0.5);
        let first_tick = view.pixel_x_to_tick(0.0);
        let last_tick = view.pixel_x_to_tick(view.view_width);

        for note in notes {
            let pitch = note.note_number as i32;
            indicators.above |= pitch > top_pitch;
            indicators.below |= pitch < bottom_pitch;
            indicators.left |= (note.end_ticks() as i64) <= first_tick;
            indicators.right |= (note.position_ticks as i64) >= last_tick;

            if indicators.above && indicators.below && indicators.left && indicators.right {
                break;
            }
        }

        indicators
    }

    /// A compact title suffix like `[^<]`, empty when nothing is off-screen.
    fn title_suffix(&self) -> String {
        let marks: String = [
            (self.above, '^'),
            (self.below, 'v'),
            (self.left, '<'),
            (self.right, '>'),
        ]
        .into_iter()
        .filter_map(|(on, ch)| on.then_some(ch))
        .collect();
        if marks.is_empty() {
            marks
        } else {
            format!("[{marks}]")
        }
    }
}

/// The strongest grid line inside a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridMarker {
    Measure,
    Beat,
    /// A snap line that is not on a beat.
    Snap,
    Empty,
}

fn grid_marker(view: &ViewState, col: u16) -> GridMarker {
    let start = view.pixel_x_to_quarter(col as f64);
    let end = view.pixel_x_to_quarter(col as f64 + 1.0);
    if contains_multiple(start, end, QUARTERS_PER_MEASURE) {
        GridMarker::Measure
    } else if contains_multiple(start, end, 1.0) {
        GridMarker::Beat
    } else if view.snap_unit().ceil(start) < end {
        GridMarker::Snap
    } else {
        GridMarker::Empty
    }
}

/// Cell range `[start, end)` covered by a note, or None if it is not visible.
fn note_columns(note: &Note, view: &ViewState, width: u16) -> Option<(u16, u16)> {
    let left = view.tick_to_pixel_x(note.position_ticks as i64);
    let right = view.tick_to_pixel_x(note.end_ticks() as i64);
    if right <= 0.0 || left >= width as f64 {
        return None;
    }
    let start = left.round().max(0.0) as u16;
    let end = (right.round().min(width as f64) as u16).max(start + 1).min(width);
    (start < end).then_some((start, end))
}

/// Renders the piano roll and returns the grid area.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `area` - The area to render in, including the border
/// * `session` - The editor whose part and view are drawn
///
/// # Returns
///
/// The grid rectangle. Its size is the editor viewport; a zero-sized rect
/// means the area was too small to draw anything.
pub fn render_piano_roll(frame: &mut Frame, area: Rect, session: &EditorSession) -> Rect {
    let part = session.part();
    let view = session.view();
    let selection = session.selection();

    let indicators = OffScreenIndicators::calculate(part.notes(), view);
    let title = format!(" {} {}", part.name, indicators.title_suffix());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width <= KEY_LABEL_WIDTH + 1 || inner.height < 2 {
        return Rect::default();
    }

    let grid = Rect::new(
        inner.x + KEY_LABEL_WIDTH,
        inner.y + 1,
        inner.width - KEY_LABEL_WIDTH,
        inner.height - 1,
    );

    super::render_time_ruler(frame, Rect::new(grid.x, inner.y, grid.width, 1), view);
    frame.render_widget(
        Paragraph::new(" ".repeat(KEY_LABEL_WIDTH as usize))
            .style(Style::default().bg(Color::Rgb(20, 20, 20))),
        Rect::new(inner.x, inner.y, KEY_LABEL_WIDTH, 1),
    );

    // Column markers are the same on every row.
    let markers: Vec<GridMarker> = (0..grid.width)
        .map(|col| grid_marker(view, col))
        .collect();

    let mut previous_pitch = None;
    for row in 0..grid.height {
        let pitch = view.pixel_y_to_note_number(row as f64 + 0.5);
        let y = grid.y + row;

        if !(0..=MAX_NOTE_NUMBER as i32).contains(&pitch) {
            continue;
        }
        let note_number = pitch as u8;
        let black = is_black_key(note_number);

        // Key label on the first row of each note.
        let key_text = if previous_pitch != Some(pitch) {
            format!("{:>4} ", note_to_name(note_number))
        } else {
            " ".repeat(KEY_LABEL_WIDTH as usize)
        };
        previous_pitch = Some(pitch);
        let key_style = if black {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else if note_number % 12 == 0 {
            Style::default().bg(Color::White).fg(Color::Black)
        } else {
            Style::default().bg(Color::Gray).fg(Color::Black)
        };
        frame.render_widget(
            Paragraph::new(key_text).style(key_style),
            Rect::new(inner.x, y, KEY_LABEL_WIDTH, 1),
        );

        // Grid background
        let bg = if black {
            Color::Rgb(30, 30, 30)
        } else {
            Color::Rgb(40, 40, 40)
        };
        let mut cells: Vec<(char, Style)> = markers
            .iter()
            .map(|marker| {
                let (ch, fg) = match marker {
                    GridMarker::Measure => ('|', Color::White),
                    GridMarker::Beat => (':', Color::DarkGray),
                    GridMarker::Snap => ('.', Color::Rgb(60, 60, 60)),
                    GridMarker::Empty => (' ', Color::Rgb(60, 60, 60)),
                };
                (ch, Style::default().fg(fg).bg(bg))
            })
            .collect();

        // Notes in z-order, so later notes paint over earlier ones.
        for note in part.notes().iter().filter(|n| n.note_number == note_number) {
            let Some((start, end)) = note_columns(note, view, grid.width) else {
                continue;
            };
            let note_bg = if session.lyric_editing() == Some(note.id) {
                Color::Blue
            } else if selection.is_highlighted(note.id) {
                Color::Magenta
            } else {
                Color::Green
            };
            let style = Style::default().fg(Color::Black).bg(note_bg);
            let mut lyric = note.lyric.chars();
            for col in start..end {
                let ch = if col == start {
                    '['
                } else {
                    lyric.next().unwrap_or('=')
                };
                cells[col as usize] = (ch, style);
            }
        }

        let line: Vec<Span> = cells
            .into_iter()
            .map(|(ch, style)| Span::styled(ch.to_string(), style))
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(line)),
            Rect::new(grid.x, y, grid.width, 1),
        );
    }

    // Mark an active box selection origin in the title area.
    if let crate::drag::DragSession::BoxSelect { additive, .. } = session.drag() {
        let label = if *additive { " box+ " } else { " box " };
        let width = (label.len() as u16).min(area.width.saturating_sub(2));
        frame.render_widget(
            Paragraph::new(label).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Rect::new(area.x + area.width.saturating_sub(width + 1), area.y, width, 1),
        );
    }

    grid
}
