//! Terminal rendering for the host binary.
//!
//! One terminal cell is one pixel of the editor view, so the grid area
//! returned by [`render`] is exactly the editor viewport: mouse coordinates
//! relative to its top-left corner go straight into the session.

mod help;
mod piano_roll;

use crate::session::EditorSession;
use crate::view::ViewState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub use help::render_help;
pub use piano_roll::{render_piano_roll, KEY_LABEL_WIDTH};

/// Quarters per measure on the ruler and grid (4/4 time).
pub const QUARTERS_PER_MEASURE: f64 = 4.0;

/// True if a multiple of `step` lies in the quarter range `[start, end)`.
pub(crate) fn contains_multiple(start: f64, end: f64, step: f64) -> bool {
    (start / step).ceil() * step < end
}

/// Renders a time ruler with measure numbers and beat dots.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `area` - One row aligned with the grid columns
/// * `view` - The editor view the columns map through
pub fn render_time_ruler(frame: &mut Frame, area: Rect, view: &ViewState) {
    let mut spans: Vec<Span> = Vec::with_capacity(area.width as usize);
    let mut col = 0u16;

    while col < area.width {
        let start = view.pixel_x_to_quarter(col as f64);
        let end = view.pixel_x_to_quarter(col as f64 + 1.0);

        if contains_multiple(start, end, QUARTERS_PER_MEASURE) {
            let measure = (start / QUARTERS_PER_MEASURE).ceil() as i64 + 1;
            let label = measure.to_string();
            let remaining = (area.width - col) as usize;
            if label.len() <= remaining {
                spans.push(Span::styled(
                    label.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ));
                col += label.len() as u16;
                continue;
            }
            spans.push(Span::styled("|", Style::default().fg(Color::Yellow)));
        } else if contains_multiple(start, end, 1.0) {
            spans.push(Span::styled(".", Style::default().fg(Color::DarkGray)));
        } else {
            spans.push(Span::raw(" "));
        }
        col += 1;
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders the whole screen and returns the grid area (the editor viewport).
///
/// The layout is the piano roll on top and a one-line status bar below.
pub fn render(frame: &mut Frame, session: &EditorSession, status: &str) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(frame.area());

    let grid = render_piano_roll(frame, chunks[0], session);
    render_status(frame, chunks[1], session, status);
    grid
}

fn render_status(frame: &mut Frame, area: Rect, session: &EditorSession, status: &str) {
    let view = session.view();
    let info = format!(
        " {:?} | {} notes, {} selected | snap 1/{} | next length {} ",
        session.drag_mode(),
        session.part().note_count(),
        session.selection().len(),
        (1.0 / view.snap_unit().quarters()).round() as i64 * 4,
        session.last_note_length(),
    );
    let line = Line::from(vec![
        Span::styled(info, Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::styled(format!(" {status}"), Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Helper function to center a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
