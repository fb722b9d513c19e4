//! Help overlay rendering.
//!
//! Displays mouse and keyboard controls in a modal overlay.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;

/// Key binding entry for the help display.
struct KeyBinding {
    key: &'static str,
    description: &'static str,
}

const MOUSE_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Left drag",
        description: "Create a note on empty space, move a note, or resize at its right edge",
    },
    KeyBinding {
        key: "Ctrl+Left drag",
        description: "Box select (replaces the selection)",
    },
    KeyBinding {
        key: "Ctrl+Shift+drag",
        description: "Box select (adds to the selection)",
    },
    KeyBinding {
        key: "Right drag",
        description: "Erase notes under the pointer",
    },
    KeyBinding {
        key: "Middle click",
        description: "Toggle the note under the pointer in the selection",
    },
    KeyBinding {
        key: "Double click",
        description: "Edit the lyric of a note",
    },
    KeyBinding {
        key: "Wheel",
        description: "Scroll pitches",
    },
    KeyBinding {
        key: "Shift+Wheel",
        description: "Scroll time",
    },
    KeyBinding {
        key: "Ctrl+Wheel",
        description: "Zoom time around the pointer",
    },
];

const KEY_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "?",
        description: "Toggle this help",
    },
    KeyBinding {
        key: "q / Ctrl+C",
        description: "Quit",
    },
    KeyBinding {
        key: "Ctrl+A",
        description: "Select all notes",
    },
    KeyBinding {
        key: "Esc",
        description: "Clear the selection",
    },
    KeyBinding {
        key: "Delete",
        description: "Delete selected notes",
    },
    KeyBinding {
        key: "+ / -",
        description: "Taller / shorter note rows",
    },
    KeyBinding {
        key: "[ / ]",
        description: "Finer / coarser snap",
    },
    KeyBinding {
        key: "Arrows",
        description: "Scroll the view",
    },
];

const LYRIC_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Type",
        description: "Edit the lyric",
    },
    KeyBinding {
        key: "Enter / Esc",
        description: "Finish editing",
    },
];

/// Renders the help overlay.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `scroll` - Vertical scroll offset
pub fn render_help(frame: &mut Frame, scroll: u16) {
    let area = centered_rect(70, 80, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help - Controls ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::White);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (title, bindings) in [
        ("Mouse", MOUSE_BINDINGS),
        ("Keyboard", KEY_BINDINGS),
        ("Lyric editing", LYRIC_BINDINGS),
    ] {
        lines.push(Line::from(Span::styled(title, section_style)));
        for binding in bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("{:18}", binding.key), key_style),
                Span::styled(binding.description, desc_style),
            ]));
        }
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), chunks[0]);

    // Fixed footer
    let footer = Paragraph::new(Line::from(Span::styled(
        "Scroll: Up/Down/Wheel  |  Close: ?/Esc/Click",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));
    frame.render_widget(footer, chunks[1]);
}
