//! noteroll - a terminal piano-roll note editor.
//!
//! Hosts an [`EditorSession`] in the terminal: every cell is one pixel of the
//! editor view, mouse events drive the drag controller and the frame loop
//! drives edge scrolling.
//!
//! # Usage
//!
//! ```bash
//! cargo run                               # 64-quarter part, terminal defaults
//! cargo run -- --quarters 128             # longer part
//! cargo run -- --config editor.json       # settings from a JSON file
//! RUST_LOG=noteroll=debug cargo run 2>log # gesture logging
//! ```
//!
//! Press `?` for help with the controls.

use noteroll::{EditorConfig, EditorEvent, EditorSession, Modifiers, NoteId, PointerButton};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Wheel delta of one scroll notch.
const WHEEL_NOTCH: f64 = 120.0;

/// Cells scrolled per arrow key press.
const ARROW_SCROLL: f64 = 4.0;

/// Time threshold for detecting double-clicks (in milliseconds).
const DOUBLE_CLICK_THRESHOLD_MS: u128 = 400;

/// Command-line options for the application.
struct CliOptions {
    /// JSON file with editor settings.
    config: Option<PathBuf>,
    /// Part length override, in quarters.
    quarters: Option<u32>,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - `--config <path>` or `-c <path>`: Load editor settings from JSON
    /// - `--quarters <n>` or `-q <n>`: Length of the part in quarters
    /// - `--help` or `-h`: Print help and exit
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut config = None;
        let mut quarters = None;
        let mut i = 1;

        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    i += 1;
                    let path = args
                        .get(i)
                        .context("--config requires a path argument")?;
                    config = Some(PathBuf::from(path));
                }
                "--quarters" | "-q" => {
                    i += 1;
                    let value = args
                        .get(i)
                        .context("--quarters requires a number argument")?;
                    let parsed: u32 = value
                        .parse()
                        .with_context(|| format!("invalid quarter count: {value}"))?;
                    quarters = Some(parsed);
                }
                "--help" | "-h" => {
                    eprintln!("noteroll - Terminal piano-roll note editor");
                    eprintln!();
                    eprintln!(
                        "Usage: {} [OPTIONS]",
                        args.first().map(String::as_str).unwrap_or("noteroll")
                    );
                    eprintln!();
                    eprintln!("Options:");
                    eprintln!("  -c, --config PATH    Load editor settings from a JSON file");
                    eprintln!("  -q, --quarters N     Length of the part in quarters");
                    eprintln!("  -h, --help           Print this help message");
                    eprintln!();
                    eprintln!("Set RUST_LOG (e.g. RUST_LOG=noteroll=debug) to log to stderr.");
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown option: {}", other);
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
            i += 1;
        }

        Ok(Self { config, quarters })
    }
}

/// Defaults scaled for a terminal, where a cell is one pixel.
fn terminal_config() -> EditorConfig {
    EditorConfig {
        pixels_per_quarter: 8.0,
        pixels_per_note: 1.0,
        min_pixels_per_quarter: 2.0,
        max_pixels_per_quarter: 64.0,
        min_pixels_per_note: 1.0,
        max_pixels_per_note: 3.0,
        view_width: 80.0,
        view_height: 24.0,
        resize_margin: 1.0,
        ..EditorConfig::default()
    }
}

fn main() -> Result<()> {
    // Parse CLI options first (before any terminal setup)
    let cli = CliOptions::parse()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => EditorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => terminal_config(),
    };
    if let Some(quarters) = cli.quarters {
        config.part_quarters = quarters;
    }
    let session = EditorSession::new(config).context("Failed to initialize editor")?;

    let mut terminal = setup_terminal().context("Failed to setup terminal")?;
    let mut host = Host::new(session);
    let result = run_app(&mut terminal, &mut host);
    restore_terminal(&mut terminal).context("Failed to restore terminal")?;

    result
}

/// Sets up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )
    .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Tracks the last click position and time for double-click detection.
struct ClickTracker {
    last_pos: Option<(u16, u16)>,
    last_time: Option<Instant>,
}

impl ClickTracker {
    fn new() -> Self {
        Self {
            last_pos: None,
            last_time: None,
        }
    }

    /// Records a click and returns true if it's a double-click.
    fn record_click(&mut self, x: u16, y: u16) -> bool {
        let now = Instant::now();
        let is_double = match (self.last_pos, self.last_time) {
            (Some((lx, ly)), Some(lt)) => {
                lx == x && ly == y && now.duration_since(lt).as_millis() < DOUBLE_CLICK_THRESHOLD_MS
            }
            _ => false,
        };

        if is_double {
            self.last_pos = None;
            self.last_time = None;
        } else {
            self.last_pos = Some((x, y));
            self.last_time = Some(now);
        }

        is_double
    }
}

/// Terminal-side state around the editor session.
struct Host {
    session: EditorSession,
    /// Grid area of the last frame; its origin is the view origin.
    grid: Rect,
    status: String,
    show_help: bool,
    help_scroll: u16,
    clicks: ClickTracker,
    should_quit: bool,
}

impl Host {
    fn new(session: EditorSession) -> Self {
        Self {
            session,
            grid: Rect::default(),
            status: "Press ? for help".to_string(),
            show_help: false,
            help_scroll: 0,
            clicks: ClickTracker::new(),
            should_quit: false,
        }
    }

    /// Converts a terminal cell to view coordinates (the cell center).
    /// Cells outside the grid map outside the view, which drives edge scrolling.
    fn to_view(&self, column: u16, row: u16) -> (f64, f64) {
        (
            column as f64 - self.grid.x as f64 + 0.5,
            row as f64 - self.grid.y as f64 + 0.5,
        )
    }

    fn in_grid(&self, column: u16, row: u16) -> bool {
        column >= self.grid.x
            && column < self.grid.x + self.grid.width
            && row >= self.grid.y
            && row < self.grid.y + self.grid.height
    }

    /// Keeps the view size in step with the grid drawn last frame.
    fn sync_view_size(&mut self) {
        let view = self.session.view();
        let (width, height) = (self.grid.width as f64, self.grid.height as f64);
        if width > 0.0 && (view.view_width != width || view.view_height != height) {
            self.session.resize_view(width, height);
        }
    }

    /// Drains session notifications.
    fn drain_events(&mut self) {
        for event in self.session.take_events() {
            if event == EditorEvent::GestureCommitted {
                let part = self.session.part();
                tracing::info!(
                    "gesture committed: {} notes, {} selected",
                    part.note_count(),
                    self.session.selection().len()
                );
            }
        }
    }

    /// The note whose lyric is being typed, if any.
    fn lyric_target(&self) -> Option<NoteId> {
        self.session.lyric_editing()
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.show_help {
            match mouse.kind {
                MouseEventKind::Down(_) => {
                    self.show_help = false;
                    self.help_scroll = 0;
                }
                MouseEventKind::ScrollUp => {
                    self.help_scroll = self.help_scroll.saturating_sub(3);
                }
                MouseEventKind::ScrollDown => {
                    self.help_scroll = self.help_scroll.saturating_add(3);
                }
                _ => {}
            }
            return;
        }

        let (x, y) = self.to_view(mouse.column, mouse.row);
        let modifiers = Modifiers {
            ctrl: mouse.modifiers.contains(KeyModifiers::CONTROL)
                || mouse.modifiers.contains(KeyModifiers::SUPER),
            shift: mouse.modifiers.contains(KeyModifiers::SHIFT),
        };
        let inside = self.in_grid(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => {
                let double = self.clicks.record_click(mouse.column, mouse.row);
                match self.session.hit_test(x, y).note() {
                    Some(id) if double => {
                        self.session.set_lyric_editing(Some(id));
                        self.status = "Editing lyric (Enter to finish)".to_string();
                    }
                    _ => {
                        self.session.set_lyric_editing(None);
                        self.session
                            .pointer_down(x, y, PointerButton::Primary, modifiers);
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Right) if inside => {
                self.session
                    .pointer_down(x, y, PointerButton::Secondary, modifiers);
            }
            MouseEventKind::Down(MouseButton::Middle) if inside => {
                if let Some(id) = self.session.hit_test(x, y).note() {
                    self.session.toggle_note_selection(id);
                }
            }
            MouseEventKind::Drag(MouseButton::Left | MouseButton::Right) => {
                self.session.pointer_move(x, y);
            }
            MouseEventKind::Up(MouseButton::Left | MouseButton::Right) => {
                self.session.pointer_up();
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown if inside => {
                let delta = if mouse.kind == MouseEventKind::ScrollUp {
                    WHEEL_NOTCH
                } else {
                    -WHEEL_NOTCH
                };
                self.session.wheel(x, delta, modifiers);
            }
            MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight if inside => {
                let delta = if mouse.kind == MouseEventKind::ScrollLeft {
                    WHEEL_NOTCH
                } else {
                    -WHEEL_NOTCH
                };
                let pan = Modifiers {
                    ctrl: false,
                    shift: true,
                };
                self.session.wheel(x, delta, pan);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            match code {
                KeyCode::Char('?') | KeyCode::Esc => {
                    self.show_help = false;
                    self.help_scroll = 0;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.help_scroll = self.help_scroll.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.help_scroll = self.help_scroll.saturating_add(1);
                }
                _ => {}
            }
            return;
        }

        if let Some(id) = self.lyric_target() {
            self.handle_lyric_key(id, code);
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('a') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.session.select_all();
            }
            KeyCode::Esc => self.session.deselect_all(),
            KeyCode::Delete | KeyCode::Backspace => {
                let removed = self.session.delete_selected();
                if !removed.is_empty() {
                    self.status = format!("Deleted {} notes", removed.len());
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let height = self.session.view().pixels_per_note() + 1.0;
                self.session.set_note_height(height);
            }
            KeyCode::Char('-') => {
                let height = self.session.view().pixels_per_note() - 1.0;
                self.session.set_note_height(height);
            }
            KeyCode::Char('[') => self.scale_snap(0.5),
            KeyCode::Char(']') => self.scale_snap(2.0),
            KeyCode::Left => self.session.scroll_by(-ARROW_SCROLL, 0.0),
            KeyCode::Right => self.session.scroll_by(ARROW_SCROLL, 0.0),
            KeyCode::Up => self.session.scroll_by(0.0, -ARROW_SCROLL),
            KeyCode::Down => self.session.scroll_by(0.0, ARROW_SCROLL),
            _ => {}
        }
    }

    fn handle_lyric_key(&mut self, id: NoteId, code: KeyCode) {
        let Some(mut lyric) = self.session.part().get_note(id).map(|n| n.lyric.clone()) else {
            self.session.set_lyric_editing(None);
            return;
        };
        match code {
            KeyCode::Enter | KeyCode::Esc => {
                self.session.set_lyric_editing(None);
                self.status = format!("Lyric set to \"{lyric}\"");
            }
            KeyCode::Backspace => {
                lyric.pop();
                self.session.set_lyric(id, lyric);
            }
            KeyCode::Char(c) => {
                lyric.push(c);
                self.session.set_lyric(id, lyric);
            }
            _ => {}
        }
    }

    /// Multiplies the snap unit, keeping it between a whole note and a 1/64.
    fn scale_snap(&mut self, factor: f64) {
        let quarters = (self.session.view().snap_unit().quarters() * factor).clamp(1.0 / 16.0, 4.0);
        match self.session.set_snap_unit(quarters) {
            Ok(()) => self.status = format!("Snap: {quarters} quarters"),
            Err(e) => self.status = e.to_string(),
        }
    }
}

/// Main application loop.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, host: &mut Host) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(last_frame).as_secs_f64() * 1000.0;
        last_frame = now;
        host.session.on_frame(elapsed_ms);
        host.drain_events();

        terminal.draw(|frame| {
            host.grid = noteroll::ui::render(frame, &host.session, &host.status);
            if host.show_help {
                noteroll::ui::render_help(frame, host.help_scroll);
            }
        })?;
        host.sync_view_size();

        // Poll with a short timeout so edge scrolling keeps running
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    host.handle_key(key.code, key.modifiers);
                }
                Event::Mouse(mouse) => host.handle_mouse(mouse),
                Event::FocusLost => host.session.capture_lost(),
                _ => {}
            }
        }

        if host.should_quit {
            break;
        }
    }

    Ok(())
}
