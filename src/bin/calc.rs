//! The calculator's terminal front end: owns the crossterm/ratatui terminal
//! and the ~500ms cursor-blink timer (§5 "Scheduling model"), translating
//! key events into `KeyCode`s for `neda_calc::App` and painting its tree
//! with `neda_calc::display::TermDisplay`.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing::info;

use neda_calc::display::{Display, TermDisplay};
use neda_calc::entry::Mode;
use neda_calc::keys;
use neda_calc::neda::render;
use neda_calc::App;

/// Blink interval for the cursor-visible flag, matching the original's
/// periodic-timer-interrupt cadence (§5).
const BLINK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Parser, Debug)]
#[command(name = "calc", about = "A handheld scientific calculator, in a terminal")]
struct Args {
    /// Directory to write the rolling log file into.
    #[arg(long, default_value = "./log")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let file_appender = tracing_appender::rolling::daily(&args.log_dir, "calc.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("starting up");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new();
    let result = run(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "exited with error");
    }
    result
}

fn run<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let mut cursor_visible = true;
    let mut last_blink = Instant::now();

    loop {
        terminal.draw(|f| ui(f, &app, cursor_visible))?;

        let timeout = BLINK_INTERVAL.saturating_sub(last_blink.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.code == event::KeyCode::Char('q') && key.modifiers.contains(event::KeyModifiers::CONTROL) {
                    app.quit();
                } else if let Some(code) = keys::from_crossterm(key) {
                    app.handle_key(code);
                }
                cursor_visible = true;
                last_blink = Instant::now();
            }
        }

        if last_blink.elapsed() >= BLINK_INTERVAL {
            cursor_visible = !cursor_visible;
            last_blink = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &App, cursor_visible: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(10), Constraint::Length(3)])
        .split(f.area());

    draw_expression(f, app, chunks[0], cursor_visible);
    draw_status(f, app, chunks[1]);
}

fn draw_expression(f: &mut Frame, app: &App, area: Rect, cursor_visible: bool) {
    let title = match app.entry.mode {
        Mode::Error => "Error",
        Mode::Settings => "Settings",
        Mode::History => "History",
        Mode::MatrixDimsRows => "Matrix rows?",
        Mode::MatrixDimsCols => "Matrix columns?",
        Mode::Shift => "Entry (shift)",
        Mode::Normal => "Entry",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(msg) = app.entry.error {
        let p = Paragraph::new(msg).style(Style::default().fg(Color::Red));
        f.render_widget(p, inner);
        return;
    }

    let buf = f.buffer_mut();
    let mut display = TermDisplay { buf, area: inner, style: Style::default().fg(Color::White) };
    let tree = &app.entry.tree;
    let mut scratch = tree.snapshot(
        &(0..tree.child_count(tree.root)).map(|i| tree.child_at(tree.root, i)).collect::<Vec<_>>(),
        0,
        tree.child_count(tree.root),
    );
    let root = scratch.root;
    render::draw(&mut scratch, &mut display, root, 0, 0);

    if app.entry.mode == Mode::History {
        if let Some(rt) = &app.entry.result_tree {
            // §4.2 "Result display": flush to the bottom-right of the area.
            let geom = rt.arena.get(rt.root).geom;
            let mut rscratch = rt.snapshot(
                &(0..rt.child_count(rt.root)).map(|i| rt.child_at(rt.root, i)).collect::<Vec<_>>(),
                0,
                rt.child_count(rt.root),
            );
            let rroot = rscratch.root;
            let rx = (inner.width as i16 - geom.width as i16).max(0);
            let ry = (inner.height as i16 - geom.height as i16).max(0);
            render::draw(&mut rscratch, &mut display, rroot, rx, ry);
        }
    }

    if cursor_visible {
        let cursor_x = inner.x + app.entry.cursor.index as u16;
        if cursor_x < inner.right() {
            display.draw_line(cursor_x as i16 - inner.x as i16, 0, cursor_x as i16 - inner.x as i16, inner.height as i16);
        }
    }
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let text = format!(
        "rad={} autofrac={} mixed={} dec={} | history={}",
        app.settings.use_radians,
        app.settings.auto_fractions,
        app.settings.as_mixed_number,
        app.settings.force_decimal,
        app.entry.history.len(),
    );
    let p = Paragraph::new(text).style(Style::default().fg(Color::DarkGray)).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, area);
}
