use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::info;

use station_rota::app::{App, Screen};
use station_rota::components::{
    detail_popup::render_detail_popup, week_view::DragPreview, GridPlacement, RotaBoard, StatusBar,
    WeekView,
};
use station_rota::config::{self, Config};
use station_rota::event::{self, Input};
use station_rota::logging;
use station_rota::store::{Persister, Store};
use station_rota::theme::Theme;
use station_rota::tui;

const SAVE_DEBOUNCE: Duration = Duration::from_millis(400);

/// Weekly schedule and staff rota for a broadcast station.
#[derive(Debug, Parser)]
#[command(name = "station-rota", version, about)]
struct Args {
    /// Schedule data file (JSON).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Config file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Open the week containing this date (YYYY-MM-DD).
    #[arg(long)]
    week: Option<NaiveDate>,

    /// Start on the rota view instead of the schedule.
    #[arg(long)]
    rota: bool,

    /// Where to write the log.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| config::app_data_dir().join("station-rota.log"));
    logging::init(&log_path).wrap_err_with(|| format!("opening log {}", log_path.display()))?;

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?,
        None => Config::load().wrap_err("reading config")?,
    };
    if let Some(path) = args.data {
        config.data.path = Some(path);
    }

    let store = Store::new(config.data_path());
    let schedule = store
        .load()
        .wrap_err_with(|| format!("loading {}", store.path().display()))?;
    let persister = Persister::spawn(store, SAVE_DEBOUNCE)?;
    info!(data = %config.data_path().display(), "starting");

    let screen = if args.rota { Screen::Rota } else { Screen::Schedule };
    let mut app = App::new(config, schedule, Some(persister), args.week, screen);

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    app.shutdown();
    info!("stopped");
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| draw(frame, app))?;

        match event::next_input(Duration::from_millis(100))? {
            Some(Input::Key(key)) => handle_key(app, key),
            Some(Input::Mouse(mouse)) => app.handle_mouse(mouse),
            Some(Input::Resize) => app.cancel_interaction(),
            None => {}
        }
        app.tick();
    }
    Ok(())
}

fn draw(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
    let content = layout[0];

    match app.screen {
        Screen::Schedule | Screen::Rota => {
            let inner = Block::default().borders(Borders::ALL).inner(content);
            let placement = GridPlacement::compute(inner, app.scroll_rows, &app.config.layout);
            app.placement = Some(placement);
            let preview = app.drag.preview(&app.layout, &placement.viewport);
            let preview = match &preview {
                Some(Ok(change)) => Some(DragPreview::Landing(change)),
                Some(Err(reason)) => Some(DragPreview::Invalid(reason)),
                None => None,
            };
            WeekView::render(
                frame,
                content,
                &placement,
                &app.layout,
                &app.schedule,
                app.screen.view_mode(),
                app.today,
                preview,
                &app.theme,
            );
        }
        Screen::Staff => {
            app.placement = None;
            let dragging = app.staff_drag.as_ref().map(|d| d.employee_id.as_str());
            let regions = RotaBoard::render(
                frame,
                content,
                &app.schedule,
                app.week_start,
                app.today,
                dragging,
                &app.theme,
            );
            app.board_regions = regions;
        }
    }

    if let Some(detail) = &app.detail {
        render_detail_popup(frame, area, detail, &app.schedule, app.reference_day(), &app.theme);
    }
    if app.show_help {
        render_help(frame, area, &app.theme);
    }

    StatusBar::render(
        frame,
        layout[1],
        app.screen,
        app.status_message.as_deref(),
        app.schedule.open_tickets(),
        &app.theme,
    );
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Help overlay takes priority
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }
    if app.detail.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.close_detail();
        }
        return;
    }

    app.status_message = None;
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => app.running = false,
        (KeyCode::Esc, _) if app.is_interacting() => {
            app.cancel_interaction();
            app.status_message = Some("Drag cancelled".to_string());
        }
        (KeyCode::Char('q'), _) => app.running = false,
        (KeyCode::Char('1'), _) => app.set_screen(Screen::Schedule),
        (KeyCode::Char('2'), _) => app.set_screen(Screen::Rota),
        (KeyCode::Char('3'), _) => app.set_screen(Screen::Staff),
        (KeyCode::Tab, _) => {
            let next = match app.screen {
                Screen::Schedule => Screen::Rota,
                Screen::Rota => Screen::Staff,
                Screen::Staff => Screen::Schedule,
            };
            app.set_screen(next);
        }
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) | (KeyCode::Char('['), _) => app.prev_week(),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) | (KeyCode::Char(']'), _) => app.next_week(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.scroll_up(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.scroll_down(),
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn render_help(frame: &mut ratatui::Frame, area: Rect, theme: &Theme) {
    let popup_w = area.width.clamp(30, 56).min(area.width);
    let popup_h = area.height.clamp(12, 22).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keys and mouse ")
        .title_style(theme.header)
        .borders(Borders::ALL)
        .border_style(theme.border);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key = theme.selected;
    let entry = |k: &'static str, desc: &'static str| {
        Line::from(vec![Span::styled(format!("  {:<10}", k), key), Span::raw(desc)])
    };
    let lines = vec![
        Line::from(Span::styled("Navigation", theme.header)),
        entry("h/l [/]", "Previous / next week"),
        entry("j/k", "Scroll the hours"),
        entry("t", "This week"),
        entry("1/2/3 Tab", "Schedule / Rota / Staff"),
        Line::from(""),
        Line::from(Span::styled("Calendar", theme.header)),
        entry("drag", "Move an event (snaps to 15 min)"),
        entry("drag edge", "Change start or end time"),
        entry("click", "Show details"),
        entry("Esc", "Cancel the drag"),
        Line::from(""),
        Line::from(Span::styled("Staff", theme.header)),
        entry("drag name", "Assign to a shift"),
        entry("drag off", "Remove from the shift"),
        Line::from(""),
        entry("q", "Quit"),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
