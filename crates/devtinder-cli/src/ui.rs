use std::io;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap};
use ratatui::Terminal;

use devtinder_api::client::ApiClient;
use devtinder_api::flows::Session;
use devtinder_api::http::HttpTransport;
use devtinder_core::actions::UserAction;
use devtinder_core::config::Config;
use devtinder_core::models::Profile;
use devtinder_core::reducer::{fetches_for, AppEffect};
use devtinder_core::state::{AppState, LogLevel, Route};
use devtinder_core::store::Store;

use crate::forms::{FormKind, Forms};
use crate::keys::{map_key, Command};
use crate::worker::{Job, UiEvent, Worker};

const SHELL_ROUTES: [Route; 4] = [Route::Feed, Route::Requests, Route::Connections, Route::Profile];

struct TuiGuard;

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
    }
}

pub fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let transport = HttpTransport::new(config.base_url())?;
    let store = Store::new(config);
    let session = Session::new(store.clone(), ApiClient::new(transport));
    let (tx, rx) = mpsc::channel();
    let worker = Worker::spawn(session, tx)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, crossterm::cursor::Hide)?;
    let _guard = TuiGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    run_app(&mut terminal, &store, &worker, &rx).map_err(|e| e.into())
}

/// UI-only state that never goes through the reducer.
#[derive(Default)]
struct UiModel {
    forms: Forms,
    cursor: usize,
}

enum Flow {
    Continue,
    Exit,
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    store: &Store,
    worker: &Worker,
    rx: &mpsc::Receiver<UiEvent>,
) -> io::Result<()> {
    let mut ui = UiModel::default();
    schedule(store.dispatch(UserAction::Navigate(Route::HOME)), worker);

    loop {
        while let Ok(event) = rx.try_recv() {
            handle_ui_event(event, store, worker, &mut ui);
        }
        store.dispatch(UserAction::Tick {
            now_ms: chrono::Utc::now().timestamp_millis(),
        });

        let state = store.snapshot();
        ui.forms.sync_profile(state.slices.user.get());
        terminal.draw(|f| render(f, &state, &ui))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let form = FormKind::for_state(&state);
        let Some(command) = map_key(key, state.route, form, state.toast.is_some()) else {
            continue;
        };
        if let Flow::Exit = apply(command, &state, form, store, worker, &mut ui) {
            return Ok(());
        }
    }
}

fn schedule(effects: Vec<AppEffect>, worker: &Worker) {
    for resource in fetches_for(&effects) {
        worker.submit(Job::Fetch(resource));
    }
}

fn navigate(route: Route, store: &Store, worker: &Worker, ui: &mut UiModel) {
    ui.cursor = 0;
    ui.forms.reset_focus();
    schedule(store.dispatch(UserAction::Navigate(route)), worker);
}

fn handle_ui_event(event: UiEvent, store: &Store, worker: &Worker, ui: &mut UiModel) {
    let redirect = match &event {
        UiEvent::Fetched(_, outcome) => outcome.redirect(),
        UiEvent::Acted(outcome) => outcome.redirect(),
    };
    let Some(route) = redirect else {
        return;
    };
    if route == Route::Login {
        ui.forms.clear_session();
    } else {
        ui.forms.login.password.clear();
    }
    navigate(route, store, worker, ui);
}

fn apply(
    command: Command,
    state: &AppState,
    form: Option<FormKind>,
    store: &Store,
    worker: &Worker,
    ui: &mut UiModel,
) -> Flow {
    match command {
        Command::Quit => return Flow::Exit,
        Command::Dispatch(UserAction::Navigate(route)) => navigate(route, store, worker, ui),
        Command::Dispatch(action) => {
            let effects = store.dispatch(action);
            if store.read(|next| next.route != state.route || next.auth_mode != state.auth_mode) {
                ui.cursor = 0;
                ui.forms.reset_focus();
            }
            schedule(effects, worker);
        }
        Command::Input(c) => {
            if let Some(kind) = form {
                ui.forms.input(kind, c);
            }
        }
        Command::Backspace => {
            if let Some(kind) = form {
                ui.forms.backspace(kind);
            }
        }
        Command::FocusNext => {
            if let Some(kind) = form {
                ui.forms.focus_next(kind);
            }
        }
        Command::FocusPrev => {
            if let Some(kind) = form {
                ui.forms.focus_prev(kind);
            }
        }
        Command::Submit => match form {
            Some(FormKind::Login) => worker.submit(Job::Login(ui.forms.login.clone())),
            Some(FormKind::Signup) => worker.submit(Job::Signup(ui.forms.signup.clone())),
            Some(FormKind::Profile) => worker.submit(Job::SaveProfile(ui.forms.profile.clone())),
            None => {}
        },
        Command::Logout => worker.submit(Job::Logout),
        Command::Send(status) => {
            if let Some(top) = state.slices.feed.items().and_then(<[Profile]>::first) {
                worker.submit(Job::Send(status, top.id.clone()));
            }
        }
        Command::Review(status) => {
            let index = state.paging.requests + ui.cursor;
            if let Some(request) = state.slices.request.items().and_then(|items| items.get(index)) {
                worker.submit(Job::Review(status, request.id.clone()));
            }
        }
        Command::CursorDown => {
            let rows = visible_rows(state);
            if ui.cursor + 1 < rows {
                ui.cursor += 1;
            }
        }
        Command::CursorUp => ui.cursor = ui.cursor.saturating_sub(1),
        Command::Refresh => navigate(state.route, store, worker, ui),
    }
    ui.cursor = ui.cursor.min(visible_rows(&store.snapshot()).saturating_sub(1));
    Flow::Continue
}

fn visible_rows(state: &AppState) -> usize {
    let (start, len) = match state.route {
        Route::Requests => (state.paging.requests, state.slices.request.len()),
        Route::Connections => (state.paging.connections, state.slices.connection.len()),
        Route::Login | Route::Feed | Route::Profile => return 0,
    };
    len.saturating_sub(start).min(state.page_size())
}

#[derive(Clone, Copy)]
struct UiPalette {
    accent: Color,
    success: Color,
    warning: Color,
    danger: Color,
    muted: Color,
    border: Color,
    selected_bg: Color,
}

const PALETTE: UiPalette = UiPalette {
    accent: Color::LightMagenta,
    success: Color::Green,
    warning: Color::Yellow,
    danger: Color::Red,
    muted: Color::DarkGray,
    border: Color::Gray,
    selected_bg: Color::Rgb(58, 0, 58),
};

fn get_spinner() -> &'static str {
    let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let idx = (chrono::Utc::now().timestamp_millis() / 100).unsigned_abs() as usize % frames.len();
    frames[idx]
}

fn render(f: &mut ratatui::Frame, state: &AppState, ui: &UiModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0], state);
    match state.route {
        Route::Login => render_auth(f, chunks[1], state, ui),
        Route::Feed => render_feed(f, chunks[1], state),
        Route::Requests => render_requests(f, chunks[1], state, ui),
        Route::Connections => render_connections(f, chunks[1], state, ui),
        Route::Profile => render_profile(f, chunks[1], state, ui),
    }
    render_activity(f, chunks[2], state);
    render_action_bar(f, chunks[3], state);
    render_toast(f, state);
}

fn panel(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(PALETTE.border))
        .title(title.into())
}

fn render_header(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let welcome = match state.slices.user.get() {
        Some(user) => format!("Welcome, {}", user.first_name),
        None => "Not signed in".to_string(),
    };
    let block = panel(format!(" DevTinder | {welcome} "));

    if !state.route.requires_session() {
        let p = Paragraph::new(state.config.base_url().to_string())
            .style(Style::default().fg(PALETTE.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let titles: Vec<Line> = SHELL_ROUTES
        .iter()
        .enumerate()
        .map(|(i, route)| Line::from(format!("{} {}", i + 1, route.label())))
        .collect();
    let selected = SHELL_ROUTES.iter().position(|r| *r == state.route).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .block(block)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(PALETTE.accent)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

/// Loading and error lines shared by every view.
fn status_lines(state: &AppState, route: Route, what: &str) -> Vec<Line<'static>> {
    let status = state.views.get(route);
    let mut lines = Vec::new();
    if status.loading {
        lines.push(Line::from(Span::styled(
            format!("{} Loading {what}...", get_spinner()),
            Style::default().fg(PALETTE.muted),
        )));
    }
    if let Some(error) = &status.error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(PALETTE.danger),
        )));
    }
    lines
}

fn render_auth(f: &mut ratatui::Frame, area: Rect, state: &AppState, ui: &UiModel) {
    let area = centered_rect(60, 100, area);
    let Some(kind) = FormKind::for_state(state) else {
        return;
    };
    let mut lines = form_lines(kind, ui);
    lines.push(Line::from(""));
    lines.extend(status_lines(state, Route::Login, "session"));
    let other = state.auth_mode.toggle().label();
    lines.push(Line::from(Span::styled(
        format!("Ctrl-T: switch to {other}"),
        Style::default().fg(PALETTE.muted),
    )));

    let p = Paragraph::new(lines)
        .block(panel(format!(" {} ", state.auth_mode.label())))
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

fn form_lines(kind: FormKind, ui: &UiModel) -> Vec<Line<'static>> {
    kind.labels()
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let value = ui.forms.value(kind, i);
            let shown = if kind.is_secret(i) {
                "*".repeat(value.chars().count())
            } else {
                value.to_string()
            };
            let focused = ui.forms.focus() == i;
            let label_style = if focused {
                Style::default()
                    .fg(PALETTE.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(PALETTE.muted)
            };
            let cursor = if focused { "_" } else { "" };
            Line::from(vec![
                Span::styled(format!("{label:>11}: "), label_style),
                Span::raw(format!("{shown}{cursor}")),
            ])
        })
        .collect()
}

fn profile_lines(profile: &Profile) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("[{}] {}", profile.initials(), profile.full_name()),
        Style::default()
            .fg(PALETTE.accent)
            .add_modifier(Modifier::BOLD),
    ))];
    if let Some(line) = profile.age_gender_line() {
        lines.push(Line::from(line));
    }
    if let Some(about) = profile.about.as_deref().filter(|a| !a.is_empty()) {
        lines.push(Line::from(about.to_string()));
    }
    if !profile.skills.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Skills: ", Style::default().fg(PALETTE.muted)),
            Span::raw(profile.skills.join(", ")),
        ]));
    }
    if let Some(photo) = profile.photo_url.as_deref().filter(|p| !p.is_empty()) {
        lines.push(Line::from(Span::styled(
            photo.to_string(),
            Style::default().fg(PALETTE.muted),
        )));
    }
    lines
}

fn render_feed(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let mut lines = status_lines(state, Route::Feed, "feed");
    match state.slices.feed.items() {
        None => {}
        Some([]) => lines.push(Line::from("No new users found")),
        Some(entries) => {
            lines.extend(profile_lines(&entries[0]));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{} more in your feed", entries.len() - 1),
                Style::default().fg(PALETTE.muted),
            )));
        }
    }
    let p = Paragraph::new(lines)
        .block(panel(" Feed "))
        .wrap(Wrap { trim: true });
    f.render_widget(p, centered_rect(70, 100, area));
}

fn paged_list(
    f: &mut ratatui::Frame,
    area: Rect,
    title: &str,
    header: Vec<Line<'static>>,
    rows: Vec<ListItem<'static>>,
    footer: String,
) {
    let block = panel(format!(" {title} "));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header.len() as u16),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);
    f.render_widget(Paragraph::new(header), chunks[0]);
    f.render_widget(List::new(rows), chunks[1]);
    f.render_widget(
        Paragraph::new(footer)
            .style(Style::default().fg(PALETTE.muted))
            .alignment(Alignment::Right),
        chunks[2],
    );
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().bg(PALETTE.selected_bg)
    } else {
        Style::default()
    }
}

fn page_footer(start: usize, shown: usize, total: usize) -> String {
    if total == 0 {
        return String::new();
    }
    format!("{}-{} of {total}", start + 1, start + shown)
}

fn render_requests(f: &mut ratatui::Frame, area: Rect, state: &AppState, ui: &UiModel) {
    let mut header = status_lines(state, Route::Requests, "requests");
    let start = state.paging.requests;
    let items = state.slices.request.items().unwrap_or_default();
    if state.slices.request.is_loaded() && items.is_empty() {
        header.push(Line::from("No Connection Requests"));
    }
    let rows: Vec<ListItem> = items
        .iter()
        .skip(start)
        .take(state.page_size())
        .enumerate()
        .map(|(i, request)| {
            let lines = match &request.from_user {
                Some(from) => profile_lines(from),
                None => vec![Line::from("No request data available")],
            };
            ListItem::new(lines).style(row_style(i == ui.cursor))
        })
        .collect();
    let footer = page_footer(start, rows.len(), items.len());
    paged_list(f, area, "Requests", header, rows, footer);
}

fn render_connections(f: &mut ratatui::Frame, area: Rect, state: &AppState, ui: &UiModel) {
    let mut header = status_lines(state, Route::Connections, "connections");
    let start = state.paging.connections;
    let items = state.slices.connection.items().unwrap_or_default();
    if state.slices.connection.is_loaded() && items.is_empty() {
        header.push(Line::from("No Connections Yet"));
    }
    let rows: Vec<ListItem> = items
        .iter()
        .skip(start)
        .take(state.page_size())
        .enumerate()
        .map(|(i, connection)| ListItem::new(profile_lines(connection)).style(row_style(i == ui.cursor)))
        .collect();
    let footer = page_footer(start, rows.len(), items.len());
    paged_list(f, area, "Connections", header, rows, footer);
}

fn render_profile(f: &mut ratatui::Frame, area: Rect, state: &AppState, ui: &UiModel) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let mut lines = form_lines(FormKind::Profile, ui);
    lines.push(Line::from(""));
    lines.extend(status_lines(state, Route::Profile, "profile"));
    let p = Paragraph::new(lines)
        .block(panel(" Edit Profile "))
        .wrap(Wrap { trim: false });
    f.render_widget(p, chunks[0]);

    let preview = match state.slices.user.get() {
        Some(user) => profile_lines(&preview_profile(user, &ui.forms)),
        None if state.views.profile.loading => vec![Line::from(Span::styled(
            "Loading profile...",
            Style::default().fg(PALETTE.muted),
        ))],
        None => vec![Line::from(Span::styled(
            "No profile loaded",
            Style::default().fg(PALETTE.muted),
        ))],
    };
    let p = Paragraph::new(preview)
        .block(panel(" Preview "))
        .wrap(Wrap { trim: true });
    f.render_widget(p, chunks[1]);
}

/// The signed-in user as it would look with the form's current values.
fn preview_profile(user: &Profile, forms: &Forms) -> Profile {
    let form = &forms.profile;
    let text = |value: &str| Some(value.trim().to_string()).filter(|v| !v.is_empty());
    Profile {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        photo_url: text(&form.photo_url),
        age: devtinder_core::validation::parse_age(&form.age).ok().flatten(),
        gender: text(&form.gender),
        about: text(&form.about),
        skills: devtinder_core::validation::parse_skills(&form.skills),
        ..user.clone()
    }
}

fn render_activity(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let logs: Vec<Line> = state
        .activity
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| {
            let style = match entry.level {
                LogLevel::Error => Style::default().fg(PALETTE.danger),
                LogLevel::Warn => Style::default().fg(PALETTE.warning),
                LogLevel::Info => Style::default(),
            };
            let ts = entry
                .ts_ms
                .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
                .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(format!("{ts} "), Style::default().fg(PALETTE.muted)),
                Span::styled(format!("[{}] {}", entry.level.label(), entry.message), style),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(logs).block(panel(" Recent Activity ")), area);
}

fn render_action_bar(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let hints: &[(&str, &str)] = match state.route {
        Route::Login => &[("Enter", "submit"), ("Tab", "field"), ("Ctrl-T", "mode"), ("Esc", "quit")],
        Route::Feed => &[("i", "interested"), ("x", "ignore"), ("g", "refresh"), ("l", "logout"), ("q", "quit")],
        Route::Requests => &[("a", "accept"), ("r", "reject"), ("j/k", "select"), ("n/p", "page"), ("q", "quit")],
        Route::Connections => &[("j/k", "select"), ("n/p", "page"), ("g", "refresh"), ("l", "logout"), ("q", "quit")],
        Route::Profile => &[("Enter", "save"), ("Tab", "field"), ("Esc", "feed"), ("Ctrl-C", "quit")],
    };
    let mut spans = Vec::new();
    if state.route.requires_session() {
        spans.push(Span::styled("<- -> ", Style::default().fg(PALETTE.accent)));
        spans.push(Span::styled("views ", Style::default().fg(PALETTE.muted)));
    }
    for (key, what) in hints {
        spans.push(Span::styled(*key, Style::default().fg(PALETTE.accent)));
        spans.push(Span::styled(format!(" {what} "), Style::default().fg(PALETTE.muted)));
    }
    let p = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(panel(" Action Bar "));
    f.render_widget(p, area);
}

fn render_toast(f: &mut ratatui::Frame, state: &AppState) {
    let Some(toast) = &state.toast else {
        return;
    };
    let full = f.area();
    let width = (toast.message.chars().count() as u16 + 4).min(full.width);
    let area = Rect {
        x: full.width.saturating_sub(width + 1),
        y: 1,
        width,
        height: 3.min(full.height),
    };
    f.render_widget(Clear, area);
    let p = Paragraph::new(toast.message.to_string())
        .style(Style::default().fg(PALETTE.success))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(PALETTE.success)),
        );
    f.render_widget(p, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
