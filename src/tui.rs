use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Gauge, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap,
};
use ratatui::{Frame, Terminal};

use crate::cli::{self, HELP_LINES};
use crate::core::error::TrackError;
use crate::core::formatter::{format_record, sort_marker};
use crate::core::job::JobRecord;
use crate::core::stage::StageId;
use crate::core::stats::{stage_counts, summarize};
use crate::core::storage::KeyValueStore;
use crate::core::store::Theme;
use crate::core::tracker::Tracker;
use crate::core::view::{derive_view, filter_jobs, SortKey, SortSpec};

const DIVIDER_MARKER: &str = "<divider>";
const MAX_MESSAGES: usize = 500;

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, TrackError> {
        enable_raw_mode().map_err(terminal_err)?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen).map_err(terminal_err)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

fn terminal_err(e: io::Error) -> TrackError {
    TrackError::Terminal {
        message: e.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    Board,
    List,
    Analytics,
}

impl ViewMode {
    const ALL: [ViewMode; 3] = [ViewMode::Board, ViewMode::List, ViewMode::Analytics];

    fn title(self) -> &'static str {
        match self {
            ViewMode::Board => "Board",
            ViewMode::List => "List",
            ViewMode::Analytics => "Analytics",
        }
    }

    fn next(self) -> Self {
        match self {
            ViewMode::Board => ViewMode::List,
            ViewMode::List => ViewMode::Analytics,
            ViewMode::Analytics => ViewMode::Board,
        }
    }

    fn prev(self) -> Self {
        self.next().next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Search,
    Command,
}

#[derive(Debug)]
struct AppState {
    view: ViewMode,
    mode: InputMode,
    query: String,
    sort: SortSpec,
    input: String,
    messages: Vec<String>,
    board_column: usize,
    board_row: usize,
    list_row: usize,
    should_quit: bool,
}

impl AppState {
    fn new() -> Self {
        Self {
            view: ViewMode::Board,
            mode: InputMode::Normal,
            query: String::new(),
            sort: SortSpec::default(),
            input: String::new(),
            messages: vec!["Welcome to trackflow. Press ':' and type 'help' for commands.".to_string()],
            board_column: 0,
            board_row: 0,
            list_row: 0,
            should_quit: false,
        }
    }

    fn push_message(&mut self, line: impl Into<String>) {
        if self.messages.len() >= MAX_MESSAGES {
            let drain_count = self.messages.len().saturating_sub(MAX_MESSAGES - 1);
            self.messages.drain(0..drain_count);
        }
        self.messages.push(line.into());
    }

    fn board_stage(&self) -> StageId {
        StageId::ALL[self.board_column.min(StageId::ALL.len() - 1)]
    }

    /// Cards of the focused board column, in collection order.
    fn board_cards<'a>(&self, jobs: &'a [JobRecord]) -> Vec<&'a JobRecord> {
        let stage = self.board_stage();
        filter_jobs(jobs, &self.query)
            .into_iter()
            .filter(|job| job.status == stage)
            .collect()
    }

    fn selected<'a>(&self, jobs: &'a [JobRecord]) -> Option<&'a JobRecord> {
        match self.view {
            ViewMode::Board => self.board_cards(jobs).get(self.board_row).copied(),
            ViewMode::List => derive_view(jobs, &self.query, self.sort)
                .get(self.list_row)
                .copied(),
            ViewMode::Analytics => None,
        }
    }

    fn clamp_selection(&mut self, jobs: &[JobRecord]) {
        let cards = self.board_cards(jobs).len();
        self.board_row = self.board_row.min(cards.saturating_sub(1));
        let rows = derive_view(jobs, &self.query, self.sort).len();
        self.list_row = self.list_row.min(rows.saturating_sub(1));
    }

    /// Keeps the cursor on `id` after it moved between columns or rows.
    fn follow(&mut self, jobs: &[JobRecord], id: &str) {
        if let Some(job) = jobs.iter().find(|job| job.id == id) {
            self.board_column = job.status.index();
            if let Some(pos) = self.board_cards(jobs).iter().position(|card| card.id == id) {
                self.board_row = pos;
            }
        }
        if let Some(pos) = derive_view(jobs, &self.query, self.sort)
            .iter()
            .position(|row| row.id == id)
        {
            self.list_row = pos;
        }
    }
}

pub fn run<S: KeyValueStore>(tracker: &mut Tracker<S>) -> Result<(), TrackError> {
    let _guard = TerminalGuard::enter()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(terminal_err)?;

    let mut app = AppState::new();
    tracing::info!("terminal ui started");

    loop {
        terminal
            .draw(|frame| draw(frame, &app, tracker))
            .map_err(terminal_err)?;

        if event::poll(Duration::from_millis(100)).map_err(terminal_err)? {
            if let Event::Key(key) = event::read().map_err(terminal_err)? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, tracker, key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!("terminal ui closed");
    Ok(())
}

fn handle_key<S: KeyValueStore>(app: &mut AppState, tracker: &mut Tracker<S>, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.mode {
        InputMode::Search => match key.code {
            KeyCode::Char(ch) => app.query.push(ch),
            KeyCode::Backspace => {
                app.query.pop();
            }
            KeyCode::Esc => {
                app.query.clear();
                app.mode = InputMode::Normal;
            }
            KeyCode::Enter => app.mode = InputMode::Normal,
            _ => {}
        },
        InputMode::Command => match key.code {
            KeyCode::Char(ch) => app.input.push(ch),
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Esc => {
                app.input.clear();
                app.mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let line = app.input.trim().to_string();
                app.input.clear();
                app.mode = InputMode::Normal;
                if !line.is_empty() {
                    handle_line(app, tracker, &line);
                }
            }
            _ => {}
        },
        InputMode::Normal => handle_normal_key(app, tracker, key),
    }

    app.clamp_selection(tracker.jobs());
}

fn handle_normal_key<S: KeyValueStore>(app: &mut AppState, tracker: &mut Tracker<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab => app.view = app.view.next(),
        KeyCode::BackTab => app.view = app.view.prev(),
        KeyCode::Up | KeyCode::Char('k') => match app.view {
            ViewMode::Board => app.board_row = app.board_row.saturating_sub(1),
            _ => app.list_row = app.list_row.saturating_sub(1),
        },
        KeyCode::Down | KeyCode::Char('j') => match app.view {
            ViewMode::Board => app.board_row += 1,
            _ => app.list_row += 1,
        },
        KeyCode::Left | KeyCode::Char('h') if app.view == ViewMode::Board => {
            app.board_column = app.board_column.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('l') if app.view == ViewMode::Board => {
            app.board_column = (app.board_column + 1).min(StageId::ALL.len() - 1);
        }
        KeyCode::Char('<') => shift_selected(app, tracker, StageId::prev),
        KeyCode::Char('>') => shift_selected(app, tracker, StageId::next),
        KeyCode::Char('/') => app.mode = InputMode::Search,
        KeyCode::Char(':') => app.mode = InputMode::Command,
        KeyCode::Char('a') => {
            let stage = match app.view {
                ViewMode::Board => app.board_stage(),
                _ => StageId::Wishlist,
            };
            app.input = format!("add --status {} --company ", stage.id());
            app.mode = InputMode::Command;
        }
        KeyCode::Char('e') => {
            if let Some(id) = app.selected(tracker.jobs()).map(|job| job.id.clone()) {
                app.input = format!("edit {id} ");
                app.mode = InputMode::Command;
            }
        }
        KeyCode::Enter => {
            if let Some(job) = app.selected(tracker.jobs()) {
                let lines = format_record(job);
                app.push_message(DIVIDER_MARKER);
                for line in lines {
                    app.push_message(line);
                }
            }
        }
        KeyCode::Delete | KeyCode::Char('d') => {
            if let Some(id) = app.selected(tracker.jobs()).map(|job| job.id.clone()) {
                match tracker.delete(&id) {
                    Ok(_) => app.push_message(format!("Deleted [{id}]")),
                    Err(err) => app.push_message(format!("error: {err}")),
                }
            }
        }
        KeyCode::Char('t') => match tracker.toggle_theme() {
            Ok(theme) => app.push_message(format!("Theme set to {theme}")),
            Err(err) => app.push_message(format!("error: {err}")),
        },
        KeyCode::Char('0') => app.sort = SortSpec::default(),
        KeyCode::Char(ch @ '1'..='8') => {
            let idx = ch as usize - '1' as usize;
            if let Some(key) = SortKey::ALL.get(idx) {
                app.sort = app.sort.toggled(*key);
                app.view = ViewMode::List;
            }
        }
        _ => {}
    }
}

fn shift_selected<S, F>(app: &mut AppState, tracker: &mut Tracker<S>, step: F)
where
    S: KeyValueStore,
    F: Fn(StageId) -> Option<StageId>,
{
    let Some((id, target)) = app
        .selected(tracker.jobs())
        .and_then(|job| step(job.status).map(|target| (job.id.clone(), target)))
    else {
        return;
    };
    match tracker.set_status(&id, target) {
        Ok(_) => app.push_message(format!("Moved [{id}] to {}", target.label())),
        Err(err) => app.push_message(format!("error: {err}")),
    }
    app.follow(tracker.jobs(), &id);
}

fn handle_line<S: KeyValueStore>(app: &mut AppState, tracker: &mut Tracker<S>, line: &str) {
    if !app.messages.is_empty() {
        app.push_message(DIVIDER_MARKER);
    }
    app.push_message(format!(">> {line}"));

    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
        app.should_quit = true;
        return;
    }

    if line.eq_ignore_ascii_case("clear") {
        app.messages.clear();
        return;
    }

    if line.eq_ignore_ascii_case("help") {
        for help in HELP_LINES {
            app.push_message(help);
        }
        app.push_message("Keys: Tab view, arrows select, < > move stage, / search, 1-8 sort, 0 unsort, a add, e edit, d delete, t theme, q quit");
        return;
    }

    match cli::parse_line(line).and_then(|command| cli::execute(tracker, command)) {
        Ok(lines) => {
            for output in lines {
                app.push_message(output);
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, line, "tui command failed");
            app.push_message(format!("error: {err}"));
        }
    }
}

struct Palette {
    text: Color,
    muted: Color,
    accent: Color,
    background: Color,
    panel: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                text: Color::Rgb(15, 23, 42),
                muted: Color::Rgb(100, 116, 139),
                accent: Color::Rgb(79, 70, 229),
                background: Color::Rgb(248, 250, 252),
                panel: Color::Rgb(226, 232, 240),
            },
            Theme::Dark => Palette {
                text: Color::Rgb(241, 245, 249),
                muted: Color::Rgb(148, 163, 184),
                accent: Color::Rgb(129, 140, 248),
                background: Color::Rgb(2, 6, 23),
                panel: Color::Rgb(30, 41, 59),
            },
        }
    }

    fn block(&self, title: String, focused: bool) -> Block<'static> {
        let border = if focused { self.accent } else { self.muted };
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
    }

    fn selection(&self) -> Style {
        Style::default()
            .bg(self.panel)
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}

fn stage_color(stage: StageId) -> Color {
    match stage {
        StageId::Wishlist => Color::Rgb(148, 163, 184),
        StageId::Applied => Color::Rgb(59, 130, 246),
        StageId::Interview => Color::Rgb(139, 92, 246),
        StageId::Offer => Color::Rgb(16, 185, 129),
        StageId::Rejected => Color::Rgb(244, 63, 94),
    }
}

fn draw<S: KeyValueStore>(frame: &mut Frame, app: &AppState, tracker: &Tracker<S>) {
    let palette = Palette::for_theme(tracker.theme());
    let area = frame.size();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        area,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(7),
            Constraint::Length(3),
        ])
        .split(area);

    frame.render_widget(render_header(app, tracker, &palette), layout[0]);

    match app.view {
        ViewMode::Board => draw_board(frame, layout[1], app, tracker.jobs(), &palette),
        ViewMode::List => draw_list(frame, layout[1], app, tracker.jobs(), &palette),
        ViewMode::Analytics => draw_analytics(frame, layout[1], tracker.jobs(), &palette),
    }

    frame.render_widget(
        render_messages(app, layout[2].height as usize, layout[2].width as usize, &palette),
        layout[2],
    );

    let (title, text) = match app.mode {
        InputMode::Normal => (
            "Keys",
            "Tab view | arrows select | < > stage | / search | 1-8 sort | a add | e edit | d delete | t theme | : command | q quit".to_string(),
        ),
        InputMode::Search => ("Search", app.query.clone()),
        InputMode::Command => ("Command", app.input.clone()),
    };
    let input = Paragraph::new(text.clone())
        .style(Style::default().fg(if app.mode == InputMode::Normal {
            palette.muted
        } else {
            palette.text
        }))
        .block(palette.block(title.to_string(), app.mode != InputMode::Normal));
    frame.render_widget(input, layout[3]);
    if app.mode != InputMode::Normal {
        let offset = text.chars().count() as u16;
        frame.set_cursor(
            (layout[3].x + 1 + offset).min(layout[3].right().saturating_sub(2)),
            layout[3].y + 1,
        );
    }
}

fn render_header<S: KeyValueStore>(
    app: &AppState,
    tracker: &Tracker<S>,
    palette: &Palette,
) -> Paragraph<'static> {
    let mut spans = Vec::new();
    for view in ViewMode::ALL {
        let style = if view == app.view {
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.muted)
        };
        spans.push(Span::styled(format!(" {} ", view.title()), style));
    }

    let query = if app.query.is_empty() {
        "-".to_string()
    } else {
        app.query.clone()
    };
    let sort = match app.sort.key {
        Some(key) => format!("{}{}", key.name(), sort_marker(app.sort, key)),
        None => "-".to_string(),
    };
    spans.push(Span::styled(
        format!(
            " | search: {query} | sort: {sort} | {} applications | theme: {}",
            tracker.jobs().len(),
            tracker.theme()
        ),
        Style::default().fg(palette.muted),
    ));

    Paragraph::new(Line::from(spans)).block(palette.block("trackflow".to_string(), false))
}

fn draw_board(frame: &mut Frame, area: Rect, app: &AppState, jobs: &[JobRecord], palette: &Palette) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, StageId::ALL.len() as u32); StageId::ALL.len()])
        .split(area);

    let filtered = filter_jobs(jobs, &app.query);
    let counts = stage_counts(filtered.iter().copied());

    for (entry, column) in counts.iter().zip(columns.iter()) {
        let focused = entry.stage.index() == app.board_column;
        let items: Vec<ListItem> = filtered
            .iter()
            .filter(|job| job.status == entry.stage)
            .map(|job| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        job.company.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(job.role.clone(), Style::default().fg(palette.muted))),
                ])
            })
            .collect();

        let title = format!("{} ({})", entry.stage.label(), entry.count);
        let block = palette
            .block(title, focused)
            .title_style(Style::default().fg(stage_color(entry.stage)));
        let list = List::new(items)
            .block(block)
            .highlight_style(palette.selection())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if focused && entry.count > 0 {
            state.select(Some(app.board_row.min(entry.count - 1)));
        }
        frame.render_stateful_widget(list, *column, &mut state);
    }
}

fn draw_list(frame: &mut Frame, area: Rect, app: &AppState, jobs: &[JobRecord], palette: &Palette) {
    let view = derive_view(jobs, &app.query, app.sort);
    let titled = |title: &str, key: SortKey| format!("{}{}", title, sort_marker(app.sort, key));

    let header = Row::new(vec![
        Cell::from(titled("Company", SortKey::Company)),
        Cell::from(titled("Role", SortKey::Role)),
        Cell::from(titled("Stage", SortKey::Status)),
        Cell::from(titled("Salary", SortKey::Salary)),
        Cell::from(titled("Date", SortKey::AppliedDate)),
        Cell::from(titled("Job Site", SortKey::Url)),
    ])
    .style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = view
        .iter()
        .map(|job| {
            Row::new(vec![
                Cell::from(job.company.clone()),
                Cell::from(job.role.clone()),
                Cell::from(Span::styled(
                    job.status.label(),
                    Style::default().fg(stage_color(job.status)),
                )),
                Cell::from(dash_if_empty(&job.salary)),
                Cell::from(job.applied_date.clone()),
                Cell::from(dash_if_empty(&job.url)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(18),
        Constraint::Percentage(22),
        Constraint::Percentage(13),
        Constraint::Percentage(10),
        Constraint::Percentage(12),
        Constraint::Percentage(25),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(palette.block(format!("Applications ({})", view.len()), true))
        .highlight_style(palette.selection())
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if !view.is_empty() {
        state.select(Some(app.list_row.min(view.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_analytics(frame: &mut Frame, area: Rect, jobs: &[JobRecord], palette: &Palette) {
    let summary = summarize(jobs);
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
        .split(area);

    let pipeline = palette.block("Application Pipeline".to_string(), true);
    let inner = pipeline.inner(halves[0]);
    frame.render_widget(pipeline, halves[0]);

    let mut constraints = vec![Constraint::Length(3); summary.counts.len()];
    constraints.push(Constraint::Min(0));
    let bars = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (entry, bar_area) in summary.counts.iter().zip(bars.iter()) {
        let gauge = Gauge::default()
            .block(palette.block(entry.stage.label().to_string(), false))
            .gauge_style(Style::default().fg(stage_color(entry.stage)).bg(palette.panel))
            .ratio(entry.ratio(summary.total))
            .label(entry.count.to_string());
        frame.render_widget(gauge, *bar_area);
    }

    let total = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            summary.total.to_string(),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Total Opportunities", Style::default().fg(palette.muted))),
    ])
    .alignment(Alignment::Center)
    .block(palette.block("Overview".to_string(), false));
    frame.render_widget(total, halves[1]);
}

fn render_messages(app: &AppState, height: usize, width: usize, palette: &Palette) -> Paragraph<'static> {
    let max_lines = height.saturating_sub(2).max(1);
    let start = app.messages.len().saturating_sub(max_lines);
    let divider = "─".repeat(width.saturating_sub(2).max(1));
    let lines: Vec<Line> = app.messages[start..]
        .iter()
        .map(|line| {
            if line == DIVIDER_MARKER {
                Line::from(Span::styled(divider.clone(), Style::default().fg(palette.muted)))
            } else {
                Line::from(line.clone())
            }
        })
        .collect();

    Paragraph::new(lines)
        .block(palette.block("Session".to_string(), false))
        .wrap(Wrap { trim: false })
}

fn dash_if_empty(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
