//! VIGIA Self-diagnosis Demo: interactive Ratatui TUI
//!
//! Layout:
//!   ┌─── header ──────────────────────────────────────────────────────────┐
//!   │  VIGIA  session id  submit state                                    │
//!   ├─── left panel ──────────────────┬─── right panel ───────────────────┤
//!   │  Questionnaire / Results        │  Live Location                    │
//!   ├─────────────────────────────────┴───────────────────────────────────┤
//!   │  footer (key bindings, alerts)                                      │
//!   └─────────────────────────────────────────────────────────────────────┘
//!
//! The right panel is fed by a simulated walk replayed on a background
//! thread. The thread only posts into the hub's mailbox; the event loop pumps
//! the mailbox once per tick, so every subscriber runs on this thread.

use std::{
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};

use vigia_config::AppConfig;
use vigia_contracts::{
    answer::{Answer, AnswerUpdate, ContactQuestion, Illness, Selection, Symptom},
    error::VigiaError,
    outcome::ClassificationOutcome,
};
use vigia_hub::{DeliveryReport, LocationHub};
use vigia_ref_mobile::{
    mock_platform::{
        walking_route, MockDialer, MockLocationProvider, RecordingNavigator, SimulatedFeed,
        ROUTE_START,
    },
    screens::{
        diagnostic::{DiagnosticScreen, DiagnosticView},
        map::MapScreen,
    },
    tracking::BackgroundLocationTask,
};

/// Event-loop tick: one mailbox pump per tick.
const TICK_MS: u64 = 200;

/// Delay between simulated background deliveries.
const FEED_INTERVAL_MS: u64 = 700;

// ── Questionnaire rows ────────────────────────────────────────────────────────

/// One selectable line of the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Row {
    Symptom(Symptom),
    Illness(Illness),
    Contact(ContactQuestion),
    Age,
}

fn questionnaire_rows() -> Vec<Row> {
    Symptom::ALL
        .into_iter()
        .map(Row::Symptom)
        .chain(Illness::ALL.into_iter().map(Row::Illness))
        .chain(ContactQuestion::ALL.into_iter().map(Row::Contact))
        .chain(std::iter::once(Row::Age))
        .collect()
}

// ── App state ─────────────────────────────────────────────────────────────────

struct App {
    diagnostic: DiagnosticScreen,
    rows: Vec<Row>,
    cursor: usize,
    age_text: String,

    hub: LocationHub,
    map: MapScreen,
    feed: Option<SimulatedFeed>,
    last_report: Option<DeliveryReport>,
    pumped: usize,
    location_error: Option<String>,

    dialer: Arc<MockDialer>,
    last_tick: Instant,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let hub = LocationHub::create();
        let dialer = Arc::new(MockDialer::new());
        let navigator = Arc::new(RecordingNavigator::new());

        let diagnostic = DiagnosticScreen::new(config.clone(), navigator.clone(), dialer.clone());
        let mut map = MapScreen::new(
            hub.clone(),
            Arc::new(MockLocationProvider::granted(ROUTE_START)),
            navigator,
            &config,
        );

        let (feed, location_error) = match map.mount() {
            Ok(_) => {
                let task = BackgroundLocationTask::new(
                    config.tracking.task_name.clone(),
                    Arc::new(hub.publisher()),
                );
                let feed = SimulatedFeed::start(
                    task,
                    walking_route(40),
                    Duration::from_millis(FEED_INTERVAL_MS),
                    true,
                );
                (Some(feed), None)
            }
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            diagnostic,
            rows: questionnaire_rows(),
            cursor: 0,
            age_text: String::new(),
            hub,
            map,
            feed,
            last_report: None,
            pumped: 0,
            location_error,
            dialer,
            last_tick: Instant::now(),
        }
    }

    fn current_row(&self) -> Row {
        self.rows[self.cursor.min(self.rows.len() - 1)]
    }

    fn in_results(&self) -> bool {
        matches!(self.diagnostic.view(), DiagnosticView::Results(_))
    }

    /// Deliver whatever the background thread posted since the last tick.
    fn tick(&mut self) {
        match self.hub.pump() {
            Ok(Some(report)) => {
                self.last_report = Some(report);
                self.pumped += 1;
            }
            Ok(None) => {}
            Err(e) => self.location_error = Some(e.to_string()),
        }
        self.last_tick = Instant::now();
    }

    fn move_cursor(&mut self, up: bool) {
        if self.in_results() {
            return;
        }
        self.cursor = if up {
            self.cursor.saturating_sub(1)
        } else {
            (self.cursor + 1).min(self.rows.len() - 1)
        };
    }

    fn toggle(&mut self) {
        match self.current_row() {
            Row::Symptom(symptom) => {
                self.diagnostic.toggle(Selection::Symptom(symptom));
            }
            Row::Illness(illness) => {
                self.diagnostic.toggle(Selection::Illness(illness));
            }
            Row::Contact(_) | Row::Age => {}
        }
    }

    fn answer(&mut self, answer: Answer) {
        if let Row::Contact(question) = self.current_row() {
            self.diagnostic
                .set_answer(AnswerUpdate::Contact(question, answer));
        }
    }

    fn edit_age(&mut self, c: Option<char>) {
        if self.current_row() != Row::Age {
            return;
        }
        match c {
            Some(c) => self.age_text.push(c),
            None => {
                self.age_text.pop();
            }
        }
        self.diagnostic
            .set_answer(AnswerUpdate::Age(self.age_text.clone()));
    }

    fn submit(&mut self) {
        if self.diagnostic.submit_visible() {
            let _ = self.diagnostic.submit();
        }
    }

    fn retake(&mut self) {
        self.diagnostic.retake();
        self.cursor = 0;
        self.age_text.clear();
    }

    fn call(&mut self, digit: char) {
        if let Some(index) = digit.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
            let _ = self.diagnostic.call(index);
        }
    }

    /// Stop the feed, tear the map down and close the hub. Every step runs;
    /// the failures are returned for reporting once the terminal is restored.
    fn shutdown(&mut self) -> Vec<VigiaError> {
        if let Some(feed) = self.feed.take() {
            feed.stop();
        }
        [self.map.teardown(), self.hub.shutdown()]
            .into_iter()
            .filter_map(Result::err)
            .collect()
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn ui(f: &mut Frame, app: &App) {
    let full = f.area();

    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(12),   // questionnaire + location
            Constraint::Length(3), // footer
        ])
        .split(full);

    render_header(f, outer_chunks[0], app);

    let mid_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(outer_chunks[1]);

    if app.in_results() {
        render_results(f, mid_chunks[0], app);
    } else {
        render_questionnaire(f, mid_chunks[0], app);
    }
    render_location(f, mid_chunks[1], app);
    render_footer(f, outer_chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let (submit_label, submit_style) = if app.in_results() {
        ("submitted", Style::default().fg(Color::Cyan))
    } else if app.diagnostic.submit_visible() {
        (
            "submit: READY",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("submit: hidden", Style::default().fg(Color::DarkGray))
    };

    let line = Line::from(vec![
        Span::styled("VIGIA Self-diagnosis    ", title_style),
        Span::styled(
            format!("session {}    ", short_id(&app.diagnostic.session().id().to_string())),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(submit_label, submit_style),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

fn render_questionnaire(f: &mut Frame, area: Rect, app: &App) {
    let record = app.diagnostic.record();
    let mut items: Vec<ListItem> = Vec::new();
    let mut section = "";

    for (i, row) in app.rows.iter().enumerate() {
        let heading = match row {
            Row::Symptom(_) => "Symptoms",
            Row::Illness(_) => "Pre-existing conditions",
            Row::Contact(_) | Row::Age => "About you",
        };
        if heading != section {
            if !section.is_empty() {
                items.push(ListItem::new(""));
            }
            items.push(ListItem::new(Line::from(Span::styled(
                heading,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))));
            section = heading;
        }

        let (mark, label) = match row {
            Row::Symptom(symptom) => (
                checkbox(record.is_selected(Selection::Symptom(*symptom))),
                symptom.label().to_string(),
            ),
            Row::Illness(illness) => (
                checkbox(record.is_selected(Selection::Illness(*illness))),
                illness.label().to_string(),
            ),
            Row::Contact(question) => (
                match record.contact(*question) {
                    Some(Answer::Yes) => "[yes]".to_string(),
                    Some(Answer::No) => "[no] ".to_string(),
                    None => "[ ? ]".to_string(),
                },
                question.prompt().to_string(),
            ),
            Row::Age => (
                format!("[{:>3}]", app.age_text),
                "Age".to_string(),
            ),
        };

        let style = if i == app.cursor {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("  {} ", mark), style),
            Span::styled(truncate(&label, area.width.saturating_sub(12) as usize), style),
        ])));
    }

    let block = Block::default()
        .title(" Questionnaire ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(List::new(items).block(block), area);
}

fn render_results(f: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::new();

    if let DiagnosticView::Results(diagnosis) = app.diagnostic.view() {
        lines.push(Line::from(Span::styled(
            format!(
                "Assessed {}",
                diagnosis
                    .assessed_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
            ),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    if let Some(advice) = app.diagnostic.advice() {
        let title_color = match advice.outcome {
            ClassificationOutcome::Positive => Color::Green,
            ClassificationOutcome::Neutral => Color::Yellow,
            ClassificationOutcome::Negative => Color::Red,
        };
        lines.push(Line::from(Span::styled(
            advice.title,
            Style::default()
                .fg(title_color)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        for text in advice.message.lines() {
            lines.push(Line::from(text.to_string()));
        }
        for (i, contact) in advice.contacts.iter().enumerate() {
            let note = contact
                .note
                .as_deref()
                .map(|n| format!(", {}", n))
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(format!("  [{}] ", i + 1), Style::default().fg(Color::Cyan)),
                Span::styled(
                    contact.number.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" ({}{})", contact.label, note),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            advice.retake_hint,
            Style::default().fg(Color::Gray),
        )));
    }

    let dialled = app.dialer.dialled();
    if !dialled.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Dialled: {}", dialled.join(", ")),
            Style::default().fg(Color::Green),
        )));
    }

    let block = Block::default()
        .title(" Results ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_location(f: &mut Frame, area: Rect, app: &App) {
    let mut items: Vec<ListItem> = Vec::new();
    let dim = Style::default().fg(Color::DarkGray);

    let hub_state = if app.hub.is_open() { "open" } else { "closed" };
    let subscribers = app
        .hub
        .subscriber_count()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| "?".to_string());
    items.push(ListItem::new(Line::from(vec![
        Span::styled("Hub: ", dim),
        Span::raw(format!("{}  subscribers: {}  pumps: {}", hub_state, subscribers, app.pumped)),
    ])));
    if let Some(report) = &app.last_report {
        items.push(ListItem::new(Line::from(vec![
            Span::styled("Last fan-out: ", dim),
            Span::raw(format!("{} delivered, {} failed", report.delivered, report.failed)),
        ])));
    }
    items.push(ListItem::new(""));

    let status = app
        .map
        .status_text()
        .unwrap_or_else(|e| e.to_string());
    items.push(ListItem::new(Line::from(Span::styled("Status", dim))));
    items.push(ListItem::new(truncate(&status, area.width.saturating_sub(4) as usize)));
    items.push(ListItem::new(""));

    if let Some(region) = app.map.region() {
        items.push(ListItem::new(Line::from(Span::styled("Region", dim))));
        items.push(ListItem::new(format!(
            "  {:.5}, {:.5}",
            region.latitude, region.longitude
        )));
        items.push(ListItem::new(format!(
            "  span {:.4} x {:.4}",
            region.latitude_delta, region.longitude_delta
        )));
        items.push(ListItem::new(""));
    }

    items.push(ListItem::new(Line::from(Span::styled("Zones", dim))));
    match app.map.zones() {
        Ok(zones) if !zones.is_empty() => {
            for status in zones {
                let (flag, color) = if status.inside {
                    ("INSIDE ", Color::Red)
                } else {
                    ("outside", Color::Green)
                };
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(format!("  {} ", flag), Style::default().fg(color)),
                    Span::raw(format!(
                        "{:>7.0} m  {}",
                        status.distance_m,
                        truncate(&status.zone.label, 20)
                    )),
                ])));
            }
        }
        Ok(_) => items.push(ListItem::new("  waiting for a position")),
        Err(e) => items.push(ListItem::new(format!("  {}", e))),
    }

    if let Some(error) = &app.location_error {
        items.push(ListItem::new(""));
        items.push(ListItem::new(Line::from(Span::styled(
            truncate(error, area.width.saturating_sub(4) as usize),
            Style::default().fg(Color::Red),
        ))));
    }

    let block = Block::default()
        .title(" Live Location ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(List::new(items).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Cyan);
    let mut spans: Vec<Span> = Vec::new();

    if let Some(alert) = app.diagnostic.alert() {
        spans.push(Span::styled(
            format!(" {} ", alert),
            Style::default()
                .fg(Color::White)
                .bg(Color::Red),
        ));
        spans.push(Span::raw("  "));
    }

    if app.in_results() {
        spans.push(Span::styled(" [1-9] ", key));
        spans.push(Span::raw("Call  "));
    } else {
        spans.push(Span::styled(" [↑↓] ", key));
        spans.push(Span::raw("Move  "));
        spans.push(Span::styled("[space] ", key));
        spans.push(Span::raw("Tick  "));
        spans.push(Span::styled("[y/n] ", key));
        spans.push(Span::raw("Answer  "));
        spans.push(Span::styled("[0-9] ", key));
        spans.push(Span::raw("Age  "));
        if app.diagnostic.submit_visible() {
            spans.push(Span::styled("[Enter] ", key));
            spans.push(Span::raw("Submit  "));
        }
    }
    spans.push(Span::styled("[r] ", key));
    spans.push(Span::raw("Retake  "));
    spans.push(Span::styled("[q] ", key));
    spans.push(Span::raw("Quit"));

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn checkbox(selected: bool) -> String {
    let mark = if selected { "[x]  " } else { "[ ]  " };
    mark.to_string()
}

/// Truncate a string to at most `max` chars, appending "…" if truncated.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// First block of a UUID.
fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    let mut app = App::new(config);

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    loop {
        terminal.draw(|f| ui(f, &app))?;

        let timeout = Duration::from_millis(TICK_MS).saturating_sub(app.last_tick.elapsed());

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,

                    KeyCode::Up => app.move_cursor(true),
                    KeyCode::Down => app.move_cursor(false),

                    KeyCode::Char('r') | KeyCode::Char('R') => app.retake(),
                    KeyCode::Esc => app.diagnostic.dismiss_alert(),

                    KeyCode::Char(c @ '1'..='9') if app.in_results() => app.call(c),
                    _ if app.in_results() => {}

                    KeyCode::Char(' ') => app.toggle(),
                    KeyCode::Char('y') | KeyCode::Char('Y') => app.answer(Answer::Yes),
                    KeyCode::Char('n') | KeyCode::Char('N') => app.answer(Answer::No),
                    KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => app.edit_age(Some(c)),
                    KeyCode::Backspace => app.edit_age(None),
                    KeyCode::Enter => app.submit(),

                    _ => {}
                }
            }
        }

        if app.last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            app.tick();
        }
    }

    let shutdown_errors = app.shutdown();
    restore_terminal(&mut terminal)?;
    for e in &shutdown_errors {
        eprintln!("Shutdown error: {}", e);
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use vigia_config::AppConfig;

    use super::App;

    #[test]
    fn shutdown_closes_hub_and_reports_no_errors() {
        let mut app = App::new(AppConfig::default());
        assert_eq!(app.hub.subscriber_count().unwrap(), 1);

        let errors = app.shutdown();

        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        assert!(app.feed.is_none());
        assert!(!app.hub.is_open());
        assert_eq!(app.hub.subscriber_count().unwrap(), 0);
    }

    #[test]
    fn second_shutdown_reports_nothing_new() {
        let mut app = App::new(AppConfig::default());
        app.shutdown();
        assert!(app.shutdown().is_empty());
    }
}
