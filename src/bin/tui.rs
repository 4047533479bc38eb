mod tui_app;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use tui_app::{column_widths, format_ms, load_filters, truncate, AppState, ConnectionStatus, TableResponse};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let filters = match std::env::var("FILTERS_PATH") {
        Ok(path) => match load_filters(&path) {
            Ok(f) => Some(f),
            Err(e) => {
                eprintln!("Filter file error: {e}");
                std::process::exit(1);
            }
        },
        Err(_) => None,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build HTTP client");

    let mut app = AppState::new(base_url, filters);

    // Initial fetch before rendering
    app.refresh(&client).await;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut summary_state = TableState::default();
    summary_state.select(None);

    let result = run_loop(&mut terminal, &mut app, &client, &mut summary_state).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    client: &reqwest::Client,
    summary_state: &mut TableState,
) -> io::Result<()> {
    let refresh_interval = Duration::from_secs(30);
    let mut last_tick = std::time::Instant::now();

    loop {
        terminal.draw(|f| render(f, app, summary_state))?;

        let timeout = refresh_interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let mut refetch = false;
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('r') | KeyCode::Char('R') => refetch = true,
                        KeyCode::Char('s') | KeyCode::Char('S') => {
                            app.toggle_seats();
                            refetch = true;
                        }
                        KeyCode::Char('l') | KeyCode::Char('L') => {
                            app.toggle_levels();
                            refetch = true;
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            let max = app.summary_len().saturating_sub(1);
                            let next = summary_state.selected().map_or(0, |i| (i + 1).min(max));
                            summary_state.select(Some(next));
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            let prev = summary_state
                                .selected()
                                .map_or(0, |i| i.saturating_sub(1));
                            summary_state.select(Some(prev));
                        }
                        _ => {}
                    }
                    if refetch {
                        app.refresh(client).await;
                        summary_state.select(None);
                        last_tick = std::time::Instant::now();
                    }
                }
            }
        }

        if last_tick.elapsed() >= refresh_interval {
            app.refresh(client).await;
            last_tick = std::time::Instant::now();
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &AppState, summary_state: &mut TableState) {
    let area = f.area();

    // Outer vertical split: header | body | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_body(f, app, summary_state, chunks[1]);
    render_footer(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_text, status_color) = match &app.status {
        ConnectionStatus::Connected => ("● connected".to_string(), Color::Green),
        ConnectionStatus::Connecting => ("◌ connecting".to_string(), Color::Yellow),
        ConnectionStatus::Error(e) => (format!("✗ {}", truncate(e, 40)), Color::Red),
    };

    let heroes = app
        .sites
        .iter()
        .filter(|d| d.detected)
        .map(|d| format!("{}: {}", d.site, d.heroname))
        .collect::<Vec<_>>();
    let heroes = if heroes.is_empty() {
        "no hand histories found".to_string()
    } else {
        heroes.join(", ")
    };

    let title_spans = vec![
        Span::styled(
            " Player Stats  ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(truncate(&heroes, 48), Style::default().fg(Color::White)),
        Span::raw("  │  "),
        Span::styled(
            format!(
                "p50 {} p99 {} ({} pages)",
                format_ms(app.latency.p50_ms),
                format_ms(app.latency.p99_ms),
                app.latency.sample_count.unwrap_or(0)
            ),
            Style::default().fg(Color::White),
        ),
    ];

    let header_line = Line::from(title_spans);
    let paragraph = Paragraph::new(header_line)
        .block(Block::default().borders(Borders::ALL).border_style(
            Style::default().fg(Color::DarkGray),
        ));

    f.render_widget(paragraph, area);
}

fn render_body(f: &mut Frame, app: &AppState, summary_state: &mut TableState, area: Rect) {
    let Some(page) = &app.stats.page else {
        let message = app
            .stats
            .message
            .clone()
            .unwrap_or_else(|| "waiting for stats…".to_string());
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::Yellow),
        )))
        .alignment(Alignment::Center)
        .block(stats_block(" PLAYER STATS "));
        f.render_widget(paragraph, area);
        return;
    };

    // Vertical split: summary (45%) | hand breakdown (55%)
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let summary_title = if app.showing_seats() {
        " PLAYER STATS (by seats) "
    } else {
        " PLAYER STATS "
    };
    let summary = stats_table(&page.summary, summary_title);
    f.render_stateful_widget(summary, halves[0], summary_state);

    let hands_title = format!(" {} ", page.hand_heading);
    f.render_widget(stats_table(&page.hands, &hands_title), halves[1]);
}

fn stats_table<'a>(table: &'a TableResponse, title: &'a str) -> Table<'a> {
    let header_cells = table
        .headings
        .iter()
        .map(|h| Cell::from(h.as_str()).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|r| {
            let cells = r.iter().enumerate().map(|(i, text)| {
                let align = match table.alignments.get(i) {
                    Some(x) if *x >= 0.5 => Alignment::Right,
                    _ => Alignment::Left,
                };
                let color = if text.starts_with('-') {
                    Color::Red
                } else {
                    Color::White
                };
                Cell::from(Line::from(text.as_str()).alignment(align)).style(Style::default().fg(color))
            });
            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = column_widths(table)
        .into_iter()
        .map(Constraint::Length)
        .collect();

    Table::new(rows, widths)
        .header(header)
        .block(stats_block(title))
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
}

fn stats_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
}

fn render_footer(f: &mut Frame, app: &AppState, area: Rect) {
    let built = app
        .stats
        .page
        .as_ref()
        .map_or("—".to_string(), |p| format!("built in {:.0}ms", p.elapsed_ms));
    let line = Line::from(vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[r] ", Style::default().fg(Color::Yellow)),
        Span::raw("refresh  "),
        Span::styled("[s] ", Style::default().fg(Color::Yellow)),
        Span::raw("seats  "),
        Span::styled("[l] ", Style::default().fg(Color::Yellow)),
        Span::raw("levels  "),
        Span::styled("[↑↓ / j k] ", Style::default().fg(Color::Yellow)),
        Span::raw("scroll  "),
        Span::styled(built, Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!(
                "  {} pages, {} empty  updated {}s ago",
                app.health.pages_built.unwrap_or(0),
                app.health.empty_pages.unwrap_or(0),
                app.last_refresh.elapsed().as_secs()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let paragraph = Paragraph::new(line).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}
