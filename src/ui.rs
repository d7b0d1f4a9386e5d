use anyhow::Result;
use cost_eras::{
    control_id, ChartConfig, Dashboard, Emphasis, Era, MemoryPage, Profile, Severity, SlotKind,
    Surface,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Decoupling,
    Wallet,
    BigTicket,
}

impl Panel {
    pub fn next(&self) -> Self {
        match self {
            Panel::Decoupling => Panel::Wallet,
            Panel::Wallet => Panel::BigTicket,
            Panel::BigTicket => Panel::Decoupling,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Panel::Decoupling => Panel::BigTicket,
            Panel::Wallet => Panel::Decoupling,
            Panel::BigTicket => Panel::Wallet,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Panel::Decoupling => "Income vs House Prices",
            Panel::Wallet => "Where the Wallet Goes",
            Panel::BigTicket => "Big-Ticket Items",
        }
    }

    pub fn surface(&self) -> Surface {
        match self {
            Panel::Decoupling => Surface::Decoupling,
            Panel::Wallet => Surface::Wallet,
            Panel::BigTicket => Surface::BigTicket,
        }
    }
}

pub struct App {
    pub dashboard: Dashboard<MemoryPage>,
    pub current_panel: Panel,
    pub show_detail: bool,
    pub detail_era: Era,
}

impl App {
    /// Builds the page and runs the initial refresh
    pub fn new(profile: Profile) -> Result<Self> {
        let mut dashboard = Dashboard::load(MemoryPage::standard())?;
        if profile != dashboard.profile() {
            dashboard.select_profile(profile)?;
        }

        Ok(Self {
            dashboard,
            current_panel: Panel::Decoupling,
            show_detail: false,
            detail_era: Era::Y2025,
        })
    }

    pub fn page(&self) -> &MemoryPage {
        self.dashboard.presenter()
    }

    pub fn select_profile(&mut self, profile: Profile) -> Result<()> {
        self.dashboard.select_profile(profile)?;
        Ok(())
    }

    pub fn toggle_profile(&mut self) -> Result<()> {
        self.select_profile(self.dashboard.profile().other())
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next_panel(&mut self) {
        self.current_panel = self.current_panel.next();
    }

    pub fn previous_panel(&mut self) {
        self.current_panel = self.current_panel.previous();
    }

    pub fn next_era(&mut self) {
        let i = (self.detail_era.index() + 1) % Era::ALL.len();
        self.detail_era = Era::ALL[i];
    }

    pub fn previous_era(&mut self) {
        let i = (self.detail_era.index() + Era::ALL.len() - 1) % Era::ALL.len();
        self.detail_era = Era::ALL[i];
    }

    /// Returns false when the key asks to quit
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
            KeyCode::Char('s') | KeyCode::Char('1') => self.select_profile(Profile::Single)?,
            KeyCode::Char('c') | KeyCode::Char('2') => self.select_profile(Profile::Couple)?,
            KeyCode::Char('p') => self.toggle_profile()?,
            KeyCode::Char('r') => self.dashboard.refresh()?,
            KeyCode::Enter => self.toggle_detail(),
            KeyCode::Tab => {
                if modifiers.contains(KeyModifiers::SHIFT) {
                    self.previous_panel();
                } else {
                    self.next_panel();
                }
            }
            KeyCode::BackTab => self.previous_panel(),
            KeyCode::Down | KeyCode::Char('j') => self.next_era(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_era(),
            _ => {}
        }
        Ok(true)
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key.code, key.modifiers)? {
                return Ok(());
            }
        }
    }
}

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with profile controls
            Constraint::Length(6), // Metric cards
            Constraint::Min(0),    // Chart area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_metric_cards(f, chunks[1], app);

    if app.show_detail && app.current_panel == Panel::Wallet {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[2]);

        render_chart(f, content_chunks[0], app);
        render_wallet_detail(f, content_chunks[1], app);
    } else {
        render_chart(f, chunks[2], app);
    }

    render_status_bar(f, chunks[3], app);
}

fn hex_color(hex: &str) -> Color {
    hex.parse().unwrap_or(Color::White)
}

fn severity_color(severity: Option<Severity>) -> Color {
    match severity {
        Some(Severity::High) => Color::Red,
        Some(Severity::Medium) => Color::Yellow,
        Some(Severity::Low) => Color::Green,
        None => Color::White,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let page = app.page();
    let mut spans = vec![Span::styled(
        " Household: ",
        Style::default().fg(Color::White),
    )];

    for (i, profile) in Profile::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = match page.control(&control_id(*profile)) {
            Some(Emphasis::Active) => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            _ => Style::default().fg(Color::DarkGray),
        };
        let name = match profile {
            Profile::Single => "Single",
            Profile::Couple => "Couple",
        };
        spans.push(Span::styled(name, style));
    }

    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        app.current_panel.title(),
        Style::default().fg(Color::Cyan),
    ));

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Cost of Living: 1965 / 1995 / 2025 "),
    );

    f.render_widget(header, area);
}

fn render_metric_cards(f: &mut Frame, area: Rect, app: &App) {
    let page = app.page();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (era, column) in Era::ALL.iter().zip(columns.iter()) {
        let text = |kind: SlotKind| page.text(&kind.id(*era)).unwrap_or("").to_string();
        let ratio = page.slot(&SlotKind::Ratio.id(*era));

        let content = vec![
            Line::from(vec![
                Span::styled("  Income: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw(text(SlotKind::Income)),
            ]),
            Line::from(vec![
                Span::styled("  House:  ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw(text(SlotKind::HousePrice)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    text(SlotKind::Ratio),
                    Style::default()
                        .fg(severity_color(ratio.and_then(|s| s.style)))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        let card = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", era)),
        );
        f.render_widget(card, *column);
    }
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let surface = app.current_panel.surface();
    let Some(config) = app.page().chart(surface) else {
        let empty = Paragraph::new("No chart rendered").block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(format!(" {} ", surface)),
        );
        f.render_widget(empty, area);
        return;
    };

    match app.current_panel {
        Panel::Decoupling => render_decoupling(f, area, config),
        Panel::Wallet => render_wallet(f, area, config, app.detail_era),
        Panel::BigTicket => render_big_ticket(f, area, config),
    }
}

fn chart_block(config: &ChartConfig) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", config.title))
}

/// Income as block markers, house price as a line, sharing one value axis
fn render_decoupling(f: &mut Frame, area: Rect, config: &ChartConfig) {
    let points: Vec<Vec<(f64, f64)>> = config
        .series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .enumerate()
                .map(|(i, p)| (i as f64, p.value))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = config
        .series
        .iter()
        .zip(points.iter())
        .map(|(series, data)| {
            let (graph_type, marker) = match series.kind {
                cost_eras::SeriesKind::Bar => (GraphType::Scatter, Marker::Block),
                cost_eras::SeriesKind::Line => (GraphType::Line, Marker::Braille),
            };
            Dataset::default()
                .name(series.label.clone())
                .marker(marker)
                .graph_type(graph_type)
                .style(Style::default().fg(hex_color(&series.color)))
                .data(data)
        })
        .collect();

    let y_max = value_axis_top(config);
    let chart = Chart::new(datasets)
        .block(chart_block(config))
        .x_axis(
            Axis::default()
                .bounds([-0.5, config.labels.len() as f64 - 0.5])
                .labels(config.labels.iter().map(|l| Span::raw(l.clone())).collect())
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(
                    config
                        .value_axis
                        .ticks
                        .iter()
                        .map(|t| Span::raw(t.clone()))
                        .collect(),
                )
                .style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(chart, area);
}

/// Upper y bound; matches the top tick label so ticks sit on their values
fn value_axis_top(config: &ChartConfig) -> f64 {
    config
        .value_axis
        .max
        .unwrap_or_else(|| config.peak())
        .max(1.0)
}

/// Cell widths of stacked segments, rounded on the running total so a
/// full row always spans the same number of cells
fn segment_widths(percentages: &[f64], width: f64) -> Vec<usize> {
    let mut total = 0.0;
    let mut drawn = 0usize;
    percentages
        .iter()
        .map(|pct| {
            total += pct;
            let end = (width * total / 100.0).round() as usize;
            let cells = end.saturating_sub(drawn);
            drawn = drawn.max(end);
            cells
        })
        .collect()
}

/// One 100%-stacked bar per era, drawn as coloured runs of block characters
fn render_wallet(f: &mut Frame, area: Rect, config: &ChartConfig, selected: Era) {
    let width = area.width.saturating_sub(12).max(10) as f64;
    let mut lines = vec![Line::from("")];

    for (i, label) in config.labels.iter().enumerate() {
        let marker = if i == selected.index() { "→ " } else { "  " };
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(format!("{} ", label), Style::default().fg(Color::Yellow)),
        ];
        let percentages: Vec<f64> = config
            .series
            .iter()
            .map(|s| s.points.get(i).map(|p| p.value).unwrap_or(0.0))
            .collect();
        let widths = segment_widths(&percentages, width);
        for (series, cells) in config.series.iter().zip(widths) {
            spans.push(Span::styled(
                "█".repeat(cells),
                Style::default().fg(hex_color(&series.color)),
            ));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    let mut legend = vec![Span::raw("  ")];
    for series in &config.series {
        legend.push(Span::styled("■ ", Style::default().fg(hex_color(&series.color))));
        legend.push(Span::raw(format!("{}  ", series.label)));
    }
    lines.push(Line::from(legend));

    f.render_widget(Paragraph::new(lines).block(chart_block(config)), area);
}

fn render_wallet_detail(f: &mut Frame, area: Rect, app: &App) {
    let mut content = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            format!("  {} SPENDING", app.detail_era),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]),
        Line::from(""),
    ];

    if let Some(config) = app.page().chart(Surface::Wallet) {
        for series in &config.series {
            let Some(point) = series.points.get(app.detail_era.index()) else {
                continue;
            };
            content.push(Line::from(vec![
                Span::styled("  ■ ", Style::default().fg(hex_color(&series.color))),
                Span::styled(
                    point.tooltip.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
            ]));
            if let Some(detail) = &point.detail {
                content.push(Line::from(format!("    {}", detail)));
            }
            content.push(Line::from(""));
        }
    }

    content.push(Line::from(vec![Span::styled(
        "  ↑/↓ change era, Enter to close",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )]));

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Monthly Detail "),
    );

    f.render_widget(panel, area);
}

/// Grouped bars per era; values are tenths of a year so BarChart can take integers
fn render_big_ticket(f: &mut Frame, area: Rect, config: &ChartConfig) {
    let mut chart = BarChart::default()
        .block(chart_block(config))
        .bar_width(6)
        .bar_gap(1)
        .group_gap(4);

    for (i, label) in config.labels.iter().enumerate() {
        let bars: Vec<Bar> = config
            .series
            .iter()
            .filter_map(|series| series.points.get(i).map(|p| (series, p)))
            .map(|(series, point)| {
                Bar::default()
                    .value((point.value * 10.0).round() as u64)
                    .text_value(format!("{:.1}", point.value))
                    .style(Style::default().fg(hex_color(&series.color)))
            })
            .collect();

        chart = chart.data(BarGroup::default().label(Line::from(label.clone())).bars(&bars));
    }

    let legend_height = config.series.len() as u16 + 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(legend_height)])
        .split(area);

    f.render_widget(chart, rows[0]);

    let mut legend: Vec<Line> = config
        .series
        .iter()
        .map(|s| {
            Line::from(vec![
                Span::styled("  ■ ", Style::default().fg(hex_color(&s.color))),
                Span::raw(s.label.clone()),
            ])
        })
        .collect();
    if let Some(title) = &config.value_axis.title {
        legend.push(Line::from(Span::styled(
            format!("  ({})", title),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }
    f.render_widget(Paragraph::new(legend), rows[1]);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let status_spans = vec![
        Span::styled(
            format!(" Profile: {} ", app.dashboard.profile()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("s/c", Style::default().fg(Color::Yellow)),
        Span::raw(" Single/Couple | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Chart | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Details | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Era | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(140, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draws_metric_cards() {
        let app = App::new(Profile::Single).unwrap();
        let screen = draw(&app);
        assert!(screen.contains("8.1x Salary"));
        assert!(screen.contains("£285,000"));
        assert!(screen.contains("Income vs House Prices"));
    }

    #[test]
    fn test_profile_keys() {
        let mut app = App::new(Profile::Single).unwrap();
        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::NONE).unwrap());
        assert_eq!(app.dashboard.profile(), Profile::Couple);
        assert!(draw(&app).contains("4.1x Salary"));

        app.handle_key(KeyCode::Char('p'), KeyModifiers::NONE).unwrap();
        assert_eq!(app.dashboard.profile(), Profile::Single);
        for surface in Surface::ALL {
            assert_eq!(app.page().live_charts(surface), 1);
        }
    }

    #[test]
    fn test_quit_key() {
        let mut app = App::new(Profile::Single).unwrap();
        assert!(!app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE).unwrap());
    }

    #[test]
    fn test_wallet_detail_panel() {
        let mut app = App::new(Profile::Single).unwrap();
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE).unwrap();
        assert_eq!(app.current_panel, Panel::Wallet);
        assert!(app.show_detail);

        let screen = draw(&app);
        assert!(screen.contains("Monthly Detail"));
        assert!(screen.contains("Est. Monthly Cost: £1,230"));
    }

    #[test]
    fn test_decoupling_axis_top_matches_last_tick() {
        let app = App::new(Profile::Single).unwrap();
        let config = app.page().chart(Surface::Decoupling).unwrap();
        assert_eq!(config.value_axis.ticks.last().unwrap(), "£300k");
        assert_eq!(value_axis_top(config), 300_000.0);
    }

    #[test]
    fn test_wallet_rows_have_equal_width() {
        // Rounded one at a time these come to 9 cells
        assert_eq!(segment_widths(&[33.0, 33.0, 34.0], 10.0), vec![3, 4, 3]);
        assert_eq!(
            segment_widths(&[22.0, 42.0, 10.0, 12.0, 14.0], 10.0)
                .iter()
                .sum::<usize>(),
            10
        );

        let app = App::new(Profile::Single).unwrap();
        let config = app.page().chart(Surface::Wallet).unwrap();
        for width in [10.0, 33.0, 61.0, 97.0, 128.0] {
            for i in 0..config.labels.len() {
                let percentages: Vec<f64> =
                    config.series.iter().map(|s| s.points[i].value).collect();
                let total: usize = segment_widths(&percentages, width).iter().sum();
                assert_eq!(total, width as usize, "era {} at width {}", i, width);
            }
        }
    }

    #[test]
    fn test_era_cycling() {
        let mut app = App::new(Profile::Single).unwrap();
        assert_eq!(app.detail_era, Era::Y2025);
        app.next_era();
        assert_eq!(app.detail_era, Era::Y1965);
        app.previous_era();
        assert_eq!(app.detail_era, Era::Y2025);
    }
}
