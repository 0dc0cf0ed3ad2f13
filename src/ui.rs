// 🖥️ Chart Viewer
// Tabbed terminal view of the four charts. The terminal is always restored,
// and a failure while drawing or reading keys is returned to the caller.

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use oldest_businesses::charts::{Charts, Heatmap, PieChart};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table,
    },
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    FoundingYears,
    ContinentShare,
    FoundationHeatmap,
    LongevityHeatmap,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::FoundingYears,
        Page::ContinentShare,
        Page::FoundationHeatmap,
        Page::LongevityHeatmap,
    ];

    pub fn next(&self) -> Self {
        match self {
            Page::FoundingYears => Page::ContinentShare,
            Page::ContinentShare => Page::FoundationHeatmap,
            Page::FoundationHeatmap => Page::LongevityHeatmap,
            Page::LongevityHeatmap => Page::FoundingYears,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::FoundingYears => Page::LongevityHeatmap,
            Page::ContinentShare => Page::FoundingYears,
            Page::FoundationHeatmap => Page::ContinentShare,
            Page::LongevityHeatmap => Page::FoundationHeatmap,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::FoundingYears => "Founding Years",
            Page::ContinentShare => "Continent Share",
            Page::FoundationHeatmap => "Foundation Dates",
            Page::LongevityHeatmap => "Longevity",
        }
    }
}

pub struct App {
    pub charts: Charts,
    pub current_page: Page,
}

impl App {
    pub fn new(charts: Charts) -> Self {
        Self {
            charts,
            current_page: Page::FoundingYears,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let res = run_in_alternate_screen(app);

    // Restore terminal even when the viewer failed
    let restored = disable_raw_mode().context("Failed to disable raw mode");
    res.and(restored)
}

fn run_in_alternate_screen(app: &mut App) -> Result<()> {
    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let res = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("Failed to create terminal")
        .and_then(|mut terminal| {
            run_app(&mut terminal, app, event::read).context("Chart viewer failed")
        });

    let restored = execute!(io::stdout(), LeaveAlternateScreen, Show)
        .context("Failed to leave alternate screen");
    res.and(restored)
}

fn run_app<B, F>(terminal: &mut Terminal<B>, app: &mut App, mut next_event: F) -> io::Result<()>
where
    B: ratatui::backend::Backend,
    F: FnMut() -> io::Result<Event>,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = next_event()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab | KeyCode::Left => app.previous_page(),
                KeyCode::Right => app.next_page(),
                KeyCode::Char('1') => app.current_page = Page::FoundingYears,
                KeyCode::Char('2') => app.current_page = Page::ContinentShare,
                KeyCode::Char('3') => app.current_page = Page::FoundationHeatmap,
                KeyCode::Char('4') => app.current_page = Page::LongevityHeatmap,
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Chart area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::FoundingYears => render_line_chart(f, chunks[1], app),
        Page::ContinentShare => render_pie_chart(f, chunks[1], &app.charts.pie),
        Page::FoundationHeatmap => render_heatmap(f, chunks[1], &app.charts.foundation),
        Page::LongevityHeatmap => render_heatmap(f, chunks[1], &app.charts.longevity),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("{} {}", i + 1, page.title()), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Continents: {}", app.charts.pie.slices.len()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Reference year: {}", app.charts.reference_year),
        Style::default().fg(Color::Cyan),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, _app: &App) {
    let status_spans = vec![
        Span::styled(" Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" / "),
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" Page | "),
        Span::styled("1-4", Style::default().fg(Color::Yellow)),
        Span::raw(" Jump | "),
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

// ============================================================================
// LINE CHART
// ============================================================================

const SERIES_COLORS: [Color; 7] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::LightRed,
    Color::LightBlue,
    Color::White,
];

const SERIES_MARKERS: [Marker; 5] = [
    Marker::Braille,
    Marker::Dot,
    Marker::Block,
    Marker::HalfBlock,
    Marker::Bar,
];

fn render_line_chart(f: &mut Frame, area: Rect, app: &App) {
    let line = &app.charts.line;

    let datasets: Vec<Dataset> = line
        .series
        .iter()
        .map(|series| {
            Dataset::default()
                .name(series.continent.clone())
                .marker(SERIES_MARKERS[series.style_index % SERIES_MARKERS.len()])
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[series.style_index % SERIES_COLORS.len()]))
                .data(&series.points)
        })
        .collect();

    let (x_min, x_max) = line.x_bounds().unwrap_or((0.0, 1.0));
    let pad = ((x_max - x_min) * 0.05).max(1.0);
    let x_bounds = [x_min - pad, x_max + pad];
    let x_labels = vec![
        Span::raw(format!("{:.0}", x_bounds[0])),
        Span::raw(format!("{:.0}", (x_bounds[0] + x_bounds[1]) / 2.0)),
        Span::raw(format!("{:.0}", x_bounds[1])),
    ];

    // Axis labels are spread evenly over the bounds, one per category.
    let (y_bounds, y_labels) = if line.categories.len() < 2 {
        let only = line.categories.first().cloned().unwrap_or_default();
        ([-1.0, 1.0], vec![Span::raw(""), Span::raw(only), Span::raw("")])
    } else {
        (
            [0.0, (line.categories.len() - 1) as f64],
            line.categories.iter().map(|c| Span::raw(truncate(c, 20))).collect(),
        )
    };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Evolution of Founding Years by Category "),
        )
        .x_axis(
            Axis::default()
                .title(line.x_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(line.y_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

// ============================================================================
// PIE CHART
// ============================================================================

fn render_pie_chart(f: &mut Frame, area: Rect, pie: &PieChart) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    // Sample the unit disc and assign every point to the slice covering
    // its angle.
    let mut slice_points: Vec<Vec<(f64, f64)>> = vec![Vec::new(); pie.slices.len()];
    let steps = 160;
    for i in 0..=steps {
        for j in 0..=steps {
            let x = -1.0 + 2.0 * i as f64 / steps as f64;
            let y = -1.0 + 2.0 * j as f64 / steps as f64;
            if x * x + y * y > 1.0 {
                continue;
            }
            if let Some(slice) = pie.slice_at(y.atan2(x).to_degrees()) {
                slice_points[slice].push((x, y));
            }
        }
    }

    let label_positions: Vec<(f64, f64)> = pie
        .slice_angles()
        .iter()
        .map(|(start, end)| {
            let mid = ((start + end) / 2.0).to_radians();
            (0.6 * mid.cos(), 0.6 * mid.sin())
        })
        .collect();

    // Terminal cells are about twice as tall as wide; widen x to keep the pie round.
    let inner_width = chunks[0].width.saturating_sub(2).max(1) as f64;
    let inner_height = chunks[0].height.saturating_sub(2).max(1) as f64;
    let x_half = 1.1 * inner_width / (2.0 * inner_height);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Proportional Business Representation by Continent "),
        )
        .marker(Marker::Braille)
        .x_bounds([-x_half, x_half])
        .y_bounds([-1.1, 1.1])
        .paint(|ctx| {
            for (i, points) in slice_points.iter().enumerate() {
                let (r, g, b) = PieChart::slice_color(i);
                ctx.draw(&Points {
                    coords: points,
                    color: Color::Rgb(r, g, b),
                });
            }
            ctx.layer();
            for (slice, (x, y)) in pie.slices.iter().zip(&label_positions) {
                ctx.print(
                    *x,
                    *y,
                    Span::styled(
                        slice.label(),
                        Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });

    f.render_widget(canvas, chunks[0]);

    let mut legend = vec![Line::from("")];
    for (i, slice) in pie.slices.iter().enumerate() {
        let (r, g, b) = PieChart::slice_color(i);
        legend.push(Line::from(vec![
            Span::styled("  ██ ", Style::default().fg(Color::Rgb(r, g, b))),
            Span::raw(format!("{:<16}", truncate(&slice.continent, 16))),
            Span::styled(format!("{:>6}", slice.label()), Style::default().fg(Color::White)),
            Span::styled(format!("  ({})", slice.count), Style::default().fg(Color::DarkGray)),
        ]));
    }

    let legend = Paragraph::new(legend).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Continents "),
    );

    f.render_widget(legend, chunks[1]);
}

// ============================================================================
// HEATMAPS
// ============================================================================

fn render_heatmap(f: &mut Frame, area: Rect, heatmap: &Heatmap) {
    let header_cells = std::iter::once(heatmap.y_label.clone())
        .chain(heatmap.continents.iter().cloned())
        .map(|h| {
            Cell::from(truncate(&h, 18)).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = heatmap.categories.iter().enumerate().map(|(r, category)| {
        let mut cells = vec![Cell::from(truncate(category, 24))];

        for c in 0..heatmap.continents.len() {
            let cell = match heatmap.color(r, c) {
                Some((red, green, blue)) => Cell::from(format!(" {}", heatmap.annotation(r, c))).style(
                    Style::default()
                        .bg(Color::Rgb(red, green, blue))
                        .fg(contrast(red, green, blue)),
                ),
                None => Cell::from(""),
            };
            cells.push(cell);
        }

        Row::new(cells).height(1)
    });

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(26))
        .chain(heatmap.continents.iter().map(|_| Constraint::Length(15)))
        .collect();

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ({} across) ", heatmap.title, heatmap.x_label)),
    );

    f.render_widget(table, area);
}

/// Black text on light cells, white on dark ones.
fn contrast(r: u8, g: u8, b: u8) -> Color {
    let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luminance > 140.0 {
        Color::Black
    } else {
        Color::White
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
