//! Dashboard screen rendering
//!
//! Header with the data source and caching note, the two charts side by side,
//! and a status footer.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{generation_chart, intensity_chart};
use crate::app::App;
use crate::data::Dashboard;

/// Renders the full dashboard for loaded data
pub fn render(frame: &mut Frame, app: &App, dashboard: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app.ttl_seconds);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    generation_chart::render(frame, columns[0], &dashboard.generation_mix);
    intensity_chart::render(frame, columns[1], &dashboard.intensity);

    render_footer(frame, chunks[2], app);
}

/// Renders the load error in place of the charts
pub fn render_error(frame: &mut Frame, app: &App, message: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app.ttl_seconds);

    let lines = vec![
        Line::from(Span::styled(
            "Could not load carbon intensity data",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
    ];
    let error = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(error, chunks[1]);

    render_footer(frame, chunks[2], app);
}

fn render_header(frame: &mut Frame, area: Rect, ttl_seconds: u64) {
    let lines = vec![
        Line::from(Span::styled(
            "UK Carbon Intensity Dashboard",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(
            "Current generation mix and carbon intensity over the last 24 hrs, \
             from the National Grid Carbon Intensity API (api.carbonintensity.org.uk).",
        ),
        Line::from(Span::styled(
            format!(
                "Data is cached for {} in line with the API's update frequency (the UK grid settlement period).",
                format_ttl(ttl_seconds)
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let header = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let refreshed = app
        .last_refresh
        .map(|t| format!("Updated {}", t.format("%H:%M:%S")))
        .unwrap_or_else(|| "Not loaded".to_string());

    let footer = Paragraph::new(Line::from(vec![
        Span::raw(refreshed),
        Span::styled(
            format!("  |  {} cached  |  ", app.cached_entries()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" refresh  "),
        Span::styled("R", Style::default().fg(Color::Yellow)),
        Span::raw(" reload  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ]))
    .alignment(Alignment::Left);
    frame.render_widget(footer, area);
}

/// Formats a TTL as whole minutes when possible ("30 minutes"), else seconds
pub fn format_ttl(ttl_seconds: u64) -> String {
    match ttl_seconds {
        60 => "1 minute".to_string(),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{} seconds", s),
    }
}
