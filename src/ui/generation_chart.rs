//! Generation mix panel
//!
//! Horizontal bars, one per fuel, sized by percentage share.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::data::GenerationMix;

/// Bars are scaled by this factor so one decimal place survives the `u64` cast
const PERC_SCALE: f64 = 10.0;

/// Color for a fuel type, grouping low-carbon sources in greens and blues
pub fn fuel_color(fuel: &str) -> Color {
    match fuel {
        "wind" => Color::Cyan,
        "solar" => Color::Yellow,
        "hydro" => Color::Blue,
        "nuclear" => Color::Magenta,
        "biomass" => Color::Green,
        "imports" => Color::Gray,
        "gas" => Color::LightRed,
        "coal" => Color::Red,
        _ => Color::White,
    }
}

fn bar_value(perc: f64) -> u64 {
    (perc.max(0.0) * PERC_SCALE).round() as u64
}

/// Renders the generation mix chart with a one-line summary underneath
pub fn render(frame: &mut Frame, area: Rect, mix: &GenerationMix) {
    let block = Block::default()
        .title(" Current Generation Mix of the UK ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let bars: Vec<Bar> = mix
        .rows()
        .iter()
        .map(|row| {
            Bar::default()
                .label(Line::from(row.fuel.clone()))
                .value(bar_value(row.perc))
                .text_value(format!("{:.1}%", row.perc))
                .style(Style::default().fg(fuel_color(&row.fuel)))
        })
        .collect();

    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(bar_value(100.0))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, chunks[0]);

    let summary = match mix.max_share() {
        Some(top) => Line::from(vec![
            Span::styled("Largest share: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} {:.1}%", top.fuel, top.perc),
                Style::default()
                    .fg(fuel_color(&top.fuel))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(Span::styled(
            "No generation data",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(summary), chunks[1]);
}
