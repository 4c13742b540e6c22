//! 24-hour carbon intensity line chart

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::data::IntensityTable;

/// Series colors, assigned in column order
const SERIES_COLORS: [Color; 4] = [Color::Cyan, Color::Yellow, Color::Magenta, Color::Green];

/// Rounds the value range outward to a multiple of 50 for the y axis
fn y_bounds(table: &IntensityTable) -> [f64; 2] {
    match table.value_range() {
        Some((lo, hi)) => {
            let lo = ((lo / 50.0).floor() * 50.0).max(0.0);
            let hi = ((hi / 50.0).ceil() * 50.0).max(lo + 50.0);
            [lo, hi]
        }
        None => [0.0, 50.0],
    }
}

/// First, middle and last period labels for the x axis
fn x_labels(table: &IntensityTable) -> Vec<Span<'static>> {
    let last = table.len().saturating_sub(1);
    [0, last / 2, last]
        .into_iter()
        .filter_map(|row| table.period_label(row))
        .map(Span::raw)
        .collect()
}

/// Renders every numeric intensity column as a line over the day's periods
pub fn render(frame: &mut Frame, area: Rect, table: &IntensityTable) {
    let block = Block::default()
        .title(" Carbon Intensity of the UK in the last 24 hrs (gCO2/kWh) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if table.is_empty() || table.columns.is_empty() {
        let placeholder = Paragraph::new("No intensity data")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let series: Vec<(&str, Vec<(f64, f64)>)> = table
        .columns
        .iter()
        .map(|column| (column.name.as_str(), table.points(column)))
        .collect();

    let datasets = series
        .iter()
        .enumerate()
        .map(|(i, (name, points))| {
            Dataset::default()
                .name(name.to_string())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(points)
        })
        .collect();

    let [y_min, y_max] = y_bounds(table);
    let x_max = table.len().saturating_sub(1).max(1) as f64;

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels(table)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.0}", y_min)),
                    Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
                    Span::raw(format!("{:.0}", y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::IntensityColumn;
    use ratatui::{backend::TestBackend, Terminal};

    fn sample_table() -> IntensityTable {
        IntensityTable {
            index: vec![
                "2023-01-01T00:00Z".to_string(),
                "2023-01-01T00:30Z".to_string(),
                "2023-01-01T01:00Z".to_string(),
            ],
            columns: vec![
                IntensityColumn {
                    name: "forecast".to_string(),
                    values: vec![Some(200.0), Some(180.0), Some(160.0)],
                },
                IntensityColumn {
                    name: "actual".to_string(),
                    values: vec![Some(190.0), Some(175.0), None],
                },
            ],
        }
    }

    fn render_to_string(table: &IntensityTable) -> String {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area, table);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_y_bounds_round_outward() {
        assert_eq!(y_bounds(&sample_table()), [150.0, 200.0]);
        assert_eq!(y_bounds(&IntensityTable::default()), [0.0, 50.0]);
    }

    #[test]
    fn test_y_bounds_never_collapse() {
        let table = IntensityTable {
            index: vec!["a".to_string()],
            columns: vec![IntensityColumn {
                name: "forecast".to_string(),
                values: vec![Some(100.0)],
            }],
        };
        assert_eq!(y_bounds(&table), [100.0, 150.0]);
    }

    #[test]
    fn test_x_labels_use_period_times() {
        let labels: Vec<String> = x_labels(&sample_table())
            .into_iter()
            .map(|span| span.content.to_string())
            .collect();
        assert_eq!(labels, vec!["00:00", "00:30", "01:00"]);
    }

    #[test]
    fn test_renders_title() {
        let content = render_to_string(&sample_table());
        assert!(content.contains("Carbon Intensity of the UK"));
    }

    #[test]
    fn test_renders_placeholder_when_empty() {
        let content = render_to_string(&IntensityTable::default());
        assert!(content.contains("No intensity data"));
    }
}
