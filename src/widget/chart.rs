use api::model::MarketEvent;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::symbols::Marker;
use tui::text::Span;
use tui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget};

use super::block;
use crate::common::{
    cast_as_dataset, format_rounded_currency, min_max, month_label, year_tick, DcaPoint,
    ValuePoint,
};
use crate::theme::{style, THEME};

/// Need more than two points for GraphType::Line to draw anything useful
fn graph_type(len: usize) -> GraphType {
    if len <= 2 {
        GraphType::Scatter
    } else {
        GraphType::Line
    }
}

/// First, middle and last entries, which is all the x-axis has room for
fn x_labels<'a>(labels: impl Iterator<Item = &'a str> + Clone, len: usize) -> Vec<Span<'a>> {
    if len == 0 {
        return vec![];
    }

    let mid = len / 2;
    let picks = [0, mid, len - 1];

    picks
        .iter()
        .filter_map(|&idx| labels.clone().nth(idx))
        .map(|label| Span::styled(label, style().fg(THEME.border_axis)))
        .collect()
}

fn y_labels(min: f64, max: f64) -> Vec<Span<'static>> {
    [min, (min + max) / 2.0, max]
        .iter()
        .map(|value| Span::styled(format_rounded_currency(*value), style().fg(THEME.border_axis)))
        .collect()
}

fn placeholder(title: &str, text: &str, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(text, style().fg(THEME.gray)))
        .block(block::new(title))
        .render(area, buf);
}

/// Monthly portfolio value, with market events marked on their month
pub struct ValueChart<'a> {
    pub points: &'a [ValuePoint],
    pub events: &'a [MarketEvent],
    pub loading: bool,
}

impl<'a> ValueChart<'a> {
    fn event_marks(&self) -> Vec<(f64, f64)> {
        self.events
            .iter()
            .filter_map(|event| {
                let label = month_label(&event.date.format("%Y-%m").to_string()).ok()?;

                self.points
                    .iter()
                    .position(|p| p.label == label)
                    .map(|idx| ((idx + 1) as f64, self.points[idx].value))
            })
            .collect()
    }
}

impl<'a> Widget for ValueChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        const TITLE: &str = " Portfolio Value Over Time ";

        if self.points.is_empty() {
            let text = if self.loading {
                "Loading..."
            } else {
                "No value history yet"
            };
            placeholder(TITLE, text, area, buf);
            return;
        }

        let values: Vec<_> = self
            .points
            .iter()
            .map(|p| &p.value)
            .enumerate()
            .map(cast_as_dataset)
            .collect();
        let marks = self.event_marks();

        let (min, max) = min_max(self.points.iter().map(|p| p.value));

        let mut datasets = vec![Dataset::default()
            .name("Value")
            .marker(Marker::Braille)
            .style(style().fg(THEME.text_secondary))
            .graph_type(graph_type(values.len()))
            .data(&values)];

        if !marks.is_empty() {
            datasets.push(
                Dataset::default()
                    .name("Events")
                    .marker(Marker::Dot)
                    .style(style().fg(THEME.text_primary))
                    .graph_type(GraphType::Scatter)
                    .data(&marks),
            );
        }

        Chart::new(datasets)
            .block(block::new(TITLE))
            .style(style())
            .x_axis(
                Axis::default()
                    .bounds([1.0, values.len().max(2) as f64])
                    .style(style().fg(THEME.border_axis))
                    .labels(x_labels(
                        self.points.iter().map(|p| p.label.as_str()),
                        self.points.len(),
                    )),
            )
            .y_axis(
                Axis::default()
                    .bounds([min, max])
                    .style(style().fg(THEME.border_axis))
                    .labels(y_labels(min, max)),
            )
            .render(area, buf);
    }
}

/// Simulated actual vs optimized growth, ticked by year
pub struct DcaChart<'a> {
    pub points: &'a [DcaPoint],
    pub loading: bool,
}

impl<'a> Widget for DcaChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        const TITLE: &str = " DCA Simulation: Actual vs Optimized ";

        if self.points.is_empty() {
            let text = if self.loading {
                "Simulating..."
            } else {
                "Optimize to run the simulation"
            };
            placeholder(TITLE, text, area, buf);
            return;
        }

        let actual: Vec<_> = self
            .points
            .iter()
            .map(|p| &p.actual)
            .enumerate()
            .map(cast_as_dataset)
            .collect();
        let optimized: Vec<_> = self
            .points
            .iter()
            .map(|p| &p.optimized)
            .enumerate()
            .map(cast_as_dataset)
            .collect();

        let (min, max) = min_max(
            self.points
                .iter()
                .flat_map(|p| [p.actual, p.optimized]),
        );

        let datasets = vec![
            Dataset::default()
                .name("Actual")
                .marker(Marker::Braille)
                .style(style().fg(THEME.loss))
                .graph_type(graph_type(actual.len()))
                .data(&actual),
            Dataset::default()
                .name("Optimized")
                .marker(Marker::Braille)
                .style(style().fg(THEME.profit))
                .graph_type(graph_type(optimized.len()))
                .data(&optimized),
        ];

        Chart::new(datasets)
            .block(block::new(TITLE))
            .style(style())
            .x_axis(
                Axis::default()
                    .bounds([1.0, self.points.len().max(2) as f64])
                    .style(style().fg(THEME.border_axis))
                    .labels(x_labels(
                        self.points.iter().map(|p| year_tick(&p.label)),
                        self.points.len(),
                    )),
            )
            .y_axis(
                Axis::default()
                    .bounds([min, max])
                    .style(style().fg(THEME.border_axis))
                    .labels(y_labels(min, max)),
            )
            .render(area, buf);
    }
}
