use tui::buffer::Buffer;
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::text::{Span, Spans};
use tui::widgets::{Paragraph, Widget, Wrap};

use super::allocation::AllocationWidget;
use super::block;
use super::cards::{Card, CardsWidget};
use super::chart::ValueChart;
use crate::common::{format_currency, format_percent};
use crate::theme::{signed, style, THEME};
use crate::workflow::{Dashboard, Phase};

const EVENT_ROWS: usize = 4;

/// Current portfolio: headline figures, value history and holdings
pub struct OverviewWidget<'a> {
    pub dashboard: &'a Dashboard,
}

impl<'a> OverviewWidget<'a> {
    fn cards(&self) -> Vec<Card<'static>> {
        let pending = || "...".to_string();

        match self.dashboard.metrics() {
            Some(metrics) => vec![
                Card {
                    title: "Portfolio Value",
                    value: format_currency(metrics.current_value),
                    color: THEME.text_primary,
                },
                Card {
                    title: "Total Invested",
                    value: format_currency(metrics.total_invested),
                    color: THEME.text_normal,
                },
                Card {
                    title: "Profit",
                    value: format_currency(metrics.profit),
                    color: signed(metrics.profit),
                },
                Card {
                    title: "CAGR",
                    value: format_percent(metrics.cagr),
                    color: signed(metrics.cagr),
                },
            ],
            None => ["Portfolio Value", "Total Invested", "Profit", "CAGR"]
                .iter()
                .map(|&title| Card {
                    title,
                    value: pending(),
                    color: THEME.gray,
                })
                .collect(),
        }
    }

    fn render_events(&self, area: Rect, buf: &mut Buffer) {
        let events = self.dashboard.market_events();

        let lines: Vec<_> = events
            .iter()
            .rev()
            .take(EVENT_ROWS)
            .map(|event| {
                Spans::from(vec![
                    Span::styled(
                        format!("{}  ", event.date.format("%Y-%m-%d")),
                        style().fg(THEME.text_primary),
                    ),
                    Span::styled(event.headline.as_str(), style().fg(THEME.text_normal)),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .block(block::new(" Market Events "))
            .style(style())
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

impl<'a> Widget for OverviewWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // layout[0] - Cards
        // layout[1] - Chart and allocation
        let layout = Layout::default()
            .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
            .split(area);

        CardsWidget {
            cards: self.cards(),
        }
        .render(layout[0], buf);

        // body[0] - Value chart (and events)
        // body[1] - Allocation
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)].as_ref())
            .split(layout[1]);

        let has_events = !self.dashboard.market_events().is_empty();

        let chart_area = if has_events {
            let split = Layout::default()
                .constraints(
                    [
                        Constraint::Min(0),
                        Constraint::Length(EVENT_ROWS as u16 + 2),
                    ]
                    .as_ref(),
                )
                .split(body[0]);

            self.render_events(split[1], buf);
            split[0]
        } else {
            body[0]
        };

        ValueChart {
            points: self.dashboard.monthly_values(),
            events: self.dashboard.market_events(),
            loading: self.dashboard.phase() == Phase::Uploading,
        }
        .render(chart_area, buf);

        AllocationWidget {
            title: " Current Allocation ",
            slices: self.dashboard.current_pie(),
            hide_zero: false,
            empty_text: "Upload a portfolio to see its holdings",
        }
        .render(body[1], buf);
    }
}
