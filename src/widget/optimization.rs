use tui::buffer::Buffer;
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::style::Modifier;
use tui::text::{Span, Spans};
use tui::widgets::{Paragraph, Widget, Wrap};

use super::allocation::AllocationWidget;
use super::cards::{Card, CardsWidget};
use super::chart::DcaChart;
use crate::common::{format_currency, format_percent};
use crate::theme::{signed, style, THEME};
use crate::workflow::{Dashboard, Phase};

/// Optimized allocation for the target CAGR and the DCA simulation
pub struct OptimizationWidget<'a> {
    pub dashboard: &'a Dashboard,
}

impl<'a> OptimizationWidget<'a> {
    fn inputs_line(&self) -> Spans<'static> {
        let inputs = self.dashboard.inputs();

        Spans::from(vec![
            Span::styled("Target CAGR ", style().fg(THEME.text_normal)),
            Span::styled(
                format!("{:.1}%", inputs.target_cagr),
                style()
                    .fg(THEME.text_secondary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Monthly ", style().fg(THEME.text_normal)),
            Span::styled(
                format_currency(inputs.monthly_contribution),
                style()
                    .fg(THEME.text_secondary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Years ", style().fg(THEME.text_normal)),
            Span::styled(
                inputs.years.to_string(),
                style()
                    .fg(THEME.text_secondary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                if self.dashboard.auto_optimize() {
                    "   auto  e: edit  o: optimize"
                } else {
                    "   e: edit  o: optimize"
                },
                style().fg(THEME.gray),
            ),
        ])
    }

    fn cards(&self) -> Vec<Card<'static>> {
        match self.dashboard.optimization() {
            Some(result) => vec![
                Card {
                    title: "Optimized Value",
                    value: format_currency(result.current_value),
                    color: THEME.text_primary,
                },
                Card {
                    title: "Total Invested",
                    value: format_currency(result.total_invested),
                    color: THEME.text_normal,
                },
                Card {
                    title: "Optimized Profit",
                    value: format_currency(result.profit),
                    color: signed(result.profit),
                },
                Card {
                    title: "Optimized CAGR",
                    value: format_percent(result.cagr),
                    color: signed(result.cagr),
                },
            ],
            None => [
                "Optimized Value",
                "Total Invested",
                "Optimized Profit",
                "Optimized CAGR",
            ]
            .iter()
            .map(|&title| Card {
                title,
                value: "...".to_string(),
                color: THEME.gray,
            })
            .collect(),
        }
    }

    /// Summary sentence plus the optimizer's risk figures when reported
    fn summary(&self) -> Vec<Spans<'static>> {
        let mut lines = vec![];

        if let Some(summary) = self.dashboard.dca_summary() {
            lines.push(Spans::from(Span::styled(
                summary.sentence(),
                style().fg(THEME.text_normal),
            )));
        }

        if let Some(result) = self.dashboard.optimization() {
            let figures: Vec<_> = [
                ("Expected return", result.expected_return.map(|v| v * 100.0)),
                ("Volatility", result.expected_volatility.map(|v| v * 100.0)),
                ("Max drawdown", result.max_drawdown),
            ]
            .iter()
            .filter_map(|(name, value)| value.map(|v| format!("{} {}", name, format_percent(v))))
            .chain(result.sharpe_ratio.map(|v| format!("Sharpe {:.2}", v)))
            .collect();

            if !figures.is_empty() {
                lines.push(Spans::from(Span::styled(
                    figures.join("  "),
                    style().fg(THEME.gray),
                )));
            }
        }

        lines
    }
}

impl<'a> Widget for OptimizationWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // layout[0] - Inputs
        // layout[1] - Cards
        // layout[2] - Simulation and allocation
        let layout = Layout::default()
            .constraints(
                [
                    Constraint::Length(1),
                    Constraint::Length(3),
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(area);

        Paragraph::new(self.inputs_line())
            .style(style())
            .render(layout[0], buf);

        CardsWidget {
            cards: self.cards(),
        }
        .render(layout[1], buf);

        // body[0] - Summary and DCA chart
        // body[1] - Optimized allocation
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)].as_ref())
            .split(layout[2]);

        let summary = self.summary();

        let simulation = Layout::default()
            .constraints(
                [
                    Constraint::Length(summary.len() as u16 * 2),
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(body[0]);

        Paragraph::new(summary)
            .style(style())
            .wrap(Wrap { trim: true })
            .render(simulation[0], buf);

        DcaChart {
            points: self.dashboard.dca_points(),
            loading: self.dashboard.phase() == Phase::Optimizing,
        }
        .render(simulation[1], buf);

        let empty_text = match (self.dashboard.portfolio_id(), self.dashboard.phase()) {
            (None, _) => "Upload a portfolio first",
            (_, Phase::Optimizing) => "Optimizing...",
            _ => "Press o to optimize",
        };

        AllocationWidget {
            title: " Optimized Allocation ",
            slices: self.dashboard.optimized_pie(),
            hide_zero: true,
            empty_text,
        }
        .render(body[1], buf);
    }
}
