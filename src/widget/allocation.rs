use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::text::{Span, Spans};
use tui::widgets::{Paragraph, Widget};

use super::block;
use crate::common::{share_percentages, Slice};
use crate::theme::{style, SLICE_COLORS, THEME};

const LABEL_WIDTH: usize = 8;
const TEXT_WIDTH: usize = 26;

/// Holdings drawn as one bar per ticker, in the order received
pub struct AllocationWidget<'a> {
    pub title: &'a str,
    pub slices: &'a [Slice],
    /// Leave out tickers the optimizer assigned nothing
    pub hide_zero: bool,
    pub empty_text: &'a str,
}

impl<'a> AllocationWidget<'a> {
    fn rows(&self, bar_width: usize) -> Vec<Spans<'a>> {
        let percentages = share_percentages(self.slices);

        self.slices
            .iter()
            .zip(percentages)
            .enumerate()
            .filter(|(_, (slice, _))| !(self.hide_zero && slice.value == 0.0))
            .map(|(idx, (slice, pct))| {
                let color = SLICE_COLORS[idx % SLICE_COLORS.len()];
                let filled = ((pct / 100.0) * bar_width as f64).round() as usize;

                Spans::from(vec![
                    Span::styled(
                        format!("{:<width$}", slice.label, width = LABEL_WIDTH),
                        style().fg(color),
                    ),
                    Span::styled("█".repeat(filled.min(bar_width)), style().fg(color)),
                    Span::styled(
                        " ".repeat(bar_width.saturating_sub(filled) + 1),
                        style(),
                    ),
                    Span::styled(
                        format!("{} shares ({:.1}%)", format_shares(slice.value), pct),
                        style().fg(THEME.text_normal),
                    ),
                ])
            })
            .collect()
    }
}

impl<'a> Widget for AllocationWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = block::new(self.title);
        let inner = block.inner(area);
        block.render(area, buf);

        let bar_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + TEXT_WIDTH);
        let rows = self.rows(bar_width);

        if rows.is_empty() {
            Paragraph::new(Span::styled(self.empty_text, style().fg(THEME.gray)))
                .render(inner, buf);
        } else {
            Paragraph::new(rows).style(style()).render(inner, buf);
        }
    }
}

/// Whole counts without decimals, fractional ones to 2 places
fn format_shares(shares: f64) -> String {
    if shares.fract() == 0.0 {
        format!("{}", shares)
    } else {
        format!("{:.2}", shares)
    }
}
