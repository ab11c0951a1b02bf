use tui::buffer::Buffer;
use tui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier};
use tui::text::Span;
use tui::widgets::{Paragraph, Widget};

use super::block;
use crate::theme::style;

/// A titled figure, e.g. portfolio value
pub struct Card<'a> {
    pub title: &'a str,
    pub value: String,
    pub color: Color,
}

/// A row of equally wide cards
pub struct CardsWidget<'a> {
    pub cards: Vec<Card<'a>>,
}

impl<'a> Widget for CardsWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.cards.is_empty() {
            return;
        }

        let n = self.cards.len() as u32;
        let constraints: Vec<_> = (0..n).map(|_| Constraint::Ratio(1, n)).collect();

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (card, area) in self.cards.into_iter().zip(layout) {
            let title = format!(" {} ", card.title);

            Paragraph::new(Span::styled(
                card.value,
                style().fg(card.color).add_modifier(Modifier::BOLD),
            ))
            .block(block::new(&title))
            .alignment(Alignment::Center)
            .render(area, buf);
        }
    }
}
