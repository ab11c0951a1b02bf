use tui::buffer::Buffer;
use tui::layout::{Alignment, Rect};
use tui::style::Modifier;
use tui::text::{Span, Spans};
use tui::widgets::{Paragraph, StatefulWidget, Widget, Wrap};

use super::block;
use crate::theme::{style, THEME};

/// Path typed by the user to pick the transactions CSV
#[derive(Debug, Default)]
pub struct FilePromptState {
    path: String,
    has_user_input: bool,
    error_msg: Option<String>,
}

impl FilePromptState {
    pub fn new() -> FilePromptState {
        FilePromptState::default()
    }

    pub fn add_char(&mut self, c: char) {
        self.path.push(c);
        self.has_user_input = true;
        self.error_msg = None;
    }

    pub fn del_char(&mut self) {
        self.path.pop();
    }

    pub fn reset(&mut self) {
        self.path.clear();
        self.has_user_input = false;
        self.error_msg = None;
    }

    /// The trimmed path, or `None` after flagging an empty prompt
    pub fn enter(&mut self) -> Option<String> {
        let path = self.path.trim();

        if path.is_empty() {
            self.has_user_input = false;
            self.error_msg = Some("Type the path of a .csv file".to_string());
            return None;
        }

        Some(path.to_string())
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

pub struct FilePromptWidget {}

impl StatefulWidget for FilePromptWidget {
    type State = FilePromptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let spans = match (&state.error_msg, state.has_user_input) {
            (Some(error_msg), false) => Spans::from(vec![
                Span::styled("> ", style()),
                Span::styled(
                    error_msg.as_str(),
                    style().add_modifier(Modifier::BOLD).fg(THEME.loss),
                ),
            ]),
            _ => Spans::from(vec![
                Span::styled("> ", style()),
                Span::styled(
                    state.path(),
                    style()
                        .add_modifier(Modifier::BOLD)
                        .fg(THEME.text_secondary),
                ),
            ]),
        };

        Paragraph::new(spans)
            .block(block::new(" Select Transactions CSV "))
            .style(style())
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
