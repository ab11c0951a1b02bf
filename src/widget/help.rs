use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::text::{Span, Spans};
use tui::widgets::{Clear, Paragraph, Widget};

use super::block;
use crate::draw::{add_padding, PaddingDirection};
use crate::theme::style;

const TEXT: &str = r#"
Quit: q or <Ctrl+c>
Select File:
  - /: open prompt
  - (while typing):
    - <Enter>: accept
    - <Escape>: cancel
Upload Selected File:
  - u: upload
Change View (tabbed layout):
  - <Tab>: next view
  - <Shift+Tab>: previous view
  - 1 / 2: overview / optimisation
Optimize:
  - o: optimize with current inputs
Edit Optimization Inputs:
  - e: open form
  - <Up / Down>: choose field
  - <Enter>: save and optimize
  - <Escape>: discard
Help:
  - ?: toggle this popup
"#;

pub const HELP_WIDTH: u16 = 40;
pub const HELP_HEIGHT: u16 = 27;

#[derive(Copy, Clone)]
pub struct HelpWidget {}

impl HelpWidget {
    pub fn get_rect(self, area: Rect) -> Rect {
        Rect {
            x: area.x + area.width.saturating_sub(HELP_WIDTH) / 2,
            y: area.y + area.height.saturating_sub(HELP_HEIGHT) / 2,
            width: HELP_WIDTH.min(area.width),
            height: HELP_HEIGHT.min(area.height),
        }
    }
}

impl Widget for HelpWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        block::new(" Help - <ESC> to go back ").render(area, buf);

        let text: Vec<_> = TEXT
            .lines()
            .map(|line| Spans::from(Span::styled(line, style())))
            .collect();

        let mut help_area = area;
        help_area = add_padding(help_area, 2, PaddingDirection::Left);
        help_area = add_padding(help_area, 1, PaddingDirection::Top);

        Paragraph::new(text).render(help_area, buf);
    }
}
