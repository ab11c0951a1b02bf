use tui::buffer::Buffer;
use tui::layout::{Constraint, Layout, Rect};
use tui::style::Modifier;
use tui::text::{Span, Spans};
use tui::widgets::{Clear, Paragraph, StatefulWidget, Widget};

use super::block;
use crate::draw::{add_padding, PaddingDirection};
use crate::theme::{style, THEME};
use crate::workflow::OptimizationInputs;

pub const FORM_WIDTH: u16 = 44;
pub const FORM_HEIGHT: u16 = 9;

/// Text fields behind the optimization inputs, validated on enter
#[derive(Debug, Default, Clone)]
pub struct InputsFormState {
    pub input: Input,
    pub selection: Selection,
    pub error_message: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Input {
    pub target_cagr: String,
    pub monthly_contribution: String,
    pub years: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    TargetCagr,
    MonthlyContribution,
    Years,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::TargetCagr
    }
}

impl InputsFormState {
    /// Fills the fields from the values currently in use
    pub fn reset_form(&mut self, inputs: OptimizationInputs) {
        self.input = Input {
            target_cagr: format!("{}", inputs.target_cagr),
            monthly_contribution: format!("{}", inputs.monthly_contribution),
            years: inputs.years.to_string(),
        };
        self.selection = Selection::TargetCagr;
        self.error_message.take();
    }

    fn selected_field(&mut self) -> &mut String {
        match self.selection {
            Selection::TargetCagr => &mut self.input.target_cagr,
            Selection::MonthlyContribution => &mut self.input.monthly_contribution,
            Selection::Years => &mut self.input.years,
        }
    }

    pub fn add_char(&mut self, c: char) {
        let allow_dot = self.selection != Selection::Years;
        let input_field = self.selected_field();

        // Width of our text input box
        if input_field.len() == 12 {
            return;
        }

        if c.is_ascii_digit() || (allow_dot && c == '.' && !input_field.contains('.')) {
            input_field.push(c);
        }
    }

    pub fn del_char(&mut self) {
        self.selected_field().pop();
    }

    pub fn selection_up(&mut self) {
        self.selection = match self.selection {
            Selection::TargetCagr => Selection::Years,
            Selection::MonthlyContribution => Selection::TargetCagr,
            Selection::Years => Selection::MonthlyContribution,
        };
    }

    pub fn selection_down(&mut self) {
        self.selection = match self.selection {
            Selection::TargetCagr => Selection::MonthlyContribution,
            Selection::MonthlyContribution => Selection::Years,
            Selection::Years => Selection::TargetCagr,
        };
    }

    /// Validated inputs, or `None` with `error_message` set
    pub fn enter(&mut self) -> Option<OptimizationInputs> {
        self.error_message.take();

        let target_cagr = match self.input.target_cagr.parse::<f64>() {
            Ok(value) if value > 0.0 && value <= 1000.0 => value,
            _ => {
                self.error_message = Some("Target CAGR must be a percentage above 0".to_string());
                return None;
            }
        };

        let monthly_contribution = match self.input.monthly_contribution.parse::<f64>() {
            Ok(value) if value >= 0.0 => value,
            _ => {
                self.error_message =
                    Some("Monthly contribution must be a valid amount".to_string());
                return None;
            }
        };

        let years = match self.input.years.parse::<u32>() {
            Ok(value) if (1..=50).contains(&value) => value,
            _ => {
                self.error_message = Some("Years must be between 1 and 50".to_string());
                return None;
            }
        };

        Some(OptimizationInputs {
            target_cagr,
            monthly_contribution,
            years,
        })
    }
}

pub struct InputsFormWidget {}

impl InputsFormWidget {
    pub fn get_rect(area: Rect) -> Rect {
        Rect {
            x: area.x + area.width.saturating_sub(FORM_WIDTH) / 2,
            y: area.y + area.height.saturating_sub(FORM_HEIGHT) / 2,
            width: FORM_WIDTH.min(area.width),
            height: FORM_HEIGHT.min(area.height),
        }
    }
}

impl StatefulWidget for InputsFormWidget {
    type State = InputsFormState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        Clear.render(area, buf);
        block::new(" Optimization Inputs ").render(area, buf);

        let mut area = add_padding(area, 1, PaddingDirection::All);
        area = add_padding(area, 1, PaddingDirection::Left);

        // layout[0] - Fields
        // layout[1] - Error message
        let layout = Layout::default()
            .constraints([Constraint::Length(4), Constraint::Min(0)].as_ref())
            .split(area);

        let fields = [
            ("Target CAGR (%)", Selection::TargetCagr, &state.input.target_cagr),
            (
                "Monthly contribution",
                Selection::MonthlyContribution,
                &state.input.monthly_contribution,
            ),
            ("Years", Selection::Years, &state.input.years),
        ];

        let lines: Vec<_> = fields
            .iter()
            .map(|(label, selection, value)| {
                let selected = *selection == state.selection;

                let value_style = if selected {
                    style()
                        .fg(THEME.text_secondary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    style().fg(THEME.text_normal)
                };

                Spans::from(vec![
                    Span::styled(
                        if selected { "> " } else { "  " },
                        style().fg(THEME.highlight),
                    ),
                    Span::styled(format!("{:<22}", label), style().fg(THEME.text_normal)),
                    Span::styled(value.to_string(), value_style),
                ])
            })
            .collect();

        Paragraph::new(lines).style(style()).render(layout[0], buf);

        if let Some(msg) = state.error_message.as_ref() {
            Paragraph::new(Span::styled(msg.as_str(), style().fg(THEME.error)))
                .render(layout[1], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> InputsFormState {
        let mut state = InputsFormState::default();
        state.reset_form(OptimizationInputs {
            target_cagr: 30.0,
            monthly_contribution: 500.0,
            years: 10,
        });
        state
    }

    #[test]
    fn reset_fills_current_values() {
        let state = form();

        assert_eq!(state.input.target_cagr, "30");
        assert_eq!(state.input.monthly_contribution, "500");
        assert_eq!(state.input.years, "10");
    }

    #[test]
    fn edits_selected_field() {
        let mut state = form();

        state.del_char();
        state.del_char();
        state.add_char('1');
        state.add_char('2');
        state.add_char('.');
        state.add_char('5');
        state.add_char('x');

        let inputs = state.enter().unwrap();
        assert_eq!(inputs.target_cagr, 12.5);

        state.selection_up();
        assert_eq!(state.selection, Selection::Years);
        state.add_char('.');
        assert_eq!(state.input.years, "10");
    }

    #[test]
    fn rejects_invalid_values() {
        let mut state = form();
        state.input.years = "0".into();

        assert!(state.enter().is_none());
        assert_eq!(
            state.error_message.as_deref(),
            Some("Years must be between 1 and 50")
        );

        state.input.years = "5".into();
        state.input.target_cagr = String::new();
        assert!(state.enter().is_none());
    }
}
