use std::io;

use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use tui::style::Modifier;
use tui::text::{Span, Spans};
use tui::widgets::{Paragraph, Tabs};
use tui::{Frame, Terminal};

use crate::app::{App, Mode};
use crate::theme::{style, THEME};
use crate::widget::{
    block, FilePromptWidget, InputsFormWidget, OptimizationWidget, OverviewWidget, HELP_HEIGHT,
    HELP_WIDTH,
};
use crate::workflow::{Phase, Variant, View};

pub fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    terminal.draw(|frame| {
        if app.mode == Mode::Help {
            draw_help(frame, app);
            return;
        }

        // chunks[0] - Header
        // chunks[1] - Status line
        // chunks[2] - Dashboard
        // chunks[3] - (Optional) File prompt
        let mut constraints = vec![
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ];
        if app.mode == Mode::SelectFile {
            constraints.push(Constraint::Length(3));
        }

        let chunks = Layout::default()
            .constraints(constraints)
            .split(frame.size());

        draw_header(frame, app, chunks[0]);
        draw_status(frame, app, chunks[1]);
        draw_dashboard(frame, app, chunks[2]);

        if app.mode == Mode::SelectFile {
            frame.render_stateful_widget(FilePromptWidget {}, chunks[3], &mut app.file_prompt);
        }

        if app.mode == Mode::EditInputs {
            let rect = InputsFormWidget::get_rect(frame.size());
            frame.render_stateful_widget(InputsFormWidget {}, rect, &mut app.inputs_form);
        }
    })?;

    Ok(())
}

fn draw_header<B: Backend>(frame: &mut Frame<B>, app: &App, area: Rect) {
    frame.render_widget(block::new(" foliodash "), area);

    // header[0] - View tabs or title
    // header[1] - Selected file and portfolio
    // header[2] - (Optional) help icon
    let mut constraints = vec![Constraint::Min(0), Constraint::Length(36)];
    if !app.hide_help {
        constraints.push(Constraint::Length(10));
    }

    let mut header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(add_padding(area, 1, PaddingDirection::All));

    header[0] = add_padding(header[0], 1, PaddingDirection::Left);

    let dashboard = &app.dashboard;

    match dashboard.variant() {
        Variant::Tabbed => {
            let titles = View::tab_names()
                .iter()
                .map(|name| Spans::from(Span::styled(*name, style())))
                .collect();

            frame.render_widget(
                Tabs::new(titles)
                    .select(dashboard.view().idx())
                    .style(style().fg(THEME.text_secondary))
                    .highlight_style(style().fg(THEME.text_primary)),
                header[0],
            );
        }
        Variant::Classic => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Portfolio Dashboard",
                    style()
                        .fg(THEME.text_secondary)
                        .add_modifier(Modifier::BOLD),
                )),
                header[0],
            );
        }
    }

    let file = dashboard
        .file()
        .map(|f| f.file_name().to_string())
        .unwrap_or_else(|| "no file".to_string());
    let portfolio = dashboard
        .portfolio_id()
        .map(|id| format!("  #{}", id))
        .unwrap_or_default();

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("{}{}", file, portfolio),
            style().fg(THEME.gray),
        ))
        .alignment(Alignment::Right),
        header[1],
    );

    if !app.hide_help {
        frame.render_widget(
            Paragraph::new(Span::styled("Help '?'", style().fg(THEME.text_normal)))
                .alignment(Alignment::Center),
            header[2],
        );
    }
}

fn draw_status<B: Backend>(frame: &mut Frame<B>, app: &App, area: Rect) {
    let dashboard = &app.dashboard;

    let status = dashboard.status();
    let color = if status.is_failure() {
        THEME.error
    } else {
        THEME.text_normal
    };

    let phase = match dashboard.phase() {
        Phase::Idle => "idle",
        Phase::FileSelected => "file selected",
        Phase::Uploading => "uploading",
        Phase::UploadedNoMetrics => "uploaded",
        Phase::Ready => "ready",
        Phase::UploadFailed => "upload failed",
        Phase::Optimizing => "optimizing",
        Phase::OptimizedReady => "optimized",
        Phase::OptimizationFailed => "optimization failed",
    };

    let spans = Spans::from(vec![
        Span::styled(format!(" [{}] ", phase), style().fg(THEME.gray)),
        Span::styled(status.message(), style().fg(color)),
    ]);

    frame.render_widget(Paragraph::new(spans).style(style()), area);
}

fn draw_dashboard<B: Backend>(frame: &mut Frame<B>, app: &App, area: Rect) {
    let dashboard = &app.dashboard;

    match (dashboard.variant(), dashboard.view()) {
        (Variant::Classic, _) => {
            // page[0] - Overview
            // page[1] - Optimisation
            let page = Layout::default()
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
                .split(area);

            frame.render_widget(OverviewWidget { dashboard }, page[0]);
            frame.render_widget(OptimizationWidget { dashboard }, page[1]);
        }
        (Variant::Tabbed, View::Overview) => {
            frame.render_widget(OverviewWidget { dashboard }, area);
        }
        (Variant::Tabbed, View::Optimization) => {
            frame.render_widget(OptimizationWidget { dashboard }, area);
        }
    }
}

fn draw_help<B: Backend>(frame: &mut Frame<B>, app: &App) {
    let rect = frame.size();

    if rect.width < HELP_WIDTH || rect.height < HELP_HEIGHT {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Increase screen size to display help",
                style(),
            )),
            rect,
        );
    } else {
        frame.render_widget(app.help, app.help.get_rect(rect));
    }
}

pub fn add_padding(mut rect: Rect, n: u16, direction: PaddingDirection) -> Rect {
    match direction {
        PaddingDirection::Top => {
            rect.y += n.min(rect.height);
            rect.height = rect.height.saturating_sub(n);
            rect
        }
        PaddingDirection::Bottom => {
            rect.height = rect.height.saturating_sub(n);
            rect
        }
        PaddingDirection::Left => {
            rect.x += n.min(rect.width);
            rect.width = rect.width.saturating_sub(n);
            rect
        }
        PaddingDirection::Right => {
            rect.width = rect.width.saturating_sub(n);
            rect
        }
        PaddingDirection::All => {
            let rect = add_padding(rect, n, PaddingDirection::Top);
            let rect = add_padding(rect, n, PaddingDirection::Bottom);
            let rect = add_padding(rect, n, PaddingDirection::Left);
            add_padding(rect, n, PaddingDirection::Right)
        }
    }
}

#[allow(dead_code)]
pub enum PaddingDirection {
    Top,
    Bottom,
    Left,
    Right,
    All,
}
