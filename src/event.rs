use crossbeam_channel::Sender;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{self, Mode};
use crate::workflow::View;

/// What the main loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn handle_keys_select_file(keycode: KeyCode, app: &mut app::App) {
    match keycode {
        KeyCode::Enter => {
            if let Some(path) = app.file_prompt.enter() {
                app.select_file(&path);

                app.file_prompt.reset();
                app.mode = app.previous_mode;
            }
        }
        KeyCode::Char(c) => {
            app.file_prompt.add_char(c);
        }
        KeyCode::Backspace => {
            app.file_prompt.del_char();
        }
        KeyCode::Esc => {
            app.file_prompt.reset();
            app.mode = app.previous_mode;
        }
        _ => {}
    }
}

fn handle_keys_edit_inputs(keycode: KeyCode, app: &mut app::App) {
    match keycode {
        KeyCode::Esc => {
            app.mode = app.previous_mode;
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.inputs_form.selection_up();
        }
        KeyCode::Down | KeyCode::Tab => {
            app.inputs_form.selection_down();
        }
        KeyCode::Enter => {
            if app.submit_inputs() {
                app.mode = app.previous_mode;
            }
        }
        KeyCode::Char(c) => {
            app.inputs_form.add_char(c);
        }
        KeyCode::Backspace => {
            app.inputs_form.del_char();
        }
        _ => {}
    }
}

fn handle_keys_dashboard(keycode: KeyCode, app: &mut app::App) {
    match keycode {
        KeyCode::Char('/') => {
            app.previous_mode = app.mode;
            app.mode = Mode::SelectFile;
        }
        KeyCode::Char('u') => {
            app.upload();
        }
        KeyCode::Char('o') => {
            app.optimize();
        }
        KeyCode::Char('e') => {
            app.open_inputs_form();
        }
        KeyCode::Tab | KeyCode::BackTab => {
            let view = app.dashboard.view().toggle();
            app.set_view(view);
        }
        KeyCode::Char('1') => {
            app.set_view(View::Overview);
        }
        KeyCode::Char('2') => {
            app.set_view(View::Optimization);
        }
        _ => {}
    }
}

pub fn handle_key_bindings(
    mode: Mode,
    key_event: KeyEvent,
    app: &mut app::App,
    request_redraw: &Sender<()>,
) -> Flow {
    let plain = key_event.modifiers.is_empty() || key_event.modifiers == KeyModifiers::SHIFT;

    match (mode, key_event.modifiers, key_event.code) {
        (_, KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            return Flow::Quit;
        }
        (Mode::SelectFile, _, keycode) => {
            if plain {
                handle_keys_select_file(keycode, app)
            }
        }
        (Mode::EditInputs, _, keycode) => {
            if plain {
                handle_keys_edit_inputs(keycode, app)
            }
        }
        (Mode::Help, modifiers, keycode) => {
            if modifiers.is_empty()
                && matches!(
                    keycode,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
                )
            {
                app.mode = app.previous_mode;
            }
        }
        (Mode::Dashboard, KeyModifiers::NONE, KeyCode::Char('q')) => {
            return Flow::Quit;
        }
        (Mode::Dashboard, KeyModifiers::NONE, KeyCode::Char('?')) => {
            app.previous_mode = app.mode;
            app.mode = Mode::Help;
        }
        (Mode::Dashboard, _, keycode) => {
            if plain {
                handle_keys_dashboard(keycode, app)
            }
        }
    }

    let _ = request_redraw.try_send(());

    Flow::Continue
}

#[cfg(test)]
mod tests {
    use async_std::sync::Arc;
    use crossbeam_channel::unbounded;
    use crossterm::event::KeyEvent;

    use super::*;
    use crate::app::App;
    use crate::service::dashboard::DashboardService;
    use crate::workflow::mock::{backend, ctx};
    use crate::workflow::{Dashboard, Phase, Variant, WorkflowError};

    fn app(variant: Variant) -> App {
        let (data_received, _) = unbounded();
        let service = DashboardService::new(Arc::new(backend(1)), ctx(), data_received);

        App::new(Dashboard::new(variant), service, false)
    }

    fn press(app: &mut App, code: KeyCode) -> Flow {
        let (redraw, _) = unbounded();
        handle_key_bindings(
            app.mode,
            KeyEvent::new(code, KeyModifiers::NONE),
            app,
            &redraw,
        )
    }

    #[test]
    fn quit_keys() {
        let mut app = app(Variant::Tabbed);

        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);

        let (redraw, _) = unbounded();
        let flow = handle_key_bindings(
            Mode::SelectFile,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut app,
            &redraw,
        );
        assert_eq!(flow, Flow::Quit);
    }

    #[test]
    fn help_toggles_back_to_previous_mode() {
        let mut app = app(Variant::Tabbed);

        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, Mode::Help);

        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Continue);
        assert_eq!(app.mode, Mode::Dashboard);
    }

    #[test]
    fn typed_path_is_selected() {
        let mut app = app(Variant::Classic);

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::SelectFile);

        for c in "missing.csv".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Dashboard);
        assert!(matches!(
            app.dashboard.status().errors(),
            [WorkflowError::InvalidFile(_)]
        ));
    }

    #[test]
    fn upload_without_file_reports_status() {
        let mut app = app(Variant::Classic);

        press(&mut app, KeyCode::Char('u'));

        assert_eq!(app.dashboard.status().errors(), &[WorkflowError::NoFile]);
        assert_eq!(app.dashboard.phase(), Phase::Idle);
        assert_eq!(app.service.in_flight(), 0);
    }

    #[test]
    fn tab_switches_views_in_tabbed_layout_only() {
        let mut tabbed = app(Variant::Tabbed);
        press(&mut tabbed, KeyCode::Tab);
        assert_eq!(tabbed.dashboard.view(), View::Optimization);
        press(&mut tabbed, KeyCode::Char('1'));
        assert_eq!(tabbed.dashboard.view(), View::Overview);

        let mut classic = app(Variant::Classic);
        press(&mut classic, KeyCode::Tab);
        assert_eq!(classic.dashboard.view(), View::Overview);
    }

    #[test]
    fn inputs_form_edits_and_cancels() {
        let mut app = app(Variant::Tabbed);

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, Mode::EditInputs);

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Dashboard);
        assert_eq!(app.dashboard.inputs().target_cagr, 25.0);

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.dashboard.inputs().target_cagr, 25.0);
    }
}
