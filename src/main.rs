use std::io::{self, Stdout};
use std::panic;

use anyhow::{format_err, Context, Error};
use api::model::RequestContext;
use async_std::sync::Arc;
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use crossterm::cursor;
use crossterm::event::Event;
use crossterm::execute;
use crossterm::terminal;
use tracing::{error, info};
use tui::backend::CrosstermBackend;
use tui::Terminal;

use crate::event::Flow;
use crate::service::dashboard::DashboardService;
use crate::workflow::Dashboard;

mod app;
mod common;
mod draw;
mod event;
mod logging;
mod opts;
mod service;
mod task;
mod theme;
mod widget;
mod workflow;

fn main() {
    better_panic::install();

    if let Err(e) = run() {
        eprintln!("foliodash: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let opts = opts::resolve_opts()?;

    let log_path = opts
        .log_file
        .clone()
        .or_else(logging::default_log_path)
        .ok_or_else(|| format_err!("No log location available, pass --log-file"))?;
    logging::init_logging(&log_path)?;

    let user_id = opts.user_id.clone().unwrap_or_default();
    let client = api::Client::new(opts.server())
        .with_context(|| format!("Could not create client for {}", opts.server()))?;

    info!(server = opts.server(), variant = ?opts.variant(), "starting");

    let (data_received_sender, data_received) = unbounded();
    let (redraw_sender, redraw_requested) = bounded(1);

    let service = DashboardService::new(
        Arc::new(client),
        RequestContext::new(user_id),
        data_received_sender,
    );

    let dashboard = Dashboard::new(opts.variant())
        .with_inputs(opts.inputs())
        .with_auto_optimize(opts.auto_optimize());

    let mut app = app::App::new(dashboard, service, opts.hide_help);

    if let Some(path) = &opts.file {
        app.select_file(&path.to_string_lossy());

        if opts.upload {
            app.upload();
        }
    }

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let ctrl_c_events = setup_ctrl_c()?;

    setup_panic_hook();
    setup_terminal()?;

    let ui_events = setup_ui_events();

    let result = event_loop(
        &mut terminal,
        &mut app,
        ui_events,
        ctrl_c_events,
        data_received,
        redraw_sender,
        redraw_requested,
    );

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    cleanup_terminal()?;

    info!("exiting");

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut app::App,
    ui_events: Receiver<Event>,
    ctrl_c_events: Receiver<()>,
    data_received: Receiver<()>,
    request_redraw: Sender<()>,
    redraw_requested: Receiver<()>,
) -> Result<(), Error> {
    draw::draw(terminal, app)?;

    loop {
        select! {
            recv(ctrl_c_events) -> _ => {
                break;
            }
            recv(data_received) -> _ => {
                app.update();
                draw::draw(terminal, app)?;
            }
            recv(redraw_requested) -> _ => {
                draw::draw(terminal, app)?;
            }
            recv(ui_events) -> message => {
                match message {
                    Ok(Event::Key(key_event)) => {
                        let flow = event::handle_key_bindings(app.mode, key_event, app, &request_redraw);

                        if flow == Flow::Quit {
                            break;
                        }
                    }
                    Ok(Event::Resize(..)) => {
                        let _ = request_redraw.try_send(());
                    }
                    Ok(_) => {}
                    Err(_) => {
                        return Err(format_err!("Terminal input closed"));
                    }
                }
            }
        }
    }

    Ok(())
}

fn setup_terminal() -> Result<(), Error> {
    let mut stdout = io::stdout();

    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, cursor::Hide)?;

    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;

    terminal::enable_raw_mode()?;

    Ok(())
}

fn cleanup_terminal() -> Result<(), Error> {
    let mut stdout = io::stdout();

    execute!(stdout, cursor::MoveTo(0, 0))?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;

    execute!(stdout, terminal::LeaveAlternateScreen)?;
    execute!(stdout, cursor::Show)?;

    terminal::disable_raw_mode()?;

    Ok(())
}

/// Reads terminal input on its own thread until reading fails or the loop
/// goes away
fn setup_ui_events() -> Receiver<Event> {
    let (sender, receiver) = unbounded();
    std::thread::spawn(move || {
        while let Ok(event) = crossterm::event::read() {
            if sender.send(event).is_err() {
                break;
            }
        }
    });

    receiver
}

fn setup_ctrl_c() -> Result<Receiver<()>, Error> {
    let (sender, receiver) = unbounded();
    ctrlc::set_handler(move || {
        let _ = sender.send(());
    })?;

    Ok(receiver)
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let _ = cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
