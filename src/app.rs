use api::UploadFile;
use tracing::debug;

use crate::service::dashboard::{DashboardService, Update};
use crate::service::Service;
use crate::widget::{FilePromptState, HelpWidget, InputsFormState};
use crate::workflow::{Dashboard, OptimizeRequest, Variant, View, WorkflowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Dashboard,
    SelectFile,
    EditInputs,
    Help,
}

pub struct App {
    pub mode: Mode,
    pub previous_mode: Mode,
    pub dashboard: Dashboard,
    pub service: DashboardService,
    pub file_prompt: FilePromptState,
    pub inputs_form: InputsFormState,
    pub help: HelpWidget,
    pub hide_help: bool,
}

impl App {
    pub fn new(dashboard: Dashboard, service: DashboardService, hide_help: bool) -> App {
        App {
            mode: Mode::Dashboard,
            previous_mode: Mode::Dashboard,
            dashboard,
            service,
            file_prompt: FilePromptState::new(),
            inputs_form: InputsFormState::default(),
            help: HelpWidget {},
            hide_help,
        }
    }

    /// Applies every completion that has arrived, issuing whatever follow-up
    /// requests they produce
    pub fn update(&mut self) {
        for update in self.service.updates() {
            match update {
                Update::Uploaded(outcome) => {
                    let follow_ups = self.dashboard.apply_upload(outcome);

                    if let Some(request) = follow_ups.optimize {
                        self.service.optimize(request);
                    }
                    if let Some(request) = follow_ups.market_events {
                        self.service.market_events(request);
                    }
                }
                Update::Optimized(outcome) => self.dashboard.apply_optimize(outcome),
                Update::MarketEvents(outcome) => self.dashboard.apply_market_events(outcome),
            }
        }
    }

    pub fn select_file(&mut self, path: &str) {
        match UploadFile::from_path(path) {
            Ok(file) => self.dashboard.select_file(file),
            Err(e) => self
                .dashboard
                .reject_file(WorkflowError::InvalidFile(e.to_string())),
        }
    }

    pub fn upload(&mut self) {
        if let Ok(request) = self.dashboard.begin_upload() {
            self.service.upload(request);
        }
    }

    pub fn optimize(&mut self) {
        let request = self.dashboard.begin_optimize();
        self.issue_optimize(request);
    }

    /// Only the tabbed layout has views to switch between
    pub fn set_view(&mut self, view: View) {
        if self.dashboard.variant() != Variant::Tabbed {
            return;
        }

        let request = self.dashboard.activate_view(view);
        self.issue_optimize(request);
    }

    pub fn open_inputs_form(&mut self) {
        self.inputs_form.reset_form(self.dashboard.inputs());
        self.previous_mode = self.mode;
        self.mode = Mode::EditInputs;
    }

    /// Saves valid inputs and re-optimizes with them. Returns false, leaving
    /// the form open, when a field is invalid.
    pub fn submit_inputs(&mut self) -> bool {
        match self.inputs_form.enter() {
            Some(inputs) => {
                self.dashboard.set_inputs(inputs);
                self.optimize();
                true
            }
            None => false,
        }
    }

    fn issue_optimize(&mut self, request: Option<OptimizeRequest>) {
        match request {
            Some(request) => self.service.optimize(request),
            None => debug!("optimize skipped, no portfolio uploaded"),
        }
    }
}
