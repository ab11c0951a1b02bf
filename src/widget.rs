pub use self::file_prompt::{FilePromptState, FilePromptWidget};
pub use self::help::{HelpWidget, HELP_HEIGHT, HELP_WIDTH};
pub use self::inputs_form::{InputsFormState, InputsFormWidget};
pub use self::optimization::OptimizationWidget;
pub use self::overview::OverviewWidget;

mod allocation;
pub mod block;
mod cards;
mod chart;
mod file_prompt;
mod help;
mod inputs_form;
mod optimization;
mod overview;
