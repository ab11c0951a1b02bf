use thiserror::Error;

/// Where the dashboard is in the upload → optimize sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FileSelected,
    Uploading,
    UploadedNoMetrics,
    Ready,
    UploadFailed,
    Optimizing,
    OptimizedReady,
    OptimizationFailed,
}

impl Phase {
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Uploading | Phase::Optimizing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    Optimization,
}

impl View {
    pub fn idx(self) -> usize {
        match self {
            View::Overview => 0,
            View::Optimization => 1,
        }
    }

    pub const fn tab_names() -> [&'static str; 2] {
        ["Overview", "Optimisation"]
    }

    pub fn toggle(self) -> View {
        match self {
            View::Overview => View::Optimization,
            View::Optimization => View::Overview,
        }
    }
}

/// Why a workflow action stopped. None of these end the session; the action
/// can be triggered again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("Please select a CSV file before uploading.")]
    NoFile,
    #[error("Invalid file: {0}")]
    InvalidFile(String),
    #[error("Upload failed: {0}")]
    UploadFailed(String),
    #[error("Metrics unavailable: {0}")]
    MetricsUnavailable(String),
    #[error("Portfolio value over time unavailable: {0}")]
    TimeSeriesUnavailable(String),
    #[error("Optimization failed. Allocation data is missing ({0}).")]
    OptimizationMissingAllocation(String),
    #[error("Optimization failed: {0}")]
    OptimizationFailed(String),
    #[error("DCA simulation failed. Response structure is unexpected ({0}).")]
    SimulationShapeMismatch(String),
    #[error("DCA simulation failed: {0}")]
    SimulationFailed(String),
}

/// The line shown under the header
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Empty,
    Info(String),
    Failed(Vec<WorkflowError>),
}

impl Status {
    pub fn info(message: impl Into<String>) -> Status {
        Status::Info(message.into())
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed(_))
    }

    #[cfg(test)]
    pub fn errors(&self) -> &[WorkflowError] {
        match self {
            Status::Failed(errors) => errors,
            _ => &[],
        }
    }

    pub fn message(&self) -> String {
        match self {
            Status::Empty => String::new(),
            Status::Info(message) => message.clone(),
            Status::Failed(errors) => errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}
