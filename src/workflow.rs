use api::model::{
    DcaParams, DcaSeries, MarketEvent, Metrics, OptimizationResult, PortfolioId, RequestContext,
    TargetReturn, TimeSeries,
};
use api::{ApiError, ContractViolation, PortfolioBackend, UploadFile};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

pub use self::inputs::{OptimizationInputs, Variant};
pub use self::status::{Phase, Status, View, WorkflowError};
use crate::common::{
    format_currency, pie_series, value_series, zip_dca, DcaPoint, Slice, ValuePoint,
};

mod inputs;
#[cfg(test)]
pub(crate) mod mock;
mod status;

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub generation: u64,
    pub file: UploadFile,
}

#[derive(Debug)]
pub struct UploadOutcome {
    generation: u64,
    result: Result<UploadedPortfolio, WorkflowError>,
}

#[derive(Debug)]
struct UploadedPortfolio {
    portfolio_id: PortfolioId,
    metrics: Result<Metrics, WorkflowError>,
    time_series: Result<TimeSeries, WorkflowError>,
}

#[derive(Debug, Clone)]
pub struct OptimizeRequest {
    pub generation: u64,
    pub portfolio_id: PortfolioId,
    pub inputs: OptimizationInputs,
    pub target_return: TargetReturn,
    pub dca: DcaParams,
}

#[derive(Debug)]
pub struct OptimizeOutcome {
    request: OptimizeRequest,
    result: Result<OptimizedPortfolio, WorkflowError>,
}

#[derive(Debug)]
struct OptimizedPortfolio {
    optimization: OptimizationResult,
    simulation: Result<DcaSeries, WorkflowError>,
}

/// Requests the UI should issue once an upload has been applied
#[derive(Debug, Default)]
pub struct FollowUps {
    pub optimize: Option<OptimizeRequest>,
    pub market_events: Option<EventsRequest>,
}

#[derive(Debug, Clone)]
pub struct EventsRequest {
    pub portfolio_id: PortfolioId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug)]
pub struct EventsOutcome {
    portfolio_id: PortfolioId,
    result: Result<Vec<MarketEvent>, ApiError>,
}

/// Figures behind the sentence above the DCA chart
#[derive(Debug, Clone, PartialEq)]
pub struct DcaSummary {
    pub initial_investment: f64,
    pub monthly_contribution: f64,
    pub target_cagr: f64,
    pub years: u32,
    pub final_actual: f64,
    pub final_optimized: f64,
}

impl DcaSummary {
    fn new(request: &OptimizeRequest, points: &[DcaPoint]) -> DcaSummary {
        let last = points.last();

        DcaSummary {
            initial_investment: request.dca.initial_investment,
            monthly_contribution: request.dca.monthly_contribution,
            target_cagr: request.inputs.target_cagr,
            years: request.dca.years,
            final_actual: last.map(|p| p.actual).unwrap_or_default(),
            final_optimized: last.map(|p| p.optimized).unwrap_or_default(),
        }
    }

    pub fn sentence(&self) -> String {
        format!(
            "Starting with {}, adding {}/month at {:.1}% annual, you'll grow to {} vs {} in {} yrs.",
            format_currency(self.initial_investment),
            format_currency(self.monthly_contribution),
            self.target_cagr,
            format_currency(self.final_optimized),
            format_currency(self.final_actual),
            self.years,
        )
    }
}

/// All state of one dashboard. Lives on the UI thread; network work happens
/// in the `run_*` functions and comes back through the `apply_*` methods.
pub struct Dashboard {
    variant: Variant,
    auto_optimize: bool,
    view: View,
    phase: Phase,
    status: Status,
    file: Option<UploadFile>,
    inputs: OptimizationInputs,

    portfolio_id: Option<PortfolioId>,
    metrics: Option<Metrics>,
    time_series: Option<TimeSeries>,
    monthly_values: Vec<ValuePoint>,
    current_pie: Vec<Slice>,
    market_events: Vec<MarketEvent>,

    optimization: Option<OptimizationResult>,
    optimized_pie: Vec<Slice>,
    dca_points: Vec<DcaPoint>,
    dca_summary: Option<DcaSummary>,
    /// Halves of the last upload that could not be fetched
    upload_errors: Vec<WorkflowError>,

    upload_generation: u64,
    optimize_generation: u64,
}

impl Dashboard {
    pub fn new(variant: Variant) -> Dashboard {
        Dashboard {
            variant,
            auto_optimize: variant.auto_optimize(),
            view: View::Overview,
            phase: Phase::Idle,
            status: Status::Empty,
            file: None,
            inputs: OptimizationInputs::for_variant(variant),
            portfolio_id: None,
            metrics: None,
            time_series: None,
            monthly_values: vec![],
            current_pie: vec![],
            market_events: vec![],
            optimization: None,
            optimized_pie: vec![],
            dca_points: vec![],
            dca_summary: None,
            upload_errors: vec![],
            upload_generation: 0,
            optimize_generation: 0,
        }
    }

    pub fn with_inputs(mut self, inputs: OptimizationInputs) -> Dashboard {
        self.inputs = inputs;
        self
    }

    pub fn with_auto_optimize(mut self, auto_optimize: bool) -> Dashboard {
        self.auto_optimize = auto_optimize;
        self
    }

    pub fn select_file(&mut self, file: UploadFile) {
        info!(file = file.file_name(), "file selected");

        self.status = Status::info(format!("Selected {}", file.file_name()));
        self.file = Some(file);

        if !self.phase.is_busy() {
            self.phase = Phase::FileSelected;
        }
    }

    /// Marks a local problem with the chosen file, e.g. it couldn't be read
    pub fn reject_file(&mut self, err: WorkflowError) {
        self.fail(vec![err]);
    }

    pub fn begin_upload(&mut self) -> Result<UploadRequest, WorkflowError> {
        let file = match &self.file {
            Some(file) => file.clone(),
            None => {
                self.fail(vec![WorkflowError::NoFile]);
                return Err(WorkflowError::NoFile);
            }
        };

        if let Err(e) = file.preflight() {
            let err = WorkflowError::InvalidFile(e.to_string());
            self.fail(vec![err.clone()]);
            return Err(err);
        }

        self.upload_generation += 1;
        self.phase = Phase::Uploading;
        self.status = Status::info(format!("Uploading {}...", file.file_name()));

        debug!(generation = self.upload_generation, "upload issued");

        Ok(UploadRequest {
            generation: self.upload_generation,
            file,
        })
    }

    pub fn apply_upload(&mut self, outcome: UploadOutcome) -> FollowUps {
        if outcome.generation != self.upload_generation {
            debug!(
                generation = outcome.generation,
                latest = self.upload_generation,
                "discarding stale upload"
            );
            return FollowUps::default();
        }

        let uploaded = match outcome.result {
            Ok(uploaded) => uploaded,
            Err(err) => {
                self.phase = Phase::UploadFailed;
                self.fail(vec![err]);
                return FollowUps::default();
            }
        };

        info!(portfolio_id = %uploaded.portfolio_id, "portfolio uploaded");

        self.clear_portfolio();
        self.portfolio_id = Some(uploaded.portfolio_id);

        let mut errors = vec![];

        match uploaded.metrics {
            Ok(metrics) => {
                self.current_pie = pie_series(&metrics.net_shares);
                self.metrics = Some(metrics);
            }
            Err(err) => errors.push(err),
        }

        match uploaded.time_series {
            Ok(series) => {
                self.monthly_values = value_series(&series);
                self.time_series = Some(series);
            }
            Err(err) => errors.push(err),
        }

        if errors.is_empty() {
            self.phase = Phase::Ready;
            self.status = Status::info("Upload successful!");
        } else {
            self.phase = Phase::UploadedNoMetrics;
            self.upload_errors = errors.clone();
            self.fail(errors);
        }

        let optimize = if self.auto_optimize && self.optimization_visible() {
            self.begin_optimize()
        } else {
            None
        };

        FollowUps {
            optimize,
            market_events: self.market_events_request(),
        }
    }

    pub fn begin_optimize(&mut self) -> Option<OptimizeRequest> {
        let portfolio_id = self.portfolio_id?;

        let initial_investment = self
            .metrics
            .as_ref()
            .map(|m| m.current_value)
            .unwrap_or_default();

        self.optimize_generation += 1;
        self.phase = Phase::Optimizing;
        self.inform("Optimizing portfolio...");

        debug!(
            generation = self.optimize_generation,
            %portfolio_id,
            target_cagr = self.inputs.target_cagr,
            "optimization issued"
        );

        Some(OptimizeRequest {
            generation: self.optimize_generation,
            portfolio_id,
            inputs: self.inputs,
            target_return: self.inputs.target_return(),
            dca: self.inputs.dca_params(initial_investment),
        })
    }

    pub fn apply_optimize(&mut self, outcome: OptimizeOutcome) {
        let request = outcome.request;

        if request.generation != self.optimize_generation {
            debug!(
                generation = request.generation,
                latest = self.optimize_generation,
                "discarding stale optimization"
            );
            return;
        }

        if Some(request.portfolio_id) != self.portfolio_id {
            debug!(portfolio_id = %request.portfolio_id, "discarding optimization for replaced portfolio");
            return;
        }

        let optimized = match outcome.result {
            Ok(optimized) => optimized,
            Err(err) => {
                self.phase = Phase::OptimizationFailed;
                self.fail_optimize(err);
                return;
            }
        };

        self.optimized_pie = pie_series(&optimized.optimization.net_shares);
        self.optimization = Some(optimized.optimization);

        match optimized.simulation {
            Ok(series) => {
                self.dca_points = zip_dca(&series);
                self.dca_summary = Some(DcaSummary::new(&request, &self.dca_points));
                self.phase = Phase::OptimizedReady;
                self.inform("Optimization complete.");

                info!(months = series.len(), "optimization applied");
            }
            Err(err) => {
                self.phase = Phase::OptimizationFailed;
                self.fail_optimize(err);
            }
        }
    }

    /// Market events covering the current value-over-time range
    fn market_events_request(&self) -> Option<EventsRequest> {
        let portfolio_id = self.portfolio_id?;
        let (start, end) = self.time_series.as_ref()?.date_range()?;

        Some(EventsRequest {
            portfolio_id,
            start,
            end,
        })
    }

    /// Events are decoration, a failure only gets logged
    pub fn apply_market_events(&mut self, outcome: EventsOutcome) {
        if Some(outcome.portfolio_id) != self.portfolio_id {
            return;
        }

        match outcome.result {
            Ok(events) => self.market_events = events,
            Err(e) => warn!(error = %e, "market events unavailable"),
        }
    }

    /// Switches the visible view, returning an optimize request when the eager
    /// policy applies
    pub fn activate_view(&mut self, view: View) -> Option<OptimizeRequest> {
        let changed = self.view != view;
        self.view = view;

        if changed && view == View::Optimization && self.auto_optimize {
            self.begin_optimize()
        } else {
            None
        }
    }

    /// The classic layout always shows the optimisation panel
    fn optimization_visible(&self) -> bool {
        self.variant == Variant::Classic || self.view == View::Optimization
    }

    pub fn set_inputs(&mut self, inputs: OptimizationInputs) {
        self.inputs = inputs;
    }

    fn clear_portfolio(&mut self) {
        self.portfolio_id = None;
        self.metrics = None;
        self.time_series = None;
        self.monthly_values.clear();
        self.current_pie.clear();
        self.market_events.clear();
        self.optimization = None;
        self.optimized_pie.clear();
        self.dca_points.clear();
        self.dca_summary = None;
        self.upload_errors.clear();
    }

    fn fail(&mut self, errors: Vec<WorkflowError>) {
        for err in &errors {
            warn!(error = %err, phase = ?self.phase, "workflow step failed");
        }

        self.status = Status::Failed(errors);
    }

    /// Progress message, unless a half of the upload is still missing: that
    /// failure stays on screen until the next upload
    fn inform(&mut self, message: &str) {
        self.status = if self.upload_errors.is_empty() {
            Status::info(message)
        } else {
            Status::Failed(self.upload_errors.clone())
        };
    }

    /// Optimize errors are reported after any missing upload half
    fn fail_optimize(&mut self, err: WorkflowError) {
        warn!(error = %err, phase = ?self.phase, "workflow step failed");

        let mut errors = self.upload_errors.clone();
        errors.push(err);
        self.status = Status::Failed(errors);
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn auto_optimize(&self) -> bool {
        self.auto_optimize
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    pub fn inputs(&self) -> OptimizationInputs {
        self.inputs
    }

    pub fn portfolio_id(&self) -> Option<PortfolioId> {
        self.portfolio_id
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    #[cfg(test)]
    pub fn time_series(&self) -> Option<&TimeSeries> {
        self.time_series.as_ref()
    }

    pub fn monthly_values(&self) -> &[ValuePoint] {
        &self.monthly_values
    }

    pub fn current_pie(&self) -> &[Slice] {
        &self.current_pie
    }

    pub fn market_events(&self) -> &[MarketEvent] {
        &self.market_events
    }

    pub fn optimization(&self) -> Option<&OptimizationResult> {
        self.optimization.as_ref()
    }

    pub fn optimized_pie(&self) -> &[Slice] {
        &self.optimized_pie
    }

    pub fn dca_points(&self) -> &[DcaPoint] {
        &self.dca_points
    }

    pub fn dca_summary(&self) -> Option<&DcaSummary> {
        self.dca_summary.as_ref()
    }
}

/// Upload, then metrics and value over time for the new id. The two
/// follow-ups are independent of each other.
pub async fn run_upload(
    backend: &dyn PortfolioBackend,
    ctx: &RequestContext,
    request: &UploadRequest,
) -> UploadOutcome {
    let result = match backend.upload_portfolio(ctx, &request.file).await {
        Ok(portfolio_id) => {
            let metrics = backend
                .get_metrics(ctx, portfolio_id)
                .await
                .map_err(|e| WorkflowError::MetricsUnavailable(e.to_string()));

            let time_series = backend
                .get_value_over_time(ctx, portfolio_id)
                .await
                .map_err(|e| WorkflowError::TimeSeriesUnavailable(e.to_string()));

            Ok(UploadedPortfolio {
                portfolio_id,
                metrics,
                time_series,
            })
        }
        Err(e) => Err(WorkflowError::UploadFailed(e.to_string())),
    };

    UploadOutcome {
        generation: request.generation,
        result,
    }
}

/// Optimization, then the DCA simulation. Nothing is simulated when the
/// optimization fails.
pub async fn run_optimize(
    backend: &dyn PortfolioBackend,
    ctx: &RequestContext,
    request: &OptimizeRequest,
) -> OptimizeOutcome {
    let result = match backend
        .get_optimization(ctx, request.portfolio_id, request.target_return)
        .await
    {
        Ok(optimization) => {
            let simulation = backend
                .get_dca_simulation(ctx, request.portfolio_id, &request.dca)
                .await
                .map_err(simulation_error);

            Ok(OptimizedPortfolio {
                optimization,
                simulation,
            })
        }
        Err(e) => Err(optimization_error(e)),
    };

    OptimizeOutcome {
        request: request.clone(),
        result,
    }
}

pub async fn run_market_events(
    backend: &dyn PortfolioBackend,
    ctx: &RequestContext,
    request: &EventsRequest,
) -> EventsOutcome {
    EventsOutcome {
        portfolio_id: request.portfolio_id,
        result: backend
            .get_market_events(ctx, request.start, request.end)
            .await,
    }
}

fn optimization_error(err: ApiError) -> WorkflowError {
    match err.contract() {
        Some(violation) if matches!(violation, ContractViolation::MissingAllocation { .. }) => {
            WorkflowError::OptimizationMissingAllocation(violation.to_string())
        }
        _ => WorkflowError::OptimizationFailed(err.to_string()),
    }
}

fn simulation_error(err: ApiError) -> WorkflowError {
    match err.contract() {
        Some(ContractViolation::Rejected(reason)) => WorkflowError::SimulationFailed(reason.clone()),
        Some(violation) => WorkflowError::SimulationShapeMismatch(violation.to_string()),
        None => WorkflowError::SimulationFailed(err.to_string()),
    }
}
