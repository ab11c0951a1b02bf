//! Scripted backend and fixtures shared by the workflow and service tests

use std::sync::Mutex;

use api::model::{
    DcaParams, DcaSeries, Holdings, MarketEvent, Metrics, MonthKey, OptimizationResult,
    PortfolioId, RequestContext, TargetReturn, TimeSeries,
};
use api::{ApiError, ContractViolation, PortfolioBackend, UploadFile};
use async_trait::async_trait;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload(String),
    Metrics(PortfolioId),
    ValueOverTime(PortfolioId),
    Optimize(PortfolioId, f64),
    Simulate(PortfolioId, DcaParams),
    Events(NaiveDate, NaiveDate),
}

/// `None` answers with a 500
#[derive(Default)]
pub struct MockBackend {
    pub calls: Mutex<Vec<Call>>,
    pub portfolio_id: Option<i64>,
    pub metrics: Option<Metrics>,
    pub time_series: Option<TimeSeries>,
    pub optimization: Option<Result<OptimizationResult, ContractViolation>>,
    pub simulation: Option<Result<DcaSeries, ContractViolation>>,
    pub events: Option<Vec<MarketEvent>>,
}

impl MockBackend {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn server_error(context: &'static str) -> ApiError {
    ApiError::Status {
        context,
        status: 500,
        status_text: "Internal Server Error".into(),
    }
}

#[async_trait]
impl PortfolioBackend for MockBackend {
    async fn upload_portfolio(
        &self,
        _ctx: &RequestContext,
        file: &UploadFile,
    ) -> Result<PortfolioId, ApiError> {
        self.record(Call::Upload(file.file_name().to_string()));
        self.portfolio_id
            .map(PortfolioId)
            .ok_or_else(|| server_error("upload"))
    }

    async fn get_metrics(
        &self,
        _ctx: &RequestContext,
        portfolio_id: PortfolioId,
    ) -> Result<Metrics, ApiError> {
        self.record(Call::Metrics(portfolio_id));
        self.metrics
            .clone()
            .ok_or_else(|| server_error("metrics fetch"))
    }

    async fn get_value_over_time(
        &self,
        _ctx: &RequestContext,
        portfolio_id: PortfolioId,
    ) -> Result<TimeSeries, ApiError> {
        self.record(Call::ValueOverTime(portfolio_id));
        self.time_series
            .clone()
            .ok_or_else(|| server_error("value over time fetch"))
    }

    async fn get_optimization(
        &self,
        _ctx: &RequestContext,
        portfolio_id: PortfolioId,
        target_return: TargetReturn,
    ) -> Result<OptimizationResult, ApiError> {
        self.record(Call::Optimize(portfolio_id, target_return.fraction()));
        match self.optimization.clone() {
            Some(result) => result.map_err(ApiError::from),
            None => Err(server_error("optimization")),
        }
    }

    async fn get_dca_simulation(
        &self,
        _ctx: &RequestContext,
        portfolio_id: PortfolioId,
        params: &DcaParams,
    ) -> Result<DcaSeries, ApiError> {
        self.record(Call::Simulate(portfolio_id, *params));
        match self.simulation.clone() {
            Some(result) => result.map_err(ApiError::from),
            None => Err(server_error("dca simulation")),
        }
    }

    async fn get_market_events(
        &self,
        _ctx: &RequestContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MarketEvent>, ApiError> {
        self.record(Call::Events(start, end));
        self.events
            .clone()
            .ok_or_else(|| server_error("market events fetch"))
    }
}

pub fn ctx() -> RequestContext {
    RequestContext::new("user-1")
}

pub fn csv_file() -> UploadFile {
    UploadFile::new(
        "trades.csv",
        b"date,ticker,action,shares,price,amount,notes\n\
          2023-01-03,AAPL,buy,3,125.07,375.21,\n"
            .to_vec(),
    )
}

pub fn metrics(current_value: f64) -> Metrics {
    Metrics {
        total_invested: 1000.0,
        current_value,
        profit: current_value - 1000.0,
        cagr: 12.5,
        net_shares: vec![("AAPL", 3.0), ("MSFT", 2.0)].into_iter().collect(),
        max_drawdown: None,
        sharpe_ratio: None,
    }
}

/// Monthly values starting January 2023
pub fn series(values: &[f64]) -> TimeSeries {
    TimeSeries::new(
        values
            .iter()
            .enumerate()
            .filter_map(|(idx, v)| Some((MonthKey::new(2023, idx as u32 + 1)?, *v)))
            .collect(),
    )
}

pub fn optimization(cagr: f64) -> OptimizationResult {
    let net_shares: Holdings = vec![("MSFT", 4.0), ("AAPL", 1.0)].into_iter().collect();

    OptimizationResult {
        total_invested: 1000.0,
        current_value: 1400.0,
        profit: 400.0,
        cagr,
        net_shares,
        allocation: Some(vec![("MSFT", 0.8), ("AAPL", 0.2)].into_iter().collect()),
        expected_return: Some(0.3),
        expected_volatility: None,
        sharpe_ratio: None,
        max_drawdown: None,
    }
}

pub fn simulation(last_optimized: f64) -> DcaSeries {
    DcaSeries::new(
        vec![MonthKey::new(2025, 5).unwrap(), MonthKey::new(2025, 6).unwrap()],
        vec![1000.0, 1500.0],
        vec![1000.0, last_optimized],
    )
    .unwrap()
}

/// Answers every call successfully for `portfolio_id`
pub fn backend(portfolio_id: i64) -> MockBackend {
    MockBackend {
        portfolio_id: Some(portfolio_id),
        metrics: Some(metrics(1200.0)),
        time_series: Some(series(&[1500.0, 2000.0])),
        optimization: Some(Ok(optimization(31.0))),
        simulation: Some(Ok(simulation(1700.0))),
        events: Some(vec![]),
        ..Default::default()
    }
}
