use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ApiError;
use crate::model::{
    DcaParams, DcaSeries, MarketEvent, Metrics, OptimizationResult, PortfolioId, RequestContext,
    TargetReturn, TimeSeries,
};
use crate::upload::UploadFile;

/// The portfolio service as seen by the dashboard. Every call is single
/// shot: no retries, no caching.
#[async_trait]
pub trait PortfolioBackend: Send + Sync {
    async fn upload_portfolio(
        &self,
        ctx: &RequestContext,
        file: &UploadFile,
    ) -> Result<PortfolioId, ApiError>;

    async fn get_metrics(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
    ) -> Result<Metrics, ApiError>;

    async fn get_value_over_time(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
    ) -> Result<TimeSeries, ApiError>;

    async fn get_optimization(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
        target_return: TargetReturn,
    ) -> Result<OptimizationResult, ApiError>;

    async fn get_dca_simulation(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
        params: &DcaParams,
    ) -> Result<DcaSeries, ApiError>;

    async fn get_market_events(
        &self,
        ctx: &RequestContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MarketEvent>, ApiError>;
}
