use api::model::RequestContext;
use api::PortfolioBackend;
use async_std::sync::Arc;
use crossbeam_channel::Sender;

use super::*;
use crate::task::{AsyncTask, MarketEvents, Optimize, Upload};
use crate::workflow::{
    EventsOutcome, EventsRequest, OptimizeOutcome, OptimizeRequest, UploadOutcome, UploadRequest,
};

/// Runs the dashboard's network sequences off the UI thread
pub struct DashboardService {
    backend: Arc<dyn PortfolioBackend>,
    ctx: RequestContext,
    data_received: Sender<()>,
    upload_handles: Vec<AsyncTaskHandle<UploadOutcome>>,
    optimize_handles: Vec<AsyncTaskHandle<OptimizeOutcome>>,
    market_events_handles: Vec<AsyncTaskHandle<EventsOutcome>>,
}

impl DashboardService {
    pub fn new(
        backend: Arc<dyn PortfolioBackend>,
        ctx: RequestContext,
        data_received: Sender<()>,
    ) -> DashboardService {
        DashboardService {
            backend,
            ctx,
            data_received,
            upload_handles: vec![],
            optimize_handles: vec![],
            market_events_handles: vec![],
        }
    }

    pub fn upload(&mut self, request: UploadRequest) {
        let task = Upload::new(self.backend.clone(), self.ctx.clone(), request);
        let handle = task.connect(self.data_received.clone());

        self.upload_handles.push(handle);
    }

    pub fn optimize(&mut self, request: OptimizeRequest) {
        let task = Optimize::new(self.backend.clone(), self.ctx.clone(), request);
        let handle = task.connect(self.data_received.clone());

        self.optimize_handles.push(handle);
    }

    pub fn market_events(&mut self, request: EventsRequest) {
        let task = MarketEvents::new(self.backend.clone(), self.ctx.clone(), request);
        let handle = task.connect(self.data_received.clone());

        self.market_events_handles.push(handle);
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.upload_handles.len() + self.optimize_handles.len() + self.market_events_handles.len()
    }
}

#[derive(Debug)]
pub enum Update {
    Uploaded(UploadOutcome),
    Optimized(OptimizeOutcome),
    MarketEvents(EventsOutcome),
}

impl Service for DashboardService {
    type Update = Update;

    fn updates(&mut self) -> Vec<Self::Update> {
        let mut updates = vec![];

        let upload_updates = drain(&mut self.upload_handles)
            .into_iter()
            .map(Update::Uploaded);
        updates.extend(upload_updates);

        let optimize_updates = drain(&mut self.optimize_handles)
            .into_iter()
            .map(Update::Optimized);
        updates.extend(optimize_updates);

        let market_events_updates = drain(&mut self.market_events_handles)
            .into_iter()
            .map(Update::MarketEvents);
        updates.extend(market_events_updates);

        updates
    }
}
