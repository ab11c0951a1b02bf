use api::model::RequestContext;
use api::PortfolioBackend;

use super::*;
use crate::workflow::{self, EventsOutcome, EventsRequest};

pub struct MarketEvents {
    backend: Arc<dyn PortfolioBackend>,
    ctx: RequestContext,
    request: EventsRequest,
}

impl MarketEvents {
    pub fn new(
        backend: Arc<dyn PortfolioBackend>,
        ctx: RequestContext,
        request: EventsRequest,
    ) -> MarketEvents {
        MarketEvents {
            backend,
            ctx,
            request,
        }
    }
}

impl AsyncTask for MarketEvents {
    type Input = (Arc<dyn PortfolioBackend>, RequestContext, EventsRequest);
    type Response = EventsOutcome;

    fn input(&self) -> Self::Input {
        (self.backend.clone(), self.ctx.clone(), self.request.clone())
    }

    fn task<'a>(input: Arc<Self::Input>) -> BoxFuture<'a, Self::Response> {
        Box::pin(async move {
            let (backend, ctx, request) = input.as_ref();

            workflow::run_market_events(backend.as_ref(), ctx, request).await
        })
    }
}
