use api::model::RequestContext;
use api::PortfolioBackend;

use super::*;
use crate::workflow::{self, OptimizeOutcome, OptimizeRequest};

/// Optimizes the portfolio, then runs the DCA simulation at the same target
pub struct Optimize {
    backend: Arc<dyn PortfolioBackend>,
    ctx: RequestContext,
    request: OptimizeRequest,
}

impl Optimize {
    pub fn new(
        backend: Arc<dyn PortfolioBackend>,
        ctx: RequestContext,
        request: OptimizeRequest,
    ) -> Optimize {
        Optimize {
            backend,
            ctx,
            request,
        }
    }
}

impl AsyncTask for Optimize {
    type Input = (Arc<dyn PortfolioBackend>, RequestContext, OptimizeRequest);
    type Response = OptimizeOutcome;

    fn input(&self) -> Self::Input {
        (self.backend.clone(), self.ctx.clone(), self.request.clone())
    }

    fn task<'a>(input: Arc<Self::Input>) -> BoxFuture<'a, Self::Response> {
        Box::pin(async move {
            let (backend, ctx, request) = input.as_ref();

            workflow::run_optimize(backend.as_ref(), ctx, request).await
        })
    }
}
