use api::model::RequestContext;
use api::PortfolioBackend;

use super::*;
use crate::workflow::{self, UploadOutcome, UploadRequest};

/// Uploads the file, then fetches metrics and value over time for it
pub struct Upload {
    backend: Arc<dyn PortfolioBackend>,
    ctx: RequestContext,
    request: UploadRequest,
}

impl Upload {
    pub fn new(
        backend: Arc<dyn PortfolioBackend>,
        ctx: RequestContext,
        request: UploadRequest,
    ) -> Upload {
        Upload {
            backend,
            ctx,
            request,
        }
    }
}

impl AsyncTask for Upload {
    type Input = (Arc<dyn PortfolioBackend>, RequestContext, UploadRequest);
    type Response = UploadOutcome;

    fn input(&self) -> Self::Input {
        (self.backend.clone(), self.ctx.clone(), self.request.clone())
    }

    fn task<'a>(input: Arc<Self::Input>) -> BoxFuture<'a, Self::Response> {
        Box::pin(async move {
            let (backend, ctx, request) = input.as_ref();

            workflow::run_upload(backend.as_ref(), ctx, request).await
        })
    }
}
