use async_std::sync::Arc;
use async_std::task;
use crossbeam_channel::{bounded, Receiver, Sender};
use futures::future::BoxFuture;

pub use self::market_events::MarketEvents;
pub use self::optimize::Optimize;
pub use self::upload::Upload;

mod market_events;
mod optimize;
mod upload;

/// Trait to define a type that spawns an Async Task to complete one piece of
/// background work.
pub trait AsyncTask: 'static {
    type Input: Send + Sync;
    type Response: Send;

    /// Input data needed for the `task`
    fn input(&self) -> Self::Input;

    /// Defines the async task that will get executed and return `Response`
    fn task<'a>(input: Arc<Self::Input>) -> BoxFuture<'a, Self::Response>;

    /// Runs the task on the async runtime and returns a handle to receive its
    /// response. `data_received` is pinged once the response is sent so the
    /// UI can redraw.
    ///
    /// The task always runs to completion, dropping the handle only discards
    /// the response.
    fn connect(&self, data_received: Sender<()>) -> AsyncTaskHandle<Self::Response> {
        let (response_sender, response_receiver) = bounded::<Self::Response>(1);

        let input = Arc::new(self.input());

        task::spawn(async move {
            let response = <Self as AsyncTask>::task(input).await;

            let _ = response_sender.send(response);
            let _ = data_received.try_send(());
        });

        AsyncTaskHandle {
            response: response_receiver,
        }
    }
}

pub struct AsyncTaskHandle<R> {
    response: Receiver<R>,
}

impl<R> AsyncTaskHandle<R> {
    pub fn response(&self) -> &Receiver<R> {
        &self.response
    }
}
