use crossbeam_channel::TryRecvError;

use crate::task::AsyncTaskHandle;

pub mod dashboard;

/// Container of one or more tasks
pub trait Service {
    type Update;

    /// Responses that arrived since the last call. Finished tasks are dropped.
    fn updates(&mut self) -> Vec<Self::Update>;
}

/// Collects finished responses, keeping only the handles still running
fn drain<R>(handles: &mut Vec<AsyncTaskHandle<R>>) -> Vec<R> {
    let mut responses = vec![];

    handles.retain(|handle| match handle.response().try_recv() {
        Ok(response) => {
            responses.push(response);
            false
        }
        Err(TryRecvError::Empty) => true,
        Err(TryRecvError::Disconnected) => false,
    });

    responses
}
