use callbridge_core::error::CallError;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Settles with the host's answer to one call.
///
/// Dropping the future does not withdraw the call; use
/// [`Broker::cancel`](crate::Broker::cancel) for that.
#[must_use = "the call is sent regardless, but its outcome is lost unless awaited"]
pub struct CallFuture {
    id: Option<String>,
    outcome: oneshot::Receiver<Result<Value, CallError>>,
}

impl CallFuture {
    pub(crate) fn new(id: String, outcome: oneshot::Receiver<Result<Value, CallError>>) -> Self {
        Self {
            id: Some(id),
            outcome,
        }
    }

    /// A future that is already failed; nothing was registered or sent.
    pub(crate) fn rejected(error: CallError) -> Self {
        let (settle, outcome) = oneshot::channel();
        let _ = settle.send(Err(error));

        Self { id: None, outcome }
    }

    /// Correlation token of the call, `None` if it was rejected before dispatch.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Future for CallFuture {
    type Output = Result<Value, CallError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.outcome)
            .poll(cx)
            .map(|v| v.unwrap_or(Err(CallError::Destroyed)))
    }
}
