use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use talk_core::error::{Result, TalkError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Handle to a spawned delegated call. Resolves exactly once.
///
/// Dropping the handle detaches the call; it still runs to completion.
/// Created outside a tokio runtime, the call never starts and the task
/// settles with `TalkError::Other` instead.
pub struct SessionTask<T> {
    inner: Inner<T>,
}

enum Inner<T> {
    Running { join: JoinHandle<Result<T>>, runtime: Handle },
    Unscheduled(Option<TalkError>),
}

impl<T: Send + 'static> SessionTask<T> {
    pub(crate) fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let inner = match Handle::try_current() {
            Ok(runtime) => Inner::Running {
                join: runtime.spawn(future),
                runtime,
            },
            Err(e) => {
                tracing::warn!(error = %e, "delegated call issued outside a tokio runtime");
                Inner::Unscheduled(Some(TalkError::Other(anyhow::anyhow!(
                    "no tokio runtime to run the delegated call: {e}"
                ))))
            }
        };
        Self { inner }
    }

    /// Deliver the outcome to `continuation` once the call settles.
    ///
    /// An unscheduled task invokes `continuation` immediately on the
    /// calling thread.
    pub fn on_complete<F>(mut self, continuation: F)
    where
        F: FnOnce(Result<T>) + Send + 'static,
    {
        let runtime = match &mut self.inner {
            Inner::Running { runtime, .. } => runtime.clone(),
            Inner::Unscheduled(error) => return continuation(Err(take_error(error))),
        };
        runtime.spawn(async move {
            continuation(self.await);
        });
    }

    pub fn is_finished(&self) -> bool {
        match &self.inner {
            Inner::Running { join, .. } => join.is_finished(),
            Inner::Unscheduled(_) => true,
        }
    }
}

fn take_error(slot: &mut Option<TalkError>) -> TalkError {
    slot.take()
        .unwrap_or_else(|| TalkError::Other(anyhow::anyhow!("delegated call already settled")))
}

impl<T> Future for SessionTask<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().inner {
            Inner::Running { join, .. } => Pin::new(join).poll(cx).map(|joined| match joined {
                Ok(outcome) => outcome,
                Err(e) => Err(TalkError::Other(anyhow::anyhow!("delegated call did not complete: {e}"))),
            }),
            Inner::Unscheduled(error) => Poll::Ready(Err(take_error(error))),
        }
    }
}
