//! Instrumentation wrappers.
//!
//! Wrappers decorate a task with side-channel reporting: elapsed duration or
//! failure for [`timed`] and [`timed_with_worker`], live occupancy for
//! [`counted`]. Each signal leaves through its own channel, so downstream
//! consumers never sit between the scheduler and its workers.
//!
//! Sends block while the receiving side is full — a stalled consumer
//! throttles whichever dispatcher runs the task. A dropped receiver is
//! ignored, so a departed observer never stops the run.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::mpsc;

use crate::task::TaskError;
use crate::worker::{LocalWorker, Worker};

/// Wrap `worker`'s experiment `experiment` into a task that reports elapsed
/// time on `out` or the failure on `err_out`.
///
/// Exactly one of the two channels receives a value per invocation, never
/// both and never neither.
pub fn timed_with_worker<W>(
    out: mpsc::Sender<Duration>,
    err_out: mpsc::Sender<TaskError>,
    worker: Arc<W>,
    experiment: impl Into<String>,
) -> impl Fn() -> BoxFuture<'static, ()> + Send + Sync + Clone + 'static
where
    W: Worker + 'static,
{
    let experiment = experiment.into();
    move || {
        let out = out.clone();
        let err_out = err_out.clone();
        let worker = Arc::clone(&worker);
        let experiment = experiment.clone();
        async move {
            match worker.time(&experiment).await {
                Ok(elapsed) => {
                    let _ = out.send(elapsed).await;
                }
                Err(err) => {
                    let _ = err_out.send(err).await;
                }
            }
        }
        .boxed()
    }
}

/// Wrap a plain fallible operation the way [`timed_with_worker`] wraps a
/// named experiment, by registering it under the literal name `"*"` on a
/// private single-entry [`LocalWorker`].
pub fn timed<F, Fut>(
    out: mpsc::Sender<Duration>,
    err_out: mpsc::Sender<TaskError>,
    operation: F,
) -> impl Fn() -> BoxFuture<'static, ()> + Send + Sync + Clone + 'static
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    let worker = Arc::new(LocalWorker::new().with_experiment("*", operation));
    timed_with_worker(out, err_out, worker, "*")
}

/// Wrap `task` to report occupancy: `+1` on `count` before the inner task
/// runs, `-1` after it returns. Summing the stream gives the live in-flight
/// count without asking the dispatcher.
///
/// The trailing `-1` is only sent on a normal return; a task that panics
/// unwinds past it and leaves the count unbalanced.
pub fn counted<F, Fut>(
    count: mpsc::Sender<isize>,
    task: F,
) -> impl Fn() -> BoxFuture<'static, ()> + Send + Sync + Clone + 'static
where
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    move || {
        let count = count.clone();
        let task = task.clone();
        async move {
            let _ = count.send(1).await;
            task().await;
            let _ = count.send(-1).await;
        }
        .boxed()
    }
}
