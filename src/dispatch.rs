//! Task execution over a schedule's channel.
//!
//! [`execute`] consumes a sequence on the caller's task; [`WorkerPool`] fans
//! the same sequence out across a fixed number of spawned workers. Both
//! return once the sequence closes and every received task has finished.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{mpsc, Mutex};
use typed_builder::TypedBuilder;

/// Run each task to completion, in order, on the current task. Returns when
/// the sequence closes.
pub async fn execute<F, Fut>(mut tasks: mpsc::Receiver<F>)
where
    F: Fn() -> Fut,
    Fut: Future<Output = ()>,
{
    while let Some(task) = tasks.recv().await {
        task().await;
    }
}

/// Fixed-size pool of workers draining one shared task sequence.
///
/// No bound is placed on how long an individual task may run; the only
/// blocking point exposed to the caller is the final join.
#[derive(Debug, Clone, TypedBuilder)]
pub struct WorkerPool {
    /// Number of concurrent workers.
    #[builder(default = num_cpus::get())]
    pub workers: usize,
}

impl WorkerPool {
    /// Drain `tasks` across the pool.
    ///
    /// Each task is received by exactly one worker; the channel handoff is
    /// the only synchronization between them, so completion order across
    /// workers is unordered. Returns after every worker has observed the
    /// sequence close and finished its in-flight task. A panicking task
    /// aborts its worker; the panic is logged, not propagated.
    pub async fn run<F, Fut>(&self, tasks: mpsc::Receiver<F>)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let tasks = Arc::new(Mutex::new(tasks));
        tracing::debug!(workers = self.workers, "spawning workers");
        let handles: Vec<_> = (0..self.workers)
            .map(|worker| {
                let tasks = Arc::clone(&tasks);
                tokio::spawn(async move {
                    loop {
                        // Hold the lock for the handoff only, never while the
                        // task runs.
                        let task = tasks.lock().await.recv().await;
                        match task {
                            Some(task) => task().await,
                            None => break,
                        }
                    }
                    tracing::debug!(worker, "sequence closed, worker done");
                })
            })
            .collect();

        for joined in join_all(handles).await {
            if let Err(err) = joined {
                tracing::error!("worker panicked: {err}");
            }
        }
    }
}
