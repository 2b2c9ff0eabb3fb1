//! Named-experiment timing.
//!
//! A [`Worker`] times operations identified by symbolic names rather than
//! closures held directly, the seam to use when several named experiments
//! share one execution context. [`LocalWorker`] is the in-process
//! implementation backed by a plain registration map.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use thiserror::Error;
use tokio::time::Instant;

use crate::task::{Operation, TaskError};

/// Errors raised by the timing abstraction itself, as opposed to failures of
/// the operations it runs.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Nothing is registered under the requested experiment name.
    /// Registration is only checked at timing time, never eagerly.
    #[error("no operation registered for experiment `{0}`")]
    UnknownExperiment(String),
}

/// Times operations registered under symbolic experiment names.
#[async_trait]
pub trait Worker: Send + Sync {
    /// Run the operation registered under `experiment` once, returning how
    /// long it took or the error it failed with.
    async fn time(&self, experiment: &str) -> Result<Duration, TaskError>;
}

/// In-process [`Worker`] backed by a name → operation map.
#[derive(Default)]
pub struct LocalWorker {
    experiments: HashMap<String, Operation>,
}

impl LocalWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `op` under `name`, replacing any previous registration, and
    /// return `self` so registrations chain.
    pub fn with_experiment<F, Fut>(mut self, name: impl Into<String>, op: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.experiments
            .insert(name.into(), Arc::new(move || op().boxed()));
        self
    }
}

#[async_trait]
impl Worker for LocalWorker {
    async fn time(&self, experiment: &str) -> Result<Duration, TaskError> {
        let op = self
            .experiments
            .get(experiment)
            .ok_or_else(|| WorkerError::UnknownExperiment(experiment.into()))?;
        time(op.as_ref()).await
    }
}

/// Measure one invocation of `op`.
pub async fn time<F, Fut>(op: F) -> Result<Duration, TaskError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<(), TaskError>>,
{
    let start = Instant::now();
    op().await?;
    Ok(start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn times_a_registered_operation() {
        let worker = LocalWorker::new().with_experiment("sleepy", || async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(())
        });

        let elapsed = worker.time("sleepy").await.unwrap();
        assert!(elapsed >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn unknown_experiment_is_an_error() {
        let worker = LocalWorker::new();

        let err = worker.time("ghost").await.unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[tokio::test]
    async fn experiments_time_independently() {
        let ok_runs = Arc::new(AtomicUsize::new(0));
        let broken_runs = Arc::new(AtomicUsize::new(0));
        let ok = ok_runs.clone();
        let broken = broken_runs.clone();

        let worker = LocalWorker::new()
            .with_experiment("ok", move || {
                let ok = ok.clone();
                async move {
                    ok.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .with_experiment("broken", move || {
                let broken = broken.clone();
                async move {
                    broken.fetch_add(1, Ordering::SeqCst);
                    Err("boom".into())
                }
            });

        assert!(worker.time("broken").await.is_err());
        assert!(worker.time("ok").await.is_ok());
        assert_eq!(ok_runs.load(Ordering::SeqCst), 1);
        assert_eq!(broken_runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_operations_surface_their_error() {
        let err = time(|| async { Err::<(), TaskError>("deploy rejected".into()) })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "deploy rejected");
    }

    #[tokio::test]
    async fn re_registration_replaces_the_operation() {
        let worker = LocalWorker::new()
            .with_experiment("job", || async { Err("first".into()) })
            .with_experiment("job", || async { Ok(()) });

        assert!(worker.time("job").await.is_ok());
    }
}
