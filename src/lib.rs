//! Pacer — the task-scheduling and concurrent-execution core of a
//! load-generation harness.
//!
//! Pacer decides *when* and *how many* tasks to emit, fans them out across a
//! bounded pool of concurrent workers, and reports per-invocation timing,
//! failures, and live occupancy over independent channels, so the scheduler
//! itself never blocks on a consumer.
//!
//! # Architecture
//!
//! The building blocks, leaves first:
//!
//! - A *task* is a deferred, zero-argument unit of work; a *fallible
//!   operation* is the same thing returning a `Result` with a [`TaskError`].
//! - [`Worker`]: times an operation registered under a symbolic experiment
//!   name; [`LocalWorker`] is the map-backed in-process implementation.
//! - Instrumentation wrappers: [`timed`] and [`timed_with_worker`] turn a
//!   fallible operation into a task that reports its elapsed time or its
//!   failure; [`counted`] brackets a task with `+1`/`-1` occupancy deltas.
//! - Schedules: [`repeat`] emits a task a fixed number of times, [`once`] is
//!   the run-once case, and [`Periodic`] emits on a cadence until a stop
//!   bound or cancellation.
//! - Dispatch: [`execute`] consumes a schedule sequentially; [`WorkerPool`]
//!   drains it with a fixed number of concurrent workers.
//!
//! Tasks flow schedule → handoff channel → dispatcher, and instrumentation
//! writes leave through side channels the moment they happen, decoupled from
//! the completion signal. A schedule, once closed, never emits again;
//! consumers terminate by observing close.
//!
//! Statistics over the duration/error streams, the per-iteration parameter
//! context, and the workloads themselves are collaborators on the other side
//! of those channels — this crate only runs what it is given, on time.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pacer::{counted, repeat, timed_with_worker, LocalWorker, WorkerPool};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let worker = Arc::new(LocalWorker::new().with_experiment("noop", || async { Ok(()) }));
//!
//!     let (durations, mut duration_rx) = mpsc::channel(64);
//!     let (errors, _error_rx) = mpsc::channel(64);
//!     let (count, mut count_rx) = mpsc::channel(64);
//!
//!     let task = counted(count, timed_with_worker(durations, errors, worker, "noop"));
//!
//!     // Collaborator side: drain the streams while the run is under way.
//!     let stats = tokio::spawn(async move {
//!         let mut timed = 0;
//!         while duration_rx.recv().await.is_some() {
//!             timed += 1;
//!         }
//!         timed
//!     });
//!
//!     WorkerPool::builder().workers(4).build().run(repeat(10, task)).await;
//!
//!     while count_rx.recv().await.is_some() {}
//!     assert_eq!(stats.await.unwrap(), 10);
//! }
//! ```
//!
//! # Where to start
//!
//! - Read the docs for [`Periodic`], [`WorkerPool`], and the wrappers in
//!   [`instrument`]. The demos under `demos/` show a full batch run and a
//!   cancellable periodic run.

/// Sequential and pooled task execution
pub mod dispatch;
/// Task decorators that report timing, failures, and occupancy
pub mod instrument;
/// Count-gated and time-gated task producers
pub mod schedule;
/// Type vocabulary for units of work
pub mod task;
/// Named-experiment timing
pub mod worker;

pub use dispatch::{execute, WorkerPool};
pub use instrument::{counted, timed, timed_with_worker};
pub use schedule::{once, repeat, Periodic};
pub use task::{Operation, TaskError};
pub use worker::{time, LocalWorker, Worker, WorkerError};
