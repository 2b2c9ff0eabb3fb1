//! Lazy task producers.
//!
//! A schedule is a producer task feeding a handoff channel. The channel
//! closing is the completion signal, so consumers terminate by observing
//! close rather than by poison values, and a closed schedule never emits
//! again. [`repeat`] is count-gated, [`Periodic`] is time-gated, and
//! [`once`] is the canonical run-once case.

use std::future::Future;

use futures::future;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use typed_builder::TypedBuilder;

/// Emit `task` exactly `n` times, then close. `n == 0` yields an
/// immediately-closed empty sequence.
///
/// The producer runs on its own task so a large `n` interleaves with
/// consumption; the channel holds a single element, making each send a
/// rendezvous-like handoff to whichever consumer is free.
pub fn repeat<F, Fut>(n: usize, task: F) -> mpsc::Receiver<F>
where
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = ()> + Send,
{
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        for _ in 0..n {
            if tx.send(task.clone()).await.is_err() {
                tracing::debug!("receiver went away, stopping early");
                return;
            }
        }
        tracing::debug!(count = n, "finite schedule drained");
    });
    rx
}

/// Emit `task` once, then close.
pub fn once<F, Fut>(task: F) -> mpsc::Receiver<F>
where
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = ()> + Send,
{
    repeat(1, task)
}

/// Time-gated schedule: one task per `period`, starting a full period after
/// schedule start, until the stop bound elapses or cancellation arrives.
#[derive(Debug, Clone, TypedBuilder)]
pub struct Periodic {
    /// Cadence between emissions.
    pub period: Duration,
    /// Total runtime measured from schedule start. Unset (or the degenerate
    /// zero duration) means the schedule runs until cancelled.
    #[builder(default, setter(strip_option))]
    pub stop_after: Option<Duration>,
    /// Handoff channel capacity.
    #[builder(default = 1)]
    pub capacity: usize,
}

impl Periodic {
    /// Spawn the producer and return the task sequence.
    ///
    /// Each cycle waits for the first of three events: a ticker tick emits
    /// one task, the stop deadline closes the sequence, a `true` on `cancel`
    /// closes the sequence. Cancellation is cooperative — tasks already
    /// handed to a consumer are unaffected. Dropping the cancel sender is
    /// not a cancellation; that arm simply never fires, like an unset stop
    /// bound.
    pub fn schedule<F, Fut>(self, task: F, mut cancel: watch::Receiver<bool>) -> mpsc::Receiver<F>
    where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (tx, rx) = mpsc::channel(self.capacity);
        tokio::spawn(async move {
            let start = Instant::now();
            let mut ticker = time::interval_at(start + self.period, self.period);
            // A consumer that lags a full period costs the schedule that
            // tick, same as a ticker whose handoff slot is still occupied.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            // Unset bound: a wait that never resolves, not a zero timer.
            let deadline = async {
                match self.stop_after.filter(|stop| !stop.is_zero()) {
                    Some(stop) => time::sleep_until(start + stop).await,
                    None => future::pending().await,
                }
            };
            tokio::pin!(deadline);

            let cancelled = async move {
                // wait_for errs once the sender is gone; a dropped sender can
                // never cancel, so park instead of closing the schedule.
                if cancel.wait_for(|cancelled| *cancelled).await.is_err() {
                    future::pending::<()>().await;
                }
            };
            tokio::pin!(cancelled);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if tx.send(task.clone()).await.is_err() {
                            tracing::debug!("receiver went away, stopping early");
                            return;
                        }
                    }
                    _ = &mut deadline => {
                        tracing::debug!("stop bound reached");
                        return;
                    }
                    _ = &mut cancelled => {
                        tracing::debug!("cancelled");
                        return;
                    }
                }
            }
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn drain<F, Fut>(mut rx: mpsc::Receiver<F>) -> usize
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut received = 0;
        while let Some(task) = rx.recv().await {
            task().await;
            received += 1;
        }
        received
    }

    #[tokio::test]
    async fn repeat_zero_closes_without_emitting() {
        let rx = repeat(0, || async {});
        assert_eq!(drain(rx).await, 0);
    }

    #[tokio::test]
    async fn repeat_emits_exactly_n() {
        let rx = repeat(100, || async {});
        assert_eq!(drain(rx).await, 100);
    }

    #[tokio::test]
    async fn once_emits_a_single_task() {
        let rx = once(|| async {});
        assert_eq!(drain(rx).await, 1);
    }

    #[tokio::test]
    async fn periodic_closes_at_the_stop_bound() {
        let (_cancel_tx, cancel) = watch::channel(false);
        let rx = Periodic::builder()
            .period(Duration::from_millis(50))
            .stop_after(Duration::from_millis(175))
            .build()
            .schedule(|| async {}, cancel);

        // Ticks at 50/100/150ms, stop at 175ms.
        assert_eq!(drain(rx).await, 3);
    }

    #[tokio::test]
    async fn periodic_without_stop_runs_until_cancelled() {
        let (cancel_tx, cancel) = watch::channel(false);
        let rx = Periodic::builder()
            .period(Duration::from_millis(50))
            .build()
            .schedule(|| async {}, cancel);

        tokio::spawn(async move {
            time::sleep(Duration::from_millis(125)).await;
            let _ = cancel_tx.send(true);
        });

        // Ticks at 50/100ms, cancel at 125ms; nothing for the partial period.
        assert_eq!(drain(rx).await, 2);
    }

    #[tokio::test]
    async fn zero_stop_bound_means_unbounded() {
        let (cancel_tx, cancel) = watch::channel(false);
        let rx = Periodic::builder()
            .period(Duration::from_millis(50))
            .stop_after(Duration::ZERO)
            .build()
            .schedule(|| async {}, cancel);

        tokio::spawn(async move {
            time::sleep(Duration::from_millis(175)).await;
            let _ = cancel_tx.send(true);
        });

        // A zero bound closes nothing; only the cancel at 175ms does.
        assert_eq!(drain(rx).await, 3);
    }

    #[tokio::test]
    async fn dropped_cancel_sender_is_not_a_cancellation() {
        let (cancel_tx, cancel) = watch::channel(false);
        drop(cancel_tx);
        let rx = Periodic::builder()
            .period(Duration::from_millis(50))
            .stop_after(Duration::from_millis(175))
            .build()
            .schedule(|| async {}, cancel);

        // Still emits on cadence and closes at the stop bound.
        assert_eq!(drain(rx).await, 3);
    }
}
