//! Emit one simulated deployment per second until the stop bound elapses or
//! ctrl-c cancels the schedule.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

use pacer::{execute, timed, Periodic};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (cancel_tx, cancel) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let (durations, mut duration_rx) = mpsc::channel(16);
    let (errors, mut error_rx) = mpsc::channel(16);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(elapsed) = duration_rx.recv() => println!("iteration took {elapsed:?}"),
                Some(err) = error_rx.recv() => println!("iteration failed: {err}"),
                else => break,
            }
        }
    });

    let task = timed(durations, errors, || async {
        sleep(Duration::from_millis(40)).await;
        Ok(())
    });

    let schedule = Periodic::builder()
        .period(Duration::from_secs(1))
        .stop_after(Duration::from_secs(10))
        .build()
        .schedule(task, cancel);

    execute(schedule).await;
    println!("schedule closed, all iterations done");
}
