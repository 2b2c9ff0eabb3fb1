//! Push a fixed batch of simulated deployments through a worker pool and
//! summarize the timing, error, and occupancy streams the way a statistics
//! collaborator would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use pacer::{counted, repeat, timed, TaskError, WorkerPool};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Stand-in workload: a deployment that takes a variable amount of time
    // and rejects every ninth attempt.
    let iteration = Arc::new(AtomicUsize::new(0));
    let deploy = move || {
        let iteration = iteration.clone();
        async move {
            let n = iteration.fetch_add(1, Ordering::SeqCst);
            sleep(Duration::from_millis(25 + (n as u64 % 7) * 10)).await;
            if n % 9 == 8 {
                return Err(TaskError::from(format!("deploy {n} rejected")));
            }
            Ok(())
        }
    };

    let (durations, mut duration_rx) = mpsc::channel(64);
    let (errors, mut error_rx) = mpsc::channel(64);
    let (count, mut count_rx) = mpsc::channel(64);

    let occupancy = tokio::spawn(async move {
        let (mut live, mut peak) = (0isize, 0isize);
        while let Some(delta) = count_rx.recv().await {
            live += delta;
            peak = peak.max(live);
        }
        peak
    });
    let timings = tokio::spawn(async move {
        let (mut total, mut ok) = (Duration::ZERO, 0u32);
        while let Some(elapsed) = duration_rx.recv().await {
            total += elapsed;
            ok += 1;
        }
        (total, ok)
    });
    let failures = tokio::spawn(async move {
        let mut seen = 0u32;
        while let Some(err) = error_rx.recv().await {
            println!("failed: {err}");
            seen += 1;
        }
        seen
    });

    let task = counted(count, timed(durations, errors, deploy));
    WorkerPool::builder()
        .workers(4)
        .build()
        .run(repeat(30, task))
        .await;

    let peak = occupancy.await.unwrap();
    let (total, ok) = timings.await.unwrap();
    let failed = failures.await.unwrap();
    println!(
        "{ok} succeeded, {failed} failed, avg {:?}, peak concurrency {peak}",
        total / ok.max(1)
    );
}
