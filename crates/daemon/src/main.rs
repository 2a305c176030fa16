//! Tether - Main Entry Point
//! Producers and workers coordinated through one ConcurrentQueue

mod config;
mod logging;
mod producer;

use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tether_core::{ConcurrentQueue, ItemHandler, Worker, WorkerStats};
use tracing::{debug, info};

use config::DaemonConfig;
use producer::{Producer, WorkItem};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (flags + TETHER_* env)
    let config = DaemonConfig::parse();

    // 2. Initialize logging
    logging::init_logging(config.log_format)?;
    info!("Tether v{} starting...", VERSION);

    config.validate()?;
    let queue_config = config.queue_config()?;
    info!(
        producers = config.producers,
        workers = config.workers,
        capacity = ?queue_config.capacity,
        poll_interval_ms = config.poll_interval_ms,
        "Configuration loaded"
    );

    // 3. Shared queue
    let queue: Arc<ConcurrentQueue<WorkItem>> =
        Arc::new(ConcurrentQueue::with_config(queue_config));

    // 4. Start workers
    let work = config.work_duration();
    let handler: Arc<dyn ItemHandler<WorkItem>> = Arc::new(move |item: WorkItem| -> tether_core::Result<()> {
        thread::sleep(work);
        debug!(
            producer = item.producer,
            seq = item.seq,
            urgent = item.urgent,
            "Item handled"
        );
        Ok(())
    });

    let mut worker_handles = Vec::with_capacity(config.workers);
    for i in 0..config.workers {
        let worker = Worker::new(i.to_string(), Arc::clone(&queue), Arc::clone(&handler));
        worker_handles.push(worker.spawn()?);
    }

    // 5. Start producers
    let mut producer_handles = Vec::with_capacity(config.producers);
    for i in 0..config.producers {
        let producer = Producer::new(
            i,
            Arc::clone(&queue),
            config.produce_interval(),
            config.urgent_every,
        );
        producer_handles.push(producer.spawn()?);
    }

    info!("System ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal (or the configured run time)
    match config.run_for() {
        Some(run_for) => {
            tokio::select! {
                res = tokio::signal::ctrl_c() => {
                    res?;
                    info!("Shutdown signal received");
                }
                _ = tokio::time::sleep(run_for) => {
                    info!(run_secs = config.run_secs, "Run time elapsed");
                }
            }
        }
        None => {
            tokio::signal::ctrl_c().await?;
            info!("Shutdown signal received");
        }
    }

    // 7. Graceful shutdown: stop wakes every blocked worker
    let backlog = queue.size();
    queue.stop();
    info!(discarded = backlog, "Queue stopped, joining threads...");

    let produced = tokio::task::spawn_blocking(move || join_all(producer_handles, "producer"))
        .await??;
    let worker_stats = tokio::task::spawn_blocking(move || join_all(worker_handles, "worker"))
        .await??;

    let mut totals = WorkerStats::default();
    for stats in worker_stats {
        totals += stats;
    }
    let queue_stats = queue.stats();

    info!(
        produced = produced.iter().sum::<u64>(),
        pushed = queue_stats.pushed,
        popped = queue_stats.popped,
        evicted = queue_stats.evicted,
        discarded_on_stop = queue_stats.discarded_on_stop,
        processed = totals.processed,
        failed = totals.failed,
        panicked = totals.panicked,
        "Shutdown complete"
    );

    Ok(())
}

/// Join OS threads, surfacing a panicked thread as an error
fn join_all<T>(handles: Vec<JoinHandle<T>>, role: &str) -> Result<Vec<T>> {
    handles
        .into_iter()
        .map(|handle| {
            handle
                .join()
                .map_err(|_| anyhow!("{} thread panicked", role))
        })
        .collect()
}
