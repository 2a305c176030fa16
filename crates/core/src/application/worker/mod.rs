// Worker - Queue consumption loop

pub mod constants;
mod panic_guard;

use constants::*;
pub use panic_guard::{execute_guarded, PanicGuardResult};

use crate::domain::ConcurrentQueue;
use crate::error::Result;
use crate::port::ItemHandler;
use std::ops::AddAssign;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome counters for one worker run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub processed: u64,
    pub failed: u64,
    pub panicked: u64,
}

impl WorkerStats {
    /// Items taken off the queue, whatever the outcome
    pub fn total(&self) -> u64 {
        self.processed + self.failed + self.panicked
    }
}

impl AddAssign for WorkerStats {
    fn add_assign(&mut self, other: Self) {
        self.processed += other.processed;
        self.failed += other.failed;
        self.panicked += other.panicked;
    }
}

/// Worker drains a queue, handing each item to an `ItemHandler`
///
/// Runs until the queue is stopped. Handler errors and panics are counted
/// and logged; they never end the loop.
pub struct Worker<T> {
    name: String,
    queue: Arc<ConcurrentQueue<T>>,
    handler: Arc<dyn ItemHandler<T>>,
    idle_timeout: Duration,
}

impl<T: Send + 'static> Worker<T> {
    /// Create a new worker
    ///
    /// # Arguments
    /// * `name` - Used in logs and as the thread name suffix
    /// * `queue` - Queue to consume from
    /// * `handler` - Called once per popped item
    pub fn new(
        name: impl Into<String>,
        queue: Arc<ConcurrentQueue<T>>,
        handler: Arc<dyn ItemHandler<T>>,
    ) -> Self {
        Self {
            name: name.into(),
            queue,
            handler,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Override how long the worker waits before logging an idle tick
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the worker loop on the calling thread until the queue stops
    pub fn run(&self) -> WorkerStats {
        info!(worker = %self.name, "Worker started");
        let mut stats = WorkerStats::default();

        loop {
            match self.queue.pop_timed(self.idle_timeout) {
                Some(item) => self.process_item(item, &mut stats),
                // pop_timed reports stop and timeout the same way
                None if !self.queue.running() => break,
                None => {
                    debug!(worker = %self.name, "Worker idle");
                }
            }
        }

        info!(
            worker = %self.name,
            processed = stats.processed,
            failed = stats.failed,
            panicked = stats.panicked,
            "Worker stopped"
        );
        stats
    }

    /// Run the worker loop on a dedicated, named OS thread
    ///
    /// # Errors
    /// `QueueError::Io` if the thread cannot be spawned.
    pub fn spawn(self) -> Result<JoinHandle<WorkerStats>> {
        let handle = thread::Builder::new()
            .name(format!("{}-{}", WORKER_THREAD_PREFIX, self.name))
            .spawn(move || self.run())?;
        Ok(handle)
    }

    fn process_item(&self, item: T, stats: &mut WorkerStats) {
        let handler = Arc::clone(&self.handler);
        match execute_guarded(AssertUnwindSafe(move || handler.handle(item))) {
            PanicGuardResult::Completed(Ok(())) => stats.processed += 1,
            PanicGuardResult::Completed(Err(e)) => {
                warn!(worker = %self.name, error = %e, "Item handler failed");
                stats.failed += 1;
            }
            PanicGuardResult::Panicked(_) => stats.panicked += 1,
        }
    }
}
