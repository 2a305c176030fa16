//! Synthetic producers feeding the shared queue

use rand::Rng;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tether_core::ConcurrentQueue;
use tracing::{debug, info};

/// Unit of work moved from producers to workers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub producer: usize,
    pub seq: u64,
    /// Inserted with `push_front`
    pub urgent: bool,
}

/// Pushes sequential items until the queue stops accepting them
pub struct Producer {
    id: usize,
    queue: Arc<ConcurrentQueue<WorkItem>>,
    interval: Duration,
    urgent_every: u64,
}

impl Producer {
    pub fn new(
        id: usize,
        queue: Arc<ConcurrentQueue<WorkItem>>,
        interval: Duration,
        urgent_every: u64,
    ) -> Self {
        Self {
            id,
            queue,
            interval,
            urgent_every,
        }
    }

    fn is_urgent(&self, seq: u64) -> bool {
        self.urgent_every > 0 && (seq + 1) % self.urgent_every == 0
    }

    /// Produce until a push is refused; returns the number of accepted items
    pub fn run(&self) -> u64 {
        let mut rng = rand::thread_rng();
        let max_jitter_ms = (self.interval.as_millis() as u64) / 2;
        let mut seq = 0;

        loop {
            let item = WorkItem {
                producer: self.id,
                seq,
                urgent: self.is_urgent(seq),
            };
            let accepted = if item.urgent {
                debug!(producer = self.id, seq, "Pushing urgent item to front");
                self.queue.push_front(item)
            } else {
                self.queue.push(item)
            };
            if !accepted {
                break;
            }
            seq += 1;

            let jitter = Duration::from_millis(rng.gen_range(0..=max_jitter_ms));
            thread::sleep(self.interval + jitter);
        }

        info!(producer = self.id, produced = seq, "Producer finished");
        seq
    }

    pub fn spawn(self) -> io::Result<JoinHandle<u64>> {
        thread::Builder::new()
            .name(format!("tether-producer-{}", self.id))
            .spawn(move || self.run())
    }
}
