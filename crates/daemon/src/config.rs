//! Daemon configuration: CLI flags with `TETHER_*` environment fallbacks

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use std::time::Duration;
use tether_core::QueueConfig;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Development: human-readable, colored
    Pretty,
    /// Production: one JSON object per line
    Json,
}

/// Producer/consumer demo driving a single shared queue
#[derive(Debug, Clone, Parser)]
#[command(name = "tether", version, about)]
pub struct DaemonConfig {
    /// Number of producer threads
    #[arg(long, env = "TETHER_PRODUCERS", default_value_t = 2)]
    pub producers: usize,

    /// Number of worker (consumer) threads
    #[arg(long, env = "TETHER_WORKERS", default_value_t = 2)]
    pub workers: usize,

    /// Queue capacity; 0 means unbounded
    #[arg(long, env = "TETHER_CAPACITY", default_value_t = 0)]
    pub capacity: usize,

    /// Blocked-pop re-check interval
    #[arg(long, env = "TETHER_POLL_INTERVAL_MS", default_value_t = 100)]
    pub poll_interval_ms: u64,

    /// Base delay between two pushes of one producer (jitter is added)
    #[arg(long, env = "TETHER_PRODUCE_INTERVAL_MS", default_value_t = 50)]
    pub produce_interval_ms: u64,

    /// Simulated handling time per item
    #[arg(long, env = "TETHER_WORK_MS", default_value_t = 20)]
    pub work_ms: u64,

    /// Every Nth item of a producer is pushed to the front; 0 disables
    #[arg(long, env = "TETHER_URGENT_EVERY", default_value_t = 0)]
    pub urgent_every: u64,

    /// Stop after this many seconds; 0 runs until Ctrl+C
    #[arg(long, env = "TETHER_RUN_SECS", default_value_t = 0)]
    pub run_secs: u64,

    /// Log format
    #[arg(long, env = "TETHER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl DaemonConfig {
    /// Reject configurations that would leave the pipeline idle
    pub fn validate(&self) -> Result<()> {
        if self.producers == 0 {
            bail!("at least one producer is required");
        }
        if self.workers == 0 {
            bail!("at least one worker is required");
        }
        Ok(())
    }

    /// Queue configuration derived from the flags
    pub fn queue_config(&self) -> Result<QueueConfig> {
        let capacity = (self.capacity > 0).then_some(self.capacity);
        let config = QueueConfig::from_capacity(capacity)?
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))?;
        Ok(config)
    }

    pub fn run_for(&self) -> Option<Duration> {
        (self.run_secs > 0).then(|| Duration::from_secs(self.run_secs))
    }

    pub fn produce_interval(&self) -> Duration {
        Duration::from_millis(self.produce_interval_ms)
    }

    pub fn work_duration(&self) -> Duration {
        Duration::from_millis(self.work_ms)
    }
}
