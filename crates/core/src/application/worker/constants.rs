// Worker constants
use std::time::Duration;

/// How long a worker waits for an item before logging an idle tick (1s)
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(1);

/// Thread name prefix for spawned workers
pub const WORKER_THREAD_PREFIX: &str = "tether-worker";
