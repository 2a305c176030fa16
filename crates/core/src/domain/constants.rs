// Queue constants
use std::time::Duration;

/// How long a blocked pop sleeps before re-checking stop / deadline (100ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
