// Tether Core - Blocking Queue, Ports & Workers
// NO runtime dependencies: plain threads + parking_lot

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::worker::{Worker, WorkerStats};
pub use domain::{ConcurrentQueue, QueueConfig, QueueStats};
pub use error::{QueueError, Result};
pub use port::ItemHandler;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
