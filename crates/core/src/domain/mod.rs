// Domain Layer - The queue primitive and its configuration

pub mod config;
pub mod constants;
pub mod queue;

// Re-exports
pub use config::QueueConfig;
pub use queue::{ConcurrentQueue, QueueStats};
