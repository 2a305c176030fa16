// Application Layer - Consumers built on the queue

pub mod worker;

// Re-exports
pub use worker::{execute_guarded, PanicGuardResult, Worker, WorkerStats};
