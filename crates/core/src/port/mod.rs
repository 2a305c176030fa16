// Port Layer - Interfaces for pluggable behavior

pub mod item_handler;

// Re-exports
pub use item_handler::ItemHandler;
