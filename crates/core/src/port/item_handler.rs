// Item Handler Port
// Abstraction for whatever a worker does with a popped element

use crate::error::Result;

/// Item handler trait
///
/// Implemented for any `Fn(T) -> Result<()> + Send + Sync`, so closures can
/// be passed directly to a worker.
pub trait ItemHandler<T>: Send + Sync {
    /// Process one item taken off the queue
    ///
    /// # Errors
    /// Any error is logged and counted by the worker; it does not stop it.
    fn handle(&self, item: T) -> Result<()>;
}

impl<T, F> ItemHandler<T> for F
where
    F: Fn(T) -> Result<()> + Send + Sync,
{
    fn handle(&self, item: T) -> Result<()> {
        self(item)
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::QueueError;
    use parking_lot::Mutex;

    /// Records every handled item; optionally rejects some of them
    pub struct RecordingHandler<T> {
        handled: Mutex<Vec<T>>,
        reject: Option<Box<dyn Fn(&T) -> bool + Send + Sync>>,
    }

    impl<T: Clone + Send> RecordingHandler<T> {
        pub fn new() -> Self {
            Self {
                handled: Mutex::new(Vec::new()),
                reject: None,
            }
        }

        /// Fail (after recording) every item matching `predicate`
        pub fn rejecting(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
            Self {
                handled: Mutex::new(Vec::new()),
                reject: Some(Box::new(predicate)),
            }
        }

        pub fn handled(&self) -> Vec<T> {
            self.handled.lock().clone()
        }
    }

    impl<T: Clone + Send> Default for RecordingHandler<T> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<T: Clone + Send> ItemHandler<T> for RecordingHandler<T> {
        fn handle(&self, item: T) -> Result<()> {
            let rejected = self.reject.as_ref().is_some_and(|reject| reject(&item));
            self.handled.lock().push(item);
            if rejected {
                return Err(QueueError::Handler("item rejected".to_string()));
            }
            Ok(())
        }
    }
}
