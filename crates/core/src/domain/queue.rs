// Concurrent Queue - thread-safe, optionally bounded, stoppable deque

use super::config::QueueConfig;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Counters accumulated over the lifetime of a queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Successful `push` / `push_front` calls
    pub pushed: u64,
    /// Elements handed to a consumer
    pub popped: u64,
    /// Elements dropped to make room under the capacity bound
    pub evicted: u64,
    /// Elements dropped by `stop()`
    pub discarded_on_stop: u64,
}

/// Which end an insertion goes to
#[derive(Debug, Clone, Copy)]
enum End {
    Front,
    Back,
}

struct State<T> {
    elements: VecDeque<T>,
    stopped: bool,
    stats: QueueStats,
}

impl<T> State<T> {
    fn take_front(&mut self) -> Option<T> {
        let value = self.elements.pop_front()?;
        self.stats.popped += 1;
        Some(value)
    }
}

/// Thread-safe double-ended queue coordinating producers and consumers
///
/// - `push` appends, `push_front` jumps the line.
/// - When bounded and full, an insertion first evicts the oldest (front)
///   element. The evicted value is dropped and never returned.
/// - `pop` / `pop_timed` block while the queue is empty and running.
/// - `stop` is terminal: queued elements are dropped, every waiter wakes up,
///   all later pushes return `false` and all later pops return `None`.
///
/// Share it between threads with `Arc`.
///
/// # Example
/// ```text
/// let queue = Arc::new(ConcurrentQueue::bounded(NonZeroUsize::new(2).unwrap()));
/// queue.push(1);
/// queue.push(2);
/// queue.push(3);                 // evicts 1
/// assert_eq!(queue.pop(), Some(2));
/// ```
pub struct ConcurrentQueue<T> {
    state: Mutex<State<T>>,
    /// Signalled on insertion (one waiter) and on stop (all waiters)
    available: Condvar,
    capacity: Option<NonZeroUsize>,
    poll_interval: Duration,
}

impl<T> ConcurrentQueue<T> {
    /// Create a running queue with an optional capacity bound
    pub fn new(capacity: Option<NonZeroUsize>) -> Self {
        Self::with_config(QueueConfig {
            capacity,
            ..QueueConfig::default()
        })
    }

    /// Create a running queue with no capacity bound
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Create a running queue holding at most `capacity` elements
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self::new(Some(capacity))
    }

    /// Create a running queue from a validated configuration
    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            state: Mutex::new(State {
                elements: VecDeque::new(),
                stopped: false,
                stats: QueueStats::default(),
            }),
            available: Condvar::new(),
            capacity: config.capacity,
            poll_interval: config.poll_interval,
        }
    }

    /// Append `value` at the back
    ///
    /// Returns `false` (and drops `value`) if the queue has been stopped.
    pub fn push(&self, value: T) -> bool {
        self.insert(value, End::Back)
    }

    /// Insert `value` at the front so it is the next element popped
    ///
    /// Same stop and eviction rules as [`push`](Self::push): if the queue is
    /// full, the current front is evicted before `value` takes its place.
    pub fn push_front(&self, value: T) -> bool {
        self.insert(value, End::Front)
    }

    fn insert(&self, value: T, end: End) -> bool {
        let evicted = {
            let mut state = self.state.lock();
            if state.stopped {
                return false;
            }

            let evicted = match self.capacity {
                Some(capacity) if state.elements.len() >= capacity.get() => {
                    state.elements.pop_front()
                }
                _ => None,
            };
            if evicted.is_some() {
                state.stats.evicted += 1;
            }

            match end {
                End::Back => state.elements.push_back(value),
                End::Front => state.elements.push_front(value),
            }
            state.stats.pushed += 1;
            self.available.notify_one();
            evicted
        };

        // Evicted value is dropped here, outside the lock
        if evicted.is_some() {
            trace!(
                capacity = ?self.capacity.map(NonZeroUsize::get),
                end = ?end,
                "Queue at capacity, evicted oldest element"
            );
        }
        true
    }

    /// Remove the front element, blocking until one is available
    ///
    /// Returns `None` once the queue is stopped. The wait re-checks every
    /// poll interval, so a stop is observed within one interval even if its
    /// wake-up is missed.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if state.stopped {
                return None;
            }
            if let Some(value) = state.take_front() {
                return Some(value);
            }
            self.available.wait_for(&mut state, self.poll_interval);
        }
    }

    /// Remove the front element, blocking for at most `timeout`
    ///
    /// Returns `None` when the queue is stopped or when `timeout` elapses
    /// first. The two outcomes are not distinguished here; check
    /// [`running`](Self::running) afterwards if it matters.
    ///
    /// The deadline is soft: it is checked after each wake-up, never before
    /// `timeout` has actually passed.
    pub fn pop_timed(&self, timeout: Duration) -> Option<T> {
        // Overflowing deadline = wait forever
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock();
        loop {
            if state.stopped {
                return None;
            }
            if let Some(value) = state.take_front() {
                return Some(value);
            }

            let now = Instant::now();
            let wait = match deadline {
                Some(deadline) if now >= deadline => {
                    trace!(timeout_ms = timeout.as_millis() as u64, "pop_timed timed out");
                    return None;
                }
                Some(deadline) => (deadline - now).min(self.poll_interval),
                None => self.poll_interval,
            };
            self.available.wait_for(&mut state, wait);
        }
    }

    /// Remove the front element without blocking
    ///
    /// Returns `None` if the queue is empty or stopped.
    pub fn try_pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        if state.stopped {
            return None;
        }
        state.take_front()
    }

    /// Stop the queue permanently
    ///
    /// Drops every queued element and wakes all blocked threads. Calling it
    /// again is a no-op.
    pub fn stop(&self) {
        let discarded = {
            let mut state = self.state.lock();
            if state.stopped {
                return;
            }
            state.stopped = true;
            let discarded = std::mem::take(&mut state.elements);
            state.stats.discarded_on_stop += discarded.len() as u64;
            self.available.notify_all();
            discarded
        };

        debug!(discarded = discarded.len(), "Queue stopped");
        drop(discarded);
    }

    /// `true` until [`stop`](Self::stop) has been called
    pub fn running(&self) -> bool {
        !self.state.lock().stopped
    }

    /// Number of queued elements at this instant
    pub fn size(&self) -> usize {
        self.state.lock().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Snapshot of the lifetime counters
    pub fn stats(&self) -> QueueStats {
        self.state.lock().stats
    }
}

impl<T> Default for ConcurrentQueue<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> Drop for ConcurrentQueue<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<T> fmt::Debug for ConcurrentQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ConcurrentQueue")
            .field("size", &state.elements.len())
            .field("capacity", &self.capacity)
            .field("running", &!state.stopped)
            .finish()
    }
}
