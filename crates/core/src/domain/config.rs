// Queue Configuration

use super::constants::DEFAULT_POLL_INTERVAL;
use crate::error::{QueueError, Result};
use std::num::NonZeroUsize;
use std::time::Duration;

/// Queue configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum number of queued elements (None = unbounded)
    pub capacity: Option<NonZeroUsize>,
    /// Upper bound on how long a blocked pop sleeps between re-checks
    pub poll_interval: Duration,
}

impl QueueConfig {
    /// Unbounded queue with the default poll interval
    pub fn unbounded() -> Self {
        Self {
            capacity: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Bounded queue holding at most `capacity` elements
    ///
    /// # Errors
    /// `QueueError::Validation` if `capacity` is zero: a zero-sized queue
    /// could never hold the element it just accepted.
    ///
    /// # Example
    /// ```text
    /// let config = QueueConfig::bounded(64)?;
    /// assert_eq!(config.capacity.map(|c| c.get()), Some(64));
    /// ```
    pub fn bounded(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            QueueError::Validation("queue capacity must be at least 1".to_string())
        })?;
        Ok(Self {
            capacity: Some(capacity),
            ..Self::unbounded()
        })
    }

    /// Build from an optional raw capacity, treating `None` as unbounded
    pub fn from_capacity(capacity: Option<usize>) -> Result<Self> {
        match capacity {
            Some(capacity) => Self::bounded(capacity),
            None => Ok(Self::unbounded()),
        }
    }

    /// Override the poll interval
    ///
    /// # Errors
    /// `QueueError::Validation` if `interval` is zero (a zero wait turns every
    /// blocked pop into a busy loop).
    pub fn with_poll_interval(mut self, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(QueueError::Validation(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        self.poll_interval = interval;
        Ok(self)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        let config = QueueConfig::default();
        assert_eq!(config.capacity, None);
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn test_bounded_rejects_zero() {
        let result = QueueConfig::bounded(0);
        assert!(matches!(result, Err(QueueError::Validation(_))));
        assert!(result.unwrap_err().to_string().contains("at least 1"));
    }

    #[test]
    fn test_from_capacity() {
        assert_eq!(QueueConfig::from_capacity(None).unwrap().capacity, None);
        assert_eq!(
            QueueConfig::from_capacity(Some(3)).unwrap().capacity,
            NonZeroUsize::new(3)
        );
        assert!(QueueConfig::from_capacity(Some(0)).is_err());
    }

    #[test]
    fn test_poll_interval_override() {
        let config = QueueConfig::bounded(2)
            .unwrap()
            .with_poll_interval(Duration::from_millis(5))
            .unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(5));
        assert_eq!(config.capacity, NonZeroUsize::new(2));

        let zero = QueueConfig::unbounded().with_poll_interval(Duration::ZERO);
        assert!(zero.unwrap_err().to_string().contains("greater than zero"));
    }
}
