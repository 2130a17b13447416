//! Destination table state and polling primitives
//!
//! DynamoDB reports CREATING, UPDATING, DELETING and the archival states as
//! separate statuses. The lifecycle only needs to know whether a table is
//! gone, usable, or on its way between the two, so every store observation is
//! collapsed into [`TableState`].

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Observed state of a destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableState {
    /// The store reports the table as not found
    Absent,
    /// The table exists but is being created, updated or deleted
    Transitioning,
    /// The table accepts reads and writes
    Active,
}

impl TableState {
    /// Whether the table exists in any form
    pub fn exists(self) -> bool {
        !matches!(self, TableState::Absent)
    }

    /// Whether polling can stop on this state
    pub fn is_terminal(self) -> bool {
        !matches!(self, TableState::Transitioning)
    }
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableState::Absent => write!(f, "absent"),
            TableState::Transitioning => write!(f, "transitioning"),
            TableState::Active => write!(f, "active"),
        }
    }
}

/// Sleep between polls
///
/// Injected into the lifecycle manager and the batch importer so tests can
/// count delays without waiting for them.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspends the caller for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Polling budget for a table transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Delay before each state check
    pub poll_interval: Duration,
    /// Number of state checks before giving up
    pub max_attempts: u32,
}

impl WaitPolicy {
    /// Create a new wait policy
    pub fn new(poll_interval: Duration, max_attempts: u32) -> Self {
        Self {
            poll_interval,
            max_attempts,
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), 60)
    }
}

impl From<&crate::config::TableWaitConfig> for WaitPolicy {
    fn from(config: &crate::config::TableWaitConfig) -> Self {
        Self::new(config.poll_interval(), config.max_poll_attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_state_exists() {
        assert!(!TableState::Absent.exists());
        assert!(TableState::Transitioning.exists());
        assert!(TableState::Active.exists());
    }

    #[test]
    fn test_table_state_terminal() {
        assert!(TableState::Absent.is_terminal());
        assert!(TableState::Active.is_terminal());
        assert!(!TableState::Transitioning.is_terminal());
    }

    #[test]
    fn test_wait_policy_from_config() {
        let config = crate::config::TableWaitConfig {
            poll_interval_ms: 250,
            max_poll_attempts: 4,
        };
        let policy = WaitPolicy::from(&config);
        assert_eq!(policy.poll_interval, Duration::from_millis(250));
        assert_eq!(policy.max_attempts, 4);
    }

    #[test]
    fn test_wait_policy_default() {
        let policy = WaitPolicy::default();
        assert_eq!(policy.poll_interval, Duration::from_secs(5));
        assert_eq!(policy.max_attempts, 60);
    }

    #[tokio::test]
    async fn test_tokio_sleeper_sleeps() {
        let start = std::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(5)).await;
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
