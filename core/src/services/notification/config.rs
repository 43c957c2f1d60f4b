//! Configuration for the notification dispatcher

use std::time::Duration;

use wf_shared::config::NotificationConfig;

/// Default wait ceiling for a queue submission
pub const DEFAULT_DISPATCH_TIMEOUT_MS: u64 = 2000;

/// Configuration for the notification dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Longest a caller waits on the queue before moving on
    pub timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_DISPATCH_TIMEOUT_MS),
        }
    }
}

impl From<&NotificationConfig> for DispatcherConfig {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            timeout: config.dispatch_timeout(),
        }
    }
}
