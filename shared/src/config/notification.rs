//! Notification queue configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::env_or;

/// Bounds for handing notification jobs to the external queue
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// Maximum time a caller waits for a queue submission, in milliseconds
    #[serde(default = "default_dispatch_timeout_ms")]
    pub dispatch_timeout_ms: u64,

    /// Redis list key holding pending jobs
    #[serde(default = "default_queue_key")]
    pub queue_key: String,

    /// Seconds a worker blocks on an empty queue before polling again
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout_ms: default_dispatch_timeout_ms(),
            queue_key: default_queue_key(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

impl NotificationConfig {
    /// Read `NOTIFICATION_DISPATCH_TIMEOUT_MS`, `NOTIFICATION_QUEUE_KEY` and
    /// `NOTIFICATION_POLL_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dispatch_timeout_ms: env_or(
                "NOTIFICATION_DISPATCH_TIMEOUT_MS",
                defaults.dispatch_timeout_ms,
            ),
            queue_key: env_or("NOTIFICATION_QUEUE_KEY", defaults.queue_key),
            poll_timeout_secs: env_or("NOTIFICATION_POLL_TIMEOUT_SECS", defaults.poll_timeout_secs),
        }
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }
}

fn default_dispatch_timeout_ms() -> u64 {
    2000
}

fn default_queue_key() -> String {
    String::from("queue:notifications")
}

fn default_poll_timeout_secs() -> u64 {
    5
}
