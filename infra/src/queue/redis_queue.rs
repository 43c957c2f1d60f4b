//! Redis list implementation of the core job queue

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use wf_core::domain::entities::NotificationJob;
use wf_core::services::notification::JobQueueTrait;

use crate::config::{CacheConfig, NotificationConfig};
use crate::worker::JobSource;
use crate::InfrastructureError;

/// Base delay between connection attempts
const CONNECT_RETRY_DELAY_MS: u64 = 100;

/// Notification job queue on a Redis list
#[derive(Clone)]
pub struct RedisJobQueue {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Fully prefixed list key
    queue_key: String,
}

impl RedisJobQueue {
    /// Connect to Redis and bind to the configured queue key
    ///
    /// # Arguments
    /// * `cache` - Redis connection settings
    /// * `notification` - Queue key and polling settings
    pub async fn new(
        cache: &CacheConfig,
        notification: &NotificationConfig,
    ) -> Result<Self, InfrastructureError> {
        let client = Client::open(cache.url.as_str()).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::connect_with_retry(&client, cache.max_retries.max(1)).await?;
        let queue_key = cache.prefixed(&notification.queue_key);

        info!(queue_key = %queue_key, event = "queue_connected", "Redis job queue ready");

        Ok(Self {
            connection,
            queue_key,
        })
    }

    async fn connect_with_retry(
        client: &Client,
        max_retries: u32,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = CONNECT_RETRY_DELAY_MS;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    // Exponential backoff with cap at 5 seconds
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis after {} attempts: {}",
                        attempts, e
                    );
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// The list key jobs are pushed to
    pub fn queue_key(&self) -> &str {
        &self.queue_key
    }

    /// Append a job to the queue
    ///
    /// # Returns
    /// * `Ok(ack)` - The job id, used as the queue acknowledgement
    pub async fn push(&self, job: &NotificationJob) -> Result<String, InfrastructureError> {
        let payload = serde_json::to_string(job)
            .map_err(|e| InfrastructureError::Queue(format!("Failed to encode job: {}", e)))?;

        let mut conn = self.connection.clone();
        let depth: i64 = conn.lpush(&self.queue_key, payload).await?;

        debug!(
            job_id = %job.id,
            kind = job.kind(),
            depth,
            event = "job_enqueued",
            "Enqueued notification job"
        );
        Ok(job.id.to_string())
    }

    /// Take the oldest job, waiting up to `wait` for one to arrive
    ///
    /// A zero `wait` would block forever in Redis, so it is raised to one
    /// second.
    pub async fn pop(
        &self,
        wait: Duration,
    ) -> Result<Option<NotificationJob>, InfrastructureError> {
        let mut conn = self.connection.clone();
        let timeout_secs = wait.as_secs().max(1);

        let popped: Option<(String, String)> = redis::cmd("BRPOP")
            .arg(&self.queue_key)
            .arg(timeout_secs)
            .query_async(&mut conn)
            .await?;

        let Some((_, payload)) = popped else {
            return Ok(None);
        };

        serde_json::from_str(&payload)
            .map(Some)
            .map_err(|e| InfrastructureError::Queue(format!("Malformed job dropped: {}", e)))
    }

    /// Number of jobs waiting
    pub async fn len(&self) -> Result<u64, InfrastructureError> {
        let mut conn = self.connection.clone();
        let len: u64 = conn.llen(&self.queue_key).await?;
        Ok(len)
    }

    pub async fn is_empty(&self) -> Result<bool, InfrastructureError> {
        Ok(self.len().await? == 0)
    }
}

#[async_trait]
impl JobQueueTrait for RedisJobQueue {
    async fn submit(&self, job: &NotificationJob) -> Result<String, String> {
        self.push(job).await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl JobSource for RedisJobQueue {
    async fn next_job(
        &self,
        wait: Duration,
    ) -> Result<Option<NotificationJob>, InfrastructureError> {
        self.pop(wait).await
    }
}
