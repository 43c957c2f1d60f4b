//! Notification worker binary
//!
//! Consumes notification jobs from Redis and delivers them as mail. When a
//! database is reachable it also purges expired verification codes on a
//! fixed interval.

mod logging;
mod shutdown;

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use wf_core::domain::clock::SystemClock;
use wf_core::services::verification::{VerificationService, VerificationServiceConfig};
use wf_infra::database::{DatabasePool, MySqlVerificationRepository};
use wf_infra::mail::{create_mail_service, MailerAdapter};
use wf_infra::queue::RedisJobQueue;
use wf_infra::worker::NotificationWorker;
use wf_shared::AppConfig;

/// How often expired verification codes are deleted
const CODE_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

type CodeService = VerificationService<MySqlVerificationRepository>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();
    logging::init(&config.logging);

    tracing::info!(
        environment = ?config.environment,
        mail_provider = ?config.mail.provider,
        "Starting notification worker"
    );

    let queue = Arc::new(
        RedisJobQueue::new(&config.cache, &config.notification)
            .await
            .context("connecting to the notification queue")?,
    );
    let mailer = Arc::new(MailerAdapter::new(create_mail_service(&config.mail)));
    tracing::info!(provider = mailer.provider_name(), "Mail delivery ready");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(shutdown::forward_signal(shutdown_tx));

    let purge = match DatabasePool::new(config.database.clone()).await {
        Ok(pool) => {
            let service = Arc::new(VerificationService::new(
                Arc::new(MySqlVerificationRepository::new(pool.get_pool().clone())),
                Arc::new(SystemClock),
                VerificationServiceConfig::default(),
            ));
            Some(tokio::spawn(purge_loop(service, shutdown_rx.clone())))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Database unavailable, expired code purge disabled");
            None
        }
    };

    let worker = NotificationWorker::new(
        queue,
        mailer,
        Duration::from_secs(config.notification.poll_timeout_secs),
    );
    let stats = worker.run(shutdown_rx).await;

    if let Some(handle) = purge {
        handle.await.context("purge task panicked")?;
    }

    tracing::info!(
        delivered = stats.delivered,
        failed = stats.failed,
        "Notification worker exited"
    );
    Ok(())
}

async fn purge_loop(service: Arc<CodeService>, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(CODE_PURGE_INTERVAL);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                if let Err(e) = service.purge_expired().await {
                    tracing::warn!(
                        error = %e,
                        event = "code_purge_failed",
                        "Failed to purge expired codes"
                    );
                }
            }
        }
    }
}
