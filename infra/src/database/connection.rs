//! MySQL pool shared by the repositories

use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    ConnectOptions, MySql, MySqlPool, Row, Transaction,
};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::log::LevelFilter;

use crate::config::DatabaseConfig;
use crate::InfrastructureError;

/// Statements slower than this are logged at warn
const SLOW_STATEMENT_THRESHOLD: Duration = Duration::from_secs(1);

/// Owns the SQLx pool and the settings it was built from
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
    config: DatabaseConfig,
}

impl DatabasePool {
    /// Connect and size the pool from `config`
    ///
    /// A malformed URL is a `Config` error; an unreachable server is a
    /// `Database` error.
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            event = "db_pool_creating",
            "Connecting to MySQL"
        );

        let pool = pool_options(&config)
            .connect_with(connect_options(&config)?)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, event = "db_pool_failed", "Could not connect to MySQL");
                InfrastructureError::Database(e)
            })?;

        tracing::info!(event = "db_pool_ready", "MySQL pool ready");
        Ok(Self { pool, config })
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Round-trip `SELECT 1`
    ///
    /// `Ok(false)` means the server answered but not with 1.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let row = sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, event = "db_health_failed", "MySQL health check failed");
                InfrastructureError::Database(e)
            })?;

        Ok(row.try_get::<i64, _>(0).map(|v| v == 1).unwrap_or(false))
    }

    pub fn get_statistics(&self) -> PoolStatistics {
        PoolStatistics {
            connections: self.pool.size(),
            idle_connections: self.pool.num_idle(),
            max_connections: self.pool.options().get_max_connections(),
        }
    }

    pub async fn close(&self) {
        tracing::info!(
            stats = %self.get_statistics(),
            event = "db_pool_closing",
            "Closing MySQL pool"
        );
        self.pool.close().await;
    }

    /// Apply `infra/migrations` in order; already applied files are skipped
    pub async fn run_migrations(&self) -> Result<(), InfrastructureError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| InfrastructureError::Database(e.into()))?;

        tracing::info!(event = "db_migrations_done", "Schema is up to date");
        Ok(())
    }

    pub async fn begin_transaction(&self) -> Result<Transaction<'_, MySql>, InfrastructureError> {
        self.pool.begin().await.map_err(InfrastructureError::Database)
    }
}

fn connect_options(config: &DatabaseConfig) -> Result<MySqlConnectOptions, InfrastructureError> {
    let options = MySqlConnectOptions::from_str(&config.url)
        .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?;

    Ok(options
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, SLOW_STATEMENT_THRESHOLD))
}

fn pool_options(config: &DatabaseConfig) -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .test_before_acquire(true)
}

/// Point-in-time pool occupancy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStatistics {
    /// Open connections, idle ones included
    pub connections: u32,
    pub idle_connections: usize,
    pub max_connections: u32,
}

impl PoolStatistics {
    /// Connections currently checked out
    pub fn in_use(&self) -> u32 {
        self.connections.saturating_sub(self.idle_connections as u32)
    }
}

impl fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in use, {} idle, {}/{} open",
            self.in_use(),
            self.idle_connections,
            self.connections,
            self.max_connections
        )
    }
}
