//! Redis configuration module

use serde::{Deserialize, Serialize};

use super::env_or;

/// Redis connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Number of connection attempts before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Enable key prefix for every key written
    #[serde(default)]
    pub key_prefix: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            max_retries: default_max_retries(),
            key_prefix: None,
        }
    }
}

impl CacheConfig {
    /// Read `REDIS_URL`, `REDIS_MAX_RETRIES` and `REDIS_KEY_PREFIX`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_or("REDIS_URL", defaults.url),
            max_retries: env_or("REDIS_MAX_RETRIES", defaults.max_retries),
            key_prefix: std::env::var("REDIS_KEY_PREFIX")
                .ok()
                .filter(|prefix| !prefix.trim().is_empty()),
            ..defaults
        }
    }

    /// Create a new configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Apply the configured prefix to a key
    pub fn prefixed(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}
