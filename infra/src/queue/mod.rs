//! Notification job queue backed by a Redis list
//!
//! Producers `LPUSH` JSON-encoded jobs; workers `BRPOP` them, so jobs are
//! consumed in submission order.

pub mod redis_queue;

pub use redis_queue::RedisJobQueue;
