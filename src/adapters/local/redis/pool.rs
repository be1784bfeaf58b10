//! Redis connection pool.

use super::error::QueueError;
use super::QUEUE_PREFIX;
use deadpool_redis::{Config, Pool, Runtime};

/// Redis-backed message queue bound to one read and one write list.
#[derive(Clone)]
pub struct RedisPool {
    pub(super) pool: Pool,
    pub(super) read_key: String,
    pub(super) write_key: String,
}

impl RedisPool {
    /// Create a new RedisPool with connection pool.
    pub fn new(redis_url: &str, queue_read: &str, queue_write: &str) -> Result<Self, QueueError> {
        let cfg = Config::from_url(redis_url);
        let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
        Ok(Self {
            pool,
            read_key: list_key(queue_read),
            write_key: list_key(queue_write),
        })
    }
}

pub(super) fn list_key(queue: &str) -> String {
    format!("{}{}", QUEUE_PREFIX, queue)
}
