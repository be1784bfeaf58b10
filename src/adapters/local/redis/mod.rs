//! Redis adapter for local deployment.
//!
//! Pod messages travel as JSON strings on Redis lists: publishers `LPUSH`
//! onto the write list, workers `BRPOP` from the read list.

mod error;
mod pool;
mod queue;

pub use error::QueueError;
pub use pool::RedisPool;

/// Prefix of every list name the pipeline uses.
const QUEUE_PREFIX: &str = "mediapod:";
