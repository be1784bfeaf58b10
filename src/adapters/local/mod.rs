//! Local adapters for monolith deployment.

pub mod fs;
pub mod redis;

pub use fs::FsStorage;
pub use redis::RedisPool;
