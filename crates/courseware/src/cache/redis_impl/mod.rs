//! Redis cache backend for multi-instance deployments.

mod cache;
mod error;

pub use cache::{RedisCache, DEFAULT_COMMAND_TIMEOUT};
