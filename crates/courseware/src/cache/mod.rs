//! Cache backend implementations.
//!
//! Concrete implementations of [`courseware_core::cache::Cache`]. The
//! in-memory LRU backend is always available; Redis is enabled with the
//! `redis` feature.

mod disabled;
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use disabled::DisabledCache;
pub use memory::MemoryCache;

#[cfg(feature = "redis")]
pub use redis_impl::{RedisCache, DEFAULT_COMMAND_TIMEOUT};
