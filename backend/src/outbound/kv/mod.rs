//! Key-value store adapters.
//!
//! [`InMemoryKeyValueStore`] backs tests and single-process deployments;
//! [`RedisKeyValueStore`] is used whenever a Redis URL is configured.

mod memory;
mod redis;

pub use self::memory::InMemoryKeyValueStore;
pub use self::redis::RedisKeyValueStore;
