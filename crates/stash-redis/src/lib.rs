#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for Redis client operations.
///
/// Use this target for logging key operations, client initialization, and client-level errors.
pub const TRACING_TARGET_CLIENT: &str = "stash_redis::client";

/// Tracing target for Redis connection operations.
///
/// Use this target for logging connection establishment, lost connections, and connection errors.
pub const TRACING_TARGET_CONNECTION: &str = "stash_redis::connection";

mod client;
mod error;

// Re-export redis types needed by consumers
pub use redis::ToRedisArgs;

pub use client::{RedisClient, RedisConfig};
pub use error::{Error, Result, describe_error};
