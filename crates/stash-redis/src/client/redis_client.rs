//! Redis client wrapper and connection management.
//!
//! # Connection Sharing
//!
//! The `RedisClient` uses the underlying `redis` connection manager which
//! multiplexes all requests over a single connection. Key characteristics:
//!
//! - **Single TCP connection**: Each client maintains one connection to Redis
//! - **Thread-safe and Clone-able**: The client is `Arc`-wrapped internally,
//!   making `clone()` operations cheap (just an Arc clone, not a new connection)
//! - **Concurrent operations**: Multiple async tasks can share the same client
//!   and perform operations concurrently over the same connection
//! - **Automatic reconnection**: The connection manager re-establishes lost
//!   connections on its own; this wrapper never retries operations itself
//!
//! Construct the client once during process initialization and hand clones to
//! every consumer; all clones observe the same connection state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client, ToRedisArgs};
use tokio::sync::OnceCell;

use super::redis_config::RedisConfig;
use crate::error::describe_error;
use crate::{Error, Result, TRACING_TARGET_CLIENT, TRACING_TARGET_CONNECTION};

/// Redis client wrapper with connection-state tracking.
///
/// This wrapper is cheaply cloneable and thread-safe.
/// Multiple clones share the same underlying connection via multiplexing.
#[derive(Clone)]
pub struct RedisClient {
    inner: Arc<RedisClientInner>,
}

/// Inner data for the Redis client
struct RedisClientInner {
    client: Client,
    manager: OnceCell<ConnectionManager>,
    connected: AtomicBool,
    config: RedisConfig,
}

impl RedisClient {
    /// Create a new Redis client without dialing the server.
    ///
    /// The connection is established lazily on first use, so construction
    /// succeeds even while the server is unreachable; the first operation
    /// surfaces the transport error instead. Use [`RedisClient::connect`]
    /// to fail fast at startup.
    pub fn new(config: RedisConfig) -> Result<Self> {
        config.validate().map_err(Error::invalid_config)?;

        let client = Client::open(config.redis_url.as_str())
            .map_err(|e| Error::invalid_config(describe_error(&e)))?;

        Ok(Self {
            inner: Arc::new(RedisClientInner {
                client,
                manager: OnceCell::new(),
                // Optimistic until the transport reports otherwise
                connected: AtomicBool::new(true),
                config,
            }),
        })
    }

    /// Create a new Redis client and verify connectivity with a ping.
    #[tracing::instrument(skip(config))]
    pub async fn connect(config: RedisConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.ping().await?;
        Ok(client)
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &RedisConfig {
        &self.inner.config
    }

    /// Check if the connection to Redis is believed to be active.
    ///
    /// The flag reflects the most recent transport evidence (a successful
    /// round-trip or a connection failure) and is advisory only; operations
    /// are never gated on it.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.connected.load(Ordering::Relaxed)
    }

    /// Test connectivity with a ping
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub async fn ping(&self) -> Result<Duration> {
        let start = std::time::Instant::now();

        let mut conn = self.manager().await?;
        let result: redis::RedisResult<String> =
            redis::cmd("PING").query_async(&mut conn).await;
        self.observe("ping", result)?;

        let ping_time = start.elapsed();
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            duration_ms = ping_time.as_millis(),
            "Redis ping successful"
        );
        Ok(ping_time)
    }

    /// Get the value of a key.
    ///
    /// Returns `Ok(None)` when the key does not exist; only transport
    /// failures are errors.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager().await?;
        let result: redis::RedisResult<Option<String>> = conn.get(key).await;
        let value = self.observe("get", result)?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            key = %key,
            found = value.is_some(),
            "Retrieved value from Redis"
        );
        Ok(value)
    }

    /// Store a value under a key with an expiration.
    ///
    /// Overwrites any prior value; the server evicts the key autonomously
    /// after `ttl` elapses. SETEX rejects a zero expiration, so sub-second
    /// durations are reported as an argument error before any round-trip.
    #[tracing::instrument(skip(self, value), target = TRACING_TARGET_CLIENT)]
    pub async fn set<V>(&self, key: &str, value: V, ttl: Duration) -> Result<()>
    where
        V: ToRedisArgs + Send + Sync,
    {
        let ttl_secs = ttl.as_secs();
        if ttl_secs == 0 {
            return Err(Error::operation(
                "set",
                "expiration must be at least one second",
            ));
        }

        let mut conn = self.manager().await?;
        let result: redis::RedisResult<()> = conn.set_ex(key, value, ttl_secs).await;
        self.observe("set", result)?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            key = %key,
            ttl_secs = ttl_secs,
            "Stored value in Redis"
        );
        Ok(())
    }

    /// Remove a key and its value.
    ///
    /// The server reports how many keys were removed; that count is
    /// discarded, so deleting a missing key is a successful no-op.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub async fn del(&self, key: &str) -> Result<()> {
        let mut conn = self.manager().await?;
        let result: redis::RedisResult<()> = conn.del(key).await;
        self.observe("del", result)?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            key = %key,
            "Deleted key from Redis"
        );
        Ok(())
    }

    /// Check if a key exists.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.manager().await?;
        let result: redis::RedisResult<bool> = conn.exists(key).await;
        let found = self.observe("exists", result)?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            key = %key,
            found = found,
            "Checked key existence in Redis"
        );
        Ok(found)
    }

    /// Get the shared connection manager, dialing the server on first use.
    async fn manager(&self) -> Result<ConnectionManager> {
        let inner = &self.inner;
        let manager = inner
            .manager
            .get_or_try_init(|| async {
                tracing::info!(
                    target: TRACING_TARGET_CONNECTION,
                    url = %inner.config.redis_url,
                    client_name = %inner.config.name(),
                    "Connecting to Redis"
                );

                let mut manager_config = ConnectionManagerConfig::new();
                if let Some(timeout) = inner.config.connect_timeout() {
                    manager_config = manager_config.set_connection_timeout(timeout);
                }
                if let Some(timeout) = inner.config.response_timeout() {
                    manager_config = manager_config.set_response_timeout(timeout);
                }
                if let Some(max_reconnects) = inner.config.max_reconnects() {
                    manager_config = manager_config.set_number_of_retries(max_reconnects);
                }

                match inner
                    .client
                    .get_connection_manager_with_config(manager_config)
                    .await
                {
                    Ok(manager) => {
                        inner.connected.store(true, Ordering::Relaxed);
                        tracing::info!(
                            target: TRACING_TARGET_CONNECTION,
                            "Successfully connected to Redis"
                        );
                        Ok(manager)
                    }
                    Err(err) => {
                        inner.connected.store(false, Ordering::Relaxed);
                        tracing::error!(
                            target: TRACING_TARGET_CONNECTION,
                            "Failed to connect to Redis: {}",
                            describe_error(&err)
                        );
                        Err(Error::Connection(err))
                    }
                }
            })
            .await?;

        Ok(manager.clone())
    }

    /// Record the transport outcome of an operation on the connectivity flag.
    ///
    /// Any successful round-trip marks the connection alive; transport-level
    /// failures are logged and mark it down. Server-side errors (wrong type,
    /// bad arguments) pass through without touching the flag.
    fn observe<T>(&self, operation: &'static str, result: redis::RedisResult<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.inner.connected.store(true, Ordering::Relaxed);
                Ok(value)
            }
            Err(err) if is_transport_error(&err) => {
                tracing::error!(
                    target: TRACING_TARGET_CONNECTION,
                    operation = operation,
                    "Failed to connect to Redis: {}",
                    describe_error(&err)
                );
                self.inner.connected.store(false, Ordering::Relaxed);
                Err(Error::Connection(err))
            }
            Err(err) => Err(Error::operation(operation, describe_error(&err))),
        }
    }
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("config", &self.inner.config)
            .field("connected", &self.is_alive())
            .finish_non_exhaustive()
    }
}

/// Whether the error indicates a broken connection rather than a server reply.
fn is_transport_error(err: &redis::RedisError) -> bool {
    err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
}
