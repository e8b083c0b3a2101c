//! Redis backend
//!
//! Remote caching through the redis client. Suitable for deployments that
//! share cache state across instances.
//!
//! Beyond the [`CacheBackend`] contract, this type exposes the full
//! delegated surface of the remote store: strings, hashes, lists, sets,
//! sorted sets, key management, and atomic pipelines. Every method is a
//! single forwarded command.

use async_trait::async_trait;
use cachefront_domain::error::{Error, Result};
use cachefront_domain::ports::{CacheBackend, CacheStats, EntryOptions, HealthStatus};
use redis::{aio::MultiplexedConnection, Client};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::timeout;

/// Timeout for the initial connection probe
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Timeout for acquiring a connection for an operation
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis-backed cache store
#[derive(Clone)]
pub struct RedisCache {
    client: Client,
    stats: Arc<RwLock<CacheStats>>,
}

// Construction and connection management
impl RedisCache {
    /// Connect to Redis and verify the server responds
    ///
    /// Fails fast when the server is unreachable: a configured Redis that
    /// cannot be probed is a startup error, not something to limp past.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url)
            .map_err(|e| Error::cache(format!("failed to create redis client: {}", e)))?;

        let mut conn = match timeout(PROBE_TIMEOUT, client.get_multiplexed_async_connection()).await
        {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => {
                return Err(Error::cache(format!(
                    "failed to connect to redis at {}: {}",
                    url, e
                )))
            }
            Err(_) => return Err(Error::cache("redis connection timed out")),
        };

        let pong: String = match timeout(
            PROBE_TIMEOUT,
            redis::cmd("PING").query_async::<String>(&mut conn),
        )
        .await
        {
            Ok(Ok(pong)) => pong,
            Ok(Err(e)) => return Err(Error::cache(format!("redis ping failed: {}", e))),
            Err(_) => return Err(Error::cache("redis ping timed out")),
        };

        if pong != "PONG" {
            return Err(Error::cache("redis ping did not return pong"));
        }

        Ok(Self {
            client,
            stats: Arc::new(RwLock::new(CacheStats::new())),
        })
    }

    /// Get a multiplexed connection with a timeout
    async fn conn(&self) -> Result<MultiplexedConnection> {
        timeout(CONNECT_TIMEOUT, self.client.get_multiplexed_async_connection())
            .await
            .map_err(|_| {
                Error::cache(
                    "redis connection timeout: failed to acquire connection. \
                     check redis server availability",
                )
            })?
            .map_err(|e| Error::cache(format!("failed to establish redis connection: {}", e)))
    }

    fn record_hit(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.hits += 1;
            stats.hit_rate = stats.calculate_hit_rate();
        }
    }

    fn record_miss(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.misses += 1;
            stats.hit_rate = stats.calculate_hit_rate();
        }
    }

    fn op_err(op: &str, e: redis::RedisError) -> Error {
        Error::cache(format!("redis {} failed: {}", op, e))
    }
}

// String operations
impl RedisCache {
    /// Set a string value, optionally with a TTL
    pub async fn set_string(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn().await?;
        match ttl {
            Some(ttl) if ttl.as_secs() > 0 => redis::cmd("SETEX")
                .arg(key)
                .arg(ttl.as_secs())
                .arg(value)
                .query_async::<()>(&mut conn)
                .await
                .map_err(|e| Self::op_err("SETEX", e)),
            _ => redis::cmd("SET")
                .arg(key)
                .arg(value)
                .query_async::<()>(&mut conn)
                .await
                .map_err(|e| Self::op_err("SET", e)),
        }
    }

    /// Set several string values in one command
    pub async fn set_many(&self, pairs: &[(String, String)]) -> Result<()> {
        if pairs.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn().await?;
        let mut cmd = redis::cmd("MSET");
        for (key, value) in pairs {
            cmd.arg(key).arg(value);
        }
        cmd.query_async::<()>(&mut conn)
            .await
            .map_err(|e| Self::op_err("MSET", e))
    }

    /// Get a string value
    pub async fn get_string(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn().await?;
        redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("GET", e))
    }

    /// Get several string values in one command
    pub async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn().await?;
        redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("MGET", e))
    }

    /// Increment a numeric value by `delta` (may be negative); returns the new value
    pub async fn incr_by_float(&self, key: &str, delta: f64) -> Result<f64> {
        let mut conn = self.conn().await?;
        redis::cmd("INCRBYFLOAT")
            .arg(key)
            .arg(delta)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("INCRBYFLOAT", e))
    }

    /// Decrement a numeric value by `delta`; returns the new value
    pub async fn decr_by_float(&self, key: &str, delta: f64) -> Result<f64> {
        self.incr_by_float(key, -delta).await
    }
}

// Hash operations
impl RedisCache {
    /// Store a field in a hash; returns true when the field was newly created
    pub async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<bool> {
        let mut conn = self.conn().await?;
        let created: i64 = redis::cmd("HSET")
            .arg(key)
            .arg(field)
            .arg(value)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("HSET", e))?;
        Ok(created > 0)
    }

    /// Get a field from a hash
    pub async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.conn().await?;
        redis::cmd("HGET")
            .arg(key)
            .arg(field)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("HGET", e))
    }

    /// Check whether a hash field exists
    pub async fn hash_exists(&self, key: &str, field: &str) -> Result<bool> {
        let mut conn = self.conn().await?;
        let exists: i64 = redis::cmd("HEXISTS")
            .arg(key)
            .arg(field)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("HEXISTS", e))?;
        Ok(exists > 0)
    }

    /// Delete one or more hash fields; returns the number removed
    pub async fn hash_delete(&self, key: &str, fields: &[String]) -> Result<u64> {
        if fields.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn().await?;
        redis::cmd("HDEL")
            .arg(key)
            .arg(fields)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("HDEL", e))
    }

    /// Get all values stored in a hash
    pub async fn hash_values(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn().await?;
        redis::cmd("HVALS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("HVALS", e))
    }

    /// Get all field names of a hash
    pub async fn hash_keys(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn().await?;
        redis::cmd("HKEYS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("HKEYS", e))
    }

    /// Increment a numeric hash field by `delta`; returns the new value
    pub async fn hash_incr_by_float(&self, key: &str, field: &str, delta: f64) -> Result<f64> {
        let mut conn = self.conn().await?;
        redis::cmd("HINCRBYFLOAT")
            .arg(key)
            .arg(field)
            .arg(delta)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("HINCRBYFLOAT", e))
    }
}

// List operations
impl RedisCache {
    /// Append to the tail of a list (enqueue); returns the new length
    pub async fn list_push_back(&self, key: &str, value: &str) -> Result<u64> {
        let mut conn = self.conn().await?;
        redis::cmd("RPUSH")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("RPUSH", e))
    }

    /// Prepend to the head of a list (push); returns the new length
    pub async fn list_push_front(&self, key: &str, value: &str) -> Result<u64> {
        let mut conn = self.conn().await?;
        redis::cmd("LPUSH")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("LPUSH", e))
    }

    /// Pop from the tail of a list
    pub async fn list_pop_back(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn().await?;
        redis::cmd("RPOP")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("RPOP", e))
    }

    /// Pop from the head of a list
    pub async fn list_pop_front(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn().await?;
        redis::cmd("LPOP")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("LPOP", e))
    }

    /// Get a range of a list (inclusive indices, -1 for end)
    pub async fn list_range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let mut conn = self.conn().await?;
        redis::cmd("LRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("LRANGE", e))
    }

    /// Remove all occurrences of a value from a list; returns the count removed
    pub async fn list_remove(&self, key: &str, value: &str) -> Result<u64> {
        let mut conn = self.conn().await?;
        // count 0 removes every occurrence
        redis::cmd("LREM")
            .arg(key)
            .arg(0)
            .arg(value)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("LREM", e))
    }

    /// Get the length of a list
    pub async fn list_len(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn().await?;
        redis::cmd("LLEN")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("LLEN", e))
    }
}

// Set and sorted-set operations
impl RedisCache {
    /// Add a member to a set; returns true when newly added
    pub async fn set_add(&self, key: &str, member: &str) -> Result<bool> {
        let mut conn = self.conn().await?;
        let added: i64 = redis::cmd("SADD")
            .arg(key)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("SADD", e))?;
        Ok(added > 0)
    }

    /// Remove a member from a set; returns true when it was present
    pub async fn set_remove(&self, key: &str, member: &str) -> Result<bool> {
        let mut conn = self.conn().await?;
        let removed: i64 = redis::cmd("SREM")
            .arg(key)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("SREM", e))?;
        Ok(removed > 0)
    }

    /// Get all members of a set
    pub async fn set_members(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn().await?;
        redis::cmd("SMEMBERS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("SMEMBERS", e))
    }

    /// Get the cardinality of a set
    pub async fn set_len(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn().await?;
        redis::cmd("SCARD")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("SCARD", e))
    }

    /// Add a scored member to a sorted set; returns true when newly added
    pub async fn zset_add(&self, key: &str, member: &str, score: f64) -> Result<bool> {
        let mut conn = self.conn().await?;
        let added: i64 = redis::cmd("ZADD")
            .arg(key)
            .arg(score)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("ZADD", e))?;
        Ok(added > 0)
    }

    /// Remove a member from a sorted set; returns true when it was present
    pub async fn zset_remove(&self, key: &str, member: &str) -> Result<bool> {
        let mut conn = self.conn().await?;
        let removed: i64 = redis::cmd("ZREM")
            .arg(key)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("ZREM", e))?;
        Ok(removed > 0)
    }

    /// Get members of a sorted set by rank range (inclusive, -1 for end)
    pub async fn zset_range_by_rank(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let mut conn = self.conn().await?;
        redis::cmd("ZRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("ZRANGE", e))
    }

    /// Get the cardinality of a sorted set
    pub async fn zset_len(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn().await?;
        redis::cmd("ZCARD")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("ZCARD", e))
    }
}

// Key management and pipelines
impl RedisCache {
    /// Delete one or more keys; returns the number removed
    pub async fn key_delete(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn().await?;
        redis::cmd("DEL")
            .arg(keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("DEL", e))
    }

    /// Check whether a key exists
    pub async fn key_exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn().await?;
        let exists: i64 = redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("EXISTS", e))?;
        Ok(exists > 0)
    }

    /// Rename a key; fails when the source key does not exist
    pub async fn key_rename(&self, key: &str, new_key: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        redis::cmd("RENAME")
            .arg(key)
            .arg(new_key)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| Self::op_err("RENAME", e))
    }

    /// Set a TTL on a key; returns false when the key does not exist
    pub async fn key_expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.conn().await?;
        let applied: i64 = redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl.as_secs())
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("EXPIRE", e))?;
        Ok(applied > 0)
    }

    /// Create an atomic pipeline (MULTI/EXEC)
    pub fn atomic_pipeline() -> redis::Pipeline {
        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe
    }

    /// Execute a pipeline in one round trip
    pub async fn run_pipeline(&self, pipe: &redis::Pipeline) -> Result<()> {
        let mut conn = self.conn().await?;
        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| Self::op_err("pipeline", e))
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let value = self.get_string(key).await?;
        match value {
            Some(v) => {
                self.record_hit();
                Ok(Some(v))
            }
            None => {
                self.record_miss();
                Ok(None)
            }
        }
    }

    async fn set_json(&self, key: &str, value: &str, options: EntryOptions) -> Result<()> {
        self.set_string(key, value, Some(options.effective_ttl()))
            .await
    }

    async fn get_or_set_json(
        &self,
        key: &str,
        value: &str,
        options: EntryOptions,
    ) -> Result<(String, bool)> {
        let mut conn = self.conn().await?;
        // SET ... NX GET: one atomic command that inserts when absent and
        // returns the previous value when present (nil when inserted)
        let previous: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("GET")
            .arg("EX")
            .arg(options.effective_ttl().as_secs())
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("SET NX GET", e))?;

        match previous {
            Some(existing) => {
                self.record_hit();
                Ok((existing, false))
            }
            None => {
                self.record_miss();
                Ok((value.to_string(), true))
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn().await?;
        let removed: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("DEL", e))?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.key_exists(key).await
    }

    async fn clear(&self, prefix: Option<&str>) -> Result<()> {
        let mut conn = self.conn().await?;
        let pattern = match prefix {
            Some(p) => format!("{}*", p),
            None => "*".to_string(),
        };

        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("KEYS", e))?;

        if !keys.is_empty() {
            redis::cmd("DEL")
                .arg(&keys)
                .query_async::<()>(&mut conn)
                .await
                .map_err(|e| Self::op_err("DEL", e))?;
        }
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let mut stats = self
            .stats
            .read()
            .map_err(|_| Error::internal("cache stats lock poisoned"))?
            .clone();
        stats.entries = self.size().await? as u64;
        Ok(stats)
    }

    async fn size(&self) -> Result<usize> {
        let mut conn = self.conn().await?;
        let size: i64 = redis::cmd("DBSIZE")
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::op_err("DBSIZE", e))?;
        Ok(size as usize)
    }

    async fn health(&self) -> Result<HealthStatus> {
        let mut conn = match self.conn().await {
            Ok(conn) => conn,
            Err(_) => return Ok(HealthStatus::Unhealthy),
        };

        match redis::cmd("PING").query_async::<String>(&mut conn).await {
            Ok(pong) if pong == "PONG" => Ok(HealthStatus::Healthy),
            _ => Ok(HealthStatus::Unhealthy),
        }
    }

    fn backend_name(&self) -> &str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests require a running Redis server:
    //   docker run -d -p 6379:6379 redis:latest

    const TEST_URL: &str = "redis://127.0.0.1:6379";

    #[tokio::test]
    #[ignore] // requires Redis
    async fn test_connect_and_ping() {
        let store = RedisCache::connect(TEST_URL).await.unwrap();
        assert_eq!(store.health().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_connect_fails_fast_on_bad_address() {
        let result = RedisCache::connect("redis://127.0.0.1:1").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    #[ignore]
    async fn test_string_round_trip() {
        let store = RedisCache::connect(TEST_URL).await.unwrap();

        store
            .set_string("cachefront-test:s1", "hello", Some(Duration::from_secs(10)))
            .await
            .unwrap();
        let value = store.get_string("cachefront-test:s1").await.unwrap();
        assert_eq!(value.as_deref(), Some("hello"));

        store
            .key_delete(&["cachefront-test:s1".to_string()])
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_incr_decr() {
        let store = RedisCache::connect(TEST_URL).await.unwrap();
        let key = "cachefront-test:counter";

        store.key_delete(&[key.to_string()]).await.unwrap();
        assert_eq!(store.incr_by_float(key, 2.5).await.unwrap(), 2.5);
        assert_eq!(store.decr_by_float(key, 1.5).await.unwrap(), 1.0);

        store.key_delete(&[key.to_string()]).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_list_queue_semantics() {
        let store = RedisCache::connect(TEST_URL).await.unwrap();
        let key = "cachefront-test:list";

        store.key_delete(&[key.to_string()]).await.unwrap();
        store.list_push_back(key, "a").await.unwrap();
        store.list_push_back(key, "b").await.unwrap();

        assert_eq!(store.list_len(key).await.unwrap(), 2);
        assert_eq!(store.list_pop_front(key).await.unwrap().as_deref(), Some("a"));

        store.key_delete(&[key.to_string()]).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_get_or_set_is_atomic() {
        let store = RedisCache::connect(TEST_URL).await.unwrap();
        let key = "cachefront-test:gos";

        store.key_delete(&[key.to_string()]).await.unwrap();

        let (value, fresh) = store
            .get_or_set_json(key, "\"first\"", EntryOptions::new())
            .await
            .unwrap();
        assert_eq!(value, "\"first\"");
        assert!(fresh);

        let (value, fresh) = store
            .get_or_set_json(key, "\"second\"", EntryOptions::new())
            .await
            .unwrap();
        assert_eq!(value, "\"first\"");
        assert!(!fresh);

        store.key_delete(&[key.to_string()]).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_atomic_pipeline_replace_with_ttl() {
        let store = RedisCache::connect(TEST_URL).await.unwrap();
        let key = "cachefront-test:pipe";

        let mut pipe = RedisCache::atomic_pipeline();
        pipe.cmd("SET").arg(key).arg("v2").ignore();
        pipe.cmd("EXPIRE").arg(key).arg(600).ignore();
        store.run_pipeline(&pipe).await.unwrap();

        assert_eq!(store.get_string(key).await.unwrap().as_deref(), Some("v2"));
        store.key_delete(&[key.to_string()]).await.unwrap();
    }
}
